//!
//! HTTP client for the reserve auditor API.
//!
//! The auditor serves every record collection as a JSON array behind `offset`
//! and `limit` query parameters. This client walks those pages and hands the
//! raw records back untouched; shape discrimination happens in the
//! reconciliation layer.

use super::types::*;
use crate::config::AuditorConfig;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info};

pub const AUDITED_MINTS_PATH: &str = "/audited_mints";
pub const AUDITED_BURNS_PATH: &str = "/audited_burns";
pub const UNAUDITED_MINTS_PATH: &str = "/unaudited_mint_txs";
pub const UNAUDITED_BURNS_PATH: &str = "/unaudited_burn_tx_outs";
pub const UNAUDITED_DEPOSITS_PATH: &str = "/unaudited_gnosis_deposits";
pub const UNAUDITED_WITHDRAWALS_PATH: &str = "/unaudited_gnosis_withdrawals";
pub const LEDGER_BALANCE_PATH: &str = "/ledger_balance";

/// Reserve auditor HTTP client
#[derive(Clone)]
pub struct AuditorClient {
	/// The underlying HTTP client.
	http_client: Client,
	/// Base URL of the auditor API, without a trailing slash.
	base_url: String,
	/// Records requested per page.
	page_size: u64,
	/// Upper bound on pages walked per collection.
	max_pages: u64,
}

impl AuditorClient {
	/// Create a new auditor client.
	///
	/// # Arguments
	/// * `config` - Base URL, paging and timeout settings.
	///
	/// # Returns
	/// A new `AuditorClient`, or an `AuditorError` if the HTTP client cannot be built.
	pub fn new(config: &AuditorConfig) -> Result<Self, AuditorError> {
		config
			.validate()
			.map_err(|e| AuditorError::InvalidUrl(e.to_string()))?;

		let http_client = Client::builder()
			.timeout(config.request_timeout)
			.build()?;

		Ok(Self {
			http_client,
			base_url: config.base_url.trim_end_matches('/').to_string(),
			page_size: config.page_size,
			max_pages: config.max_pages,
		})
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	pub async fn audited_mints(&self) -> Result<Vec<Value>, AuditorError> {
		self.fetch_collection(AUDITED_MINTS_PATH).await
	}

	pub async fn audited_burns(&self) -> Result<Vec<Value>, AuditorError> {
		self.fetch_collection(AUDITED_BURNS_PATH).await
	}

	pub async fn unaudited_mints(&self) -> Result<Vec<Value>, AuditorError> {
		self.fetch_collection(UNAUDITED_MINTS_PATH).await
	}

	pub async fn unaudited_burns(&self) -> Result<Vec<Value>, AuditorError> {
		self.fetch_collection(UNAUDITED_BURNS_PATH).await
	}

	pub async fn unaudited_deposits(&self) -> Result<Vec<Value>, AuditorError> {
		self.fetch_collection(UNAUDITED_DEPOSITS_PATH).await
	}

	pub async fn unaudited_withdrawals(&self) -> Result<Vec<Value>, AuditorError> {
		self.fetch_collection(UNAUDITED_WITHDRAWALS_PATH).await
	}

	/// Fetch the total minted and burned amounts for a token.
	///
	/// # Arguments
	/// * `token_id` - The ledger token id.
	///
	/// # Returns
	/// The parsed balance, or an `AuditorError` if the request fails or the amounts are not integers.
	pub async fn ledger_balance(&self, token_id: u64) -> Result<LedgerBalance, AuditorError> {
		let response = self
			.get_json(LEDGER_BALANCE_PATH, &[("token_id", token_id)])
			.await?;
		let balance: LedgerBalanceResponse = serde_json::from_value(response)?;

		let parse = |field: &str, value: &str| {
			value
				.parse::<u128>()
				.map_err(|e| AuditorError::UnexpectedShape {
					path: LEDGER_BALANCE_PATH.to_string(),
					detail: format!("{} {:?} is not an integer: {}", field, value, e),
				})
		};

		Ok(LedgerBalance {
			token_id,
			mint_balance: parse("mint_balance", &balance.mint_balance)?,
			burn_balance: parse("burn_balance", &balance.burn_balance)?,
		})
	}

	/// Fetch every page of a collection and concatenate them.
	///
	/// Paging stops at the first page shorter than the page size, or after
	/// `max_pages` pages.
	///
	/// # Arguments
	/// * `path` - The collection endpoint, e.g. `/audited_mints`.
	///
	/// # Returns
	/// All raw records in the order the auditor served them.
	pub async fn fetch_collection(&self, path: &str) -> Result<Vec<Value>, AuditorError> {
		let mut records = Vec::new();

		for page in 0..self.max_pages {
			let batch = self.fetch_page(path, page).await?;
			let batch_len = batch.len() as u64;
			records.extend(batch);

			if batch_len < self.page_size {
				break;
			}
			if page + 1 == self.max_pages {
				info!(
					"Stopped paging {} after {} pages ({} records)",
					path,
					self.max_pages,
					records.len()
				);
			}
		}

		debug!("Fetched {} records from {}", records.len(), path);
		Ok(records)
	}

	/// Fetch a single page of a collection.
	pub async fn fetch_page(&self, path: &str, page: u64) -> Result<Vec<Value>, AuditorError> {
		let offset = page * self.page_size;
		let response = self
			.get_json(path, &[("offset", offset), ("limit", self.page_size)])
			.await?;

		match response {
			Value::Array(records) => Ok(records),
			other => Err(AuditorError::UnexpectedShape {
				path: path.to_string(),
				detail: format!("expected a JSON array, got {}", json_kind(&other)),
			}),
		}
	}

	/// Execute a GET request and decode the body as JSON.
	///
	/// # Arguments
	/// * `path` - Path relative to the base URL.
	/// * `query` - Query parameters.
	///
	/// # Returns
	/// The JSON body, or an `AuditorError` on transport failure or a non-success status.
	async fn get_json(&self, path: &str, query: &[(&str, u64)]) -> Result<Value, AuditorError> {
		let url = format!("{}{}", self.base_url, path);

		let response = self.http_client.get(&url).query(query).send().await?;

		if !response.status().is_success() {
			error!("api failure: GET to {} responded with {}", path, response.status());
			return Err(AuditorError::StatusError {
				path: path.to_string(),
				status: response.status(),
			});
		}

		Ok(response.json().await?)
	}
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use httpmock::prelude::*;
	use serde_json::json;

	fn client_for(server: &MockServer, page_size: u64, max_pages: u64) -> AuditorClient {
		AuditorClient::new(&AuditorConfig {
			page_size,
			max_pages,
			..AuditorConfig::new(server.base_url())
		})
		.expect("client should build")
	}

	#[tokio::test]
	async fn test_fetch_collection_walks_pages_until_short_page() {
		let server = MockServer::start_async().await;

		let first = server
			.mock_async(|when, then| {
				when.method(GET)
					.path(UNAUDITED_DEPOSITS_PATH)
					.query_param("offset", "0")
					.query_param("limit", "2");
				then.status(200).json_body(json!([{ "n": 1 }, { "n": 2 }]));
			})
			.await;
		let second = server
			.mock_async(|when, then| {
				when.method(GET)
					.path(UNAUDITED_DEPOSITS_PATH)
					.query_param("offset", "2")
					.query_param("limit", "2");
				then.status(200).json_body(json!([{ "n": 3 }]));
			})
			.await;

		let client = client_for(&server, 2, 10);
		let records = client.unaudited_deposits().await.expect("fetch should succeed");

		first.assert_async().await;
		second.assert_async().await;
		assert_eq!(records, vec![json!({ "n": 1 }), json!({ "n": 2 }), json!({ "n": 3 })]);
	}

	#[tokio::test]
	async fn test_fetch_collection_respects_max_pages() {
		let server = MockServer::start_async().await;

		let full_page = server
			.mock_async(|when, then| {
				when.method(GET).path(AUDITED_MINTS_PATH);
				then.status(200).json_body(json!([{ "n": 1 }]));
			})
			.await;

		let client = client_for(&server, 1, 3);
		let records = client.audited_mints().await.expect("fetch should succeed");

		full_page.assert_hits_async(3).await;
		assert_eq!(records.len(), 3);
	}

	#[tokio::test]
	async fn test_error_status_is_reported() {
		let server = MockServer::start_async().await;

		server
			.mock_async(|when, then| {
				when.method(GET).path(UNAUDITED_WITHDRAWALS_PATH);
				then.status(500).body("boom");
			})
			.await;

		let client = client_for(&server, 50, 1);
		let err = client
			.unaudited_withdrawals()
			.await
			.expect_err("500 must fail");

		match err {
			AuditorError::StatusError { path, status } => {
				assert_eq!(path, UNAUDITED_WITHDRAWALS_PATH);
				assert_eq!(status.as_u16(), 500);
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[tokio::test]
	async fn test_non_array_body_is_rejected() {
		let server = MockServer::start_async().await;

		server
			.mock_async(|when, then| {
				when.method(GET).path(AUDITED_BURNS_PATH);
				then.status(200).json_body(json!({ "burns": [] }));
			})
			.await;

		let client = client_for(&server, 50, 1);
		let err = client.audited_burns().await.expect_err("object body must fail");
		assert!(matches!(err, AuditorError::UnexpectedShape { .. }));
	}

	#[tokio::test]
	async fn test_ledger_balance() {
		let server = MockServer::start_async().await;

		server
			.mock_async(|when, then| {
				when.method(GET)
					.path(LEDGER_BALANCE_PATH)
					.query_param("token_id", "1");
				then.status(200).json_body(json!({
					"mint_balance": "250000000",
					"burn_balance": "50000000",
					"token_type": { "id": 1, "name": "eUSD" }
				}));
			})
			.await;

		let client = client_for(&server, 50, 1);
		let balance = client.ledger_balance(1).await.expect("balance should parse");

		assert_eq!(balance.mint_balance, 250_000_000);
		assert_eq!(balance.burn_balance, 50_000_000);
		assert_eq!(balance.total_supply(), 200_000_000);
	}

	#[test]
	fn test_new_rejects_invalid_config() {
		let result = AuditorClient::new(&AuditorConfig::new("not-a-url"));
		assert!(matches!(result, Err(AuditorError::InvalidUrl(_))));
	}
}
