//! Configuration for the auditor client and the reconciliation engine.
//!
//! Both structs are plain values built once at startup and handed to the
//! components that need them. Nothing here reads the environment; the binary
//! maps its CLI/env flags onto these types.

use std::time::Duration;

/// Default number of records requested per page, matching the auditor's
/// dashboard paging.
pub const DEFAULT_PAGE_SIZE: u64 = 50;

pub const DEFAULT_MAX_PAGES: u64 = 100;

/// Per-request timeout, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Token id of eUSD on the MobileCoin ledger.
pub const DEFAULT_CANONICAL_TOKEN_ID: u64 = 1;

/// Unaudited burns older than this are flagged as overdue.
pub const DEFAULT_OVERDUE_AFTER_DAYS: i64 = 7;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
	#[error("auditor base URL must not be empty")]
	EmptyBaseUrl,

	#[error("auditor base URL must start with http:// or https://, got {0}")]
	UnsupportedScheme(String),

	#[error("page size must be greater than zero")]
	ZeroPageSize,

	#[error("max pages must be greater than zero")]
	ZeroMaxPages,

	#[error("overdue threshold must be positive, got {0} days")]
	NonPositiveOverdue(i64),
}

/// Connection and paging settings for the reserve auditor API.
#[derive(Debug, Clone)]
pub struct AuditorConfig {
	/// Base URL of the auditor HTTP API, without a trailing slash.
	pub base_url: String,
	/// Records requested per page.
	pub page_size: u64,
	/// Upper bound on pages fetched per collection.
	pub max_pages: u64,
	/// Per-request timeout.
	pub request_timeout: Duration,
}

impl AuditorConfig {
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into().trim_end_matches('/').to_string(),
			..Self::default()
		}
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.base_url.is_empty() {
			return Err(ConfigError::EmptyBaseUrl);
		}
		if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
			return Err(ConfigError::UnsupportedScheme(self.base_url.clone()));
		}
		if self.page_size == 0 {
			return Err(ConfigError::ZeroPageSize);
		}
		if self.max_pages == 0 {
			return Err(ConfigError::ZeroMaxPages);
		}
		Ok(())
	}
}

impl Default for AuditorConfig {
	fn default() -> Self {
		Self {
			base_url: "http://localhost:7774".to_string(),
			page_size: DEFAULT_PAGE_SIZE,
			max_pages: DEFAULT_MAX_PAGES,
			request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
		}
	}
}

/// Settings for a reconciliation cycle.
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
	/// The one ledger token this view audits. Burns of any other token are
	/// dropped before merging and aggregation.
	pub canonical_token_id: u64,
	/// Age after which an unaudited burn is reported as overdue.
	pub overdue_after: chrono::Duration,
}

impl ReconcileConfig {
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.overdue_after <= chrono::Duration::zero() {
			return Err(ConfigError::NonPositiveOverdue(self.overdue_after.num_days()));
		}
		Ok(())
	}
}

impl Default for ReconcileConfig {
	fn default() -> Self {
		Self {
			canonical_token_id: DEFAULT_CANONICAL_TOKEN_ID,
			overdue_after: chrono::Duration::days(DEFAULT_OVERDUE_AFTER_DAYS),
		}
	}
}
