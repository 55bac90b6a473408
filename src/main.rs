//! Reserve audit view.
//!
//! Runs one reconciliation cycle against the reserve auditor and prints the
//! resulting timeline and totals.
//!
//! ```bash
//! AUDITOR_URL=https://auditor.example reserve-audit-view --retry-for 60
//! reserve-audit-view --json > view.json
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use backoff::{ExponentialBackoff, future::retry};
use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use reserve_audit_view::auditor::AuditorClient;
use reserve_audit_view::config::{
	AuditorConfig, DEFAULT_CANONICAL_TOKEN_ID, DEFAULT_MAX_PAGES, DEFAULT_OVERDUE_AFTER_DAYS,
	DEFAULT_PAGE_SIZE, DEFAULT_REQUEST_TIMEOUT_SECS, ReconcileConfig,
};
use reserve_audit_view::reconcile::{
	ReconcileError, ReconcileOrchestrator, ReconcileRecord, ReconciledView,
	ReconciledViewPublisher, TimelineEntry,
};
use reserve_audit_view::utils::{EUSD_DECIMALS, format_token_amount};

#[derive(Parser, Debug)]
#[command(name = "reserve-audit-view")]
#[command(about = "Reconciled timeline of ledger mints/burns against custodial deposits/withdrawals")]
#[command(version)]
struct Cli {
	/// Reserve auditor base URL.
	#[arg(long, env = "AUDITOR_URL", default_value = "http://localhost:7774")]
	auditor_url: String,

	/// Ledger token id whose burns are audited.
	#[arg(long, env = "CANONICAL_TOKEN_ID", default_value_t = DEFAULT_CANONICAL_TOKEN_ID)]
	canonical_token_id: u64,

	/// Records requested per page.
	#[arg(long, env = "PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
	page_size: u64,

	/// Upper bound on pages fetched per collection.
	#[arg(long, env = "MAX_PAGES", default_value_t = DEFAULT_MAX_PAGES)]
	max_pages: u64,

	/// Per-request timeout in seconds.
	#[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
	request_timeout_secs: u64,

	/// Days after which an unaudited burn is flagged as overdue.
	#[arg(long, env = "OVERDUE_AFTER_DAYS", default_value_t = DEFAULT_OVERDUE_AFTER_DAYS)]
	overdue_after_days: i64,

	/// Keep retrying failed fetches for up to this many seconds. 0 disables retries.
	#[arg(long, default_value_t = 0)]
	retry_for: u64,

	/// Print the view as JSON instead of a table.
	#[arg(long)]
	json: bool,

	/// Also print the canonical token's ledger balance.
	#[arg(long)]
	ledger_balance: bool,

	/// Log level (trace, debug, info, warn, error).
	#[arg(long, env = "LOG_LEVEL", default_value = "info")]
	log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
	dotenvy::dotenv().ok();
	let cli = Cli::parse();
	init_tracing(&cli.log_level);

	let auditor_config = AuditorConfig {
		page_size: cli.page_size,
		max_pages: cli.max_pages,
		request_timeout: Duration::from_secs(cli.request_timeout_secs),
		..AuditorConfig::new(&cli.auditor_url)
	};
	auditor_config
		.validate()
		.context("invalid auditor configuration")?;

	let reconcile_config = ReconcileConfig {
		canonical_token_id: cli.canonical_token_id,
		overdue_after: chrono::Duration::days(cli.overdue_after_days),
	};
	reconcile_config
		.validate()
		.context("invalid reconcile configuration")?;

	let client = AuditorClient::new(&auditor_config).context("failed to build auditor client")?;
	info!("Reading audit data from {}", client.base_url());

	let orchestrator = Arc::new(ReconcileOrchestrator::new(
		client.clone(),
		reconcile_config.clone(),
	));
	let publisher = ReconciledViewPublisher::new(orchestrator);

	let view = reload_with_retry(&publisher, Duration::from_secs(cli.retry_for))
		.await
		.context("failed to load reconciled view")?;

	if cli.json {
		println!("{}", serde_json::to_string_pretty(&*view)?);
	} else {
		print_view(&view, &reconcile_config);
	}

	if cli.ledger_balance {
		let balance = client
			.ledger_balance(reconcile_config.canonical_token_id)
			.await
			.context("failed to read ledger balance")?;
		if cli.json {
			println!("{}", serde_json::to_string_pretty(&balance)?);
		} else {
			println!(
				"Ledger token {}: minted {}, burned {}, supply {} eUSD",
				balance.token_id,
				format_token_amount(balance.mint_balance, EUSD_DECIMALS),
				format_token_amount(balance.burn_balance, EUSD_DECIMALS),
				format_token_amount(balance.total_supply(), EUSD_DECIMALS),
			);
		}
	}

	Ok(())
}

/// Reload, retrying fetch failures until `retry_for` has elapsed.
async fn reload_with_retry(
	publisher: &ReconciledViewPublisher<AuditorClient>,
	retry_for: Duration,
) -> Result<Arc<ReconciledView>, ReconcileError> {
	let policy = ExponentialBackoff {
		max_elapsed_time: Some(retry_for),
		..ExponentialBackoff::default()
	};

	retry(policy, || async {
		publisher.reload().await.map_err(|e| match e {
			ReconcileError::FetchError { .. } => {
				warn!("{}", e);
				backoff::Error::transient(e)
			}
			other => backoff::Error::permanent(other),
		})
	})
	.await
}

fn print_view(view: &ReconciledView, config: &ReconcileConfig) {
	let now = Utc::now();

	for entry in &view.sorted_data {
		let marker = if entry.is_overdue(now, config.overdue_after) {
			"  OVERDUE"
		} else {
			""
		};
		println!(
			"{}  {:<22} {:>24} eUSD  {}{}",
			entry.occurred_at.format("%Y-%m-%d %H:%M:%S"),
			entry.category().as_str(),
			format_token_amount(u128::from(entry.record.amount()), EUSD_DECIMALS),
			reference(entry),
			marker,
		);
	}

	println!();
	println!(
		"Awaiting mint:   {} eUSD",
		format_token_amount(view.total_awaiting_mint, EUSD_DECIMALS)
	);
	println!(
		"Awaiting unwrap: {} eUSD",
		format_token_amount(view.total_awaiting_unwrap, EUSD_DECIMALS)
	);
	println!("{}", view.stats.summary());
}

/// The identifier an operator would look the record up by.
fn reference(entry: &TimelineEntry) -> String {
	match &entry.record {
		ReconcileRecord::AuditedMint(r) => r.deposit.eth_tx_hash.clone(),
		ReconcileRecord::AuditedBurn(r) => r.withdrawal.eth_tx_hash.clone(),
		ReconcileRecord::UnauditedMint(r) => format!("nonce {}", r.nonce_hex),
		ReconcileRecord::UnauditedBurn(r) => format!("memo {}", r.memo_hex()),
		ReconcileRecord::UnauditedDeposit(r) => r.deposit.eth_tx_hash.clone(),
		ReconcileRecord::UnauditedWithdrawal(r) => r.eth_tx_hash.clone(),
	}
}

fn init_tracing(level: &str) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_thread_ids(false)
		.with_thread_names(false)
		.with_file(false)
		.with_line_number(false)
		.with_timer(tracing_subscriber::fmt::time::time())
		.init();
}
