//! JSON fixtures shaped like auditor responses.

use super::collections::{CollectionKind, Collections};
use super::source::AuditDataSource;
use crate::auditor::AuditorError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use serde_json::{Value, json};

pub fn mint_record(timestamp: &str, amount: u64) -> Value {
    json!({
        "id": 1,
        "block_index": 1000,
        "block_timestamp": timestamp,
        "token_id": 1,
        "amount": amount,
        "nonce_hex": "aa00",
        "recipient_b58_addr": "recipient",
        "tombstone_block": 1100,
        "protobuf": [1, 2, 3],
        "mint_config_id": 7
    })
}

pub fn burn_record(timestamp: &str, token_id: u64, amount: u64) -> Value {
    json!({
        "id": 2,
        "block_index": 2000,
        "block_timestamp": timestamp,
        "token_id": token_id,
        "amount": amount,
        "public_key_hex": "bb11",
        "protobuf": [4, 5, 6]
    })
}

pub fn deposit_record(timestamp: &str, amount: u64) -> Value {
    json!({
        "id": 3,
        "eth_tx_hash": "0xdeposit",
        "eth_block_number": 16_000_000,
        "execution_date": timestamp,
        "safe_addr": "0xsafe",
        "token_addr": "0xtoken",
        "from_addr": "0xfrom",
        "amount": amount,
        "expected_mc_mint_tx_nonce_hex": "aa00"
    })
}

pub fn withdrawal_record(timestamp: &str, amount: u64) -> Value {
    json!({
        "id": 4,
        "eth_tx_hash": "0xwithdrawal",
        "eth_block_number": 16_000_100,
        "execution_date": timestamp,
        "safe_addr": "0xsafe",
        "token_addr": "0xtoken",
        "to_addr": "0xto",
        "amount": amount,
        "mc_tx_out_public_key_hex": "bb11"
    })
}

pub fn audited_mint(timestamp: &str) -> Value {
    json!({
        "audited": { "id": 1, "mint_tx_id": 1, "gnosis_safe_deposit_id": 3 },
        "mint": mint_record(timestamp, 500),
        "deposit": deposit_record(timestamp, 500),
    })
}

pub fn audited_burn(timestamp: &str) -> Value {
    json!({
        "audited": { "id": 2, "burn_tx_out_id": 2, "gnosis_safe_withdrawal_id": 4 },
        "burn": burn_record(timestamp, 1, 300),
        "withdrawal": withdrawal_record(timestamp, 300),
    })
}

pub fn unaudited_mint(timestamp: &str) -> Value {
    mint_record(timestamp, 700)
}

pub fn unaudited_burn(timestamp: &str, token_id: u64, amount: u64) -> Value {
    json!({
        "burn": burn_record(timestamp, token_id, amount),
        "decoded_burn_memo_bytes": [1, 2],
    })
}

pub fn unaudited_deposit(timestamp: &str, amount: u64) -> Value {
    json!({ "deposit": deposit_record(timestamp, amount) })
}

/// An unaudited deposit whose safe transaction has no execution date yet.
pub fn undated_deposit(amount: u64) -> Value {
    let mut record = unaudited_deposit("2000-01-01", amount);
    if let Some(deposit) = record["deposit"].as_object_mut() {
        deposit.remove("execution_date");
    }
    record
}

pub fn unaudited_withdrawal(timestamp: &str) -> Value {
    withdrawal_record(timestamp, 900)
}

/// Shared knobs for a [`FakeSource`], kept by the test after the source has
/// been moved into an orchestrator.
#[derive(Default)]
pub struct FakeControls {
    /// Collection whose fetch fails.
    pub fail_on: Mutex<Option<CollectionKind>>,
    /// Block the next `audited_mints` fetch forever.
    pub hold_next: AtomicBool,
    /// Notified when a held fetch has started.
    pub held: Notify,
}

/// In-memory source serving fixed collections.
pub struct FakeSource {
    pub data: Collections<Value>,
    pub controls: Arc<FakeControls>,
}

impl FakeSource {
    pub fn new(data: Collections<Value>) -> (Self, Arc<FakeControls>) {
        let controls = Arc::new(FakeControls::default());
        (
            Self {
                data,
                controls: controls.clone(),
            },
            controls,
        )
    }

    async fn serve(&self, kind: CollectionKind) -> Result<Vec<Value>, AuditorError> {
        if kind == CollectionKind::AuditedMints && self.controls.hold_next.swap(false, Ordering::SeqCst)
        {
            self.controls.held.notify_one();
            std::future::pending::<()>().await;
        }
        tokio::task::yield_now().await;

        if *self.controls.fail_on.lock().unwrap() == Some(kind) {
            return Err(AuditorError::UnexpectedShape {
                path: kind.as_str().to_string(),
                detail: "injected failure".to_string(),
            });
        }

        let records = self
            .data
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, records)| records.clone())
            .unwrap_or_default();
        Ok(records)
    }
}

#[async_trait]
impl AuditDataSource for FakeSource {
    async fn audited_mints(&self) -> Result<Vec<Value>, AuditorError> {
        self.serve(CollectionKind::AuditedMints).await
    }

    async fn audited_burns(&self) -> Result<Vec<Value>, AuditorError> {
        self.serve(CollectionKind::AuditedBurns).await
    }

    async fn unaudited_mints(&self) -> Result<Vec<Value>, AuditorError> {
        self.serve(CollectionKind::UnauditedMints).await
    }

    async fn unaudited_burns(&self) -> Result<Vec<Value>, AuditorError> {
        self.serve(CollectionKind::UnauditedBurns).await
    }

    async fn unaudited_deposits(&self) -> Result<Vec<Value>, AuditorError> {
        self.serve(CollectionKind::UnauditedDeposits).await
    }

    async fn unaudited_withdrawals(&self) -> Result<Vec<Value>, AuditorError> {
        self.serve(CollectionKind::UnauditedWithdrawals).await
    }

    fn name(&self) -> &'static str {
        "FakeSource"
    }
}
