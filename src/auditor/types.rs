//! Types for records served by the reserve auditor

use serde::{Deserialize, Serialize};

/// A mint transaction observed on the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MintRecord {
    /// Auditor database id, when present.
    #[serde(default)]
    pub id: Option<i64>,
    /// The ledger block this mint appeared in.
    pub block_index: u64,
    /// Block timestamp as served by the auditor (ISO-8601, precision varies).
    #[serde(default)]
    pub block_timestamp: Option<String>,
    /// The ledger token id being minted.
    pub token_id: u64,
    /// Amount in token base units.
    pub amount: u64,
    /// Mint nonce, hex encoded.
    pub nonce_hex: String,
    /// Recipient public address.
    #[serde(alias = "recipient_b58_addr")]
    pub recipient_address: String,
    /// Block after which the mint tx would have expired.
    pub tombstone_block: u64,
    /// The mint config this tx was matched with, if any.
    #[serde(default)]
    pub mint_config_id: Option<i64>,
}

/// A burn TxOut observed on the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BurnRecord {
    /// Auditor database id, when present.
    #[serde(default)]
    pub id: Option<i64>,
    /// The ledger block this burn appeared in.
    pub block_index: u64,
    /// Block timestamp as served by the auditor (ISO-8601, precision varies).
    #[serde(default)]
    pub block_timestamp: Option<String>,
    /// The ledger token id being burned.
    pub token_id: u64,
    /// Amount in token base units.
    pub amount: u64,
    /// TxOut public key, hex encoded.
    pub public_key_hex: String,
}

/// An inbound transfer to the custodial safe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DepositRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub eth_tx_hash: String,
    pub eth_block_number: u64,
    /// Safe execution date (RFC 3339).
    #[serde(default)]
    pub execution_date: Option<String>,
    pub safe_addr: String,
    pub token_addr: String,
    #[serde(default)]
    pub from_addr: Option<String>,
    pub amount: u64,
    /// Nonce of the ledger mint this deposit is expected to produce.
    #[serde(alias = "expected_mc_mint_tx_nonce_hex")]
    pub expected_mint_nonce_hex: String,
}

/// An outbound transfer from the custodial safe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WithdrawalRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub eth_tx_hash: String,
    pub eth_block_number: u64,
    /// Safe execution date (RFC 3339).
    #[serde(default)]
    pub execution_date: Option<String>,
    pub safe_addr: String,
    pub token_addr: String,
    #[serde(default)]
    pub to_addr: Option<String>,
    pub amount: u64,
    /// Public key of the burn TxOut this withdrawal redeems.
    pub mc_tx_out_public_key_hex: String,
}

/// Link between a mint tx and the deposit that backs it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditedMintLink {
    #[serde(default)]
    pub id: Option<i64>,
    pub mint_tx_id: i64,
    #[serde(alias = "gnosis_safe_deposit_id")]
    pub deposit_id: i64,
}

/// Link between a burn TxOut and the withdrawal that redeems it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditedBurnLink {
    #[serde(default)]
    pub id: Option<i64>,
    pub burn_tx_out_id: i64,
    #[serde(alias = "gnosis_safe_withdrawal_id")]
    pub withdrawal_id: i64,
}

/// A mint proven to match a deposit 1:1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditedMint {
    pub audited: AuditedMintLink,
    pub mint: MintRecord,
    pub deposit: DepositRecord,
}

/// A burn proven to match a withdrawal 1:1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditedBurn {
    pub audited: AuditedBurnLink,
    pub burn: BurnRecord,
    pub withdrawal: WithdrawalRecord,
}

/// A burn with no matching withdrawal yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnauditedBurn {
    pub burn: BurnRecord,
    /// Decoded burn redemption memo.
    #[serde(default, alias = "decoded_burn_memo_bytes")]
    pub decoded_memo_bytes: Vec<u8>,
}

impl UnauditedBurn {
    /// The redemption memo as a hex string, for display.
    pub fn memo_hex(&self) -> String {
        hex::encode(&self.decoded_memo_bytes)
    }
}

/// A deposit with no matching mint yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnauditedDeposit {
    pub deposit: DepositRecord,
}

/// Total minted and burned amounts for a token, as decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerBalanceResponse {
    pub mint_balance: String,
    pub burn_balance: String,
}

/// Parsed ledger balance for a single token.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct LedgerBalance {
    pub token_id: u64,
    pub mint_balance: u128,
    pub burn_balance: u128,
}

impl LedgerBalance {
    /// Outstanding supply: everything minted that has not been burned.
    pub fn total_supply(&self) -> u128 {
        self.mint_balance.saturating_sub(self.burn_balance)
    }
}

/// Error types for auditor API requests
#[derive(Debug, thiserror::Error)]
pub enum AuditorError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("GET {path} responded with {status}")]
    StatusError {
        path: String,
        status: reqwest::StatusCode,
    },

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unexpected response shape from {path}: {detail}")]
    UnexpectedShape { path: String, detail: String },

    #[error("Invalid auditor URL: {0}")]
    InvalidUrl(String),
}
