//! Record classification.
//!
//! The auditor serves six record shapes without a type tag. This module tells
//! them apart by which fields are present and parses each raw record into a
//! tagged [`ReconcileRecord`] as soon as it is received, so nothing downstream
//! has to inspect shapes again.
//!
//! Precedence matters: audited records also carry a `mint` or `burn` field, so
//! the audited checks must run before the bare-burn check.

use crate::auditor::{
    AuditedBurn, AuditedMint, MintRecord, UnauditedBurn, UnauditedDeposit, WithdrawalRecord,
};
use crate::utils::{normalize_keys, snake_to_camel};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Display category of a reconciled record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    AuditedMint,
    AuditedBurn,
    UnauditedMint,
    UnauditedBurn,
    UnauditedDeposit,
    UnauditedWithdrawal,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::AuditedMint,
        Category::AuditedBurn,
        Category::UnauditedMint,
        Category::UnauditedBurn,
        Category::UnauditedDeposit,
        Category::UnauditedWithdrawal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::AuditedMint => "audited_mint",
            Category::AuditedBurn => "audited_burn",
            Category::UnauditedMint => "unaudited_mint",
            Category::UnauditedBurn => "unaudited_burn",
            Category::UnauditedDeposit => "unaudited_deposit",
            Category::UnauditedWithdrawal => "unaudited_withdrawal",
        }
    }

    pub fn is_audited(&self) -> bool {
        matches!(self, Category::AuditedMint | Category::AuditedBurn)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record that matches none of the known shapes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("record matches no known shape: {record}")]
pub struct ClassificationError {
    /// The offending record, kept for diagnostics.
    pub record: Value,
}

/// Why a raw record was excluded from a cycle.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error(transparent)]
    Unclassifiable(#[from] ClassificationError),

    #[error("record classified as {category} but could not be parsed: {source}")]
    Malformed {
        category: Category,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Timestamp(#[from] super::timestamp::TimestampError),
}

/// Field presence, accepting both the auditor's snake_case and the
/// dashboard's camelCase spelling.
fn has_field(object: &Map<String, Value>, name: &str) -> bool {
    object.contains_key(name) || object.contains_key(&snake_to_camel(name))
}

/// Classify a raw auditor record by its shape.
///
/// Rules, first match wins:
/// 1. `audited` and `mint` => audited mint
/// 2. `audited` and `burn` => audited burn
/// 3. `mint_config_id` => unaudited mint
/// 4. `burn` => unaudited burn
/// 5. `deposit` => unaudited deposit
/// 6. `execution_date` => unaudited withdrawal
pub fn classify(record: &Value) -> Result<Category, ClassificationError> {
    let unclassifiable = || ClassificationError {
        record: record.clone(),
    };
    let object = record.as_object().ok_or_else(unclassifiable)?;

    let audited = has_field(object, "audited");
    if audited && has_field(object, "mint") {
        return Ok(Category::AuditedMint);
    }
    if audited && has_field(object, "burn") {
        return Ok(Category::AuditedBurn);
    }
    if has_field(object, "mint_config_id") {
        return Ok(Category::UnauditedMint);
    }
    if has_field(object, "burn") {
        return Ok(Category::UnauditedBurn);
    }
    if has_field(object, "deposit") {
        return Ok(Category::UnauditedDeposit);
    }
    if has_field(object, "execution_date") {
        return Ok(Category::UnauditedWithdrawal);
    }

    Err(unclassifiable())
}

/// A classified auditor record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ReconcileRecord {
    AuditedMint(AuditedMint),
    AuditedBurn(AuditedBurn),
    UnauditedMint(MintRecord),
    UnauditedBurn(UnauditedBurn),
    UnauditedDeposit(UnauditedDeposit),
    UnauditedWithdrawal(WithdrawalRecord),
}

impl ReconcileRecord {
    /// Normalise keys, classify, and parse a raw record into its tagged variant.
    pub fn parse(raw: Value) -> Result<Self, RecordError> {
        let normalized = normalize_keys(raw);
        let category = classify(&normalized)?;

        let malformed = |source: serde_json::Error| RecordError::Malformed { category, source };
        let record = match category {
            Category::AuditedMint => {
                ReconcileRecord::AuditedMint(serde_json::from_value(normalized).map_err(malformed)?)
            }
            Category::AuditedBurn => {
                ReconcileRecord::AuditedBurn(serde_json::from_value(normalized).map_err(malformed)?)
            }
            Category::UnauditedMint => ReconcileRecord::UnauditedMint(
                serde_json::from_value(normalized).map_err(malformed)?,
            ),
            Category::UnauditedBurn => ReconcileRecord::UnauditedBurn(
                serde_json::from_value(normalized).map_err(malformed)?,
            ),
            Category::UnauditedDeposit => ReconcileRecord::UnauditedDeposit(
                serde_json::from_value(normalized).map_err(malformed)?,
            ),
            Category::UnauditedWithdrawal => ReconcileRecord::UnauditedWithdrawal(
                serde_json::from_value(normalized).map_err(malformed)?,
            ),
        };

        Ok(record)
    }

    pub fn category(&self) -> Category {
        match self {
            ReconcileRecord::AuditedMint(_) => Category::AuditedMint,
            ReconcileRecord::AuditedBurn(_) => Category::AuditedBurn,
            ReconcileRecord::UnauditedMint(_) => Category::UnauditedMint,
            ReconcileRecord::UnauditedBurn(_) => Category::UnauditedBurn,
            ReconcileRecord::UnauditedDeposit(_) => Category::UnauditedDeposit,
            ReconcileRecord::UnauditedWithdrawal(_) => Category::UnauditedWithdrawal,
        }
    }

    /// The amount shown for this record, in token base units.
    ///
    /// Audited pairs report the ledger-side amount.
    pub fn amount(&self) -> u64 {
        match self {
            ReconcileRecord::AuditedMint(r) => r.mint.amount,
            ReconcileRecord::AuditedBurn(r) => r.burn.amount,
            ReconcileRecord::UnauditedMint(r) => r.amount,
            ReconcileRecord::UnauditedBurn(r) => r.burn.amount,
            ReconcileRecord::UnauditedDeposit(r) => r.deposit.amount,
            ReconcileRecord::UnauditedWithdrawal(r) => r.amount,
        }
    }

    /// Ledger token id, for records that have a ledger side.
    pub fn token_id(&self) -> Option<u64> {
        match self {
            ReconcileRecord::AuditedMint(r) => Some(r.mint.token_id),
            ReconcileRecord::AuditedBurn(r) => Some(r.burn.token_id),
            ReconcileRecord::UnauditedMint(r) => Some(r.token_id),
            ReconcileRecord::UnauditedBurn(r) => Some(r.burn.token_id),
            ReconcileRecord::UnauditedDeposit(_) | ReconcileRecord::UnauditedWithdrawal(_) => None,
        }
    }
}
