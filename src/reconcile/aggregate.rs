//! "Amount in flight" totals.
//!
//! Both totals are plain sums in token base units over every classified
//! record, whether or not it could be dated. Amounts are `u64` on the wire and
//! are accumulated in `u128`, so no realistic volume can overflow.

use super::collections::Collections;
use super::record::ReconcileRecord;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    /// Deposited into the safe, not yet minted on the ledger.
    pub total_awaiting_mint: u128,
    /// Burned on the ledger, not yet withdrawn from the safe.
    pub total_awaiting_unwrap: u128,
}

/// Sum of unaudited deposit amounts.
pub fn total_awaiting_mint(deposits: &[ReconcileRecord]) -> u128 {
    deposits
        .iter()
        .filter_map(|record| match record {
            ReconcileRecord::UnauditedDeposit(d) => Some(u128::from(d.deposit.amount)),
            _ => None,
        })
        .sum()
}

/// Sum of unaudited burn amounts for `token_id`.
pub fn total_awaiting_unwrap(burns: &[ReconcileRecord], token_id: u64) -> u128 {
    burns
        .iter()
        .filter_map(|record| match record {
            ReconcileRecord::UnauditedBurn(b) if b.burn.token_id == token_id => {
                Some(u128::from(b.burn.amount))
            }
            _ => None,
        })
        .sum()
}

pub fn aggregate(collections: &Collections<ReconcileRecord>, token_id: u64) -> Totals {
    Totals {
        total_awaiting_mint: total_awaiting_mint(&collections.unaudited_deposits),
        total_awaiting_unwrap: total_awaiting_unwrap(&collections.unaudited_burns, token_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::fixtures::*;
    use crate::reconcile::merge::ingest;

    #[test]
    fn test_awaiting_mint_sums_deposits() {
        let ingested = ingest(Collections {
            unaudited_deposits: vec![unaudited_deposit("2023-02-26", 100_000_000_000)],
            ..Default::default()
        });
        let totals = aggregate(&ingested.records, 1);
        assert_eq!(totals.total_awaiting_mint, 100_000_000_000);
        assert_eq!(totals.total_awaiting_unwrap, 0);
    }

    #[test]
    fn test_undated_deposit_still_counts() {
        let ingested = ingest(Collections {
            unaudited_deposits: vec![undated_deposit(40), unaudited_deposit("2023-02-26", 2)],
            ..Default::default()
        });
        assert_eq!(aggregate(&ingested.records, 1).total_awaiting_mint, 42);
    }

    #[test]
    fn test_awaiting_unwrap_counts_only_requested_token() {
        let ingested = ingest(Collections {
            unaudited_burns: vec![
                unaudited_burn("2023-02-26", 1, 10),
                unaudited_burn("2023-02-26", 2, 1_000),
                unaudited_burn("2023-02-27", 1, 15),
            ],
            ..Default::default()
        });
        assert_eq!(total_awaiting_unwrap(&ingested.records.unaudited_burns, 1), 25);
        assert_eq!(total_awaiting_unwrap(&ingested.records.unaudited_burns, 2), 1_000);
    }

    #[test]
    fn test_sums_do_not_overflow_u64() {
        let ingested = ingest(Collections {
            unaudited_deposits: vec![
                unaudited_deposit("2023-02-26", u64::MAX),
                unaudited_deposit("2023-02-26", u64::MAX),
            ],
            ..Default::default()
        });
        assert_eq!(
            total_awaiting_mint(&ingested.records.unaudited_deposits),
            u128::from(u64::MAX) * 2
        );
    }

    #[test]
    fn test_other_variants_are_ignored() {
        // A withdrawal that ended up in the deposit collection adds nothing.
        let ingested = ingest(Collections {
            unaudited_deposits: vec![
                unaudited_withdrawal("2023-02-26"),
                unaudited_deposit("2023-02-26", 7),
            ],
            ..Default::default()
        });
        assert_eq!(total_awaiting_mint(&ingested.records.unaudited_deposits), 7);
    }
}
