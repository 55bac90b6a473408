//! The six record collections a reconciliation cycle works on.

use serde::Serialize;
use std::fmt;

/// Which auditor collection a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
	AuditedMints,
	AuditedBurns,
	UnauditedMints,
	UnauditedBurns,
	UnauditedDeposits,
	UnauditedWithdrawals,
}

impl CollectionKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			CollectionKind::AuditedMints => "audited mints",
			CollectionKind::AuditedBurns => "audited burns",
			CollectionKind::UnauditedMints => "unaudited mints",
			CollectionKind::UnauditedBurns => "unaudited burns",
			CollectionKind::UnauditedDeposits => "unaudited deposits",
			CollectionKind::UnauditedWithdrawals => "unaudited withdrawals",
		}
	}
}

impl fmt::Display for CollectionKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One value per auditor collection.
///
/// Iteration always follows the same order (audited mints, audited burns,
/// unaudited mints, unaudited burns, unaudited deposits, unaudited
/// withdrawals); the merge relies on it for stable output.
#[derive(Debug, Clone, PartialEq)]
pub struct Collections<T> {
	pub audited_mints: Vec<T>,
	pub audited_burns: Vec<T>,
	pub unaudited_mints: Vec<T>,
	pub unaudited_burns: Vec<T>,
	pub unaudited_deposits: Vec<T>,
	pub unaudited_withdrawals: Vec<T>,
}

impl<T> Default for Collections<T> {
	fn default() -> Self {
		Self {
			audited_mints: Vec::new(),
			audited_burns: Vec::new(),
			unaudited_mints: Vec::new(),
			unaudited_burns: Vec::new(),
			unaudited_deposits: Vec::new(),
			unaudited_withdrawals: Vec::new(),
		}
	}
}

impl<T> Collections<T> {
	/// Total number of records across all six collections.
	pub fn len(&self) -> usize {
		self.iter().map(|(_, items)| items.len()).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Borrow each collection with its kind, in merge order.
	pub fn iter(&self) -> impl Iterator<Item = (CollectionKind, &Vec<T>)> {
		[
			(CollectionKind::AuditedMints, &self.audited_mints),
			(CollectionKind::AuditedBurns, &self.audited_burns),
			(CollectionKind::UnauditedMints, &self.unaudited_mints),
			(CollectionKind::UnauditedBurns, &self.unaudited_burns),
			(CollectionKind::UnauditedDeposits, &self.unaudited_deposits),
			(CollectionKind::UnauditedWithdrawals, &self.unaudited_withdrawals),
		]
		.into_iter()
	}

	/// Consume into each collection with its kind, in merge order.
	pub fn into_parts(self) -> [(CollectionKind, Vec<T>); 6] {
		[
			(CollectionKind::AuditedMints, self.audited_mints),
			(CollectionKind::AuditedBurns, self.audited_burns),
			(CollectionKind::UnauditedMints, self.unaudited_mints),
			(CollectionKind::UnauditedBurns, self.unaudited_burns),
			(CollectionKind::UnauditedDeposits, self.unaudited_deposits),
			(CollectionKind::UnauditedWithdrawals, self.unaudited_withdrawals),
		]
	}

	pub fn get_mut(&mut self, kind: CollectionKind) -> &mut Vec<T> {
		match kind {
			CollectionKind::AuditedMints => &mut self.audited_mints,
			CollectionKind::AuditedBurns => &mut self.audited_burns,
			CollectionKind::UnauditedMints => &mut self.unaudited_mints,
			CollectionKind::UnauditedBurns => &mut self.unaudited_burns,
			CollectionKind::UnauditedDeposits => &mut self.unaudited_deposits,
			CollectionKind::UnauditedWithdrawals => &mut self.unaudited_withdrawals,
		}
	}
}
