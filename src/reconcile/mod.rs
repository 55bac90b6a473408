//! Reconciliation Module
//!
//! This module turns the six raw auditor collections into one reconciled view:
//! a timeline of every audited and unaudited event, newest first, plus the
//! amounts still in flight between the ledger and the custodial safe.
//!
//! - `record`: Classifies raw records by shape and parses them into typed variants.
//! - `timestamp`: Extracts and parses the date each record is sorted by.
//! - `merge`: Ingests raw collections and merges them into the sorted timeline.
//! - `aggregate`: Sums the amounts awaiting mint and awaiting unwrap.
//! - `orchestrator`: Fetches all collections concurrently and runs a full cycle.
//! - `view`: Publishes the latest complete view and discards stale cycles.
//!
//! The orchestrator reports rejects, completions and failures through the
//! `events` dispatcher so the engine itself never decides how they are logged.

/// "Amount in flight" totals
pub mod aggregate;
/// Per-collection container used throughout a cycle
pub mod collections;
/// Event system for reporting cycle progress
pub mod events;
/// Ingest and timeline merge
pub mod merge;
/// Main coordinator for a reconciliation cycle
pub mod orchestrator;
/// Record classification and typed parsing
pub mod record;
/// Abstraction over where auditor collections come from
pub mod source;
/// Per-cycle statistics
pub mod stats;
/// Date extraction
pub mod timestamp;
/// Atomic publishing of reconciled views
pub mod view;

#[cfg(test)]
mod fixtures;

pub use collections::{CollectionKind, Collections};
pub use events::{EventDispatcher, ReconcileEvent, ReconcileEventHandler, TracingEventHandler};
pub use merge::TimelineEntry;
pub use orchestrator::*;
pub use record::{Category, ReconcileRecord};
pub use source::AuditDataSource;
pub use stats::ReconcileStats;
pub use view::ReconciledViewPublisher;
