//! Reconciled, read-only view of a bridged stablecoin's reserve audit.
//!
//! Records come from the reserve auditor's HTTP API ([`auditor`]), are
//! classified and merged into one timeline ([`reconcile`]), and are published
//! as a single view per cycle.

pub mod auditor;
pub mod config;
pub mod reconcile;
pub mod utils;
