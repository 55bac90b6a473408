//! Reserve auditor integration module
//!
//! This module provides the HTTP client and record types for reading audit
//! results from the reserve auditor. The auditor pairs ledger mints and burns
//! with custodial-safe deposits and withdrawals; this crate only reads what it
//! has already computed.

/// HTTP client for the auditor API
mod client;
/// Record and error types served by the auditor
mod types;

pub use client::*;
pub use types::*;
