//!
//! Utility module for the audit view.
//!
//! Amount formatting for display and JSON key normalisation for auditor records.
/// Formatting and key helpers
pub mod index;

pub use index::{
	EUSD_DECIMALS, camel_to_snake, format_token_amount, normalize_keys, snake_to_camel,
};
