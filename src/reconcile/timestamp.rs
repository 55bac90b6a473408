//! Timestamp extraction for sorting.
//!
//! Ledger blocks are stamped by the auditor as naive date-times, while safe
//! executions come back as RFC 3339 strings. Both are parsed to `DateTime<Utc>`
//! before any comparison; naive values are taken as UTC and bare dates as
//! midnight UTC.

use super::record::ReconcileRecord;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    #[error("timestamp field {field} is missing")]
    Missing { field: &'static str },

    #[error("timestamp field {field} has unparseable value {value:?}")]
    Unparseable { field: &'static str, value: String },
}

/// Parse an ISO-8601 timestamp in any of the forms the auditor emits.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// The field a record is dated by, and its raw value.
pub fn date_field(record: &ReconcileRecord) -> (&'static str, Option<&str>) {
    match record {
        ReconcileRecord::AuditedMint(r) => ("mint.block_timestamp", r.mint.block_timestamp.as_deref()),
        ReconcileRecord::AuditedBurn(r) => ("burn.block_timestamp", r.burn.block_timestamp.as_deref()),
        ReconcileRecord::UnauditedMint(r) => ("block_timestamp", r.block_timestamp.as_deref()),
        ReconcileRecord::UnauditedBurn(r) => ("burn.block_timestamp", r.burn.block_timestamp.as_deref()),
        ReconcileRecord::UnauditedDeposit(r) => {
            ("deposit.execution_date", r.deposit.execution_date.as_deref())
        }
        ReconcileRecord::UnauditedWithdrawal(r) => ("execution_date", r.execution_date.as_deref()),
    }
}

/// Extract the instant a record is sorted by.
pub fn extract_date(record: &ReconcileRecord) -> Result<DateTime<Utc>, TimestampError> {
    let (field, value) = date_field(record);
    let value = value.ok_or(TimestampError::Missing { field })?;

    parse_timestamp(value).ok_or_else(|| TimestampError::Unparseable {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::fixtures::*;
    use chrono::TimeZone;
    use serde_json::Value;

    fn parsed(raw: Value) -> ReconcileRecord {
        ReconcileRecord::parse(raw).expect("fixture must parse")
    }

    #[test]
    fn test_parse_timestamp_forms() {
        let midnight = Utc.with_ymd_and_hms(2023, 2, 26, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2023-02-26"), Some(midnight));
        assert_eq!(parse_timestamp("2023-02-26T00:00:00"), Some(midnight));
        assert_eq!(parse_timestamp("2023-02-26 00:00:00"), Some(midnight));
        assert_eq!(parse_timestamp("2023-02-26T00:00:00Z"), Some(midnight));
        assert_eq!(parse_timestamp("2023-02-26T01:00:00+01:00"), Some(midnight));

        let precise = parse_timestamp("2023-02-26T12:30:45.123456").unwrap();
        assert_eq!(precise.timestamp_subsec_micros(), 123_456);
        assert!(parse_timestamp("2023-02-26T12:30:45.1Z").unwrap() > midnight);

        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_precision_differences_compare_as_instants() {
        // Lexically "2023-02-26T10:00:00.5" > "2023-02-26T10:00:00Z", but both
        // are the same second; the fractional one is later.
        let a = parse_timestamp("2023-02-26T10:00:00Z").unwrap();
        let b = parse_timestamp("2023-02-26T10:00:00.5").unwrap();
        let c = parse_timestamp("2023-02-26T09:00:00-02:00").unwrap();
        assert!(b > a);
        assert!(c > b);
    }

    #[test]
    fn test_extract_date_uses_category_field() {
        let expected = Utc.with_ymd_and_hms(2023, 2, 26, 0, 0, 0).unwrap();

        for raw in [
            audited_mint("2023-02-26"),
            audited_burn("2023-02-26"),
            unaudited_mint("2023-02-26"),
            unaudited_burn("2023-02-26", 1, 10),
            unaudited_deposit("2023-02-26", 10),
            unaudited_withdrawal("2023-02-26"),
        ] {
            let record = parsed(raw);
            assert_eq!(extract_date(&record), Ok(expected), "{:?}", record.category());
        }
    }

    #[test]
    fn test_audited_mint_uses_ledger_side_date() {
        let mut raw = audited_mint("2023-02-26");
        raw["deposit"]["execution_date"] = Value::from("2023-01-01T00:00:00Z");
        let date = extract_date(&parsed(raw)).unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2023, 2, 26, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_missing_and_unparseable_timestamps() {
        let mut raw = unaudited_withdrawal("2023-02-25");
        raw["execution_date"] = Value::Null;
        // A null execution_date still classifies as a withdrawal.
        let record = parsed(raw);
        assert_eq!(
            extract_date(&record),
            Err(TimestampError::Missing {
                field: "execution_date"
            })
        );

        let record = parsed(unaudited_deposit("not a date", 10));
        assert_eq!(
            extract_date(&record),
            Err(TimestampError::Unparseable {
                field: "deposit.execution_date",
                value: "not a date".to_string(),
            })
        );
    }
}
