//! Merging the six collections into one timeline.
//!
//! Raw records are parsed and dated once, on ingest. A record that cannot be
//! classified is set aside as a [`RecordRejection`] and reaches neither the
//! timeline nor the totals. A record that classifies but has no usable date is
//! rejected from the timeline only; its amount still counts. The merge itself
//! is a concatenation in fixed collection order followed by a stable sort,
//! newest first, so the same input always yields the same sequence.

use super::collections::{CollectionKind, Collections};
use super::record::{Category, ReconcileRecord, RecordError};
use super::timestamp::{TimestampError, extract_date};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::Value;

/// A classified record together with the instant it is sorted by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub occurred_at: DateTime<Utc>,
    pub record: ReconcileRecord,
}

impl TimelineEntry {
    pub fn new(record: ReconcileRecord) -> Result<Self, TimestampError> {
        Ok(Self {
            occurred_at: extract_date(&record)?,
            record,
        })
    }

    pub fn category(&self) -> Category {
        self.record.category()
    }

    /// An unaudited burn that has waited longer than `threshold` for its
    /// withdrawal. Every other category is never overdue.
    pub fn is_overdue(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        matches!(self.record, ReconcileRecord::UnauditedBurn(_))
            && now.signed_duration_since(self.occurred_at) > threshold
    }
}

/// A raw record excluded from the cycle.
#[derive(Debug)]
pub struct RecordRejection {
    pub collection: CollectionKind,
    pub error: RecordError,
    pub raw: Value,
}

/// Result of ingesting raw collections.
#[derive(Debug, Default)]
pub struct Ingested {
    /// Every record that classified, dated or not. Totals are computed here.
    pub records: Collections<ReconcileRecord>,
    /// Classified records with a usable date, ready to merge.
    pub entries: Collections<TimelineEntry>,
    pub rejected: Vec<RecordRejection>,
}

/// Parse and date every raw record, keeping the collection it came from.
pub fn ingest(raw: Collections<Value>) -> Ingested {
    let mut ingested = Ingested::default();

    for (kind, records) in raw.into_parts() {
        for raw in records {
            let parsed = match ReconcileRecord::parse(raw.clone()) {
                Ok(parsed) => parsed,
                Err(error) => {
                    ingested.rejected.push(RecordRejection {
                        collection: kind,
                        error,
                        raw,
                    });
                    continue;
                }
            };

            ingested.records.get_mut(kind).push(parsed.clone());
            match TimelineEntry::new(parsed) {
                Ok(entry) => ingested.entries.get_mut(kind).push(entry),
                Err(error) => ingested.rejected.push(RecordRejection {
                    collection: kind,
                    error: error.into(),
                    raw,
                }),
            }
        }
    }

    ingested
}

/// Concatenate the collections and sort newest first.
///
/// The sort is stable: entries with equal timestamps keep their
/// concatenation order.
pub fn merge(collections: Collections<TimelineEntry>) -> Vec<TimelineEntry> {
    let mut merged: Vec<TimelineEntry> = collections
        .into_parts()
        .into_iter()
        .flat_map(|(_, entries)| entries)
        .collect();

    merged.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    merged
}

/// Ingest and merge in one step.
#[derive(Debug)]
pub struct Merged {
    pub entries: Vec<TimelineEntry>,
    pub rejected: Vec<RecordRejection>,
}

pub fn merge_raw(raw: Collections<Value>) -> Merged {
    let Ingested {
        entries, rejected, ..
    } = ingest(raw);
    Merged {
        entries: merge(entries),
        rejected,
    }
}
