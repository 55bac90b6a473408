//! Reconciliation orchestrator.
//!
//! This module defines the `ReconcileOrchestrator`, which runs one full
//! reconciliation cycle per call:
//!
//! - Fetches all six auditor collections concurrently and waits for every one of them
//! - Parses and dates each raw record, reporting rejects through the event dispatcher
//! - Drops unaudited burns of tokens other than the canonical one
//! - Aggregates the in-flight totals and merges the timeline
//!
//! A failed fetch fails the whole cycle; nothing partial is ever returned. The
//! orchestrator holds no view state of its own, so concurrent or repeated
//! calls are independent. Publishing and supersession live in
//! [`super::view`].

use crate::auditor::AuditorError;
use crate::config::ReconcileConfig;
use crate::reconcile::{
    aggregate::aggregate,
    collections::{CollectionKind, Collections},
    events::{EventDispatcher, ReconcileEvent, ReconcileEventHandler, TracingEventHandler},
    merge::{Ingested, TimelineEntry, ingest, merge},
    record::ReconcileRecord,
    source::AuditDataSource,
    stats::ReconcileStats,
};

use chrono::{DateTime, Utc};
use futures::TryFutureExt;
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("Failed to fetch {collection}: {source}")]
    FetchError {
        collection: CollectionKind,
        #[source]
        source: AuditorError,
    },

    #[error("Reconcile cycle {cycle} was cancelled")]
    Cancelled { cycle: u64 },

    #[error("Reconcile cycle {cycle} was superseded by a newer reload")]
    Superseded { cycle: u64 },
}

/// The result of one reconciliation cycle, handed to the presentation layer
/// as a single value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciledView {
    pub cycle: u64,
    pub generated_at: DateTime<Utc>,
    /// Every accepted record, newest first.
    pub sorted_data: Vec<TimelineEntry>,
    pub total_awaiting_mint: u128,
    pub total_awaiting_unwrap: u128,
    pub stats: ReconcileStats,
}

/// Coordinates fetching, classification, merging and aggregation.
pub struct ReconcileOrchestrator<S> {
    source: S,
    config: ReconcileConfig,
    dispatcher: EventDispatcher,
    cycles: AtomicU64,
}

impl<S: AuditDataSource> ReconcileOrchestrator<S> {
    /// Create an orchestrator that logs its events through `tracing`.
    pub fn new(source: S, config: ReconcileConfig) -> Self {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.register_handler(Box::new(TracingEventHandler));
        Self::with_dispatcher(source, config, dispatcher)
    }

    pub fn with_dispatcher(source: S, config: ReconcileConfig, dispatcher: EventDispatcher) -> Self {
        Self {
            source,
            config,
            dispatcher,
            cycles: AtomicU64::new(0),
        }
    }

    pub fn register_handler(&mut self, handler: Box<dyn ReconcileEventHandler>) {
        self.dispatcher.register_handler(handler);
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Run one full reconciliation cycle.
    pub async fn load_reconciled_view(&self) -> Result<ReconciledView, ReconcileError> {
        // Held for the duration of the call so the cycle is never cancelled.
        let (_keep_alive, cancel) = watch::channel(false);
        self.load_cancellable(cancel).await
    }

    /// Run one reconciliation cycle that stops as soon as `cancel` turns true.
    ///
    /// Cancellation drops every in-flight fetch. A cancelled cycle returns
    /// [`ReconcileError::Cancelled`] and produces no view.
    pub async fn load_cancellable(
        &self,
        mut cancel: watch::Receiver<bool>,
    ) -> Result<ReconciledView, ReconcileError> {
        let cycle = self.cycles.fetch_add(1, Ordering::SeqCst) + 1;
        self.dispatcher
            .dispatch(&ReconcileEvent::CycleStarted { cycle });

        let fetched = tokio::select! {
            biased;
            _ = cancelled(&mut cancel) => {
                self.dispatcher.dispatch(&ReconcileEvent::CycleCancelled { cycle });
                return Err(ReconcileError::Cancelled { cycle });
            }
            fetched = self.fetch_all() => fetched,
        };

        match fetched {
            Ok(raw) => Ok(self.reconcile(cycle, raw, Utc::now())),
            Err(e) => {
                self.dispatcher.dispatch(&ReconcileEvent::CycleFailed {
                    cycle,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Fetch all six collections concurrently; the first failure fails the join.
    async fn fetch_all(&self) -> Result<Collections<Value>, ReconcileError> {
        let started = tokio::time::Instant::now();
        debug!("Fetching auditor collections from {}", self.source.name());

        let (
            audited_mints,
            audited_burns,
            unaudited_mints,
            unaudited_burns,
            unaudited_deposits,
            unaudited_withdrawals,
        ) = futures::try_join!(
            self.source
                .audited_mints()
                .map_err(fetch_error(CollectionKind::AuditedMints)),
            self.source
                .audited_burns()
                .map_err(fetch_error(CollectionKind::AuditedBurns)),
            self.source
                .unaudited_mints()
                .map_err(fetch_error(CollectionKind::UnauditedMints)),
            self.source
                .unaudited_burns()
                .map_err(fetch_error(CollectionKind::UnauditedBurns)),
            self.source
                .unaudited_deposits()
                .map_err(fetch_error(CollectionKind::UnauditedDeposits)),
            self.source
                .unaudited_withdrawals()
                .map_err(fetch_error(CollectionKind::UnauditedWithdrawals)),
        )?;

        let collections = Collections {
            audited_mints,
            audited_burns,
            unaudited_mints,
            unaudited_burns,
            unaudited_deposits,
            unaudited_withdrawals,
        };

        debug!(
            "Fetched {} records in {:?}",
            collections.len(),
            started.elapsed()
        );
        Ok(collections)
    }

    /// Turn fetched raw collections into a view. Pure apart from event dispatch.
    pub fn reconcile(
        &self,
        cycle: u64,
        raw: Collections<Value>,
        now: DateTime<Utc>,
    ) -> ReconciledView {
        let fetched = raw.len();
        let Ingested {
            mut records,
            mut entries,
            rejected,
        } = ingest(raw);

        for rejection in &rejected {
            self.dispatcher.dispatch(&ReconcileEvent::RecordRejected {
                cycle,
                collection: rejection.collection,
                reason: rejection.error.to_string(),
                raw: &rejection.raw,
            });
        }

        let token_id = self.config.canonical_token_id;
        let filtered_out = retain_canonical_burns(&mut records.unaudited_burns, token_id);
        entries
            .unaudited_burns
            .retain(|entry| is_canonical_burn(&entry.record, token_id));
        if filtered_out > 0 {
            info!(
                "Dropped {} unaudited burns of tokens other than {}",
                filtered_out, token_id
            );
        }

        let totals = aggregate(&records, token_id);
        let sorted_data = merge(entries);
        let stats = ReconcileStats::collect(
            fetched,
            rejected.len(),
            filtered_out,
            &sorted_data,
            now,
            self.config.overdue_after,
        );

        self.dispatcher.dispatch(&ReconcileEvent::CycleCompleted {
            cycle,
            stats: &stats,
        });

        ReconciledView {
            cycle,
            generated_at: now,
            sorted_data,
            total_awaiting_mint: totals.total_awaiting_mint,
            total_awaiting_unwrap: totals.total_awaiting_unwrap,
            stats,
        }
    }
}

/// False only for an unaudited burn of some other token.
pub fn is_canonical_burn(record: &ReconcileRecord, token_id: u64) -> bool {
    match record {
        ReconcileRecord::UnauditedBurn(b) => b.burn.token_id == token_id,
        _ => true,
    }
}

/// Keep only unaudited burns of `token_id`. Returns how many were dropped.
pub fn retain_canonical_burns(burns: &mut Vec<ReconcileRecord>, token_id: u64) -> usize {
    let before = burns.len();
    burns.retain(|record| is_canonical_burn(record, token_id));
    before - burns.len()
}

fn fetch_error(collection: CollectionKind) -> impl FnOnce(AuditorError) -> ReconcileError {
    move |source| ReconcileError::FetchError { collection, source }
}

/// Resolves once the flag is set. Never resolves if the sender goes away
/// without setting it.
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    while !*cancel.borrow() {
        if cancel.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
