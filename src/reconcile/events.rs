//! Event system for reconciliation cycles.
//!
//! The orchestrator reports what happens during a cycle (start, each rejected
//! record, completion, failure, cancellation) as [`ReconcileEvent`]s. Handlers
//! registered on the [`EventDispatcher`] turn these into logs or whatever other
//! observability the host wants, without the engine knowing about them.

use super::collections::CollectionKind;
use super::stats::ReconcileStats;
use serde_json::Value;
use tracing::{debug, error, info, warn};

/// Events that occur during a reconciliation cycle
pub enum ReconcileEvent<'a> {
	/// A cycle has started fetching
	CycleStarted { cycle: u64 },
	/// A record was excluded from the cycle
	RecordRejected {
		cycle: u64,
		collection: CollectionKind,
		reason: String,
		raw: &'a Value,
	},
	/// A cycle produced a complete view
	CycleCompleted {
		cycle: u64,
		stats: &'a ReconcileStats,
	},
	/// A fetch failed and the cycle was abandoned
	CycleFailed { cycle: u64, error: String },
	/// The cycle was cancelled before its fetches finished
	CycleCancelled { cycle: u64 },
}

/// Trait for handling reconciliation events.
///
/// Handlers are shared between concurrent cycles, so they take `&self`.
pub trait ReconcileEventHandler: Send + Sync {
	/// Handle a reconciliation event.
	fn handle(&self, event: &ReconcileEvent<'_>);

	/// Get the name of this handler for logging and diagnostics.
	fn name(&self) -> &'static str;
}

/// Event dispatcher that manages multiple event handlers.
///
/// Handlers are called in the order they are registered.
#[derive(Default)]
pub struct EventDispatcher {
	handlers: Vec<Box<dyn ReconcileEventHandler>>,
}

impl EventDispatcher {
	/// Create a new, empty event dispatcher.
	pub fn new() -> Self {
		Self {
			handlers: Vec::new(),
		}
	}

	/// Register a new event handler.
	pub fn register_handler(&mut self, handler: Box<dyn ReconcileEventHandler>) {
		debug!("Registered reconcile event handler {}", handler.name());
		self.handlers.push(handler);
	}

	pub fn len(&self) -> usize {
		self.handlers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.handlers.is_empty()
	}

	/// Dispatch an event to all registered handlers.
	pub fn dispatch(&self, event: &ReconcileEvent<'_>) {
		for handler in &self.handlers {
			handler.handle(event);
		}
	}
}

/// Logs every event through `tracing`.
pub struct TracingEventHandler;

impl ReconcileEventHandler for TracingEventHandler {
	fn handle(&self, event: &ReconcileEvent<'_>) {
		match event {
			ReconcileEvent::CycleStarted { cycle } => {
				debug!("Reconcile cycle {} started", cycle);
			}
			ReconcileEvent::RecordRejected {
				cycle,
				collection,
				reason,
				raw,
			} => {
				warn!(
					"Cycle {}: skipping record from {}: {}; raw record: {}",
					cycle, collection, reason, raw
				);
			}
			ReconcileEvent::CycleCompleted { cycle, stats } => {
				info!("Reconcile cycle {} completed: {}", cycle, stats.summary());
			}
			ReconcileEvent::CycleFailed { cycle, error } => {
				error!("Reconcile cycle {} failed: {}", cycle, error);
			}
			ReconcileEvent::CycleCancelled { cycle } => {
				info!("Reconcile cycle {} cancelled", cycle);
			}
		}
	}

	fn name(&self) -> &'static str {
		"TracingEventHandler"
	}
}
