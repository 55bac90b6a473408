//! Publishing reconciled views.
//!
//! A [`ReconciledViewPublisher`] owns the one externally visible view for a
//! display. Each reload is a full orchestrator cycle. Starting a reload
//! cancels the one still in flight, and a cycle only publishes if no newer
//! reload has started since it began. The view is replaced as a whole, so a
//! subscriber never sees the timeline of one cycle with the totals of another.

use super::orchestrator::{ReconcileError, ReconcileOrchestrator, ReconciledView};
use super::source::AuditDataSource;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::{debug, info};

pub type SharedView = Option<Arc<ReconciledView>>;

pub struct ReconciledViewPublisher<S> {
    orchestrator: Arc<ReconcileOrchestrator<S>>,
    /// Ticket of the most recently started reload.
    latest: AtomicU64,
    /// Cancels the reload currently in flight.
    in_flight: Mutex<Option<watch::Sender<bool>>>,
    state: watch::Sender<SharedView>,
}

impl<S: AuditDataSource> ReconciledViewPublisher<S> {
    pub fn new(orchestrator: Arc<ReconcileOrchestrator<S>>) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            orchestrator,
            latest: AtomicU64::new(0),
            in_flight: Mutex::new(None),
            state,
        }
    }

    /// Watch the published view. Holds `None` until the first cycle succeeds.
    pub fn subscribe(&self) -> watch::Receiver<SharedView> {
        self.state.subscribe()
    }

    pub fn current(&self) -> SharedView {
        self.state.borrow().clone()
    }

    /// Run a fresh cycle and publish it, cancelling any reload still in flight.
    ///
    /// A failed cycle leaves the previously published view in place.
    pub async fn reload(&self) -> Result<Arc<ReconciledView>, ReconcileError> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let previous = self.lock_in_flight().replace(cancel_tx);
        if let Some(previous) = previous {
            debug!("Reload {} cancels the reload in flight", ticket);
            let _ = previous.send(true);
        }

        let view = Arc::new(self.orchestrator.load_cancellable(cancel_rx).await?);

        let published = self.state.send_if_modified(|current| {
            if self.latest.load(Ordering::SeqCst) != ticket {
                return false;
            }
            *current = Some(view.clone());
            true
        });

        if !published {
            info!(
                "Discarding reconcile cycle {}: a newer reload has started",
                view.cycle
            );
            return Err(ReconcileError::Superseded { cycle: view.cycle });
        }

        Ok(view)
    }

    /// Cancel the reload in flight, if any. The published view is kept.
    pub fn cancel(&self) {
        if let Some(in_flight) = self.lock_in_flight().take() {
            let _ = in_flight.send(true);
        }
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, Option<watch::Sender<bool>>> {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
