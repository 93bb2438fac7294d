use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::models::{Signal, prepare_batch};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use crate::traits::SignalSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    Loading,
    Ready,
    Failed,
}

/// Immutable view of the store. Every refresh publishes a new one; records
/// are shared between snapshots, never mutated.
#[derive(Debug, Clone)]
pub struct SignalSnapshot {
    pub status: StoreStatus,
    pub records: Arc<Vec<Signal>>,
    pub error: Option<String>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl SignalSnapshot {
    fn initial() -> Self {
        Self {
            status: StoreStatus::Loading,
            records: Arc::new(Vec::new()),
            error: None,
            refreshed_at: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Loaded(usize),
    Failed,
    /// Another refresh was still in flight.
    Skipped,
}

pub struct SignalListStore {
    source: Arc<dyn SignalSource>,
    limit: usize,
    state_tx: watch::Sender<Arc<SignalSnapshot>>,
    refresh_lock: Mutex<()>,
}

impl SignalListStore {
    pub fn new(source: Arc<dyn SignalSource>, limit: usize) -> Self {
        let (state_tx, _) = watch::channel(Arc::new(SignalSnapshot::initial()));
        Self {
            source,
            limit,
            state_tx,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn snapshot(&self) -> Arc<SignalSnapshot> {
        self.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<SignalSnapshot>> {
        self.state_tx.subscribe()
    }

    /// Fetches the latest signals and publishes the result. At most one
    /// refresh runs at a time; overlapping calls return `Skipped`.
    pub async fn refresh(&self) -> RefreshOutcome {
        let Ok(_guard) = self.refresh_lock.try_lock() else {
            debug!("Signal refresh already in flight, skipping");
            return RefreshOutcome::Skipped;
        };

        let previous = self.snapshot();
        self.publish(SignalSnapshot {
            status: StoreStatus::Loading,
            records: previous.records.clone(),
            error: None,
            refreshed_at: previous.refreshed_at,
        });

        match self.source.fetch_recent_signals(self.limit).await {
            Ok(raw) => {
                let fetched = raw.len();
                let signals = prepare_batch(raw);
                let count = signals.len();
                if count < fetched {
                    debug!("Dropped {} signal records without usable id", fetched - count);
                }
                info!("Loaded {} signals", count);

                self.publish(SignalSnapshot {
                    status: StoreStatus::Ready,
                    records: Arc::new(signals),
                    error: None,
                    refreshed_at: Some(Utc::now()),
                });
                RefreshOutcome::Loaded(count)
            }
            Err(e) => {
                warn!("Failed to load signals: {}", e);
                self.publish(SignalSnapshot {
                    status: StoreStatus::Failed,
                    records: previous.records.clone(),
                    error: Some(e.to_string()),
                    refreshed_at: previous.refreshed_at,
                });
                RefreshOutcome::Failed
            }
        }
    }

    /// Manual retry from the error view. Same overlap rule as `refresh`.
    pub async fn retry(&self) -> RefreshOutcome {
        info!("Retrying signal load");
        self.refresh().await
    }

    fn publish(&self, snapshot: SignalSnapshot) {
        self.state_tx.send_replace(Arc::new(snapshot));
    }
}
