use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use common::actors::{Actor, ActorType, ControlMessage, TaskGuard};
use tokio::{
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::info;
use uuid::Uuid;

use crate::services::signal_store::{RefreshOutcome, SignalListStore};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

fn ticker(period: Duration) -> time::Interval {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

/// Refreshes `store` immediately, then once per `period`, until the
/// returned handle is stopped or dropped.
pub fn spawn_polling(store: Arc<SignalListStore>, period: Duration) -> PollingHandle {
    let handle = tokio::spawn(async move {
        let mut ticker = ticker(period);
        loop {
            ticker.tick().await;
            store.refresh().await;
        }
    });
    PollingHandle {
        task: TaskGuard::new(handle),
    }
}

/// Scoped ownership of a polling task.
#[derive(Debug)]
pub struct PollingHandle {
    task: TaskGuard,
}

impl PollingHandle {
    pub fn stop(self) {
        self.task.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

/// Supervised variant of the polling loop: same schedule, plus heartbeats
/// and failure reports to the supervisor.
pub struct SignalPoller {
    id: Uuid,
    store: Arc<SignalListStore>,
    period: Duration,
}

#[async_trait]
impl Actor for SignalPoller {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> ActorType {
        ActorType::SignalPollerActor
    }

    async fn run(&mut self, supervisor_tx: mpsc::Sender<ControlMessage>) -> anyhow::Result<()> {
        let _heartbeat = self.spawn_heartbeat(supervisor_tx.clone());

        info!("Starting signal polling every {:?}", self.period);
        let mut ticker = ticker(self.period);

        loop {
            ticker.tick().await;
            if self.store.refresh().await == RefreshOutcome::Failed {
                let message = self
                    .store
                    .snapshot()
                    .error
                    .clone()
                    .unwrap_or_else(|| "unknown error".to_string());
                supervisor_tx
                    .send(ControlMessage::Error(
                        self.id,
                        format!("{:?}: Signal refresh failed: {}", self.name(), message),
                    ))
                    .await?;
            }
        }
    }
}

impl SignalPoller {
    pub fn new(store: Arc<SignalListStore>, period: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            store,
            period,
        }
    }
}
