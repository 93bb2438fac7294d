use std::{
    io::{self, Write},
    sync::Arc,
};

use anyhow::Context;
use async_trait::async_trait;
use common::actors::{Actor, ActorType, ControlMessage};
use presentation::{ListView, Projector, SignalFilter, SignalStats, TableRenderer};
use signal_feed::services::{SignalListStore, SignalSnapshot};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};
use uuid::Uuid;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Redraws the signal table whenever the store publishes a snapshot or the
/// filter changes.
pub struct RenderService {
    id: Uuid,
    store: Arc<SignalListStore>,
    filter_rx: watch::Receiver<SignalFilter>,
    projector: Projector,
    renderer: TableRenderer,
    ansi: bool,
}

#[async_trait]
impl Actor for RenderService {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> ActorType {
        ActorType::RendererActor
    }

    async fn run(&mut self, supervisor_tx: mpsc::Sender<ControlMessage>) -> anyhow::Result<()> {
        let _heartbeat = self.spawn_heartbeat(supervisor_tx.clone());

        info!("Starting signal renderer");
        let mut snapshot_rx = self.store.subscribe();

        loop {
            let snapshot = snapshot_rx.borrow_and_update().clone();
            let filter = self.filter_rx.borrow_and_update().clone();
            self.draw(&self.frame(&snapshot, &filter))?;

            tokio::select! {
                changed = snapshot_rx.changed() => {
                    changed.context("Signal store dropped")?;
                }
                changed = self.filter_rx.changed() => {
                    changed.context("Filter channel closed")?;
                    debug!("Filter changed, redrawing");
                }
            }
        }
    }
}

impl RenderService {
    pub fn new(
        store: Arc<SignalListStore>,
        filter_rx: watch::Receiver<SignalFilter>,
        projector: Projector,
        ansi: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            store,
            filter_rx,
            projector,
            renderer: TableRenderer::new(ansi),
            ansi,
        }
    }

    pub fn frame(&self, snapshot: &SignalSnapshot, filter: &SignalFilter) -> String {
        let view = ListView::from_snapshot(snapshot, &self.projector, filter);
        let mut frame = self.renderer.render(&view);

        if let ListView::Rows { rows, .. } = &view {
            let stats = SignalStats::from_rows(rows);
            frame.push_str(&format!(
                "\nSignals: {} | Buy: {} | Sell: {} | Success Rate: {}",
                stats.total,
                stats.buys,
                stats.sells,
                stats.success_rate_label()
            ));
        }
        if let Some(at) = snapshot.refreshed_at {
            frame.push_str(&format!("\nLast Updated: {}", at.format("%H:%M:%S")));
        }
        frame.push('\n');
        frame
    }

    fn draw(&self, frame: &str) -> anyhow::Result<()> {
        let mut stdout = io::stdout().lock();
        if self.ansi {
            stdout.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        stdout.write_all(frame.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}
