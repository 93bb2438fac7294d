use dotenvy::dotenv;
use std::{io::IsTerminal, sync::Arc};
use tokio::sync::{Notify, watch};
use tracing::{debug, error, info};

use common::actors::{ActorType, TaskGuard};
use common::config::{DashboardConfig, SourceKind};
use common::logger;
use presentation::{Projector, SignalFilter};
use signal_feed::services::{SignalListStore, SignalPoller};
use signal_feed::{BackendClient, InMemorySignalSource, SignalSource};

use crate::actors::supervisor::Supervisor;
use crate::services::command_service::{self, HELP};
use crate::services::render_service::RenderService;

mod actors;
mod services;

const SEED_SIGNALS: &str = include_str!("../data/signals.json");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logger::setup_logger();
    debug!("Signal dashboard starting up...");

    let config = DashboardConfig::from_env()?;

    let source: Arc<dyn SignalSource> = match config.source {
        SourceKind::Remote => {
            let Some(backend) = config.backend.as_ref() else {
                anyhow::bail!("Remote source selected without backend settings");
            };
            info!("Reading signals from {}", backend.base_url);
            Arc::new(BackendClient::new(backend)?)
        }
        SourceKind::InMemory => {
            info!("Reading signals from the bundled sample set");
            Arc::new(InMemorySignalSource::from_json(SEED_SIGNALS, config.mock_latency)?)
        }
    };

    let store = Arc::new(SignalListStore::new(source, config.fetch_limit));
    let (filter_tx, filter_rx) = watch::channel(SignalFilter::default());
    let quit = Arc::new(Notify::new());

    let mut supervisor = Supervisor::new();

    let store_for_poller = store.clone();
    let poll_interval = config.poll_interval;
    supervisor.register_actor(
        ActorType::SignalPollerActor,
        Box::new(move || {
            Box::new(SignalPoller::new(store_for_poller.clone(), poll_interval))
        }),
    );

    let store_for_renderer = store.clone();
    let time_display = config.time_display;
    let ansi = std::io::stdout().is_terminal();
    supervisor.register_actor(
        ActorType::RendererActor,
        Box::new(move || {
            Box::new(RenderService::new(
                store_for_renderer.clone(),
                filter_rx.clone(),
                Projector::new(time_display),
                ansi,
            ))
        }),
    );

    info!("{}", HELP);
    let _commands = TaskGuard::new(tokio::spawn(command_service::run_commands(
        command_service::spawn_stdin_reader(),
        store.clone(),
        filter_tx,
        quit.clone(),
    )));

    supervisor
        .start(async move {
            tokio::select! {
                result = tokio::signal::ctrl_c() => {
                    if let Err(e) = result {
                        error!("Failed to listen for Ctrl-C: {}", e);
                        quit.notified().await;
                    }
                }
                _ = quit.notified() => {}
            }
        })
        .await;

    info!("Signal dashboard stopped");
    Ok(())
}
