use std::{collections::HashMap, future::Future, time::Duration};
use tracing::{error, info, warn};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{self, Instant},
};
use uuid::Uuid;

use common::actors::{Actor, ActorType, ControlMessage};

pub type ActorFactory = Box<dyn Fn() -> Box<dyn Actor> + Send + Sync>;

const CHECK_PERIOD: Duration = Duration::from_secs(1);
const HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(3);

pub struct Supervisor {
    actor_factories: HashMap<ActorType, ActorFactory>,
    pulses: HashMap<ActorType, Instant>,
    handles: HashMap<ActorType, JoinHandle<()>>,
    ids: HashMap<Uuid, ActorType>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self {
            actor_factories: HashMap::new(),
            pulses: HashMap::new(),
            handles: HashMap::new(),
            ids: HashMap::new(),
        }
    }

    pub fn register_actor(&mut self, actor_type: ActorType, factory: ActorFactory) {
        self.actor_factories.insert(actor_type, factory);
    }

    /// Runs every registered actor and restarts the ones that stop sending
    /// heartbeats. Returns once `shutdown` completes, aborting all actors.
    pub async fn start<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut check_interval = time::interval(CHECK_PERIOD);
        let (supervisor_tx, mut supervisor_rx) = mpsc::channel::<ControlMessage>(512);

        let actors: Vec<ActorType> = self.actor_factories.keys().copied().collect();
        actors.into_iter().for_each(|actor| {
            self.spawn_actor(actor, supervisor_tx.clone());
        });

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down {} actors", self.handles.len());
                    break;
                }

                Some(msg) = supervisor_rx.recv() => {
                    match msg {
                        ControlMessage::Heartbeat(id) => {
                            if let Some(actor_type) = self.ids.get(&id) {
                                self.pulses.insert(*actor_type, Instant::now());
                            }
                        }
                        ControlMessage::Shutdown(id) => {
                            if let Some(actor_type) = self.ids.remove(&id) {
                                warn!("{:?} is shutting down gracefully.", actor_type);
                                self.pulses.remove(&actor_type);
                                if let Some(handle) = self.handles.remove(&actor_type) {
                                    handle.abort();
                                }
                            }
                        }
                        ControlMessage::Error(id, error_msg) => {
                            let actor_type = self.ids.get(&id).copied();
                            error!("Actor {:?} reported error: {}", actor_type, error_msg);
                        }
                    }
                }

                _ = check_interval.tick() => {
                    let dead_timeout = Instant::now() - HEARTBEAT_TIMEOUT;

                    let dead_actors: Vec<ActorType> = self
                        .pulses
                        .iter()
                        .filter(|(_, pulse)| **pulse < dead_timeout)
                        .map(|(actor_type, _)| *actor_type)
                        .collect();

                    for actor_type in dead_actors {
                        warn!("{:?} is unresponsive, restarting", actor_type);
                        if let Some(handle) = self.handles.remove(&actor_type) {
                            handle.abort();
                        }
                        self.spawn_actor(actor_type, supervisor_tx.clone());
                    }
                }
            }
        }

        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
        self.pulses.clear();
        self.ids.clear();
    }

    #[cfg(test)]
    fn is_running(&self, actor_type: ActorType) -> bool {
        self.handles
            .get(&actor_type)
            .is_some_and(|handle| !handle.is_finished())
    }

    fn spawn_actor(&mut self, actor_type: ActorType, tx: mpsc::Sender<ControlMessage>) {
        let Some(factory) = self.actor_factories.get(&actor_type) else {
            error!("No factory registered for {:?}", actor_type);
            return;
        };
        let mut new_actor = factory();

        self.ids.retain(|_, t| *t != actor_type);
        self.ids.insert(new_actor.id(), actor_type);

        let new_actor_handle = tokio::spawn(async move {
            if let Err(e) = new_actor.run(tx).await {
                error!("Actor {:?} crashed: {}", actor_type, e);
            }
        });
        self.handles.insert(actor_type, new_actor_handle);
        self.pulses.insert(actor_type, Instant::now());
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}
