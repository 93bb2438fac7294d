pub mod signal_poller;
pub mod signal_store;

pub use signal_poller::{PollingHandle, SignalPoller, spawn_polling};
pub use signal_store::{RefreshOutcome, SignalListStore, SignalSnapshot, StoreStatus};
