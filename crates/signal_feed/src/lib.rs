pub mod in_memory;
pub mod remote;
pub mod services;
pub mod traits;

pub use in_memory::InMemorySignalSource;
pub use remote::BackendClient;
pub use traits::{SignalSource, SourceError};
