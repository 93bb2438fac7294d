pub mod signal;

pub use signal::{RawSignal, Signal, prepare_batch};
