pub mod filter;
pub mod projector;
pub mod stats;
pub mod table;
pub mod view;

pub use filter::{SignalFilter, StatusFilter};
pub use projector::{Arrow, Projector, SignalRow, StatusClass};
pub use stats::SignalStats;
pub use table::TableRenderer;
pub use view::ListView;
