use signal_feed::services::{SignalSnapshot, StoreStatus};

use crate::{
    filter::SignalFilter,
    projector::{Projector, SignalRow},
};

/// What the signal panel shows for a store snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum ListView {
    /// First load, nothing to show yet.
    Loading,
    /// Loaded and there is nothing to show.
    Empty,
    /// Last fetch failed; `rows` are the last good records, possibly empty.
    Failed { message: String, rows: Vec<SignalRow> },
    /// `refreshing` is set while a later poll is in flight.
    Rows { rows: Vec<SignalRow>, refreshing: bool },
}

impl ListView {
    pub fn from_snapshot(
        snapshot: &SignalSnapshot,
        projector: &Projector,
        filter: &SignalFilter,
    ) -> Self {
        let rows: Vec<SignalRow> = snapshot
            .records
            .iter()
            .filter(|s| filter.matches(s))
            .map(|s| projector.project(s))
            .collect();

        match snapshot.status {
            StoreStatus::Failed => ListView::Failed {
                message: snapshot
                    .error
                    .clone()
                    .unwrap_or_else(|| "Something went wrong".to_string()),
                rows,
            },
            StoreStatus::Loading if snapshot.is_empty() => ListView::Loading,
            StoreStatus::Loading => ListView::Rows {
                rows,
                refreshing: true,
            },
            StoreStatus::Ready if rows.is_empty() => ListView::Empty,
            StoreStatus::Ready => ListView::Rows {
                rows,
                refreshing: false,
            },
        }
    }
}
