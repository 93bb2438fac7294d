use std::collections::HashMap;

use crate::projector::{SignalRow, StatusClass};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalStats {
    pub total: usize,
    pub buys: usize,
    pub sells: usize,
    pub by_class: HashMap<StatusClass, usize>,
}

impl SignalStats {
    pub fn from_rows(rows: &[SignalRow]) -> Self {
        let mut stats = Self::default();
        for row in rows {
            stats.total += 1;
            if row.action_is_buy {
                stats.buys += 1;
            } else {
                stats.sells += 1;
            }
            *stats.by_class.entry(row.status_class).or_insert(0) += 1;
        }
        stats
    }

    pub fn count(&self, class: StatusClass) -> usize {
        self.by_class.get(&class).copied().unwrap_or(0)
    }

    /// Share of settled signals that succeeded. `None` until at least one
    /// signal is positive or negative.
    pub fn success_rate(&self) -> Option<f64> {
        let positive = self.count(StatusClass::Positive);
        let settled = positive + self.count(StatusClass::Negative);
        (settled > 0).then(|| positive as f64 / settled as f64)
    }

    pub fn success_rate_label(&self) -> String {
        match self.success_rate() {
            Some(rate) => format!("{:.1}%", rate * 100.0),
            None => "N/A".to_string(),
        }
    }
}
