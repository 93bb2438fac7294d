use std::str::FromStr;

use common::{models::Signal, normalize::field_text};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Exact(String),
}

impl FromStr for StatusFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            Ok(StatusFilter::Exact(s.to_lowercase()))
        }
    }
}

/// Search box plus status dropdown of the signal history view.
#[derive(Debug, Clone, Default)]
pub struct SignalFilter {
    search: String,
    status: StatusFilter,
}

impl SignalFilter {
    pub fn new(search: &str, status: StatusFilter) -> Self {
        Self {
            search: search.trim().to_lowercase(),
            status,
        }
    }

    pub fn matches(&self, signal: &Signal) -> bool {
        self.matches_search(signal) && self.matches_status(signal)
    }

    pub fn apply<'a>(&self, signals: &'a [Signal]) -> Vec<&'a Signal> {
        signals.iter().filter(|s| self.matches(s)).collect()
    }

    fn matches_search(&self, signal: &Signal) -> bool {
        if self.search.is_empty() {
            return true;
        }
        [&signal.fields.symbol, &signal.fields.account_number]
            .into_iter()
            .filter_map(|v| field_text(v.as_ref()))
            .any(|text| text.to_lowercase().contains(&self.search))
    }

    fn matches_status(&self, signal: &Signal) -> bool {
        match &self.status {
            StatusFilter::All => true,
            StatusFilter::Exact(wanted) => field_text(signal.fields.status.as_ref())
                .is_some_and(|status| status.to_lowercase() == *wanted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn signals() -> Vec<Signal> {
        [
            json!({"id": 1, "symbol": "EURUSD", "status": "executed", "account_number": "12345678"}),
            json!({"id": 2, "symbol": "GBPUSD", "status": "Pending", "account_number": "87654321"}),
            json!({"id": 3, "symbol": "XAUUSD", "status": "failed"}),
            json!({"id": 4}),
        ]
        .into_iter()
        .filter_map(Signal::from_value)
        .collect()
    }

    fn ids(found: Vec<&Signal>) -> Vec<i64> {
        found.iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let all = signals();
        assert_eq!(SignalFilter::default().apply(&all).len(), 4);
    }

    #[test]
    fn test_search_symbol_and_account() {
        let all = signals();
        assert_eq!(ids(SignalFilter::new("usd", StatusFilter::All).apply(&all)), vec![1, 2, 3]);
        assert_eq!(ids(SignalFilter::new(" gbp ", StatusFilter::All).apply(&all)), vec![2]);
        assert_eq!(ids(SignalFilter::new("8765", StatusFilter::All).apply(&all)), vec![2]);
        assert!(SignalFilter::new("btc", StatusFilter::All).apply(&all).is_empty());
    }

    #[test]
    fn test_status_filter_is_exact_and_case_insensitive() {
        let all = signals();
        let pending: StatusFilter = "pending".parse().unwrap();
        assert_eq!(ids(SignalFilter::new("", pending).apply(&all)), vec![2]);

        let partial = StatusFilter::Exact("exec".to_string());
        assert!(SignalFilter::new("", partial).apply(&all).is_empty());

        assert_eq!("All".parse::<StatusFilter>().unwrap(), StatusFilter::All);
    }

    #[test]
    fn test_combined_filters() {
        let all = signals();
        let failed: StatusFilter = "FAILED".parse().unwrap();
        assert_eq!(ids(SignalFilter::new("xau", failed.clone()).apply(&all)), vec![3]);
        assert!(SignalFilter::new("eur", failed).apply(&all).is_empty());
    }
}
