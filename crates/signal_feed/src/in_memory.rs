use std::time::Duration;

use async_trait::async_trait;
use common::normalize::parse_timestamp;
use serde_json::Value;
use tokio::{sync::RwLock, time::sleep};

use crate::traits::{SignalSource, SourceError};

pub const DEFAULT_LATENCY: Duration = Duration::from_millis(300);

#[derive(Default)]
struct Inner {
    records: Vec<Value>,
    failure: Option<String>,
}

/// Seeded signal records served with an artificial delay. Used for demos and
/// when no backend is configured.
pub struct InMemorySignalSource {
    inner: RwLock<Inner>,
    latency: Duration,
}

impl InMemorySignalSource {
    pub fn new(records: Vec<Value>, latency: Duration) -> Self {
        Self {
            inner: RwLock::new(Inner {
                records,
                failure: None,
            }),
            latency,
        }
    }

    /// Seeds from a JSON array of records.
    pub fn from_json(json: &str, latency: Duration) -> Result<Self, SourceError> {
        let records = serde_json::from_str::<Vec<Value>>(json)?;
        Ok(Self::new(records, latency))
    }

    pub async fn push(&self, record: Value) {
        self.inner.write().await.records.push(record);
    }

    pub async fn clear(&self) {
        self.inner.write().await.records.clear();
    }

    /// Makes every following fetch fail with `message` until `recover` is called.
    pub async fn fail_with(&self, message: impl Into<String>) {
        self.inner.write().await.failure = Some(message.into());
    }

    pub async fn recover(&self) {
        self.inner.write().await.failure = None;
    }
}

impl Default for InMemorySignalSource {
    fn default() -> Self {
        Self::new(Vec::new(), DEFAULT_LATENCY)
    }
}

#[async_trait]
impl SignalSource for InMemorySignalSource {
    async fn fetch_recent_signals(&self, limit: usize) -> Result<Vec<Value>, SourceError> {
        sleep(self.latency).await;

        let inner = self.inner.read().await;
        if let Some(message) = &inner.failure {
            return Err(SourceError::Backend(message.clone()));
        }

        let mut records = inner.records.clone();
        records.sort_by(|a, b| {
            let a = parse_timestamp(a.get("timestamp"));
            let b = parse_timestamp(b.get("timestamp"));
            b.cmp(&a)
        });
        records.truncate(limit);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn test_fetch_sorts_and_limits() {
        let source = InMemorySignalSource::new(
            vec![
                json!({"Id": 1, "timestamp": "2024-01-15T10:00:00Z"}),
                json!({"Id": 2, "timestamp": "2024-01-15T12:00:00Z"}),
                json!({"Id": 3, "timestamp": "2024-01-15T11:00:00Z"}),
            ],
            DEFAULT_LATENCY,
        );

        let records = source.fetch_recent_signals(2).await.unwrap();
        let ids: Vec<&Value> = records.iter().map(|r| &r["Id"]).collect();
        assert_eq!(ids, vec![&json!(2), &json!(3)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_waits_for_latency() {
        let source = InMemorySignalSource::new(vec![], Duration::from_secs(2));
        let started = tokio::time::Instant::now();
        source.fetch_recent_signals(10).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_injected_failure() {
        let source = InMemorySignalSource::default();
        source.push(json!({"Id": 1})).await;
        source.fail_with("Connection timeout - check server settings").await;

        let err = source.fetch_recent_signals(10).await.unwrap_err();
        assert_eq!(err.to_string(), "Connection timeout - check server settings");

        source.recover().await;
        assert_eq!(source.fetch_recent_signals(10).await.unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_then_push() {
        let source = InMemorySignalSource::new(
            vec![json!({"Id": 1}), json!({"Id": 2})],
            DEFAULT_LATENCY,
        );
        source.clear().await;
        assert!(source.fetch_recent_signals(10).await.unwrap().is_empty());

        source.push(json!({"Id": 3})).await;
        let records = source.fetch_recent_signals(10).await.unwrap();
        assert_eq!(records, vec![json!({"Id": 3})]);
    }

    #[test]
    fn test_from_json_rejects_non_array() {
        assert!(InMemorySignalSource::from_json("{\"Id\": 1}", DEFAULT_LATENCY).is_err());
        assert!(InMemorySignalSource::from_json("[{\"Id\": 1}, 5]", DEFAULT_LATENCY).is_ok());
    }
}
