use std::time::Duration;

use async_trait::async_trait;
use common::config::BackendConfig;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use crate::{
    remote::records_response::{FetchParams, RecordsResponse},
    traits::{SignalSource, SourceError},
};

const MAX_RATE_LIMIT_RETRIES: u32 = 2;

/// Client for the hosted records API. One instance per table.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    fetch_url: Url,
    project_id: String,
    public_key: String,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent("signal_dashboard/0.1.0")
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            fetch_url: Self::fetch_url(&config.base_url, &config.table)?,
            project_id: config.project_id.clone(),
            public_key: config.public_key.clone(),
        })
    }

    fn fetch_url(base_url: &str, table: &str) -> Result<Url, SourceError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base.join(&format!("tables/{}/records/fetch", table))?)
    }

    pub async fn fetch_records(&self, params: &FetchParams) -> Result<Vec<Value>, SourceError> {
        let mut retry_count = 0;

        loop {
            match self.make_request(params).await {
                Err(SourceError::RateLimited) if retry_count < MAX_RATE_LIMIT_RETRIES => {
                    retry_count += 1;
                    let backoff_seconds = 2_u64.pow(retry_count);
                    warn!(
                        "Rate limited fetching signals, backing off for {} seconds (attempt {}/{})",
                        backoff_seconds, retry_count, MAX_RATE_LIMIT_RETRIES
                    );
                    sleep(Duration::from_secs(backoff_seconds)).await;
                }
                result => return result,
            }
        }
    }

    async fn make_request(&self, params: &FetchParams) -> Result<Vec<Value>, SourceError> {
        let response = self
            .client
            .post(self.fetch_url.clone())
            .header("X-Project-Id", &self.project_id)
            .bearer_auth(&self.public_key)
            .json(params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        let records = serde_json::from_slice::<RecordsResponse>(&body)?.into_records()?;
        debug!("Fetched {} signal records", records.len());
        Ok(records)
    }
}

#[async_trait]
impl SignalSource for BackendClient {
    async fn fetch_recent_signals(&self, limit: usize) -> Result<Vec<Value>, SourceError> {
        self.fetch_records(&FetchParams::recent_signals(limit)).await
    }
}
