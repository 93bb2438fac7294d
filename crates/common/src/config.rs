use std::{env, str::FromStr, time::Duration};

use chrono::FixedOffset;
use thiserror::Error;

use crate::normalize::{TimeDisplay, TimeFormat};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set when SIGNAL_SOURCE=remote")]
    Missing(&'static str),
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Remote,
    InMemory,
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "remote" | "backend" => Ok(SourceKind::Remote),
            "memory" | "mock" => Ok(SourceKind::InMemory),
            other => Err(format!("Unknown source: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub base_url: String,
    pub project_id: String,
    pub public_key: String,
    pub table: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub source: SourceKind,
    pub backend: Option<BackendConfig>,
    pub poll_interval: Duration,
    pub fetch_limit: usize,
    pub mock_latency: Duration,
    pub time_display: TimeDisplay,
}

impl DashboardConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = parse_or(&lookup, "SIGNAL_SOURCE", SourceKind::InMemory)?;

        let backend = match source {
            SourceKind::Remote => Some(BackendConfig {
                base_url: required(&lookup, "SIGNAL_BACKEND_URL")?,
                project_id: required(&lookup, "SIGNAL_BACKEND_PROJECT_ID")?,
                public_key: required(&lookup, "SIGNAL_BACKEND_PUBLIC_KEY")?,
                table: lookup("SIGNAL_BACKEND_TABLE").unwrap_or_else(|| "signals".to_string()),
                timeout: Duration::from_secs(positive(&lookup, "SIGNAL_BACKEND_TIMEOUT_SECS", 10)?),
            }),
            SourceKind::InMemory => None,
        };

        let offset_minutes: i32 = parse_or(&lookup, "DISPLAY_UTC_OFFSET_MINUTES", 0)?;
        let offset = FixedOffset::east_opt(offset_minutes * 60).ok_or_else(|| {
            ConfigError::Invalid {
                name: "DISPLAY_UTC_OFFSET_MINUTES",
                value: offset_minutes.to_string(),
                reason: "offset out of range".to_string(),
            }
        })?;

        Ok(Self {
            source,
            backend,
            poll_interval: Duration::from_secs(positive(&lookup, "SIGNAL_POLL_INTERVAL_SECS", 30)?),
            fetch_limit: positive(&lookup, "SIGNAL_FETCH_LIMIT", 10)? as usize,
            mock_latency: Duration::from_millis(parse_or(&lookup, "SIGNAL_MOCK_LATENCY_MS", 300)?),
            time_display: TimeDisplay::new(
                parse_or(&lookup, "DISPLAY_TIME_FORMAT", TimeFormat::TimeOnly)?,
                offset,
            ),
        })
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: ToString,
{
    match lookup(name) {
        Some(value) => value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            name,
            value,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn positive<F>(lookup: &F, name: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(lookup, name, default)?;
    if value == 0 {
        return Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}
