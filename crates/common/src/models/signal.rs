use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::trace;

use crate::{normalize::parse_timestamp, validate::record_id};

/// A signal record exactly as the backend sent it. Every field is optional
/// and keeps its original JSON type until it is normalized for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawSignal {
    pub id: Option<Value>,
    pub timestamp: Option<Value>,
    pub symbol: Option<Value>,
    pub action: Option<Value>, // "BUY" or "SELL"
    pub price: Option<Value>,
    pub stop_loss: Option<Value>,
    pub take_profit: Option<Value>,
    pub lot_size: Option<Value>,
    pub status: Option<Value>,
    pub account_number: Option<Value>,
}

impl RawSignal {
    /// Picks each field by its snake_case key, falling back to the camelCase
    /// spelling. Records may carry both; the first non-null one wins.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let pick = |keys: &[&str]| {
            keys.iter()
                .filter_map(|key| object.get(*key))
                .find(|v| !v.is_null())
                .cloned()
        };

        Self {
            id: pick(&["id", "Id"]),
            timestamp: pick(&["timestamp"]),
            symbol: pick(&["symbol"]),
            action: pick(&["action"]),
            price: pick(&["price"]),
            stop_loss: pick(&["stop_loss", "stopLoss"]),
            take_profit: pick(&["take_profit", "takeProfit"]),
            lot_size: pick(&["lot_size", "lotSize"]),
            status: pick(&["status"]),
            account_number: pick(&["account_number", "accountNumber"]),
        }
    }
}

/// A record that passed validation: it has an identity, and its timestamp
/// has been parsed once for ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub id: i64,
    pub placed_at: Option<DateTime<Utc>>,
    pub fields: RawSignal,
}

impl Signal {
    /// Returns `None` for records that cannot be rendered at all.
    pub fn from_value(record: Value) -> Option<Self> {
        let Some(id) = record_id(&record) else {
            trace!("Dropping signal record without usable id");
            return None;
        };

        let Value::Object(object) = &record else {
            return None;
        };
        let fields = RawSignal::from_object(object);

        Some(Self {
            id,
            placed_at: parse_timestamp(fields.timestamp.as_ref()),
            fields,
        })
    }
}

/// Validates a fetched batch and orders it most-recent-first. Records with
/// no readable timestamp sort after all others and keep their fetch order.
pub fn prepare_batch(records: Vec<Value>) -> Vec<Signal> {
    let mut signals: Vec<Signal> = records.into_iter().filter_map(Signal::from_value).collect();
    signals.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));
    signals
}
