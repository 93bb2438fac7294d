use common::{
    models::Signal,
    normalize::{
        TimeDisplay, field_text, normalize_enum_text, normalize_lot_size, normalize_price,
        normalize_timestamp,
    },
};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusClass {
    Positive,
    Pending,
    Negative,
    Neutral,
}

impl StatusClass {
    /// Exact, case-insensitive lookup. Unknown and absent statuses are neutral.
    pub fn classify(status: Option<&Value>) -> Self {
        let Some(status) = field_text(status) else {
            return StatusClass::Neutral;
        };
        match status.to_lowercase().as_str() {
            "active" | "connected" | "executed" | "success" => StatusClass::Positive,
            "pending" | "processing" => StatusClass::Pending,
            "failed" | "error" | "disconnected" | "expired" => StatusClass::Negative,
            _ => StatusClass::Neutral,
        }
    }

    /// Badge color.
    pub fn color(&self) -> &'static str {
        match self {
            StatusClass::Positive => "green",
            StatusClass::Pending => "yellow",
            StatusClass::Negative => "red",
            StatusClass::Neutral => "gray",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrow {
    Up,
    Down,
}

impl Arrow {
    pub fn glyph(&self) -> char {
        match self {
            Arrow::Up => '▲',
            Arrow::Down => '▼',
        }
    }
}

pub fn action_is_buy(action: Option<&Value>) -> bool {
    field_text(action).is_some_and(|a| a.eq_ignore_ascii_case("buy"))
}

/// Everything a table row shows, already normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalRow {
    pub id: i64,
    pub time: String,
    pub symbol: String,
    pub action: String,
    pub action_is_buy: bool,
    pub arrow: Arrow,
    pub price: String,
    pub stop_loss: String,
    pub take_profit: String,
    pub lot_size: String,
    pub status: String,
    pub status_class: StatusClass,
    pub account: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Projector {
    time_display: TimeDisplay,
}

impl Projector {
    pub fn new(time_display: TimeDisplay) -> Self {
        Self { time_display }
    }

    pub fn project(&self, signal: &Signal) -> SignalRow {
        let fields = &signal.fields;
        let is_buy = action_is_buy(fields.action.as_ref());

        SignalRow {
            id: signal.id,
            time: normalize_timestamp(fields.timestamp.as_ref(), &self.time_display),
            symbol: normalize_enum_text(fields.symbol.as_ref()),
            action: normalize_enum_text(fields.action.as_ref()),
            action_is_buy: is_buy,
            arrow: if is_buy { Arrow::Up } else { Arrow::Down },
            price: normalize_price(fields.price.as_ref()),
            stop_loss: normalize_price(fields.stop_loss.as_ref()),
            take_profit: normalize_price(fields.take_profit.as_ref()),
            lot_size: normalize_lot_size(fields.lot_size.as_ref()),
            status: normalize_enum_text(fields.status.as_ref()),
            status_class: StatusClass::classify(fields.status.as_ref()),
            account: normalize_enum_text(fields.account_number.as_ref()),
        }
    }

    pub fn project_all(&self, signals: &[Signal]) -> Vec<SignalRow> {
        signals.iter().map(|s| self.project(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_is_buy() {
        for v in [json!("buy"), json!("BUY"), json!(" Buy ")] {
            assert!(action_is_buy(Some(&v)), "{}", v);
        }
        for v in [json!("sell"), json!(""), json!(null), json!("hold"), json!("buying")] {
            assert!(!action_is_buy(Some(&v)), "{}", v);
        }
        assert!(!action_is_buy(None));
    }

    #[test]
    fn test_status_buckets() {
        let buckets = [
            (StatusClass::Positive, vec!["active", "connected", "executed", "success"]),
            (StatusClass::Pending, vec!["pending", "processing"]),
            (StatusClass::Negative, vec!["failed", "error", "disconnected", "expired"]),
        ];
        for (class, statuses) in buckets {
            for status in statuses {
                assert_eq!(StatusClass::classify(Some(&json!(status))), class);
                assert_eq!(StatusClass::classify(Some(&json!(status.to_uppercase()))), class);
            }
        }
    }

    #[test]
    fn test_status_neutral_fallback() {
        for v in [
            json!("inactive"),
            json!("paused"),
            json!("live"),
            json!("executed_partially"),
            json!("not failed"),
            json!(""),
            json!(42),
            json!(null),
        ] {
            assert_eq!(StatusClass::classify(Some(&v)), StatusClass::Neutral, "{}", v);
        }
        assert_eq!(StatusClass::classify(None), StatusClass::Neutral);
    }

    #[test]
    fn test_status_colors() {
        assert_eq!(StatusClass::Positive.color(), "green");
        assert_eq!(StatusClass::Pending.color(), "yellow");
        assert_eq!(StatusClass::Negative.color(), "red");
        assert_eq!(StatusClass::Neutral.color(), "gray");
    }

    #[test]
    fn test_end_to_end_sell_row() {
        let signal = Signal::from_value(json!({
            "id": 7,
            "action": "SELL",
            "price": "1.2345",
            "stop_loss": null,
            "status": "FAILED"
        }))
        .unwrap();

        let row = Projector::default().project(&signal);
        assert_eq!(row.id, 7);
        assert_eq!(row.action, "SELL");
        assert!(!row.action_is_buy);
        assert_eq!(row.arrow, Arrow::Down);
        assert_eq!(row.price, "1.23450");
        assert_eq!(row.stop_loss, "0.00000");
        assert_eq!(row.take_profit, "0.00000");
        assert_eq!(row.lot_size, "0.00");
        assert_eq!(row.status, "FAILED");
        assert_eq!(row.status_class, StatusClass::Negative);
        assert_eq!(row.time, "--:--:--");
        assert_eq!(row.symbol, "N/A");
        assert_eq!(row.account, "N/A");
    }

    #[test]
    fn test_full_buy_row() {
        let signal = Signal::from_value(json!({
            "Id": 1,
            "timestamp": "2024-01-15T10:30:00Z",
            "symbol": "EURUSD",
            "action": "BUY",
            "price": 1.0856,
            "stopLoss": 1.0806,
            "takeProfit": 1.0956,
            "lotSize": 0.1,
            "status": "executed",
            "accountNumber": "12345678"
        }))
        .unwrap();

        let row = Projector::default().project(&signal);
        assert_eq!(row.time, "10:30:00");
        assert_eq!(row.symbol, "EURUSD");
        assert_eq!(row.arrow, Arrow::Up);
        assert_eq!(row.price, "1.08560");
        assert_eq!(row.stop_loss, "1.08060");
        assert_eq!(row.take_profit, "1.09560");
        assert_eq!(row.lot_size, "0.10");
        assert_eq!(row.status_class, StatusClass::Positive);
        assert_eq!(row.account, "12345678");
    }

    #[test]
    fn test_rows_never_show_raw_nulls() {
        let signal = Signal::from_value(json!({
            "id": 2,
            "symbol": null,
            "price": "NaN",
            "lot_size": "Infinity",
            "status": ["x"],
            "account_number": {}
        }))
        .unwrap();

        let row = Projector::default().project(&signal);
        let rendered = serde_json::to_string(&row).unwrap();
        for forbidden in ["NaN", "null", "undefined", "inf"] {
            assert!(!rendered.contains(forbidden), "{} in {}", forbidden, rendered);
        }
    }
}
