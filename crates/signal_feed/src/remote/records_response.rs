use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::traits::SourceError;

const SIGNAL_FIELDS: [&str; 10] = [
    "Id",
    "timestamp",
    "symbol",
    "action",
    "price",
    "stop_loss",
    "take_profit",
    "lot_size",
    "status",
    "account_number",
];

#[derive(Debug, Serialize)]
pub struct FieldRef {
    pub field: FieldName,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FieldName {
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBy {
    pub field_name: String,
    pub sort_type: String, // ASC or DESC
}

#[derive(Debug, Serialize)]
pub struct PagingInfo {
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchParams {
    pub fields: Vec<FieldRef>,
    pub order_by: Vec<OrderBy>,
    pub paging_info: PagingInfo,
}

impl FetchParams {
    /// Newest signals first, `limit` at most.
    pub fn recent_signals(limit: usize) -> Self {
        Self {
            fields: SIGNAL_FIELDS
                .iter()
                .map(|name| FieldRef {
                    field: FieldName {
                        name: name.to_string(),
                    },
                })
                .collect(),
            order_by: vec![OrderBy {
                field_name: "timestamp".to_string(),
                sort_type: "DESC".to_string(),
            }],
            paging_info: PagingInfo { limit, offset: 0 },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecordsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<Value>>,
}

impl RecordsResponse {
    pub fn into_records(self) -> Result<Vec<Value>, SourceError> {
        if !self.success {
            let message = self
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Failed to load signals".to_string());
            return Err(SourceError::Backend(message));
        }
        Ok(self.data.unwrap_or_default())
    }
}
