//! Transaction facts and the daily series derived from them.

use serde::{Deserialize, Serialize};

/// One transaction record as it comes out of the fact store.
///
/// `quantity` is kept as raw JSON so that a single malformed value can be
/// tolerated by the aggregator instead of failing deserialization of the whole
/// batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactRow {
    pub identifier: String,

    /// Zero-padded ISO date, `YYYY-MM-DD`.
    pub date: String,

    #[serde(default)]
    pub quantity: serde_json::Value,
}

impl FactRow {
    pub fn new(identifier: impl Into<String>, date: impl Into<String>, quantity: f64) -> Self {
        Self {
            identifier: identifier.into(),
            date: date.into(),
            quantity: serde_json::json!(quantity),
        }
    }

    /// The numeric quantity, or `None` when missing or not a number.
    pub fn quantity(&self) -> Option<f64> {
        numeric_value(&self.quantity)
    }
}

/// Aggregated sales for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: String,
    pub value: f64,
}

impl DailyPoint {
    pub fn new(date: impl Into<String>, value: f64) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }
}

/// Read a JSON value as a finite number.
///
/// Accepts JSON numbers and strings that parse cleanly as a number after
/// trimming (`"12"`, `" 3.5 "`). Anything else, including `NaN`/`inf`
/// spellings and strings with units, is `None`.
pub fn numeric_value(value: &serde_json::Value) -> Option<f64> {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}
