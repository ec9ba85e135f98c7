//! Validated, typed model outputs.

use serde::{Deserialize, Serialize};

/// A model answer that passed its intent's contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidatedResult {
    Text { text: String },
    Copy(CopyResult),
    Forecast(ForecastResult),
    Image(ImageResult),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyResult {
    pub headline: String,
    pub copy: String,
    #[serde(rename = "visualHooks")]
    pub visual_hooks: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: String,
    pub predicted_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub summary: String,
    pub analysis: String,
    pub forecast: Vec<ForecastPoint>,
}

impl ForecastResult {
    /// Sum of all predicted sales; 0 when the model declined to forecast.
    pub fn total_predicted_sales(&self) -> f64 {
        self.forecast.iter().map(|p| p.predicted_sales).sum()
    }

    pub fn declined(&self) -> bool {
        self.forecast.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResult {
    pub url: String,
}
