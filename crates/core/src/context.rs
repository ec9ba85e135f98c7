//! Per-request grounding context.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::knowledge::KnowledgeEntry;
use crate::series::DailyPoint;

/// Live product data supplied by the caller.
///
/// Every field is optional; the prompt composer substitutes placeholders for
/// whatever is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<String>,

    /// Fulfillment mode (e.g. "ships from warehouse", "pre-order").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fulfillment: Option<String>,

    /// Any further attributes, kept sorted so prompts stay deterministic.
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, String>,
}

/// Everything one request is grounded on. Built per request, never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroundingContext {
    pub product: ProductAttributes,
    pub matched_knowledge: Option<KnowledgeEntry>,
    pub series: Option<Vec<DailyPoint>>,
    pub user_parameters: BTreeMap<String, String>,
}

impl GroundingContext {
    pub fn new(product: ProductAttributes) -> Self {
        Self {
            product,
            ..Self::default()
        }
    }

    pub fn with_knowledge(mut self, entry: Option<KnowledgeEntry>) -> Self {
        self.matched_knowledge = entry;
        self
    }

    pub fn with_series(mut self, series: Vec<DailyPoint>) -> Self {
        self.series = Some(series);
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.user_parameters.insert(key.into(), value.into());
        self
    }
}
