//! Validator configuration

use crate::condition::SubselectStrategy;
use crate::error::Result;
use serde::Deserialize;

/// Call-site settings for a [`Validator`](crate::condition::Validator)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Strategy for subselect nodes whose document does not pick one
    pub subselect_strategy: SubselectStrategy,
}

impl ValidatorConfig {
    /// Load from a JSON object such as `{"subselect_strategy": "sum"}`
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
