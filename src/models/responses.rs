use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::domain::{BuyerProfile, House, ModeWeights, PriorityMode};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
    /// Per-field messages for validation failures
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code,
            fields: HashMap::new(),
        }
    }
}

/// Profile read; `profile` is `None` when the session has none yet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub profile: Option<BuyerProfile>,
    pub budget_per_month: Option<u64>,
}

impl From<Option<BuyerProfile>> for ProfileResponse {
    fn from(profile: Option<BuyerProfile>) -> Self {
        let budget_per_month = profile.as_ref().map(BuyerProfile::budget_per_month);
        Self {
            profile,
            budget_per_month,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HousesResponse {
    pub houses: Vec<House>,
    pub total: usize,
}

impl From<Vec<House>> for HousesResponse {
    fn from(houses: Vec<House>) -> Self {
        let total = houses.len();
        Self { houses, total }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupResponse {
    pub house: House,
    pub warnings: Vec<String>,
}

/// One row of the mode weight table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeResponse {
    pub mode: PriorityMode,
    pub wire_token: String,
    pub weights: ModeWeights,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub removed: usize,
}
