//! Backend wire format
//!
//! Field names follow the SmartBuy backend's JSON exactly; the adapters in
//! `core::adapters` convert between these and the domain types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Profile payload sent to `POST /buyerProfile`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyerProfileDto {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(rename = "maxPrice")]
    pub max_price: f64,
    #[serde(rename = "minBedrooms")]
    pub min_bedrooms: u32,
    #[serde(rename = "minBathrooms")]
    pub min_bathrooms: f64,
    #[serde(rename = "priorityMode")]
    pub priority_mode: String,
}

/// Profile as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyerProfileResponse {
    #[serde(rename = "profileId", default)]
    pub profile_id: Option<i64>,
    #[serde(rename = "sessionId", default)]
    pub session_id: String,
    #[serde(rename = "maxPrice")]
    pub max_price: f64,
    #[serde(rename = "minBedrooms")]
    pub min_bedrooms: u32,
    #[serde(rename = "minBathrooms")]
    pub min_bathrooms: f64,
    #[serde(rename = "priorityMode", default)]
    pub priority_mode: String,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<String>,
}

/// Profile snapshot embedded in scoring requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringProfileDto {
    #[serde(rename = "priorityMode")]
    pub priority_mode: String,
    #[serde(rename = "maxPrice")]
    pub max_price: f64,
    #[serde(rename = "minBedrooms")]
    pub min_bedrooms: u32,
    #[serde(rename = "minBathrooms")]
    pub min_bathrooms: f64,
}

/// Two-field address convention used by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressInput {
    pub address1: String,
    pub address2: String,
}

/// Property attributes returned by the backend's ATTOM lookup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseFromAttom {
    #[serde(default)]
    pub attom_id: Option<i64>,
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub beds: Option<u32>,
    #[serde(default)]
    pub baths_total: Option<f64>,
    #[serde(default)]
    pub rooms_total: Option<u32>,
    #[serde(default)]
    pub avm_value: Option<f64>,
    #[serde(default)]
    pub geo_id_v4: Option<String>,
    #[serde(default)]
    pub crime_id: Option<String>,
    /// School records as an embedded JSON document
    #[serde(default)]
    pub schools_json: Option<String>,
    #[serde(default)]
    pub crime_index: Option<f64>,
}

/// Response of `POST /api/houses/from-attom-hardcoded`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HouseLookupResponse {
    #[serde(default)]
    pub house: Option<HouseFromAttom>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Request body of `POST /api/score/house`
#[derive(Debug, Clone, Serialize)]
pub struct ScoreHouseRequest {
    #[serde(rename = "buyerProfile")]
    pub buyer_profile: ScoringProfileDto,
    pub house: HouseFromAttom,
}

/// Request body of `POST /api/score/batch-from-attom`
#[derive(Debug, Clone, Serialize)]
pub struct BatchScoreRequest {
    #[serde(rename = "buyerProfile")]
    pub buyer_profile: ScoringProfileDto,
    pub addresses: Vec<AddressInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScoreDto {
    #[serde(alias = "name")]
    pub dimension: String,
    pub score: f64,
}

/// One scored property
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreResponse {
    #[serde(default)]
    pub house: Option<HouseFromAttom>,
    #[serde(rename = "totalScore", default)]
    pub total_score: f64,
    #[serde(rename = "scoreBreakdown", default)]
    pub score_breakdown: Option<Vec<DimensionScoreDto>>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchScoreResponse {
    #[serde(default)]
    pub results: Vec<ScoreResponse>,
}

/// Error body returned by the backend
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<HashMap<String, String>>,
}
