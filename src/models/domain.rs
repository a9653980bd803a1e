use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Priority modes for the SmartScore weighting
///
/// Serialized with the human-readable label ("Budget Driven"). Unknown labels
/// deserialize to `Balanced`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PriorityMode {
    #[default]
    Balanced,
    BudgetDriven,
    SafetyFirst,
    EducationFirst,
}

impl PriorityMode {
    pub const ALL: [PriorityMode; 4] = [
        PriorityMode::Balanced,
        PriorityMode::BudgetDriven,
        PriorityMode::SafetyFirst,
        PriorityMode::EducationFirst,
    ];

    /// Label shown in the profile form
    pub fn label(self) -> &'static str {
        match self {
            PriorityMode::Balanced => "Balanced",
            PriorityMode::BudgetDriven => "Budget Driven",
            PriorityMode::SafetyFirst => "Safety First",
            PriorityMode::EducationFirst => "Education First",
        }
    }

    /// Token the backend expects
    pub fn wire_token(self) -> &'static str {
        match self {
            PriorityMode::Balanced => "BALANCED",
            PriorityMode::BudgetDriven => "BUDGET_DRIVEN",
            PriorityMode::SafetyFirst => "SAFETY_FIRST",
            PriorityMode::EducationFirst => "EDUCATION_FIRST",
        }
    }

    /// Parse a form label, falling back to `Balanced`
    pub fn from_label(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|mode| mode.label() == label)
            .unwrap_or_default()
    }

    /// Parse a backend token, falling back to `Balanced`
    pub fn from_wire(token: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|mode| mode.wire_token() == token)
            .unwrap_or_default()
    }
}

impl From<String> for PriorityMode {
    fn from(value: String) -> Self {
        PriorityMode::from_label(&value)
    }
}

impl From<PriorityMode> for String {
    fn from(value: PriorityMode) -> Self {
        value.label().to_string()
    }
}

impl std::fmt::Display for PriorityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Percentage weights of the four SmartScore dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeWeights {
    pub price: u8,
    pub space: u8,
    pub safety: u8,
    pub school: u8,
}

/// Buyer profile with home-buying preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerProfile {
    pub budget: f64,
    pub target_bedrooms: u32,
    pub target_bathrooms: f64,
    #[serde(default)]
    pub priority_mode: PriorityMode,
    #[serde(default)]
    pub has_school_need: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commute_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_monthly_payment: Option<f64>,
}

impl BuyerProfile {
    /// Budget spread over twelve months, rounded to whole dollars
    pub fn budget_per_month(&self) -> u64 {
        if self.budget <= 0.0 || !self.budget.is_finite() {
            return 0;
        }
        (self.budget / 12.0).round() as u64
    }
}

impl Default for BuyerProfile {
    fn default() -> Self {
        Self {
            budget: 450_000.0,
            target_bedrooms: 3,
            target_bathrooms: 2.0,
            priority_mode: PriorityMode::Balanced,
            has_school_need: false,
            zip_code: None,
            commute_address: None,
            max_monthly_payment: None,
        }
    }
}

/// A school near a property, parsed from the backend's embedded payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolRecord {
    #[serde(default, alias = "schoolName", alias = "InstitutionName")]
    pub name: Option<String>,
    #[serde(default, alias = "schoolRating", alias = "GSTestRating")]
    pub rating: Option<f64>,
    #[serde(default, alias = "distance")]
    pub distance_miles: Option<f64>,
    #[serde(default, alias = "gradeRange")]
    pub level: Option<String>,
}

/// A candidate property saved by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct House {
    pub id: Uuid,
    pub address: String,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<f64>,
    #[serde(default)]
    pub square_feet: Option<u32>,
    #[serde(default)]
    pub attom_id: Option<i64>,
    #[serde(default)]
    pub geo_id_v4: Option<String>,
    #[serde(default)]
    pub property_type: Option<String>,
    /// Automated valuation (estimated property value)
    #[serde(default)]
    pub avm: Option<f64>,
    #[serde(default)]
    pub crime_id: Option<String>,
    #[serde(default)]
    pub crime_index: Option<f64>,
    #[serde(default)]
    pub school_score: Option<f64>,
    #[serde(default)]
    pub schools: Vec<SchoolRecord>,
    /// School payload exactly as the lookup returned it, resent when scoring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schools_json: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub enriched_at: Option<DateTime<Utc>>,
}

impl House {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            address: address.into(),
            bedrooms: None,
            bathrooms: None,
            square_feet: None,
            attom_id: None,
            geo_id_v4: None,
            property_type: None,
            avm: None,
            crime_id: None,
            crime_index: None,
            school_score: None,
            schools: Vec::new(),
            schools_json: None,
            warnings: Vec::new(),
            created_at: Utc::now(),
            enriched_at: None,
        }
    }

    pub fn is_enriched(&self) -> bool {
        self.enriched_at.is_some()
    }
}

/// Which fallback produced a result's display address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    NormalizedKey,
    BackendAddress,
    InputPosition,
    Unknown,
}

/// One dimension of a score breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub name: String,
    pub score: f64,
}

/// A backend scoring result paired with the user's own address text
///
/// Scores are kept as received; clamping happens in the presentation model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub display_address: String,
    pub match_source: MatchSource,
    pub total_score: f64,
    pub dimensions: Vec<DimensionScore>,
    pub summary: Option<String>,
    pub warnings: Vec<String>,
}
