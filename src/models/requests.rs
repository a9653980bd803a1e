use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::core::address::split_address;
use crate::models::domain::{BuyerProfile, House, PriorityMode};

/// Minimum length of a property address, after trimming
pub const MIN_ADDRESS_LEN: usize = 3;

/// Profile form submission
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveProfileRequest {
    #[validate(range(min = 0.0, message = "Budget cannot be negative"))]
    pub budget: f64,
    #[validate(range(max = 50, message = "Target bedrooms is out of range"))]
    pub target_bedrooms: u32,
    #[validate(custom(function = "validate_bathrooms"))]
    pub target_bathrooms: f64,
    #[serde(default)]
    pub priority_mode: PriorityMode,
    #[serde(default)]
    pub has_school_need: bool,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub commute_address: Option<String>,
    #[validate(range(min = 0.0, message = "Monthly payment cannot be negative"))]
    #[serde(default)]
    pub max_monthly_payment: Option<f64>,
}

impl SaveProfileRequest {
    pub fn into_profile(self) -> BuyerProfile {
        BuyerProfile {
            budget: self.budget,
            target_bedrooms: self.target_bedrooms,
            target_bathrooms: self.target_bathrooms,
            priority_mode: self.priority_mode,
            has_school_need: self.has_school_need,
            zip_code: self.zip_code.filter(|z| !z.trim().is_empty()),
            commute_address: self.commute_address.filter(|a| !a.trim().is_empty()),
            max_monthly_payment: self.max_monthly_payment,
        }
    }
}

/// Bathrooms come in half steps: 1, 1.5, 2, ...
fn validate_bathrooms(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::new("range")
            .with_message("Target bathrooms cannot be negative".into()));
    }
    if (value * 2.0).fract() != 0.0 {
        return Err(ValidationError::new("half_step")
            .with_message("Target bathrooms must be a multiple of 0.5".into()));
    }
    Ok(())
}

/// New property submission
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddHouseRequest {
    #[validate(custom(function = "validate_address"))]
    pub address: String,
    #[validate(range(max = 50))]
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub bathrooms: Option<f64>,
    #[serde(default)]
    pub square_feet: Option<u32>,
}

impl AddHouseRequest {
    pub fn into_house(self) -> House {
        let mut house = House::new(self.address.trim());
        house.bedrooms = self.bedrooms;
        house.bathrooms = self.bathrooms;
        house.square_feet = self.square_feet;
        house
    }
}

fn validate_address(address: &str) -> Result<(), ValidationError> {
    if address.trim().chars().count() < MIN_ADDRESS_LEN {
        return Err(ValidationError::new("length")
            .with_message("Address must be at least 3 characters".into()));
    }
    // The backend needs a street line before the first comma
    let (primary, _) = split_address(address);
    if primary.is_empty() {
        return Err(ValidationError::new("street")
            .with_message("Address must start with a street line".into()));
    }
    Ok(())
}

/// Score all saved properties, optionally under a different priority mode
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    #[serde(default)]
    pub priority_mode: Option<PriorityMode>,
}
