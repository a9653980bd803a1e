//! Translation between the dashboard's model and the backend wire format

use chrono::Utc;
use serde_json::Value;

use crate::core::address::split_address;
use crate::models::{
    AddressInput, BuyerProfile, BuyerProfileDto, BuyerProfileResponse, House, HouseFromAttom,
    PriorityMode, SchoolRecord, ScoringProfileDto,
};

/// `"Budget Driven"` → `"BUDGET_DRIVEN"`; unknown labels map to `"BALANCED"`
pub fn mode_to_wire(label: &str) -> &'static str {
    PriorityMode::from_label(label).wire_token()
}

/// `"BUDGET_DRIVEN"` → `"Budget Driven"`; unknown tokens map to `"Balanced"`
pub fn mode_from_wire(token: &str) -> &'static str {
    PriorityMode::from_wire(token).label()
}

pub fn profile_to_dto(profile: &BuyerProfile, session_id: &str) -> BuyerProfileDto {
    BuyerProfileDto {
        session_id: session_id.to_string(),
        max_price: profile.budget,
        min_bedrooms: profile.target_bedrooms,
        min_bathrooms: profile.target_bathrooms,
        priority_mode: profile.priority_mode.wire_token().to_string(),
    }
}

/// The backend keeps no school-need flag; it is implied by the education mode
pub fn profile_from_response(response: &BuyerProfileResponse) -> BuyerProfile {
    let priority_mode = PriorityMode::from_wire(&response.priority_mode);
    BuyerProfile {
        budget: response.max_price,
        target_bedrooms: response.min_bedrooms,
        target_bathrooms: response.min_bathrooms,
        priority_mode,
        has_school_need: priority_mode == PriorityMode::EducationFirst,
        ..BuyerProfile::default()
    }
}

/// Profile snapshot sent with scoring requests, under `mode`
pub fn scoring_profile(profile: &BuyerProfile, mode: PriorityMode) -> ScoringProfileDto {
    ScoringProfileDto {
        priority_mode: mode.wire_token().to_string(),
        max_price: profile.budget,
        min_bedrooms: profile.target_bedrooms,
        min_bathrooms: profile.target_bathrooms,
    }
}

/// Reshape a free-text address into the backend's two fields
pub fn address_to_backend(address: &str) -> AddressInput {
    let (address1, address2) = split_address(address);
    AddressInput { address1, address2 }
}

/// Copy looked-up attributes onto a saved house, keeping the user's address
pub fn apply_lookup(house: &mut House, found: &HouseFromAttom, warnings: &[String]) {
    house.attom_id = found.attom_id.or(house.attom_id);
    house.property_type = found.property_type.clone().or(house.property_type.take());
    house.bedrooms = found.beds.or(house.bedrooms);
    house.bathrooms = found.baths_total.map(f64::round).or(house.bathrooms);
    // The backend reports total rooms where the UI shows size
    house.square_feet = found.rooms_total.or(house.square_feet);
    house.avm = found.avm_value;
    house.geo_id_v4 = found.geo_id_v4.clone();
    house.crime_id = found.crime_id.clone();
    house.crime_index = found.crime_index;
    house.schools = found
        .schools_json
        .as_deref()
        .map(parse_schools)
        .unwrap_or_default();
    house.schools_json = found.schools_json.clone();
    house.school_score = average_rating(&house.schools);
    house.warnings = warnings.to_vec();
    house.enriched_at = Some(Utc::now());
}

/// Wire form of a saved house, for single-house scoring
pub fn house_to_wire(house: &House) -> HouseFromAttom {
    let address = address_to_backend(&house.address);
    HouseFromAttom {
        attom_id: house.attom_id,
        address1: Some(address.address1),
        address2: Some(address.address2),
        property_type: house.property_type.clone(),
        beds: house.bedrooms,
        baths_total: house.bathrooms,
        rooms_total: house.square_feet,
        avm_value: house.avm,
        geo_id_v4: house.geo_id_v4.clone(),
        crime_id: house.crime_id.clone(),
        schools_json: house.schools_json.clone(),
        crime_index: house.crime_index,
    }
}

/// Parse the embedded school payload
///
/// Accepts a bare array or an object with a `schools` array. Anything else
/// yields no records.
pub fn parse_schools(payload: &str) -> Vec<SchoolRecord> {
    let value: Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Ignoring unparseable school payload: {}", e);
            return Vec::new();
        }
    };

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("schools") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

fn average_rating(schools: &[SchoolRecord]) -> Option<f64> {
    let ratings: Vec<f64> = schools.iter().filter_map(|s| s.rating).collect();
    if ratings.is_empty() {
        return None;
    }
    Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_round_trip() {
        for mode in PriorityMode::ALL {
            assert_eq!(mode_from_wire(mode_to_wire(mode.label())), mode.label());
        }
        assert_eq!(mode_to_wire("Budget Driven"), "BUDGET_DRIVEN");
        assert_eq!(mode_from_wire("EDUCATION_FIRST"), "Education First");
    }

    #[test]
    fn test_unknown_modes_fall_back_to_balanced() {
        assert_eq!(mode_to_wire("budget driven"), "BALANCED");
        assert_eq!(mode_to_wire("LUXURY"), "BALANCED");
        assert_eq!(mode_from_wire("Budget Driven"), "Balanced");
        assert_eq!(mode_from_wire(""), "Balanced");
    }

    #[test]
    fn test_profile_dto() {
        let profile = BuyerProfile {
            priority_mode: PriorityMode::SafetyFirst,
            ..BuyerProfile::default()
        };

        let dto = profile_to_dto(&profile, "session_1");

        assert_eq!(dto.session_id, "session_1");
        assert_eq!(dto.max_price, 450_000.0);
        assert_eq!(dto.min_bedrooms, 3);
        assert_eq!(dto.min_bathrooms, 2.0);
        assert_eq!(dto.priority_mode, "SAFETY_FIRST");
    }

    #[test]
    fn test_profile_from_response_sets_school_need() {
        let response = BuyerProfileResponse {
            profile_id: Some(7),
            session_id: "session_1".to_string(),
            max_price: 300_000.0,
            min_bedrooms: 2,
            min_bathrooms: 1.5,
            priority_mode: "EDUCATION_FIRST".to_string(),
            updated_at: None,
        };

        let profile = profile_from_response(&response);
        assert_eq!(profile.priority_mode, PriorityMode::EducationFirst);
        assert!(profile.has_school_need);

        let profile = profile_from_response(&BuyerProfileResponse {
            priority_mode: "SOMETHING_ELSE".to_string(),
            ..response
        });
        assert_eq!(profile.priority_mode, PriorityMode::Balanced);
        assert!(!profile.has_school_need);
    }

    #[test]
    fn test_address_to_backend() {
        let address = address_to_backend("12 Elm St, Springfield, IL 62701");
        assert_eq!(address.address1, "12 Elm St");
        assert_eq!(address.address2, "Springfield, IL 62701");

        let address = address_to_backend("12 Elm St");
        assert_eq!(address.address2, "Unknown");
    }

    #[test]
    fn test_apply_lookup() {
        let mut house = House::new("12 Elm St, Springfield");
        let found = HouseFromAttom {
            attom_id: Some(1234),
            address1: Some("12 ELM ST".to_string()),
            address2: Some("SPRINGFIELD, IL".to_string()),
            beds: Some(3),
            baths_total: Some(2.5),
            rooms_total: Some(7),
            avm_value: Some(412_000.0),
            crime_index: Some(42.0),
            schools_json: Some(r#"{"schools":[{"name":"Lincoln","rating":8},{"name":"Adams","rating":6}]}"#.to_string()),
            ..Default::default()
        };

        apply_lookup(&mut house, &found, &["Square footage estimated".to_string()]);

        assert_eq!(house.address, "12 Elm St, Springfield");
        assert_eq!(house.attom_id, Some(1234));
        assert_eq!(house.bedrooms, Some(3));
        assert_eq!(house.bathrooms, Some(3.0));
        assert_eq!(house.square_feet, Some(7));
        assert_eq!(house.avm, Some(412_000.0));
        assert_eq!(house.schools.len(), 2);
        assert_eq!(house.school_score, Some(7.0));
        assert_eq!(house.warnings.len(), 1);
        assert!(house.is_enriched());
    }

    #[test]
    fn test_scoring_wire_keeps_looked_up_schools() {
        let mut house = House::new("12 Elm St, Springfield");
        let payload = r#"[{"name":"Lincoln","rating":8}]"#;
        let found = HouseFromAttom {
            attom_id: Some(1234),
            schools_json: Some(payload.to_string()),
            ..Default::default()
        };

        apply_lookup(&mut house, &found, &[]);
        let wire = house_to_wire(&house);

        assert_eq!(house.schools.len(), 1);
        assert_eq!(wire.schools_json.as_deref(), Some(payload));
        assert_eq!(wire.attom_id, Some(1234));
        assert_eq!(wire.address1.as_deref(), Some("12 Elm St"));
    }

    #[test]
    fn test_parse_schools_shapes() {
        assert_eq!(parse_schools(r#"[{"schoolName":"Lincoln"}]"#)[0].name.as_deref(), Some("Lincoln"));
        assert!(parse_schools("not json").is_empty());
        assert!(parse_schools("42").is_empty());
        assert!(parse_schools(r#"{"other":[]}"#).is_empty());
    }
}
