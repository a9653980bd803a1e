use std::collections::HashMap;

use crate::core::address::normalize_address;
use crate::models::{DimensionScore, MatchSource, ScoreResponse, ScoreResult};

/// Shown when no other source yields an address
pub const UNKNOWN_ADDRESS: &str = "Unknown Address";

/// Pairs backend scoring results with the addresses the user typed
///
/// The backend returns results sorted by score and echoes its own two-field
/// spelling of each address. Matching is by normalized key, falling back to:
///
/// 1. exact normalized-key match against an input address
/// 2. the backend's raw address, when non-empty
/// 3. the input address at the same position as the result
/// 4. [`UNKNOWN_ADDRESS`]
///
/// Inputs that normalize to the same key keep only the last one written.
#[derive(Debug, Clone)]
pub struct Reconciler<'a> {
    inputs: &'a [String],
    by_key: HashMap<String, &'a str>,
}

impl<'a> Reconciler<'a> {
    pub fn new(inputs: &'a [String]) -> Self {
        let by_key = inputs
            .iter()
            .map(|address| (normalize_address(address), address.as_str()))
            .collect();

        Self { inputs, by_key }
    }

    /// Display address for the result at `position`, and where it came from
    pub fn display_address(&self, position: usize, backend_address: &str) -> (String, MatchSource) {
        if !backend_address.trim().is_empty() {
            if let Some(original) = self.by_key.get(&normalize_address(backend_address)) {
                return (original.to_string(), MatchSource::NormalizedKey);
            }
            return (backend_address.to_string(), MatchSource::BackendAddress);
        }

        match self.inputs.get(position) {
            Some(original) => (original.clone(), MatchSource::InputPosition),
            None => (UNKNOWN_ADDRESS.to_string(), MatchSource::Unknown),
        }
    }

    /// One `ScoreResult` per backend result, in backend order
    pub fn reconcile(&self, results: &[ScoreResponse]) -> Vec<ScoreResult> {
        results
            .iter()
            .enumerate()
            .map(|(position, response)| {
                let backend_address = embedded_address(response);
                let (display_address, match_source) = self.display_address(position, &backend_address);

                if match_source != MatchSource::NormalizedKey {
                    tracing::debug!(
                        "Result {} ({:?}) matched by {:?} as {:?}",
                        position,
                        backend_address,
                        match_source,
                        display_address
                    );
                }

                ScoreResult {
                    display_address,
                    match_source,
                    total_score: response.total_score,
                    dimensions: response
                        .score_breakdown
                        .iter()
                        .flatten()
                        .map(|d| DimensionScore {
                            name: d.dimension.clone(),
                            score: d.score,
                        })
                        .collect(),
                    summary: response.summary.clone().filter(|s| !s.trim().is_empty()),
                    warnings: response.warnings.clone().unwrap_or_default(),
                }
            })
            .collect()
    }
}

/// Match backend results to the submitted addresses
pub fn reconcile(inputs: &[String], results: &[ScoreResponse]) -> Vec<ScoreResult> {
    Reconciler::new(inputs).reconcile(results)
}

/// The backend's own address for a result: non-empty parts joined by ", "
pub fn embedded_address(response: &ScoreResponse) -> String {
    let Some(house) = response.house.as_ref() else {
        return String::new();
    };

    [house.address1.as_deref(), house.address2.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HouseFromAttom;

    fn response(address1: &str, address2: &str, score: f64) -> ScoreResponse {
        ScoreResponse {
            house: Some(HouseFromAttom {
                address1: Some(address1.to_string()),
                address2: Some(address2.to_string()),
                ..Default::default()
            }),
            total_score: score,
            ..Default::default()
        }
    }

    fn inputs(addresses: &[&str]) -> Vec<String> {
        addresses.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_reversed_results_keep_input_spelling() {
        let inputs = inputs(&["1 Ash Rd, Springfield", "2 Oak St, Springfield", "3 Elm Ct, Springfield"]);
        let results = vec![
            response("3 ELM CT", "springfield", 90.0),
            response("2 oak st", "Springfield", 70.0),
            response("1 Ash  Rd", " SPRINGFIELD", 50.0),
        ];

        let reconciled = reconcile(&inputs, &results);

        let addresses: Vec<_> = reconciled.iter().map(|r| r.display_address.as_str()).collect();
        assert_eq!(addresses, vec!["3 Elm Ct, Springfield", "2 Oak St, Springfield", "1 Ash Rd, Springfield"]);
        assert!(reconciled.iter().all(|r| r.match_source == MatchSource::NormalizedKey));
        assert_eq!(reconciled[0].total_score, 90.0);
    }

    #[test]
    fn test_unmatched_backend_address_is_shown_raw() {
        let inputs = inputs(&["12 Elm St, Springfield"]);
        let results = vec![response("Elm St", "Springfield", 77.0)];

        let reconciled = reconcile(&inputs, &results);

        assert_eq!(reconciled[0].display_address, "Elm St, Springfield");
        assert_eq!(reconciled[0].match_source, MatchSource::BackendAddress);
    }

    #[test]
    fn test_empty_backend_address_falls_back_to_position() {
        let inputs = inputs(&["1 Ash Rd, Springfield", "2 Oak St, Springfield"]);
        let results = vec![
            response("1 Ash Rd", "Springfield", 60.0),
            ScoreResponse { house: None, total_score: 40.0, ..Default::default() },
        ];

        let reconciled = reconcile(&inputs, &results);

        assert_eq!(reconciled[1].display_address, "2 Oak St, Springfield");
        assert_eq!(reconciled[1].match_source, MatchSource::InputPosition);
    }

    #[test]
    fn test_blank_parts_count_as_empty() {
        let inputs = inputs(&["1 Ash Rd, Springfield"]);
        let results = vec![response("  ", "", 60.0)];

        let reconciled = reconcile(&inputs, &results);

        assert_eq!(reconciled[0].display_address, "1 Ash Rd, Springfield");
        assert_eq!(reconciled[0].match_source, MatchSource::InputPosition);
    }

    #[test]
    fn test_extra_result_gets_unknown_address() {
        let inputs = inputs(&["1 Ash Rd, Springfield"]);
        let results = vec![
            response("1 Ash Rd", "Springfield", 60.0),
            ScoreResponse::default(),
        ];

        let reconciled = reconcile(&inputs, &results);

        assert_eq!(reconciled[1].display_address, UNKNOWN_ADDRESS);
        assert_eq!(reconciled[1].match_source, MatchSource::Unknown);
    }

    #[test]
    fn test_duplicate_keys_keep_last_spelling() {
        let inputs = inputs(&["1 Ash Rd, Springfield", "1 ASH RD,  springfield"]);
        let results = vec![response("1 Ash Rd", "Springfield", 60.0)];

        let reconciled = reconcile(&inputs, &results);

        assert_eq!(reconciled[0].display_address, "1 ASH RD,  springfield");
    }

    #[test]
    fn test_missing_city_matches_sentinel() {
        let inputs = inputs(&["5 Main St"]);
        let results = vec![response("5 Main St", "Unknown", 65.0)];

        let reconciled = reconcile(&inputs, &results);

        assert_eq!(reconciled[0].display_address, "5 Main St");
        assert_eq!(reconciled[0].match_source, MatchSource::NormalizedKey);
    }

    #[test]
    fn test_breakdown_and_blank_summary() {
        let mut result = response("1 Ash Rd", "Springfield", 60.0);
        result.summary = Some("   ".to_string());
        result.warnings = Some(vec!["No school data".to_string()]);
        result.score_breakdown = Some(vec![crate::models::wire::DimensionScoreDto {
            dimension: "safety".to_string(),
            score: 88.0,
        }]);

        let reconciled = reconcile(&inputs(&["1 Ash Rd, Springfield"]), &[result]);

        assert_eq!(reconciled[0].summary, None);
        assert_eq!(reconciled[0].warnings, vec!["No school data"]);
        assert_eq!(reconciled[0].dimensions, vec![DimensionScore { name: "safety".to_string(), score: 88.0 }]);
    }
}
