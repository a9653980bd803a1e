// Unit tests for SmartBuy Dashboard

use smartbuy_dashboard::core::adapters::{mode_from_wire, mode_to_wire};
use smartbuy_dashboard::core::presentation::{clamp_score, display_score};
use smartbuy_dashboard::core::{normalize_address, reconcile, score_board, weights_for, weights_for_label, ScoreBand};
use smartbuy_dashboard::models::{
    AddressInput, DimensionScoreDto, HouseFromAttom, MatchSource, PriorityMode, ScoreResponse,
};

fn scored(address1: &str, address2: &str, total: f64) -> ScoreResponse {
    ScoreResponse {
        house: Some(HouseFromAttom {
            address1: Some(address1.to_string()),
            address2: Some(address2.to_string()),
            ..HouseFromAttom::default()
        }),
        total_score: total,
        ..ScoreResponse::default()
    }
}

#[test]
fn test_every_mode_weights_sum_to_100() {
    for mode in PriorityMode::ALL {
        let w = weights_for(mode);
        assert_eq!(
            w.price as u32 + w.space as u32 + w.safety as u32 + w.school as u32,
            100,
            "{} weights",
            mode
        );
    }
}

#[test]
fn test_unknown_label_uses_balanced_weights() {
    assert_eq!(weights_for_label("Luxury"), weights_for(PriorityMode::Balanced));
    assert_eq!(weights_for_label("Safety First").safety, 50);
}

#[test]
fn test_mode_translation_falls_back_both_ways() {
    assert_eq!(mode_to_wire("Budget Driven"), "BUDGET_DRIVEN");
    assert_eq!(mode_to_wire("Cheapest"), "BALANCED");
    assert_eq!(mode_from_wire("EDUCATION_FIRST"), "Education First");
    assert_eq!(mode_from_wire("LUXURY"), "Balanced");
}

#[test]
fn test_normalization_is_idempotent() {
    let inputs = [
        "12 Elm St, Springfield IL",
        "  12   ELM st ,springfield   il ",
        "4 Birch Rd",
        "",
        "a, b, c",
    ];

    for input in inputs {
        let once = normalize_address(input);
        assert_eq!(normalize_address(&once), once, "input {:?}", input);
    }
}

#[test]
fn test_normalization_ignores_case_and_spacing() {
    assert_eq!(
        normalize_address("12 Elm St, Springfield IL"),
        normalize_address("12  ELM ST,springfield il")
    );
    assert_ne!(
        normalize_address("12 Elm St, Springfield IL"),
        normalize_address("14 Elm St, Springfield IL")
    );
}

#[test]
fn test_reversed_results_map_back_to_inputs() {
    let inputs = vec![
        "12 Elm St, Springfield IL".to_string(),
        "4 Birch Rd, Springfield IL".to_string(),
        "9 Oak Ave, Shelbyville IL".to_string(),
    ];

    // Backend spelling differs in case and spacing, order reversed
    let results: Vec<ScoreResponse> = inputs
        .iter()
        .rev()
        .enumerate()
        .map(|(i, address)| {
            let AddressInput { address1, address2 } =
                smartbuy_dashboard::core::adapters::address_to_backend(&address.to_uppercase());
            scored(&address1, &address2, 90.0 - i as f64)
        })
        .collect();

    let reconciled = reconcile(&inputs, &results);

    let shown: Vec<&str> = reconciled.iter().map(|r| r.display_address.as_str()).collect();
    assert_eq!(
        shown,
        vec![
            "9 Oak Ave, Shelbyville IL",
            "4 Birch Rd, Springfield IL",
            "12 Elm St, Springfield IL"
        ]
    );
    assert!(reconciled.iter().all(|r| r.match_source == MatchSource::NormalizedKey));
}

#[test]
fn test_missing_backend_address_uses_position() {
    let inputs = vec!["12 Elm St, Springfield".to_string(), "4 Birch Rd, Springfield".to_string()];
    let results = vec![ScoreResponse::default(), ScoreResponse::default(), ScoreResponse::default()];

    let reconciled = reconcile(&inputs, &results);

    assert_eq!(reconciled[0].display_address, "12 Elm St, Springfield");
    assert_eq!(reconciled[1].display_address, "4 Birch Rd, Springfield");
    assert_eq!(reconciled[1].match_source, MatchSource::InputPosition);
    assert_eq!(reconciled[2].display_address, "Unknown Address");
    assert_eq!(reconciled[2].match_source, MatchSource::Unknown);
}

#[test]
fn test_out_of_range_scores_are_clamped() {
    assert_eq!(clamp_score(-10.0), 0.0);
    assert_eq!(clamp_score(150.0), 100.0);
    assert_eq!(clamp_score(f64::NAN), 0.0);
    assert_eq!(display_score(79.6), 80);
    assert_eq!(ScoreBand::from_score(150.0), ScoreBand::Excellent);
    assert_eq!(ScoreBand::from_score(-10.0), ScoreBand::Poor);
}

#[test]
fn test_scoring_flow_end_to_end() {
    let profile = smartbuy_dashboard::models::BuyerProfile {
        budget: 450_000.0,
        target_bedrooms: 3,
        target_bathrooms: 2.0,
        priority_mode: PriorityMode::SafetyFirst,
        ..Default::default()
    };
    let inputs = vec![
        "12 Elm St, Springfield".to_string(),
        "99 Birch Ave, Springfield".to_string(),
    ];

    let mut birch = scored("99 BIRCH AVE", "SPRINGFIELD", 91.0);
    birch.score_breakdown = Some(vec![
        DimensionScoreDto { dimension: "price".to_string(), score: 95.0 },
        DimensionScoreDto { dimension: "safety".to_string(), score: 88.0 },
    ]);
    let elm = scored("12 ELM ST", "SPRINGFIELD", 77.0);

    let board = score_board(profile.priority_mode, &reconcile(&inputs, &[birch, elm]));

    assert_eq!(board.weights.safety, 50);
    assert_eq!(board.cards.len(), 2);

    let first = &board.cards[0];
    assert_eq!(first.rank, 1);
    assert_eq!(first.address, "99 Birch Ave, Springfield");
    assert_eq!(first.total_score, 91);
    assert_eq!(first.band, ScoreBand::Excellent);
    assert_eq!(first.breakdown[0].weight, Some(25));
    assert_eq!(first.breakdown[1].weight, Some(50));

    let second = &board.cards[1];
    assert_eq!(second.rank, 2);
    assert_eq!(second.address, "12 Elm St, Springfield");
    assert_eq!(second.total_score, 77);
    assert_eq!(second.band, ScoreBand::Fair);
    assert!(second.breakdown.is_empty());
}

#[test]
fn test_unmatched_backend_spelling_is_shown_as_is() {
    let inputs = vec![
        "12 Elm St, Springfield".to_string(),
        "99 Birch Ave, Springfield".to_string(),
    ];

    // Backend dropped the house number, so no key matches
    let birch = scored("birch ave", "springfield", 91.0);
    let elm = scored("12 elm st", "springfield", 77.0);

    let reconciled = reconcile(&inputs, &[birch, elm]);

    assert_eq!(reconciled[0].display_address, "birch ave, springfield");
    assert_eq!(reconciled[0].match_source, MatchSource::BackendAddress);
    assert_eq!(reconciled[1].display_address, "12 Elm St, Springfield");
    assert_eq!(reconciled[1].match_source, MatchSource::NormalizedKey);

    let board = score_board(PriorityMode::SafetyFirst, &reconciled);
    assert_eq!(board.cards[0].band, ScoreBand::Excellent);
    assert_eq!(board.cards[1].band, ScoreBand::Fair);
}
