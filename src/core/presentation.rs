use serde::{Deserialize, Serialize};

use crate::core::weights::Dimension;
use crate::models::{ModeWeights, PriorityMode, ScoreResult};

pub const EXCELLENT_THRESHOLD: u8 = 80;
pub const FAIR_THRESHOLD: u8 = 60;

/// Clamp a score into [0, 100]; NaN becomes 0
#[inline]
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

/// Integer score as shown to the user
#[inline]
pub fn display_score(score: f64) -> u8 {
    clamp_score(score).round() as u8
}

/// Width of a score bar, as a percentage of the full bar
#[inline]
pub fn bar_width_percent(score: f64) -> f64 {
    clamp_score(score)
}

/// Severity band of a total score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Excellent,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        let score = display_score(score);
        if score >= EXCELLENT_THRESHOLD {
            ScoreBand::Excellent
        } else if score >= FAIR_THRESHOLD {
            ScoreBand::Fair
        } else {
            ScoreBand::Poor
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "excellent",
            ScoreBand::Fair => "fair",
            ScoreBand::Poor => "poor",
        }
    }
}

/// Visual grouping of a breakdown dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    Price,
    Space,
    Safety,
    School,
}

impl Dimension {
    /// Recognize a backend dimension name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "price" | "affordability" | "budget" => Some(Dimension::Price),
            "space" => Some(Dimension::Space),
            "safety" | "crime" => Some(Dimension::Safety),
            "school" | "schools" | "education" => Some(Dimension::School),
            _ => None,
        }
    }
}

impl Accent {
    /// Unrecognized names share the school accent
    pub fn for_dimension(name: &str) -> Self {
        match Dimension::from_name(name) {
            Some(Dimension::Price) => Accent::Price,
            Some(Dimension::Space) => Accent::Space,
            Some(Dimension::Safety) => Accent::Safety,
            Some(Dimension::School) | None => Accent::School,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownRow {
    pub dimension: String,
    pub score: u8,
    pub accent: Accent,
    pub bar_width: f64,
    /// Mode weight, when the dimension is one of the four weighted ones
    pub weight: Option<u8>,
    pub contribution: Option<f64>,
}

/// A scored property ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCard {
    pub rank: usize,
    pub address: String,
    pub total_score: u8,
    pub band: ScoreBand,
    pub bar_width: f64,
    pub breakdown: Vec<BreakdownRow>,
    pub summary: Option<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBoard {
    pub mode: PriorityMode,
    pub weights: ModeWeights,
    pub cards: Vec<ScoreCard>,
}

/// Build one card; `rank` is the 1-based position in backend order
pub fn score_card(rank: usize, result: &ScoreResult, weights: &ModeWeights) -> ScoreCard {
    let breakdown = result
        .dimensions
        .iter()
        .map(|dimension| {
            let known = Dimension::from_name(&dimension.name);
            BreakdownRow {
                dimension: dimension.name.clone(),
                score: display_score(dimension.score),
                accent: Accent::for_dimension(&dimension.name),
                bar_width: bar_width_percent(dimension.score),
                weight: known.map(|d| weights.weight(d)),
                contribution: known.map(|d| weights.contribution(d, dimension.score)),
            }
        })
        .collect();

    ScoreCard {
        rank,
        address: result.display_address.clone(),
        total_score: display_score(result.total_score),
        band: ScoreBand::from_score(result.total_score),
        bar_width: bar_width_percent(result.total_score),
        breakdown,
        summary: result.summary.clone(),
        warnings: result.warnings.clone(),
    }
}

/// Cards in the order given, which is the backend's rank order
pub fn score_board(mode: PriorityMode, results: &[ScoreResult]) -> ScoreBoard {
    let weights = mode.weights();
    let cards = results
        .iter()
        .enumerate()
        .map(|(i, result)| score_card(i + 1, result, &weights))
        .collect();

    ScoreBoard { mode, weights, cards }
}
