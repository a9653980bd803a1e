use crate::models::{ModeWeights, PriorityMode};

/// SmartScore dimensions, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Price,
    Space,
    Safety,
    School,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Price,
        Dimension::Space,
        Dimension::Safety,
        Dimension::School,
    ];
}

const BALANCED: ModeWeights = ModeWeights { price: 25, space: 25, safety: 25, school: 25 };
const BUDGET_DRIVEN: ModeWeights = ModeWeights { price: 50, space: 20, safety: 20, school: 10 };
const SAFETY_FIRST: ModeWeights = ModeWeights { price: 25, space: 15, safety: 50, school: 10 };
const EDUCATION_FIRST: ModeWeights = ModeWeights { price: 20, space: 15, safety: 15, school: 50 };

/// Weight table row for a priority mode
pub const fn weights_for(mode: PriorityMode) -> ModeWeights {
    match mode {
        PriorityMode::Balanced => BALANCED,
        PriorityMode::BudgetDriven => BUDGET_DRIVEN,
        PriorityMode::SafetyFirst => SAFETY_FIRST,
        PriorityMode::EducationFirst => EDUCATION_FIRST,
    }
}

/// Weight table row for a form label; unknown labels get the Balanced row
pub fn weights_for_label(label: &str) -> ModeWeights {
    weights_for(PriorityMode::from_label(label))
}

impl PriorityMode {
    pub fn weights(self) -> ModeWeights {
        weights_for(self)
    }
}

impl ModeWeights {
    pub fn total(&self) -> u32 {
        self.price as u32 + self.space as u32 + self.safety as u32 + self.school as u32
    }

    pub fn weight(&self, dimension: Dimension) -> u8 {
        match dimension {
            Dimension::Price => self.price,
            Dimension::Space => self.space,
            Dimension::Safety => self.safety,
            Dimension::School => self.school,
        }
    }

    /// Points a dimension adds to the total: `score * weight / 100`
    ///
    /// The sub-score is clamped to [0, 100] first.
    pub fn contribution(&self, dimension: Dimension, score: f64) -> f64 {
        super::presentation::clamp_score(score) * self.weight(dimension) as f64 / 100.0
    }

    /// Weighted 0-100 total of the four sub-scores
    ///
    /// score = (
    ///     price  * w_price +
    ///     space  * w_space +
    ///     safety * w_safety +
    ///     school * w_school
    /// ) / 100
    pub fn combine(&self, price: f64, space: f64, safety: f64, school: f64) -> u8 {
        let total = self.contribution(Dimension::Price, price)
            + self.contribution(Dimension::Space, space)
            + self.contribution(Dimension::Safety, safety)
            + self.contribution(Dimension::School, school);

        total.round().clamp(0.0, 100.0) as u8
    }
}
