// Core model exports
pub mod adapters;
pub mod address;
pub mod presentation;
pub mod reconciler;
pub mod weights;

pub use address::{normalize_address, split_address};
pub use presentation::{clamp_score, score_board, Accent, ScoreBand, ScoreBoard, ScoreCard};
pub use reconciler::{reconcile, Reconciler, UNKNOWN_ADDRESS};
pub use weights::{weights_for, weights_for_label, Dimension};
