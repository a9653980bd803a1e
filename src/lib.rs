//! SmartBuy Dashboard - local dashboard service for the SmartBuy home-buying tool
//!
//! This library holds the SmartScore presentation model: the priority-mode
//! weight table, address normalization, reconciliation of backend scoring
//! results with the user's own property records, and the adapters to the
//! SmartBuy backend's wire format.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{normalize_address, reconcile, score_board, weights_for, ScoreBand, ScoreBoard};
pub use models::{BuyerProfile, House, ModeWeights, PriorityMode, ScoreResult};
