// Model exports
pub mod domain;
pub mod requests;
pub mod responses;
pub mod wire;

pub use domain::{BuyerProfile, DimensionScore, House, MatchSource, ModeWeights, PriorityMode, SchoolRecord, ScoreResult};
pub use requests::{AddHouseRequest, SaveProfileRequest, ScoreRequest};
pub use responses::{DeleteResponse, ErrorResponse, HealthResponse, HousesResponse, LookupResponse, ModeResponse, ProfileResponse};
pub use wire::{AddressInput, BatchScoreResponse, BuyerProfileDto, BuyerProfileResponse, DimensionScoreDto, HouseFromAttom, HouseLookupResponse, ScoreResponse, ScoringProfileDto};
