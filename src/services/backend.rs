use crate::core::adapters::{address_to_backend, profile_from_response, profile_to_dto, scoring_profile};
use crate::models::wire::{BackendErrorBody, BatchScoreRequest, ScoreHouseRequest};
use crate::models::{
    AddressInput, BatchScoreResponse, BuyerProfile, BuyerProfileResponse, HouseFromAttom,
    HouseLookupResponse, PriorityMode, ScoreResponse,
};
use reqwest::{Client, Response, StatusCode};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Phrases the backend uses when its data provider has nothing for an address
const NO_DATA_MARKERS: [&str; 5] = [
    "no data",
    "no house data",
    "no property",
    "not found",
    "successwithoutresult",
];

/// Errors that can occur when talking to the SmartBuy backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Validation failed")]
    Validation(HashMap<String, String>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No property data available for {0}")]
    NoUpstreamData(String),

    #[error("API returned error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// How a failure should be treated by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    NotFound,
    UpstreamDataUnavailable,
    Network,
    Backend,
}

impl BackendError {
    pub fn kind(&self) -> FailureKind {
        match self {
            BackendError::Validation(_) => FailureKind::Validation,
            BackendError::NotFound(_) => FailureKind::NotFound,
            BackendError::NoUpstreamData(_) => FailureKind::UpstreamDataUnavailable,
            BackendError::RequestError(_) => FailureKind::Network,
            BackendError::ApiError { .. } | BackendError::InvalidResponse(_) => FailureKind::Backend,
        }
    }

    /// Message suitable for showing next to the action that failed
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Validation(_) => "Please correct the highlighted fields.".to_string(),
            BackendError::NotFound(what) => format!("{} was not found.", what),
            BackendError::NoUpstreamData(address) => format!(
                "No property data is available for {}. Check the street address and city, or try a nearby address.",
                address
            ),
            BackendError::RequestError(_) => {
                "Could not reach the SmartBuy service. Check your connection and try again.".to_string()
            }
            BackendError::ApiError { message, .. } => message.clone(),
            BackendError::InvalidResponse(_) => {
                "The SmartBuy service returned an unexpected response. Please try again.".to_string()
            }
        }
    }

    fn is_no_data(&self) -> bool {
        match self {
            BackendError::NotFound(_) => true,
            BackendError::ApiError { message, .. } => {
                let message = message.to_lowercase();
                NO_DATA_MARKERS.iter().any(|marker| message.contains(marker))
            }
            _ => false,
        }
    }
}

/// SmartBuy backend API client
///
/// Handles all communication with the backend:
/// - Buyer profile save/load/delete, keyed by session id
/// - Property lookup (ATTOM enrichment)
/// - Single and batch SmartScore requests
pub struct BackendClient {
    base_url: String,
    client: Client,
}

impl BackendClient {
    /// Create a new backend client
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Save the profile for a session
    pub async fn save_profile(
        &self,
        profile: &BuyerProfile,
        session_id: &str,
    ) -> Result<BuyerProfile, BackendError> {
        let dto = profile_to_dto(profile, session_id);

        tracing::debug!("Saving profile for session {} (mode {})", session_id, dto.priority_mode);

        let response = self
            .client
            .post(self.url("/buyerProfile"))
            .json(&dto)
            .send()
            .await?;

        let response = check_status(response).await?;
        let saved: BuyerProfileResponse = parse_json(response).await?;

        // Keep UI-only fields the backend does not store
        Ok(BuyerProfile {
            zip_code: profile.zip_code.clone(),
            commute_address: profile.commute_address.clone(),
            max_monthly_payment: profile.max_monthly_payment,
            ..profile_from_response(&saved)
        })
    }

    /// Fetch the profile for a session; `None` when the backend has none
    pub async fn get_profile(&self, session_id: &str) -> Result<Option<BuyerProfile>, BackendError> {
        let url = self.url(&format!("/buyerProfile/{}", urlencoding::encode(session_id)));

        tracing::debug!("Fetching profile for session: {}", session_id);

        let response = self.client.get(&url).send().await?;

        match check_status(response).await {
            Ok(response) => {
                let profile: BuyerProfileResponse = parse_json(response).await?;
                Ok(Some(profile_from_response(&profile)))
            }
            Err(BackendError::NotFound(_)) => {
                tracing::debug!("No profile stored for session {}", session_id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn delete_profile(&self, session_id: &str) -> Result<(), BackendError> {
        let url = self.url(&format!("/buyerProfile/{}", urlencoding::encode(session_id)));

        let response = self.client.delete(&url).send().await?;
        check_status(response).await?;

        tracing::debug!("Deleted profile for session {}", session_id);
        Ok(())
    }

    /// Look up property attributes for a free-text address
    pub async fn lookup_house(
        &self,
        address: &str,
    ) -> Result<(HouseFromAttom, Vec<String>), BackendError> {
        let AddressInput { address1, address2 } = address_to_backend(address);

        // The endpoint takes the address as query parameters, not a body
        let url = self.url(&format!(
            "/api/houses/from-attom-hardcoded?address1={}&address2={}",
            urlencoding::encode(&address1),
            urlencoding::encode(&address2)
        ));

        tracing::debug!("Looking up house: address1={:?}, address2={:?}", address1, address2);

        let response = self.client.post(&url).send().await?;

        let response = check_status(response)
            .await
            .map_err(|e| no_data_for(e, format!("\"{}\"", address)))?;

        let found: HouseLookupResponse = parse_json(response).await?;

        match found.house {
            Some(house) => {
                if !found.warnings.is_empty() {
                    tracing::info!("Lookup for {:?} returned warnings: {:?}", address, found.warnings);
                }
                Ok((house, found.warnings))
            }
            None => Err(BackendError::NoUpstreamData(format!("\"{}\"", address))),
        }
    }

    /// Score one house under `mode`
    pub async fn score_house(
        &self,
        profile: &BuyerProfile,
        mode: PriorityMode,
        house: HouseFromAttom,
    ) -> Result<ScoreResponse, BackendError> {
        let request = ScoreHouseRequest {
            buyer_profile: scoring_profile(profile, mode),
            house,
        };

        let response = self
            .client
            .post(self.url("/api/score/house"))
            .json(&request)
            .send()
            .await?;

        let response = check_status(response).await?;
        parse_json(response).await
    }

    /// Score several addresses at once
    ///
    /// Results come back sorted by score, not in request order.
    pub async fn batch_score(
        &self,
        profile: &BuyerProfile,
        mode: PriorityMode,
        addresses: Vec<AddressInput>,
    ) -> Result<Vec<ScoreResponse>, BackendError> {
        let count = addresses.len();
        let request = BatchScoreRequest {
            buyer_profile: scoring_profile(profile, mode),
            addresses,
        };

        tracing::debug!("Batch scoring {} addresses under {}", count, mode);

        let response = self
            .client
            .post(self.url("/api/score/batch-from-attom"))
            .json(&request)
            .send()
            .await?;

        let response = check_status(response)
            .await
            .map_err(|e| no_data_for(e, "one or more of these addresses".to_string()))?;

        let batch: BatchScoreResponse = parse_json(response).await?;

        if batch.results.len() != count {
            tracing::warn!("Submitted {} addresses but received {} results", count, batch.results.len());
        }

        Ok(batch.results)
    }
}

/// `described` names the address(es) in the user message
fn no_data_for(error: BackendError, described: String) -> BackendError {
    if error.is_no_data() {
        BackendError::NoUpstreamData(described)
    } else {
        error
    }
}

/// Map a non-success response to an error
///
/// JSON bodies with `errors` on 400 are validation failures; JSON bodies with
/// `message` carry that message; anything else becomes `HTTP {status}: {reason}`.
async fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let is_json = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false);

    let body = if is_json {
        response.json::<BackendErrorBody>().await.unwrap_or_default()
    } else {
        BackendErrorBody::default()
    };

    tracing::warn!("Backend returned {} ({:?})", status, body.message);

    if status == StatusCode::BAD_REQUEST {
        if let Some(errors) = body.errors {
            return Err(BackendError::Validation(errors));
        }
    }

    let message = body.message.unwrap_or_else(|| {
        format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        )
    });

    if status == StatusCode::NOT_FOUND {
        return Err(BackendError::NotFound(message));
    }

    Err(BackendError::ApiError {
        status: status.as_u16(),
        message,
    })
}

async fn parse_json<T>(response: Response) -> Result<T, BackendError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse response: {}", e)))
}
