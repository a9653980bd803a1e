// Route exports
pub mod houses;
pub mod profile;
pub mod scores;

use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use std::sync::Arc;
use validator::ValidationErrors;

use crate::models::{ErrorResponse, HealthResponse, ModeResponse, PriorityMode};
use crate::services::{Action, ActionGuard, BackendClient, BackendError, FailureKind, LocalStore, StoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<BackendClient>,
    pub store: Arc<LocalStore>,
    pub guard: ActionGuard,
}

impl AppState {
    pub fn new(backend: Arc<BackendClient>, store: Arc<LocalStore>) -> Self {
        Self {
            backend,
            store,
            guard: ActionGuard::new(),
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .route("/modes", web::get().to(list_modes))
            .configure(profile::configure)
            .configure(houses::configure)
            .configure(scores::configure),
    );
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Priority modes and their weights
///
/// GET /api/v1/modes
async fn list_modes() -> impl Responder {
    let modes: Vec<ModeResponse> = PriorityMode::ALL
        .into_iter()
        .map(|mode| ModeResponse {
            mode,
            wire_token: mode.wire_token().to_string(),
            weights: mode.weights(),
        })
        .collect();

    HttpResponse::Ok().json(modes)
}

fn error_response(status: StatusCode, error: ErrorResponse) -> HttpResponse {
    HttpResponse::build(status).json(error)
}

/// 400 with one message per offending field
pub(crate) fn validation_failed(errors: &ValidationErrors) -> HttpResponse {
    let mut body = ErrorResponse::new("validation_failed", "Please correct the highlighted fields.", 400);
    body.fields = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let message = errs
                .iter()
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| format!("Invalid value for {}", field));
            (field.to_string(), message)
        })
        .collect();

    error_response(StatusCode::BAD_REQUEST, body)
}

/// 409 while the same action is still running
pub(crate) fn busy(action: Action) -> HttpResponse {
    error_response(
        StatusCode::CONFLICT,
        ErrorResponse::new(
            "action_in_progress",
            format!("A {} request is already in progress.", action.as_str().replace('_', " ")),
            409,
        ),
    )
}

pub(crate) fn not_found(what: &str) -> HttpResponse {
    error_response(
        StatusCode::NOT_FOUND,
        ErrorResponse::new("not_found", format!("{} was not found.", what), 404),
    )
}

pub(crate) fn backend_failure(action: Action, err: BackendError) -> HttpResponse {
    let message = err.user_message();

    let (status, error) = match err.kind() {
        FailureKind::Validation => (StatusCode::BAD_REQUEST, "validation_failed"),
        FailureKind::NotFound => (StatusCode::NOT_FOUND, "not_found"),
        FailureKind::UpstreamDataUnavailable => (StatusCode::UNPROCESSABLE_ENTITY, "no_property_data"),
        FailureKind::Network => (StatusCode::BAD_GATEWAY, "network_error"),
        FailureKind::Backend => (StatusCode::BAD_GATEWAY, "backend_error"),
    };

    if status == StatusCode::BAD_GATEWAY {
        tracing::error!("{} failed: {}", action.as_str(), err);
    } else {
        tracing::warn!("{} failed: {}", action.as_str(), err);
    }

    let mut body = ErrorResponse::new(error, message, status.as_u16());
    if let BackendError::Validation(fields) = err {
        body.fields = fields;
    }

    error_response(status, body)
}

pub(crate) fn store_failure(action: Action, err: StoreError) -> HttpResponse {
    tracing::error!("{} failed on local store: {}", action.as_str(), err);
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorResponse::new("store_error", "Could not access saved data. Please try again.", 500),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_failure_statuses() {
        let response = backend_failure(Action::LookupHouse, BackendError::NoUpstreamData("\"1 Main St\"".into()));
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = backend_failure(Action::Score, BackendError::ApiError { status: 500, message: "boom".into() });
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        assert_eq!(busy(Action::Score).status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_validation_failed_status() {
        let request = crate::models::AddHouseRequest {
            address: "x".to_string(),
            bedrooms: None,
            bathrooms: None,
            square_feet: None,
        };
        let errors = request.validate().unwrap_err();

        assert_eq!(validation_failed(&errors).status(), StatusCode::BAD_REQUEST);
    }
}
