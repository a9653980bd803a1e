use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;

use super::{backend_failure, busy, not_found, store_failure, AppState};
use crate::core::adapters::{address_to_backend, house_to_wire};
use crate::core::{reconcile, score_board};
use crate::models::{BuyerProfile, ErrorResponse, ScoreRequest};
use crate::services::Action;

/// Configure SmartScore routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/scores", web::post().to(score_all))
        .route("/scores/{id}", web::post().to(score_one));
}

/// An empty body keeps the profile's mode; anything else must be a valid override
fn parse_override(body: &[u8]) -> Result<ScoreRequest, HttpResponse> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ScoreRequest::default());
    }

    serde_json::from_slice(body).map_err(|e| {
        tracing::info!("Rejected score override: {}", e);
        HttpResponse::BadRequest().json(ErrorResponse::new(
            "invalid_json",
            format!("Invalid JSON: {}", e),
            400,
        ))
    })
}

fn profile_required() -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new(
        "profile_required",
        "Set up your buyer profile before scoring properties.",
        400,
    ))
}

/// Local snapshot first, then the backend
async fn current_profile(state: &AppState, action: Action) -> Result<Option<BuyerProfile>, HttpResponse> {
    match state.store.profile().await {
        Ok(Some(profile)) => return Ok(Some(profile)),
        Ok(None) => {}
        Err(e) => return Err(store_failure(action, e)),
    }

    let session_id = state
        .store
        .session_id()
        .await
        .map_err(|e| store_failure(action, e))?;

    state
        .backend
        .get_profile(&session_id)
        .await
        .map_err(|e| backend_failure(action, e))
}

/// Rank every saved property
///
/// POST /api/v1/scores
///
/// Request body (optional):
/// ```json
/// { "priorityMode": "Budget Driven" }
/// ```
async fn score_all(state: web::Data<AppState>, body: web::Bytes) -> impl Responder {
    let req = match parse_override(&body) {
        Ok(req) => req,
        Err(response) => return response,
    };

    let Some(_in_flight) = state.guard.try_begin(Action::Score) else {
        return busy(Action::Score);
    };

    let profile = match current_profile(&state, Action::Score).await {
        Ok(Some(profile)) => profile,
        Ok(None) => return profile_required(),
        Err(response) => return response,
    };

    let mode = req.priority_mode.unwrap_or(profile.priority_mode);

    let houses = match state.store.houses().await {
        Ok(houses) => houses,
        Err(e) => return store_failure(Action::Score, e),
    };

    if houses.is_empty() {
        return HttpResponse::Ok().json(score_board(mode, &[]));
    }

    let inputs: Vec<String> = houses.into_iter().map(|h| h.address).collect();
    let addresses = inputs.iter().map(|a| address_to_backend(a)).collect();

    let results = match state.backend.batch_score(&profile, mode, addresses).await {
        Ok(results) => results,
        Err(e) => return backend_failure(Action::Score, e),
    };

    let board = score_board(mode, &reconcile(&inputs, &results));

    tracing::info!(
        "Scored {} of {} properties under {}",
        board.cards.len(),
        inputs.len(),
        mode
    );

    HttpResponse::Ok().json(board)
}

/// Score one saved property with its stored attributes
///
/// POST /api/v1/scores/{id}
async fn score_one(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> impl Responder {
    let id = path.into_inner();

    let req = match parse_override(&body) {
        Ok(req) => req,
        Err(response) => return response,
    };

    let Some(_in_flight) = state.guard.try_begin(Action::Score) else {
        return busy(Action::Score);
    };

    let profile = match current_profile(&state, Action::Score).await {
        Ok(Some(profile)) => profile,
        Ok(None) => return profile_required(),
        Err(response) => return response,
    };

    let mode = req.priority_mode.unwrap_or(profile.priority_mode);

    let house = match state.store.houses().await {
        Ok(houses) => match houses.into_iter().find(|h| h.id == id) {
            Some(house) => house,
            None => return not_found("House"),
        },
        Err(e) => return store_failure(Action::Score, e),
    };

    let result = match state.backend.score_house(&profile, mode, house_to_wire(&house)).await {
        Ok(result) => result,
        Err(e) => return backend_failure(Action::Score, e),
    };

    let inputs = [house.address];
    HttpResponse::Ok().json(score_board(mode, &reconcile(&inputs, &[result])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriorityMode;

    #[test]
    fn test_empty_body_keeps_profile_mode() {
        assert!(parse_override(b"").unwrap().priority_mode.is_none());
        assert!(parse_override(b"  \n").unwrap().priority_mode.is_none());
        assert!(parse_override(b"{}").unwrap().priority_mode.is_none());
    }

    #[test]
    fn test_override_mode_is_read() {
        let req = parse_override(br#"{"priorityMode":"Safety First"}"#).unwrap();
        assert_eq!(req.priority_mode, Some(PriorityMode::SafetyFirst));
    }

    #[test]
    fn test_malformed_override_is_rejected() {
        let response = parse_override(br#"{"priorityMode": 5}"#).unwrap_err();
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);

        assert!(parse_override(b"{not json").is_err());
    }
}
