use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use super::{backend_failure, busy, store_failure, validation_failed, AppState};
use crate::models::{BuyerProfile, DeleteResponse, ProfileResponse, SaveProfileRequest};
use crate::services::{Action, BackendError};

/// Configure buyer profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/profile", web::get().to(get_profile))
        .route("/profile", web::put().to(save_profile))
        .route("/profile", web::delete().to(delete_profile));
}

/// Carry the UI-only fields of the local snapshot onto a backend profile
fn with_local_fields(mut profile: BuyerProfile, local: Option<BuyerProfile>) -> BuyerProfile {
    if let Some(local) = local {
        profile.zip_code = local.zip_code;
        profile.commute_address = local.commute_address;
        profile.max_monthly_payment = local.max_monthly_payment;
    }
    profile
}

/// Load the session's profile
///
/// GET /api/v1/profile
///
/// Responds with `{"profile": null}` when the backend has no profile for
/// this session.
async fn get_profile(state: web::Data<AppState>) -> impl Responder {
    let Some(_in_flight) = state.guard.try_begin(Action::LoadProfile) else {
        return busy(Action::LoadProfile);
    };

    let session_id = match state.store.session_id().await {
        Ok(id) => id,
        Err(e) => return store_failure(Action::LoadProfile, e),
    };

    let profile = match state.backend.get_profile(&session_id).await {
        Ok(profile) => profile,
        Err(e) => return backend_failure(Action::LoadProfile, e),
    };

    let Some(profile) = profile else {
        tracing::info!("No profile yet for session {}", session_id);
        return HttpResponse::Ok().json(ProfileResponse::from(None));
    };

    let local = match state.store.profile().await {
        Ok(local) => local,
        Err(e) => {
            tracing::warn!("Ignoring unreadable local profile snapshot: {}", e);
            None
        }
    };
    let profile = with_local_fields(profile, local);

    if let Err(e) = state.store.save_profile(&profile).await {
        tracing::warn!("Failed to snapshot profile locally: {}", e);
    }

    HttpResponse::Ok().json(ProfileResponse::from(Some(profile)))
}

/// Save the session's profile
///
/// PUT /api/v1/profile
///
/// Request body:
/// ```json
/// {
///   "budget": 450000,
///   "targetBedrooms": 3,
///   "targetBathrooms": 2,
///   "priorityMode": "Safety First",
///   "hasSchoolNeed": false
/// }
/// ```
async fn save_profile(
    state: web::Data<AppState>,
    req: web::Json<SaveProfileRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Profile validation failed: {:?}", errors);
        return validation_failed(&errors);
    }

    let Some(_in_flight) = state.guard.try_begin(Action::SaveProfile) else {
        return busy(Action::SaveProfile);
    };

    let session_id = match state.store.session_id().await {
        Ok(id) => id,
        Err(e) => return store_failure(Action::SaveProfile, e),
    };

    let profile = req.into_inner().into_profile();

    let saved = match state.backend.save_profile(&profile, &session_id).await {
        Ok(saved) => saved,
        Err(e) => return backend_failure(Action::SaveProfile, e),
    };

    if let Err(e) = state.store.save_profile(&saved).await {
        return store_failure(Action::SaveProfile, e);
    }

    tracing::info!("Saved profile for session {} ({})", session_id, saved.priority_mode);

    HttpResponse::Ok().json(ProfileResponse::from(Some(saved)))
}

/// Delete the session's profile
///
/// DELETE /api/v1/profile
async fn delete_profile(state: web::Data<AppState>) -> impl Responder {
    let Some(_in_flight) = state.guard.try_begin(Action::DeleteProfile) else {
        return busy(Action::DeleteProfile);
    };

    let session_id = match state.store.session_id().await {
        Ok(id) => id,
        Err(e) => return store_failure(Action::DeleteProfile, e),
    };

    let removed = match state.backend.delete_profile(&session_id).await {
        Ok(()) => 1,
        // Already gone
        Err(BackendError::NotFound(_)) => 0,
        Err(e) => return backend_failure(Action::DeleteProfile, e),
    };

    if let Err(e) = state.store.clear_profile().await {
        return store_failure(Action::DeleteProfile, e);
    }

    tracing::info!("Deleted profile for session {}", session_id);

    HttpResponse::Ok().json(DeleteResponse {
        success: true,
        removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_fields_survive_backend_round_trip() {
        let backend = BuyerProfile::default();
        let local = BuyerProfile {
            zip_code: Some("62701".to_string()),
            commute_address: Some("1 Capitol Ave, Springfield".to_string()),
            budget: 1.0,
            ..BuyerProfile::default()
        };

        let merged = with_local_fields(backend, Some(local));

        assert_eq!(merged.zip_code.as_deref(), Some("62701"));
        assert_eq!(merged.budget, 450_000.0);
    }
}
