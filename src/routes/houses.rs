use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

use super::{backend_failure, busy, not_found, store_failure, validation_failed, AppState};
use crate::core::adapters::apply_lookup;
use crate::models::{AddHouseRequest, DeleteResponse, House, HousesResponse, LookupResponse};
use crate::services::{Action, StoreKey};

/// Configure saved-property routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/houses", web::get().to(list_houses))
        .route("/houses", web::post().to(add_house))
        .route("/houses", web::delete().to(delete_all_houses))
        .route("/houses/{id}", web::delete().to(delete_house))
        .route("/houses/{id}/lookup", web::post().to(lookup_house));
}

/// GET /api/v1/houses
async fn list_houses(state: web::Data<AppState>) -> impl Responder {
    match state.store.houses().await {
        Ok(houses) => HttpResponse::Ok().json(HousesResponse::from(houses)),
        Err(e) => store_failure(Action::ListHouses, e),
    }
}

/// Save a new property
///
/// POST /api/v1/houses
///
/// Request body:
/// ```json
/// {
///   "address": "12 Elm St, Springfield",
///   "bedrooms": 3
/// }
/// ```
async fn add_house(
    state: web::Data<AppState>,
    req: web::Json<AddHouseRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(&errors);
    }

    let Some(_in_flight) = state.guard.try_begin(Action::AddHouse) else {
        return busy(Action::AddHouse);
    };

    let house = req.into_inner().into_house();

    let saved = house.clone();
    let result = state
        .store
        .update(StoreKey::HOUSES, move |houses: &mut Vec<House>| {
            houses.push(saved);
            houses.len()
        })
        .await;

    match result {
        Ok(total) => {
            tracing::info!("Added house {} ({} saved)", house.address, total);
            HttpResponse::Created().json(house)
        }
        Err(e) => store_failure(Action::AddHouse, e),
    }
}

/// Remove every saved property
///
/// DELETE /api/v1/houses
async fn delete_all_houses(state: web::Data<AppState>) -> impl Responder {
    let Some(_in_flight) = state.guard.try_begin(Action::DeleteHouses) else {
        return busy(Action::DeleteHouses);
    };

    let result = state
        .store
        .update(StoreKey::HOUSES, |houses: &mut Vec<House>| std::mem::take(houses).len())
        .await;

    match result {
        Ok(removed) => {
            tracing::info!("Removed all {} saved houses", removed);
            HttpResponse::Ok().json(DeleteResponse { success: true, removed })
        }
        Err(e) => store_failure(Action::DeleteHouses, e),
    }
}

/// DELETE /api/v1/houses/{id}
async fn delete_house(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let id = path.into_inner();

    let Some(_in_flight) = state.guard.try_begin(Action::DeleteHouses) else {
        return busy(Action::DeleteHouses);
    };

    let result = state
        .store
        .update(StoreKey::HOUSES, |houses: &mut Vec<House>| {
            let before = houses.len();
            houses.retain(|h| h.id != id);
            before - houses.len()
        })
        .await;

    match result {
        Ok(0) => not_found("House"),
        Ok(removed) => HttpResponse::Ok().json(DeleteResponse { success: true, removed }),
        Err(e) => store_failure(Action::DeleteHouses, e),
    }
}

/// Fetch property attributes for a saved house and store them on it
///
/// POST /api/v1/houses/{id}/lookup
async fn lookup_house(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let id = path.into_inner();

    let Some(_in_flight) = state.guard.try_begin(Action::LookupHouse) else {
        return busy(Action::LookupHouse);
    };

    let address = match state.store.houses().await {
        Ok(houses) => match houses.into_iter().find(|h| h.id == id) {
            Some(house) => house.address,
            None => return not_found("House"),
        },
        Err(e) => return store_failure(Action::LookupHouse, e),
    };

    let (found, warnings) = match state.backend.lookup_house(&address).await {
        Ok(found) => found,
        Err(e) => return backend_failure(Action::LookupHouse, e),
    };

    // The list may have changed while the lookup ran
    let result = state
        .store
        .update(StoreKey::HOUSES, |houses: &mut Vec<House>| {
            houses.iter_mut().find(|h| h.id == id).map(|house| {
                apply_lookup(house, &found, &warnings);
                house.clone()
            })
        })
        .await;

    match result {
        Ok(Some(house)) => {
            tracing::info!("Enriched house {} (attom id {:?})", house.address, house.attom_id);
            HttpResponse::Ok().json(LookupResponse { house, warnings })
        }
        Ok(None) => not_found("House"),
        Err(e) => store_failure(Action::LookupHouse, e),
    }
}
