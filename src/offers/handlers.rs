use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::CurrentUser,
    error::ApiError,
    offers::{
        dto::{ReplaceOffersRequest, UpdateOfferRequest},
        repo::ServiceOffer,
    },
    state::AppState,
};

pub fn offer_routes() -> Router<AppState> {
    Router::new()
        .route("/service-offers", post(replace_offers))
        .route("/service-offers/mine", get(my_offers))
        .route("/service-offers/:id", put(update_offer))
}

#[instrument(skip(state, payload, user))]
pub async fn replace_offers(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<ReplaceOffersRequest>,
) -> Result<Json<Vec<ServiceOffer>>, ApiError> {
    if payload.categories.is_empty() {
        return Err(ApiError::Validation("categories must not be empty".into()));
    }

    let offers = ServiceOffer::replace_all(
        &state.db,
        user.id,
        &payload.categories,
        payload.description.as_deref(),
        payload.hourly_rate,
    )
    .await?;

    info!(performer_id = %user.id, count = offers.len(), "service offers replaced");
    Ok(Json(offers))
}

#[instrument(skip(state, user))]
pub async fn my_offers(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ServiceOffer>>, ApiError> {
    let offers = ServiceOffer::list_for_performer(&state.db, user.id).await?;
    Ok(Json(offers))
}

#[instrument(skip(state, payload, user))]
pub async fn update_offer(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(offer_id): Path<Uuid>,
    Json(payload): Json<UpdateOfferRequest>,
) -> Result<Json<ServiceOffer>, ApiError> {
    match ServiceOffer::update(
        &state.db,
        offer_id,
        user.id,
        payload.description.as_deref(),
        payload.hourly_rate,
    )
    .await?
    {
        Some(offer) => {
            info!(offer_id = %offer.id, "service offer updated");
            Ok(Json(offer))
        }
        None => {
            if ServiceOffer::exists(&state.db, offer_id).await? {
                Err(ApiError::Forbidden)
            } else {
                Err(ApiError::NotFound("service offer"))
            }
        }
    }
}
