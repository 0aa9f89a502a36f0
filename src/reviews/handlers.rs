use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::jwt::AdminUser,
    error::ApiError,
    models::{NewReview, Review, ReviewPatch},
    state::AppState,
};

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/reviews", get(list_approved).post(create_review))
        .route("/reviews/menuitem/:id", get(list_approved_for_item))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/reviews", get(admin_list))
        .route("/reviews/:id", put(update_review).delete(delete_review))
        .route("/reviews/:id/approve", post(approve_review))
}

#[instrument(skip(state))]
pub async fn list_approved(State(state): State<AppState>) -> Result<Json<Vec<Review>>, ApiError> {
    Ok(Json(state.store.list_reviews(true).await?))
}

#[instrument(skip(state), fields(%id))]
pub async fn list_approved_for_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Review>>, ApiError> {
    Ok(Json(state.store.list_reviews_for_item(id, true).await?))
}

/// Visitor-submitted reviews start out unapproved no matter what the
/// payload claims, so they never show up before moderation.
#[instrument(skip(state, payload))]
pub async fn create_review(
    State(state): State<AppState>,
    Json(payload): Json<NewReview>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    if state.store.get_menu_item(payload.menu_item_id).await?.is_none() {
        return Err(ApiError::NotFound("Menu item not found".into()));
    }
    let review = state.store.create_review(payload).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

#[instrument(skip_all)]
pub async fn admin_list(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<Review>>, ApiError> {
    Ok(Json(state.store.list_reviews(false).await?))
}

#[instrument(skip_all, fields(%id))]
pub async fn update_review(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewPatch>,
) -> Result<Json<Review>, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    state
        .store
        .update_review(id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Review not found".into()))
}

#[instrument(skip_all, fields(%id))]
pub async fn approve_review(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Review>, ApiError> {
    state
        .store
        .update_review(id, ReviewPatch::approved())
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Review not found".into()))
}

#[instrument(skip_all, fields(%id))]
pub async fn delete_review(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !state.store.delete_review(id).await? {
        return Err(ApiError::NotFound("Review not found".into()));
    }
    Ok(Json(json!({ "message": "Review deleted successfully" })))
}
