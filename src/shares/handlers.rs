use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{error::ApiError, models::SocialShare, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/social-shares", get(list_shares))
        .route("/social-shares/menuitem/:id", get(list_shares_for_item))
        .route("/social-shares/increment", post(increment_share))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncrementShare {
    pub menu_item_id: Uuid,
    pub platform: String,
}

#[instrument(skip(state))]
pub async fn list_shares(
    State(state): State<AppState>,
) -> Result<Json<Vec<SocialShare>>, ApiError> {
    Ok(Json(state.store.list_shares().await?))
}

#[instrument(skip(state), fields(%id))]
pub async fn list_shares_for_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<SocialShare>>, ApiError> {
    Ok(Json(state.store.list_shares_for_item(id).await?))
}

#[instrument(skip(state, payload), fields(item = %payload.menu_item_id, platform = %payload.platform))]
pub async fn increment_share(
    State(state): State<AppState>,
    Json(payload): Json<IncrementShare>,
) -> Result<Json<SocialShare>, ApiError> {
    if payload.platform.trim().is_empty() {
        return Err(ApiError::Validation("platform must not be empty".into()));
    }
    if state.store.get_menu_item(payload.menu_item_id).await?.is_none() {
        return Err(ApiError::NotFound("Menu item not found".into()));
    }
    let share = state
        .store
        .increment_share(payload.menu_item_id, &payload.platform)
        .await?;
    Ok(Json(share))
}
