use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use crate::{
    error::ApiError,
    models::{ChatRequest, ChatResponse, SurpriseRequest},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat))
        .route("/surprise", post(surprise))
}

#[instrument(skip(state, payload))]
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    let menu = state.store.list_menu_items().await?;
    Ok(Json(state.recommender.recommend(&payload, &menu).await))
}

#[instrument(skip(state, payload))]
pub async fn surprise(
    State(state): State<AppState>,
    Json(payload): Json<SurpriseRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    let menu = state.store.list_menu_items().await?;
    Ok(Json(
        state
            .recommender
            .surprise(payload.spice_level, payload.flavors, payload.language, &menu)
            .await,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Language;
    use axum::extract::State;

    #[tokio::test]
    async fn surprise_returns_subset_of_active_menu_ids() {
        // The demo state has no reachable model endpoint, so the call falls
        // back; empty recommendations are trivially a subset and the shape
        // must still hold.
        let state = AppState::demo();
        let Json(response) = surprise(
            State(state.clone()),
            Json(SurpriseRequest {
                spice_level: 0,
                flavors: vec![],
                language: Language::En,
            }),
        )
        .await
        .expect("surprise never errors past validation");

        let menu_ids: Vec<_> = state
            .store
            .list_menu_items()
            .await
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert!(response.recommendations.iter().all(|r| menu_ids.contains(r)));
        assert!((0.0..=1.0).contains(&response.confidence));
        assert!(!response.message.is_empty());
    }

    #[tokio::test]
    async fn chat_rejects_out_of_range_spice_level() {
        let err = chat(
            State(AppState::demo()),
            Json(ChatRequest {
                message: "hello".into(),
                spice_level: 9,
                flavors: vec![],
                language: Language::En,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
