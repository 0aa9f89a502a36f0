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
    models::{
        Flavor, FlavorPatch, Hotkey, HotkeyPatch, MenuItem, MenuItemPatch, NewFlavor, NewHotkey,
        NewMenuItem, NewPromo, NewSpiciness, NewTheme, Promo, PromoPatch, Spiciness,
        SpicinessPatch, Theme, ThemePatch,
    },
    state::AppState,
};

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/flavors", get(list_flavors))
        .route("/spiciness", get(list_spiciness))
        .route("/promos", get(list_promos))
        .route("/menuitems", get(list_menu_items))
        .route("/themes", get(list_themes))
        .route("/hotkeys", get(list_hotkeys))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/flavors", get(admin_list_flavors).post(create_flavor))
        .route("/flavors/:id", put(update_flavor).delete(delete_flavor))
        .route("/spiciness", post(create_spiciness))
        .route(
            "/spiciness/:id",
            put(update_spiciness).delete(delete_spiciness),
        )
        .route("/promos", post(create_promo))
        .route("/promos/:id", put(update_promo).delete(delete_promo))
        .route("/menuitems", post(create_menu_item))
        .route(
            "/menuitems/:id",
            put(update_menu_item).delete(delete_menu_item),
        )
        .route("/themes", post(create_theme))
        .route("/themes/:id", put(update_theme).delete(delete_theme))
        .route("/hotkeys", post(create_hotkey))
        .route("/hotkeys/:id", put(update_hotkey).delete(delete_hotkey))
}

fn deleted(entity: &str) -> Json<Value> {
    Json(json!({ "message": format!("{entity} deleted successfully") }))
}

// --- flavors ---

#[instrument(skip(state))]
pub async fn list_flavors(State(state): State<AppState>) -> Result<Json<Vec<Flavor>>, ApiError> {
    Ok(Json(state.store.list_flavors().await?))
}

#[instrument(skip_all)]
pub async fn admin_list_flavors(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<Flavor>>, ApiError> {
    Ok(Json(state.store.list_flavors().await?))
}

#[instrument(skip_all)]
pub async fn create_flavor(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<NewFlavor>,
) -> Result<(StatusCode, Json<Flavor>), ApiError> {
    let flavor = state.store.create_flavor(payload).await?;
    Ok((StatusCode::CREATED, Json(flavor)))
}

#[instrument(skip_all, fields(%id))]
pub async fn update_flavor(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<FlavorPatch>,
) -> Result<Json<Flavor>, ApiError> {
    state
        .store
        .update_flavor(id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Flavor not found".into()))
}

#[instrument(skip_all, fields(%id))]
pub async fn delete_flavor(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !state.store.delete_flavor(id).await? {
        return Err(ApiError::NotFound("Flavor not found".into()));
    }
    Ok(deleted("Flavor"))
}

// --- spiciness ---

#[instrument(skip(state))]
pub async fn list_spiciness(
    State(state): State<AppState>,
) -> Result<Json<Vec<Spiciness>>, ApiError> {
    Ok(Json(state.store.list_spiciness().await?))
}

#[instrument(skip_all)]
pub async fn create_spiciness(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<NewSpiciness>,
) -> Result<(StatusCode, Json<Spiciness>), ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    let spice = state.store.create_spiciness(payload).await?;
    Ok((StatusCode::CREATED, Json(spice)))
}

#[instrument(skip_all, fields(%id))]
pub async fn update_spiciness(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SpicinessPatch>,
) -> Result<Json<Spiciness>, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    state
        .store
        .update_spiciness(id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Spiciness level not found".into()))
}

#[instrument(skip_all, fields(%id))]
pub async fn delete_spiciness(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !state.store.delete_spiciness(id).await? {
        return Err(ApiError::NotFound("Spiciness level not found".into()));
    }
    Ok(deleted("Spiciness level"))
}

// --- promos ---

#[instrument(skip(state))]
pub async fn list_promos(State(state): State<AppState>) -> Result<Json<Vec<Promo>>, ApiError> {
    Ok(Json(state.store.list_promos().await?))
}

#[instrument(skip_all)]
pub async fn create_promo(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<NewPromo>,
) -> Result<(StatusCode, Json<Promo>), ApiError> {
    let promo = state.store.create_promo(payload).await?;
    Ok((StatusCode::CREATED, Json(promo)))
}

#[instrument(skip_all, fields(%id))]
pub async fn update_promo(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PromoPatch>,
) -> Result<Json<Promo>, ApiError> {
    state
        .store
        .update_promo(id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Promo not found".into()))
}

#[instrument(skip_all, fields(%id))]
pub async fn delete_promo(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !state.store.delete_promo(id).await? {
        return Err(ApiError::NotFound("Promo not found".into()));
    }
    Ok(deleted("Promo"))
}

// --- menu items ---

#[instrument(skip(state))]
pub async fn list_menu_items(
    State(state): State<AppState>,
) -> Result<Json<Vec<MenuItem>>, ApiError> {
    Ok(Json(state.store.list_menu_items().await?))
}

#[instrument(skip_all)]
pub async fn create_menu_item(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<NewMenuItem>,
) -> Result<(StatusCode, Json<MenuItem>), ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    let item = state.store.create_menu_item(payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[instrument(skip_all, fields(%id))]
pub async fn update_menu_item(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MenuItemPatch>,
) -> Result<Json<MenuItem>, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    state
        .store
        .update_menu_item(id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Menu item not found".into()))
}

#[instrument(skip_all, fields(%id))]
pub async fn delete_menu_item(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !state.store.delete_menu_item(id).await? {
        return Err(ApiError::NotFound("Menu item not found".into()));
    }
    Ok(deleted("Menu item"))
}

// --- themes ---

#[instrument(skip(state))]
pub async fn list_themes(State(state): State<AppState>) -> Result<Json<Vec<Theme>>, ApiError> {
    Ok(Json(state.store.list_themes().await?))
}

#[instrument(skip_all)]
pub async fn create_theme(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<NewTheme>,
) -> Result<(StatusCode, Json<Theme>), ApiError> {
    let theme = state.store.create_theme(payload).await?;
    Ok((StatusCode::CREATED, Json(theme)))
}

#[instrument(skip_all, fields(%id))]
pub async fn update_theme(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ThemePatch>,
) -> Result<Json<Theme>, ApiError> {
    state
        .store
        .update_theme(id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Theme not found".into()))
}

#[instrument(skip_all, fields(%id))]
pub async fn delete_theme(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !state.store.delete_theme(id).await? {
        return Err(ApiError::NotFound("Theme not found".into()));
    }
    Ok(deleted("Theme"))
}

// --- hotkeys ---

#[instrument(skip(state))]
pub async fn list_hotkeys(State(state): State<AppState>) -> Result<Json<Vec<Hotkey>>, ApiError> {
    Ok(Json(state.store.list_hotkeys().await?))
}

#[instrument(skip_all)]
pub async fn create_hotkey(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<NewHotkey>,
) -> Result<(StatusCode, Json<Hotkey>), ApiError> {
    let hotkey = state.store.create_hotkey(payload).await?;
    Ok((StatusCode::CREATED, Json(hotkey)))
}

#[instrument(skip_all, fields(%id))]
pub async fn update_hotkey(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<HotkeyPatch>,
) -> Result<Json<Hotkey>, ApiError> {
    state
        .store
        .update_hotkey(id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Hotkey not found".into()))
}

#[instrument(skip_all, fields(%id))]
pub async fn delete_hotkey(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !state.store.delete_hotkey(id).await? {
        return Err(ApiError::NotFound("Hotkey not found".into()));
    }
    Ok(deleted("Hotkey"))
}
