use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, PublicUser},
        jwt::JwtKeys,
        password::verify_password,
    },
    error::ApiError,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/admin/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Username and password are required".into(),
        ));
    }

    let user = match state.store.get_user_by_username(&payload.username).await? {
        Some(user) => user,
        None => {
            warn!(username = %payload.username, "login unknown username");
            return Err(ApiError::Unauthorized("Invalid credentials".into()));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(username = %payload.username, user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(&user)?;

    info!(user_id = %user.id, username = %user.username, "admin logged in");
    Ok(Json(LoginResponse {
        token,
        user: PublicUser::from(&user),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;

    #[tokio::test]
    async fn login_succeeds_with_seeded_credentials() {
        let state = AppState::demo();
        let response = login(
            State(state.clone()),
            Json(LoginRequest {
                username: "admin".into(),
                password: "admin123".into(),
            }),
        )
        .await
        .expect("login should succeed");

        assert_eq!(response.user.username, "admin");

        // The issued token passes verification and carries the user id.
        let keys = JwtKeys::from_ref(&state);
        let claims = keys.verify(&response.token).expect("token verifies");
        assert_eq!(claims.sub, response.user.id);
    }

    #[tokio::test]
    async fn login_rejects_bad_password_and_unknown_user() {
        let state = AppState::demo();

        let err = login(
            State(state.clone()),
            Json(LoginRequest {
                username: "admin".into(),
                password: "wrong".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        let err = login(
            State(state),
            Json(LoginRequest {
                username: "nobody".into(),
                password: "admin123".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn login_rejects_empty_credentials() {
        let err = login(
            State(AppState::demo()),
            Json(LoginRequest {
                username: "".into(),
                password: "".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
