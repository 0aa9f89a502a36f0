pub mod handlers;
pub mod service;

pub use service::Recommender;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::router()
}
