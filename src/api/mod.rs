pub mod translate;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(translate::health))
        .route(
            "/api/nl-search",
            post(translate::translate).fallback(translate::method_not_allowed),
        )
        .with_state(state)
}
