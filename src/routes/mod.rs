pub mod attempts;
pub mod health;
pub mod history;
pub mod practice;
pub mod progress;
pub mod ratings;
pub mod user;
pub mod words;

use axum::extract::DefaultBodyLimit;
use axum::Router;

use crate::constants::MAX_BODY_BYTES;
use crate::middleware::{rate_limit, request_id};
use crate::response::AppError;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .nest("/attempts", attempts::router())
        .nest("/practice", practice::router())
        .nest("/progress", progress::router())
        .nest("/history", history::router())
        .nest("/words", words::router())
        .nest("/user", user::router())
        .nest("/ratings", ratings::router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_middleware,
        ))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health::router())
        .fallback(fallback_404)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .with_state(state)
}

async fn fallback_404() -> AppError {
    AppError::not_found("Not found")
}
