use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::response::{ok, AppError};
use crate::services::standing::active_cutoffs;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/cutoffs", get(get_cutoffs))
}

async fn get_cutoffs(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(active_cutoffs(state.store())?))
}
