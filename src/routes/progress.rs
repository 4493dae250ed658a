use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::Serialize;

use crate::auth::AuthUser;
use crate::rating::percentile::PercentileCutoffs;
use crate::response::{ok, AppError};
use crate::services::standing::{active_cutoffs, standing_for, PercentileSource};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_progress))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProgressView {
    rating: f64,
    total_attempts: u32,
    successful_attempts: u32,
    level: u8,
    percentile: u8,
    percentile_source: PercentileSource,
    cutoffs: PercentileCutoffs,
    cutoffs_version: u64,
}

async fn get_progress(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.store().get_user_rating(&auth.user_id)?;
    let active = active_cutoffs(state.store())?;
    let standing = standing_for(state.store(), user.as_ref(), &active.cutoffs)?;
    let user = user.unwrap_or_default();

    Ok(ok(ProgressView {
        rating: user.rating,
        total_attempts: user.total_attempts,
        successful_attempts: user.successful_attempts,
        level: standing.level,
        percentile: standing.percentile,
        percentile_source: standing.percentile_source,
        cutoffs: active.cutoffs,
        cutoffs_version: active.version,
    }))
}
