use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::services::standing::{active_cutoffs, standing_for, PercentileSource};
use crate::state::AppState;
use crate::store::operations::attempts::NewAttempt;
use crate::store::StoreError;
use crate::validation::{normalize_word, validate_transcript};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(record_attempt))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttemptRequest {
    word: String,
    success: bool,
    #[serde(default)]
    transcript: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AttemptResponse {
    attempt_id: String,
    word: String,
    success: bool,
    new_user_rating: f64,
    new_word_rating: f64,
    user_rating_delta: f64,
    word_rating_delta: f64,
    level: u8,
    percentile: u8,
    percentile_source: PercentileSource,
}

async fn record_attempt(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let word = normalize_word(&req.word).map_err(|msg| AppError::bad_request("INVALID_WORD", msg))?;
    let transcript = req
        .transcript
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(text) = transcript {
        validate_transcript(text).map_err(|msg| AppError::bad_request("INVALID_TRANSCRIPT", msg))?;
    }

    let outcome = state
        .store()
        .record_attempt(NewAttempt {
            user_id: &auth.user_id,
            word: &word,
            success: req.success,
            transcript,
            catalog_entry: state.catalog().get(&word),
            recent_words_limit: state.config().practice.recent_words_limit,
        })
        .map_err(|e| match e {
            StoreError::NotFound { .. } => AppError::not_found("Word not found"),
            other => other.into(),
        })?;

    tracing::info!(
        word = %outcome.record.word,
        success = req.success,
        delta = outcome.update.user_rating_delta,
        user_rating = outcome.update.new_user_rating,
        word_rating = outcome.update.new_word_rating,
        "Attempt recorded"
    );

    let active = active_cutoffs(state.store())?;
    let standing = standing_for(state.store(), Some(&outcome.user), &active.cutoffs)?;

    Ok(ok(AttemptResponse {
        attempt_id: outcome.record.id,
        word: outcome.record.word,
        success: outcome.record.success,
        new_user_rating: outcome.update.new_user_rating,
        new_word_rating: outcome.update.new_word_rating,
        user_rating_delta: outcome.update.user_rating_delta,
        word_rating_delta: outcome.update.word_rating_delta,
        level: standing.level,
        percentile: standing.percentile,
        percentile_source: standing.percentile_source,
    }))
}
