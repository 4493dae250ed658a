use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::rating::stats::{current_streak, unique_words, win_rate, word_stats, Streak, WordStats};
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::store::operations::attempts::AttemptRecord;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_history))
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HistorySummary {
    total: u32,
    wins: u32,
    win_rate: u8,
    unique_words: usize,
    streak: Streak,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryView {
    attempts: Vec<AttemptView>,
    word_stats: BTreeMap<String, WordStats>,
    summary: HistorySummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AttemptView {
    id: String,
    word: String,
    success: bool,
    transcript: Option<String>,
    user_rating_before: f64,
    user_rating_after: f64,
    word_rating_before: f64,
    word_rating_after: f64,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<AttemptRecord> for AttemptView {
    fn from(r: AttemptRecord) -> Self {
        Self {
            id: r.id,
            word: r.word,
            success: r.success,
            transcript: r.transcript,
            user_rating_before: r.user_rating_before,
            user_rating_after: r.user_rating_after,
            word_rating_before: r.word_rating_before,
            word_rating_after: r.word_rating_after,
            created_at: r.created_at,
        }
    }
}

async fn get_history(
    auth: AuthUser,
    Query(query): Query<HistoryQuery>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let max = state.config().practice.history_limit;
    let limit = query.limit.unwrap_or(max).clamp(1, max.max(1));

    let attempts = state.store().list_attempts(&auth.user_id, limit)?;

    let total = attempts.len() as u32;
    let wins = attempts.iter().filter(|a| a.success).count() as u32;
    let summary = HistorySummary {
        total,
        wins,
        win_rate: win_rate(total, wins),
        unique_words: unique_words(attempts.iter().map(|a| a.word.as_str())),
        streak: current_streak(attempts.iter().map(|a| a.success)),
    };
    let word_stats = word_stats(attempts.iter().map(|a| (a.word.as_str(), a.success)));

    Ok(ok(HistoryView {
        attempts: attempts.into_iter().map(AttemptView::from).collect(),
        word_stats,
        summary,
    }))
}
