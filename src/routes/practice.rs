use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::constants::MAX_SELECTION_TOLERANCE;
use crate::response::{ok, AppError};
use crate::rating::selector::select_next_word;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/next", get(next_word))
}

#[derive(Debug, Deserialize)]
struct NextWordQuery {
    tolerance: Option<f64>,
}

/// Catalog details may be missing for words that only exist in storage.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NextWord {
    word: String,
    rating: f64,
    category: Option<String>,
    definition: Option<String>,
    sentence: Option<String>,
}

async fn next_word(
    auth: AuthUser,
    Query(query): Query<NextWordQuery>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let tolerance = match query.tolerance {
        None => state.config().practice.selection_tolerance,
        Some(t) if t.is_finite() && t > 0.0 && t <= MAX_SELECTION_TOLERANCE => t,
        Some(_) => {
            return Err(AppError::bad_request(
                "INVALID_TOLERANCE",
                "tolerance must be a positive number no greater than 2000",
            ))
        }
    };

    let user = state.store().get_user_rating_or_default(&auth.user_id)?;
    let words = state.store().catalog_word_ratings(state.catalog())?;

    let chosen = {
        let mut rng = rand::thread_rng();
        select_next_word(user.rating, &words, &user.recent_words, tolerance, &mut rng)
    };

    let next = chosen.map(|state_for_word| {
        let entry = state.catalog().get(&state_for_word.word);
        NextWord {
            word: state_for_word.word.clone(),
            rating: state_for_word.rating,
            category: state_for_word
                .category
                .clone()
                .or_else(|| entry.map(|e| e.category.clone())),
            definition: entry.map(|e| e.definition.clone()),
            sentence: entry.map(|e| e.sentence.clone()),
        }
    });

    match &next {
        Some(word) => tracing::debug!(word = %word.word, rating = word.rating, user_rating = user.rating, tolerance, "Next word selected"),
        None => tracing::warn!("No words available for selection"),
    }

    Ok(ok(next))
}
