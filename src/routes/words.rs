use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::Serialize;

use crate::catalog::WordEntry;
use crate::rating::WordRatingState;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::validation::normalize_word;

/// 对外的单词视图：评分状态加上词表中的释义与例句
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordView {
    word: String,
    category: Option<String>,
    rating: f64,
    attempts: u32,
    successes: u32,
    definition: Option<String>,
    sentence: Option<String>,
}

impl WordView {
    fn new(state: WordRatingState, entry: Option<&WordEntry>) -> Self {
        Self {
            category: state
                .category
                .or_else(|| entry.map(|e| e.category.clone())),
            word: state.word,
            rating: state.rating,
            attempts: state.total_attempts,
            successes: state.successful_attempts,
            definition: entry.map(|e| e.definition.clone()),
            sentence: entry.map(|e| e.sentence.clone()),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_words))
        .route("/:word", get(get_word))
}

async fn list_words(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let words = state.store().catalog_word_ratings(state.catalog())?;
    let views: Vec<WordView> = words
        .into_iter()
        .map(|w| {
            let entry = state.catalog().get(&w.word);
            WordView::new(w, entry)
        })
        .collect();
    Ok(ok(views))
}

async fn get_word(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let word = normalize_word(&word).map_err(|msg| AppError::bad_request("INVALID_WORD", msg))?;
    let entry = state.catalog().get(&word);

    let rating = match (state.store().get_word_rating(&word)?, entry) {
        (Some(stored), _) => stored,
        (None, Some(entry)) => state.store().seed_word_rating(entry)?,
        (None, None) => return Err(AppError::not_found("Word not found")),
    };

    Ok(ok(WordView::new(rating, entry)))
}
