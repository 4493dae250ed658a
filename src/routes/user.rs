use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::store::operations::profiles::UserProfile;
use crate::validation::normalize_display_name;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", delete(delete_account))
        .route("/profile", get(get_profile).put(update_profile))
        .route("/history", delete(reset_history))
}

#[derive(Debug, Deserialize)]
struct UpdateProfileRequest {
    name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileView {
    user_id: String,
    name: Option<String>,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
    updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<UserProfile> for ProfileView {
    fn from(p: UserProfile) -> Self {
        Self {
            user_id: p.user_id,
            name: p.name,
            created_at: Some(p.created_at),
            updated_at: Some(p.updated_at),
        }
    }
}

async fn get_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let view = match state.store().get_profile(&auth.user_id)? {
        Some(profile) => ProfileView::from(profile),
        None => ProfileView {
            user_id: auth.user_id,
            name: None,
            created_at: None,
            updated_at: None,
        },
    };
    Ok(ok(view))
}

async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name =
        normalize_display_name(&req.name).map_err(|msg| AppError::bad_request("INVALID_NAME", msg))?;
    let profile = state.store().set_profile_name(&auth.user_id, &name)?;
    Ok(ok(ProfileView::from(profile)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryResetView {
    attempts_removed: usize,
}

async fn reset_history(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let attempts_removed = state.store().reset_user_history(&auth.user_id)?;
    tracing::info!(attempts_removed, "Practice history reset");
    Ok(ok(HistoryResetView { attempts_removed }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AccountDeletedView {
    attempts_removed: usize,
    rating_removed: bool,
    profile_removed: bool,
}

async fn delete_account(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let cleanup = state.store().delete_user_data(&auth.user_id)?;
    tracing::info!(
        attempts_removed = cleanup.attempts_removed,
        rating_removed = cleanup.rating_removed,
        profile_removed = cleanup.profile_removed,
        "User data deleted"
    );
    Ok(ok(AccountDeletedView {
        attempts_removed: cleanup.attempts_removed,
        rating_removed: cleanup.rating_removed,
        profile_removed: cleanup.profile_removed,
    }))
}
