use axum::{Extension, Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, HistoryDto};
use crate::services::CurrentUser;

/// GET /history
/// Keywords the current user has searched, newest first.
pub async fn list_history(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<HistoryDto>>>, ApiError> {
    let history = state.store().list_history(user.id).await?;
    Ok(Json(ApiResponse::success(
        history.into_iter().map(HistoryDto::from).collect(),
    )))
}
