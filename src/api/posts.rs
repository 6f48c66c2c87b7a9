use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, PopularPostDto, PostDto};

/// GET /posts
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<PostDto>>>, ApiError> {
    let posts = state.store().list_posts().await?;
    Ok(Json(ApiResponse::success(
        posts.into_iter().map(PostDto::from).collect(),
    )))
}

/// GET /posts/popular
pub async fn popular_posts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<PopularPostDto>>>, ApiError> {
    let posts = state.store().list_popular_posts().await?;
    Ok(Json(ApiResponse::success(
        posts.into_iter().map(PopularPostDto::from).collect(),
    )))
}

/// GET /posts/{title}
/// Counts as one view of the post.
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
) -> Result<Json<ApiResponse<PostDto>>, ApiError> {
    let post = state
        .store()
        .get_post_by_title(&title)
        .await?
        .ok_or_else(|| ApiError::not_found("Post", format!("'{title}'")))?;

    state.store().record_post_view(post.id).await?;

    Ok(Json(ApiResponse::success(PostDto::from(post))))
}
