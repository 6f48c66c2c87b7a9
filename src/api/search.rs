use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, PopularSearchDto, validation};
use crate::models::search::SearchResult;
use crate::services::CurrentUser;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub keyword: String,
}

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    pub limit: Option<u64>,
}

/// GET /search?keyword=
pub async fn search(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchResult>>, ApiError> {
    let keyword = validation::validate_keyword(&query.keyword)?;

    let result = state
        .search_service()
        .search(keyword, Some(user.id))
        .await?;

    Ok(Json(ApiResponse::success(result)))
}

/// GET /searches/top?limit=
pub async fn top_searches(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TopQuery>,
) -> Result<Json<ApiResponse<Vec<PopularSearchDto>>>, ApiError> {
    let limit = validation::validate_limit(query.limit.unwrap_or(state.config().search.top_limit))?;

    let searches = state.store().top_searches(limit).await?;

    Ok(Json(ApiResponse::success(
        searches.into_iter().map(PopularSearchDto::from).collect(),
    )))
}

/// GET /searches/popular
pub async fn popular_searches(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<PopularSearchDto>>>, ApiError> {
    let searches = state.store().list_popular_searches().await?;

    Ok(Json(ApiResponse::success(
        searches.into_iter().map(PopularSearchDto::from).collect(),
    )))
}
