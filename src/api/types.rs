use serde::Serialize;

use crate::db::{HistoryEntry, PopularPost, PopularSearch, Post};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            field: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            field: None,
        }
    }

    pub fn field_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            field: Some(field.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct PostDto {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            body: post.body,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PopularPostDto {
    pub post_id: i32,
    pub title: String,
    pub view_count: i64,
}

impl From<PopularPost> for PopularPostDto {
    fn from(popular: PopularPost) -> Self {
        Self {
            post_id: popular.post_id,
            title: popular.title,
            view_count: popular.view_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PopularSearchDto {
    pub keyword: String,
    pub summary: String,
    pub image_source: String,
    pub view_count: i64,
    pub updated_at: String,
}

impl From<PopularSearch> for PopularSearchDto {
    fn from(search: PopularSearch) -> Self {
        Self {
            keyword: search.keyword,
            summary: search.summary,
            image_source: search.image_source,
            view_count: search.view_count,
            updated_at: search.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryDto {
    pub id: i32,
    pub search_text: String,
    pub created_at: String,
}

impl From<HistoryEntry> for HistoryDto {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            id: entry.id,
            search_text: entry.search_text,
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime: u64,
    pub database: bool,
    pub metrics_enabled: bool,
}
