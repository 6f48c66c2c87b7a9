use axum::{
    Extension, Json,
    extract::{Multipart, State},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::services::{AvatarUpload, CurrentUser, ProfileUpdate, ProfileView};

#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    #[serde(default)]
    pub password: String,
}

/// GET /profile
pub async fn edit_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<ProfileView>>, ApiError> {
    let profile = state.profile_service().edit(user.id).await?;
    Ok(Json(ApiResponse::success(profile)))
}

/// PATCH /profile
/// Multipart form with `name`, `email`, optional `phone`, `gender` and an
/// `avatar` file.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ProfileView>>, ApiError> {
    let update = read_profile_form(multipart).await?;

    let profile = state.profile_service().update(user.id, update).await?;

    Ok(Json(ApiResponse::success(profile)))
}

/// DELETE /profile
/// Deletes the account after confirming the password and ends the session.
pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    session: Session,
    Json(payload): Json<DeleteAccountRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    if payload.password.is_empty() {
        return Err(ApiError::field("password", "The password field is required."));
    }

    state
        .profile_service()
        .destroy(user.id, &payload.password)
        .await?;

    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to end session: {e}")))?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Account deleted".to_string(),
    })))
}

async fn read_profile_form(mut multipart: Multipart) -> Result<ProfileUpdate, ApiError> {
    let mut update = ProfileUpdate::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Invalid form data: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "avatar" {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::field("avatar", format!("Failed to read upload: {e}")))?;

            // Browsers submit an empty part when no file was chosen.
            if !bytes.is_empty() || file_name.as_deref().is_some_and(|f| !f.is_empty()) {
                update.avatar = Some(AvatarUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ApiError::validation(format!("Invalid form data: {e}")))?;

        match name.as_str() {
            "name" => update.name = value,
            "email" => update.email = value,
            "phone" => update.phone = Some(value),
            "gender" => update.gender = Some(value),
            _ => {}
        }
    }

    Ok(update)
}
