//! Domain service for the signed-in user's own profile.
//!
//! Covers the edit view, validated updates with avatar replacement, and
//! account deletion.

use serde::Serialize;
use thiserror::Error;

use crate::db::User;
use crate::services::avatar::AvatarStorage;

/// Errors specific to profile operations.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("User not found")]
    NotFound,

    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("The provided password is incorrect")]
    IncorrectPassword,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ProfileError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for ProfileError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Profile fields shown on the edit view.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProfileView {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub avatar_url: Option<String>,
    pub email_verified_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for ProfileView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            gender: user.gender,
            avatar_url: user.avatar.as_deref().map(AvatarStorage::url_for),
            email_verified_at: user.email_verified_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// An uploaded avatar file as received from the client.
#[derive(Debug, Clone, Default)]
pub struct AvatarUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Submitted profile form.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub avatar: Option<AvatarUpload>,
}

/// Domain service trait for profiles.
#[async_trait::async_trait]
pub trait ProfileService: Send + Sync {
    /// Current profile of `user_id`.
    async fn edit(&self, user_id: i32) -> Result<ProfileView, ProfileError>;

    /// Validates and applies `update`.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Validation`] naming the first offending field.
    async fn update(&self, user_id: i32, update: ProfileUpdate)
    -> Result<ProfileView, ProfileError>;

    /// Deletes the account after checking `password`.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::IncorrectPassword`] when `password` does not match.
    async fn destroy(&self, user_id: i32, password: &str) -> Result<(), ProfileError>;
}
