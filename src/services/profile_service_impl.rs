//! `SeaORM` implementation of the `ProfileService` trait.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::{info, warn};

use crate::db::{Store, UserUpdate};
use crate::services::avatar::AvatarStorage;
use crate::services::profile_service::{
    AvatarUpload, ProfileError, ProfileService, ProfileUpdate, ProfileView,
};

const MAX_NAME_CHARS: usize = 255;
const MAX_EMAIL_CHARS: usize = 255;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("Invalid regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+\-() ]{3,20}$").expect("Invalid regex"));

const GENDERS: &[&str] = &["male", "female", "other"];

const AVATAR_TYPES: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

pub struct SeaOrmProfileService {
    store: Store,
    avatars: AvatarStorage,
    max_avatar_bytes: usize,
}

impl SeaOrmProfileService {
    #[must_use]
    pub const fn new(store: Store, avatars: AvatarStorage, max_avatar_bytes: usize) -> Self {
        Self {
            store,
            avatars,
            max_avatar_bytes,
        }
    }

    /// Normalized form values, or the first field that fails.
    async fn validate(
        &self,
        user_id: i32,
        update: &ProfileUpdate,
    ) -> Result<(String, String, Option<String>, Option<String>), ProfileError> {
        let name = update.name.trim();
        if name.is_empty() {
            return Err(ProfileError::validation("name", "The name field is required."));
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(ProfileError::validation(
                "name",
                format!("The name may not be greater than {MAX_NAME_CHARS} characters."),
            ));
        }

        let email = update.email.trim();
        if email.is_empty() {
            return Err(ProfileError::validation("email", "The email field is required."));
        }
        if email.chars().count() > MAX_EMAIL_CHARS || !EMAIL_RE.is_match(email) {
            return Err(ProfileError::validation(
                "email",
                "The email must be a valid email address.",
            ));
        }
        if self.store.email_taken_by_other(email, user_id).await? {
            return Err(ProfileError::validation(
                "email",
                "The email has already been taken.",
            ));
        }

        let phone = non_empty(update.phone.as_deref());
        if let Some(phone) = &phone
            && !PHONE_RE.is_match(phone)
        {
            return Err(ProfileError::validation(
                "phone",
                "The phone format is invalid.",
            ));
        }

        let gender = non_empty(update.gender.as_deref()).map(|g| g.to_lowercase());
        if let Some(gender) = &gender
            && !GENDERS.contains(&gender.as_str())
        {
            return Err(ProfileError::validation(
                "gender",
                "The selected gender is invalid.",
            ));
        }

        Ok((name.to_string(), email.to_string(), phone, gender))
    }

    fn check_avatar(&self, upload: &AvatarUpload) -> Result<&'static str, ProfileError> {
        if upload.bytes.is_empty() {
            return Err(ProfileError::validation("avatar", "The avatar must be an image."));
        }
        if upload.bytes.len() > self.max_avatar_bytes {
            return Err(ProfileError::validation(
                "avatar",
                format!(
                    "The avatar may not be greater than {} kilobytes.",
                    self.max_avatar_bytes / 1024
                ),
            ));
        }

        avatar_extension(upload.content_type.as_deref(), upload.file_name.as_deref()).ok_or_else(
            || {
                ProfileError::validation(
                    "avatar",
                    "The avatar must be a file of type: png, jpeg, gif, webp.",
                )
            },
        )
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Picks the stored extension from the declared content type, falling back to
/// the file name when the client sent none or a generic one.
fn avatar_extension(content_type: Option<&str>, file_name: Option<&str>) -> Option<&'static str> {
    let declared = content_type
        .map(str::to_ascii_lowercase)
        .filter(|ct| ct != "application/octet-stream");

    let mime = declared.or_else(|| {
        file_name
            .and_then(|name| mime_guess::from_path(name).first())
            .map(|m| m.essence_str().to_string())
    })?;

    AVATAR_TYPES
        .iter()
        .find(|(ct, _)| *ct == mime)
        .map(|(_, ext)| *ext)
}

#[async_trait]
impl ProfileService for SeaOrmProfileService {
    async fn edit(&self, user_id: i32) -> Result<ProfileView, ProfileError> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(ProfileError::NotFound)?;

        Ok(ProfileView::from(user))
    }

    async fn update(
        &self,
        user_id: i32,
        update: ProfileUpdate,
    ) -> Result<ProfileView, ProfileError> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(ProfileError::NotFound)?;

        let (name, email, phone, gender) = self.validate(user_id, &update).await?;

        let new_avatar = match &update.avatar {
            Some(upload) => {
                let extension = self.check_avatar(upload)?;
                let stored = self
                    .avatars
                    .store(&upload.bytes, extension)
                    .await
                    .map_err(|e| ProfileError::Storage(e.to_string()))?;
                Some(stored)
            }
            None => None,
        };

        let email_changed = email != user.email;
        let user_update = UserUpdate {
            name,
            email,
            phone,
            gender,
            avatar: new_avatar.clone(),
            clear_email_verification: email_changed,
        };

        let updated = match self.store.update_user_profile(user_id, user_update).await {
            Ok(updated) => updated,
            Err(e) => {
                if let Some(stored) = &new_avatar
                    && let Err(cleanup) = self.avatars.delete(stored).await
                {
                    warn!(error = %cleanup, "Failed to remove avatar after failed update");
                }
                return Err(e.into());
            }
        };

        if new_avatar.is_some()
            && let Some(old) = user.avatar.as_deref()
            && let Err(e) = self.avatars.delete(old).await
        {
            warn!(error = %e, "Failed to remove previous avatar");
        }

        info!(user_id, email_changed, "Profile updated");
        Ok(ProfileView::from(updated))
    }

    async fn destroy(&self, user_id: i32, password: &str) -> Result<(), ProfileError> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(ProfileError::NotFound)?;

        if !self.store.verify_user_password(user_id, password).await? {
            return Err(ProfileError::IncorrectPassword);
        }

        if !self.store.delete_user(user_id).await? {
            return Err(ProfileError::NotFound);
        }

        if let Some(avatar) = user.avatar.as_deref()
            && let Err(e) = self.avatars.delete(avatar).await
        {
            warn!(error = %e, "Failed to remove avatar of deleted account");
        }

        info!(user_id, "Account deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecurityConfig;
    use std::path::PathBuf;

    struct Fixture {
        service: SeaOrmProfileService,
        store: Store,
        root: PathBuf,
        admin_id: i32,
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.root);
        }
    }

    async fn fixture() -> Fixture {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let root =
            std::env::temp_dir().join(format!("wikilens-profile-{}", uuid::Uuid::new_v4()));
        let admin_id = store
            .get_user_by_email("admin@localhost")
            .await
            .unwrap()
            .unwrap()
            .id;
        Fixture {
            service: SeaOrmProfileService::new(store.clone(), AvatarStorage::new(&root), 1024),
            store,
            root,
            admin_id,
        }
    }

    fn form(name: &str, email: &str) -> ProfileUpdate {
        ProfileUpdate {
            name: name.to_string(),
            email: email.to_string(),
            ..Default::default()
        }
    }

    fn png(bytes: &[u8]) -> AvatarUpload {
        AvatarUpload {
            file_name: Some("me.png".to_string()),
            content_type: Some("image/png".to_string()),
            bytes: bytes.to_vec(),
        }
    }

    fn field_of(err: ProfileError) -> &'static str {
        match err {
            ProfileError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn edit_returns_current_fields() {
        let f = fixture().await;
        let view = f.service.edit(f.admin_id).await.unwrap();
        assert_eq!(view.email, "admin@localhost");
        assert!(view.email_verified_at.is_some());
        assert!(view.avatar_url.is_none());
    }

    #[tokio::test]
    async fn changing_email_clears_verification() {
        let f = fixture().await;

        let view = f
            .service
            .update(f.admin_id, form("Admin", "admin@localhost"))
            .await
            .unwrap();
        assert!(view.email_verified_at.is_some());

        let view = f
            .service
            .update(f.admin_id, form("Admin", "root@example.com"))
            .await
            .unwrap();
        assert_eq!(view.email, "root@example.com");
        assert!(view.email_verified_at.is_none());
    }

    #[tokio::test]
    async fn invalid_fields_are_reported() {
        let f = fixture().await;

        let err = f.service.update(f.admin_id, form("  ", "a@b")).await.unwrap_err();
        assert_eq!(field_of(err), "name");

        let err = f
            .service
            .update(f.admin_id, form("Admin", "not-an-email"))
            .await
            .unwrap_err();
        assert_eq!(field_of(err), "email");

        let mut update = form("Admin", "admin@localhost");
        update.phone = Some("call me".to_string());
        let err = f.service.update(f.admin_id, update).await.unwrap_err();
        assert_eq!(field_of(err), "phone");

        let mut update = form("Admin", "admin@localhost");
        update.gender = Some("robot".to_string());
        let err = f.service.update(f.admin_id, update).await.unwrap_err();
        assert_eq!(field_of(err), "gender");
    }

    #[tokio::test]
    async fn email_of_another_user_is_rejected() {
        let f = fixture().await;
        f.store
            .create_user("Other", "other@example.com", "secret123", &SecurityConfig::default())
            .await
            .unwrap();

        let err = f
            .service
            .update(f.admin_id, form("Admin", "other@example.com"))
            .await
            .unwrap_err();
        assert_eq!(field_of(err), "email");
    }

    #[tokio::test]
    async fn avatar_is_replaced_and_old_file_removed() {
        let f = fixture().await;

        let mut update = form("Admin", "admin@localhost");
        update.avatar = Some(png(b"first"));
        let first = f.service.update(f.admin_id, update).await.unwrap();
        let first_name = f.store.get_user(f.admin_id).await.unwrap().unwrap().avatar.unwrap();
        assert!(first.avatar_url.unwrap().starts_with("/avatars/"));
        assert!(f.root.join(&first_name).exists());

        let mut update = form("Admin", "admin@localhost");
        update.avatar = Some(png(b"second"));
        f.service.update(f.admin_id, update).await.unwrap();
        let second_name = f.store.get_user(f.admin_id).await.unwrap().unwrap().avatar.unwrap();

        assert_ne!(first_name, second_name);
        assert!(!f.root.join(&first_name).exists());
        assert_eq!(std::fs::read(f.root.join(&second_name)).unwrap(), b"second");
    }

    #[tokio::test]
    async fn oversized_or_foreign_avatars_are_rejected() {
        let f = fixture().await;

        let mut update = form("Admin", "admin@localhost");
        update.avatar = Some(png(&[0u8; 2048]));
        let err = f.service.update(f.admin_id, update).await.unwrap_err();
        assert_eq!(field_of(err), "avatar");

        let mut update = form("Admin", "admin@localhost");
        update.avatar = Some(AvatarUpload {
            file_name: Some("notes.txt".to_string()),
            content_type: None,
            bytes: b"hello".to_vec(),
        });
        let err = f.service.update(f.admin_id, update).await.unwrap_err();
        assert_eq!(field_of(err), "avatar");
    }

    #[test]
    fn extension_falls_back_to_file_name() {
        assert_eq!(avatar_extension(Some("image/jpeg"), None), Some("jpg"));
        assert_eq!(
            avatar_extension(Some("application/octet-stream"), Some("a.webp")),
            Some("webp")
        );
        assert_eq!(avatar_extension(None, Some("a.gif")), Some("gif"));
        assert_eq!(avatar_extension(Some("image/svg+xml"), Some("a.svg")), None);
    }

    #[tokio::test]
    async fn destroy_requires_password_and_removes_user() {
        let f = fixture().await;
        f.store.record_history(f.admin_id, "Rust").await.unwrap();

        let err = f.service.destroy(f.admin_id, "wrong").await.unwrap_err();
        assert!(matches!(err, ProfileError::IncorrectPassword));
        assert!(f.store.get_user(f.admin_id).await.unwrap().is_some());

        f.service.destroy(f.admin_id, "password").await.unwrap();
        assert!(f.store.get_user(f.admin_id).await.unwrap().is_none());
        assert!(f.store.list_history(f.admin_id).await.unwrap().is_empty());
        assert!(matches!(
            f.service.edit(f.admin_id).await,
            Err(ProfileError::NotFound)
        ));
    }
}
