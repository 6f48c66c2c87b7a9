//! `SeaORM` implementation of the `AuthService` trait.

use crate::db::{Store, User};
use crate::services::auth_service::{AuthError, AuthService, CurrentUser, LoginResult};
use async_trait::async_trait;

pub struct SeaOrmAuthService {
    store: Store,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn current(user: User) -> CurrentUser {
    CurrentUser {
        id: user.id,
        email: user.email,
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError> {
        let user = self
            .store
            .verify_credentials(email.trim(), password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        Ok(LoginResult {
            user_id: user.id,
            name: user.name,
            email: user.email,
            api_key: user.api_key,
        })
    }

    async fn verify_api_key(&self, api_key: &str) -> Result<Option<CurrentUser>, AuthError> {
        let user = self.store.verify_api_key(api_key).await?;
        Ok(user.map(current))
    }

    async fn current_user(&self, user_id: i32) -> Result<Option<CurrentUser>, AuthError> {
        let user = self.store.get_user(user_id).await?;
        Ok(user.map(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrator::m20260301_initial::DEFAULT_API_KEY;

    async fn service() -> SeaOrmAuthService {
        SeaOrmAuthService::new(Store::new("sqlite::memory:").await.unwrap())
    }

    #[tokio::test]
    async fn seeded_admin_can_log_in() {
        let auth = service().await;

        let result = auth.login("admin@localhost", "password").await.unwrap();
        assert_eq!(result.email, "admin@localhost");
        assert_eq!(result.api_key, DEFAULT_API_KEY);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let auth = service().await;

        let err = auth.login("admin@localhost", "nope").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let err = auth.login("nobody@localhost", "password").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn api_key_resolves_user() {
        let auth = service().await;

        let user = auth.verify_api_key(DEFAULT_API_KEY).await.unwrap().unwrap();
        assert_eq!(user.email, "admin@localhost");
        assert!(auth.verify_api_key("bogus").await.unwrap().is_none());

        assert_eq!(auth.current_user(user.id).await.unwrap(), Some(user));
        assert!(auth.current_user(9999).await.unwrap().is_none());
    }
}
