use crate::config::SecurityConfig;
use crate::models::search::SearchResult;
use anyhow::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement, TransactionTrait,
};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::history::HistoryEntry;
pub use repositories::popular::PopularSearch;
pub use repositories::post::{PopularPost, Post};
pub use repositories::user::{User, UserUpdate};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // Every pooled connection to `sqlite::memory:` opens its own empty
        // database, so in-memory stores are pinned to a single connection.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        if !in_memory {
            opt.idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn history_repo(&self) -> repositories::history::HistoryRepository {
        repositories::history::HistoryRepository::new(self.conn.clone())
    }

    fn post_repo(&self) -> repositories::post::PostRepository {
        repositories::post::PostRepository::new(self.conn.clone())
    }

    fn popular_repo(&self) -> repositories::popular::PopularSearchRepository {
        repositories::popular::PopularSearchRepository::new(self.conn.clone())
    }

    fn cache_repo(&self) -> repositories::cache::CacheRepository {
        repositories::cache::CacheRepository::new(self.conn.clone())
    }

    // ========== Search Cache ==========

    pub async fn get_cached_search(&self, keyword: &str) -> Result<Option<SearchResult>> {
        self.cache_repo().get_search(keyword).await
    }

    pub async fn cache_search(
        &self,
        keyword: &str,
        result: &SearchResult,
        ttl: chrono::Duration,
    ) -> Result<()> {
        self.cache_repo().put_search(keyword, result, ttl).await
    }

    // ========== Popular Searches ==========

    pub async fn record_popular_search(
        &self,
        keyword: &str,
        summary: &str,
        image_source: &str,
    ) -> Result<()> {
        self.popular_repo()
            .record(keyword, summary, image_source)
            .await
    }

    pub async fn get_popular_search(&self, keyword: &str) -> Result<Option<PopularSearch>> {
        self.popular_repo().get(keyword).await
    }

    pub async fn list_popular_searches(&self) -> Result<Vec<PopularSearch>> {
        self.popular_repo().list().await
    }

    pub async fn top_searches(&self, limit: u64) -> Result<Vec<PopularSearch>> {
        self.popular_repo().top(limit).await
    }

    // ========== History ==========

    pub async fn record_history(&self, user_id: i32, search_text: &str) -> Result<()> {
        self.history_repo().record(user_id, search_text).await
    }

    pub async fn list_history(&self, user_id: i32) -> Result<Vec<HistoryEntry>> {
        self.history_repo().list_for_user(user_id).await
    }

    // ========== Search Outcome ==========

    /// Persists one completed search in a single transaction: the popularity
    /// bump, the cache entry when `fresh` carries a newly generated result,
    /// then the user's history. Nothing is kept if any write fails.
    pub async fn record_search(
        &self,
        keyword: &str,
        summary: &str,
        image_source: &str,
        fresh: Option<(&SearchResult, chrono::Duration)>,
        user_id: Option<i32>,
    ) -> Result<()> {
        let txn = self.conn.begin().await?;

        repositories::popular::record_view(&txn, keyword, summary, image_source).await?;

        if let Some((result, ttl)) = fresh {
            repositories::cache::upsert_search(&txn, keyword, result, ttl).await?;
        }

        if let Some(user_id) = user_id {
            repositories::history::insert_once(&txn, user_id, keyword).await?;
        }

        txn.commit().await?;
        Ok(())
    }

    // ========== Posts ==========

    pub async fn create_post(&self, title: &str, body: &str) -> Result<Post> {
        self.post_repo().create(title, body).await
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        self.post_repo().list().await
    }

    pub async fn get_post_by_title(&self, title: &str) -> Result<Option<Post>> {
        self.post_repo().get_by_title(title).await
    }

    pub async fn record_post_view(&self, post_id: i32) -> Result<()> {
        self.post_repo().record_view(post_id).await
    }

    pub async fn list_popular_posts(&self) -> Result<Vec<PopularPost>> {
        self.post_repo().list_popular().await
    }

    // ========== Users ==========

    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        config: &SecurityConfig,
    ) -> Result<User> {
        self.user_repo()
            .create(name, email, password, config)
            .await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn email_taken_by_other(&self, email: &str, user_id: i32) -> Result<bool> {
        self.user_repo().email_taken_by_other(email, user_id).await
    }

    pub async fn verify_user_password(&self, user_id: i32, password: &str) -> Result<bool> {
        self.user_repo().verify_password(user_id, password).await
    }

    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_credentials(email, password).await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn update_user_profile(&self, user_id: i32, update: UserUpdate) -> Result<User> {
        self.user_repo().update_profile(user_id, update).await
    }

    pub async fn delete_user(&self, user_id: i32) -> Result<bool> {
        self.user_repo().delete(user_id).await
    }
}
