use crate::entities::{prelude::*, search_cache};
use crate::models::search::SearchResult;
use anyhow::Result;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    sea_query::OnConflict,
};
use tracing::warn;

pub struct CacheRepository {
    conn: DatabaseConnection,
}

impl CacheRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Returns the unexpired entry for `keyword`. Entries that no longer decode
    /// are treated as a miss.
    pub async fn get_search(&self, keyword: &str) -> Result<Option<SearchResult>> {
        let now = timestamp(chrono::Utc::now());

        // Opportunistic cleanup of expired entries
        if let Err(e) = SearchCache::delete_many()
            .filter(search_cache::Column::ExpiresAt.lte(&now))
            .exec(&self.conn)
            .await
        {
            warn!(error = %e, "Failed to purge expired cache entries");
        }

        let entry = SearchCache::find()
            .filter(search_cache::Column::Keyword.eq(keyword))
            .filter(search_cache::Column::ExpiresAt.gt(&now))
            .one(&self.conn)
            .await?;

        let Some(entry) = entry else {
            return Ok(None);
        };

        match serde_json::from_str(&entry.value_json) {
            Ok(result) => Ok(Some(result)),
            Err(e) => {
                warn!(keyword = %keyword, error = %e, "Discarding undecodable cache entry");
                Ok(None)
            }
        }
    }

    pub async fn put_search(
        &self,
        keyword: &str,
        result: &SearchResult,
        ttl: chrono::Duration,
    ) -> Result<()> {
        upsert_search(&self.conn, keyword, result, ttl).await
    }
}

/// Stores `result` under `keyword`, replacing any previous entry.
pub(crate) async fn upsert_search<C: ConnectionTrait>(
    conn: &C,
    keyword: &str,
    result: &SearchResult,
    ttl: chrono::Duration,
) -> Result<()> {
    let value_json = serde_json::to_string(result)?;
    let now = chrono::Utc::now();

    let active = search_cache::ActiveModel {
        keyword: Set(keyword.to_string()),
        value_json: Set(value_json),
        created_at: Set(timestamp(now)),
        expires_at: Set(timestamp(now + ttl)),
        ..Default::default()
    };

    SearchCache::insert(active)
        .on_conflict(
            OnConflict::column(search_cache::Column::Keyword)
                .update_columns([
                    search_cache::Column::ValueJson,
                    search_cache::Column::CreatedAt,
                    search_cache::Column::ExpiresAt,
                ])
                .to_owned(),
        )
        .exec(conn)
        .await?;

    Ok(())
}

/// Fixed-width UTC timestamps so expiry can be compared as text.
fn timestamp(at: chrono::DateTime<chrono::Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
