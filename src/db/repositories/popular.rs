use anyhow::Result;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
    sea_query::{Expr, OnConflict},
};

use crate::entities::{popular_searches, prelude::*};

#[derive(Debug, Clone)]
pub struct PopularSearch {
    pub keyword: String,
    pub summary: String,
    pub image_source: String,
    pub view_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<popular_searches::Model> for PopularSearch {
    fn from(model: popular_searches::Model) -> Self {
        Self {
            keyword: model.keyword,
            summary: model.summary,
            image_source: model.image_source,
            view_count: model.view_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct PopularSearchRepository {
    conn: DatabaseConnection,
}

impl PopularSearchRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn record(&self, keyword: &str, summary: &str, image_source: &str) -> Result<()> {
        record_view(&self.conn, keyword, summary, image_source).await
    }

    pub async fn get(&self, keyword: &str) -> Result<Option<PopularSearch>> {
        let row = PopularSearches::find()
            .filter(popular_searches::Column::Keyword.eq(keyword))
            .one(&self.conn)
            .await?;

        Ok(row.map(PopularSearch::from))
    }

    pub async fn list(&self) -> Result<Vec<PopularSearch>> {
        let rows = PopularSearches::find()
            .order_by_desc(popular_searches::Column::UpdatedAt)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(PopularSearch::from).collect())
    }

    pub async fn top(&self, limit: u64) -> Result<Vec<PopularSearch>> {
        let rows = PopularSearches::find()
            .order_by_desc(popular_searches::Column::ViewCount)
            .order_by_asc(popular_searches::Column::Keyword)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(PopularSearch::from).collect())
    }
}

/// Inserts the keyword with one view, or increments the existing row's
/// view count. Runs as one `INSERT .. ON CONFLICT` statement.
pub(crate) async fn record_view<C: ConnectionTrait>(
    conn: &C,
    keyword: &str,
    summary: &str,
    image_source: &str,
) -> Result<()> {
    let now = chrono::Utc::now().to_rfc3339();

    let active = popular_searches::ActiveModel {
        keyword: Set(keyword.to_string()),
        summary: Set(summary.to_string()),
        image_source: Set(image_source.to_string()),
        view_count: Set(1),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    PopularSearches::insert(active)
        .on_conflict(
            OnConflict::column(popular_searches::Column::Keyword)
                .value(
                    popular_searches::Column::ViewCount,
                    Expr::col(popular_searches::Column::ViewCount).add(1),
                )
                .update_column(popular_searches::Column::UpdatedAt)
                .to_owned(),
        )
        .exec(conn)
        .await?;

    Ok(())
}
