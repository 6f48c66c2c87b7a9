use anyhow::Result;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};

use crate::entities::{history, prelude::*};

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub id: i32,
    pub search_text: String,
    pub created_at: String,
}

impl From<history::Model> for HistoryEntry {
    fn from(model: history::Model) -> Self {
        Self {
            id: model.id,
            search_text: model.search_text,
            created_at: model.created_at,
        }
    }
}

pub struct HistoryRepository {
    conn: DatabaseConnection,
}

impl HistoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn record(&self, user_id: i32, search_text: &str) -> Result<()> {
        insert_once(&self.conn, user_id, search_text).await
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<HistoryEntry>> {
        let rows = History::find()
            .filter(history::Column::UserId.eq(user_id))
            .order_by_desc(history::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(HistoryEntry::from).collect())
    }
}

/// Appends `(user, search_text)` unless that pair is already recorded.
pub(crate) async fn insert_once<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    search_text: &str,
) -> Result<()> {
    let active = history::ActiveModel {
        user_id: Set(user_id),
        search_text: Set(search_text.to_string()),
        created_at: Set(chrono::Utc::now().to_rfc3339()),
        ..Default::default()
    };

    History::insert(active)
        .on_conflict(
            OnConflict::columns([history::Column::UserId, history::Column::SearchText])
                .do_nothing()
                .to_owned(),
        )
        .do_nothing()
        .exec(conn)
        .await?;

    Ok(())
}
