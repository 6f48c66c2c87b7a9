use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::{Expr, OnConflict},
};

use crate::entities::{popular_posts, posts, prelude::*};

#[derive(Debug, Clone)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<posts::Model> for Post {
    fn from(model: posts::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            body: model.body,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PopularPost {
    pub post_id: i32,
    pub title: String,
    pub view_count: i64,
}

pub struct PostRepository {
    conn: DatabaseConnection,
}

impl PostRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, title: &str, body: &str) -> Result<Post> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = posts::ActiveModel {
            title: Set(title.to_string()),
            body: Set(body.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .with_context(|| format!("Failed to insert post '{title}'"))?;

        Ok(Post::from(model))
    }

    pub async fn list(&self) -> Result<Vec<Post>> {
        let rows = Posts::find()
            .order_by_desc(posts::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    pub async fn get_by_title(&self, title: &str) -> Result<Option<Post>> {
        let row = Posts::find()
            .filter(posts::Column::Title.eq(title))
            .one(&self.conn)
            .await?;

        Ok(row.map(Post::from))
    }

    /// Counts one view of a post; a single statement so concurrent readers never
    /// produce a second row.
    pub async fn record_view(&self, post_id: i32) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = popular_posts::ActiveModel {
            post_id: Set(post_id),
            view_count: Set(1),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        PopularPosts::insert(active)
            .on_conflict(
                OnConflict::column(popular_posts::Column::PostId)
                    .value(
                        popular_posts::Column::ViewCount,
                        Expr::col(popular_posts::Column::ViewCount).add(1),
                    )
                    .update_column(popular_posts::Column::UpdatedAt)
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn list_popular(&self) -> Result<Vec<PopularPost>> {
        let rows = PopularPosts::find()
            .find_also_related(Posts)
            .order_by_desc(popular_posts::Column::ViewCount)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(popular, post)| {
                post.map(|p| PopularPost {
                    post_id: popular.post_id,
                    title: p.title,
                    view_count: popular.view_count,
                })
            })
            .collect())
    }
}
