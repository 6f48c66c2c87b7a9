use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "popular_searches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Upsert key: one row per searched keyword.
    #[sea_orm(unique)]
    pub keyword: String,

    /// First words of the generated summary.
    pub summary: String,

    pub image_source: String,

    pub view_count: i64,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
