use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blogs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    #[sea_orm(unique)]
    pub slug: String,

    pub excerpt: String,

    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// BlogAuthor as JSON
    pub author: String,

    pub category: String,

    /// JSON string array
    pub tags: String,

    pub cover_image: String,

    pub publish_date: String,

    /// "draft" | "published" | "archived"
    pub status: String,

    pub featured: bool,

    /// SeoMeta as JSON
    pub seo: String,

    pub views: i64,

    pub likes: i64,

    pub read_time: i32,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
