use sea_orm::entity::prelude::*;

/// One row per UTC day of site activity.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "analytics_days")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// "YYYY-MM-DD"
    #[sea_orm(unique)]
    pub date: String,

    /// Per-page counter map as JSON, including "total"
    pub page_views: String,

    pub unique_visitors: i64,

    /// Vec<ContentViews> as JSON
    pub blog_views: String,

    pub product_views: String,

    pub contact_form_submissions: i64,

    pub career_applications: i64,

    pub assistant_interactions: i64,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
