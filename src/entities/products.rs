use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    #[sea_orm(unique)]
    pub slug: String,

    pub tagline: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub category: String,

    /// Vec<ProductFeature> as JSON
    pub features: String,

    /// Pricing as JSON
    pub pricing: String,

    /// ProductImages as JSON
    pub images: String,

    /// JSON string array
    pub technologies: String,

    /// "development" | "beta" | "launched" | "discontinued"
    pub status: String,

    pub demo_url: Option<String>,

    pub documentation_url: Option<String>,

    /// SeoMeta as JSON
    pub seo: String,

    pub featured: bool,

    pub sort_order: i32,

    /// ProductStats as JSON
    pub stats: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
