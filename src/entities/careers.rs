use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "careers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    #[sea_orm(unique)]
    pub slug: String,

    pub department: String,

    pub location: String,

    /// "full-time" | "part-time" | "contract" | "internship"
    pub employment_type: String,

    /// "entry" | "mid" | "senior" | "lead" | "executive"
    pub level: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// JSON string arrays
    pub responsibilities: String,

    pub requirements: String,

    pub nice_to_have: String,

    pub benefits: String,

    /// Option<SalaryRange> as JSON
    pub salary: Option<String>,

    /// "open" | "closed" | "paused"
    pub status: String,

    pub featured: bool,

    pub application_deadline: Option<String>,

    pub openings: i32,

    pub posted_date: String,

    pub applicants: i64,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
