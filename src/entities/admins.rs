use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "admins")]
pub struct Model {
    /// UUID v4
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Stored lowercase; uniqueness enforced here
    #[sea_orm(unique)]
    pub email: String,

    /// Argon2id password hash, excluded from every read projection
    pub password_hash: String,

    pub name: String,

    /// "super-admin" | "admin" | "editor"
    pub role: String,

    /// PermissionSet serialized as JSON
    pub permissions: String,

    pub is_active: bool,

    pub last_login: Option<String>,

    pub login_attempts: i32,

    /// RFC 3339; login denied while this is in the future
    pub lock_until: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
