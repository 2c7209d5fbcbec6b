use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

use crate::models::admin::PermissionSet;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Bootstrap super-admin. Replace the password after first login.
pub const SEED_ADMIN_EMAIL: &str = "admin@vitrine.local";
pub const SEED_ADMIN_PASSWORD: &str = "change-me-please";

/// Hash the seed password using Argon2id
fn hash_seed_password() -> String {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(SEED_ADMIN_PASSWORD.as_bytes(), &salt)
        .expect("Failed to hash seed password")
        .to_string()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Admins)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Blogs)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Products)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Careers)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(AnalyticsDays)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Seed the bootstrap super-admin
        let now = chrono::Utc::now().to_rfc3339();
        let password_hash = hash_seed_password();
        let permissions = serde_json::to_string(&PermissionSet::all())
            .expect("Failed to serialize seed permissions");

        let insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(Admins)
            .columns([
                crate::entities::admins::Column::Id,
                crate::entities::admins::Column::Email,
                crate::entities::admins::Column::PasswordHash,
                crate::entities::admins::Column::Name,
                crate::entities::admins::Column::Role,
                crate::entities::admins::Column::Permissions,
                crate::entities::admins::Column::IsActive,
                crate::entities::admins::Column::LoginAttempts,
                crate::entities::admins::Column::CreatedAt,
                crate::entities::admins::Column::UpdatedAt,
            ])
            .values_panic([
                uuid::Uuid::new_v4().to_string().into(),
                SEED_ADMIN_EMAIL.into(),
                password_hash.into(),
                "Site Admin".into(),
                "super-admin".into(),
                permissions.into(),
                true.into(),
                0.into(),
                now.clone().into(),
                now.into(),
            ])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AnalyticsDays).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Careers).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Blogs).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Admins).to_owned())
            .await?;

        Ok(())
    }
}
