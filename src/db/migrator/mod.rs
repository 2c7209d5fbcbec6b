use sea_orm_migration::prelude::*;

mod m20260815_initial;

pub use m20260815_initial::{SEED_ADMIN_EMAIL, SEED_ADMIN_PASSWORD};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260815_initial::Migration)]
    }
}
