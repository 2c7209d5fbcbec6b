use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::models::admin::{Admin, PermissionSet, Role};
use crate::models::blog::{Blog, BlogInput};
use crate::models::career::{Career, CareerInput};
use crate::models::product::{Product, ProductInput};

pub mod migrator;
pub mod repositories;

pub use repositories::analytics::{AnalyticsEvent, DayStats};
pub use repositories::blog::BlogFilter;
pub use repositories::career::CareerFilter;
pub use repositories::product::ProductFilter;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        // Every pooled connection to an in-memory sqlite database gets its
        // own empty database, so :memory: URLs are pinned to one connection.
        let in_memory = db_url.contains(":memory:");
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn admin_repo(&self) -> repositories::admin::AdminRepository {
        repositories::admin::AdminRepository::new(self.conn.clone())
    }

    fn blog_repo(&self) -> repositories::blog::BlogRepository {
        repositories::blog::BlogRepository::new(self.conn.clone())
    }

    fn product_repo(&self) -> repositories::product::ProductRepository {
        repositories::product::ProductRepository::new(self.conn.clone())
    }

    fn career_repo(&self) -> repositories::career::CareerRepository {
        repositories::career::CareerRepository::new(self.conn.clone())
    }

    fn analytics_repo(&self) -> repositories::analytics::AnalyticsRepository {
        repositories::analytics::AnalyticsRepository::new(self.conn.clone())
    }

    // Admins

    pub async fn create_admin(
        &self,
        email: &str,
        raw_password: &str,
        name: &str,
        role: Role,
        permissions: PermissionSet,
        security: Option<&SecurityConfig>,
    ) -> Result<Admin> {
        self.admin_repo()
            .create(email, raw_password, name, role, permissions, security)
            .await
    }

    pub async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>> {
        self.admin_repo().find_by_email(email).await
    }

    pub async fn find_admin_with_secret(
        &self,
        email: &str,
    ) -> Result<Option<(Admin, String)>> {
        self.admin_repo().find_by_email_with_secret(email).await
    }

    pub async fn find_admin_by_id(&self, id: &str) -> Result<Option<Admin>> {
        self.admin_repo().find_by_id(id).await
    }

    pub async fn record_failed_login(
        &self,
        id: &str,
        max_attempts: u32,
        lockout_minutes: u32,
    ) -> Result<i32> {
        self.admin_repo()
            .record_failed_attempt(id, max_attempts, lockout_minutes)
            .await
    }

    pub async fn reset_login_attempts(&self, id: &str) -> Result<()> {
        self.admin_repo().reset_login_attempts(id).await
    }

    pub async fn update_admin_permissions(
        &self,
        id: &str,
        permissions: PermissionSet,
    ) -> Result<()> {
        self.admin_repo().update_permissions(id, permissions).await
    }

    pub async fn set_admin_active(&self, id: &str, is_active: bool) -> Result<bool> {
        self.admin_repo().set_active(id, is_active).await
    }

    // Blogs

    pub async fn list_blogs(
        &self,
        filter: &BlogFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<Blog>, u64)> {
        self.blog_repo().list(filter, page, limit).await
    }

    pub async fn get_blog_by_slug(&self, slug: &str) -> Result<Option<Blog>> {
        self.blog_repo().get_by_slug(slug).await
    }

    pub async fn blog_slug_exists(&self, slug: &str) -> Result<bool> {
        self.blog_repo().slug_exists(slug).await
    }

    pub async fn create_blog(&self, input: &BlogInput) -> Result<Blog> {
        self.blog_repo().create(input).await
    }

    pub async fn update_blog(&self, id: i32, input: &BlogInput) -> Result<Option<Blog>> {
        self.blog_repo().update(id, input).await
    }

    pub async fn remove_blog(&self, id: i32) -> Result<bool> {
        self.blog_repo().remove(id).await
    }

    pub async fn increment_blog_views(&self, id: i32) -> Result<()> {
        self.blog_repo().increment_views(id).await
    }

    pub async fn count_blogs_with_status(&self, status: &str) -> Result<u64> {
        self.blog_repo().count_with_status(status).await
    }

    pub async fn top_published_blogs(&self, limit: u64) -> Result<Vec<Blog>> {
        self.blog_repo().top_published(limit).await
    }

    // Products

    pub async fn list_products(
        &self,
        filter: &ProductFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<Product>, u64)> {
        self.product_repo().list(filter, page, limit).await
    }

    pub async fn get_product_by_slug(&self, slug: &str) -> Result<Option<Product>> {
        self.product_repo().get_by_slug(slug).await
    }

    pub async fn product_slug_exists(&self, slug: &str) -> Result<bool> {
        self.product_repo().slug_exists(slug).await
    }

    pub async fn create_product(&self, input: &ProductInput) -> Result<Product> {
        self.product_repo().create(input).await
    }

    pub async fn update_product(&self, id: i32, input: &ProductInput) -> Result<Option<Product>> {
        self.product_repo().update(id, input).await
    }

    pub async fn remove_product(&self, id: i32) -> Result<bool> {
        self.product_repo().remove(id).await
    }

    pub async fn count_products_with_status(&self, status: &str) -> Result<u64> {
        self.product_repo().count_with_status(status).await
    }

    pub async fn top_launched_products(&self, limit: u64) -> Result<Vec<Product>> {
        self.product_repo().top_launched(limit).await
    }

    // Careers

    pub async fn list_careers(
        &self,
        filter: &CareerFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<Career>, u64)> {
        self.career_repo().list(filter, page, limit).await
    }

    pub async fn get_career_by_slug(&self, slug: &str) -> Result<Option<Career>> {
        self.career_repo().get_by_slug(slug).await
    }

    pub async fn career_slug_exists(&self, slug: &str) -> Result<bool> {
        self.career_repo().slug_exists(slug).await
    }

    pub async fn create_career(&self, input: &CareerInput) -> Result<Career> {
        self.career_repo().create(input).await
    }

    pub async fn update_career(&self, id: i32, input: &CareerInput) -> Result<Option<Career>> {
        self.career_repo().update(id, input).await
    }

    pub async fn remove_career(&self, id: i32) -> Result<bool> {
        self.career_repo().remove(id).await
    }

    pub async fn increment_career_applicants(&self, id: i32) -> Result<()> {
        self.career_repo().increment_applicants(id).await
    }

    pub async fn count_careers_with_status(&self, status: &str) -> Result<u64> {
        self.career_repo().count_with_status(status).await
    }

    // Analytics

    pub async fn track_event(&self, event: AnalyticsEvent) -> Result<()> {
        self.analytics_repo().track(event).await
    }

    pub async fn recent_analytics_days(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
        limit: u64,
    ) -> Result<Vec<DayStats>> {
        self.analytics_repo()
            .recent_days(start_date, end_date, limit)
            .await
    }

    pub async fn analytics_days_since(&self, start_date: &str) -> Result<Vec<DayStats>> {
        self.analytics_repo().days_since(start_date).await
    }
}
