use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::admins;
use crate::models::admin::{Admin, PermissionSet, Role};

/// Credential Store: the only component that touches `password_hash`.
pub struct AdminRepository {
    conn: DatabaseConnection,
}

impl AdminRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: admins::Model) -> Admin {
        Admin {
            id: model.id,
            email: model.email,
            name: model.name,
            // Fail closed on corrupt data: unknown roles demote to editor,
            // unreadable matrices collapse to the read-only default.
            role: Role::parse(&model.role).unwrap_or(Role::Editor),
            permissions: serde_json::from_str(&model.permissions).unwrap_or_default(),
            is_active: model.is_active,
            last_login: model.last_login,
            login_attempts: model.login_attempts,
            lock_until: model.lock_until,
            created_at: model.created_at,
        }
    }

    /// Insert a new principal with a freshly hashed password.
    ///
    /// A super-admin role forces the all-true matrix regardless of the
    /// supplied permissions. Email uniqueness is also backed by the schema;
    /// callers check for an existing email first to report duplicates cleanly.
    pub async fn create(
        &self,
        email: &str,
        raw_password: &str,
        name: &str,
        role: Role,
        permissions: PermissionSet,
        security: Option<&SecurityConfig>,
    ) -> Result<Admin> {
        let password = raw_password.to_string();
        let security = security.cloned();
        let password_hash =
            task::spawn_blocking(move || hash_password(&password, security.as_ref()))
                .await
                .context("Password hashing task panicked")??;

        let effective_permissions = if role == Role::SuperAdmin {
            PermissionSet::all()
        } else {
            permissions
        };

        let now = chrono::Utc::now().to_rfc3339();
        let active = admins::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            email: Set(email.trim().to_lowercase()),
            password_hash: Set(password_hash),
            name: Set(name.trim().to_string()),
            role: Set(role.as_str().to_string()),
            permissions: Set(serde_json::to_string(&effective_permissions)
                .context("Failed to serialize permissions")?),
            is_active: Set(true),
            last_login: Set(None),
            login_attempts: Set(0),
            lock_until: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert admin")?;

        Ok(Self::map_model(model))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let admin = admins::Entity::find()
            .filter(admins::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.conn)
            .await
            .context("Failed to query admin by email")?;

        Ok(admin.map(Self::map_model))
    }

    /// Read path that surfaces the stored hash, for verification use only.
    pub async fn find_by_email_with_secret(
        &self,
        email: &str,
    ) -> Result<Option<(Admin, String)>> {
        let admin = admins::Entity::find()
            .filter(admins::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.conn)
            .await
            .context("Failed to query admin by email")?;

        Ok(admin.map(|m| {
            let hash = m.password_hash.clone();
            (Self::map_model(m), hash)
        }))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Admin>> {
        let admin = admins::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query admin by id")?;

        Ok(admin.map(Self::map_model))
    }

    /// One wrong-password outcome: increment the counter, arm the lock once
    /// the threshold is reached. Plain read-modify-write; concurrent attempts
    /// for the same account may lose an increment, which only delays the
    /// lockout by one attempt.
    pub async fn record_failed_attempt(
        &self,
        id: &str,
        max_attempts: u32,
        lockout_minutes: u32,
    ) -> Result<i32> {
        let admin = admins::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query admin for attempt accounting")?
            .ok_or_else(|| anyhow::anyhow!("Admin not found: {id}"))?;

        let attempts = admin.login_attempts + 1;
        let now = chrono::Utc::now();

        let mut active: admins::ActiveModel = admin.into();
        active.login_attempts = Set(attempts);
        if attempts >= max_attempts as i32 {
            let until = now + chrono::Duration::minutes(i64::from(lockout_minutes));
            active.lock_until = Set(Some(until.to_rfc3339()));
        }
        active.updated_at = Set(now.to_rfc3339());
        active.update(&self.conn).await?;

        Ok(attempts)
    }

    /// Successful authentication: zero the counter, clear the lock, stamp
    /// `last_login`.
    pub async fn reset_login_attempts(&self, id: &str) -> Result<()> {
        let admin = admins::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query admin for attempt reset")?
            .ok_or_else(|| anyhow::anyhow!("Admin not found: {id}"))?;

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: admins::ActiveModel = admin.into();
        active.login_attempts = Set(0);
        active.lock_until = Set(None);
        active.last_login = Set(Some(now.clone()));
        active.updated_at = Set(now);
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Replace the stored matrix. Super-admins keep the forced all-true grid.
    pub async fn update_permissions(&self, id: &str, permissions: PermissionSet) -> Result<()> {
        let admin = admins::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query admin for permission update")?
            .ok_or_else(|| anyhow::anyhow!("Admin not found: {id}"))?;

        let effective = if admin.role == Role::SuperAdmin.as_str() {
            PermissionSet::all()
        } else {
            permissions
        };

        let mut active: admins::ActiveModel = admin.into();
        active.permissions =
            Set(serde_json::to_string(&effective).context("Failed to serialize permissions")?);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Deactivation instead of deletion; a disabled account cannot
    /// authenticate even with correct credentials.
    pub async fn set_active(&self, id: &str, is_active: bool) -> Result<bool> {
        let result = admins::Entity::update_many()
            .col_expr(
                admins::Column::IsActive,
                sea_orm::sea_query::Expr::value(is_active),
            )
            .col_expr(
                admins::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(admins::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

/// Hash a password using Argon2id with optional custom params.
pub fn hash_password(password: &str, security: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = security {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Constant-work comparison of a candidate password against a stored hash.
/// Runs in `spawn_blocking` because Argon2 verification is CPU-intensive.
pub async fn verify_secret(password_hash: &str, candidate: &str) -> Result<bool> {
    let password_hash = password_hash.to_string();
    let candidate = candidate.to_string();

    let is_valid = task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

        let argon2 = Argon2::default();
        Ok::<bool, anyhow::Error>(
            argon2
                .verify_password(candidate.as_bytes(), &parsed_hash)
                .is_ok(),
        )
    })
    .await
    .context("Password verification task panicked")??;

    Ok(is_valid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hash = hash_password("longenough1", None).unwrap();
        assert!(verify_secret(&hash, "longenough1").await.unwrap());
        assert!(!verify_secret(&hash, "longenough2").await.unwrap());
    }

    #[test]
    fn test_hash_is_one_way_salted() {
        let a = hash_password("longenough1", None).unwrap();
        let b = hash_password("longenough1", None).unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
    }
}
