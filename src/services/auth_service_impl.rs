//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::config::{AuthConfig, SecurityConfig};
use crate::db::Store;
use crate::db::repositories::admin::verify_secret;
use crate::models::admin::{Admin, PermissionSet, Role};
use crate::services::auth_service::{AuthError, AuthService, LoginResult, RegisterInput};
use crate::services::token::TokenService;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

pub struct SeaOrmAuthService {
    store: Store,
    tokens: TokenService,
    security: SecurityConfig,
    auth: AuthConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(
        store: Store,
        tokens: TokenService,
        security: SecurityConfig,
        auth: AuthConfig,
    ) -> Self {
        Self {
            store,
            tokens,
            security,
            auth,
        }
    }

    /// Emergency login path used when the database cannot be queried.
    /// Only active when explicitly configured; the token it returns is a
    /// static sentinel, not a signed session token.
    fn offline_login(&self, email: &str, password: &str) -> Option<LoginResult> {
        if !self.auth.offline_fallback {
            return None;
        }

        let configured_email = self.auth.offline_email.as_deref()?;
        let configured_password = self.auth.offline_password.as_deref()?;
        let token = self.auth.offline_token.as_deref()?;

        if !email.eq_ignore_ascii_case(configured_email) || password != configured_password {
            return None;
        }

        warn!("Offline fallback login used for {}", configured_email);
        Some(LoginResult {
            token: token.to_string(),
            admin: Self::offline_admin(configured_email),
        })
    }

    fn offline_admin(email: &str) -> Admin {
        Admin {
            id: "offline-admin".to_string(),
            email: email.to_string(),
            name: "Offline Administrator".to_string(),
            role: Role::SuperAdmin,
            permissions: PermissionSet::all(),
            is_active: true,
            last_login: None,
            login_attempts: 0,
            lock_until: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    // Login only presence-checks; a malformed email falls through to the
    // lookup and reads as bad credentials like any other unknown email.
    fn validate_login_input(email: &str, password: &str) -> Result<(), AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError> {
        Self::validate_login_input(email, password)?;
        let email = email.trim().to_lowercase();

        let found = match self.store.find_admin_with_secret(&email).await {
            Ok(found) => found,
            Err(err) => {
                if let Some(result) = self.offline_login(&email, password) {
                    return Ok(result);
                }
                return Err(AuthError::Database(err.to_string()));
            }
        };

        // Unknown email and wrong password are indistinguishable to the caller.
        let Some((admin, password_hash)) = found else {
            return Err(AuthError::InvalidCredentials);
        };

        if admin.is_locked() {
            return Err(AuthError::AccountLocked);
        }

        let valid = verify_secret(&password_hash, password).await?;
        if !valid {
            let attempts = self
                .store
                .record_failed_login(
                    &admin.id,
                    self.security.max_login_attempts,
                    self.security.lockout_minutes,
                )
                .await?;
            info!(
                "Failed login for {} (attempt {}/{})",
                admin.email, attempts, self.security.max_login_attempts
            );
            return Err(AuthError::InvalidCredentials);
        }

        if !admin.is_active {
            return Err(AuthError::AccountDisabled);
        }

        self.store.reset_login_attempts(&admin.id).await?;

        let token = self
            .tokens
            .issue(&admin.id)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        // Re-read to pick up the cleared counters and fresh last_login.
        let admin = self
            .store
            .find_admin_by_id(&admin.id)
            .await?
            .ok_or(AuthError::AdminNotFound)?;

        info!("Admin {} logged in", admin.email);
        Ok(LoginResult { token, admin })
    }

    async fn register(&self, input: RegisterInput) -> Result<Admin, AuthError> {
        let email = input.email.trim().to_lowercase();

        if !email_regex().is_match(&email) {
            return Err(AuthError::Validation("Invalid email format".to_string()));
        }

        if input.password.len() < 8 {
            return Err(AuthError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        if input.name.trim().is_empty() {
            return Err(AuthError::Validation("Name is required".to_string()));
        }

        if self.store.find_admin_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let role = input.role.unwrap_or(Role::Editor);
        let permissions = input.permissions.unwrap_or_default();

        let admin = self
            .store
            .create_admin(
                &email,
                &input.password,
                input.name.trim(),
                role,
                permissions,
                Some(&self.security),
            )
            .await?;

        info!("Admin {} registered with role {}", admin.email, admin.role);
        Ok(admin)
    }

    async fn authenticate(&self, token: &str) -> Result<Admin, AuthError> {
        if self.auth.offline_fallback
            && let Some(offline_token) = self.auth.offline_token.as_deref()
            && token == offline_token
        {
            let email = self
                .auth
                .offline_email
                .as_deref()
                .unwrap_or("offline@localhost");
            return Ok(Self::offline_admin(email));
        }

        let claims = self
            .tokens
            .verify(token)
            .map_err(|_| AuthError::InvalidCredentials)?;

        let admin = self
            .store
            .find_admin_by_id(&claims.sub)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !admin.is_active {
            return Err(AuthError::AccountDisabled);
        }

        Ok(admin)
    }
}
