//! Domain service for admin authentication.
//!
//! Handles login with lockout accounting, admin provisioning, and resolving
//! bearer tokens back to an admin record.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::admin::{Admin, PermissionSet, Role};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account locked due to too many failed attempts. Try again later")]
    AccountLocked,

    #[error("Account is deactivated")]
    AccountDisabled,

    #[error("An admin with this email already exists")]
    DuplicateEmail,

    #[error("Admin not found")]
    AdminNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Successful login payload: the signed token plus the admin it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub token: String,
    pub admin: Admin,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub permissions: Option<PermissionSet>,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and issues a session token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown email or a
    /// wrong password, [`AuthError::AccountLocked`] while the lockout window
    /// is open, and [`AuthError::AccountDisabled`] for deactivated accounts.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Provisions a new admin account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::DuplicateEmail`] when the email is taken.
    async fn register(&self, input: RegisterInput) -> Result<Admin, AuthError>;

    /// Resolves a bearer token to the admin it was issued for.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for bad or expired tokens
    /// and [`AuthError::AccountDisabled`] if the account was deactivated
    /// after the token was issued.
    async fn authenticate(&self, token: &str) -> Result<Admin, AuthError>;
}
