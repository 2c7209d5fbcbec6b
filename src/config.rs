use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub security: SecurityConfig,

    pub auth: AuthConfig,

    pub ai: AiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/vitrine.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5001,
            cors_allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (default: 1)
    pub argon2_parallelism: u32,

    /// Failed logins allowed before the account locks.
    pub max_login_attempts: u32,

    /// How long a locked account stays locked.
    pub lockout_minutes: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
            max_login_attempts: 5,
            lockout_minutes: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret for session tokens. The VITRINE_JWT_SECRET environment
    /// variable takes precedence over this value.
    pub jwt_secret: Option<String>,

    /// Session token lifetime in days.
    pub token_ttl_days: i64,

    /// Emergency credential pair accepted when the database is unreachable.
    /// Disabled unless all three offline_* values are set.
    pub offline_fallback: bool,

    pub offline_email: Option<String>,

    pub offline_password: Option<String>,

    pub offline_token: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_days: 7,
            offline_fallback: false,
            offline_email: None,
            offline_password: None,
            offline_token: None,
        }
    }
}

impl AuthConfig {
    /// Resolved signing secret, environment first.
    #[must_use]
    pub fn resolved_jwt_secret(&self) -> Option<String> {
        std::env::var("VITRINE_JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.jwt_secret.clone().filter(|s| !s.is_empty()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub enabled: bool,

    /// Remote model API key. The GEMINI_API_KEY environment variable takes
    /// precedence over this value.
    pub api_key: Option<String>,

    pub base_url: String,

    pub model: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
        }
    }
}

impl AiConfig {
    #[must_use]
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.api_key.clone().filter(|s| !s.is_empty()))
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::default_config_path();
        self.save_to_path(&path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        if let Ok(path) = std::env::var("VITRINE_CONFIG") {
            paths.push(PathBuf::from(path));
        }

        paths.push(PathBuf::from("config.toml"));

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.auth.resolved_jwt_secret().is_none() {
            anyhow::bail!(
                "No session secret configured. Set VITRINE_JWT_SECRET or [auth] jwt_secret"
            );
        }

        if self.security.max_login_attempts == 0 {
            anyhow::bail!("max_login_attempts must be > 0");
        }

        if self.auth.token_ttl_days <= 0 {
            anyhow::bail!("token_ttl_days must be > 0");
        }

        if self.auth.offline_fallback
            && (self.auth.offline_email.is_none()
                || self.auth.offline_password.is_none()
                || self.auth.offline_token.is_none())
        {
            anyhow::bail!(
                "offline_fallback requires offline_email, offline_password and offline_token"
            );
        }

        if self.ai.enabled && self.ai.resolved_api_key().is_none() {
            anyhow::bail!("AI assistance enabled but no API key configured. Set GEMINI_API_KEY");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.server.port, 5001);
        assert_eq!(parsed.security.max_login_attempts, 5);
        assert_eq!(parsed.security.lockout_minutes, 30);
        assert_eq!(parsed.auth.token_ttl_days, 7);
        assert!(!parsed.auth.offline_fallback);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9000

            [security]
            max_login_attempts = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.security.max_login_attempts, 3);
        assert_eq!(config.security.lockout_minutes, 30);
        assert_eq!(config.general.max_db_connections, 5);
    }

    #[test]
    fn test_validate_rejects_offline_fallback_without_credentials() {
        let mut config = Config::default();
        config.auth.jwt_secret = Some("test-secret".to_string());
        config.auth.offline_fallback = true;

        assert!(config.validate().is_err());

        config.auth.offline_email = Some("ops@example.com".to_string());
        config.auth.offline_password = Some("recovery".to_string());
        config.auth.offline_token = Some("static-token".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_attempt_budget() {
        let mut config = Config::default();
        config.auth.jwt_secret = Some("test-secret".to_string());
        config.security.max_login_attempts = 0;

        assert!(config.validate().is_err());
    }
}
