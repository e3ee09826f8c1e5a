// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses environment variables into a typed ServerConfig with a zeroized session secret
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment-based configuration management for production deployment

use crate::constants::{env_config, limits, session};
use anyhow::{Context, Result};
use panel_core::errors::AppError;
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};
use zeroize::Zeroizing;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational
    #[default]
    Info,
    /// Debug output
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment, enables `Secure` cookies and HSTS
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// HMAC key for session cookies, wiped from memory on drop
#[derive(Clone)]
pub struct SessionSecret(Zeroizing<Vec<u8>>);

impl SessionSecret {
    /// Wrap raw key bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the key is shorter than 32 bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let bytes = Zeroizing::new(bytes);
        if bytes.len() < session::MIN_SECRET_BYTES {
            anyhow::bail!(
                "SESSION_SECRET must be at least {} bytes, got {}",
                session::MIN_SECRET_BYTES,
                bytes.len()
            );
        }
        Ok(Self(bytes))
    }

    /// Decode a hex encoded key
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not hex or too short
    pub fn from_hex(value: &str) -> Result<Self> {
        let bytes = hex::decode(value.trim()).context("SESSION_SECRET must be hex encoded")?;
        Self::from_bytes(bytes)
    }

    /// Generate a random key from the system CSPRNG
    ///
    /// # Errors
    ///
    /// Returns an error if the system RNG fails
    pub fn generate() -> Result<Self> {
        use ring::rand::{SecureRandom, SystemRandom};

        let rng = SystemRandom::new();
        let mut secret = Zeroizing::new(vec![0u8; session::MIN_SECRET_BYTES]);
        rng.fill(&mut secret).map_err(|e| {
            tracing::error!("CRITICAL: Failed to generate session secret: {}", e);
            anyhow::anyhow!("System RNG failure - cannot generate session secret")
        })?;
        Ok(Self(secret))
    }

    /// Key bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionSecret([REDACTED; {} bytes])", self.0.len())
    }
}

/// Server configuration loaded at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP API port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Log level
    pub log_level: LogLevel,
    /// Session settings
    pub session: SessionConfig,
    /// Credential store settings
    pub credentials: CredentialsConfig,
    /// Frontend settings
    pub static_files: StaticFilesConfig,
    /// Security settings
    pub security: SecurityConfig,
}

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Cookie signing key
    pub secret: SessionSecret,
    /// Session lifetime in seconds
    pub ttl_secs: u64,
    /// Whether the secret was generated because none was configured
    pub secret_is_ephemeral: bool,
}

/// Credential store configuration
#[derive(Debug, Clone)]
pub struct CredentialsConfig {
    /// Path of the users JSON file
    pub users_file: PathBuf,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

/// Static frontend configuration
#[derive(Debug, Clone)]
pub struct StaticFilesConfig {
    /// Directory served under `/static`
    pub directory: PathBuf,
}

/// Security configuration
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Allowed CORS origins, empty for same-origin only
    pub cors_origins: Vec<String>,
    /// Per-request timeout
    pub request_timeout_secs: u64,
    /// Largest accepted request body
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed, if no session secret is
    /// configured in production, or if validation fails
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        let environment = Environment::from_str_or_default(&env_config::environment());

        let (secret, secret_is_ephemeral) = match env_config::session_secret() {
            Some(value) => (SessionSecret::from_hex(&value)?, false),
            None if environment.is_production() => {
                return Err(
                    AppError::config_missing("SESSION_SECRET is required in production").into(),
                );
            }
            None => {
                warn!("SESSION_SECRET not set, generating a random secret; sessions will not survive a restart");
                (SessionSecret::generate()?, true)
            }
        };

        let config = Self {
            host: env_config::host(),
            http_port: env_config::http_port()
                .parse()
                .context("Invalid HTTP_PORT value")?,
            environment,
            log_level: LogLevel::from_str_or_default(&env_config::log_level()),
            session: SessionConfig {
                secret,
                ttl_secs: env_config::session_ttl_secs()
                    .parse()
                    .context("Invalid SESSION_TTL_SECS value")?,
                secret_is_ephemeral,
            },
            credentials: CredentialsConfig {
                users_file: PathBuf::from(env_config::users_file()),
                bcrypt_cost: env_config::bcrypt_cost()
                    .parse()
                    .context("Invalid BCRYPT_COST value")?,
            },
            static_files: StaticFilesConfig {
                directory: PathBuf::from(env_config::static_dir()),
            },
            security: SecurityConfig {
                cors_origins: parse_origins(&env_config::cors_allowed_origins()),
                request_timeout_secs: env_config::request_timeout_secs()
                    .parse()
                    .context("Invalid REQUEST_TIMEOUT_SECS value")?,
                max_body_bytes: limits::MAX_REQUEST_BODY_BYTES,
            },
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a value is outside its accepted range
    pub fn validate(&self) -> Result<()> {
        if self.session.ttl_secs == 0 {
            return Err(anyhow::anyhow!("SESSION_TTL_SECS must be greater than zero"));
        }

        if self.session.ttl_secs > limits::MAX_SESSION_TTL_SECS {
            return Err(anyhow::anyhow!(
                "SESSION_TTL_SECS must be at most {}",
                limits::MAX_SESSION_TTL_SECS
            ));
        }

        if !(limits::MIN_BCRYPT_COST..=limits::MAX_BCRYPT_COST)
            .contains(&self.credentials.bcrypt_cost)
        {
            return Err(anyhow::anyhow!(
                "BCRYPT_COST must be between {} and {}",
                limits::MIN_BCRYPT_COST,
                limits::MAX_BCRYPT_COST
            ));
        }

        if self.security.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "REQUEST_TIMEOUT_SECS must be greater than zero"
            ));
        }

        if self.environment.is_production() && self.session.secret_is_ephemeral {
            return Err(
                AppError::config_missing("SESSION_SECRET is required in production").into(),
            );
        }

        if self.environment.is_production() && self.security.cors_origins.iter().any(|o| o == "*")
        {
            warn!("CORS allows any origin in production");
        }

        Ok(())
    }

    /// Whether cookies get the `Secure` attribute
    #[must_use]
    pub const fn secure_cookies(&self) -> bool {
        self.environment.is_production()
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Panel Server Configuration:\n\
             - Bind: {}:{}\n\
             - Environment: {}\n\
             - Log Level: {}\n\
             - Users File: {}\n\
             - Static Dir: {}\n\
             - Session TTL: {}s\n\
             - Session Secret: {}\n\
             - Secure Cookies: {}\n\
             - CORS: {}",
            self.host,
            self.http_port,
            self.environment,
            self.log_level,
            self.credentials.users_file.display(),
            self.static_files.directory.display(),
            self.session.ttl_secs,
            if self.session.secret_is_ephemeral {
                "Ephemeral"
            } else {
                "Configured"
            },
            self.secure_cookies(),
            if self.security.cors_origins.is_empty() {
                "same-origin".to_owned()
            } else {
                self.security.cors_origins.join(", ")
            }
        )
    }
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const ENV_KEYS: &[&str] = &[
        "ENV",
        "ENVIRONMENT",
        "SESSION_SECRET",
        "SESSION_TTL_SECS",
        "HTTP_PORT",
        "BCRYPT_COST",
        "CORS_ALLOWED_ORIGINS",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            env::remove_var(key);
        }
    }

    fn test_config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".into(),
            http_port: 8000,
            environment: Environment::Testing,
            log_level: LogLevel::Info,
            session: SessionConfig {
                secret: SessionSecret::from_bytes(vec![7u8; 32]).unwrap(),
                ttl_secs: 60,
                secret_is_ephemeral: false,
            },
            credentials: CredentialsConfig {
                users_file: PathBuf::from("usuarios.json"),
                bcrypt_cost: 4,
            },
            static_files: StaticFilesConfig {
                directory: PathBuf::from("static"),
            },
            security: SecurityConfig {
                cors_origins: vec![],
                request_timeout_secs: 30,
                max_body_bytes: 1024,
            },
        }
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert_eq!(
            parse_origins("http://a.test, http://b.test,"),
            vec!["http://a.test", "http://b.test"]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str_or_default("prod"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default("TEST"),
            Environment::Testing
        );
        assert_eq!(
            Environment::from_str_or_default("staging"),
            Environment::Development
        );
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str_or_default("DEBUG"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str_or_default("nonsense"), LogLevel::Info);
    }

    #[test]
    fn test_session_secret_validation() {
        assert!(SessionSecret::from_hex("zz").is_err());
        assert!(SessionSecret::from_hex("abcd").is_err());
        let secret = SessionSecret::from_hex(&"ab".repeat(32)).unwrap();
        assert_eq!(secret.as_bytes().len(), 32);
        assert!(!format!("{secret:?}").contains("ab"));
    }

    #[test]
    fn test_generated_secrets_differ() {
        let a = SessionSecret::generate().unwrap();
        let b = SessionSecret::generate().unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_config_validation() {
        let mut config = test_config();
        assert!(config.validate().is_ok());

        config.session.ttl_secs = 0;
        assert!(config.validate().is_err());

        config.session.ttl_secs = 60;
        config.credentials.bcrypt_cost = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_session_ttl_upper_bound() {
        let mut config = test_config();

        config.session.ttl_secs = limits::MAX_SESSION_TTL_SECS;
        assert!(config.validate().is_ok());

        config.session.ttl_secs = limits::MAX_SESSION_TTL_SECS + 1;
        assert!(config.validate().is_err());

        config.session.ttl_secs = 10_000_000_000_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_production_rejects_ephemeral_secret() {
        let mut config = test_config();
        config.environment = Environment::Production;
        config.session.secret_is_ephemeral = true;

        let error = config.validate().unwrap_err();
        let app_error = error.downcast_ref::<AppError>().unwrap();
        assert_eq!(app_error.code, panel_core::errors::ErrorCode::ConfigMissing);
    }

    #[test]
    fn test_summary_has_no_secret() {
        let summary = test_config().summary();
        assert!(summary.contains("127.0.0.1:8000"));
        assert!(!summary.contains("0707"));
    }

    #[test]
    #[serial]
    fn test_from_env_production_requires_secret() {
        clear_env();
        env::set_var("ENV", "production");

        let error = ServerConfig::from_env().unwrap_err();
        let app_error = error.downcast_ref::<AppError>().unwrap();
        assert_eq!(app_error.code, panel_core::errors::ErrorCode::ConfigMissing);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_development_generates_secret() {
        clear_env();
        env::set_var("SESSION_TTL_SECS", "120");

        let config = ServerConfig::from_env().unwrap();
        assert!(config.session.secret_is_ephemeral);
        assert_eq!(config.session.ttl_secs, 120);
        assert!(!config.secure_cookies());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_production_with_secret() {
        clear_env();
        env::set_var("ENVIRONMENT", "production");
        env::set_var("SESSION_SECRET", "cd".repeat(32));

        let config = ServerConfig::from_env().unwrap();
        assert!(config.secure_cookies());
        assert!(!config.session.secret_is_ephemeral);

        clear_env();
    }
}
