/// Configuration management for Board Service
///
/// Settings come from environment variables. In debug builds a `.env` file
/// is loaded first.
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::composer::DEFAULT_IMAGE_WARN_BYTES;
use crate::i18n::Locale;
use crate::store::{AccessRules, DEFAULT_MAX_DOCUMENT_BYTES};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub store: StoreConfig,
    pub composer: ComposerConfig,
    pub federated: FederatedConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
    pub locale: Locale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

/// Document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Required when `backend` is postgres
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub max_document_bytes: usize,
    /// `recommended` or `locked`
    pub rules: String,
}

impl StoreConfig {
    pub fn access_rules(&self) -> Result<AccessRules> {
        self.rules
            .parse::<AccessRules>()
            .map_err(anyhow::Error::msg)
            .context("invalid STORE_RULES")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposerConfig {
    /// Image size above which the composer warns
    pub image_warn_bytes: usize,
}

/// Federated sign-in settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FederatedConfig {
    pub provider_name: String,
    /// Email the static authority answers with; unset disables federated sign-in
    pub static_email: Option<String>,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| anyhow::anyhow!("{}", e))
            .with_context(|| format!("invalid {}: {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        #[cfg(debug_assertions)]
        {
            let _ = dotenvy::dotenv();
        }

        let env = env_or("APP_ENV", "development");
        let backend = env_parse("STORE_BACKEND", StoreBackend::Memory)?;

        if env.eq_ignore_ascii_case("production") && backend != StoreBackend::Postgres {
            bail!("STORE_BACKEND must be postgres in production");
        }

        let database_url = std::env::var("DATABASE_URL").ok();
        if backend == StoreBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORE_BACKEND=postgres");
        }

        let config = Config {
            app: AppConfig {
                env,
                host: env_or("BOARD_HOST", "0.0.0.0"),
                port: env_parse("BOARD_PORT", 8080)?,
                locale: env_parse("BOARD_LOCALE", Locale::En)?,
            },
            store: StoreConfig {
                backend,
                database_url,
                max_connections: env_parse("DATABASE_MAX_CONNECTIONS", 10)?,
                max_document_bytes: env_parse(
                    "STORE_MAX_DOCUMENT_BYTES",
                    DEFAULT_MAX_DOCUMENT_BYTES,
                )?,
                rules: env_or("STORE_RULES", "recommended"),
            },
            composer: ComposerConfig {
                image_warn_bytes: env_parse("COMPOSER_IMAGE_WARN_BYTES", DEFAULT_IMAGE_WARN_BYTES)?,
            },
            federated: FederatedConfig {
                provider_name: env_or("FEDERATED_PROVIDER_NAME", "google"),
                static_email: std::env::var("FEDERATED_STATIC_EMAIL").ok(),
            },
        };

        config.store.access_rules()?;
        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.app.env.eq_ignore_ascii_case("production")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: &[&str] = &[
        "APP_ENV",
        "BOARD_HOST",
        "BOARD_PORT",
        "BOARD_LOCALE",
        "STORE_BACKEND",
        "DATABASE_URL",
        "DATABASE_MAX_CONNECTIONS",
        "STORE_MAX_DOCUMENT_BYTES",
        "STORE_RULES",
        "COMPOSER_IMAGE_WARN_BYTES",
        "FEDERATED_PROVIDER_NAME",
        "FEDERATED_STATIC_EMAIL",
    ];

    fn clear_env() {
        for key in KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.app.port, 8080);
        assert_eq!(config.app.locale, Locale::En);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.max_document_bytes, 1_048_576);
        assert_eq!(config.composer.image_warn_bytes, 500_000);
        assert_eq!(config.store.access_rules().unwrap(), AccessRules::recommended());
        assert!(config.federated.static_email.is_none());
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        std::env::set_var("BOARD_PORT", "9000");
        std::env::set_var("BOARD_LOCALE", "ko");
        std::env::set_var("STORE_RULES", "locked");
        std::env::set_var("COMPOSER_IMAGE_WARN_BYTES", "1000");
        let config = Config::from_env().unwrap();
        clear_env();

        assert_eq!(config.app.port, 9000);
        assert_eq!(config.app.locale, Locale::Ko);
        assert_eq!(config.store.access_rules().unwrap(), AccessRules::locked());
        assert_eq!(config.composer.image_warn_bytes, 1000);
    }

    #[test]
    #[serial]
    fn test_production_requires_postgres() {
        clear_env();
        std::env::set_var("APP_ENV", "production");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("postgres"));

        std::env::set_var("STORE_BACKEND", "postgres");
        assert!(Config::from_env().is_err());

        std::env::set_var("DATABASE_URL", "postgres://localhost/board");
        let config = Config::from_env().unwrap();
        clear_env();
        assert!(config.is_production());
    }

    #[test]
    #[serial]
    fn test_invalid_values_are_reported() {
        clear_env();
        std::env::set_var("BOARD_PORT", "not-a-port");
        let err = Config::from_env().unwrap_err();
        clear_env();
        assert!(format!("{:#}", err).contains("BOARD_PORT"));

        std::env::set_var("STORE_RULES", "wide-open");
        assert!(Config::from_env().is_err());
        clear_env();
    }
}
