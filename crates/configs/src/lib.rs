//! # configs
//!
//! Layered settings: built-in defaults, an optional `config/default.*`
//! file, then `CRITICA_*` environment variables (`__` nests sections, e.g.
//! `CRITICA_SERVER__PORT=9000`). A `.env` file is honored when present.

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// HMAC secret for bearer tokens. The default is for local use only.
    pub jwt_secret: SecretString,
    pub token_ttl_hours: i64,
    pub code_length: usize,
}

/// Inclusive review score bounds. The stock deployment scores 1..=10.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewSettings {
    pub score_min: i32,
    pub score_max: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub page_size: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub reviews: ReviewSettings,
    pub api: ApiSettings,
}

impl Settings {
    pub fn load() -> Result<Settings, SettingsError> {
        if dotenvy::dotenv().is_ok() {
            tracing::debug!(".env loaded");
        }
        let settings = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "sqlite:critica.db")?
            .set_default("database.max_connections", 8)?
            .set_default("auth.jwt_secret", "dev-only-secret-change-me")?
            .set_default("auth.token_ttl_hours", 24)?
            .set_default("auth.code_length", 24)?
            .set_default("reviews.score_min", 1)?
            .set_default("reviews.score_max", 10)?
            .set_default("api.page_size", 10)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(Environment::with_prefix("CRITICA").separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_section() {
        let settings = Settings::load().expect("defaults alone must be loadable");
        assert_eq!(settings.reviews.score_min, 1);
        assert_eq!(settings.reviews.score_max, 10);
        assert_eq!(settings.api.page_size, 10);
        assert!(settings.auth.token_ttl_hours > 0);
    }
}
