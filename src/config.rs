// src/config.rs

use std::env;
use dotenvy::dotenv;
use thiserror::Error;

/// Number of questions served when the client does not ask for a specific count.
pub const DEFAULT_QUESTION_COUNT: i64 = 10;

/// Fixed exam duration reported alongside every sampled paper, in minutes.
pub const EXAM_DURATION_MINUTES: u32 = 30;

/// Maximum number of attempts returned by the history listing.
pub const HISTORY_LIMIT: i64 = 10;

/// Percentage at or above which an attempt counts as passed.
pub const PASSING_PERCENTAGE: i32 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is not valid: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. `None` runs the service on the in-process store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| ConfigError::Missing("JWT_SECRET"))?;

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw,
            })?,
            Err(_) => 3000,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            rust_log,
            port,
        })
    }
}
