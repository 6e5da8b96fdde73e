// src/config.rs

use std::env;
use dotenvy::dotenv;

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. `None` runs on the in-memory store.
    pub database_url: Option<String>,
    /// Shared secret with the identity service that issues bearer tokens.
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET must be set".to_string())?;

        let jwt_expiration = match env::var("JWT_EXPIRATION") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| format!("JWT_EXPIRATION must be a number of seconds, got '{}'", raw))?,
            Err(_) => 3600,
        };

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| format!("PORT must be a valid port, got '{}'", raw))?,
            Err(_) => 3000,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            port,
        })
    }
}
