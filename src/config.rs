use std::env;
use std::time::Duration;

use crate::error::AppError;
use crate::workflow::DEFAULT_DIRECTORY_TIMEOUT;

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub server_port: u16,
    pub server_host: String,
    /// When unset, identities are kept in memory.
    pub database_url: Option<String>,
    pub bcrypt_cost: u32,
    /// Deadline for each identity directory call.
    pub directory_timeout: Duration,
}

impl Config {
    /// Reads configuration from the environment.
    ///
    /// Fails with `AppError::Configuration` when `JWT_SECRET` is missing or empty,
    /// or when a numeric variable does not parse. The caller decides whether that is fatal.
    pub fn from_env() -> Result<Self, AppError> {
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| AppError::Configuration("JWT_SECRET must be set".into()))?;

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| AppError::Configuration("SERVER_PORT must be a number".into()))?;

        let bcrypt_cost = match env::var("BCRYPT_COST") {
            Ok(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|cost| (4..=31).contains(cost))
                .ok_or_else(|| {
                    AppError::Configuration("BCRYPT_COST must be between 4 and 31".into())
                })?,
            Err(_) => bcrypt::DEFAULT_COST,
        };

        let directory_timeout = match env::var("DIRECTORY_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    AppError::Configuration(
                        "DIRECTORY_TIMEOUT_SECS must be a positive number".into(),
                    )
                })?,
            Err(_) => DEFAULT_DIRECTORY_TIMEOUT,
        };

        Ok(Self {
            jwt_secret,
            server_port,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            bcrypt_cost,
            directory_timeout,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
