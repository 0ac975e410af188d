use std::{env, fmt::Display, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {key} value: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub jwt_secret: String,
    /// Posts per feed page (`QUANTITY_POSTS`)
    pub quantity_posts: usize,
    pub index_cache_ttl: Duration,
    pub request_timeout: Duration,
    pub login_attempts_per_minute: u32,
    pub bcrypt_cost: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            jwt_secret: String::new(),
            quantity_posts: 10,
            index_cache_ttl: Duration::from_secs(20),
            request_timeout: Duration::from_secs(30),
            login_attempts_per_minute: 10,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let quantity_posts: usize = try_load("QUANTITY_POSTS", defaults.quantity_posts)?;
        if quantity_posts == 0 {
            return Err(ConfigError::Invalid {
                key: "QUANTITY_POSTS",
                reason: "must be at least 1".into(),
            });
        }

        Ok(Self {
            bind_addr: try_load("BIND_ADDR", defaults.bind_addr)?,
            jwt_secret,
            quantity_posts,
            index_cache_ttl: Duration::from_secs(try_load(
                "INDEX_CACHE_TTL_SECS",
                defaults.index_cache_ttl.as_secs(),
            )?),
            request_timeout: Duration::from_secs(try_load(
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
            login_attempts_per_minute: try_load(
                "LOGIN_ATTEMPTS_PER_MINUTE",
                defaults.login_attempts_per_minute,
            )?,
            bcrypt_cost: try_load("BCRYPT_COST", defaults.bcrypt_cost)?,
        })
    }
}

fn try_load<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
