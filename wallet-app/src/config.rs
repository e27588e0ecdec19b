//! Configuration loading from environment.

use std::env;

use wallet_rates::NBP_API_URL;

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub redis_url: String,
    pub nbp_api_url: String,
    pub support_email: String,
    pub token_ttl_minutes: i64,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let redis_url = env::var("REDIS_URL")
            .map_err(|_| anyhow::anyhow!("REDIS_URL environment variable is required"))?;

        let nbp_api_url = env::var("NBP_API_URL").unwrap_or_else(|_| NBP_API_URL.to_string());

        let support_email =
            env::var("SUPPORT_EMAIL").unwrap_or_else(|_| "support@plnwallet.example".to_string());

        let token_ttl_minutes = env::var("TOKEN_TTL_MINUTES")
            .unwrap_or_else(|_| "30".to_string())
            .parse()?;

        Ok(Self {
            port,
            database_url,
            redis_url,
            nbp_api_url,
            support_email,
            token_ttl_minutes,
        })
    }
}
