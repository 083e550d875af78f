use crate::{Credential, Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";
pub const DEFAULT_WEBHOOK_PORT: u16 = 8080;

/// All configuration loaded from environment variables at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // Exchange
    pub credential: Credential,
    pub binance_base_url: String,

    // Webhook server
    pub webhook_port: u16,
    /// Shared secret expected as `?token=` on webhook calls. `None` disables the check.
    pub webhook_token: Option<String>,
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore error if .env not present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| {
                Error::Config(format!(
                    "Required environment variable '{key}' is not set. Check your .env file."
                ))
            })
        };

        let credential = Credential::new(required("BINANCE_API_KEY")?, required("BINANCE_SECRET")?)?;

        let webhook_port = match lookup("WEBHOOK_PORT") {
            Some(v) => v.trim().parse::<u16>().map_err(|_| {
                Error::Config(format!("WEBHOOK_PORT must be a port number, got: '{v}'"))
            })?,
            None => DEFAULT_WEBHOOK_PORT,
        };

        let binance_base_url = lookup("BINANCE_BASE_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let webhook_token = lookup("WEBHOOK_TOKEN").filter(|t| !t.trim().is_empty());

        Ok(Config {
            credential,
            binance_base_url,
            webhook_port,
            webhook_token,
        })
    }
}
