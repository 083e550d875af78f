use std::fmt;

use crate::{Error, Result};

/// Exchange API credentials.
///
/// Built once at startup and shared read-only for the life of the process.
/// `Debug` never prints either value.
#[derive(Clone)]
pub struct Credential {
    api_key: String,
    secret_key: String,
}

impl Credential {
    /// Both values must be non-empty.
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        let secret_key = secret_key.into();

        if api_key.trim().is_empty() {
            return Err(Error::Config("API key must not be empty".into()));
        }
        if secret_key.trim().is_empty() {
            return Err(Error::Config("secret key must not be empty".into()));
        }

        Ok(Self {
            api_key,
            secret_key,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("api_key", &"***REDACTED***")
            .field("secret_key", &"***REDACTED***")
            .finish()
    }
}
