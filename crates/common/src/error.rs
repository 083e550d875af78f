use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No step size is known for the symbol. Orders for it must not be sent
    /// with a guessed increment.
    #[error("Unsupported symbol: {0}")]
    UnsupportedSymbol(String),

    /// Caller-supplied order parameters that cannot be sent as given.
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// Transport-level failure (DNS, connect, TLS, reading the body).
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
