pub mod config;
pub mod credential;
pub mod error;
pub mod order_service;
pub mod types;

pub use config::Config;
pub use credential::Credential;
pub use error::{Error, Result};
pub use order_service::{OrderService, NO_QUANTITY};
pub use types::*;
