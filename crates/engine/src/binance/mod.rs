pub mod query;
pub mod rest;
pub mod signing;

pub use rest::BinanceClient;
