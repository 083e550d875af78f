pub mod binance;
pub mod orders;
pub mod step_size;

pub use binance::BinanceClient;
pub use orders::SpotOrderService;
pub use step_size::{normalize_quantity, step_size_of};
