use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use common::{Error, Result};

/// Minimum quantity increment (`LOT_SIZE` step) per supported symbol.
pub const STEP_SIZES: &[(&str, Decimal)] = &[
    ("XRPUSDT", dec!(1)),
    ("BTCUSDT", dec!(0.00001)),
    ("ETHUSDT", dec!(0.0001)),
    ("CKBUSDT", dec!(0.00001)),
    ("LTCUSDT", dec!(0.1)),
    ("ADAUSDT", dec!(0.001)),
    ("AXSUSDT", dec!(0.01)),
    ("SHIBUSDT", dec!(100000)),
    ("BNBUSDT", dec!(0.1)),
    ("MATICUSDT", dec!(0.001)),
    ("DOGEUSDT", dec!(1)),
    ("SOLUSDT", dec!(0.01)),
    ("STXUSDT", dec!(0.1)),
];

/// Step size for `symbol`. Unknown symbols are an error, never a default.
pub fn step_size_of(symbol: &str) -> Result<Decimal> {
    STEP_SIZES
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, step)| *step)
        .ok_or_else(|| Error::UnsupportedSymbol(symbol.to_string()))
}

/// Truncate `quantity` down to a whole multiple of `step`.
///
/// Never rounds up: selling more than the free balance is rejected.
pub fn normalize_quantity(quantity: Decimal, step: Decimal) -> Decimal {
    quantity - quantity % step
}
