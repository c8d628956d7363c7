//! Numeric constants shared across the pricing kernel, chain generator, and simulator.

/// Trading days used to annualize daily return series (Sharpe, Sortino, realized vol).
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Window, in trading days, over which the IV percentile is computed.
pub const IV_PERCENTILE_WINDOW: usize = 252;

/// Contract multiplier for standard SPY/SPX equity options.
pub const CONTRACT_MULTIPLIER: i64 = 100;

/// Floor below which volatility, rates, or time-to-expiry are treated as degenerate.
pub const TOLERANCE: f64 = 1e-8;

pub(crate) const ZERO: f64 = 0.0;
