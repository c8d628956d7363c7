use thiserror::Error;

/// Numerically invalid pricing inputs (`S<=0`, `sigma<=0`, `T<0`). The
/// caller (a strategy's entry/exit evaluation) treats this as "no valid
/// strike/quote" and skips the day rather than propagating a hard error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    #[error("invalid spot price: {0} (must be > 0)")]
    InvalidSpot(f64),

    #[error("invalid strike price: {0} (must be > 0)")]
    InvalidStrike(f64),

    #[error("invalid volatility: {0} (must be >= 0)")]
    InvalidVolatility(f64),

    #[error("invalid time to expiration: {0} years (must be >= 0)")]
    InvalidTime(f64),

    #[error(transparent)]
    Greeks(#[from] GreeksError),

    #[error("no strike within tolerance {tolerance} of target delta {target_delta}")]
    NoSuitableStrike { target_delta: f64, tolerance: f64 },
}

/// Errors raised while computing analytic Greeks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GreeksError {
    #[error("numerical underflow computing {greek}: {reason}")]
    Underflow { greek: String, reason: String },

    #[error("invalid input computing {greek}: {reason}")]
    InvalidInput { greek: String, reason: String },
}
