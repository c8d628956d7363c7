use thiserror::Error;

/// Raised while evaluating a strategy's entry or exit rules for a single
/// day. The simulator catches this, logs the offending position/parameter
/// context, and treats the day as "no signal" rather than aborting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    #[error("required leg not found in today's chain: strike={strike}, expiration={expiration}, type={option_type:?}")]
    LegNotFound {
        strike: String,
        expiration: String,
        option_type: crate::model::types::OptionType,
    },

    #[error("no candidate strikes satisfied the requested delta targets")]
    NoViableStrikes,

    #[error("entry net price {price} outside configured bounds [{min}, {max}]")]
    PriceOutOfBounds { price: String, min: String, max: String },

    #[error("calendar leg expirations are inconsistent: near={near} far={far}")]
    InvalidCalendarExpirations { near: String, far: String },

    #[error("sizing produced zero contracts: {reason}")]
    ZeroContracts { reason: String },

    #[error("insufficient cash/risk budget to open position: needed {needed}, available {available}")]
    InsufficientBudget { needed: String, available: String },

    #[error("{strategy} evaluation panicked with parameters {params}: {reason}")]
    EvaluationFailed {
        strategy: String,
        params: String,
        reason: String,
    },
}
