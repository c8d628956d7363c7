use thiserror::Error;

/// Malformed or internally inconsistent configuration. Surfaced at load
/// time and fatal: the caller must fix the config before a backtest runs.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required key '{key}' for strategy '{strategy}'")]
    MissingKey { strategy: String, key: String },

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("'{lower}' ({lower_value}) must be <= '{upper}' ({upper_value})")]
    RangeOrder {
        lower: String,
        lower_value: String,
        upper: String,
        upper_value: String,
    },

    #[error("calendar stop_loss must be negative (a fraction of the debit lost), got {0}")]
    PositiveCalendarStopLoss(rust_decimal::Decimal),

    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),

    #[error("optimizer parameter name '{0}' is not in the routing table")]
    UnknownParameter(String),

    #[error("failed to parse configuration: {0}")]
    ParseError(String),
}
