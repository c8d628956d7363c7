use std::error::Error;
use std::fmt;

/// Errors that occur while converting between `f64`, `Decimal`, and `Positive`.
#[derive(Debug)]
pub enum DecimalError {
    /// Error when attempting to create a decimal from an invalid value.
    InvalidValue { value: f64, reason: String },
    /// Error when a decimal value exceeds its bounds.
    OutOfBounds { value: f64, min: f64, max: f64 },
}

impl fmt::Display for DecimalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecimalError::InvalidValue { value, reason } => {
                write!(f, "invalid decimal value {value}: {reason}")
            }
            DecimalError::OutOfBounds { value, min, max } => {
                write!(f, "decimal value {value} is out of bounds (min: {min}, max: {max})")
            }
        }
    }
}

impl Error for DecimalError {}

pub type DecimalResult<T> = Result<T, DecimalError>;

impl DecimalError {
    pub fn invalid_value(value: f64, reason: &str) -> Self {
        DecimalError::InvalidValue { value, reason: reason.to_string() }
    }

    pub fn out_of_bounds(value: f64, min: f64, max: f64) -> Self {
        DecimalError::OutOfBounds { value, min, max }
    }
}
