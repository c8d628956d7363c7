//! # Error Module
//!
//! Error taxonomy for the backtesting engine. Each kind maps to one failure
//! mode described by the simulator's failure semantics: config and dataset
//! problems are fatal at load time, pricing/strategy/trial problems are
//! recoverable and degrade to a skipped entry, a sentinel mark, or a
//! sentinel trial result.
//!
//! ```text
//! error/
//! ├── config.rs     - ConfigError: malformed or inconsistent configuration
//! ├── data.rs       - DataError: malformed dataset / chain construction
//! ├── pricing.rs    - PricingError, GreeksError: numerically invalid inputs
//! ├── strategy.rs   - StrategyError: entry/exit evaluation failures
//! ├── optimizer.rs  - TrialError, CheckpointError: optimizer-scoped failures
//! └── decimal.rs    - DecimalError: Decimal <-> Positive conversion failures
//! ```

pub mod config;
pub mod data;
pub mod decimal;
pub mod optimizer;
pub mod pricing;
pub mod strategy;

pub use config::ConfigError;
pub use data::DataError;
pub use decimal::DecimalError;
pub use optimizer::{CheckpointError, TrialError};
pub use pricing::{GreeksError, PricingError};
pub use strategy::StrategyError;

use thiserror::Error;

/// Umbrella error returned by the few call sites (the public simulator
/// entry point, the CSV/YAML loaders) that need a single type rather than
/// a per-concern one.
#[derive(Error, Debug)]
pub enum BacktestError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Strategy(#[from] StrategyError),

    #[error(transparent)]
    Trial(#[from] TrialError),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
