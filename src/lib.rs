#![allow(unknown_lints)]
#![allow(clippy::literal_string_with_formatting_args)]

//! # spy-backtest-engine
//!
//! A deterministic, single-threaded day-by-day backtesting engine for
//! SPY/SPX options strategies, driven off a synthetic options chain
//! generated from an underlying bar series and the VIX.
//!
//! ```text
//! config      - the `serde`-deserializable run configuration (§6)
//! constants   - crate-wide numeric constants (trading days/year, etc.)
//! holiday     - the injectable HolidayCalendar trait + US federal calendar
//! model       - bars, quotes, legs, positions, trades, equity points (§3)
//! pricing     - the Black-Scholes-Merton kernel + target-delta solver (§4.1)
//! chains      - synthetic options chain generation (§4.2)
//! strategies  - the Strategy trait + seven concrete strategies (§4.3)
//! simulator   - the day-by-day event loop (§4.4)
//! optimizer   - grid/TPE parameter search over a strategy's config (§4.5)
//! analyzer    - performance metrics, monthly returns, portfolio Greeks (§4.6)
//! error       - the crate's error taxonomy, one kind per failure domain
//! utils       - logging setup and the TimeFrame annualization helper
//! ```
//!
//! Everything here works off `rust_decimal::Decimal` rather than
//! floating point for anything that ends up in a trade, a quote, or a
//! config value; floats only appear inside the pricing kernel's solver
//! and the optimizer's sampler, where the wider math library support
//! matters more than exactness.

pub mod analyzer;
pub mod chains;
pub mod config;
pub mod constants;
pub mod error;
pub mod holiday;
pub mod model;
pub mod optimizer;
pub mod pricing;
pub mod prelude;
pub mod simulator;
pub mod strategies;
pub mod utils;

pub use config::BacktestRunConfig;
pub use error::BacktestError;
pub use holiday::{HolidayCalendar, UsFederalHolidayCalendar};
pub use model::types::WarmupPolicy;
pub use simulator::{Dataset, Simulator, SimulatorOutput};
