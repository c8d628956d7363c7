//! # Chains Module
//!
//! The synthetic options chain generator (§4.2): given a dated
//! underlying-price/VIX series, produces one `OptionChain` per trading
//! day via the BSM kernel in `pricing::bsm`.
//!
//! * `chain` — `OptionChain`, the per-day `(expiration, strike, type)`
//!   index the simulator and strategy kit read quotes through.
//! * `generator` — builds the strike grid and expiration calendar, prices
//!   every quote, and annotates the rolling IV-percentile statistic.

pub mod chain;
pub mod generator;

pub use chain::OptionChain;
pub use generator::{annotate_iv_percentile, friday_expirations, generate_chain, validate_bars};
