//! # Pricing Module
//!
//! The Black-Scholes-Merton kernel (§4.1): analytic price and Greeks for
//! European options on a dividend-paying underlying, plus the
//! target-delta strike solver the strategy kit uses to pick short/long
//! legs.

pub mod bsm;
pub mod solver;

pub use bsm::{BsmInputs, Greeks, price_and_greeks};
pub use solver::{DeltaCandidate, find_target_delta_strike};
