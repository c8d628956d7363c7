//! Black-Scholes-Merton price and analytic Greeks for European options on
//! a dividend-paying underlying (§4.1).
//!
//! Kept in `f64` internally — the same choice the teacher's `greeks`
//! module makes — and converted to `Decimal`/`Positive` at the model
//! boundary (`chains::generator`), since transcendental functions
//! (`exp`, `ln`, `sqrt`, the normal CDF) are not available on `Decimal`.

use crate::constants::TOLERANCE;
use crate::error::pricing::PricingError;
use crate::model::types::OptionType;
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

/// Inputs to the pricing kernel. All fields are the raw `f64` the BSM
/// formula needs; the caller is responsible for having derived `t` (years
/// to expiration) from a DTE count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BsmInputs {
    pub spot: f64,
    pub strike: f64,
    pub time_to_expiry: f64,
    pub risk_free_rate: f64,
    pub dividend_yield: f64,
    pub volatility: f64,
    pub option_type: OptionType,
}

/// Price plus the five Greeks named in §4.1: delta, gamma, theta (per
/// calendar day), vega (per 1% IV), rho.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Greeks {
    pub price: f64,
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
}

fn standard_normal() -> Normal {
    Normal::new(0.0, 1.0).expect("standard normal parameters are always valid")
}

/// Standard normal CDF, `N(x)`.
fn big_n(x: f64) -> f64 {
    standard_normal().cdf(x)
}

/// Standard normal PDF, `N'(x)`.
fn n_prime(x: f64) -> f64 {
    standard_normal().pdf(x)
}

fn d1(spot: f64, strike: f64, r: f64, q: f64, t: f64, sigma: f64) -> f64 {
    ((spot / strike).ln() + (r - q + sigma * sigma / 2.0) * t) / (sigma * t.sqrt())
}

fn d2(d1: f64, sigma: f64, t: f64) -> f64 {
    d1 - sigma * t.sqrt()
}

fn validate(inputs: &BsmInputs) -> Result<(), PricingError> {
    if !(inputs.spot > 0.0) {
        return Err(PricingError::InvalidSpot(inputs.spot));
    }
    if !(inputs.strike > 0.0) {
        return Err(PricingError::InvalidStrike(inputs.strike));
    }
    if inputs.volatility < 0.0 {
        return Err(PricingError::InvalidVolatility(inputs.volatility));
    }
    if inputs.time_to_expiry < 0.0 {
        return Err(PricingError::InvalidTime(inputs.time_to_expiry));
    }
    Ok(())
}

/// Intrinsic value at `T=0` (§4.1 "T=0 collapses to intrinsic value").
fn intrinsic(spot: f64, strike: f64, option_type: OptionType) -> f64 {
    match option_type {
        OptionType::Call => (spot - strike).max(0.0),
        OptionType::Put => (strike - spot).max(0.0),
    }
}

/// Discounted intrinsic value when volatility collapses to zero
/// (§4.1 "sigma=0 collapses to discounted intrinsic").
fn discounted_intrinsic(inputs: &BsmInputs) -> f64 {
    let forward = inputs.spot * (-inputs.dividend_yield * inputs.time_to_expiry).exp();
    let discounted_strike =
        inputs.strike * (-inputs.risk_free_rate * inputs.time_to_expiry).exp();
    match inputs.option_type {
        OptionType::Call => (forward - discounted_strike).max(0.0),
        OptionType::Put => (discounted_strike - forward).max(0.0),
    }
}

/// Computes price and all five Greeks in one pass (they share `d1`/`d2`).
///
/// Degenerate inputs are handled per §4.1's failure modes rather than
/// propagated as NaN: `t <= TOLERANCE` collapses to intrinsic value with
/// zero gamma/theta/vega/rho and a delta of 0/1 (call) or -1/0 (put);
/// `sigma <= TOLERANCE` collapses to the discounted intrinsic value.
pub fn price_and_greeks(inputs: BsmInputs) -> Result<Greeks, PricingError> {
    validate(&inputs)?;

    if inputs.time_to_expiry <= TOLERANCE {
        let price = intrinsic(inputs.spot, inputs.strike, inputs.option_type);
        let delta = match inputs.option_type {
            OptionType::Call => {
                if inputs.spot > inputs.strike {
                    1.0
                } else {
                    0.0
                }
            }
            OptionType::Put => {
                if inputs.spot < inputs.strike {
                    -1.0
                } else {
                    0.0
                }
            }
        };
        return Ok(Greeks { price, delta, gamma: 0.0, theta: 0.0, vega: 0.0, rho: 0.0 });
    }

    if inputs.volatility <= TOLERANCE {
        let price = discounted_intrinsic(&inputs);
        let delta = match inputs.option_type {
            OptionType::Call => {
                if inputs.spot > inputs.strike {
                    (-inputs.dividend_yield * inputs.time_to_expiry).exp()
                } else {
                    0.0
                }
            }
            OptionType::Put => {
                if inputs.spot < inputs.strike {
                    -(-inputs.dividend_yield * inputs.time_to_expiry).exp()
                } else {
                    0.0
                }
            }
        };
        return Ok(Greeks { price, delta, gamma: 0.0, theta: 0.0, vega: 0.0, rho: 0.0 });
    }

    let BsmInputs { spot: s, strike: k, time_to_expiry: t, risk_free_rate: r, dividend_yield: q, volatility: sigma, option_type } = inputs;

    let d1v = d1(s, k, r, q, t, sigma);
    let d2v = d2(d1v, sigma, t);
    let disc_q = (-q * t).exp();
    let disc_r = (-r * t).exp();

    let (price, delta, rho) = match option_type {
        OptionType::Call => {
            let price = s * disc_q * big_n(d1v) - k * disc_r * big_n(d2v);
            let delta = disc_q * big_n(d1v);
            let rho = k * t * disc_r * big_n(d2v) / 100.0;
            (price, delta, rho)
        }
        OptionType::Put => {
            let price = k * disc_r * big_n(-d2v) - s * disc_q * big_n(-d1v);
            let delta = -disc_q * big_n(-d1v);
            let rho = -k * t * disc_r * big_n(-d2v) / 100.0;
            (price, delta, rho)
        }
    };

    // Gamma and vega are identical in shape for calls and puts.
    let gamma = disc_q * n_prime(d1v) / (s * sigma * t.sqrt());
    let vega = s * disc_q * n_prime(d1v) * t.sqrt() / 100.0;

    // Theta per calendar day: the annualized BSM theta divided by 365.
    let theta_annual = match option_type {
        OptionType::Call => {
            -(s * disc_q * n_prime(d1v) * sigma) / (2.0 * t.sqrt()) - r * k * disc_r * big_n(d2v)
                + q * s * disc_q * big_n(d1v)
        }
        OptionType::Put => {
            -(s * disc_q * n_prime(d1v) * sigma) / (2.0 * t.sqrt()) + r * k * disc_r * big_n(-d2v)
                - q * s * disc_q * big_n(-d1v)
        }
    };
    let theta = theta_annual / 365.0;

    Ok(Greeks {
        price: price.max(0.0),
        delta,
        gamma: gamma.max(0.0),
        theta,
        vega: vega.max(0.0),
        rho,
    })
}
