//! Shared position mark-to-market helper (§4.4 step 2): locate each leg's
//! current quote in today's chain, falling back to the nearest strike
//! within a tight tolerance, and fold the signed per-leg prices into one
//! spread price comparable to `Position::entry_price`.

use crate::chains::OptionChain;
use crate::model::position::{Leg, Position};
use crate::model::types::OptionType;
use chrono::NaiveDate;
use positive::Positive;
use rust_decimal::Decimal;

/// Strikes within this many dollars of the requested strike are accepted
/// as a fallback when the exact strike is missing from today's chain
/// (§4.4 "attempt nearest-strike/nearest-expiration fallback within a
/// tight tolerance").
const NEAREST_STRIKE_TOLERANCE: f64 = 2.0;

fn intrinsic_leg_value(leg: &Leg, underlying_price: Positive) -> Decimal {
    let spot = underlying_price.to_dec();
    let strike = leg.strike.to_dec();
    match leg.option_type {
        OptionType::Call => (spot - strike).max(Decimal::ZERO),
        OptionType::Put => (strike - spot).max(Decimal::ZERO),
    }
}

fn leg_price(leg: &Leg, chain: &OptionChain, today: NaiveDate) -> Option<Decimal> {
    if leg.expiration <= today {
        return Some(intrinsic_leg_value(leg, chain.underlying_price));
    }
    if let Some(quote) = chain.get(leg.expiration, leg.strike, leg.option_type) {
        return Some(quote.price.to_dec());
    }
    let tolerance = Positive::new(NEAREST_STRIKE_TOLERANCE).ok()?;
    chain
        .nearest(leg.expiration, leg.strike, leg.option_type, tolerance)
        .map(|quote| quote.price.to_dec())
}

/// Marks a position's spread price for `today`. Returns `None` only when
/// every leg's quote (and its nearest-strike fallback) is missing — the
/// caller should then hold the position at its prior mark and log a
/// warning, per §4.4's failure semantics.
pub fn mark_spread(position: &Position, chain: &OptionChain, today: NaiveDate) -> Option<Decimal> {
    let mut net = Decimal::ZERO;
    let mut any_found = false;
    for leg in &position.legs {
        if let Some(price) = leg_price(leg, chain, today) {
            any_found = true;
            net += Decimal::from(leg.position) * price;
        }
    }
    if !any_found {
        return None;
    }
    // `net` is Σ(leg.position × price): negative for a net-credit position
    // (the short leg dominates), positive for a net-debit one. Strategies
    // compare the mark against `entry_price`, which is always stored as an
    // unsigned magnitude, so flip the sign for credit positions.
    Some(if position.is_credit { -net } else { net })
}
