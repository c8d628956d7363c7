//! Signals the strategy kit hands to the simulator: what to open
//! (`EntrySignal`) and why to close (`ExitSignal`) (§4.3).

use crate::model::position::Leg;
use crate::model::types::ExitReason;
use chrono::NaiveDate;
use positive::Positive;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Everything the simulator needs to open a `Position` (§4.3 "`EntrySignal`
/// carries the full leg specification needed to create a Position").
/// `entry_price`, `max_profit`, and `max_loss` are per-contract dollar
/// magnitudes (the §4.3.1 formulas with `contracts = 1`); the simulator
/// multiplies by the sized contract count when it builds the `Position`.
#[derive(Debug, Clone, PartialEq)]
pub struct EntrySignal {
    pub strategy_id: String,
    pub legs: Vec<Leg>,
    pub entry_price: Positive,
    pub is_credit: bool,
    pub max_profit: Positive,
    pub max_loss: Positive,
    pub near_expiration: Option<NaiveDate>,
    pub far_expiration: Option<NaiveDate>,
}

/// A strategy's verdict that an open position should close today (§4.3
/// "`ExitSignal` carries a reason tag"). `price` is the spread's current
/// mark, the price the position closes at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitSignal {
    pub reason: ExitReason,
    pub price: Positive,
}

/// Converts a `Decimal` dollar amount to `Positive`, flooring negative
/// results to zero. Strategy math occasionally produces a borderline
/// negative value from rounding (e.g. `width - credit` when credit is
/// within a cent of the width); this is the single place that clamps it.
pub(crate) fn positive_from_decimal(value: Decimal) -> Positive {
    Positive::new(value.to_f64().unwrap_or(0.0).max(0.0)).unwrap_or(Positive::ZERO)
}
