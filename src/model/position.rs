//! `Leg` and `Position` — the unit of strategy state the simulator owns
//! from entry signal through close (§3 `Leg`, `Position`; §9 "Position
//! storage").

use crate::model::types::{OptionType, PositionStatus};
use chrono::NaiveDate;
use positive::Positive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One leg of a multi-leg position, fixed for its lifetime once entered.
/// `position` is `+1` for a long leg, `-1` for a short leg; strategies
/// never hold fractional leg quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub strike: Positive,
    pub option_type: OptionType,
    pub expiration: NaiveDate,
    pub position: i32,
    pub entry_delta: Decimal,
    pub entry_price: Positive,
}

impl Leg {
    pub fn is_long(&self) -> bool {
        self.position > 0
    }
}

/// A strategy's open or closed state. Strategies hold between 2 (vertical,
/// calendar) and 4 (iron condor) legs; the vector is never resized after
/// entry.
///
/// `entry_price` is stored as an unsigned magnitude: a credit spread's
/// `entry_price` is the credit received, a debit spread's is the debit
/// paid. Which one it is follows from the strategy's own accounting
/// convention, not from the sign of `entry_price` itself — callers must
/// know which strategy produced the position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: Uuid,
    pub strategy_id: String,
    pub legs: Vec<Leg>,
    pub entry_date: NaiveDate,
    pub entry_underlying: Positive,
    pub entry_vix: Decimal,
    pub entry_iv_percentile: Option<Decimal>,
    pub entry_price: Positive,
    /// Whether `entry_price` is a credit received (true) or a debit paid
    /// (false) — the simulator's entry/exit cash accounting reads this
    /// rather than inferring it from `strategy_id`.
    pub is_credit: bool,
    pub contracts: u32,
    pub max_profit: Positive,
    pub max_loss: Positive,
    pub stop_loss_price: Option<Positive>,
    pub profit_target_price: Option<Positive>,
    /// Near-dated expiration for calendar spreads; `None` for strategies
    /// where all legs share one expiration.
    pub near_expiration: Option<NaiveDate>,
    /// Far-dated expiration for calendar spreads.
    pub far_expiration: Option<NaiveDate>,
    pub status: PositionStatus,
    /// Most recent mark-to-market spread price (unsigned magnitude,
    /// comparable to `entry_price`), updated once per trading day.
    pub last_mark: Positive,
}

impl Position {
    pub fn is_open(&self) -> bool {
        self.status == PositionStatus::Open
    }

    /// All distinct expirations across the position's legs, used by the
    /// simulator to look up quotes per leg rather than assuming a single
    /// shared expiration.
    pub fn expirations(&self) -> Vec<NaiveDate> {
        let mut exps: Vec<NaiveDate> = self.legs.iter().map(|l| l.expiration).collect();
        exps.sort();
        exps.dedup();
        exps
    }

    /// True once every leg's expiration is on or before `date` — used for
    /// the "expiration reached" exit condition (§4.3) shared by all
    /// strategies.
    pub fn all_legs_expired(&self, date: NaiveDate) -> bool {
        self.legs.iter().all(|l| l.expiration <= date)
    }
}
