//! `EquityPoint` and `DailyEntryLog` — the two records emitted once per
//! trading day regardless of whether anything happened that day (§3).

use crate::model::types::EntryBlockedReason;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Mark-to-market snapshot of the account, appended once per trading day
/// after exits and entries for that day have been processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub cash: Decimal,
    pub positions_value: Decimal,
    pub total_value: Decimal,
    /// Fraction below the running peak of `total_value`, always `<= 0`.
    pub drawdown_from_peak: Decimal,
}

/// Record of whether a strategy entered a position on a given day, and if
/// not, why. Emitted once per day per strategy so the simulator can
/// assert the hard `trades_entered_today <= 1` invariant in tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntryLog {
    pub date: NaiveDate,
    pub strategy_id: String,
    pub trades_entered: u8,
    pub attempted_entry: bool,
    pub entry_blocked_reason: EntryBlockedReason,
}
