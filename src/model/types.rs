//! Core enums shared by the chain generator, strategy kit, and simulator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Put or call. Named `OptionType` to match the vocabulary of `spec.md`
/// (elsewhere in the options-pricing literature this is called "option
/// style"); there is no American/European axis in this engine since
/// early exercise is an explicit non-goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

/// Lifecycle state of a `Position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionStatus {
    Open,
    Closed,
}

/// The rule that first triggered a position's close, in priority order
/// per strategy (§4.3 of the spec). Exactly one reason is recorded per
/// closed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitReason {
    ProfitTarget,
    StopLoss,
    Dte,
    Breach,
    UnderlyingMove,
    Expired,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExitReason::ProfitTarget => "profit_target",
            ExitReason::StopLoss => "stop_loss",
            ExitReason::Dte => "dte",
            ExitReason::Breach => "breach",
            ExitReason::UnderlyingMove => "underlying_move",
            ExitReason::Expired => "expired",
        };
        write!(f, "{s}")
    }
}

/// Outcome recorded on every `DailyEntryLog`, even on days where nothing
/// was entered — the reason a day produced zero trades is as much a part
/// of the audit trail as the trade itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryBlockedReason {
    Entered,
    AlreadyEnteredToday,
    MaxPositionsReached,
    NoEntrySignal,
    InsufficientCash,
    RiskBudgetExceeded,
}

impl fmt::Display for EntryBlockedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntryBlockedReason::Entered => "entered",
            EntryBlockedReason::AlreadyEnteredToday => "already_entered_today",
            EntryBlockedReason::MaxPositionsReached => "max_positions_reached",
            EntryBlockedReason::NoEntrySignal => "no_entry_signal",
            EntryBlockedReason::InsufficientCash => "insufficient_cash",
            EntryBlockedReason::RiskBudgetExceeded => "risk_budget_exceeded",
        };
        write!(f, "{s}")
    }
}

/// Policy for handling entries during the IV-percentile warm-up period
/// (the first `IV_PERCENTILE_WINDOW` trading days of a dataset, where the
/// trailing-window statistic is undefined). See `SPEC_FULL.md` Open
/// Question 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WarmupPolicy {
    /// Reject any entry filter on IV percentile during warm-up (default).
    #[default]
    Reject,
    /// Treat warm-up days as passing any IV-percentile filter.
    Pass,
}
