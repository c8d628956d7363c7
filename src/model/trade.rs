//! `TradeRecord` — the immutable, append-only record emitted when a
//! position closes (§3 `TradeRecord`).

use crate::model::position::{Leg, Position};
use crate::model::types::{ExitReason, OptionType, PositionStatus};
use chrono::NaiveDate;
use positive::Positive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Snapshot of a closed position plus its exit facts. Produced exactly
/// once per position, by moving the position's fields out rather than
/// cloning (§9 "Position storage").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: Uuid,
    pub strategy_id: String,
    pub legs: Vec<Leg>,
    pub entry_date: NaiveDate,
    pub entry_underlying: Positive,
    pub entry_vix: Decimal,
    pub entry_iv_percentile: Option<Decimal>,
    pub entry_price: Positive,
    pub is_credit: bool,
    pub contracts: u32,
    pub max_profit: Positive,
    pub max_loss: Positive,
    pub near_expiration: Option<NaiveDate>,
    pub far_expiration: Option<NaiveDate>,

    pub exit_date: NaiveDate,
    pub exit_underlying: Positive,
    pub exit_vix: Decimal,
    pub exit_iv_percentile: Option<Decimal>,
    pub exit_price: Positive,
    pub exit_reason: ExitReason,
    /// Gross profit/loss in dollars, before commission.
    pub pnl: Decimal,
    pub commission: Decimal,
    /// `pnl - commission`.
    pub net_pnl: Decimal,
    pub days_in_trade: i64,
}

impl TradeRecord {
    /// Moves `position` into a closed trade record. `position.status` must
    /// already be `Closed`; the simulator sets that before calling this.
    #[allow(clippy::too_many_arguments)]
    pub fn close(
        position: Position,
        exit_date: NaiveDate,
        exit_underlying: Positive,
        exit_vix: Decimal,
        exit_iv_percentile: Option<Decimal>,
        exit_price: Positive,
        exit_reason: ExitReason,
        pnl: Decimal,
        commission: Decimal,
    ) -> Self {
        debug_assert_eq!(position.status, PositionStatus::Closed);
        let days_in_trade = (exit_date - position.entry_date).num_days();
        TradeRecord {
            id: position.id,
            strategy_id: position.strategy_id,
            legs: position.legs,
            entry_date: position.entry_date,
            entry_underlying: position.entry_underlying,
            entry_vix: position.entry_vix,
            entry_iv_percentile: position.entry_iv_percentile,
            entry_price: position.entry_price,
            is_credit: position.is_credit,
            contracts: position.contracts,
            max_profit: position.max_profit,
            max_loss: position.max_loss,
            near_expiration: position.near_expiration,
            far_expiration: position.far_expiration,
            exit_date,
            exit_underlying,
            exit_vix,
            exit_iv_percentile,
            exit_price,
            exit_reason,
            pnl,
            commission,
            net_pnl: pnl - commission,
            days_in_trade,
        }
    }

    /// Per-leg columns for the CSV export schema (§6): up to four legs,
    /// `None` beyond the position's actual leg count.
    pub fn leg_column(&self, index: usize) -> Option<&Leg> {
        self.legs.get(index)
    }

    pub fn call_count(&self) -> usize {
        self.legs.iter().filter(|l| l.option_type == OptionType::Call).count()
    }

    pub fn put_count(&self) -> usize {
        self.legs.iter().filter(|l| l.option_type == OptionType::Put).count()
    }
}
