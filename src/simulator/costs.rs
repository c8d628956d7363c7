//! Entry/exit cash accounting and trading-cost bookkeeping (§4.4, §9
//! Open Question 2). Commission and slippage are both deducted in a
//! single lump when a position closes — "close the position at the
//! current spread price minus one round-trip commission" — rather than
//! split across the entry and exit cash flows individually. The lump
//! folds three components into `TradeRecord.commission`: the per-leg
//! per-contract commission charged once for the entry fill and once for
//! the exit fill, plus a proportional slippage haircut against both the
//! entry and exit mid-price.

use crate::config::BacktestConfig;
use crate::constants::CONTRACT_MULTIPLIER;
use crate::model::position::Position;
use positive::Positive;
use rust_decimal::Decimal;

/// Cash credited (or debited) by entering `position` at its recorded
/// `entry_price`, before any cost is applied — slippage/commission are
/// realized at close, not here.
pub fn entry_cash_flow(entry_price: Positive, is_credit: bool, contracts: u32) -> Decimal {
    let notional = entry_price.to_dec() * Decimal::from(CONTRACT_MULTIPLIER) * Decimal::from(contracts);
    if is_credit { notional } else { -notional }
}

/// Cash required to hold the position once sized: the defined-risk margin
/// (`max_loss`, already scaled to `contracts`) for a credit spread, the
/// debit paid for a debit spread. Margin beyond this defined-risk figure
/// (e.g. broker-specific maintenance requirements) is out of scope.
pub fn cash_required(entry_price: Positive, max_loss: Positive, is_credit: bool, contracts: u32) -> Decimal {
    if is_credit {
        max_loss.to_dec()
    } else {
        entry_price.to_dec() * Decimal::from(CONTRACT_MULTIPLIER) * Decimal::from(contracts)
    }
}

/// Gross P&L and lump trading cost for closing `position` at `exit_price`.
/// Returns `(pnl, total_cost, cash_delta)`: `cash_delta` is the amount to
/// add to cash on close, already net of `total_cost`.
pub fn close_economics(position: &Position, exit_price: Positive, backtest: &BacktestConfig) -> (Decimal, Decimal, Decimal) {
    let entry = position.entry_price.to_dec();
    let exit = exit_price.to_dec();
    let hundred = Decimal::from(CONTRACT_MULTIPLIER);
    let contracts = Decimal::from(position.contracts);

    let pnl = if position.is_credit { (entry - exit) * hundred * contracts } else { (exit - entry) * hundred * contracts };

    let legs = Decimal::from(position.legs.len() as u32);
    let commission_dollars = backtest.commission_per_contract * legs * contracts * Decimal::from(2);
    let entry_slippage = backtest.slippage_pct * entry * hundred * contracts;
    let exit_slippage = backtest.slippage_pct * exit * hundred * contracts;
    let total_cost = commission_dollars + entry_slippage + exit_slippage;

    let raw_exit_cash = if position.is_credit { -exit * hundred * contracts } else { exit * hundred * contracts };
    let cash_delta = raw_exit_cash - total_cost;

    (pnl, total_cost, cash_delta)
}

/// Current mark-to-market contribution of an open position to account
/// equity: the cost to close it, signed so a credit spread's mark is a
/// liability and a debit spread's is an asset (§4.4 step 4).
pub fn mark_value(position: &Position) -> Decimal {
    let magnitude = position.last_mark.to_dec() * Decimal::from(CONTRACT_MULTIPLIER) * Decimal::from(position.contracts);
    if position.is_credit { -magnitude } else { magnitude }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::position::Leg;
    use crate::model::types::{OptionType, PositionStatus};
    use chrono::NaiveDate;
    use positive::pos_or_panic;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn credit_position(entry_price: f64, last_mark: f64, contracts: u32) -> Position {
        Position {
            id: Uuid::new_v4(),
            strategy_id: "bull_put".into(),
            legs: vec![
                Leg {
                    strike: pos_or_panic!(390.0),
                    option_type: OptionType::Put,
                    expiration: NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
                    position: -1,
                    entry_delta: dec!(-0.30),
                    entry_price: pos_or_panic!(1.80),
                },
                Leg {
                    strike: pos_or_panic!(385.0),
                    option_type: OptionType::Put,
                    expiration: NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
                    position: 1,
                    entry_delta: dec!(-0.20),
                    entry_price: pos_or_panic!(0.60),
                },
            ],
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            entry_underlying: pos_or_panic!(400.0),
            entry_vix: dec!(18),
            entry_iv_percentile: Some(dec!(40)),
            entry_price: pos_or_panic!(entry_price),
            is_credit: true,
            contracts,
            max_profit: pos_or_panic!(entry_price * 100.0 * contracts as f64),
            max_loss: pos_or_panic!((5.0 - entry_price) * 100.0 * contracts as f64),
            stop_loss_price: None,
            profit_target_price: None,
            near_expiration: None,
            far_expiration: None,
            status: PositionStatus::Open,
            last_mark: pos_or_panic!(last_mark),
        }
    }

    #[test]
    fn entry_cash_flow_is_positive_for_credit() {
        let cash = entry_cash_flow(pos_or_panic!(1.20), true, 2);
        assert_eq!(cash, dec!(240));
    }

    #[test]
    fn entry_cash_flow_is_negative_for_debit() {
        let cash = entry_cash_flow(pos_or_panic!(1.20), false, 2);
        assert_eq!(cash, dec!(-240));
    }

    #[test]
    fn close_economics_profit_target_matches_worked_example() {
        // entry credit 1.20, exit at 0.55, one contract, no costs: pnl = 65.
        let backtest = BacktestConfig {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            initial_capital: dec!(100000),
            commission_per_contract: Decimal::ZERO,
            slippage_pct: Decimal::ZERO,
        };
        let position = credit_position(1.20, 0.55, 1);
        let (pnl, cost, cash_delta) = close_economics(&position, pos_or_panic!(0.55), &backtest);
        assert_eq!(pnl, dec!(65.00));
        assert_eq!(cost, Decimal::ZERO);
        assert_eq!(cash_delta, dec!(-55.00));
    }

    #[test]
    fn close_economics_charges_round_trip_commission_and_slippage() {
        let backtest = BacktestConfig {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            initial_capital: dec!(100000),
            commission_per_contract: dec!(0.65),
            slippage_pct: dec!(0.01),
        };
        let position = credit_position(1.20, 0.55, 1);
        let (_, cost, _) = close_economics(&position, pos_or_panic!(0.55), &backtest);
        // commission: 0.65 * 2 legs * 1 contract * 2 (entry+exit) = 2.60
        // entry slippage: 0.01 * 1.20 * 100 = 1.20; exit slippage: 0.01 * 0.55 * 100 = 0.55
        assert_eq!(cost, dec!(2.60) + dec!(1.20) + dec!(0.55));
    }

    #[test]
    fn mark_value_is_a_liability_for_open_credit_position() {
        let position = credit_position(1.20, 0.80, 3);
        assert_eq!(mark_value(&position), dec!(-240.00));
    }
}
