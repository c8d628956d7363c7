//! Performance metrics computed from an equity curve and trade list
//! (§4.6): return, risk-adjusted return, and trade-level statistics.

use crate::model::equity::EquityPoint;
use crate::model::trade::TradeRecord;
use crate::utils::TimeFrame;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Max drawdown's magnitude plus how long (in trading days) the account
/// stayed underwater before recovering, or never recovered within the
/// run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawdownStats {
    /// Negative fraction of the peak, e.g. `-0.15` for a 15% drawdown.
    pub max_drawdown: Decimal,
    pub duration_days: i64,
}

/// The full metric set §4.6 names, computed once from a completed run's
/// `equity_curve` and `trades`.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceReport {
    pub total_return: Decimal,
    pub cagr: Decimal,
    pub max_drawdown: Decimal,
    pub max_drawdown_duration_days: i64,
    pub sharpe: Decimal,
    pub sortino: Decimal,
    pub calmar: Decimal,
    pub win_rate: Decimal,
    pub avg_win: Decimal,
    pub avg_loss: Decimal,
    pub profit_factor: Decimal,
    pub payoff_ratio: Decimal,
    pub total_trades: usize,
}

fn daily_returns(equity_curve: &[EquityPoint]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .filter_map(|pair| {
            let prev = pair[0].total_value.to_f64()?;
            let next = pair[1].total_value.to_f64()?;
            if prev == 0.0 { None } else { Some((next - prev) / prev) }
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() { 0.0 } else { values.iter().sum::<f64>() / values.len() as f64 }
}

fn std_dev(values: &[f64], mean_value: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean_value).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

fn downside_deviation(values: &[f64], mean_value: f64) -> f64 {
    let downside: Vec<f64> = values.iter().filter(|&&v| v < 0.0).copied().collect();
    if downside.len() < 2 {
        return 0.0;
    }
    let variance = downside.iter().map(|v| (v - mean_value).powi(2)).sum::<f64>() / (downside.len() - 1) as f64;
    variance.sqrt()
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64_retain(value).unwrap_or(Decimal::ZERO)
}

/// §4.6 "Max drawdown (peak-to-trough, percentage of peak), drawdown
/// duration": walks the equity curve tracking the running peak and the
/// longest stretch spent below it.
pub fn drawdown_stats(equity_curve: &[EquityPoint]) -> DrawdownStats {
    if equity_curve.is_empty() {
        return DrawdownStats { max_drawdown: Decimal::ZERO, duration_days: 0 };
    }

    let mut peak = equity_curve[0].total_value;
    let mut peak_index = 0usize;
    let mut max_drawdown = Decimal::ZERO;
    let mut max_duration = 0i64;

    for (i, point) in equity_curve.iter().enumerate() {
        if point.total_value > peak {
            peak = point.total_value;
            peak_index = i;
        }
        if peak > Decimal::ZERO {
            let dd = (point.total_value - peak) / peak;
            if dd < max_drawdown {
                max_drawdown = dd;
                let duration = (point.date - equity_curve[peak_index].date).num_days();
                max_duration = max_duration.max(duration);
            }
        }
    }

    DrawdownStats { max_drawdown, duration_days: max_duration }
}

/// §4.6 "CAGR (using actual backtest span in years)".
pub fn cagr(equity_curve: &[EquityPoint]) -> Decimal {
    let (Some(first), Some(last)) = (equity_curve.first(), equity_curve.last()) else {
        return Decimal::ZERO;
    };
    if first.total_value <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let years = (last.date - first.date).num_days() as f64 / 365.25;
    if years <= 0.0 {
        return Decimal::ZERO;
    }
    let total_return = (last.total_value / first.total_value).to_f64().unwrap_or(1.0);
    if total_return <= 0.0 {
        return Decimal::ZERO;
    }
    to_decimal(total_return.powf(1.0 / years) - 1.0)
}

/// §4.6 "Sharpe (annualized with √252)". Zero when the daily-return
/// series has no variance, rather than dividing by zero (§4.4 failure
/// semantics apply the same "degrade to a safe sentinel" rule here).
pub fn sharpe_ratio(equity_curve: &[EquityPoint]) -> Decimal {
    let returns = daily_returns(equity_curve);
    let avg = mean(&returns);
    let std = std_dev(&returns, avg);
    if std == 0.0 {
        return Decimal::ZERO;
    }
    to_decimal(avg / std * TimeFrame::Day.periods_per_year().sqrt())
}

/// §4.6 "Sortino (downside-deviation variant)".
pub fn sortino_ratio(equity_curve: &[EquityPoint]) -> Decimal {
    let returns = daily_returns(equity_curve);
    let avg = mean(&returns);
    let downside_avg = mean(&returns.iter().copied().filter(|&v| v < 0.0).collect::<Vec<_>>());
    let downside_std = downside_deviation(&returns, downside_avg);
    if downside_std == 0.0 {
        return Decimal::ZERO;
    }
    to_decimal(avg / downside_std * TimeFrame::Day.periods_per_year().sqrt())
}

/// §4.6 "Calmar (CAGR / |max_dd|)". Zero when there was no drawdown.
pub fn calmar_ratio(cagr: Decimal, max_drawdown: Decimal) -> Decimal {
    if max_drawdown == Decimal::ZERO { Decimal::ZERO } else { cagr / max_drawdown.abs() }
}

/// Trade-level statistics shared by `PerformanceReport`: win rate,
/// average win/loss, profit factor, payoff ratio.
struct TradeStats {
    win_rate: Decimal,
    avg_win: Decimal,
    avg_loss: Decimal,
    profit_factor: Decimal,
    payoff_ratio: Decimal,
}

fn trade_stats(trades: &[TradeRecord]) -> TradeStats {
    if trades.is_empty() {
        return TradeStats {
            win_rate: Decimal::ZERO,
            avg_win: Decimal::ZERO,
            avg_loss: Decimal::ZERO,
            profit_factor: Decimal::ZERO,
            payoff_ratio: Decimal::ZERO,
        };
    }

    let wins: Vec<Decimal> = trades.iter().map(|t| t.net_pnl).filter(|&p| p > Decimal::ZERO).collect();
    let losses: Vec<Decimal> = trades.iter().map(|t| t.net_pnl).filter(|&p| p < Decimal::ZERO).collect();

    let win_rate = Decimal::from(wins.len() as u32) / Decimal::from(trades.len() as u32);
    let avg_win = if wins.is_empty() { Decimal::ZERO } else { wins.iter().sum::<Decimal>() / Decimal::from(wins.len() as u32) };
    let avg_loss = if losses.is_empty() { Decimal::ZERO } else { losses.iter().sum::<Decimal>() / Decimal::from(losses.len() as u32) };

    let gross_profit: Decimal = wins.iter().sum();
    let gross_loss: Decimal = losses.iter().sum::<Decimal>().abs();
    let profit_factor = if gross_loss == Decimal::ZERO { Decimal::ZERO } else { gross_profit / gross_loss };
    let payoff_ratio = if avg_loss == Decimal::ZERO { Decimal::ZERO } else { avg_win / avg_loss.abs() };

    TradeStats { win_rate, avg_win, avg_loss, profit_factor, payoff_ratio }
}

/// Computes the full §4.6 metric set from one run's output.
pub fn analyze(equity_curve: &[EquityPoint], trades: &[TradeRecord]) -> PerformanceReport {
    let total_return = match (equity_curve.first(), equity_curve.last()) {
        (Some(first), Some(last)) if first.total_value > Decimal::ZERO => {
            (last.total_value - first.total_value) / first.total_value
        }
        _ => Decimal::ZERO,
    };

    let drawdown = drawdown_stats(equity_curve);
    let cagr_value = cagr(equity_curve);
    let stats = trade_stats(trades);

    PerformanceReport {
        total_return,
        cagr: cagr_value,
        max_drawdown: drawdown.max_drawdown,
        max_drawdown_duration_days: drawdown.duration_days,
        sharpe: sharpe_ratio(equity_curve),
        sortino: sortino_ratio(equity_curve),
        calmar: calmar_ratio(cagr_value, drawdown.max_drawdown),
        win_rate: stats.win_rate,
        avg_win: stats.avg_win,
        avg_loss: stats.avg_loss,
        profit_factor: stats.profit_factor,
        payoff_ratio: stats.payoff_ratio,
        total_trades: trades.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{ExitReason, OptionType, PositionStatus};
    use chrono::NaiveDate;
    use positive::pos_or_panic;
    use rust_decimal_macros::dec;

    fn point(date: NaiveDate, total_value: Decimal) -> EquityPoint {
        EquityPoint { date, cash: total_value, positions_value: Decimal::ZERO, total_value, drawdown_from_peak: Decimal::ZERO }
    }

    fn flat_curve() -> Vec<EquityPoint> {
        vec![
            point(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), dec!(100000)),
            point(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), dec!(100000)),
            point(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), dec!(100000)),
        ]
    }

    #[test]
    fn sharpe_is_zero_when_returns_have_no_variance() {
        assert_eq!(sharpe_ratio(&flat_curve()), Decimal::ZERO);
    }

    #[test]
    fn sortino_is_zero_with_no_downside_days() {
        let curve = vec![
            point(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), dec!(100000)),
            point(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), dec!(101000)),
            point(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), dec!(102000)),
        ];
        assert_eq!(sortino_ratio(&curve), Decimal::ZERO);
    }

    #[test]
    fn drawdown_tracks_peak_to_trough() {
        let curve = vec![
            point(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), dec!(100000)),
            point(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), dec!(110000)),
            point(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), dec!(88000)),
            point(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(), dec!(120000)),
        ];
        let stats = drawdown_stats(&curve);
        assert_eq!(stats.max_drawdown, dec!(-0.2));
        assert_eq!(stats.duration_days, 1);
    }

    #[test]
    fn calmar_is_zero_with_no_drawdown() {
        assert_eq!(calmar_ratio(dec!(0.10), Decimal::ZERO), Decimal::ZERO);
    }

    fn sample_trade(pnl: Decimal, commission: Decimal) -> TradeRecord {
        use crate::model::position::{Leg, Position};
        use uuid::Uuid;
        let position = Position {
            id: Uuid::new_v4(),
            strategy_id: "bull_put".into(),
            legs: vec![Leg {
                strike: pos_or_panic!(390.0),
                option_type: OptionType::Put,
                expiration: NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
                position: -1,
                entry_delta: dec!(-0.30),
                entry_price: pos_or_panic!(1.80),
            }],
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            entry_underlying: pos_or_panic!(400.0),
            entry_vix: dec!(18),
            entry_iv_percentile: Some(dec!(40)),
            entry_price: pos_or_panic!(1.20),
            is_credit: true,
            contracts: 1,
            max_profit: pos_or_panic!(120.0),
            max_loss: pos_or_panic!(380.0),
            stop_loss_price: None,
            profit_target_price: None,
            near_expiration: None,
            far_expiration: None,
            status: PositionStatus::Closed,
            last_mark: pos_or_panic!(0.55),
        };
        TradeRecord::close(
            position,
            NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
            pos_or_panic!(405.0),
            dec!(16),
            Some(dec!(42)),
            pos_or_panic!(0.55),
            ExitReason::ProfitTarget,
            pnl,
            commission,
        )
    }

    #[test]
    fn win_rate_and_profit_factor_from_mixed_trades() {
        let trades = vec![sample_trade(dec!(100), dec!(2)), sample_trade(dec!(-50), dec!(2)), sample_trade(dec!(80), dec!(2))];
        let stats = trade_stats(&trades);
        assert_eq!(stats.win_rate, dec!(2) / dec!(3));
        assert!(stats.profit_factor > Decimal::ONE);
    }

    #[test]
    fn no_trades_yields_zeroed_stats() {
        let stats = trade_stats(&[]);
        assert_eq!(stats.win_rate, Decimal::ZERO);
        assert_eq!(stats.profit_factor, Decimal::ZERO);
    }
}
