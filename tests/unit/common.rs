//! Shared fixtures for the integration test binary: a realistic,
//! trading-days-only bar series and default strategy configs, so each
//! test file doesn't re-derive them.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use spy_backtest_engine::prelude::*;

/// `n` consecutive *trading* days starting 2024-01-02, with a mildly
/// oscillating underlying price and VIX so the chain generator produces
/// varied deltas/dte rather than a degenerate flat series.
pub fn trading_day_bars(n: i64) -> Vec<UnderlyingBar> {
    let calendar = UsFederalHolidayCalendar::bundled();
    let mut bars = Vec::with_capacity(n as usize);
    let mut date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut i = 0i64;
    while (bars.len() as i64) < n {
        if calendar.is_trading_day(date) {
            let wobble = Decimal::from(i % 7) - dec!(3);
            let close = dec!(400) + wobble;
            let vix = dec!(15) + Decimal::from(i % 5);
            bars.push(UnderlyingBar::new(date, close, vix));
            i += 1;
        }
        date += Duration::days(1);
    }
    bars
}

pub fn default_entry_config() -> EntryConfig {
    EntryConfig {
        dte_min: 30,
        dte_max: 45,
        iv_pct_min: Decimal::ZERO,
        iv_pct_max: dec!(100),
        short_delta: dec!(0.30),
        long_delta: Some(dec!(0.15)),
        delta_tolerance: dec!(0.08),
        min_credit: None,
        max_credit: None,
        min_debit: None,
        max_debit: None,
        far_dte_min: None,
        far_dte_max: None,
        near_dte: None,
        far_dte: None,
        dte_tolerance: None,
        strike_selection: None,
        strike_moneyness_pct: None,
        max_wing_width: None,
    }
}

pub fn default_exit_config() -> ExitConfig {
    ExitConfig { profit_target: dec!(0.50), stop_loss: dec!(0.50), dte_min_exit: 7, max_underlying_move: None, breach_threshold: None }
}

pub fn default_sizing() -> PositionSizingConfig {
    PositionSizingConfig { method: SizingMethod::Fixed, risk_per_trade_pct: dec!(0.02), max_positions: 5, max_risk_percent: dec!(0.20), kelly_pct: None }
}

pub fn default_backtest(start: NaiveDate, end: NaiveDate) -> BacktestConfig {
    BacktestConfig { start_date: start, end_date: end, initial_capital: dec!(100_000), commission_per_contract: dec!(0.65), slippage_pct: dec!(0.001) }
}

pub fn build_dataset(n_days: i64) -> Dataset {
    let bars = trading_day_bars(n_days);
    let calendar = UsFederalHolidayCalendar::bundled();
    Dataset::build(bars, dec!(0.05), dec!(0.013), &calendar, &ChainConfig::default()).expect("fixture dataset must build")
}
