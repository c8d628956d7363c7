//! Determinism law and the `trades_entered_today <= 1` / zero-position
//! boundary cases from the testable-properties list: same config,
//! same dataset, same seed must produce byte-for-byte identical output,
//! and `max_positions = 0` must mean zero trades and a flat equity
//! curve.

use crate::common::{build_dataset, default_backtest, default_entry_config, default_exit_config, default_sizing};
use spy_backtest_engine::prelude::*;

fn one_strategy_run(max_positions: u32) -> SimulatorOutput {
    let dataset = build_dataset(120);
    let start = dataset.bars[0].date;
    let end = dataset.bars[dataset.bars.len() - 1].date;

    let strategy = bull_put_spread("bull_put", default_entry_config(), default_exit_config(), WarmupPolicy::Reject);
    let mut sizing = default_sizing();
    sizing.max_positions = max_positions;

    let simulator = Simulator::new(vec![Box::new(strategy)], default_backtest(start, end), sizing);
    simulator.run(&dataset)
}

#[test]
fn identical_inputs_produce_identical_trades_and_equity_curve() {
    let first = one_strategy_run(5);
    let second = one_strategy_run(5);

    assert_eq!(first.trades, second.trades);
    assert_eq!(first.equity_curve, second.equity_curve);
    assert_eq!(first.daily_entry_log, second.daily_entry_log);
}

#[test]
fn at_most_one_entry_per_strategy_per_day() {
    let output = one_strategy_run(5);
    for entry in &output.daily_entry_log {
        assert!(entry.trades_entered <= 1, "{} entered {} trades in one day", entry.date, entry.trades_entered);
    }
}

#[test]
fn zero_max_positions_blocks_every_trade_and_flattens_equity() {
    let output = one_strategy_run(0);
    assert!(output.trades.is_empty(), "max_positions = 0 must never open a position");

    let first_equity = output.equity_curve.first().expect("at least one trading day").total_value;
    for point in &output.equity_curve {
        assert_eq!(point.total_value, first_equity, "equity must stay flat with no trades ever entered");
    }
}
