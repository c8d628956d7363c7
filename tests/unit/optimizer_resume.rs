//! The optimizer's resume law and grid-search repeatability (testable
//! properties §8 scenario 6 plus "optimizer resume ⇒ compiled CSV
//! equals an uninterrupted run as a set"): running the same grid twice
//! produces the same trial set, and splitting one run into a
//! checkpointed batch plus a resumed remainder, then merging, produces
//! the same set as running it uninterrupted.

use crate::common::{build_dataset, default_backtest, default_entry_config, default_exit_config, default_sizing};
use spy_backtest_engine::prelude::*;
use std::collections::{HashMap, HashSet};

fn optimizer_config() -> OptimizerConfig {
    OptimizerConfig { mode: OptimizerMode::Grid, n_trials: 0, checkpoint_every: 1000, n_startup_trials: 0, enable_pruning: false, grid_threshold: 1_000_000 }
}

fn specs() -> Vec<ParamSpec> {
    vec![
        ParamSpec::new("short_delta", rust_decimal_macros::dec!(0.20), rust_decimal_macros::dec!(0.35), rust_decimal_macros::dec!(0.05)),
        ParamSpec::new("profit_target", rust_decimal_macros::dec!(0.40), rust_decimal_macros::dec!(0.60), rust_decimal_macros::dec!(0.10)),
    ]
}

/// Tuple keys as a set, for order-independent comparison of trial lists.
fn tuple_keys(trials: &[TrialResult]) -> HashSet<Vec<(String, String)>> {
    trials.iter().map(|t| spy_backtest_engine::optimizer::param::tuple_key(&t.params)).collect()
}

/// Tuple key -> ranking metric, so two runs can be compared on outcome
/// and not just on which parameter tuples were attempted.
fn ranking_by_tuple(trials: &[TrialResult]) -> HashMap<Vec<(String, String)>, rust_decimal::Decimal> {
    trials
        .iter()
        .map(|t| (spy_backtest_engine::optimizer::param::tuple_key(&t.params), t.ranking_metric()))
        .collect()
}

fn base_config() -> StrategyConfig {
    StrategyConfig { enabled: true, entry: default_entry_config(), exit: default_exit_config() }
}

#[test]
fn running_the_same_grid_twice_produces_the_same_trial_set() {
    let dataset = build_dataset(90);
    let start = dataset.bars[0].date;
    let end = dataset.bars[dataset.bars.len() - 1].date;
    let backtest = default_backtest(start, end);
    let sizing = default_sizing();
    let optimizer = optimizer_config();
    let base = base_config();

    let run_config = spy_backtest_engine::optimizer::OptimizerRun {
        strategy_name: "bull_put",
        base_strategy_config: &base,
        specs: specs(),
        optimizer: &optimizer,
        backtest: &backtest,
        sizing: &sizing,
        warmup_policy: WarmupPolicy::Reject,
        seed: 7,
    };

    let first = spy_backtest_engine::optimizer::run(&run_config, &dataset, &HashSet::new(), |_| {});
    let second = spy_backtest_engine::optimizer::run(&run_config, &dataset, &HashSet::new(), |_| {});

    assert_eq!(tuple_keys(&first.trials), tuple_keys(&second.trials));
    assert_eq!(ranking_by_tuple(&first.trials), ranking_by_tuple(&second.trials));
}

#[test]
fn resuming_from_a_partial_checkpoint_matches_an_uninterrupted_run() {
    let dataset = build_dataset(90);
    let start = dataset.bars[0].date;
    let end = dataset.bars[dataset.bars.len() - 1].date;
    let backtest = default_backtest(start, end);
    let sizing = default_sizing();
    let optimizer = optimizer_config();
    let base = base_config();

    let run_config = spy_backtest_engine::optimizer::OptimizerRun {
        strategy_name: "bull_put",
        base_strategy_config: &base,
        specs: specs(),
        optimizer: &optimizer,
        backtest: &backtest,
        sizing: &sizing,
        warmup_policy: WarmupPolicy::Reject,
        seed: 11,
    };

    let uninterrupted = spy_backtest_engine::optimizer::run(&run_config, &dataset, &HashSet::new(), |_| {});

    // Simulate an interruption: pretend the first half of the trials were
    // already checkpointed, then resume with that as the already-tested set.
    let midpoint = uninterrupted.trials.len() / 2;
    let first_batch: Vec<TrialResult> = uninterrupted.trials[..midpoint].to_vec();
    let already_tested: HashSet<Vec<(String, String)>> =
        first_batch.iter().map(|t| spy_backtest_engine::optimizer::param::tuple_key(&t.params)).collect();

    let resumed = spy_backtest_engine::optimizer::run(&run_config, &dataset, &already_tested, |_| {});

    let merged = spy_backtest_engine::optimizer::compiled::merge(&[first_batch, resumed.trials]);

    assert_eq!(tuple_keys(&merged), tuple_keys(&uninterrupted.trials));
    assert_eq!(ranking_by_tuple(&merged), ranking_by_tuple(&uninterrupted.trials));
}
