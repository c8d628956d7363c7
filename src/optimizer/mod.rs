//! The parameter optimizer (§4.5): grid search or a hand-rolled
//! Bayesian TPE sampler, routed through an explicit parameter-name
//! table onto strategy-scoped config clones, run in parallel over
//! `rayon`, checkpointed to CSV, and compiled into a per-strategy
//! master results file.

pub mod checkpoint;
pub mod compiled;
pub mod csv_io;
pub mod param;
pub mod sampler;
pub mod trial;

use crate::config::{BacktestConfig, OptimizerConfig, OptimizerMode, PositionSizingConfig, StrategyConfig};
use crate::model::types::WarmupPolicy;
use crate::simulator::Dataset;
use param::ParamSet;
use rayon::prelude::*;
use rust_decimal::Decimal;
use sampler::{ParamSpec, TpeSampler, grid_combinations, grid_size};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use trial::TrialResult;

/// Which sampler a run actually used, echoed back for logging/reporting
/// — §4.5's automatic `Auto` selection is otherwise invisible to a
/// caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedMode {
    Grid,
    Optuna,
}

/// §4.5 "Auto... estimate the cartesian-product size across every
/// `ParamSpec`; below `grid_threshold` run grid search, at or above it
/// run the Bayesian sampler." Explicit `Grid`/`Optuna` bypass the
/// estimate entirely.
pub fn resolve_mode(mode: OptimizerMode, specs: &[ParamSpec], grid_threshold: usize) -> ResolvedMode {
    match mode {
        OptimizerMode::Grid => ResolvedMode::Grid,
        OptimizerMode::Optuna => ResolvedMode::Optuna,
        OptimizerMode::Auto => {
            if grid_size(specs) < grid_threshold {
                ResolvedMode::Grid
            } else {
                ResolvedMode::Optuna
            }
        }
    }
}

/// A rough best/average/worst wall-clock estimate for the full run,
/// built by timing a handful of trials up front (§4.5 "before running
/// the full sweep, time 3 representative trials and project best /
/// average / worst completion estimates"). The timed trials' results
/// are discarded — only their durations matter.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeEstimate {
    pub best: Duration,
    pub average: Duration,
    pub worst: Duration,
}

#[allow(clippy::too_many_arguments)]
pub fn estimate_runtime(
    strategy_name: &str,
    base_strategy_config: &StrategyConfig,
    specs: &[ParamSpec],
    dataset: &Dataset,
    backtest: &BacktestConfig,
    sizing: &PositionSizingConfig,
    warmup_policy: WarmupPolicy,
    total_trials: usize,
    seed: u64,
) -> RuntimeEstimate {
    let mut sampler = TpeSampler::new(specs.to_vec(), 3, seed);
    let mut samples = Vec::with_capacity(3);
    for i in 0..3 {
        samples.push(sampler.sample(i, &[]));
    }

    let mut elapsed: Vec<Duration> = samples
        .iter()
        .map(|params| {
            let start = Instant::now();
            let _ = trial::run_trial(strategy_name, base_strategy_config, params, dataset, backtest, sizing, warmup_policy);
            start.elapsed()
        })
        .collect();
    elapsed.sort();

    let best = elapsed.first().copied().unwrap_or_default();
    let worst = elapsed.last().copied().unwrap_or_default();
    let average = if elapsed.is_empty() { Duration::default() } else { elapsed.iter().sum::<Duration>() / elapsed.len() as u32 };

    RuntimeEstimate { best: best * total_trials as u32, average: average * total_trials as u32, worst: worst * total_trials as u32 }
}

/// Everything one full optimizer run needs beyond the shared dataset:
/// the strategy being tuned, its base (un-routed) config, the search
/// space, and the run-level knobs from `optimizer:` in the document.
pub struct OptimizerRun<'a> {
    pub strategy_name: &'a str,
    pub base_strategy_config: &'a StrategyConfig,
    pub specs: Vec<ParamSpec>,
    pub optimizer: &'a OptimizerConfig,
    pub backtest: &'a BacktestConfig,
    pub sizing: &'a PositionSizingConfig,
    pub warmup_policy: WarmupPolicy,
    pub seed: u64,
}

/// The outcome of a full run: every trial attempted (including ones
/// skipped because they were already in `already_tested`), the mode
/// that was actually used, and how many checkpoint flushes occurred.
pub struct OptimizerOutput {
    pub trials: Vec<TrialResult>,
    pub mode: ResolvedMode,
}

/// Runs the optimizer to completion. `already_tested` is the resume set
/// built from a prior checkpoint (`checkpoint::already_tested`); pass an
/// empty set for a fresh run. `on_checkpoint` is invoked every
/// `optimizer.checkpoint_every` completed trials (and once more at the
/// end) with the full in-memory trial list so a caller can flush it to
/// disk — this module never touches the filesystem directly, keeping it
/// testable without tempdirs.
pub fn run(
    run_config: &OptimizerRun,
    dataset: &Dataset,
    already_tested: &std::collections::HashSet<Vec<(String, String)>>,
    mut on_checkpoint: impl FnMut(&[TrialResult]) + Send,
) -> OptimizerOutput {
    let mode = resolve_mode(run_config.optimizer.mode, &run_config.specs, run_config.optimizer.grid_threshold);

    let candidates: Vec<ParamSet> = match mode {
        ResolvedMode::Grid => grid_combinations(&run_config.specs),
        ResolvedMode::Optuna => Vec::new(), // TPE generates candidates as it goes, below.
    };

    let results: Mutex<Vec<TrialResult>> = Mutex::new(Vec::new());
    let completed_since_flush = Mutex::new(0usize);

    let run_one = |params: ParamSet| {
        if already_tested.contains(&param::tuple_key(&params)) {
            return None;
        }
        Some(trial::run_trial(
            run_config.strategy_name,
            run_config.base_strategy_config,
            &params,
            dataset,
            run_config.backtest,
            run_config.sizing,
            run_config.warmup_policy,
        ))
    };

    match mode {
        ResolvedMode::Grid => {
            // Trials run concurrently via rayon, but the checkpoint write
            // itself is a single serialization point (§5 "checkpoint
            // writes go through a single serialization point"): the push
            // into `results` and the `on_checkpoint` call both happen
            // while holding `results`'s lock, so a trial that completes
            // mid-grid is flushed as soon as `checkpoint_every` trials have
            // landed rather than only after the whole grid finishes.
            let checkpoint_fn = Mutex::new(&mut on_checkpoint);
            candidates.into_par_iter().for_each(|params| {
                let Some(trial) = run_one(params) else { return };
                let mut results_guard = results.lock().unwrap();
                results_guard.push(trial);
                let mut counter = completed_since_flush.lock().unwrap();
                *counter += 1;
                if *counter >= run_config.optimizer.checkpoint_every {
                    (*checkpoint_fn.lock().unwrap())(&results_guard);
                    *counter = 0;
                }
            });
        }
        ResolvedMode::Optuna => {
            // TPE is inherently sequential (each proposal conditions on
            // every prior observation), so trials run one at a time here;
            // §4.5 only requires grid search to be rayon-parallel.
            let mut sampler = TpeSampler::new(run_config.specs.clone(), run_config.optimizer.n_startup_trials, run_config.seed);
            let mut observed: Vec<(ParamSet, Decimal)> = Vec::new();
            let mut trial_index = 0usize;
            let mut attempts = 0usize;
            // Cap attempts generously above n_trials so a resumed run that
            // keeps re-sampling already-tested tuples still terminates.
            let max_attempts = run_config.optimizer.n_trials.saturating_mul(8).max(run_config.optimizer.n_trials + 32);

            while trial_index < run_config.optimizer.n_trials && attempts < max_attempts {
                attempts += 1;
                let params = sampler.sample(trial_index, &observed);
                if already_tested.contains(&param::tuple_key(&params)) {
                    continue;
                }
                let result = trial::run_trial(
                    run_config.strategy_name,
                    run_config.base_strategy_config,
                    &params,
                    dataset,
                    run_config.backtest,
                    run_config.sizing,
                    run_config.warmup_policy,
                );
                observed.push((params.clone(), result.ranking_metric()));
                {
                    let mut guard = results.lock().unwrap();
                    guard.push(result);
                    trial_index += 1;
                    if trial_index % run_config.optimizer.checkpoint_every == 0 || trial_index == run_config.optimizer.n_trials {
                        on_checkpoint(&guard);
                    }
                }
            }
        }
    }

    let trials = results.into_inner().unwrap();
    on_checkpoint(&trials);
    OptimizerOutput { trials, mode }
}
