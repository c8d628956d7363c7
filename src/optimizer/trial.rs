//! Runs one optimizer trial: route a `ParamSet` onto a strategy-scoped
//! config clone (never the root document — §4.5's "critical construction
//! rule"), build that one strategy, replay it against the shared dataset,
//! and score the result (§4.6). Failures anywhere in this path become a
//! `TrialError` row with sentinel metrics rather than aborting the run
//! (§7 "TrialError... optimization continues").

use crate::analyzer::metrics::{self, PerformanceReport};
use crate::config::{BacktestConfig, PositionSizingConfig, StrategyConfig, validate_strategy};
use crate::error::TrialError;
use crate::model::types::WarmupPolicy;
use crate::optimizer::param::{ParamSet, apply_all};
use crate::simulator::{Dataset, Simulator};
use crate::strategies::build_strategy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Sentinel Sharpe recorded for a failed trial (§4.4 "recorded as a
/// failed parameter combination with sentinel metrics (e.g., sharpe =
/// −999)"; §7 `TrialError`).
pub const SENTINEL_SHARPE: Decimal = dec!(-999);

/// One completed (or failed) optimizer trial: the parameters tried, the
/// resulting performance metrics, and — mutually exclusive with
/// `metrics` in practice, though both are kept for checkpoint symmetry —
/// the error that aborted it.
#[derive(Debug, Clone)]
pub struct TrialResult {
    pub params: ParamSet,
    pub metrics: Option<PerformanceReport>,
    pub error: Option<String>,
}

impl TrialResult {
    /// The scalar the sampler and compiled-results ranking sort by:
    /// Sharpe, or the sentinel if the trial never produced metrics.
    pub fn ranking_metric(&self) -> Decimal {
        self.metrics.as_ref().map(|m| m.sharpe).unwrap_or(SENTINEL_SHARPE)
    }
}

/// Applies `params` to `base_strategy_config`, builds `strategy_name`,
/// runs the full dataset through it, and scores the result. Every
/// fallible step — routing, per-strategy validation, strategy
/// construction — is caught here and folded into `TrialResult::error`
/// rather than propagated, per §7's "a single bad combination never
/// aborts the run."
#[allow(clippy::too_many_arguments)]
pub fn run_trial(
    strategy_name: &str,
    base_strategy_config: &StrategyConfig,
    params: &ParamSet,
    dataset: &Dataset,
    backtest: &BacktestConfig,
    sizing: &PositionSizingConfig,
    warmup_policy: WarmupPolicy,
) -> TrialResult {
    match run_trial_inner(strategy_name, base_strategy_config, params, dataset, backtest, sizing, warmup_policy) {
        Ok(report) => TrialResult { params: params.clone(), metrics: Some(report), error: None },
        Err(e) => {
            tracing::warn!(strategy = strategy_name, params = ?params, error = %e, "optimizer trial failed");
            TrialResult { params: params.clone(), metrics: None, error: Some(e.to_string()) }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_trial_inner(
    strategy_name: &str,
    base_strategy_config: &StrategyConfig,
    params: &ParamSet,
    dataset: &Dataset,
    backtest: &BacktestConfig,
    sizing: &PositionSizingConfig,
    warmup_policy: WarmupPolicy,
) -> Result<PerformanceReport, TrialError> {
    let routed = apply_all(base_strategy_config, params)?;
    validate_strategy(strategy_name, &routed)?;

    let strategy = build_strategy(strategy_name, &routed, warmup_policy)?;
    let simulator = Simulator::new(vec![strategy], backtest.clone(), sizing.clone());
    let output = simulator.run(dataset);
    Ok(metrics::analyze(&output.equity_curve, &output.trades))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChainConfig, EntryConfig, ExitConfig, SizingMethod};
    use crate::holiday::UsFederalHolidayCalendar;
    use crate::model::bar::UnderlyingBar;
    use chrono::{Duration, NaiveDate};

    fn entry_config() -> EntryConfig {
        EntryConfig {
            dte_min: 30,
            dte_max: 45,
            iv_pct_min: Decimal::ZERO,
            iv_pct_max: dec!(100),
            short_delta: dec!(0.30),
            long_delta: Some(dec!(0.15)),
            delta_tolerance: dec!(0.05),
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

    fn exit_config() -> ExitConfig {
        ExitConfig { profit_target: dec!(0.50), stop_loss: dec!(0.50), dte_min_exit: 7, max_underlying_move: None, breach_threshold: None }
    }

    fn base_strategy() -> StrategyConfig {
        StrategyConfig { enabled: true, entry: entry_config(), exit: exit_config() }
    }

    fn sizing() -> PositionSizingConfig {
        PositionSizingConfig { method: SizingMethod::Fixed, risk_per_trade_pct: dec!(0.02), max_positions: 5, max_risk_percent: dec!(0.20), kelly_pct: None }
    }

    fn backtest() -> BacktestConfig {
        BacktestConfig {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            initial_capital: dec!(100000),
            commission_per_contract: dec!(0.65),
            slippage_pct: Decimal::ZERO,
        }
    }

    fn dataset() -> Dataset {
        let calendar = UsFederalHolidayCalendar::bundled();
        let bars: Vec<UnderlyingBar> = (0..90)
            .map(|i| UnderlyingBar::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap() + Duration::days(i), dec!(400), dec!(15)))
            .collect();
        Dataset::build(bars, dec!(0.05), dec!(0.013), &calendar, &ChainConfig::default()).unwrap()
    }

    #[test]
    fn invalid_routed_dte_window_is_a_trial_error_not_a_panic() {
        let mut params = ParamSet::new();
        // dte=50 would conflict with nothing on its own, but an inverted
        // window is produced by driving dte_min above dte_max directly
        // via two distinct routes isn't expressible through `dte` alone;
        // instead exercise the validate_strategy path through an
        // explicit iv_pct inversion.
        params.insert("iv_pct_min".into(), dec!(90));
        params.insert("iv_pct_max".into(), dec!(10));
        let result = run_trial("bull_put", &base_strategy(), &params, &dataset(), &backtest(), &sizing(), WarmupPolicy::Pass);
        assert!(result.error.is_some());
        assert_eq!(result.ranking_metric(), SENTINEL_SHARPE);
    }

    #[test]
    fn unknown_parameter_name_fails_the_trial_cleanly() {
        let mut params = ParamSet::new();
        params.insert("not_a_real_param".into(), dec!(1));
        let result = run_trial("bull_put", &base_strategy(), &params, &dataset(), &backtest(), &sizing(), WarmupPolicy::Pass);
        assert!(result.error.is_some());
    }

    #[test]
    fn distinct_param_tuples_on_the_same_dataset_can_diverge() {
        // §4.5 end-to-end scenario 5: two tuples must be free to produce
        // different metrics — guards against accidentally sharing the
        // root config across trials.
        let mut a = ParamSet::new();
        a.insert("dte".into(), dec!(30));
        a.insert("short_delta".into(), dec!(0.30));
        let mut b = ParamSet::new();
        b.insert("dte".into(), dec!(40));
        b.insert("short_delta".into(), dec!(0.10));

        let ds = dataset();
        let result_a = run_trial("bull_put", &base_strategy(), &a, &ds, &backtest(), &sizing(), WarmupPolicy::Pass);
        let result_b = run_trial("bull_put", &base_strategy(), &b, &ds, &backtest(), &sizing(), WarmupPolicy::Pass);
        assert!(result_a.error.is_none());
        assert!(result_b.error.is_none());
        assert_eq!(result_a.params["dte"], dec!(30));
        assert_eq!(result_b.params["dte"], dec!(40));
        // The short_delta difference (0.30 vs 0.10) selects a different
        // short strike on the same flat-price dataset, which changes the
        // entry credit and therefore the realized metrics. If
        // `run_trial_inner` ever passed `base_strategy_config` instead of
        // the routed config to `build_strategy`, both trials would run the
        // identical strategy and this would fail.
        assert_ne!(result_a.metrics, result_b.metrics);
    }
}
