//! Configuration tree (§6): a `serde`-deserializable document mirroring
//! the spec's YAML shape, validated at load time into typed structs so
//! malformed configuration becomes a `ConfigError` before a single
//! trading day is simulated.

use crate::error::config::ConfigError;
use crate::model::types::WarmupPolicy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `underlying`: {symbol, risk_free_rate, dividend_yield}.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderlyingConfig {
    pub symbol: String,
    pub risk_free_rate: Decimal,
    pub dividend_yield: Decimal,
}

/// Chain-generation knobs (§4.2). Not named in the spec's §6 table
/// directly, but every field it describes (spread model, strike grid)
/// has to live somewhere configurable — grouped here since they are all
/// properties of the synthetic dataset, not of any one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub strike_range_pct: Decimal,
    pub near_atm_spacing: Decimal,
    pub wing_spacing: Decimal,
    pub near_atm_band_pct: Decimal,
    pub bid_ask_spread_pct: Decimal,
    pub min_bid_ask_spread: Decimal,
    pub warmup_policy: WarmupPolicy,
}

impl Default for ChainConfig {
    fn default() -> Self {
        ChainConfig {
            strike_range_pct: dec!(0.20),
            near_atm_spacing: dec!(1),
            wing_spacing: dec!(5),
            near_atm_band_pct: dec!(0.10),
            bid_ask_spread_pct: dec!(0.02),
            min_bid_ask_spread: dec!(0.05),
            warmup_policy: WarmupPolicy::Reject,
        }
    }
}

/// `backtest`: {start_date, end_date, initial_capital,
/// commission_per_contract, slippage_pct}.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub initial_capital: Decimal,
    pub commission_per_contract: Decimal,
    pub slippage_pct: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingMethod {
    Fixed,
    Kelly,
}

/// `position_sizing`: {method, risk_per_trade_pct, max_positions,
/// max_risk_percent, kelly_pct}.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSizingConfig {
    pub method: SizingMethod,
    pub risk_per_trade_pct: Decimal,
    pub max_positions: u32,
    pub max_risk_percent: Decimal,
    #[serde(default)]
    pub kelly_pct: Option<Decimal>,
}

/// Entry filter thresholds shared by the vertical-spread and
/// calendar-spread strategies (§4.3.1, §4.3.2); Iron Condor reuses the
/// delta/dte/iv fields and leaves the credit/debit bounds unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryConfig {
    pub dte_min: u32,
    pub dte_max: u32,
    pub iv_pct_min: Decimal,
    pub iv_pct_max: Decimal,
    pub short_delta: Decimal,
    #[serde(default)]
    pub long_delta: Option<Decimal>,
    pub delta_tolerance: Decimal,
    #[serde(default)]
    pub min_credit: Option<Decimal>,
    #[serde(default)]
    pub max_credit: Option<Decimal>,
    #[serde(default)]
    pub min_debit: Option<Decimal>,
    #[serde(default)]
    pub max_debit: Option<Decimal>,
    /// Calendar-only: far leg's DTE, selected around `far_dte_center` per
    /// §4.3.2 "dual DTE-selection mode".
    #[serde(default)]
    pub far_dte_min: Option<u32>,
    #[serde(default)]
    pub far_dte_max: Option<u32>,
    /// Calendar-only: center of the near leg's DTE window, used when
    /// `dte_min`/`dte_max` are left at their defaults (§4.3.2 "if either
    /// min or max is specified for a leg, min/max wins; otherwise
    /// center±tolerance is used").
    #[serde(default)]
    pub near_dte: Option<u32>,
    #[serde(default)]
    pub far_dte: Option<u32>,
    #[serde(default)]
    pub dte_tolerance: Option<u32>,
    /// Calendar-only: how the shared strike is picked.
    #[serde(default)]
    pub strike_selection: Option<StrikeSelection>,
    /// Calendar-only: required when `strike_selection` is `PercentMoneyness`.
    #[serde(default)]
    pub strike_moneyness_pct: Option<Decimal>,
    /// Iron Condor-only: reject any wing wider than this.
    #[serde(default)]
    pub max_wing_width: Option<Decimal>,
}

/// Calendar-spread strike selection mode (§4.3.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrikeSelection {
    Atm,
    TargetDelta,
    PercentMoneyness,
}

/// Exit condition thresholds (§4.3.1, §4.3.2, §4.3.3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitConfig {
    pub profit_target: Decimal,
    pub stop_loss: Decimal,
    pub dte_min_exit: u32,
    #[serde(default)]
    pub max_underlying_move: Option<Decimal>,
    #[serde(default)]
    pub breach_threshold: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub enabled: bool,
    pub entry: EntryConfig,
    pub exit: ExitConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerMode {
    Auto,
    Grid,
    Optuna,
}

/// `optimizer`: {mode, n_trials, checkpoint_every, n_startup_trials,
/// enable_pruning, grid_threshold}.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    pub mode: OptimizerMode,
    pub n_trials: usize,
    pub checkpoint_every: usize,
    pub n_startup_trials: usize,
    pub enable_pruning: bool,
    pub grid_threshold: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRunConfig {
    pub underlying: UnderlyingConfig,
    #[serde(default)]
    pub chain: ChainConfig,
    pub backtest: BacktestConfig,
    pub position_sizing: PositionSizingConfig,
    pub strategies: HashMap<String, StrategyConfig>,
    pub optimizer: OptimizerConfig,
}

impl BacktestRunConfig {
    /// Parses and validates a YAML-shaped config document (§6). Returns
    /// `ConfigError` before any trading day is simulated if anything is
    /// inconsistent.
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        let config: BacktestRunConfig =
            serde_yaml::from_str(source).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backtest.start_date >= self.backtest.end_date {
            return Err(ConfigError::RangeOrder {
                lower: "start_date".into(),
                lower_value: self.backtest.start_date.to_string(),
                upper: "end_date".into(),
                upper_value: self.backtest.end_date.to_string(),
            });
        }
        if self.backtest.initial_capital <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "backtest.initial_capital".into(),
                reason: "must be positive".into(),
            });
        }
        if self.position_sizing.method == SizingMethod::Kelly && self.position_sizing.kelly_pct.is_none() {
            return Err(ConfigError::MissingKey {
                strategy: "position_sizing".into(),
                key: "kelly_pct".into(),
            });
        }

        for (name, strategy) in &self.strategies {
            if !strategy.enabled {
                continue;
            }
            validate_strategy(name, strategy)?;
        }

        if self.optimizer.n_trials == 0 {
            return Err(ConfigError::InvalidValue {
                field: "optimizer.n_trials".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

/// Per-strategy validation shared by `BacktestRunConfig::validate` (over
/// every enabled strategy in a loaded document) and the optimizer (over a
/// single trial's routed `StrategyConfig`, §4.5) — a parameter
/// combination that produces an inverted DTE window or an invalid
/// calendar stop-loss sign is a `TrialError`, not silently tolerated.
pub fn validate_strategy(name: &str, strategy: &StrategyConfig) -> Result<(), ConfigError> {
    if strategy.entry.dte_min > strategy.entry.dte_max {
        return Err(ConfigError::RangeOrder {
            lower: format!("strategies.{name}.entry.dte_min"),
            lower_value: strategy.entry.dte_min.to_string(),
            upper: format!("strategies.{name}.entry.dte_max"),
            upper_value: strategy.entry.dte_max.to_string(),
        });
    }
    if strategy.entry.iv_pct_min > strategy.entry.iv_pct_max {
        return Err(ConfigError::RangeOrder {
            lower: format!("strategies.{name}.entry.iv_pct_min"),
            lower_value: strategy.entry.iv_pct_min.to_string(),
            upper: format!("strategies.{name}.entry.iv_pct_max"),
            upper_value: strategy.entry.iv_pct_max.to_string(),
        });
    }
    // Calendar spreads express stop_loss as a negative fraction of
    // the debit (§4.3.2); this is part of the public contract.
    if name.contains("calendar") && strategy.exit.stop_loss >= Decimal::ZERO {
        return Err(ConfigError::PositiveCalendarStopLoss(strategy.exit.stop_loss));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> String {
        r#"
underlying:
  symbol: SPY
  risk_free_rate: 0.05
  dividend_yield: 0.013
backtest:
  start_date: 2023-01-01
  end_date: 2023-12-31
  initial_capital: 100000
  commission_per_contract: 0.65
  slippage_pct: 0.01
position_sizing:
  method: fixed
  risk_per_trade_pct: 0.02
  max_positions: 5
  max_risk_percent: 0.20
strategies:
  bull_put:
    enabled: true
    entry:
      dte_min: 30
      dte_max: 45
      iv_pct_min: 20
      iv_pct_max: 80
      short_delta: 0.30
      long_delta: 0.20
      delta_tolerance: 0.05
      min_credit: 0.5
      max_credit: 3.0
    exit:
      profit_target: 0.50
      stop_loss: 0.50
      dte_min_exit: 7
optimizer:
  mode: auto
  n_trials: 100
  checkpoint_every: 10
  n_startup_trials: 10
  enable_pruning: false
  grid_threshold: 1000
"#
        .to_string()
    }

    #[test]
    fn parses_and_validates_sample_config() {
        let config = BacktestRunConfig::from_yaml(&sample_yaml()).unwrap();
        assert_eq!(config.underlying.symbol, "SPY");
        assert_eq!(config.strategies.len(), 1);
    }

    #[test]
    fn rejects_start_date_after_end_date() {
        let mut config = BacktestRunConfig::from_yaml(&sample_yaml()).unwrap();
        config.backtest.start_date = config.backtest.end_date;
        assert!(matches!(config.validate(), Err(ConfigError::RangeOrder { .. })));
    }

    #[test]
    fn rejects_inverted_dte_window() {
        let mut config = BacktestRunConfig::from_yaml(&sample_yaml()).unwrap();
        let strategy = config.strategies.get_mut("bull_put").unwrap();
        strategy.entry.dte_min = 50;
        assert!(matches!(config.validate(), Err(ConfigError::RangeOrder { .. })));
    }

    #[test]
    fn rejects_kelly_without_kelly_pct() {
        let mut config = BacktestRunConfig::from_yaml(&sample_yaml()).unwrap();
        config.position_sizing.method = SizingMethod::Kelly;
        config.position_sizing.kelly_pct = None;
        assert!(matches!(config.validate(), Err(ConfigError::MissingKey { .. })));
    }

    #[test]
    fn rejects_non_negative_calendar_stop_loss() {
        let mut config = BacktestRunConfig::from_yaml(&sample_yaml()).unwrap();
        let mut calendar = config.strategies.get("bull_put").unwrap().clone();
        calendar.exit.stop_loss = dec!(0.50);
        config.strategies.insert("call_calendar".into(), calendar);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PositiveCalendarStopLoss(_))
        ));
    }
}
