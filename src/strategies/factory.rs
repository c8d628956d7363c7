//! Builds a `dyn Strategy` trait object from its config-file name and
//! `StrategyConfig` (§6 `strategies.<name>`) — the table the simulator
//! and optimizer use to turn a config document into the closed set of
//! strategies dispatched through `dyn Strategy` (§9 "Polymorphic
//! strategies: no runtime plugin loading").

use crate::config::StrategyConfig;
use crate::error::config::ConfigError;
use crate::model::types::WarmupPolicy;
use crate::strategies::base::Strategy;
use crate::strategies::{
    bear_call_spread, bear_put_spread, bull_call_spread, bull_put_spread, call_calendar, put_calendar, IronCondor,
};
use std::collections::HashMap;

/// Recognized `strategies.<name>` keys. A config naming anything else is
/// a `ConfigError`, not a silently-ignored entry.
///
/// Public so the optimizer (§4.5) can build a single strategy from a
/// trial's routed `StrategyConfig` without going through `build_all`'s
/// whole-map interface.
pub fn build_one(name: &str, config: &StrategyConfig, warmup_policy: WarmupPolicy) -> Result<Box<dyn Strategy>, ConfigError> {
    let entry = config.entry.clone();
    let exit = config.exit.clone();
    let strategy: Box<dyn Strategy> = match name {
        "bull_put" => Box::new(bull_put_spread(name, entry, exit, warmup_policy)),
        "bear_call" => Box::new(bear_call_spread(name, entry, exit, warmup_policy)),
        "bull_call" => Box::new(bull_call_spread(name, entry, exit, warmup_policy)),
        "bear_put" => Box::new(bear_put_spread(name, entry, exit, warmup_policy)),
        "call_calendar" => Box::new(call_calendar(name, entry, exit, warmup_policy)),
        "put_calendar" => Box::new(put_calendar(name, entry, exit, warmup_policy)),
        "iron_condor" => Box::new(IronCondor::new(name, entry, exit, warmup_policy)),
        other => return Err(ConfigError::UnknownStrategy(other.to_string())),
    };
    Ok(strategy)
}

/// Builds every *enabled* strategy named in `strategies`, sorted by name
/// so the simulator's entry-attempt order (§4.4 step 5) is stable across
/// runs regardless of `HashMap` iteration order.
pub fn build_all(
    strategies: &HashMap<String, StrategyConfig>,
    warmup_policy: WarmupPolicy,
) -> Result<Vec<Box<dyn Strategy>>, ConfigError> {
    let mut names: Vec<&String> = strategies.keys().collect();
    names.sort();
    names
        .into_iter()
        .filter(|name| strategies[*name].enabled)
        .map(|name| build_one(name, &strategies[name], warmup_policy))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EntryConfig, ExitConfig};
    use rust_decimal_macros::dec;

    fn sample_strategy_config() -> StrategyConfig {
        StrategyConfig {
            enabled: true,
            entry: EntryConfig {
                dte_min: 30,
                dte_max: 45,
                iv_pct_min: dec!(20),
                iv_pct_max: dec!(80),
                short_delta: dec!(0.30),
                long_delta: Some(dec!(0.20)),
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
            },
            exit: ExitConfig {
                profit_target: dec!(0.50),
                stop_loss: dec!(0.50),
                dte_min_exit: 7,
                max_underlying_move: None,
                breach_threshold: None,
            },
        }
    }

    #[test]
    fn builds_recognized_strategy_names() {
        let mut strategies = HashMap::new();
        strategies.insert("bull_put".to_string(), sample_strategy_config());
        strategies.insert("iron_condor".to_string(), sample_strategy_config());
        let built = build_all(&strategies, WarmupPolicy::Reject).unwrap();
        assert_eq!(built.len(), 2);
        // sorted by name: "bull_put" < "iron_condor"
        assert_eq!(built[0].id(), "bull_put");
        assert_eq!(built[1].id(), "iron_condor");
    }

    #[test]
    fn disabled_strategies_are_skipped() {
        let mut config = sample_strategy_config();
        config.enabled = false;
        let mut strategies = HashMap::new();
        strategies.insert("bull_put".to_string(), config);
        let built = build_all(&strategies, WarmupPolicy::Reject).unwrap();
        assert!(built.is_empty());
    }

    #[test]
    fn unrecognized_strategy_name_is_a_config_error() {
        let mut strategies = HashMap::new();
        strategies.insert("not_a_strategy".to_string(), sample_strategy_config());
        assert!(matches!(build_all(&strategies, WarmupPolicy::Reject), Err(ConfigError::UnknownStrategy(_))));
    }
}
