//! Parameter-name routing (§4.5 "Parameter-name routing is a key
//! contract"). The optimizer's grid/TPE samplers work over flat
//! `name -> Decimal` maps; this module is the one place that knows how a
//! flat name maps onto a nested `entry.*`/`exit.*` config slot, so that
//! mapping is an explicit, testable table rather than duck-typed dict
//! lookups (§9 "Dynamic parameter-name routing... becomes an explicit
//! routing table").
//!
//! Two names collide in spirit but not in meaning: `dte` sets both
//! `entry.dte_min` and `entry.dte_max` to the same value (the spec's
//! "single-value policy"), while `dte_min` always refers to the exit
//! DTE threshold (`exit.dte_min_exit`) — never the entry window's lower
//! bound. This module keeps them unambiguous by routing each to a
//! distinct `ParamRoute` variant rather than a shared string key.

use crate::config::{EntryConfig, ExitConfig, StrategyConfig};
use crate::error::ConfigError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::BTreeMap;

/// One optimizer-facing parameter name, already resolved to the config
/// slot(s) it writes. Closed set, per §9 — no duck-typed lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamRoute {
    /// Sets `entry.dte_min` and `entry.dte_max` to the same value.
    Dte,
    EntryIvPctMin,
    EntryIvPctMax,
    /// Single-value analogue of `Dte` for the IV-percentile window: sets
    /// both `entry.iv_pct_min` and `entry.iv_pct_max` to the same value.
    /// See `SPEC_FULL.md`/`DESIGN.md` for why this mirrors `Dte` rather
    /// than exposing only one bound.
    IvPercentile,
    ShortDelta,
    LongDelta,
    DeltaTolerance,
    MinCredit,
    MaxCredit,
    MinDebit,
    MaxDebit,
    NearDte,
    FarDte,
    DteTolerance,
    FarDteMin,
    FarDteMax,
    MaxWingWidth,
    ProfitTarget,
    StopLoss,
    /// The *exit* DTE threshold (`exit.dte_min_exit`) — spelled `dte_min`
    /// at the optimizer surface per the spec's disambiguation rule.
    DteMin,
    MaxUnderlyingMove,
    BreachThreshold,
}

/// The full name -> route table. A name absent here is rejected at
/// optimizer construction (`ConfigError::UnknownParameter`), not silently
/// ignored at trial time.
fn route_table() -> &'static [(&'static str, ParamRoute)] {
    &[
        ("dte", ParamRoute::Dte),
        ("iv_pct_min", ParamRoute::EntryIvPctMin),
        ("iv_pct_max", ParamRoute::EntryIvPctMax),
        ("iv_percentile", ParamRoute::IvPercentile),
        ("short_delta", ParamRoute::ShortDelta),
        ("long_delta", ParamRoute::LongDelta),
        ("delta_tolerance", ParamRoute::DeltaTolerance),
        ("min_credit", ParamRoute::MinCredit),
        ("max_credit", ParamRoute::MaxCredit),
        ("min_debit", ParamRoute::MinDebit),
        ("max_debit", ParamRoute::MaxDebit),
        ("near_dte", ParamRoute::NearDte),
        ("far_dte", ParamRoute::FarDte),
        ("dte_tolerance", ParamRoute::DteTolerance),
        ("far_dte_min", ParamRoute::FarDteMin),
        ("far_dte_max", ParamRoute::FarDteMax),
        ("max_wing_width", ParamRoute::MaxWingWidth),
        ("profit_target", ParamRoute::ProfitTarget),
        ("stop_loss", ParamRoute::StopLoss),
        ("dte_min", ParamRoute::DteMin),
        ("max_underlying_move", ParamRoute::MaxUnderlyingMove),
        ("breach_threshold", ParamRoute::BreachThreshold),
    ]
}

pub fn resolve(name: &str) -> Result<ParamRoute, ConfigError> {
    route_table()
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, route)| *route)
        .ok_or_else(|| ConfigError::UnknownParameter(name.to_string()))
}

/// Validates that every name in `names` resolves, at optimizer
/// construction time — so a typo in a parameter-range spec fails fast
/// rather than silently no-opping on the first trial.
pub fn validate_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<(), ConfigError> {
    for name in names {
        resolve(name)?;
    }
    Ok(())
}

fn as_u32(value: Decimal, field: &str) -> Result<u32, ConfigError> {
    value.to_u32().ok_or_else(|| ConfigError::InvalidValue {
        field: field.to_string(),
        reason: format!("optimizer value {value} does not fit in u32"),
    })
}

/// Applies one routed `(name, value)` pair onto a strategy's own
/// `entry`/`exit` sub-config — never the root document (§4.5 "Critical
/// construction rule"). Mutates in place so a full parameter tuple can be
/// folded over the same `StrategyConfig` clone.
pub fn apply(route: ParamRoute, value: Decimal, config: &mut StrategyConfig) -> Result<(), ConfigError> {
    let entry: &mut EntryConfig = &mut config.entry;
    let exit: &mut ExitConfig = &mut config.exit;
    match route {
        ParamRoute::Dte => {
            let dte = as_u32(value, "entry.dte")?;
            entry.dte_min = dte;
            entry.dte_max = dte;
        }
        ParamRoute::EntryIvPctMin => entry.iv_pct_min = value,
        ParamRoute::EntryIvPctMax => entry.iv_pct_max = value,
        ParamRoute::IvPercentile => {
            entry.iv_pct_min = value;
            entry.iv_pct_max = value;
        }
        ParamRoute::ShortDelta => entry.short_delta = value,
        ParamRoute::LongDelta => entry.long_delta = Some(value),
        ParamRoute::DeltaTolerance => entry.delta_tolerance = value,
        ParamRoute::MinCredit => entry.min_credit = Some(value),
        ParamRoute::MaxCredit => entry.max_credit = Some(value),
        ParamRoute::MinDebit => entry.min_debit = Some(value),
        ParamRoute::MaxDebit => entry.max_debit = Some(value),
        ParamRoute::NearDte => entry.near_dte = Some(as_u32(value, "entry.near_dte")?),
        ParamRoute::FarDte => entry.far_dte = Some(as_u32(value, "entry.far_dte")?),
        ParamRoute::DteTolerance => entry.dte_tolerance = Some(as_u32(value, "entry.dte_tolerance")?),
        ParamRoute::FarDteMin => entry.far_dte_min = Some(as_u32(value, "entry.far_dte_min")?),
        ParamRoute::FarDteMax => entry.far_dte_max = Some(as_u32(value, "entry.far_dte_max")?),
        ParamRoute::MaxWingWidth => entry.max_wing_width = Some(value),
        ParamRoute::ProfitTarget => exit.profit_target = value,
        ParamRoute::StopLoss => exit.stop_loss = value,
        ParamRoute::DteMin => exit.dte_min_exit = as_u32(value, "exit.dte_min_exit")?,
        ParamRoute::MaxUnderlyingMove => exit.max_underlying_move = Some(value),
        ParamRoute::BreachThreshold => exit.breach_threshold = Some(value),
    }
    Ok(())
}

/// One fully-specified trial's parameter values, keyed by the optimizer
/// name (not the resolved route) so checkpoint rows stay human-readable.
/// A `BTreeMap` rather than `HashMap` so iteration order — and therefore
/// the sorted-items tuple used to dedupe trials (§4.5 "order-independent
/// via sorted-items tuple") — is deterministic without an extra sort.
pub type ParamSet = BTreeMap<String, Decimal>;

/// Applies a full `ParamSet` onto a clone of `base`, per §4.5's
/// construction rule: the returned config is strategy-scoped, never the
/// root document.
pub fn apply_all(base: &StrategyConfig, params: &ParamSet) -> Result<StrategyConfig, ConfigError> {
    let mut config = base.clone();
    for (name, value) in params {
        let route = resolve(name)?;
        apply(route, *value, &mut config)?;
    }
    Ok(config)
}

/// The order-independent key used to detect whether a parameter tuple has
/// already been tried (§4.5 "build a set of already-tested parameter
/// tuples (order-independent via sorted-items tuple)"). `ParamSet`'s
/// `BTreeMap` ordering already makes this trivial: two maps with the same
/// entries produce the same `Vec` regardless of insertion order.
pub fn tuple_key(params: &ParamSet) -> Vec<(String, String)> {
    params.iter().map(|(k, v)| (k.clone(), v.to_string())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EntryConfig, ExitConfig};
    use rust_decimal_macros::dec;

    fn base_config() -> StrategyConfig {
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
            exit: ExitConfig { profit_target: dec!(0.50), stop_loss: dec!(0.50), dte_min_exit: 7, max_underlying_move: None, breach_threshold: None },
        }
    }

    #[test]
    fn dte_sets_both_entry_bounds() {
        let mut config = base_config();
        apply(ParamRoute::Dte, dec!(35), &mut config).unwrap();
        assert_eq!(config.entry.dte_min, 35);
        assert_eq!(config.entry.dte_max, 35);
    }

    #[test]
    fn dte_min_routes_to_exit_threshold_not_entry_window() {
        let mut config = base_config();
        apply(ParamRoute::DteMin, dec!(10), &mut config).unwrap();
        assert_eq!(config.exit.dte_min_exit, 10);
        // entry.dte_min is untouched by the `dte_min` optimizer name.
        assert_eq!(config.entry.dte_min, 30);
    }

    #[test]
    fn unknown_parameter_name_is_rejected() {
        assert!(matches!(resolve("not_a_param"), Err(ConfigError::UnknownParameter(_))));
    }

    #[test]
    fn distinct_param_tuples_apply_to_independent_clones() {
        let base = base_config();
        let mut a = ParamSet::new();
        a.insert("dte".into(), dec!(30));
        a.insert("short_delta".into(), dec!(0.30));
        let mut b = ParamSet::new();
        b.insert("dte".into(), dec!(40));
        b.insert("short_delta".into(), dec!(0.25));

        let config_a = apply_all(&base, &a).unwrap();
        let config_b = apply_all(&base, &b).unwrap();

        // Regression guard for §4.5's historical bug: two distinct
        // tuples must produce two distinct configs, not the shared base.
        assert_ne!(config_a.entry.dte_min, config_b.entry.dte_min);
        assert_ne!(config_a.entry.short_delta, config_b.entry.short_delta);
        assert_eq!(base.entry.dte_min, 30); // base itself is untouched
    }

    #[test]
    fn tuple_key_is_order_independent() {
        let mut a = ParamSet::new();
        a.insert("dte".into(), dec!(30));
        a.insert("short_delta".into(), dec!(0.30));
        let mut b = ParamSet::new();
        b.insert("short_delta".into(), dec!(0.30));
        b.insert("dte".into(), dec!(30));
        assert_eq!(tuple_key(&a), tuple_key(&b));
    }
}
