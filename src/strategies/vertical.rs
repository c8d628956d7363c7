//! Vertical credit/debit spreads: Bull Put, Bear Call (credit) and Bull
//! Call, Bear Put (debit) (§4.3.1). One generic implementation covers all
//! four variants; `bull_put_spread.rs` and its siblings are thin named
//! constructors over it.

use crate::chains::OptionChain;
use crate::config::{EntryConfig, ExitConfig};
use crate::model::bar::UnderlyingBar;
use crate::model::position::{Leg, Position};
use crate::model::types::{ExitReason, OptionType, WarmupPolicy};
use crate::pricing::solver::{DeltaCandidate, find_target_delta_strike};
use crate::strategies::base::Strategy;
use crate::strategies::expiry::select_expiration_in_range;
use crate::strategies::mark::mark_spread;
use crate::strategies::signal::{EntrySignal, ExitSignal, positive_from_decimal};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Which of the four vertical-spread variants a `VerticalSpread` is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalKind {
    BullPut,
    BearCall,
    BullCall,
    BearPut,
}

impl VerticalKind {
    fn option_type(self) -> OptionType {
        match self {
            VerticalKind::BullPut | VerticalKind::BearPut => OptionType::Put,
            VerticalKind::BearCall | VerticalKind::BullCall => OptionType::Call,
        }
    }

    /// True for the two credit variants (§4.3.1: Bull Put sells the higher
    /// delta, Bear Call sells the lower strike).
    fn is_credit(self) -> bool {
        matches!(self, VerticalKind::BullPut | VerticalKind::BearCall)
    }
}

/// One generic two-leg vertical spread, parameterized by `kind`. The short
/// leg targets `entry.short_delta`, the long leg `entry.long_delta`.
pub struct VerticalSpread {
    id: String,
    kind: VerticalKind,
    entry: EntryConfig,
    exit: ExitConfig,
    warmup_policy: WarmupPolicy,
}

impl VerticalSpread {
    pub fn new(
        id: impl Into<String>,
        kind: VerticalKind,
        entry: EntryConfig,
        exit: ExitConfig,
        warmup_policy: WarmupPolicy,
    ) -> Self {
        VerticalSpread { id: id.into(), kind, entry, exit, warmup_policy }
    }
}

impl Strategy for VerticalSpread {
    fn id(&self) -> &str {
        &self.id
    }

    fn generate_entry(
        &self,
        chain: &OptionChain,
        underlying_bar: &UnderlyingBar,
        open_positions: &[Position],
    ) -> Option<EntrySignal> {
        if open_positions
            .iter()
            .any(|p| p.is_open() && p.strategy_id == self.id)
        {
            return None;
        }

        let iv_ok = match underlying_bar.iv_percentile {
            Some(pct) => pct >= self.entry.iv_pct_min && pct <= self.entry.iv_pct_max,
            None => self.warmup_policy == WarmupPolicy::Pass,
        };
        if !iv_ok {
            return None;
        }

        let option_type = self.kind.option_type();
        let expiration =
            select_expiration_in_range(chain, option_type, self.entry.dte_min, self.entry.dte_max)?;

        let candidates: Vec<DeltaCandidate> = chain
            .strikes(expiration, option_type)
            .iter()
            .filter_map(|&strike| {
                chain
                    .get(expiration, strike, option_type)
                    .map(|q| DeltaCandidate { strike, abs_delta: q.abs_delta() })
            })
            .collect();

        let tolerance = self.entry.delta_tolerance.to_f64()?;
        let short_strike = find_target_delta_strike(
            &candidates,
            self.entry.short_delta.to_f64()?,
            tolerance,
            chain.underlying_price,
        )?;
        let long_strike = find_target_delta_strike(
            &candidates,
            self.entry.long_delta?.to_f64()?,
            tolerance,
            chain.underlying_price,
        )?;
        if short_strike == long_strike {
            return None;
        }

        let short_quote = chain.get(expiration, short_strike, option_type)?;
        let long_quote = chain.get(expiration, long_strike, option_type)?;

        let width = (short_strike.to_dec() - long_strike.to_dec()).abs();
        let net_price = if self.kind.is_credit() {
            short_quote.price.to_dec() - long_quote.price.to_dec()
        } else {
            long_quote.price.to_dec() - short_quote.price.to_dec()
        };
        if net_price <= Decimal::ZERO {
            return None;
        }

        if self.kind.is_credit() {
            if self.entry.min_credit.is_some_and(|min| net_price < min) {
                return None;
            }
            if self.entry.max_credit.is_some_and(|max| net_price > max) {
                return None;
            }
        } else {
            if self.entry.min_debit.is_some_and(|min| net_price < min) {
                return None;
            }
            if self.entry.max_debit.is_some_and(|max| net_price > max) {
                return None;
            }
        }

        let hundred = Decimal::from(100);
        let (max_profit, max_loss) = if self.kind.is_credit() {
            (net_price * hundred, (width - net_price) * hundred)
        } else {
            ((width - net_price) * hundred, net_price * hundred)
        };

        let legs = vec![
            Leg {
                strike: short_strike,
                option_type,
                expiration,
                position: -1,
                entry_delta: short_quote.delta,
                entry_price: short_quote.price,
            },
            Leg {
                strike: long_strike,
                option_type,
                expiration,
                position: 1,
                entry_delta: long_quote.delta,
                entry_price: long_quote.price,
            },
        ];

        Some(EntrySignal {
            strategy_id: self.id.clone(),
            legs,
            entry_price: positive_from_decimal(net_price),
            is_credit: self.kind.is_credit(),
            max_profit: positive_from_decimal(max_profit),
            max_loss: positive_from_decimal(max_loss),
            near_expiration: None,
            far_expiration: None,
        })
    }

    fn generate_exit(
        &self,
        position: &Position,
        chain: &OptionChain,
        underlying_bar: &UnderlyingBar,
    ) -> Option<ExitSignal> {
        // §4.3.1 priority order: profit_target (1) > stop_loss (2) > dte (3)
        // > expiration (4, lowest) — `mark_spread` already resolves an
        // expired leg to intrinsic value, so the common case of an OTM
        // credit spread expiring worthless is caught by the profit_target
        // check below rather than being short-circuited here.
        let current_mark = mark_spread(position, chain, underlying_bar.date)?;
        let entry_price = position.entry_price.to_dec();
        let max_profit_units = position.max_profit.to_dec() / Decimal::from(100);
        let max_loss_units = position.max_loss.to_dec() / Decimal::from(100);

        let (profit, loss) = if position.is_credit {
            (entry_price - current_mark, current_mark - entry_price)
        } else {
            (current_mark - entry_price, entry_price - current_mark)
        };

        if profit >= self.exit.profit_target * max_profit_units {
            return Some(ExitSignal {
                reason: ExitReason::ProfitTarget,
                price: positive_from_decimal(current_mark),
            });
        }
        if loss >= self.exit.stop_loss * max_loss_units {
            return Some(ExitSignal {
                reason: ExitReason::StopLoss,
                price: positive_from_decimal(current_mark),
            });
        }

        let leg = &position.legs[0];
        if let Some(quote) = chain.get(leg.expiration, leg.strike, leg.option_type) {
            if quote.dte <= self.exit.dte_min_exit {
                return Some(ExitSignal { reason: ExitReason::Dte, price: positive_from_decimal(current_mark) });
            }
        }

        if position.all_legs_expired(underlying_bar.date) {
            return Some(ExitSignal { reason: ExitReason::Expired, price: positive_from_decimal(current_mark) });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::quote::OptionQuote;
    use chrono::NaiveDate;
    use positive::pos_or_panic;
    use rust_decimal_macros::dec;

    fn entry_config() -> EntryConfig {
        EntryConfig {
            dte_min: 30,
            dte_max: 45,
            iv_pct_min: dec!(20),
            iv_pct_max: dec!(80),
            short_delta: dec!(0.30),
            long_delta: Some(dec!(0.20)),
            delta_tolerance: dec!(0.05),
            min_credit: Some(dec!(0.5)),
            max_credit: Some(dec!(3.0)),
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
        ExitConfig {
            profit_target: dec!(0.50),
            stop_loss: dec!(0.50),
            dte_min_exit: 7,
            max_underlying_move: None,
            breach_threshold: None,
        }
    }

    fn quote(strike: f64, delta: Decimal, price: f64, dte: u32, expiration: NaiveDate) -> OptionQuote {
        OptionQuote {
            quote_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            expiration,
            strike: pos_or_panic!(strike),
            option_type: OptionType::Put,
            price: pos_or_panic!(price),
            bid: pos_or_panic!(price - 0.05),
            ask: pos_or_panic!(price + 0.05),
            delta,
            gamma: pos_or_panic!(0.01),
            theta: dec!(-0.02),
            vega: pos_or_panic!(0.1),
            rho: dec!(-0.01),
            iv: pos_or_panic!(0.18),
            dte,
            underlying_price: pos_or_panic!(400.0),
            vix: dec!(18),
            iv_percentile: Some(dec!(50)),
        }
    }

    fn bull_put_chain(expiration: NaiveDate) -> OptionChain {
        OptionChain::new(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            pos_or_panic!(400.0),
            vec![
                quote(390.0, dec!(-0.30), 1.80, 38, expiration),
                quote(385.0, dec!(-0.20), 0.60, 38, expiration),
                quote(380.0, dec!(-0.12), 0.30, 38, expiration),
            ],
        )
    }

    #[test]
    fn bull_put_entry_picks_credit_spread() {
        let expiration = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
        let chain = bull_put_chain(expiration);
        let bar = UnderlyingBar { date: chain.quote_date, close: dec!(400), vix: dec!(18), spy_iv: dec!(0.18), iv_percentile: Some(dec!(40)) };
        let strategy = VerticalSpread::new("bull_put_spread", VerticalKind::BullPut, entry_config(), exit_config(), WarmupPolicy::Reject);

        let signal = strategy.generate_entry(&chain, &bar, &[]).unwrap();
        assert!(signal.is_credit);
        assert_eq!(signal.entry_price, pos_or_panic!(1.20));
        assert_eq!(signal.max_profit, pos_or_panic!(120.0));
        assert_eq!(signal.max_loss, pos_or_panic!(380.0));
    }

    #[test]
    fn bull_put_skips_entry_outside_iv_band() {
        let expiration = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
        let chain = bull_put_chain(expiration);
        let bar = UnderlyingBar { date: chain.quote_date, close: dec!(400), vix: dec!(18), spy_iv: dec!(0.18), iv_percentile: Some(dec!(5)) };
        let strategy = VerticalSpread::new("bull_put_spread", VerticalKind::BullPut, entry_config(), exit_config(), WarmupPolicy::Reject);
        assert!(strategy.generate_entry(&chain, &bar, &[]).is_none());
    }

    fn open_position(expiration: NaiveDate) -> Position {
        use crate::model::types::PositionStatus;
        use uuid::Uuid;
        Position {
            id: Uuid::new_v4(),
            strategy_id: "bull_put_spread".into(),
            legs: vec![
                Leg { strike: pos_or_panic!(390.0), option_type: OptionType::Put, expiration, position: -1, entry_delta: dec!(-0.30), entry_price: pos_or_panic!(1.80) },
                Leg { strike: pos_or_panic!(385.0), option_type: OptionType::Put, expiration, position: 1, entry_delta: dec!(-0.20), entry_price: pos_or_panic!(0.60) },
            ],
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
            status: PositionStatus::Open,
            last_mark: pos_or_panic!(1.20),
        }
    }

    #[test]
    fn profit_target_exit_fires_at_expected_mark() {
        let expiration = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
        let position = open_position(expiration);
        let chain = OptionChain::new(
            NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
            pos_or_panic!(405.0),
            vec![
                quote(390.0, dec!(-0.15), 0.40, 31, expiration),
                quote(385.0, dec!(-0.08), 0.15, 31, expiration),
            ],
        );
        let bar = UnderlyingBar { date: chain.quote_date, close: dec!(405), vix: dec!(16), spy_iv: dec!(0.16), iv_percentile: Some(dec!(42)) };
        let strategy = VerticalSpread::new("bull_put_spread", VerticalKind::BullPut, entry_config(), exit_config(), WarmupPolicy::Reject);

        let signal = strategy.generate_exit(&position, &chain, &bar).unwrap();
        assert_eq!(signal.reason, ExitReason::ProfitTarget);
        assert_eq!(signal.price, pos_or_panic!(0.25));
    }

    #[test]
    fn stop_loss_threshold_depends_on_fraction() {
        let expiration = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
        let position = open_position(expiration);
        let chain = OptionChain::new(
            NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
            pos_or_panic!(391.0),
            vec![
                quote(390.0, dec!(-0.55), 2.10, 31, expiration),
                quote(385.0, dec!(-0.25), 0.30, 31, expiration),
            ],
        );
        let bar = UnderlyingBar { date: chain.quote_date, close: dec!(391), vix: dec!(22), spy_iv: dec!(0.22), iv_percentile: Some(dec!(60)) };

        let loose = ExitConfig { stop_loss: dec!(0.50), ..exit_config() };
        let loose_strategy = VerticalSpread::new("bull_put_spread", VerticalKind::BullPut, entry_config(), loose, WarmupPolicy::Reject);
        assert!(loose_strategy.generate_exit(&position, &chain, &bar).is_none());

        let tight = ExitConfig { stop_loss: dec!(0.15), ..exit_config() };
        let tight_strategy = VerticalSpread::new("bull_put_spread", VerticalKind::BullPut, entry_config(), tight, WarmupPolicy::Reject);
        let signal = tight_strategy.generate_exit(&position, &chain, &bar).unwrap();
        assert_eq!(signal.reason, ExitReason::StopLoss);
    }
}
