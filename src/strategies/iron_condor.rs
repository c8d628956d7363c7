//! Iron Condor: short put + further-OTM long put, short call + further-OTM
//! long call, all one expiration — a defined-risk, range-bound credit
//! strategy (§4.3.3).

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

pub struct IronCondor {
    id: String,
    entry: EntryConfig,
    exit: ExitConfig,
    warmup_policy: WarmupPolicy,
}

impl IronCondor {
    pub fn new(id: impl Into<String>, entry: EntryConfig, exit: ExitConfig, warmup_policy: WarmupPolicy) -> Self {
        IronCondor { id: id.into(), entry, exit, warmup_policy }
    }

    fn target_strike(
        &self,
        chain: &OptionChain,
        expiration: chrono::NaiveDate,
        option_type: OptionType,
        target_delta: Decimal,
    ) -> Option<positive::Positive> {
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
        find_target_delta_strike(&candidates, target_delta.to_f64()?, tolerance, chain.underlying_price)
    }
}

impl Strategy for IronCondor {
    fn id(&self) -> &str {
        &self.id
    }

    fn generate_entry(
        &self,
        chain: &OptionChain,
        underlying_bar: &UnderlyingBar,
        open_positions: &[Position],
    ) -> Option<EntrySignal> {
        if open_positions.iter().any(|p| p.is_open() && p.strategy_id == self.id) {
            return None;
        }

        let iv_ok = match underlying_bar.iv_percentile {
            Some(pct) => pct >= self.entry.iv_pct_min && pct <= self.entry.iv_pct_max,
            None => self.warmup_policy == WarmupPolicy::Pass,
        };
        if !iv_ok {
            return None;
        }

        let expiration = select_expiration_in_range(chain, OptionType::Put, self.entry.dte_min, self.entry.dte_max)?;
        let long_delta = self.entry.long_delta?;

        let short_put_strike = self.target_strike(chain, expiration, OptionType::Put, self.entry.short_delta)?;
        let long_put_strike = self.target_strike(chain, expiration, OptionType::Put, long_delta)?;
        let short_call_strike = self.target_strike(chain, expiration, OptionType::Call, self.entry.short_delta)?;
        let long_call_strike = self.target_strike(chain, expiration, OptionType::Call, long_delta)?;
        if short_put_strike == long_put_strike || short_call_strike == long_call_strike {
            return None;
        }

        let short_put = chain.get(expiration, short_put_strike, OptionType::Put)?;
        let long_put = chain.get(expiration, long_put_strike, OptionType::Put)?;
        let short_call = chain.get(expiration, short_call_strike, OptionType::Call)?;
        let long_call = chain.get(expiration, long_call_strike, OptionType::Call)?;

        let put_width = (short_put_strike.to_dec() - long_put_strike.to_dec()).abs();
        let call_width = (long_call_strike.to_dec() - short_call_strike.to_dec()).abs();
        if let Some(max_width) = self.entry.max_wing_width {
            if put_width > max_width || call_width > max_width {
                return None;
            }
        }

        let total_credit = (short_put.price.to_dec() - long_put.price.to_dec())
            + (short_call.price.to_dec() - long_call.price.to_dec());
        if total_credit <= Decimal::ZERO {
            return None;
        }
        if self.entry.min_credit.is_some_and(|min| total_credit < min) {
            return None;
        }

        let wider_wing = put_width.max(call_width);
        let hundred = Decimal::from(100);
        let max_profit = total_credit * hundred;
        let max_loss = (wider_wing - total_credit) * hundred;

        let legs = vec![
            Leg {
                strike: short_put_strike,
                option_type: OptionType::Put,
                expiration,
                position: -1,
                entry_delta: short_put.delta,
                entry_price: short_put.price,
            },
            Leg {
                strike: long_put_strike,
                option_type: OptionType::Put,
                expiration,
                position: 1,
                entry_delta: long_put.delta,
                entry_price: long_put.price,
            },
            Leg {
                strike: short_call_strike,
                option_type: OptionType::Call,
                expiration,
                position: -1,
                entry_delta: short_call.delta,
                entry_price: short_call.price,
            },
            Leg {
                strike: long_call_strike,
                option_type: OptionType::Call,
                expiration,
                position: 1,
                entry_delta: long_call.delta,
                entry_price: long_call.price,
            },
        ];

        Some(EntrySignal {
            strategy_id: self.id.clone(),
            legs,
            entry_price: positive_from_decimal(total_credit),
            is_credit: true,
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
        // §4.3.1/§4.3.3 priority order: profit_target > stop_loss > dte >
        // breach > expiration (lowest) — `mark_spread` resolves an expired
        // leg to intrinsic value, so expiration only fires here once none
        // of the higher-priority exits already claimed the day.
        let current_mark = mark_spread(position, chain, underlying_bar.date)?;
        let entry_price = position.entry_price.to_dec();
        let max_profit_units = position.max_profit.to_dec() / Decimal::from(100);
        let max_loss_units = position.max_loss.to_dec() / Decimal::from(100);

        let profit = entry_price - current_mark;
        let loss = current_mark - entry_price;

        if profit >= self.exit.profit_target * max_profit_units {
            return Some(ExitSignal {
                reason: ExitReason::ProfitTarget,
                price: positive_from_decimal(current_mark),
            });
        }
        if loss >= self.exit.stop_loss * max_loss_units {
            return Some(ExitSignal { reason: ExitReason::StopLoss, price: positive_from_decimal(current_mark) });
        }

        let leg = &position.legs[0];
        if let Some(quote) = chain.get(leg.expiration, leg.strike, leg.option_type) {
            if quote.dte <= self.exit.dte_min_exit {
                return Some(ExitSignal { reason: ExitReason::Dte, price: positive_from_decimal(current_mark) });
            }
        }

        if let Some(breach_threshold) = self.exit.breach_threshold {
            let short_put = position.legs.iter().find(|l| l.option_type == OptionType::Put && l.position < 0);
            let short_call = position.legs.iter().find(|l| l.option_type == OptionType::Call && l.position < 0);
            // breach_threshold is a fraction of the strike (§8 scenario 4:
            // breach_threshold=0.02 ⇒ within 2% of the short strike), not
            // an absolute dollar distance.
            let breached = [short_put, short_call].into_iter().flatten().any(|leg| {
                let strike = leg.strike.to_dec();
                (underlying_bar.close - strike).abs() <= breach_threshold * strike
            });
            if breached {
                return Some(ExitSignal { reason: ExitReason::Breach, price: positive_from_decimal(current_mark) });
            }
        }

        if position.all_legs_expired(underlying_bar.date) {
            return Some(ExitSignal { reason: ExitReason::Expired, price: positive_from_decimal(current_mark) });
        }

        None
    }
}
