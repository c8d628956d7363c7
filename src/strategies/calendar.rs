//! Call and Put calendar spreads: sell the near-dated option, buy the
//! far-dated option at the same strike, same type — a volatility-term-
//! structure trade financed by a net debit (§4.3.2).

use crate::chains::OptionChain;
use crate::config::{EntryConfig, ExitConfig, StrikeSelection};
use crate::model::bar::UnderlyingBar;
use crate::model::position::{Leg, Position};
use crate::model::types::{ExitReason, OptionType, WarmupPolicy};
use crate::pricing::solver::{DeltaCandidate, find_target_delta_strike};
use crate::strategies::base::Strategy;
use crate::strategies::expiry::select_expiration_in_range;
use crate::strategies::mark::mark_spread;
use crate::strategies::signal::{EntrySignal, ExitSignal, positive_from_decimal};
use positive::Positive;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::HashSet;

/// Which leg of the calendar is the option type — Call or Put calendar
/// (§4.3.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarKind {
    Call,
    Put,
}

impl CalendarKind {
    fn option_type(self) -> OptionType {
        match self {
            CalendarKind::Call => OptionType::Call,
            CalendarKind::Put => OptionType::Put,
        }
    }
}

/// Near leg's DTE window: an explicit `[dte_min, dte_max]` unless
/// `near_dte` (a center) is set, in which case `near_dte ± dte_tolerance`
/// wins (§4.3.2 "dual DTE-selection mode").
fn near_dte_range(entry: &EntryConfig) -> (u32, u32) {
    match entry.near_dte {
        Some(center) => {
            let tolerance = entry.dte_tolerance.unwrap_or(0);
            (center.saturating_sub(tolerance), center + tolerance)
        }
        None => (entry.dte_min, entry.dte_max),
    }
}

/// Far leg's DTE window: `far_dte_min`/`far_dte_max` win if either is set,
/// otherwise `far_dte ± dte_tolerance`. `None` if neither is configured.
fn far_dte_range(entry: &EntryConfig) -> Option<(u32, u32)> {
    if entry.far_dte_min.is_some() || entry.far_dte_max.is_some() {
        return Some((entry.far_dte_min.unwrap_or(0), entry.far_dte_max.unwrap_or(u32::MAX)));
    }
    let center = entry.far_dte?;
    let tolerance = entry.dte_tolerance.unwrap_or(0);
    Some((center.saturating_sub(tolerance), center + tolerance))
}

fn select_shared_strike(
    chain: &OptionChain,
    option_type: OptionType,
    near_expiration: chrono::NaiveDate,
    far_expiration: chrono::NaiveDate,
    entry: &EntryConfig,
) -> Option<Positive> {
    let far_strikes: HashSet<Decimal> = chain
        .strikes(far_expiration, option_type)
        .iter()
        .map(|s| s.to_dec())
        .collect();
    let common: Vec<Positive> = chain
        .strikes(near_expiration, option_type)
        .iter()
        .copied()
        .filter(|s| far_strikes.contains(&s.to_dec()))
        .collect();
    if common.is_empty() {
        return None;
    }

    match entry.strike_selection.unwrap_or(StrikeSelection::Atm) {
        StrikeSelection::Atm => common
            .iter()
            .min_by_key(|s| (s.to_dec() - chain.underlying_price.to_dec()).abs())
            .copied(),
        StrikeSelection::TargetDelta => {
            let candidates: Vec<DeltaCandidate> = common
                .iter()
                .filter_map(|&strike| {
                    chain
                        .get(near_expiration, strike, option_type)
                        .map(|q| DeltaCandidate { strike, abs_delta: q.abs_delta() })
                })
                .collect();
            let tolerance = entry.delta_tolerance.to_f64()?;
            find_target_delta_strike(&candidates, entry.short_delta.to_f64()?, tolerance, chain.underlying_price)
        }
        StrikeSelection::PercentMoneyness => {
            let pct = entry.strike_moneyness_pct?;
            let target = chain.underlying_price.to_dec() * (Decimal::ONE + pct);
            common.iter().min_by_key(|s| (s.to_dec() - target).abs()).copied()
        }
    }
}

pub struct CalendarSpread {
    id: String,
    kind: CalendarKind,
    entry: EntryConfig,
    exit: ExitConfig,
    warmup_policy: WarmupPolicy,
}

impl CalendarSpread {
    pub fn new(
        id: impl Into<String>,
        kind: CalendarKind,
        entry: EntryConfig,
        exit: ExitConfig,
        warmup_policy: WarmupPolicy,
    ) -> Self {
        CalendarSpread { id: id.into(), kind, entry, exit, warmup_policy }
    }

    fn near_leg(&self, position: &Position) -> &Leg {
        let near_expiration = position.near_expiration.expect("calendar position always sets near_expiration");
        position
            .legs
            .iter()
            .find(|l| l.expiration == near_expiration)
            .expect("near leg present")
    }
}

impl Strategy for CalendarSpread {
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

        let option_type = self.kind.option_type();
        let (near_min, near_max) = near_dte_range(&self.entry);
        let (far_min, far_max) = far_dte_range(&self.entry)?;

        let near_expiration = select_expiration_in_range(chain, option_type, near_min, near_max)?;
        let far_expiration = select_expiration_in_range(chain, option_type, far_min, far_max)?;
        if far_expiration <= near_expiration {
            return None;
        }

        let strike = select_shared_strike(chain, option_type, near_expiration, far_expiration, &self.entry)?;
        let near_quote = chain.get(near_expiration, strike, option_type)?;
        let far_quote = chain.get(far_expiration, strike, option_type)?;

        let net_debit = far_quote.price.to_dec() - near_quote.price.to_dec();
        if net_debit <= Decimal::ZERO {
            return None;
        }
        if self.entry.min_debit.is_some_and(|min| net_debit < min) {
            return None;
        }
        if self.entry.max_debit.is_some_and(|max| net_debit > max) {
            return None;
        }

        let hundred = Decimal::from(100);
        let legs = vec![
            Leg {
                strike,
                option_type,
                expiration: near_expiration,
                position: -1,
                entry_delta: near_quote.delta,
                entry_price: near_quote.price,
            },
            Leg {
                strike,
                option_type,
                expiration: far_expiration,
                position: 1,
                entry_delta: far_quote.delta,
                entry_price: far_quote.price,
            },
        ];

        Some(EntrySignal {
            strategy_id: self.id.clone(),
            legs,
            entry_price: positive_from_decimal(net_debit),
            is_credit: false,
            // Calendars have no closed-form max profit/loss; the full
            // debit is the realistic worst case, and the same magnitude is
            // used as the sizing denominator's profit counterpart.
            max_profit: positive_from_decimal(net_debit * hundred),
            max_loss: positive_from_decimal(net_debit * hundred),
            near_expiration: Some(near_expiration),
            far_expiration: Some(far_expiration),
        })
    }

    fn generate_exit(
        &self,
        position: &Position,
        chain: &OptionChain,
        underlying_bar: &UnderlyingBar,
    ) -> Option<ExitSignal> {
        let near_expiration = position.near_expiration?;

        // §4.3.2 priority order: profit_target (1) > stop_loss (2) > dte of
        // near leg (3) > underlying_move (4) > near-leg expiration (5,
        // lowest) — `mark_spread` resolves an expired near leg to intrinsic
        // value, so expiration only fires once none of the higher-priority
        // exits already claimed the day.
        let current_mark = mark_spread(position, chain, underlying_bar.date)?;
        let entry_price = position.entry_price.to_dec();
        let pnl_fraction = (current_mark - entry_price) / entry_price;

        if pnl_fraction >= self.exit.profit_target {
            return Some(ExitSignal {
                reason: ExitReason::ProfitTarget,
                price: positive_from_decimal(current_mark),
            });
        }
        if pnl_fraction <= self.exit.stop_loss {
            return Some(ExitSignal { reason: ExitReason::StopLoss, price: positive_from_decimal(current_mark) });
        }

        let near_leg = self.near_leg(position);
        if let Some(quote) = chain.get(near_leg.expiration, near_leg.strike, near_leg.option_type) {
            if quote.dte <= self.exit.dte_min_exit {
                return Some(ExitSignal { reason: ExitReason::Dte, price: positive_from_decimal(current_mark) });
            }
        }

        if let Some(max_move) = self.exit.max_underlying_move {
            let strike = near_leg.strike.to_dec();
            let moved = (underlying_bar.close - strike).abs() / strike;
            if moved > max_move {
                return Some(ExitSignal {
                    reason: ExitReason::UnderlyingMove,
                    price: positive_from_decimal(current_mark),
                });
            }
        }

        if near_expiration <= underlying_bar.date {
            return Some(ExitSignal { reason: ExitReason::Expired, price: positive_from_decimal(current_mark) });
        }

        None
    }
}
