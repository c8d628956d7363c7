//! Position sizing (§4.3.4): fixed-risk or fractional-Kelly, capped by the
//! unused portion of the portfolio-level risk budget (§4.4) and by a hard
//! cap on the fraction of the account any single trade may risk.

use crate::config::{PositionSizingConfig, SizingMethod};
use crate::strategies::signal::EntrySignal;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

/// Account state the sizing methods read — the same totals tracked on
/// `EquityPoint`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccountState {
    pub cash: Decimal,
    pub equity: Decimal,
}

/// Win rate / payoff ratio feeding the Kelly criterion (§4.3.4), typically
/// derived from a prior backtest run rather than guessed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KellyStats {
    pub win_rate: Decimal,
    pub payoff_ratio: Decimal,
}

/// Remaining headroom under the portfolio-level `max_risk_percent` budget:
/// the fraction of equity not already committed to open positions'
/// `max_loss`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskBudget {
    pub max_risk_percent: Decimal,
    pub used_risk_percent: Decimal,
}

impl RiskBudget {
    pub fn remaining_percent(&self) -> Decimal {
        (self.max_risk_percent - self.used_risk_percent).max(Decimal::ZERO)
    }
}

/// Hard position-size cap as a fraction of account equity (§4.3.4 "never
/// exceed a hard position-size cap (default 20% of account)").
const MAX_POSITION_RISK_PCT: Decimal = dec!(0.20);

/// Returns the contract count to open for `signal`, per the fixed-risk or
/// Kelly method named in `sizing`, capped by `risk_budget`'s remaining
/// headroom and the hard 20%-of-equity cap. Returns 0 (the simulator's
/// signal to reject the entry) on any degenerate input.
pub fn size_position(
    signal: &EntrySignal,
    account: &AccountState,
    sizing: &PositionSizingConfig,
    kelly: Option<&KellyStats>,
    risk_budget: &RiskBudget,
) -> u32 {
    let max_loss_per_contract = signal.max_loss.to_dec();
    if max_loss_per_contract <= Decimal::ZERO {
        return 0;
    }

    let target_pct = match sizing.method {
        SizingMethod::Fixed => sizing.risk_per_trade_pct,
        SizingMethod::Kelly => {
            let Some(stats) = kelly else { return 0 };
            if stats.payoff_ratio <= Decimal::ZERO {
                return 0;
            }
            let q = Decimal::ONE - stats.win_rate;
            let f_star =
                ((stats.win_rate * stats.payoff_ratio - q) / stats.payoff_ratio).max(Decimal::ZERO);
            let fraction = sizing.kelly_pct.unwrap_or(dec!(0.5));
            f_star * fraction
        }
    };

    let capped_pct = target_pct.min(MAX_POSITION_RISK_PCT).min(risk_budget.remaining_percent());
    if capped_pct <= Decimal::ZERO {
        return 0;
    }

    let budget_dollars = account.equity * capped_pct;
    (budget_dollars / max_loss_per_contract).floor().to_u32().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::signal::positive_from_decimal;

    fn signal(max_loss: Decimal) -> EntrySignal {
        EntrySignal {
            strategy_id: "bull_put".into(),
            legs: vec![],
            entry_price: positive_from_decimal(dec!(1.2)),
            is_credit: true,
            max_profit: positive_from_decimal(dec!(120)),
            max_loss: positive_from_decimal(max_loss),
            near_expiration: None,
            far_expiration: None,
        }
    }

    fn fixed_sizing() -> PositionSizingConfig {
        PositionSizingConfig {
            method: SizingMethod::Fixed,
            risk_per_trade_pct: dec!(0.02),
            max_positions: 5,
            max_risk_percent: dec!(0.20),
            kelly_pct: None,
        }
    }

    fn full_budget() -> RiskBudget {
        RiskBudget { max_risk_percent: dec!(0.20), used_risk_percent: Decimal::ZERO }
    }

    #[test]
    fn fixed_risk_sizes_by_equity_fraction_over_max_loss() {
        let signal = signal(dec!(380));
        let account = AccountState { cash: dec!(100000), equity: dec!(100000) };
        let contracts = size_position(&signal, &account, &fixed_sizing(), None, &full_budget());
        // 100000 * 0.02 / 380 = 5.26 -> floors to 5
        assert_eq!(contracts, 5);
    }

    #[test]
    fn zero_max_loss_sizes_to_zero() {
        let signal = signal(Decimal::ZERO);
        let account = AccountState { cash: dec!(100000), equity: dec!(100000) };
        let contracts = size_position(&signal, &account, &fixed_sizing(), None, &full_budget());
        assert_eq!(contracts, 0);
    }

    #[test]
    fn risk_budget_headroom_caps_sizing() {
        let signal = signal(dec!(380));
        let account = AccountState { cash: dec!(100000), equity: dec!(100000) };
        let tight_budget = RiskBudget { max_risk_percent: dec!(0.20), used_risk_percent: dec!(0.199) };
        let contracts = size_position(&signal, &account, &fixed_sizing(), None, &tight_budget);
        // headroom is only 0.001 of equity: 100 / 380 floors to 0.
        assert_eq!(contracts, 0);
    }

    #[test]
    fn kelly_without_stats_sizes_to_zero() {
        let signal = signal(dec!(380));
        let account = AccountState { cash: dec!(100000), equity: dec!(100000) };
        let kelly_sizing = PositionSizingConfig {
            method: SizingMethod::Kelly,
            risk_per_trade_pct: dec!(0.02),
            max_positions: 5,
            max_risk_percent: dec!(0.20),
            kelly_pct: Some(dec!(0.5)),
        };
        let contracts = size_position(&signal, &account, &kelly_sizing, None, &full_budget());
        assert_eq!(contracts, 0);
    }

    #[test]
    fn kelly_sizes_using_fractional_criterion() {
        let signal = signal(dec!(380));
        let account = AccountState { cash: dec!(100000), equity: dec!(100000) };
        let kelly_sizing = PositionSizingConfig {
            method: SizingMethod::Kelly,
            risk_per_trade_pct: dec!(0.02),
            max_positions: 5,
            max_risk_percent: dec!(0.20),
            kelly_pct: Some(dec!(0.5)),
        };
        let stats = KellyStats { win_rate: dec!(0.6), payoff_ratio: dec!(1.5) };
        let contracts = size_position(&signal, &account, &kelly_sizing, Some(&stats), &full_budget());
        // f* = (0.6*1.5 - 0.4)/1.5 = 0.3333; *0.5 = 0.1667; 100000*0.1667/380 = 43.8 -> 43
        assert_eq!(contracts, 43);
    }
}
