//! Portfolio-level Greeks over time (§4.6 "sum of per-position Greeks ×
//! position sign × contracts × 100"). Computed once per trading day from
//! the day's open positions and chain, alongside the equity snapshot.

use crate::chains::OptionChain;
use crate::model::position::Position;
use crate::model::types::OptionType;
use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioGreeksPoint {
    pub date: NaiveDate,
    pub delta: Decimal,
    pub gamma: Decimal,
    pub theta: Decimal,
    pub vega: Decimal,
    pub rho: Decimal,
}

fn intrinsic_delta(option_type: OptionType, spot: Decimal, strike: Decimal) -> Decimal {
    let itm = match option_type {
        OptionType::Call => spot > strike,
        OptionType::Put => spot < strike,
    };
    match (option_type, itm) {
        (OptionType::Call, true) => Decimal::ONE,
        (OptionType::Put, true) => -Decimal::ONE,
        _ => Decimal::ZERO,
    }
}

/// Sums each open position's per-leg Greeks, signed by leg direction and
/// scaled by contracts × 100. A leg whose quote is missing from today's
/// chain (expired, or a data gap) contributes its intrinsic delta only —
/// gamma/theta/vega/rho are zero for a settled leg.
pub fn portfolio_greeks(date: NaiveDate, open_positions: &[Position], chain: &OptionChain) -> PortfolioGreeksPoint {
    let hundred = Decimal::from(crate::constants::CONTRACT_MULTIPLIER);
    let mut totals = PortfolioGreeksPoint { date, delta: Decimal::ZERO, gamma: Decimal::ZERO, theta: Decimal::ZERO, vega: Decimal::ZERO, rho: Decimal::ZERO };

    for position in open_positions {
        let contracts = Decimal::from(position.contracts);
        for leg in &position.legs {
            let sign = Decimal::from(leg.position);
            if leg.expiration <= date {
                totals.delta += sign * intrinsic_delta(leg.option_type, chain.underlying_price.to_dec(), leg.strike.to_dec()) * hundred * contracts;
                continue;
            }
            let Some(quote) = chain.get(leg.expiration, leg.strike, leg.option_type) else { continue };
            totals.delta += sign * quote.delta * hundred * contracts;
            totals.gamma += sign * quote.gamma.to_dec() * hundred * contracts;
            totals.theta += sign * quote.theta * hundred * contracts;
            totals.vega += sign * quote.vega.to_dec() * hundred * contracts;
            totals.rho += sign * quote.rho * hundred * contracts;
        }
    }
    totals
}
