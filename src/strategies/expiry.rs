//! Shared expiration-selection helper for single-expiration strategies
//! (verticals, Iron Condor): pick the chain's expiration whose DTE falls
//! in `[dte_min, dte_max]`, closest to the window's midpoint (§4.3.1).

use crate::chains::OptionChain;
use crate::model::types::OptionType;
use chrono::NaiveDate;

pub fn select_expiration_in_range(
    chain: &OptionChain,
    option_type: OptionType,
    dte_min: u32,
    dte_max: u32,
) -> Option<NaiveDate> {
    let midpoint = (dte_min + dte_max) / 2;
    chain
        .expirations()
        .into_iter()
        .filter_map(|expiration| {
            let strike = *chain.strikes(expiration, option_type).first()?;
            let quote = chain.get(expiration, strike, option_type)?;
            (quote.dte >= dte_min && quote.dte <= dte_max).then_some((expiration, quote.dte))
        })
        .min_by_key(|(_, dte)| dte.abs_diff(midpoint))
        .map(|(expiration, _)| expiration)
}
