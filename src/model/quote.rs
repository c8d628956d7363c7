//! Single option quotation produced by the chain generator (§3 `OptionQuote`).

use crate::model::types::OptionType;
use chrono::NaiveDate;
use positive::Positive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One (quote_date, expiration, strike, type) row of a generated chain.
/// Immutable once produced; the simulator only ever reads these through
/// `chains::chain::OptionChain`'s index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    pub quote_date: NaiveDate,
    pub expiration: NaiveDate,
    pub strike: Positive,
    pub option_type: OptionType,
    /// Mid price.
    pub price: Positive,
    pub bid: Positive,
    pub ask: Positive,
    /// Signed delta: call delta in (0,1), put delta in (-1,0).
    pub delta: Decimal,
    pub gamma: Positive,
    /// Per calendar day (the BSM time derivative divided by 365).
    pub theta: Decimal,
    /// Per 1% change in implied volatility.
    pub vega: Positive,
    pub rho: Decimal,
    pub iv: Positive,
    pub dte: u32,
    pub underlying_price: Positive,
    pub vix: Decimal,
    pub iv_percentile: Option<Decimal>,
}

impl OptionQuote {
    pub fn abs_delta(&self) -> Decimal {
        self.delta.abs()
    }

    /// True if quote_date == expiration: the price must collapse to
    /// intrinsic value on this day (§4.1 boundary behavior).
    pub fn is_expiration_day(&self) -> bool {
        self.quote_date == self.expiration
    }
}
