//! `OptionChain`: the per-day index over generated `OptionQuote`s (§9
//! "Chain indexing"). Built once per trading day by
//! `chains::generator::generate_chain` and handed to the simulator and
//! strategy kit as a read-only view.

use crate::model::quote::OptionQuote;
use crate::model::types::OptionType;
use chrono::NaiveDate;
use positive::Positive;
use std::collections::HashMap;

/// All option quotes for one `quote_date`, indexed for O(1) leg lookup
/// by `(expiration, strike, option_type)` and for efficient target-delta
/// solving via sorted strike arrays per `(expiration, option_type)`.
#[derive(Debug, Clone)]
pub struct OptionChain {
    pub quote_date: NaiveDate,
    pub underlying_price: Positive,
    index: HashMap<(NaiveDate, OrderedStrike, OptionType), OptionQuote>,
    strikes_by_series: HashMap<(NaiveDate, OptionType), Vec<Positive>>,
}

/// `Positive` wraps `Decimal`, which is `Eq + Hash`, but the chain needs
/// the strike as a hash-map key; this newtype exists purely so the key
/// tuple can derive `Eq + Hash` without requiring that of `Positive`
/// itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct OrderedStrike(rust_decimal::Decimal);

impl From<Positive> for OrderedStrike {
    fn from(p: Positive) -> Self {
        OrderedStrike(p.to_dec())
    }
}

impl OptionChain {
    /// Builds the index from a flat list of quotes, all sharing the same
    /// `quote_date`. Quotes are assumed already validated (no duplicate
    /// `(expiration, strike, type)` — `DataError::DuplicateRow` is raised
    /// earlier, at dataset construction, not here).
    pub fn new(quote_date: NaiveDate, underlying_price: Positive, quotes: Vec<OptionQuote>) -> Self {
        let mut index = HashMap::with_capacity(quotes.len());
        let mut strikes_by_series: HashMap<(NaiveDate, OptionType), Vec<Positive>> = HashMap::new();

        for quote in quotes {
            let key = (quote.expiration, OrderedStrike::from(quote.strike), quote.option_type);
            strikes_by_series
                .entry((quote.expiration, quote.option_type))
                .or_default()
                .push(quote.strike);
            index.insert(key, quote);
        }

        for strikes in strikes_by_series.values_mut() {
            strikes.sort();
            strikes.dedup();
        }

        OptionChain { quote_date, underlying_price, index, strikes_by_series }
    }

    pub fn get(&self, expiration: NaiveDate, strike: Positive, option_type: OptionType) -> Option<&OptionQuote> {
        self.index.get(&(expiration, OrderedStrike::from(strike), option_type))
    }

    /// Nearest-strike fallback for a missing leg quote (§4.4 "attempt
    /// nearest-strike/nearest-expiration fallback within a tight
    /// tolerance"). `tolerance` bounds how far the returned strike may be
    /// from `strike`; returns `None` if nothing within tolerance exists.
    pub fn nearest(
        &self,
        expiration: NaiveDate,
        strike: Positive,
        option_type: OptionType,
        tolerance: Positive,
    ) -> Option<&OptionQuote> {
        let strikes = self.strikes_by_series.get(&(expiration, option_type))?;
        let target = strike.to_dec();
        let closest = strikes
            .iter()
            .min_by_key(|candidate| (candidate.to_dec() - target).abs())?;
        if (closest.to_dec() - target).abs() > tolerance.to_dec() {
            return None;
        }
        self.get(expiration, *closest, option_type)
    }

    /// Sorted, deduplicated strikes for one `(expiration, option_type)`
    /// series — the slice the target-delta solver scans.
    pub fn strikes(&self, expiration: NaiveDate, option_type: OptionType) -> &[Positive] {
        self.strikes_by_series
            .get(&(expiration, option_type))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All expirations present in this day's chain, sorted ascending.
    pub fn expirations(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.strikes_by_series.keys().map(|(date, _)| *date).collect();
        dates.sort();
        dates.dedup();
        dates
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Every quote in this day's chain, in no particular order.
    pub fn quotes(&self) -> impl Iterator<Item = &OptionQuote> {
        self.index.values()
    }
}
