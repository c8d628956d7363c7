//! `Dataset`: the validated, annotated `(bar, chain)` series the
//! simulator replays one trading day at a time (§4.2, §4.4 step 0).

use crate::chains::chain::OptionChain;
use crate::chains::generator::{annotate_iv_percentile, friday_expirations, generate_chain, validate_bars};
use crate::config::ChainConfig;
use crate::error::data::DataError;
use crate::holiday::HolidayCalendar;
use crate::model::bar::UnderlyingBar;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

/// Calendar days appended past the dataset's final bar when building the
/// expiration calendar. Far-leg calendar spreads entered near the end of
/// the dataset still need an expiration to price against; without this
/// margin the last `far_dte_max` or so days of the run would see no far
/// leg at all.
const EXPIRATION_HORIZON_DAYS: i64 = 120;

/// The bar series plus one generated `OptionChain` per bar, aligned by
/// index. Built once per backtest run (or once per optimizer trial) and
/// handed to the simulator as a read-only view.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub bars: Vec<UnderlyingBar>,
    pub chains: Vec<OptionChain>,
}

impl Dataset {
    /// Validates `bars` (§7 `DataError`), annotates the rolling
    /// IV-percentile statistic, and generates a synthetic chain for every
    /// day via the BSM kernel (§4.2).
    pub fn build(
        mut bars: Vec<UnderlyingBar>,
        risk_free_rate: Decimal,
        dividend_yield: Decimal,
        calendar: &dyn HolidayCalendar,
        chain_config: &ChainConfig,
    ) -> Result<Self, DataError> {
        validate_bars(&bars)?;
        annotate_iv_percentile(&mut bars);

        let from = bars.first().expect("validate_bars rejects empty").date;
        let to = bars.last().expect("validate_bars rejects empty").date + Duration::days(EXPIRATION_HORIZON_DAYS);
        let expirations = friday_expirations(from, to, calendar);

        let chains = bars
            .iter()
            .map(|bar| generate_chain(bar, &expirations, risk_free_rate, dividend_yield, calendar, chain_config))
            .collect();

        Ok(Dataset { bars, chains })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Restricts the dataset to `[start, end]` inclusive (§6
    /// `backtest.start_date`/`end_date`). The expiration calendar and IV
    /// percentiles are already annotated over the full series before
    /// slicing, so a run starting mid-series still sees a full IV
    /// warm-up window and correctly-dated far-leg expirations.
    pub fn slice(&self, start: NaiveDate, end: NaiveDate) -> Dataset {
        let mut bars = Vec::new();
        let mut chains = Vec::new();
        for (bar, chain) in self.bars.iter().zip(self.chains.iter()) {
            if bar.date >= start && bar.date <= end {
                bars.push(bar.clone());
                chains.push(chain.clone());
            }
        }
        Dataset { bars, chains }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UnderlyingBar, &OptionChain)> {
        self.bars.iter().zip(self.chains.iter())
    }
}
