//! Synthetic options chain generator (§4.2): turns a dated underlying
//! price + VIX series into a daily sequence of `OptionChain`s priced by
//! the BSM kernel, plus the rolling IV-percentile annotation on the
//! underlying bars themselves.

use crate::chains::chain::OptionChain;
use crate::config::ChainConfig;
use crate::constants::IV_PERCENTILE_WINDOW;
use crate::error::data::DataError;
use crate::holiday::HolidayCalendar;
use crate::model::bar::UnderlyingBar;
use crate::model::quote::OptionQuote;
use crate::model::types::OptionType;
use crate::pricing::bsm::{price_and_greeks, BsmInputs};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use positive::{Positive, pos_or_panic};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal_macros::dec;
use tracing::warn;

/// Annotates a raw bar series with the rolling IV-percentile statistic
/// (§4.2): for each day, the share of the preceding `IV_PERCENTILE_WINDOW`
/// trading days whose `spy_iv` was strictly lower than today's. The first
/// `IV_PERCENTILE_WINDOW` bars have no full trailing window and are left
/// `None` (the "warm-up" period, §3).
pub fn annotate_iv_percentile(bars: &mut [UnderlyingBar]) {
    for i in 0..bars.len() {
        if i < IV_PERCENTILE_WINDOW {
            continue;
        }
        let window = &bars[i - IV_PERCENTILE_WINDOW..i];
        let today = bars[i].spy_iv;
        let below = window.iter().filter(|bar| bar.spy_iv < today).count();
        let pct = Decimal::from_usize_checked(below * 100)
            .unwrap_or(Decimal::ZERO)
            / Decimal::from_usize_checked(IV_PERCENTILE_WINDOW).unwrap_or(Decimal::ONE);
        bars[i].iv_percentile = Some(pct);
    }
}

/// Validates a raw bar series against §7's `DataError` conditions:
/// sorted dates, no missing mandatory columns (checked upstream at CSV
/// parse time), non-empty.
pub fn validate_bars(bars: &[UnderlyingBar]) -> Result<(), DataError> {
    if bars.is_empty() {
        return Err(DataError::EmptyDataset);
    }
    for pair in bars.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(DataError::UnsortedDates { prev: pair[0].date, next: pair[1].date });
        }
    }
    Ok(())
}

/// Returns every Friday expiration in `[from, to]`: all weeklies plus the
/// third-Friday monthlies are the same set (every Friday), holiday-rolled
/// forward (§4.2). Deduplicated and sorted.
pub fn friday_expirations(from: NaiveDate, to: NaiveDate, calendar: &dyn HolidayCalendar) -> Vec<NaiveDate> {
    let mut fridays = Vec::new();
    let mut date = from;
    while date.weekday() != Weekday::Fri {
        date = date.succ_opt().expect("date range exhausted");
    }
    while date <= to {
        fridays.push(calendar.roll_forward(date));
        date += Duration::days(7);
    }
    fridays.sort();
    fridays.dedup();
    fridays
}

/// Strike grid for one day (§4.2): ±`strike_range_pct` of spot, spaced at
/// `near_atm_spacing` within `near_atm_band_pct` of spot and
/// `wing_spacing` beyond it.
fn strike_grid(spot: Decimal, config: &ChainConfig) -> Vec<Decimal> {
    let low = (spot * (Decimal::ONE - config.strike_range_pct)).max(config.near_atm_spacing);
    let high = spot * (Decimal::ONE + config.strike_range_pct);
    let band = spot * config.near_atm_band_pct;

    let mut strikes = Vec::new();
    let mut strike = round_to_step(low, config.wing_spacing);
    while strike <= high {
        let spacing = if (strike - spot).abs() <= band { config.near_atm_spacing } else { config.wing_spacing };
        strikes.push(strike);
        strike += spacing;
    }
    strikes
}

fn round_to_step(value: Decimal, step: Decimal) -> Decimal {
    if step.is_zero() {
        return value;
    }
    (value / step).round() * step
}

fn dte_between(quote_date: NaiveDate, expiration: NaiveDate, calendar: &dyn HolidayCalendar) -> u32 {
    let mut count = 0u32;
    let mut date = quote_date;
    while date < expiration {
        date = date.succ_opt().expect("date range exhausted");
        if calendar.is_trading_day(date) {
            count += 1;
        }
    }
    count
}

/// Prices every (strike, expiration, type) combination for one trading
/// day and assembles the resulting `OptionChain`.
///
/// `bar`'s `iv_percentile` must already be set by `annotate_iv_percentile`
/// before this is called (warm-up days generate quotes with
/// `iv_percentile: None`, which the strategy kit's entry filters must
/// reject or pass per `ChainConfig::warmup_policy`).
pub fn generate_chain(
    bar: &UnderlyingBar,
    expirations: &[NaiveDate],
    risk_free_rate: Decimal,
    dividend_yield: Decimal,
    calendar: &dyn HolidayCalendar,
    config: &ChainConfig,
) -> OptionChain {
    let spot = bar.close;
    let strikes = strike_grid(spot, config);
    let mut quotes = Vec::with_capacity(strikes.len() * expirations.len() * 2);

    for &expiration in expirations {
        // Same-day expirations are intrinsic-value-only (`time_to_expiry`
        // collapses to 0 in `price_and_greeks`, which can hand back a
        // delta of exactly 0 or ±1) and would break the strict
        // `0 < |delta| < 1` invariant every other row satisfies, so the
        // chain simply doesn't quote a series expiring today.
        if expiration <= bar.date {
            continue;
        }
        let dte = dte_between(bar.date, expiration, calendar);
        let t = Decimal::from_u32(dte).unwrap_or(Decimal::ZERO).to_f64().unwrap_or(0.0) / 365.0;

        for &strike in &strikes {
            for option_type in [OptionType::Call, OptionType::Put] {
                let Some(quote) = price_quote(
                    bar, expiration, strike, dte, t, option_type, risk_free_rate, dividend_yield, config,
                ) else {
                    continue;
                };
                quotes.push(quote);
            }
        }
    }

    OptionChain::new(bar.date, spot_to_positive(spot), quotes)
}

#[allow(clippy::too_many_arguments)]
fn price_quote(
    bar: &UnderlyingBar,
    expiration: NaiveDate,
    strike: Decimal,
    dte: u32,
    time_to_expiry: f64,
    option_type: OptionType,
    risk_free_rate: Decimal,
    dividend_yield: Decimal,
    config: &ChainConfig,
) -> Option<OptionQuote> {
    let inputs = BsmInputs {
        spot: bar.close.to_f64()?,
        strike: strike.to_f64()?,
        time_to_expiry,
        risk_free_rate: risk_free_rate.to_f64()?,
        dividend_yield: dividend_yield.to_f64()?,
        volatility: bar.spy_iv.to_f64()?,
        option_type,
    };

    let greeks = match price_and_greeks(inputs) {
        Ok(greeks) => greeks,
        Err(err) => {
            warn!(%err, strike = %strike, ?expiration, "skipping unpriceable quote");
            return None;
        }
    };

    let mid = Decimal::from_f64(greeks.price)?.max(Decimal::ZERO);
    let half_spread = (mid * config.bid_ask_spread_pct).max(config.min_bid_ask_spread / dec!(2));
    let bid = (mid - half_spread).max(Decimal::ZERO);
    let ask = mid + half_spread;

    Some(OptionQuote {
        quote_date: bar.date,
        expiration,
        strike: pos_or_panic!(strike.to_f64()?),
        option_type,
        price: pos_or_panic!(mid.to_f64()?),
        bid: pos_or_panic!(bid.to_f64()?),
        ask: pos_or_panic!(ask.to_f64()?),
        delta: Decimal::from_f64(greeks.delta)?,
        gamma: pos_or_panic!(greeks.gamma.max(0.0)),
        theta: Decimal::from_f64(greeks.theta)?,
        vega: pos_or_panic!(greeks.vega.max(0.0)),
        rho: Decimal::from_f64(greeks.rho)?,
        iv: pos_or_panic!(bar.spy_iv.to_f64()?),
        dte,
        underlying_price: spot_to_positive(bar.close),
        vix: bar.vix,
        iv_percentile: bar.iv_percentile,
    })
}

fn spot_to_positive(spot: Decimal) -> Positive {
    pos_or_panic!(spot.to_f64().unwrap_or(0.0))
}
