//! Monthly return resampling (§4.6 "resample to month-end; `ME`
//! frequency — `M` is deprecated"). Each month's total value is taken as
//! its last trading day's `EquityPoint`, not the calendar month-end
//! itself — the dataset only has trading-day observations.

use crate::model::equity::EquityPoint;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyReturn {
    /// Last trading day observed in the month.
    pub period_end: NaiveDate,
    pub total_value: Decimal,
    pub return_pct: Decimal,
}

/// Resamples `equity_curve` to one row per calendar month, each carrying
/// the return since the prior month-end (the first month has no prior
/// observation and is emitted with `return_pct = 0`).
pub fn monthly_returns(equity_curve: &[EquityPoint]) -> Vec<MonthlyReturn> {
    let mut month_ends: Vec<&EquityPoint> = Vec::new();
    for point in equity_curve {
        match month_ends.last() {
            Some(prev) if prev.date.year() == point.date.year() && prev.date.month() == point.date.month() => {
                let last = month_ends.len() - 1;
                month_ends[last] = point;
            }
            _ => month_ends.push(point),
        }
    }

    let mut result = Vec::with_capacity(month_ends.len());
    let mut prior_value: Option<Decimal> = None;
    for point in month_ends {
        let return_pct = match prior_value {
            Some(prior) if prior > Decimal::ZERO => (point.total_value - prior) / prior,
            _ => Decimal::ZERO,
        };
        result.push(MonthlyReturn { period_end: point.date, total_value: point.total_value, return_pct });
        prior_value = Some(point.total_value);
    }
    result
}
