//! Daily underlying price bar with the volatility-proxy annotations the
//! chain generator and strategies read directly (§3 `UnderlyingBar`).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

/// One trading day of the underlying series. Immutable once produced by
/// `chains::generator::annotate_bars`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderlyingBar {
    pub date: NaiveDate,
    pub close: Decimal,
    pub vix: Decimal,
    /// `vix / 100`, the implied-volatility proxy used by the chain
    /// generator (§4.2).
    pub spy_iv: Decimal,
    /// `None` during the first `IV_PERCENTILE_WINDOW` trading days of the
    /// dataset, where the trailing window is not yet full.
    pub iv_percentile: Option<Decimal>,
}

impl UnderlyingBar {
    /// Builds a bar from raw CSV columns, deriving `spy_iv`. `iv_percentile`
    /// is left unset — it is a rolling statistic computed once across the
    /// whole series by `chains::generator::annotate_iv_percentile`.
    pub fn new(date: NaiveDate, close: Decimal, vix: Decimal) -> Self {
        let hundred = Decimal::from_i32(100).unwrap();
        UnderlyingBar {
            date,
            close,
            vix,
            spy_iv: vix / hundred,
            iv_percentile: None,
        }
    }

    pub fn is_warmup(&self) -> bool {
        self.iv_percentile.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn spy_iv_is_vix_over_hundred() {
        let bar = UnderlyingBar::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), dec!(400), dec!(18));
        assert_eq!(bar.spy_iv, dec!(0.18));
        assert!(bar.is_warmup());
    }
}
