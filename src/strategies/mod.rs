//! The strategy kit (§4.3): a common `Strategy` trait plus seven concrete
//! strategies — four vertical spreads, two calendar spreads, and the Iron
//! Condor.

mod base;
mod bear_call_spread;
mod bear_put_spread;
mod bull_call_spread;
mod bull_put_spread;
mod calendar;
mod call_calendar;
mod expiry;
mod factory;
mod iron_condor;
pub(crate) mod mark;
mod put_calendar;
mod signal;
mod sizing;
mod vertical;

pub use base::Strategy;
pub use bear_call_spread::bear_call_spread;
pub use bear_put_spread::bear_put_spread;
pub use bull_call_spread::bull_call_spread;
pub use bull_put_spread::bull_put_spread;
pub use calendar::{CalendarKind, CalendarSpread};
pub use call_calendar::call_calendar;
pub use factory::{build_all as build_strategies, build_one as build_strategy};
pub use iron_condor::IronCondor;
pub use put_calendar::put_calendar;
pub use signal::{EntrySignal, ExitSignal};
pub(crate) use signal::positive_from_decimal;
pub use sizing::{AccountState, KellyStats, RiskBudget};
pub use vertical::{VerticalKind, VerticalSpread};
