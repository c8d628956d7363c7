//! Ambient utilities shared by the rest of the crate: `tracing` setup and
//! the trading-calendar `TimeFrame` enum used to annualize return series
//! (§4.6 Sharpe/Sortino use `TimeFrame::Day::periods_per_year()` as the
//! √252 annualization factor).

pub mod logger;
pub mod time;

pub use logger::{setup_logger, setup_logger_with_level};
pub use time::TimeFrame;
