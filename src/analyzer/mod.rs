//! The performance analyzer (§4.6): turns a completed run's equity curve
//! and trade list into the standard return/risk-adjusted/trade-level
//! metric set, plus monthly resampling and portfolio Greeks over time.
//!
//! * `metrics` — `PerformanceReport`, `analyze()`: the scalar metric set.
//! * `monthly` — `monthly_returns()`: month-end resampling ("ME", not
//!   the deprecated "M").
//! * `greeks` — `PortfolioGreeksPoint`, `portfolio_greeks()`: per-day
//!   signed Greeks across open positions.

pub mod greeks;
pub mod metrics;
pub mod monthly;

pub use greeks::PortfolioGreeksPoint;
pub use metrics::{DrawdownStats, PerformanceReport, analyze};
pub use monthly::MonthlyReturn;
