/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 25/8/25
******************************************************************************/

//! # Prelude
//!
//! The most commonly used types, traits, and functions re-exported in one
//! place, so a caller can write:
//!
//! ```rust
//! use spy_backtest_engine::prelude::*;
//! ```
//!
//! and get the config document, the model types, the strategy trait, the
//! simulator, and the analyzer's report type without chasing individual
//! module paths.

pub use crate::analyzer::{DrawdownStats, MonthlyReturn, PerformanceReport, PortfolioGreeksPoint, analyze};
pub use crate::chains::{OptionChain, generate_chain};
pub use crate::config::{
    BacktestConfig, BacktestRunConfig, ChainConfig, EntryConfig, ExitConfig, OptimizerConfig, OptimizerMode, PositionSizingConfig, SizingMethod,
    StrategyConfig, StrikeSelection, UnderlyingConfig,
};
pub use crate::constants::{CONTRACT_MULTIPLIER, IV_PERCENTILE_WINDOW, TRADING_DAYS_PER_YEAR};
pub use crate::error::{BacktestError, ConfigError, DataError, StrategyError, TrialError};
pub use crate::holiday::{HolidayCalendar, UsFederalHolidayCalendar};
pub use crate::model::{
    DailyEntryLog, EntryBlockedReason, EquityPoint, ExitReason, Leg, OptionQuote, OptionType, Position, PositionStatus, TradeRecord, UnderlyingBar,
    WarmupPolicy,
};
pub use crate::optimizer::param::{ParamRoute, ParamSet};
pub use crate::optimizer::sampler::ParamSpec;
pub use crate::optimizer::trial::TrialResult;
pub use crate::pricing::{BsmInputs, Greeks, price_and_greeks};
pub use crate::simulator::{Dataset, Simulator, SimulatorOutput};
pub use crate::strategies::{
    AccountState, CalendarKind, CalendarSpread, EntrySignal, ExitSignal, IronCondor, KellyStats, RiskBudget, Strategy, VerticalKind, VerticalSpread,
    bear_call_spread, bear_put_spread, bull_call_spread, bull_put_spread, build_strategy, build_strategies, call_calendar, put_calendar,
};
pub use crate::utils::{TimeFrame, setup_logger, setup_logger_with_level};
