//! # Model Module
//!
//! The data model from `spec.md` §3: the underlying bar series, generated
//! option quotes, a strategy's legs and position, the trade record it
//! closes into, and the two per-day ledger records (`EquityPoint`,
//! `DailyEntryLog`).
//!
//! Ownership follows §3: `UnderlyingBar` and `OptionQuote` are immutable
//! once produced and owned by the dataset; `Position` is owned
//! exclusively by the simulator's open-positions list until it closes,
//! at which point it is moved (not cloned) into a `TradeRecord`.

pub mod bar;
pub mod equity;
pub mod position;
pub mod quote;
pub mod trade;
pub mod types;

pub use bar::UnderlyingBar;
pub use equity::{DailyEntryLog, EquityPoint};
pub use position::{Leg, Position};
pub use quote::OptionQuote;
pub use trade::TradeRecord;
pub use types::{EntryBlockedReason, ExitReason, OptionType, PositionStatus, WarmupPolicy};
