//! The backtest simulator (§4.4): a single-threaded, deterministic
//! day-by-day event loop over a `Dataset`, driving the strategy kit's
//! entry/exit signals into `TradeRecord`s and an `EquityPoint` series.
//!
//! * `dataset` — `Dataset`, the validated, chain-annotated bar series the
//!   engine replays.
//! * `costs` — entry/exit cash accounting, including the round-trip
//!   commission + slippage lump charged on close.
//! * `engine` — `Simulator`, the event loop itself.

mod costs;
mod dataset;
mod engine;

pub use dataset::Dataset;
pub use engine::{Simulator, SimulatorOutput};
