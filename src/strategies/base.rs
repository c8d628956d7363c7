//! The `Strategy` trait (§4.3): the capability set every concrete strategy
//! implements. Variants are a closed set dispatched via `dyn Strategy`
//! trait objects (§9 "Polymorphic strategies") — there is no runtime
//! plugin loading.

use crate::chains::OptionChain;
use crate::config::PositionSizingConfig;
use crate::model::bar::UnderlyingBar;
use crate::model::position::Position;
use crate::strategies::signal::{EntrySignal, ExitSignal};
use crate::strategies::sizing::{self, AccountState, KellyStats, RiskBudget};

pub trait Strategy: Send + Sync {
    fn id(&self) -> &str;

    fn generate_entry(
        &self,
        day_chain: &OptionChain,
        underlying_bar: &UnderlyingBar,
        open_positions: &[Position],
    ) -> Option<EntrySignal>;

    fn generate_exit(
        &self,
        position: &Position,
        day_chain: &OptionChain,
        underlying_bar: &UnderlyingBar,
    ) -> Option<ExitSignal>;

    /// Sizing (§4.3.4) is common to every strategy; concrete strategies do
    /// not override it, they only supply the entry signal it sizes.
    fn size_position(
        &self,
        signal: &EntrySignal,
        account: &AccountState,
        sizing_config: &PositionSizingConfig,
        kelly: Option<&KellyStats>,
        risk_budget: &RiskBudget,
    ) -> u32 {
        sizing::size_position(signal, account, sizing_config, kelly, risk_budget)
    }
}
