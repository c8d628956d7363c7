//! Bull Call Spread: buy a lower-strike call, sell a higher-strike call,
//! both expiring together — a defined-risk bullish debit spread (§4.3.1).

use crate::config::{EntryConfig, ExitConfig};
use crate::model::types::WarmupPolicy;
use crate::strategies::vertical::{VerticalKind, VerticalSpread};

pub fn bull_call_spread(id: impl Into<String>, entry: EntryConfig, exit: ExitConfig, warmup_policy: WarmupPolicy) -> VerticalSpread {
    VerticalSpread::new(id, VerticalKind::BullCall, entry, exit, warmup_policy)
}
