//! Bull Put Spread: sell a higher-strike put, buy a lower-strike put, both
//! expiring together — a defined-risk bullish credit spread (§4.3.1).

use crate::config::{EntryConfig, ExitConfig};
use crate::model::types::WarmupPolicy;
use crate::strategies::vertical::{VerticalKind, VerticalSpread};

pub fn bull_put_spread(id: impl Into<String>, entry: EntryConfig, exit: ExitConfig, warmup_policy: WarmupPolicy) -> VerticalSpread {
    VerticalSpread::new(id, VerticalKind::BullPut, entry, exit, warmup_policy)
}
