//! Bear Call Spread: sell a lower-strike call, buy a higher-strike call,
//! both expiring together — a defined-risk bearish credit spread (§4.3.1).

use crate::config::{EntryConfig, ExitConfig};
use crate::model::types::WarmupPolicy;
use crate::strategies::vertical::{VerticalKind, VerticalSpread};

pub fn bear_call_spread(id: impl Into<String>, entry: EntryConfig, exit: ExitConfig, warmup_policy: WarmupPolicy) -> VerticalSpread {
    VerticalSpread::new(id, VerticalKind::BearCall, entry, exit, warmup_policy)
}
