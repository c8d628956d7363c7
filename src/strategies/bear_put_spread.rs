//! Bear Put Spread: buy a higher-strike put, sell a lower-strike put, both
//! expiring together — a defined-risk bearish debit spread (§4.3.1).

use crate::config::{EntryConfig, ExitConfig};
use crate::model::types::WarmupPolicy;
use crate::strategies::vertical::{VerticalKind, VerticalSpread};

pub fn bear_put_spread(id: impl Into<String>, entry: EntryConfig, exit: ExitConfig, warmup_policy: WarmupPolicy) -> VerticalSpread {
    VerticalSpread::new(id, VerticalKind::BearPut, entry, exit, warmup_policy)
}
