//! Put Calendar: sell a near-dated put, buy a far-dated put at the same
//! strike (§4.3.2).

use crate::config::{EntryConfig, ExitConfig};
use crate::model::types::WarmupPolicy;
use crate::strategies::calendar::{CalendarKind, CalendarSpread};

pub fn put_calendar(id: impl Into<String>, entry: EntryConfig, exit: ExitConfig, warmup_policy: WarmupPolicy) -> CalendarSpread {
    CalendarSpread::new(id, CalendarKind::Put, entry, exit, warmup_policy)
}
