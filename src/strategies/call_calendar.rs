//! Call Calendar: sell a near-dated call, buy a far-dated call at the same
//! strike (§4.3.2).

use crate::config::{EntryConfig, ExitConfig};
use crate::model::types::WarmupPolicy;
use crate::strategies::calendar::{CalendarKind, CalendarSpread};

pub fn call_calendar(id: impl Into<String>, entry: EntryConfig, exit: ExitConfig, warmup_policy: WarmupPolicy) -> CalendarSpread {
    CalendarSpread::new(id, CalendarKind::Call, entry, exit, warmup_policy)
}
