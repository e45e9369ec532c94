use jiff::Timestamp;
use snip_core::{ClickEvent, UrlRecord};

/// Records redirect traversals on a URL record.
///
/// Callers must only hand it records that are live at `now`; the mapping
/// service guarantees that by running it under the store's expiry check.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClickTracker;

impl ClickTracker {
    /// Appends a click stamped `now` and bumps the click count by one.
    pub fn record(record: &mut UrlRecord, referrer: Option<&str>, now: Timestamp) {
        record.push_click(ClickEvent::new(now, referrer.map(str::to_owned)));
    }
}
