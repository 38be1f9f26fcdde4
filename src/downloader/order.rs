//! Final ordering of collected star events

use crate::StarEvent;

/// Stable-sort star events by `starred_at`, oldest first
///
/// Events with equal timestamps keep their relative order.
pub fn order_by_starred_at(events: &mut [StarEvent]) {
    events.sort_by_key(|event| event.starred_at);
}
