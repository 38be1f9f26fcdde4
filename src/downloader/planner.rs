//! Page range planning
//!
//! The star count reported with repository metadata is a hint, not a
//! guarantee, so the plan always covers one page past the exact boundary.
//! The trailing page legitimately comes back empty and is absorbed as
//! end-of-data by the aggregator.

use std::ops::RangeInclusive;

/// Last page index (1-based) to request: `floor(total_count / page_size) + 1`
///
/// A zero `page_size` is treated as 1.
pub fn last_page(total_count: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    let pages = (total_count / page_size).saturating_add(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// All page indices to request, `1..=last_page`
pub fn plan_pages(total_count: u64, page_size: u32) -> RangeInclusive<u32> {
    1..=last_page(total_count, page_size)
}
