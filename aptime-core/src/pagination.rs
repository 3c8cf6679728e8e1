//! Page arithmetic shared by the table view.
//!
//! Pages are one-based. A list with zero items has zero pages.

use std::ops::Range;

/// Number of pages needed for `count` items; zero when there is nothing to show.
pub fn total_pages(count: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    count.div_ceil(per_page)
}

/// Zero-based offset of the first item on `page`.
pub fn first_item_index(page: usize, per_page: usize) -> usize {
    page.saturating_sub(1).saturating_mul(per_page)
}

/// Clamp a requested page into `[1, max(total, 1)]`.
pub fn clamp_page(page: usize, total: usize) -> usize {
    page.clamp(1, total.max(1))
}

/// Index range of `page` within a list of `count` items. Empty when out of range.
pub fn page_range(count: usize, page: usize, per_page: usize) -> Range<usize> {
    let start = first_item_index(page, per_page);
    if page == 0 || start >= count {
        return 0..0;
    }
    let end = start.saturating_add(per_page).min(count);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_boundaries() {
        assert_eq!(total_pages(0, 6), 0);
        assert_eq!(total_pages(6, 6), 1);
        assert_eq!(total_pages(7, 6), 2);
        assert_eq!(total_pages(13, 6), 3);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_page_range_last_partial_page() {
        assert_eq!(page_range(13, 1, 6), 0..6);
        assert_eq!(page_range(13, 3, 6), 12..13);
        assert_eq!(page_range(13, 4, 6), 0..0);
        assert_eq!(page_range(13, 0, 6), 0..0);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(9, 3), 3);
        assert_eq!(clamp_page(4, 0), 1);
        assert_eq!(clamp_page(2, 3), 2);
    }
}

// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Page count is the ceiling of count / per_page.
        #[test]
        fn prop_total_pages_is_ceiling(count in 0usize..500, per_page in 1usize..20) {
            let total = total_pages(count, per_page);
            prop_assert!(total * per_page >= count);
            if total > 0 {
                prop_assert!((total - 1) * per_page < count);
            } else {
                prop_assert_eq!(count, 0);
            }
        }

        /// Slice length is min(p, count - (page-1)*p), or zero past the end.
        #[test]
        fn prop_slice_length(count in 0usize..200, per_page in 1usize..12, page in 1usize..40) {
            let range = page_range(count, page, per_page);
            let skipped = (page - 1) * per_page;
            let expected = if skipped >= count { 0 } else { per_page.min(count - skipped) };
            prop_assert_eq!(range.len(), expected);
            if page > total_pages(count, per_page) {
                prop_assert_eq!(range.len(), 0);
            }
        }

        /// Pages partition the list without gaps or overlap.
        #[test]
        fn prop_pages_partition_items(count in 0usize..200, per_page in 1usize..12) {
            let mut covered = 0;
            for page in 1..=total_pages(count, per_page) {
                let range = page_range(count, page, per_page);
                prop_assert_eq!(range.start, covered);
                covered = range.end;
            }
            prop_assert_eq!(covered, count);
        }
    }
}
