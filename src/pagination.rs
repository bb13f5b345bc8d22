use serde::{Deserialize, Serialize};

/// Every feed serves fixed pages of ten posts.
pub const PAGE_SIZE: u32 = 10;

#[derive(Deserialize, Serialize, Debug)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

/// A resolved slice of a feed: the page actually served (after clamping)
/// and the LIMIT/OFFSET to hand to the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlice {
    pub page: u32,
    pub page_count: u32,
    pub limit: i64,
    pub offset: i64,
}

/// Resolves a requested page number against a total item count. Out-of-range
/// requests clamp to the last valid page; an empty collection yields an empty
/// first page. Never errors.
pub fn paginate(total: i64, requested: u32) -> PageSlice {
    let total = total.max(0);
    let page_count = (total as u64).div_ceil(PAGE_SIZE as u64) as u32;
    let page = requested.max(1).min(page_count.max(1));
    PageSlice {
        page,
        page_count,
        limit: PAGE_SIZE as i64,
        offset: (page as i64 - 1) * PAGE_SIZE as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_five_items_make_three_pages() {
        let slice = paginate(25, 1);
        assert_eq!(slice.page, 1);
        assert_eq!(slice.page_count, 3);
        assert_eq!(slice.offset, 0);

        let last = paginate(25, 3);
        assert_eq!(last.offset, 20);
    }

    #[test]
    fn page_beyond_range_clamps_to_last_page() {
        let slice = paginate(25, 4);
        assert_eq!(slice.page, 3);
        assert_eq!(slice.offset, 20);

        let slice = paginate(25, 1000);
        assert_eq!(slice.page, 3);
    }

    #[test]
    fn page_zero_is_treated_as_first_page() {
        let slice = paginate(25, 0);
        assert_eq!(slice.page, 1);
        assert_eq!(slice.offset, 0);
    }

    #[test]
    fn empty_collection_serves_an_empty_first_page() {
        let slice = paginate(0, 1);
        assert_eq!(slice.page, 1);
        assert_eq!(slice.page_count, 0);
        assert_eq!(slice.offset, 0);

        let slice = paginate(0, 7);
        assert_eq!(slice.page, 1);
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        let slice = paginate(20, 3);
        assert_eq!(slice.page, 2);
        assert_eq!(slice.page_count, 2);
    }
}
