/// One page of a larger list, with enough context to render page links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number as requested, even when out of range.
    pub current: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Slice `items` into 1-based pages of `per_page`. Requests for page 0 or
/// past the end yield an empty page rather than an error. The page number
/// comes straight from the query string, so the skip saturates instead of
/// overflowing on absurd values.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);

    let page_items = if page == 0 {
        Vec::new()
    } else {
        items
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect()
    };

    Page {
        items: page_items,
        current: page,
        total_pages,
        total_items,
    }
}
