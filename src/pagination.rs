//! Fixed-size, 1-based paging over ordered result sets.

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Returns page `page` (1-based) of `items`, at most `page_size` long.
///
/// Pages past the end are empty rather than an error; a `page` of 0 is read as 1.
pub fn paginate<T, I>(page: usize, items: I, page_size: usize) -> Vec<T>
where
    I: IntoIterator<Item = T>,
{
    let start = page.max(1).saturating_sub(1).saturating_mul(page_size);
    items.into_iter().skip(start).take(page_size).collect()
}
