//! Page-number pagination.
//!
//! Page numbers come straight from the query string, so resolution never
//! fails: anything that is not an integer falls back to the first page and
//! anything out of range falls back to the last one.

use serde::Serialize;

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Items in the current page
    pub items: Vec<T>,
    /// Current page number (1-indexed)
    pub number: u64,
    /// Total number of pages, at least 1
    pub num_pages: u64,
    /// Total number of items across all pages
    pub total: u64,
    pub per_page: u64,
    pub has_previous: bool,
    pub has_next: bool,
    pub previous_page_number: Option<u64>,
    pub next_page_number: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, number: u64, total: u64, per_page: u64) -> Self {
        let num_pages = num_pages(total, per_page);
        let has_previous = number > 1;
        let has_next = number < num_pages;
        Self {
            items,
            number,
            num_pages,
            total,
            per_page,
            has_previous,
            has_next,
            previous_page_number: has_previous.then(|| number - 1),
            next_page_number: has_next.then(|| number + 1),
        }
    }

    /// Offset of the first item of page `number`.
    pub fn offset(number: u64, per_page: u64) -> u64 {
        number.saturating_sub(1) * per_page
    }

    /// Convert the items, keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
            per_page: self.per_page,
            has_previous: self.has_previous,
            has_next: self.has_next,
            previous_page_number: self.previous_page_number,
            next_page_number: self.next_page_number,
        }
    }
}

/// Number of pages for `total` items. An empty listing still has one page.
pub fn num_pages(total: u64, per_page: u64) -> u64 {
    if per_page == 0 || total == 0 {
        return 1;
    }
    total.div_ceil(per_page)
}

/// Turn a raw `page` parameter into a valid page number.
pub fn resolve_page_number(raw: Option<&str>, num_pages: u64) -> u64 {
    let last = num_pages.max(1);
    let Some(raw) = raw.map(str::trim).filter(|s| is_integer(s)) else {
        return 1;
    };
    // Integers too large for i64 are still integers, just past the end.
    match raw.parse::<i64>() {
        Ok(n) if (1..=last as i64).contains(&n) => n as u64,
        _ => last,
    }
}

/// Optional sign followed by at least one ASCII digit.
fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
