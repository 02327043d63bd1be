//! Pagination over a query view
//!
//! Page indices are 1-based and always clamped into the valid range, so
//! a stale page number after a filter change degrades to the nearest
//! real page instead of an error or an empty screen.

use serde::Serialize;

use crate::record::Record;

/// One page of a view, with enough position data to render controls
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagedView {
    /// Records on the current page, in view order
    pub records: Vec<Record>,
    /// 1-based page index after clamping
    pub current_page: usize,
    /// Total page count, never less than 1
    pub total_pages: usize,
}

/// Slice a view into its `page_index`-th page of `page_size` records.
///
/// An empty view yields a single empty page. A zero page size is
/// treated as 1.
pub fn paginate(view: &[Record], page_size: usize, page_index: usize) -> PagedView {
    let size = page_size.max(1);
    let total_pages = (view.len() + size - 1) / size;
    let total_pages = total_pages.max(1);
    let current_page = page_index.clamp(1, total_pages);

    let start = (current_page - 1) * size;
    let records = view
        .iter()
        .skip(start)
        .take(size)
        .cloned()
        .collect();

    PagedView {
        records,
        current_page,
        total_pages,
    }
}
