//! Client-side filtering and page slicing over the loaded record sets.

use serde::Serialize;

use crate::models::{LeaveRecord, MonthYear, SummaryRecord};
use crate::utils::falls_in;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Keeps records whose employee name contains `search` (case-insensitive) or whose
/// id contains it. With `period` set, the start date must also fall in that month.
pub fn filter_leaves(
    records: &[LeaveRecord],
    search: &str,
    period: Option<MonthYear>,
) -> Vec<LeaveRecord> {
    let needle = search.trim().to_lowercase();

    records
        .iter()
        .filter(|record| matches_search(record, &needle))
        .filter(|record| period.map_or(true, |p| falls_in(&record.start_date, p)))
        .cloned()
        .collect()
}

pub fn filter_summaries(records: &[SummaryRecord], search: &str) -> Vec<SummaryRecord> {
    let needle = search.trim().to_lowercase();

    records
        .iter()
        .filter(|record| needle.is_empty() || record.employee_name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

fn matches_search(record: &LeaveRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    if record.employee_name.to_lowercase().contains(needle) {
        return true;
    }
    record
        .id
        .map(|id| id.to_string().contains(needle))
        .unwrap_or(false)
}

pub fn total_pages(count: usize, per_page: usize) -> usize {
    count.div_ceil(per_page.max(1)).max(1)
}

pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Pages always listed at each end of the navigator.
const EDGE_PAGES: usize = 2;
const PAGES_BEFORE: usize = 2;
const PAGES_AFTER: usize = 4;

/// Page numbers to offer in the navigator: both edges plus a window around
/// `current_page`. Each run of hidden pages collapses into a single `None`.
fn page_window(total_pages: usize, current_page: usize) -> Vec<Option<usize>> {
    let mut pages = Vec::new();
    let mut in_gap = false;

    for n in 1..=total_pages {
        let near_edge = n <= EDGE_PAGES || n + EDGE_PAGES > total_pages;
        let near_current = n + PAGES_BEFORE >= current_page && n <= current_page + PAGES_AFTER;

        if near_edge || near_current {
            pages.push(Some(n));
            in_gap = false;
        } else if !in_gap {
            pages.push(None);
            in_gap = true;
        }
    }

    pages
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// Page numbers for the navigator; `None` marks a gap.
    pub pages: Vec<Option<usize>>,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 1-based position of the first item on this page, 0 when empty.
    pub fn first_index(&self, per_page: usize) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * per_page.max(1) + 1
        }
    }
}

/// Slices `filtered` to the requested page. Out-of-range pages are clamped.
pub fn paginate<T: Clone>(filtered: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_pages = total_pages(filtered.len(), per_page);
    let page = clamp_page(page, total_pages);

    let start = (page - 1) * per_page;
    let end = (start + per_page).min(filtered.len());
    let items = filtered.get(start..end).map(<[T]>::to_vec).unwrap_or_default();

    Page {
        items,
        page,
        total_pages,
        total_items: filtered.len(),
        pages: page_window(total_pages, page),
    }
}
