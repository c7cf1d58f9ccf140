//! This module defines the common functionality for paging data: the
//! pagination envelope the ledger returns alongside each transaction page,
//! and the page indicator strip derived from it.

use serde::{Deserialize, Serialize};

/// The config for pagination.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified.
    pub default_page: u64,
    /// The number of transactions to request per page when not specified.
    pub default_page_size: u64,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 25,
            max_pages: 5,
        }
    }
}

/// Where one page sits in a full result set.
///
/// The ledger sends this alongside every transaction page. A well-formed
/// envelope satisfies:
///
/// - `total_pages` is `ceil(total / per_page)`, or 1 when `total` is 0
/// - `has_next` is `page < total_pages`
/// - `has_prev` is `page > 1`
/// - `page` is between 1 and `total_pages`
///
/// Use [PageInfo::normalized] to repair an envelope that does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// The page this envelope describes, 1-based.
    pub page: u64,
    /// How many rows each page holds.
    pub per_page: u64,
    /// How many rows the full result set holds.
    pub total: u64,
    /// How many pages the full result set spans. At least 1, even for an
    /// empty result set.
    pub total_pages: u64,
    /// Whether a page exists after this one.
    pub has_next: bool,
    /// Whether a page exists before this one.
    pub has_prev: bool,
}

impl PageInfo {
    /// Build a well-formed envelope from raw counts.
    ///
    /// `page` is clamped into range and a `per_page` of 0 is treated as 1,
    /// so the result always satisfies the envelope rules.
    pub fn from_counts(page: u64, per_page: u64, total: u64) -> Self {
        let per_page = per_page.max(1);
        let total_pages = if total == 0 {
            1
        } else {
            total.div_ceil(per_page)
        };
        let page = page.clamp(1, total_pages);

        Self {
            page,
            per_page,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Whether this envelope satisfies the envelope rules as received.
    pub fn is_consistent(&self) -> bool {
        *self == self.normalized()
    }

    /// This envelope with the derived fields recomputed from the raw counts
    /// and the page clamped into range.
    pub fn normalized(self) -> Self {
        Self::from_counts(self.page, self.per_page, self.total)
    }
}

/// One element of the page indicator strip under a paginated table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationIndicator {
    /// A page the user can jump to.
    Page(u64),
    /// The page the user is on.
    CurrPage(u64),
    /// A gap between the windowed pages and the first/last page.
    Ellipsis,
    /// A button that goes forward one page, holding the target page.
    NextButton(u64),
    /// A button that goes back one page, holding the target page.
    BackButton(u64),
}

/// The page indicator strip for the result set described by `info`, showing
/// at most `max_pages` numbered pages around the current one.
pub fn page_indicators(info: &PageInfo, max_pages: u64) -> Vec<PaginationIndicator> {
    let info = info.normalized();
    let curr_page = info.page;
    let page_count = info.total_pages;

    let map_page = |page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    };

    let mut indicators: Vec<PaginationIndicator> = if page_count <= max_pages {
        (1..=page_count).map(map_page).collect()
    } else if curr_page <= (max_pages / 2) {
        (1..=max_pages).map(map_page).collect()
    } else if curr_page > (page_count - max_pages / 2) {
        ((page_count - max_pages + 1)..=page_count)
            .map(map_page)
            .collect()
    } else {
        ((curr_page - max_pages / 2)..=(curr_page + max_pages / 2))
            .map(map_page)
            .collect()
    };

    if page_count > max_pages {
        if curr_page > (max_pages / 2) + 1 {
            indicators.insert(0, PaginationIndicator::Page(1));
            indicators.insert(1, PaginationIndicator::Ellipsis);
        }

        if curr_page < (page_count - max_pages / 2) {
            indicators.push(PaginationIndicator::Ellipsis);
            indicators.push(PaginationIndicator::Page(page_count));
        }
    }

    if curr_page > 1 {
        indicators.insert(0, PaginationIndicator::BackButton(curr_page - 1));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}
