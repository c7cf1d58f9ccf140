//! Filter state for the transactions view.
//!
//! Owns every user-editable filter field, the search debounce, and the
//! page-reset rules. The caller applies edits as they happen, pumps
//! [FilterSet::tick] with the current time, and rebuilds its query key
//! whenever one of these calls reports a change.

use time::{Date, Duration, OffsetDateTime};

use crate::{
    models::AccountId,
    pagination::PaginationConfig,
    query::{TransactionQueryKey, TransactionRequest, normalize_search},
};

/// How long the search input must be left alone before it takes effect.
pub const SEARCH_DEBOUNCE: Duration = Duration::milliseconds(300);

/// A text input whose value only takes effect after a quiet period.
///
/// The raw value always reflects what the user typed; the effective value
/// trails it by the configured delay. Every edit restarts the timer, so
/// only the last value in a burst of edits settles.
#[derive(Debug, Clone, PartialEq)]
pub struct DebouncedInput {
    raw: String,
    effective: String,
    deadline: Option<OffsetDateTime>,
    delay: Duration,
}

impl DebouncedInput {
    /// An empty input that settles after `delay` without edits.
    pub fn new(delay: Duration) -> Self {
        Self {
            raw: String::new(),
            effective: String::new(),
            deadline: None,
            delay,
        }
    }

    /// What the user typed, for display in the text box.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The settled value that queries should use.
    pub fn effective(&self) -> &str {
        &self.effective
    }

    /// Whether an edit is still waiting for its quiet period to elapse.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Record an edit at `now`, restarting the quiet period.
    pub fn set(&mut self, value: &str, now: OffsetDateTime) {
        self.raw = value.to_owned();
        self.deadline = Some(now + self.delay);
    }

    /// Settle the pending edit if its quiet period has elapsed by `now`.
    ///
    /// Returns true when the input settled on this call; at most one tick
    /// per edit burst does.
    pub fn tick(&mut self, now: OffsetDateTime) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.effective = self.raw.clone();
                true
            }
            _ => false,
        }
    }

    /// Settle now, without waiting out the quiet period.
    pub fn flush(&mut self) {
        self.deadline = None;
        self.effective = self.raw.clone();
    }

    /// Empty both values and drop any pending edit.
    pub fn clear(&mut self) {
        self.raw.clear();
        self.effective.clear();
        self.deadline = None;
    }
}

/// One edit to a single filter field.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterUpdate {
    /// Replace the search term. Takes effect once the debounce settles.
    Search(String),
    /// Show a single account, or every account for [None].
    Account(Option<AccountId>),
    /// Hide transactions dated before this date.
    StartDate(Option<Date>),
    /// Hide transactions dated after this date.
    EndDate(Option<Date>),
    /// Hide transactions with an amount below this value.
    MinAmount(Option<f64>),
    /// Hide transactions with an amount above this value.
    MaxAmount(Option<f64>),
}

/// Every filter the transactions view exposes, plus the current page.
///
/// Editing any filter field sends the user back to page 1. The search field
/// does so only once its debounce settles on a new effective value.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSet {
    search: DebouncedInput,
    account_id: Option<AccountId>,
    start_date: Option<Date>,
    end_date: Option<Date>,
    min_amount: Option<f64>,
    max_amount: Option<f64>,
    page: u64,
    page_size: u64,
}

impl FilterSet {
    /// A filter set with nothing set, on the configured default page.
    pub fn new(config: &PaginationConfig) -> Self {
        Self {
            search: DebouncedInput::new(SEARCH_DEBOUNCE),
            account_id: None,
            start_date: None,
            end_date: None,
            min_amount: None,
            max_amount: None,
            page: config.default_page,
            page_size: config.default_page_size,
        }
    }

    /// The search input, with its raw and effective values.
    pub fn search(&self) -> &DebouncedInput {
        &self.search
    }

    /// The account filter, if one is set.
    pub fn account_id(&self) -> Option<&AccountId> {
        self.account_id.as_ref()
    }

    /// The current page, 1-based.
    pub fn page(&self) -> u64 {
        self.page
    }

    /// How many transactions each page holds.
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Apply one filter edit at `now`.
    ///
    /// Every edit resets the page to 1. Search edits do so indirectly: the
    /// reset happens when the debounce settles on a new effective value,
    /// not on every keystroke.
    pub fn apply(&mut self, update: FilterUpdate, now: OffsetDateTime) {
        match update {
            FilterUpdate::Search(value) => {
                self.search.set(&value, now);
                return;
            }
            FilterUpdate::Account(value) => self.account_id = value,
            FilterUpdate::StartDate(value) => self.start_date = value,
            FilterUpdate::EndDate(value) => self.end_date = value,
            FilterUpdate::MinAmount(value) => self.min_amount = value,
            FilterUpdate::MaxAmount(value) => self.max_amount = value,
        }

        self.page = 1;
    }

    /// Settle the search debounce if its quiet period has elapsed by `now`.
    ///
    /// Returns true when the effective search changed, in which case the
    /// page has been reset to 1 and the query key is out of date.
    pub fn tick(&mut self, now: OffsetDateTime) -> bool {
        let before = self.search.effective().to_owned();

        if !self.search.tick(now) || self.search.effective() == before {
            return false;
        }

        self.page = 1;
        true
    }

    /// Settle the search debounce immediately.
    ///
    /// Returns true when the effective search changed, in which case the
    /// page has been reset to 1.
    pub fn flush_search(&mut self) -> bool {
        let before = self.search.effective().to_owned();
        self.search.flush();

        if self.search.effective() == before {
            return false;
        }

        self.page = 1;
        true
    }

    /// Reset every filter field to unset and return to the first page.
    ///
    /// The page size is a display preference, not a filter, so it is kept.
    pub fn clear_all(&mut self) {
        self.search.clear();
        self.account_id = None;
        self.start_date = None;
        self.end_date = None;
        self.min_amount = None;
        self.max_amount = None;
        self.page = 1;
    }

    /// Show the given page of the current results.
    pub fn set_page(&mut self, page: u64) {
        self.page = page.max(1);
    }

    /// Change how many transactions each page holds.
    ///
    /// The current page is kept; changing the size never implicitly moves
    /// the user.
    pub fn set_page_size(&mut self, page_size: u64) {
        self.page_size = page_size.max(1);
    }

    /// Apply the zero-result rule: an empty result set while off the first
    /// page sends the user back to page 1.
    ///
    /// Returns true when the page changed, in which case the caller should
    /// re-execute under the new key.
    pub fn note_result_total(&mut self, total: u64) -> bool {
        if total == 0 && self.page > 1 {
            self.page = 1;
            true
        } else {
            false
        }
    }

    /// The cache key for the query this filter set currently describes.
    ///
    /// Built from the settled search value only; keystrokes that have not
    /// settled never change the key.
    pub fn query_key(&self) -> TransactionQueryKey {
        TransactionQueryKey {
            search: normalize_search(self.search.effective()),
            account_id: self.account_id.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            page: self.page,
            page_size: self.page_size,
        }
    }

    /// The wire request for the query this filter set currently describes.
    pub fn request(&self, summary_only: bool) -> TransactionRequest {
        TransactionRequest {
            search: normalize_search(self.search.effective()),
            account_id: self.account_id.clone(),
            date_from: self.start_date,
            date_to: self.end_date,
            min_amount: self.min_amount,
            max_amount: self.max_amount,
            page: self.page,
            per_page: self.page_size,
            summary_only,
        }
    }
}
