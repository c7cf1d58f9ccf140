//! The cache identity and wire parameters of one transactions query.

use std::fmt;

use time::Date;

use crate::{dates, models::AccountId};

/// Canonicalize a search term: trimmed, with blank meaning unset.
pub(crate) fn normalize_search(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// The canonical identity of one transactions query.
///
/// Two filter states that would fetch the same rows compare equal here, so
/// the key doubles as the executor's cache key. It is built from the
/// settled search value only; raw keystrokes never appear in a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionQueryKey {
    /// The settled search term; [None] when the search box is blank.
    pub search: Option<String>,
    /// The account filter.
    pub account_id: Option<AccountId>,
    /// The start of the date filter, inclusive.
    pub start_date: Option<Date>,
    /// The end of the date filter, inclusive.
    pub end_date: Option<Date>,
    /// The page to fetch, 1-based.
    pub page: u64,
    /// How many transactions each page holds.
    pub page_size: u64,
}

impl fmt::Display for TransactionQueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {} (size {})", self.page, self.page_size)?;
        if let Some(search) = &self.search {
            write!(f, " search=\"{search}\"")?;
        }
        if let Some(account_id) = &self.account_id {
            write!(f, " account={account_id}")?;
        }
        if let Some(start_date) = self.start_date {
            write!(f, " from={start_date}")?;
        }
        if let Some(end_date) = self.end_date {
            write!(f, " to={end_date}")?;
        }

        Ok(())
    }
}

/// The parameters for one `GET /transactions` call.
///
/// Unlike [TransactionQueryKey] this carries the amount bounds and the
/// payload mode, which the ledger needs but which do not identify a cache
/// entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRequest {
    /// Free-text search over descriptions, counterparties and references.
    pub search: Option<String>,
    /// Only return transactions for this account.
    pub account_id: Option<AccountId>,
    /// Only return transactions on or after this date.
    pub date_from: Option<Date>,
    /// Only return transactions on or before this date.
    pub date_to: Option<Date>,
    /// Only return transactions with an amount at or above this value.
    pub min_amount: Option<f64>,
    /// Only return transactions with an amount at or below this value.
    pub max_amount: Option<f64>,
    /// The page to fetch, 1-based.
    pub page: u64,
    /// How many transactions each page holds.
    pub per_page: u64,
    /// Whether to omit the raw provider payload from each record.
    pub summary_only: bool,
}

impl Default for TransactionRequest {
    fn default() -> Self {
        Self {
            search: None,
            account_id: None,
            date_from: None,
            date_to: None,
            min_amount: None,
            max_amount: None,
            page: 1,
            per_page: 25,
            summary_only: true,
        }
    }
}

impl TransactionRequest {
    /// This request, fetching the given page instead.
    pub fn with_page(self, page: u64) -> Self {
        Self { page, ..self }
    }

    /// This request, with the given page size instead.
    pub fn with_per_page(self, per_page: u64) -> Self {
        Self { per_page, ..self }
    }

    /// This request, restricted to the given account.
    pub fn with_account(self, account_id: &str) -> Self {
        Self {
            account_id: Some(account_id.to_owned()),
            ..self
        }
    }

    /// This request, with the given search term.
    pub fn with_search(self, search: &str) -> Self {
        Self {
            search: normalize_search(search),
            ..self
        }
    }

    /// The query parameters to send, in a fixed order, omitting unset
    /// filters.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(account_id) = &self.account_id {
            params.push(("account_id", account_id.clone()));
        }
        if let Some(date_from) = self.date_from {
            params.push(("date_from", dates::iso_date_string(date_from)));
        }
        if let Some(date_to) = self.date_to {
            params.push(("date_to", dates::iso_date_string(date_to)));
        }
        params.push(("page", self.page.to_string()));
        params.push(("per_page", self.per_page.to_string()));
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        params.push(("summary_only", self.summary_only.to_string()));
        if let Some(min_amount) = self.min_amount {
            params.push(("min_amount", min_amount.to_string()));
        }
        if let Some(max_amount) = self.max_amount {
            params.push(("max_amount", max_amount.to_string()));
        }

        params
    }

    /// The request as a URL query string.
    pub fn to_query_string(&self) -> String {
        serde_urlencoded::to_string(self.query_params())
            .inspect_err(|error| {
                tracing::error!("could not encode transaction request: {error}");
            })
            .unwrap_or_default()
    }
}


#[cfg(test)]
mod request_tests {
    use time::macros::date;

    use super::TransactionRequest;

    #[test]
    fn default_request_sends_only_paging_params() {
        let want = vec![
            ("page", "1".to_owned()),
            ("per_page", "25".to_owned()),
            ("summary_only", "true".to_owned()),
        ];

        let got = TransactionRequest::default().query_params();

        assert_eq!(want, got);
    }

    #[test]
    fn full_request_sends_every_filter() {
        let request = TransactionRequest {
            search: Some("flat white".to_owned()),
            account_id: Some("acc-001".to_owned()),
            date_from: Some(date!(2024 - 01 - 01)),
            date_to: Some(date!(2024 - 01 - 31)),
            min_amount: Some(-100.0),
            max_amount: Some(10.5),
            page: 3,
            per_page: 50,
            summary_only: false,
        };

        let want = vec![
            ("account_id", "acc-001".to_owned()),
            ("date_from", "2024-01-01".to_owned()),
            ("date_to", "2024-01-31".to_owned()),
            ("page", "3".to_owned()),
            ("per_page", "50".to_owned()),
            ("search", "flat white".to_owned()),
            ("summary_only", "false".to_owned()),
            ("min_amount", "-100".to_owned()),
            ("max_amount", "10.5".to_owned()),
        ];

        let got = request.query_params();

        assert_eq!(want, got);
    }

    #[test]
    fn query_string_percent_encodes_values() {
        let request = TransactionRequest::default()
            .with_account("acc-001")
            .with_search("flat white");

        let got = request.to_query_string();

        assert_eq!(
            got,
            "account_id=acc-001&page=1&per_page=25&search=flat+white&summary_only=true"
        );
    }

    #[test]
    fn builders_keep_unrelated_fields() {
        let got = TransactionRequest::default()
            .with_page(4)
            .with_per_page(10)
            .with_account("acc-002");

        assert_eq!(got.page, 4);
        assert_eq!(got.per_page, 10);
        assert_eq!(got.account_id, Some("acc-002".to_owned()));
        assert!(got.summary_only);
    }
}
