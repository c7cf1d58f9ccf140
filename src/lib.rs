//! Ledgerdash is the headless core of a personal-finance dashboard.
//!
//! This library queries a remote ledger API for accounts, transactions, and
//! balances, and turns the responses into a filterable, paginated transaction
//! view plus chart-ready analytics (balance history per account and monthly
//! income/expense statistics). Rendering is left to the caller; every type
//! here is plain data.

#![warn(missing_docs)]

pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod dates;
pub mod executor;
pub mod filter;
pub mod ledger;
pub mod models;
pub mod money;
pub mod pagination;
pub mod period;
pub mod query;
#[cfg(test)]
mod test_utils;

pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use executor::{QueryExecutor, QueryStatus};
pub use filter::{FilterSet, FilterUpdate};
pub use period::TimePeriod;
pub use query::{TransactionQueryKey, TransactionRequest};

/// The errors that may occur while talking to the ledger API or preparing
/// data for display.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The configured base URL could not be parsed.
    ///
    /// Callers should pass in the offending URL string and the original
    /// parse error as a string.
    #[error("could not parse base URL \"{0}\": {1}")]
    InvalidBaseUrl(String, String),

    /// The ledger API could not be reached, or the connection failed
    /// mid-request.
    ///
    /// The error string should only be logged for debugging. A request that
    /// fails this way may succeed when retried.
    #[error("could not reach the ledger API: {0}")]
    Transport(String),

    /// The ledger API answered with a non-success status code.
    #[error("ledger API returned status {status}: {message}")]
    Api {
        /// The HTTP status code of the response.
        status: u16,
        /// The error message from the response body, or a placeholder when
        /// the body had none.
        message: String,
    },

    /// A response body could not be decoded into the expected shape.
    #[error("could not decode ledger response: {0}")]
    Decode(String),

    /// An error occurred while getting the local timezone from a canonical
    /// timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Error::Decode(value.to_string())
        } else {
            tracing::error!("request to the ledger API failed: {}", value);
            Error::Transport(value.to_string())
        }
    }
}
