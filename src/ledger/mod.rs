//! The client interface to the remote ledger API.
//!
//! The dashboard talks to the ledger through the [LedgerApi] trait rather
//! than a concrete client, so tests can substitute an in-memory ledger.

pub use http::HttpLedgerClient;

pub mod endpoints;
mod http;

use async_trait::async_trait;

use crate::{
    Error,
    analytics::MonthlyStat,
    models::{Account, Balance, Transaction, TransactionPage, TransactionStats},
    query::TransactionRequest,
};

/// The read operations the remote ledger API offers.
#[async_trait]
pub trait LedgerApi: Send + Sync {
    /// List the synced bank accounts.
    async fn accounts(&self) -> Result<Vec<Account>, Error>;

    /// Fetch one page of transactions matching `request`.
    async fn transactions(&self, request: &TransactionRequest) -> Result<TransactionPage, Error>;

    /// Fetch the balance snapshots from the last `days` days, optionally
    /// restricted to a single account.
    async fn balance_history(
        &self,
        days: u64,
        account_id: Option<&str>,
    ) -> Result<Vec<Balance>, Error>;

    /// Fetch the server-side monthly income/expense statistics for the
    /// last `days` days.
    async fn monthly_stats(&self, days: u64) -> Result<Vec<MonthlyStat>, Error>;

    /// Fetch aggregate totals for the last `days` days.
    async fn transaction_stats(&self, days: u64) -> Result<TransactionStats, Error>;

    /// Fetch the flat, unpaginated transaction list for the last `days`
    /// days, for client-side aggregation.
    async fn transaction_analytics(&self, days: u64) -> Result<Vec<Transaction>, Error>;
}
