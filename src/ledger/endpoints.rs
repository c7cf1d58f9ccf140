//! The ledger API endpoint URIs, relative to the configured base URL.

/// The endpoint for listing the synced bank accounts.
pub const ACCOUNTS: &str = "accounts";
/// The endpoint for querying transactions with filters and pagination.
pub const TRANSACTIONS: &str = "transactions";
/// The endpoint for per-account balance history.
pub const BALANCE_HISTORY: &str = "balances/history";
/// The endpoint for server-side monthly income/expense statistics.
pub const MONTHLY_STATS: &str = "transactions/monthly-stats";
/// The endpoint for aggregate totals over a period.
pub const TRANSACTION_STATS: &str = "transactions/stats";
/// The endpoint for the flat transaction list used as the client-side
/// aggregation fallback.
pub const TRANSACTION_ANALYTICS: &str = "transactions/analytics";
