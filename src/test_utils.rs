//! Shared test fixtures: an in-memory ledger and record builders.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    Error,
    analytics::MonthlyStat,
    ledger::LedgerApi,
    models::{Account, Balance, BalanceType, Transaction, TransactionPage, TransactionStats},
    pagination::PageInfo,
    query::TransactionRequest,
};

/// A transaction with sensible defaults for tests.
pub fn create_transaction(id: &str, amount: f64, date: &str) -> Transaction {
    Transaction {
        id: id.to_owned(),
        legacy_id: None,
        account_id: "acc-001".to_owned(),
        amount,
        currency: "EUR".to_owned(),
        description: "test transaction".to_owned(),
        transaction_date: date.to_owned(),
        booking_date: None,
        creditor_name: None,
        debtor_name: None,
        reference: None,
        category: None,
        raw: None,
    }
}

/// An account with sensible defaults for tests.
pub fn create_account(id: &str, display_name: &str) -> Account {
    Account {
        id: id.to_owned(),
        institution_id: "BANK_OF_TEST".to_owned(),
        display_name: Some(display_name.to_owned()),
        balance: 0.0,
        currency: "EUR".to_owned(),
        created_at: None,
        last_synced_at: None,
    }
}

/// A balance snapshot with sensible defaults for tests.
pub fn create_balance(
    account_id: &str,
    date: &str,
    balance_type: BalanceType,
    amount: f64,
) -> Balance {
    Balance {
        account_id: account_id.to_owned(),
        amount,
        currency: "EUR".to_owned(),
        balance_type,
        reference_date: date.to_owned(),
    }
}

#[derive(Default)]
struct FakeLedgerState {
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
    balances: Vec<Balance>,
    monthly: Vec<MonthlyStat>,
    transaction_failures: u32,
    monthly_always_fails: bool,
    transaction_calls: u32,
    analytics_calls: u32,
}

/// An in-memory ledger that filters and paginates like the real API.
///
/// Failures can be injected per endpoint, and call counts are recorded so
/// tests can assert on caching and retry behaviour.
#[derive(Default)]
pub struct FakeLedger {
    state: Mutex<FakeLedgerState>,
}

impl FakeLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the synced accounts.
    pub fn set_accounts(&self, accounts: Vec<Account>) {
        self.state.lock().unwrap().accounts = accounts;
    }

    /// Replace the transaction history.
    pub fn set_transactions(&self, transactions: Vec<Transaction>) {
        self.state.lock().unwrap().transactions = transactions;
    }

    /// Replace the balance history.
    pub fn set_balances(&self, balances: Vec<Balance>) {
        self.state.lock().unwrap().balances = balances;
    }

    /// Replace the server-side monthly statistics.
    pub fn set_monthly_stats(&self, monthly: Vec<MonthlyStat>) {
        self.state.lock().unwrap().monthly = monthly;
    }

    /// Fail the next `count` transaction fetches with a server error.
    pub fn fail_next_transactions(&self, count: u32) {
        self.state.lock().unwrap().transaction_failures = count;
    }

    /// Fail every monthly stats fetch, forcing the client-side fallback.
    pub fn fail_monthly_stats(&self) {
        self.state.lock().unwrap().monthly_always_fails = true;
    }

    /// How many transaction page fetches have been made.
    pub fn transaction_calls(&self) -> u32 {
        self.state.lock().unwrap().transaction_calls
    }

    /// How many flat analytics fetches have been made.
    pub fn analytics_calls(&self) -> u32 {
        self.state.lock().unwrap().analytics_calls
    }
}

fn matches_request(transaction: &Transaction, request: &TransactionRequest) -> bool {
    if let Some(account_id) = &request.account_id
        && &transaction.account_id != account_id
    {
        return false;
    }

    if let Some(search) = &request.search {
        let needle = search.to_lowercase();
        let haystack = [
            Some(transaction.description.as_str()),
            transaction.creditor_name.as_deref(),
            transaction.debtor_name.as_deref(),
            transaction.reference.as_deref(),
        ];
        if !haystack
            .into_iter()
            .flatten()
            .any(|text| text.to_lowercase().contains(&needle))
        {
            return false;
        }
    }

    if request.date_from.is_some() || request.date_to.is_some() {
        let Some(date) = transaction.date() else {
            return false;
        };
        if request.date_from.is_some_and(|from| date < from)
            || request.date_to.is_some_and(|to| date > to)
        {
            return false;
        }
    }

    if request.min_amount.is_some_and(|min| transaction.amount < min)
        || request.max_amount.is_some_and(|max| transaction.amount > max)
    {
        return false;
    }

    true
}

#[async_trait]
impl LedgerApi for FakeLedger {
    async fn accounts(&self) -> Result<Vec<Account>, Error> {
        Ok(self.state.lock().unwrap().accounts.clone())
    }

    async fn transactions(&self, request: &TransactionRequest) -> Result<TransactionPage, Error> {
        let mut state = self.state.lock().unwrap();
        state.transaction_calls += 1;

        if state.transaction_failures > 0 {
            state.transaction_failures -= 1;
            return Err(Error::Api {
                status: 500,
                message: "injected failure".to_owned(),
            });
        }

        let matching: Vec<Transaction> = state
            .transactions
            .iter()
            .filter(|transaction| matches_request(transaction, request))
            .cloned()
            .collect();

        let pagination =
            PageInfo::from_counts(request.page, request.per_page, matching.len() as u64);
        let start = ((pagination.page - 1) * pagination.per_page) as usize;
        let transactions = matching
            .into_iter()
            .skip(start)
            .take(pagination.per_page as usize)
            .map(|mut transaction| {
                if request.summary_only {
                    transaction.raw = None;
                }
                transaction
            })
            .collect();

        Ok(TransactionPage {
            transactions,
            pagination,
        })
    }

    async fn balance_history(
        &self,
        _days: u64,
        account_id: Option<&str>,
    ) -> Result<Vec<Balance>, Error> {
        let state = self.state.lock().unwrap();

        Ok(state
            .balances
            .iter()
            .filter(|balance| account_id.is_none_or(|id| balance.account_id == id))
            .cloned()
            .collect())
    }

    async fn monthly_stats(&self, _days: u64) -> Result<Vec<MonthlyStat>, Error> {
        let state = self.state.lock().unwrap();

        if state.monthly_always_fails {
            return Err(Error::Api {
                status: 503,
                message: "injected failure".to_owned(),
            });
        }

        Ok(state.monthly.clone())
    }

    async fn transaction_stats(&self, _days: u64) -> Result<TransactionStats, Error> {
        let state = self.state.lock().unwrap();

        let mut stats = TransactionStats {
            transaction_count: state.transactions.len() as u64,
            income: 0.0,
            expenses: 0.0,
            net: 0.0,
        };
        for transaction in &state.transactions {
            if transaction.amount > 0.0 {
                stats.income += transaction.amount;
            } else {
                stats.expenses += transaction.amount.abs();
            }
        }
        stats.net = stats.income - stats.expenses;

        Ok(stats)
    }

    async fn transaction_analytics(&self, _days: u64) -> Result<Vec<Transaction>, Error> {
        let mut state = self.state.lock().unwrap();
        state.analytics_calls += 1;

        Ok(state.transactions.clone())
    }
}
