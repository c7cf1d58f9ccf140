//! The dashboard facade: one object wiring the filters, the query
//! executor, and the analytics aggregations together.
//!
//! Nothing here refetches on its own. The caller edits filters, pumps the
//! debounce, and asks for a refresh when it wants fresh data, so every
//! network round trip is visible at the call site.

use std::sync::Arc;

use crate::{
    Error,
    analytics::{self, BalanceSeriesPoint, MonthlyStat},
    config::DashboardConfig,
    dates,
    executor::{QueryExecutor, QueryStatus},
    filter::{FilterSet, FilterUpdate},
    ledger::LedgerApi,
    models::{Account, TransactionStats},
    pagination::{self, PaginationIndicator},
    period::TimePeriod,
};

/// The balance history of every reporting account, shaped for a line chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceOverview {
    /// The day/month/year label of each charted date, in calendar order.
    pub labels: Vec<String>,
    /// One (legend label, values) pair per account, aligned with `labels`.
    /// A value is [None] on dates the account did not report.
    pub series: Vec<(String, Vec<Option<f64>>)>,
    /// The underlying series points, for table views.
    pub points: Vec<BalanceSeriesPoint>,
}

/// The transaction query and analytics core behind one dashboard view.
pub struct Dashboard {
    config: DashboardConfig,
    ledger: Arc<dyn LedgerApi>,
    filters: FilterSet,
    executor: QueryExecutor,
}

impl Dashboard {
    /// A dashboard over `ledger` with nothing filtered yet.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] when the configured timezone
    /// is not a canonical timezone name.
    pub fn new(config: DashboardConfig, ledger: Arc<dyn LedgerApi>) -> Result<Self, Error> {
        dates::local_now(&config.timezone)?;

        Ok(Self {
            filters: FilterSet::new(&config.pagination),
            executor: QueryExecutor::new(Arc::clone(&ledger)),
            config,
            ledger,
        })
    }

    /// The current filter state.
    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Apply one filter edit.
    ///
    /// Search edits start the debounce; everything else takes effect (and
    /// resets the page) immediately. Call [Dashboard::refresh_transactions]
    /// afterwards to fetch under the new filters.
    pub fn apply_filter(&mut self, update: FilterUpdate) -> Result<(), Error> {
        let now = dates::local_now(&self.config.timezone)?;

        // Amount bounds ride on the request but not the query key, so every
        // cached page predates an amount edit and must be dropped.
        let drops_cache = matches!(
            update,
            FilterUpdate::MinAmount(_) | FilterUpdate::MaxAmount(_)
        );

        self.filters.apply(update, now);
        if drops_cache {
            self.executor.invalidate_all();
        }

        Ok(())
    }

    /// Settle the search debounce if its quiet period has elapsed.
    ///
    /// Returns true when the effective search changed and the caller should
    /// refresh.
    pub fn tick(&mut self) -> Result<bool, Error> {
        let now = dates::local_now(&self.config.timezone)?;

        Ok(self.filters.tick(now))
    }

    /// Settle the search debounce immediately, e.g. when the user presses
    /// enter in the search box.
    pub fn flush_search(&mut self) -> bool {
        self.filters.flush_search()
    }

    /// Reset every filter and return to the first page.
    pub fn clear_filters(&mut self) {
        self.filters.clear_all();
    }

    /// Show the given page of the current results.
    pub fn set_page(&mut self, page: u64) {
        self.filters.set_page(page);
    }

    /// Change how many transactions each page holds.
    pub fn set_page_size(&mut self, page_size: u64) {
        self.filters.set_page_size(page_size);
    }

    /// Fetch (or serve from cache) the transactions page the filters
    /// currently describe.
    ///
    /// Applies the zero-result rule: a result with no matches while off the
    /// first page sends the filters back to page 1 and re-executes under
    /// the new key.
    pub async fn refresh_transactions(&mut self) -> QueryStatus {
        self.execute_current();
        self.executor.settled().await;

        let total = match self.executor.current_status() {
            Some(QueryStatus::Success(page)) => Some(page.pagination.total),
            _ => None,
        };
        if let Some(total) = total
            && self.filters.note_result_total(total)
        {
            tracing::debug!("empty result set off the first page, returning to page 1");
            self.execute_current();
            self.executor.settled().await;
        }

        self.executor
            .current_status()
            .cloned()
            .expect("the current key was just executed")
    }

    /// Retry the current query after a failure.
    pub async fn retry_transactions(&mut self) -> QueryStatus {
        self.executor
            .retry(self.filters.query_key(), self.filters.request(true));
        self.executor.settled().await;

        self.executor
            .current_status()
            .cloned()
            .expect("the current key was just executed")
    }

    /// Drop every cached page, e.g. after the ledger re-synced.
    pub fn invalidate_cache(&mut self) {
        self.executor.invalidate_all();
    }

    fn execute_current(&mut self) {
        self.executor
            .execute(self.filters.query_key(), self.filters.request(true));
    }

    /// The page indicator strip for the current results, or nothing while
    /// no page has loaded.
    pub fn page_indicators(&self) -> Vec<PaginationIndicator> {
        match self.executor.current_status() {
            Some(QueryStatus::Success(page)) => {
                pagination::page_indicators(&page.pagination, self.config.pagination.max_pages)
            }
            _ => Vec::new(),
        }
    }

    /// The synced bank accounts.
    pub async fn accounts(&self) -> Result<Vec<Account>, Error> {
        self.ledger.accounts().await
    }

    /// Aggregate totals for the given period.
    pub async fn summary_stats(&self, period: TimePeriod) -> Result<TransactionStats, Error> {
        self.ledger.transaction_stats(self.period_days(period)?).await
    }

    /// Per-month income and expenses for the given period.
    ///
    /// Prefers the ledger's server-side bucketing. When that endpoint
    /// fails, falls back to fetching the flat transaction list and
    /// aggregating client-side.
    pub async fn monthly_overview(&self, period: TimePeriod) -> Result<Vec<MonthlyStat>, Error> {
        let days = self.period_days(period)?;

        match self.ledger.monthly_stats(days).await {
            Ok(stats) => Ok(stats),
            Err(error) => {
                tracing::warn!(
                    "server-side monthly stats unavailable, aggregating client-side: {error}"
                );
                let transactions = self.ledger.transaction_analytics(days).await?;

                Ok(analytics::monthly_stats(
                    &transactions,
                    analytics::month_window(days),
                ))
            }
        }
    }

    /// The balance history chart for the given period, restricted to the
    /// selected account when the account filter is set.
    pub async fn balance_overview(&self, period: TimePeriod) -> Result<BalanceOverview, Error> {
        let days = self.period_days(period)?;
        let account_id = self.filters.account_id().map(String::as_str);

        let balances = self.ledger.balance_history(days, account_id).await?;
        let accounts = self.ledger.accounts().await?;

        let points = analytics::balance_series(&balances);
        let (labels, series) = analytics::balance_chart_datasets(&points, &accounts);

        Ok(BalanceOverview {
            labels,
            series,
            points,
        })
    }

    fn period_days(&self, period: TimePeriod) -> Result<u64, Error> {
        Ok(period.days(dates::local_now(&self.config.timezone)?))
    }
}
