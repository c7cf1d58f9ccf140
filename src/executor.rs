//! The paginated query executor for the transactions view.
//!
//! The executor owns an explicit map from query key to result plus a
//! pointer to the key most recently executed. Fetches run as spawned tasks
//! and report back over a channel; their results are applied one at a time
//! by the executor's owner, so a completion for a superseded key can be
//! recognised and dropped with a plain equality check.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::mpsc;

use crate::{
    Error,
    ledger::LedgerApi,
    models::TransactionPage,
    query::{TransactionQueryKey, TransactionRequest},
};

/// The state of one transactions query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryStatus {
    /// The fetch is still in flight.
    Loading,
    /// The fetch succeeded and the page is ready for display.
    Success(TransactionPage),
    /// The fetch failed, and failed again on the built-in retry. The
    /// message describes the last failure; call [QueryExecutor::retry] to
    /// try again.
    Failed(String),
}

struct Completion {
    key: TransactionQueryKey,
    result: Result<TransactionPage, Error>,
}

/// Executes transaction queries against the ledger, caching results per
/// query key.
///
/// At most one fetch is in flight per key: executing a key that is already
/// [QueryStatus::Loading] attaches to the pending fetch instead of issuing
/// another. A fetch that completes after the current key has moved on is
/// discarded entirely and never applied.
pub struct QueryExecutor {
    ledger: Arc<dyn LedgerApi>,
    cache: HashMap<TransactionQueryKey, QueryStatus>,
    current_key: Option<TransactionQueryKey>,
    in_flight: usize,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
}

impl QueryExecutor {
    /// An executor with an empty cache, fetching from `ledger`.
    pub fn new(ledger: Arc<dyn LedgerApi>) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        Self {
            ledger,
            cache: HashMap::new(),
            current_key: None,
            in_flight: 0,
            completion_tx,
            completion_rx,
        }
    }

    /// Make `key` the active query and start fetching it if needed.
    ///
    /// A cached [QueryStatus::Success] is served without a network round
    /// trip, and a key that is already loading attaches to the pending
    /// fetch. A cached [QueryStatus::Failed] stays failed until
    /// [QueryExecutor::retry]; errors are never papered over by refetching
    /// behind the caller's back.
    pub fn execute(&mut self, key: TransactionQueryKey, request: TransactionRequest) {
        self.current_key = Some(key.clone());

        match self.cache.get(&key) {
            Some(QueryStatus::Success(_)) => tracing::debug!("serving {key} from cache"),
            Some(QueryStatus::Loading) => {
                tracing::debug!("attaching to the in-flight fetch for {key}");
            }
            Some(QueryStatus::Failed(_)) => {}
            None => self.spawn_fetch(key, request),
        }
    }

    /// Clear a failed query and fetch it again.
    pub fn retry(&mut self, key: TransactionQueryKey, request: TransactionRequest) {
        if matches!(self.cache.get(&key), Some(QueryStatus::Failed(_))) {
            self.cache.remove(&key);
        }

        self.execute(key, request);
    }

    fn spawn_fetch(&mut self, key: TransactionQueryKey, request: TransactionRequest) {
        self.cache.insert(key.clone(), QueryStatus::Loading);
        self.in_flight += 1;

        let ledger = Arc::clone(&self.ledger);
        let sender = self.completion_tx.clone();
        tokio::spawn(async move {
            let mut result = ledger.transactions(&request).await;

            if let Err(error) = &result {
                tracing::warn!("fetch for {key} failed, retrying once: {error}");
                result = ledger.transactions(&request).await;
            }

            // The send only fails when the executor was dropped, in which
            // case there is nothing left to apply the result to.
            let _ = sender.send(Completion { key, result });
        });
    }

    /// The key most recently passed to [QueryExecutor::execute].
    pub fn current_key(&self) -> Option<&TransactionQueryKey> {
        self.current_key.as_ref()
    }

    /// The status of the active query, or [None] before the first execute.
    pub fn current_status(&self) -> Option<&QueryStatus> {
        self.current_key
            .as_ref()
            .and_then(|key| self.cache.get(key))
    }

    /// The cached status of any query.
    pub fn status(&self, key: &TransactionQueryKey) -> Option<&QueryStatus> {
        self.cache.get(key)
    }

    /// Apply every completion that has already arrived, without waiting.
    pub fn apply_ready_completions(&mut self) {
        while let Ok(completion) = self.completion_rx.try_recv() {
            self.apply(completion);
        }
    }

    /// Wait until no fetch is in flight, applying completions as they land.
    pub async fn settled(&mut self) {
        while self.in_flight > 0 {
            match self.completion_rx.recv().await {
                Some(completion) => self.apply(completion),
                // The executor holds a sender, so the channel cannot close
                // while it is alive.
                None => return,
            }
        }
    }

    fn apply(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);

        if self.current_key.as_ref() != Some(&completion.key) {
            tracing::debug!("discarding stale result for superseded query {}", completion.key);
            self.cache.remove(&completion.key);
            return;
        }

        let status = match completion.result {
            Ok(mut page) => {
                page.pagination = page.pagination.normalized();
                QueryStatus::Success(page)
            }
            Err(error) => {
                tracing::error!("query {} failed after retry: {error}", completion.key);
                QueryStatus::Failed(error.to_string())
            }
        };

        self.cache.insert(completion.key, status);
    }

    /// Drop the cached result for `key` so the next execute refetches it.
    ///
    /// A key that is still loading is left alone; the in-flight fetch will
    /// overwrite its entry when it lands.
    pub fn invalidate(&mut self, key: &TransactionQueryKey) {
        if !matches!(self.cache.get(key), Some(QueryStatus::Loading)) {
            self.cache.remove(key);
        }
    }

    /// Drop every cached result, e.g. after the source data changed.
    pub fn invalidate_all(&mut self) {
        self.cache
            .retain(|_, status| matches!(status, QueryStatus::Loading));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        query::{TransactionQueryKey, TransactionRequest},
        test_utils::{FakeLedger, create_transaction},
    };

    use super::{QueryExecutor, QueryStatus};

    fn create_key(page: u64) -> TransactionQueryKey {
        TransactionQueryKey {
            search: None,
            account_id: None,
            start_date: None,
            end_date: None,
            page,
            page_size: 25,
        }
    }

    fn create_ledger() -> Arc<FakeLedger> {
        let ledger = FakeLedger::new();
        ledger.set_transactions(vec![
            create_transaction("tx-1", 100.0, "2024-01-05"),
            create_transaction("tx-2", -40.0, "2024-01-20"),
        ]);

        Arc::new(ledger)
    }

    #[tokio::test]
    async fn repeated_executes_fetch_once() {
        let ledger = create_ledger();
        let mut executor = QueryExecutor::new(ledger.clone());

        executor.execute(create_key(1), TransactionRequest::default());
        executor.settled().await;
        executor.execute(create_key(1), TransactionRequest::default());
        executor.settled().await;

        assert_eq!(ledger.transaction_calls(), 1, "want the repeat served from cache");
        assert!(matches!(
            executor.current_status(),
            Some(QueryStatus::Success(_))
        ));
    }

    #[tokio::test]
    async fn executing_a_loading_key_attaches_to_the_pending_fetch() {
        let ledger = create_ledger();
        let mut executor = QueryExecutor::new(ledger.clone());

        executor.execute(create_key(1), TransactionRequest::default());
        assert_eq!(executor.current_status(), Some(&QueryStatus::Loading));

        executor.execute(create_key(1), TransactionRequest::default());
        executor.settled().await;

        assert_eq!(ledger.transaction_calls(), 1, "want one fetch for one key");
    }

    #[tokio::test]
    async fn stale_results_are_discarded() {
        let ledger = FakeLedger::new();
        // Two pages' worth of rows, so page 2 is a real page.
        ledger.set_transactions(
            (0..30)
                .map(|n| create_transaction(&format!("tx-{n}"), 10.0, "2024-01-05"))
                .collect(),
        );
        let ledger = Arc::new(ledger);
        let mut executor = QueryExecutor::new(ledger.clone());
        let superseded = create_key(1);

        executor.execute(superseded.clone(), TransactionRequest::default());
        executor.execute(create_key(2), TransactionRequest::default().with_page(2));
        executor.settled().await;

        assert_eq!(
            executor.status(&superseded),
            None,
            "want the superseded key dropped, not cached"
        );
        let Some(QueryStatus::Success(page)) = executor.current_status() else {
            panic!("want the current key to resolve, got {:?}", executor.current_status());
        };
        assert_eq!(page.pagination.page, 2);
    }

    #[tokio::test]
    async fn a_failed_fetch_is_retried_once() {
        let ledger = create_ledger();
        ledger.fail_next_transactions(1);
        let mut executor = QueryExecutor::new(ledger.clone());

        executor.execute(create_key(1), TransactionRequest::default());
        executor.settled().await;

        assert_eq!(ledger.transaction_calls(), 2, "want exactly one retry");
        assert!(matches!(
            executor.current_status(),
            Some(QueryStatus::Success(_))
        ));
    }

    #[tokio::test]
    async fn a_second_failure_surfaces_the_error() {
        let ledger = create_ledger();
        ledger.fail_next_transactions(2);
        let mut executor = QueryExecutor::new(ledger.clone());

        executor.execute(create_key(1), TransactionRequest::default());
        executor.settled().await;

        assert_eq!(ledger.transaction_calls(), 2, "want no retries beyond the built-in one");
        assert!(matches!(
            executor.current_status(),
            Some(QueryStatus::Failed(_))
        ));
    }

    #[tokio::test]
    async fn errors_stay_until_retried() {
        let ledger = create_ledger();
        ledger.fail_next_transactions(2);
        let mut executor = QueryExecutor::new(ledger.clone());

        executor.execute(create_key(1), TransactionRequest::default());
        executor.settled().await;
        executor.execute(create_key(1), TransactionRequest::default());
        executor.settled().await;

        assert_eq!(
            ledger.transaction_calls(),
            2,
            "want no refetch behind the caller's back"
        );

        executor.retry(create_key(1), TransactionRequest::default());
        executor.settled().await;

        assert_eq!(ledger.transaction_calls(), 3);
        assert!(matches!(
            executor.current_status(),
            Some(QueryStatus::Success(_))
        ));
    }

    #[tokio::test]
    async fn invalidation_forces_a_refetch() {
        let ledger = create_ledger();
        let mut executor = QueryExecutor::new(ledger.clone());
        let key = create_key(1);

        executor.execute(key.clone(), TransactionRequest::default());
        executor.settled().await;
        executor.invalidate(&key);
        executor.execute(key, TransactionRequest::default());
        executor.settled().await;

        assert_eq!(ledger.transaction_calls(), 2);
    }

    #[tokio::test]
    async fn invalidate_all_clears_every_cached_result() {
        let ledger = create_ledger();
        let mut executor = QueryExecutor::new(ledger.clone());

        executor.execute(create_key(1), TransactionRequest::default());
        executor.settled().await;
        executor.execute(create_key(2), TransactionRequest::default().with_page(2));
        executor.settled().await;

        executor.invalidate_all();

        assert_eq!(executor.status(&create_key(1)), None);
        assert_eq!(executor.status(&create_key(2)), None);
    }

    #[tokio::test]
    async fn envelopes_are_normalized_on_receipt() {
        let ledger = create_ledger();
        let mut executor = QueryExecutor::new(ledger);

        executor.execute(create_key(1), TransactionRequest::default());
        executor.settled().await;

        let Some(QueryStatus::Success(page)) = executor.current_status() else {
            panic!("want a success status");
        };
        assert!(page.pagination.is_consistent());
    }
}
