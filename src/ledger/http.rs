//! The reqwest-backed ledger API client.

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    Error,
    analytics::MonthlyStat,
    models::{Account, Balance, Transaction, TransactionPage, TransactionStats},
    query::TransactionRequest,
};

use super::{LedgerApi, endpoints};

/// The error body the ledger sends alongside non-success status codes.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// A ledger API client backed by a shared HTTP connection pool.
#[derive(Debug, Clone)]
pub struct HttpLedgerClient {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpLedgerClient {
    /// A client for the ledger at `base_url`, e.g.
    /// "https://ledger.example.com/api".
    ///
    /// # Errors
    /// Returns [Error::InvalidBaseUrl] when the URL cannot be parsed.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let mut parsed = Url::parse(base_url)
            .map_err(|error| Error::InvalidBaseUrl(base_url.to_owned(), error.to_string()))?;

        // Url::join drops the last path segment of a base without a
        // trailing slash.
        if !parsed.path().ends_with('/') {
            parsed.set_path(&format!("{}/", parsed.path()));
        }

        Ok(Self {
            base_url: parsed,
            http: reqwest::Client::new(),
        })
    }

    fn endpoint_url(&self, path: &str) -> Result<Url, Error> {
        self.base_url
            .join(path)
            .map_err(|error| Error::InvalidBaseUrl(path.to_owned(), error.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, Error> {
        let url = self.endpoint_url(path)?;
        let response = self.http.get(url).query(params).send().await?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|error| Error::Decode(error.to_string()));
        }

        let message = response
            .json::<ErrorResponse>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| "unknown error".to_owned());
        tracing::error!("ledger API returned {status} for /{path}: {message}");

        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl LedgerApi for HttpLedgerClient {
    async fn accounts(&self) -> Result<Vec<Account>, Error> {
        self.get_json(endpoints::ACCOUNTS, &[]).await
    }

    async fn transactions(&self, request: &TransactionRequest) -> Result<TransactionPage, Error> {
        self.get_json(endpoints::TRANSACTIONS, &request.query_params())
            .await
    }

    async fn balance_history(
        &self,
        days: u64,
        account_id: Option<&str>,
    ) -> Result<Vec<Balance>, Error> {
        let mut params = vec![("days", days.to_string())];
        if let Some(account_id) = account_id {
            params.push(("account_id", account_id.to_owned()));
        }

        self.get_json(endpoints::BALANCE_HISTORY, &params).await
    }

    async fn monthly_stats(&self, days: u64) -> Result<Vec<MonthlyStat>, Error> {
        self.get_json(endpoints::MONTHLY_STATS, &[("days", days.to_string())])
            .await
    }

    async fn transaction_stats(&self, days: u64) -> Result<TransactionStats, Error> {
        self.get_json(endpoints::TRANSACTION_STATS, &[("days", days.to_string())])
            .await
    }

    async fn transaction_analytics(&self, days: u64) -> Result<Vec<Transaction>, Error> {
        self.get_json(endpoints::TRANSACTION_ANALYTICS, &[("days", days.to_string())])
            .await
    }
}
