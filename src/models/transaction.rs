//! Defines the wire models for transactions, their paginated envelope, and
//! the aggregate totals the ledger computes over a period.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{dates, models::AccountId, pagination::PageInfo};

/// An expense or income synced from the ledger, i.e. an event where money
/// either left or entered an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The stable, bank-provided id of the transaction.
    pub id: String,
    /// The id older syncs used for this transaction.
    ///
    /// Some banks rewrite this between syncs, so it must not be used for
    /// deduplication. Kept so old exports can still be matched up.
    #[serde(default)]
    pub legacy_id: Option<String>,
    /// The account the transaction belongs to.
    pub account_id: AccountId,
    /// The amount of money earned (positive) or spent (negative).
    pub amount: f64,
    /// The currency of the amount, as an ISO 4217 code.
    pub currency: String,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened, as sent by the ledger.
    pub transaction_date: String,
    /// When the transaction was booked, if the bank reports it separately.
    #[serde(default)]
    pub booking_date: Option<String>,
    /// The name of the party that received the money.
    #[serde(default)]
    pub creditor_name: Option<String>,
    /// The name of the party that sent the money.
    #[serde(default)]
    pub debtor_name: Option<String>,
    /// The bank's reference text for the transaction.
    #[serde(default)]
    pub reference: Option<String>,
    /// The category assigned to the transaction, if any.
    #[serde(default)]
    pub category: Option<String>,
    /// The raw provider payload. Only present when full records were
    /// requested (`summary_only` off).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

impl Transaction {
    /// The transaction date parsed as a calendar date, or [None] when the
    /// ledger sent something unparsable.
    pub fn date(&self) -> Option<Date> {
        dates::parse_iso_date(&self.transaction_date)
    }

    /// The counterparty to show for this transaction: the creditor for
    /// money out, the debtor for money in.
    pub fn counterparty(&self) -> Option<&str> {
        if self.amount < 0.0 {
            self.creditor_name
                .as_deref()
                .or(self.debtor_name.as_deref())
        } else {
            self.debtor_name
                .as_deref()
                .or(self.creditor_name.as_deref())
        }
    }
}

/// One page of transactions plus the envelope describing where the page
/// sits in the full result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionPage {
    /// The transactions on this page.
    pub transactions: Vec<Transaction>,
    /// Where this page sits in the full result set.
    pub pagination: PageInfo,
}

/// Aggregate totals over a period, as computed by the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionStats {
    /// How many transactions the period contains.
    pub transaction_count: u64,
    /// The sum of all positive amounts.
    pub income: f64,
    /// The sum of the absolute values of all negative amounts.
    pub expenses: f64,
    /// Income minus expenses.
    pub net: f64,
}
