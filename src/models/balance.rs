//! Defines the model for account balance snapshots.

use serde::{Deserialize, Serialize};

use crate::models::AccountId;

/// Which of the bank's balance figures a snapshot reports.
///
/// Banks report several figures per account per day. Only settled
/// ([BalanceType::ClosingBooked]) figures are charted; the others exist so
/// that records deserialize losslessly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BalanceType {
    /// The settled balance at the end of the reference date.
    ClosingBooked,
    /// The settled balance at the start of the reference date.
    OpeningBooked,
    /// The balance including transactions that have not settled yet.
    Expected,
    /// Funds available mid-day, including credit lines.
    InterimAvailable,
    /// Booked entries mid-day, excluding pending transactions.
    InterimBooked,
    /// Funds the bank forecasts to be available.
    ForwardAvailable,
    /// A balance type this crate does not recognise.
    #[serde(other)]
    Unknown,
}

/// One balance snapshot for one account on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// The account the snapshot belongs to.
    pub account_id: AccountId,
    /// The signed balance amount.
    pub amount: f64,
    /// The currency of the amount, as an ISO 4217 code.
    pub currency: String,
    /// Which of the bank's balance figures this snapshot is.
    pub balance_type: BalanceType,
    /// The date the snapshot refers to, as sent by the ledger.
    pub reference_date: String,
}
