//! This module defines the wire data types served by the remote ledger API.

pub use account::{Account, AccountId};
pub use balance::{Balance, BalanceType};
pub use transaction::{Transaction, TransactionPage, TransactionStats};

mod account;
mod balance;
mod transaction;
