//! Defines the model for bank accounts synced from the ledger.

use serde::{Deserialize, Serialize};

/// Alias for the bank-provided ID of an account.
pub type AccountId = String;

/// A bank account or credit card known to the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The bank-provided id for the account.
    pub id: AccountId,
    /// The id of the institution that holds the account.
    pub institution_id: String,
    /// A user-facing name for the account, when the bank provides one.
    #[serde(default)]
    pub display_name: Option<String>,
    /// The current balance of the account.
    pub balance: f64,
    /// The currency of the balance, as an ISO 4217 code.
    pub currency: String,
    /// When the account was first synced from the bank.
    #[serde(default)]
    pub created_at: Option<String>,
    /// When the account was last synced from the bank.
    #[serde(default)]
    pub last_synced_at: Option<String>,
}

impl Account {
    /// The name to show for this account in selectors and chart legends.
    ///
    /// Prefers the bank-provided display name, then the institution id,
    /// then the raw account id.
    pub fn label(&self) -> &str {
        match &self.display_name {
            Some(name) if !name.is_empty() => name,
            _ if !self.institution_id.is_empty() => &self.institution_id,
            _ => &self.id,
        }
    }
}
