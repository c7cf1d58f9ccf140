//! Per-account balance history aggregation for the balances chart.

use std::collections::HashMap;

use serde::Serialize;
use time::Date;

use crate::{
    dates,
    models::{Account, AccountId, Balance, BalanceType},
};

/// The balances of every reporting account on one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceSeriesPoint {
    /// The calendar date of the snapshots.
    pub date: Date,
    /// The date formatted as a day/month/year chart label.
    pub label: String,
    /// The balance of each account that reported on this date. Accounts
    /// without a snapshot are absent; values are never interpolated.
    pub amounts: HashMap<AccountId, f64>,
}

/// Aggregates raw balance records into a date-ordered series.
///
/// Only settled ([BalanceType::ClosingBooked]) records are charted. When an
/// account reports several settled balances for one date, the first record
/// in input order wins. Records whose reference date cannot be parsed are
/// skipped.
///
/// # Returns
/// One point per observed date, sorted by calendar date (never by the
/// day-first label, which orders differently).
pub fn balance_series(balances: &[Balance]) -> Vec<BalanceSeriesPoint> {
    let mut amounts_by_date: HashMap<Date, HashMap<AccountId, f64>> = HashMap::new();

    for balance in balances {
        if balance.balance_type != BalanceType::ClosingBooked {
            continue;
        }

        let Some(date) = dates::parse_iso_date(&balance.reference_date) else {
            tracing::debug!(
                "skipping balance for {} with unparsable date {:?}",
                balance.account_id,
                balance.reference_date
            );
            continue;
        };

        amounts_by_date
            .entry(date)
            .or_default()
            .entry(balance.account_id.clone())
            .or_insert(balance.amount);
    }

    let mut observed_dates: Vec<Date> = amounts_by_date.keys().copied().collect();
    observed_dates.sort_unstable();

    observed_dates
        .into_iter()
        .map(|date| BalanceSeriesPoint {
            date,
            label: dates::short_date_label(date),
            amounts: amounts_by_date
                .remove(&date)
                .expect("date came from this map"),
        })
        .collect()
}

/// Converts a balance series into per-account chart datasets.
///
/// # Arguments
/// * `points` - The series from [balance_series]
/// * `accounts` - The known accounts, used to label and order the datasets
///
/// # Returns
/// Tuple of (date labels, (dataset label, values) pairs). Each values
/// vector has one entry per date label, with [None] where the account did
/// not report. Known accounts come first in the given order; accounts the
/// ledger returned that the list does not know follow, sorted by id and
/// labelled with it.
pub fn balance_chart_datasets(
    points: &[BalanceSeriesPoint],
    accounts: &[Account],
) -> (Vec<String>, Vec<(String, Vec<Option<f64>>)>) {
    let labels = points.iter().map(|point| point.label.clone()).collect();

    let mut series: Vec<(&str, String)> = Vec::new();
    for account in accounts {
        if points
            .iter()
            .any(|point| point.amounts.contains_key(&account.id))
        {
            series.push((account.id.as_str(), account.label().to_owned()));
        }
    }

    let mut unknown_ids: Vec<&str> = points
        .iter()
        .flat_map(|point| point.amounts.keys())
        .map(|id| id.as_str())
        .filter(|id| !accounts.iter().any(|account| account.id == *id))
        .collect();
    unknown_ids.sort_unstable();
    unknown_ids.dedup();
    for id in unknown_ids {
        series.push((id, id.to_owned()));
    }

    let datasets = series
        .into_iter()
        .map(|(id, label)| {
            let values = points
                .iter()
                .map(|point| point.amounts.get(id).copied())
                .collect();
            (label, values)
        })
        .collect();

    (labels, datasets)
}


#[cfg(test)]
mod chart_dataset_tests {
    use crate::models::{Account, Balance, BalanceType};

    use super::{balance_chart_datasets, balance_series};

    fn create_account(id: &str, display_name: &str) -> Account {
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

    fn create_balance(account_id: &str, date: &str, amount: f64) -> Balance {
        Balance {
            account_id: account_id.to_owned(),
            amount,
            currency: "EUR".to_owned(),
            balance_type: BalanceType::ClosingBooked,
            reference_date: date.to_owned(),
        }
    }

    #[test]
    fn datasets_align_values_with_date_labels() {
        let points = balance_series(&[
            create_balance("X", "2024-01-05", 100.0),
            create_balance("Y", "2024-01-05", 50.0),
            create_balance("X", "2024-01-06", 80.0),
        ]);
        let accounts = [create_account("X", "Everyday"), create_account("Y", "Savings")];

        let (labels, datasets) = balance_chart_datasets(&points, &accounts);

        assert_eq!(labels, vec!["05/01/2024", "06/01/2024"]);
        let want = vec![
            ("Everyday".to_owned(), vec![Some(100.0), Some(80.0)]),
            ("Savings".to_owned(), vec![Some(50.0), None]),
        ];
        assert_eq!(datasets, want);
    }

    #[test]
    fn accounts_without_data_get_no_dataset() {
        let points = balance_series(&[create_balance("X", "2024-01-05", 100.0)]);
        let accounts = [create_account("X", "Everyday"), create_account("Z", "Empty")];

        let (_, datasets) = balance_chart_datasets(&points, &accounts);

        assert_eq!(datasets.len(), 1);
        assert_eq!(datasets[0].0, "Everyday");
    }

    #[test]
    fn unknown_accounts_are_labelled_with_their_id() {
        let points = balance_series(&[
            create_balance("X", "2024-01-05", 100.0),
            create_balance("mystery-account", "2024-01-05", 9.0),
        ]);
        let accounts = [create_account("X", "Everyday")];

        let (_, datasets) = balance_chart_datasets(&points, &accounts);

        assert_eq!(datasets.len(), 2);
        assert_eq!(datasets[0].0, "Everyday");
        assert_eq!(datasets[1].0, "mystery-account");
        assert_eq!(datasets[1].1, vec![Some(9.0)]);
    }
}
