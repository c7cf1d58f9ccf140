//! Monthly income/expense aggregation of transactions.
//!
//! Mirrors the ledger's `/transactions/monthly-stats` endpoint so the
//! dashboard can aggregate client-side when that endpoint is unavailable.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{dates, models::Transaction};

/// Income, expenses, and net for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStat {
    /// The month as a "YYYY-MM" label. Labels sort the same lexically and
    /// chronologically.
    pub month: String,
    /// The sum of all positive amounts in the month.
    pub income: f64,
    /// The sum of the absolute values of all non-positive amounts.
    pub expenses: f64,
    /// Income minus expenses.
    pub net: f64,
}

/// How many months of statistics a period of `days` days shows.
pub fn month_window(days: u64) -> usize {
    if days <= 30 {
        1
    } else if days <= 180 {
        6
    } else if days <= 365 {
        12
    } else {
        days.div_ceil(30) as usize
    }
}

/// Aggregates transactions into per-month income/expense statistics.
///
/// Transactions bucket by the "YYYY-MM" prefix of their date. A positive
/// amount counts as income; a negative or zero amount adds its absolute
/// value to expenses. Net is always recomputed from the two sums.
/// Transactions whose date cannot be parsed are skipped.
///
/// # Returns
/// At most `month_window` stats, sorted ascending by month, keeping the
/// most recent months. Months without transactions are absent.
pub fn monthly_stats(transactions: &[Transaction], month_window: usize) -> Vec<MonthlyStat> {
    let mut totals: HashMap<String, (f64, f64)> = HashMap::new();

    for transaction in transactions {
        let Some(date) = transaction.date() else {
            tracing::debug!(
                "skipping transaction {} with unparsable date {:?}",
                transaction.id,
                transaction.transaction_date
            );
            continue;
        };

        let (income, expenses) = totals.entry(dates::month_key(date)).or_insert((0.0, 0.0));
        if transaction.amount > 0.0 {
            *income += transaction.amount;
        } else {
            *expenses += transaction.amount.abs();
        }
    }

    let mut months: Vec<String> = totals.keys().cloned().collect();
    months.sort_unstable();
    if months.len() > month_window {
        months.drain(..months.len() - month_window);
    }

    months
        .into_iter()
        .map(|month| {
            let (income, expenses) = totals[&month];
            MonthlyStat {
                month,
                income,
                expenses,
                net: income - expenses,
            }
        })
        .collect()
}
