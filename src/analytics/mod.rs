//! Aggregation of ledger data into chart-ready series.

pub use balance::{BalanceSeriesPoint, balance_chart_datasets, balance_series};
pub use monthly::{MonthlyStat, month_window, monthly_stats};

mod balance;
mod monthly;
