//! Runtime configuration for the dashboard core.

use crate::pagination::PaginationConfig;

/// The settings a [crate::Dashboard] is constructed with.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// The canonical timezone that "today" and "year to date" are computed
    /// in, e.g. "Pacific/Auckland".
    pub timezone: String,
    /// Paging defaults and the indicator window width.
    pub pagination: PaginationConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            timezone: "Etc/UTC".to_owned(),
            pagination: PaginationConfig::default(),
        }
    }
}
