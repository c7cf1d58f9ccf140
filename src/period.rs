//! Named time periods for the analytics views.
//!
//! Every analytics endpoint takes a trailing window expressed in days. The
//! user picks a named period; this module resolves it to the day count the
//! ledger expects.

use serde::Deserialize;
use time::{Date, Month, OffsetDateTime};

const MILLISECONDS_PER_DAY: u128 = 86_400_000;

/// A named trailing window over the account history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TimePeriod {
    /// The 30 days up to today.
    #[serde(rename = "last-30-days")]
    Last30Days,
    /// The 6 months (180 days) up to today.
    #[serde(rename = "last-6-months")]
    Last6Months,
    /// The 365 days up to today.
    #[serde(rename = "last-year")]
    LastYear,
    /// From 1 January of the current year up to now.
    #[serde(rename = "year-to-date")]
    YearToDate,
}

impl TimePeriod {
    /// The period shown when the user has not picked one.
    pub fn default_period() -> Self {
        Self::Last30Days
    }

    /// The value used for this period in query strings and CLI flags.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Last30Days => "last-30-days",
            Self::Last6Months => "last-6-months",
            Self::LastYear => "last-year",
            Self::YearToDate => "year-to-date",
        }
    }

    /// Parse the query-string form produced by [TimePeriod::as_query_value].
    ///
    /// Returns [None] for unrecognised names so callers can fail fast; a
    /// typo here is a bug, not bad user data.
    pub fn from_query_value(value: &str) -> Option<Self> {
        match value {
            "last-30-days" => Some(Self::Last30Days),
            "last-6-months" => Some(Self::Last6Months),
            "last-year" => Some(Self::LastYear),
            "year-to-date" => Some(Self::YearToDate),
            _ => None,
        }
    }

    /// The label shown for this period in a period picker.
    pub fn label(self) -> &'static str {
        match self {
            Self::Last30Days => "Last 30 days",
            Self::Last6Months => "Last 6 months",
            Self::LastYear => "Last year",
            Self::YearToDate => "Year to date",
        }
    }

    /// The number of days this period spans, as of `now`.
    ///
    /// [TimePeriod::YearToDate] counts started days since midnight on
    /// 1 January of `now`'s year, so it must be recomputed for every
    /// request rather than cached.
    pub fn days(self, now: OffsetDateTime) -> u64 {
        match self {
            Self::Last30Days => 30,
            Self::Last6Months => 180,
            Self::LastYear => 365,
            Self::YearToDate => {
                let january_first = Date::from_calendar_date(now.year(), Month::January, 1)
                    .expect("1 January exists in every year")
                    .midnight()
                    .assume_offset(now.offset());
                let elapsed_milliseconds = (now - january_first).whole_milliseconds().max(0);

                (elapsed_milliseconds as u128).div_ceil(MILLISECONDS_PER_DAY) as u64
            }
        }
    }
}
