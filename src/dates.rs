//! Date parsing and display helpers.
//!
//! The ledger sends dates as plain strings. Everything here parses
//! leniently and falls back to sentinels so that one malformed record never
//! takes down a whole page or chart.

use time::{Date, OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// The label shown in place of a date string that could not be parsed.
pub const INVALID_DATE_LABEL: &str = "invalid date";

const ISO_DATE: &[BorrowedFormatItem<'static>] =
    time::macros::format_description!("[year]-[month]-[day]");

/// Parse a date in the ledger's wire format, e.g. "2024-01-05".
pub fn parse_iso_date(value: &str) -> Option<Date> {
    Date::parse(value, ISO_DATE).ok()
}

/// Format a date in the ledger's wire format, e.g. "2024-01-05".
pub fn iso_date_string(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Format a date as a day/month/year chart label, e.g. "05/01/2024".
pub fn short_date_label(date: Date) -> String {
    format!(
        "{:02}/{:02}/{:04}",
        date.day(),
        u8::from(date.month()),
        date.year()
    )
}

/// Format a wire date string as a day/month/year chart label, falling back
/// to [INVALID_DATE_LABEL] when the string cannot be parsed.
pub fn date_label(value: &str) -> String {
    match parse_iso_date(value) {
        Some(date) => short_date_label(date),
        None => INVALID_DATE_LABEL.to_owned(),
    }
}

/// The month bucket a date belongs to, e.g. "2024-01".
///
/// Keys sort the same lexically and chronologically.
pub fn month_key(date: Date) -> String {
    format!("{:04}-{:02}", date.year(), u8::from(date.month()))
}

fn local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// The current date-time in the given canonical timezone, e.g.
/// "Pacific/Auckland".
///
/// # Errors
/// Returns [Error::InvalidTimezone] if the timezone is not a valid
/// canonical timezone string.
pub fn local_now(canonical_timezone: &str) -> Result<OffsetDateTime, Error> {
    let Some(offset) = local_offset(canonical_timezone) else {
        tracing::error!("Invalid timezone {}", canonical_timezone);
        return Err(Error::InvalidTimezone(canonical_timezone.to_owned()));
    };

    Ok(OffsetDateTime::now_utc().to_offset(offset))
}

/// The current date in the given canonical timezone.
///
/// # Errors
/// Returns [Error::InvalidTimezone] if the timezone is not a valid
/// canonical timezone string.
pub fn local_today(canonical_timezone: &str) -> Result<Date, Error> {
    local_now(canonical_timezone).map(|now| now.date())
}
