//! Currency display formatting.
//!
//! Amounts are formatted for display only; the underlying records keep
//! their raw values and currency codes untouched.

use numfmt::{Formatter, Precision};

/// The currency used for display when a record carries a code this module
/// does not recognise.
pub const DEFAULT_CURRENCY: &str = "EUR";

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "EUR" => Some("€"),
        "USD" | "AUD" | "NZD" | "CAD" => Some("$"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "CHF" => Some("CHF "),
        "SEK" | "NOK" | "DKK" => Some("kr "),
        _ => None,
    }
}

/// Format an amount with the symbol for its currency code, e.g. "€1,234.50".
///
/// Negative amounts format with a leading minus, e.g. "-€40.00". An
/// unrecognised currency code falls back to [DEFAULT_CURRENCY] for display;
/// the amount itself is never converted.
pub fn format_amount(amount: f64, currency_code: &str) -> String {
    let symbol = currency_symbol(currency_code).unwrap_or_else(|| {
        tracing::debug!("unsupported currency code {currency_code:?}, displaying as {DEFAULT_CURRENCY}");
        currency_symbol(DEFAULT_CURRENCY).expect("the default currency has a symbol")
    });

    // Zero is hardcoded as "0", so we must specify the formatted string for zero
    if amount == 0.0 {
        return format!("{symbol}0.00");
    }

    let prefix = if amount < 0.0 {
        format!("-{symbol}")
    } else {
        symbol.to_owned()
    };
    let formatter = Formatter::currency(&prefix)
        .expect("currency prefixes are under the length limit")
        .precision(Precision::Decimals(2));

    let mut formatted_string = formatter.fmt_string(amount.abs());

    // numfmt omits trailing zeros, so we must add them ourselves.
    // For example, "12.30" is rendered as "12.3" so we append "0".
    match formatted_string.rfind('.') {
        None => formatted_string.push_str(".00"),
        Some(point) if formatted_string.len() - point == 2 => formatted_string.push('0'),
        Some(_) => {}
    }

    formatted_string
}
