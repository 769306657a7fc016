//! Locale-independent display formatting for figures.
//!
//! Fixed convention: two decimals, `,` thousands separators, `.` decimal
//! point, leading currency symbol (or ISO code) and a leading minus for
//! negative values. Only non-finite input is an error.

use crate::{validate_currency_code, FormatError};

/// Placeholder rendered for metrics that are not available.
pub const NOT_AVAILABLE: &str = "N/A";

/// `format_currency(-1234.5, "USD") == "-$1,234.50"`.
pub fn format_currency(value: f64, currency_code: &str) -> Result<String, FormatError> {
    let (negative, body) = fixed_two(value)?;
    let sign = if negative { "-" } else { "" };
    Ok(format!("{sign}{}{body}", currency_prefix(currency_code)))
}

/// `format_percent(-3.14159) == "-3.14%"`.
pub fn format_percent(value: f64) -> Result<String, FormatError> {
    let (negative, body) = fixed_two(value)?;
    let sign = if negative { "-" } else { "" };
    Ok(format!("{sign}{body}%"))
}

/// Like [`format_percent`] but with an explicit `+` for gains.
pub fn format_signed_percent(value: f64) -> Result<String, FormatError> {
    let (negative, body) = fixed_two(value)?;
    let sign = if negative {
        "-"
    } else if body == "0.00" {
        ""
    } else {
        "+"
    };
    Ok(format!("{sign}{body}%"))
}

/// Large amounts with a T/B/M suffix, e.g. `$2.87T`; below one million falls
/// back to [`format_currency`].
pub fn format_compact_currency(value: f64, currency_code: &str) -> Result<String, FormatError> {
    match compact_scale(value, &[(1e12, "T"), (1e9, "B"), (1e6, "M")]) {
        Some((scaled, suffix)) => {
            let (negative, body) = fixed_two(scaled)?;
            let sign = if negative { "-" } else { "" };
            Ok(format!("{sign}{}{body}{suffix}", currency_prefix(currency_code)))
        }
        None => format_currency(value, currency_code),
    }
}

/// Counts such as volume with a B/M/K suffix, e.g. `58.41M`.
pub fn format_compact_number(value: f64) -> Result<String, FormatError> {
    let (scaled, suffix) =
        compact_scale(value, &[(1e9, "B"), (1e6, "M"), (1e3, "K")]).unwrap_or((value, ""));
    let (negative, body) = fixed_two(scaled)?;
    let sign = if negative { "-" } else { "" };
    Ok(format!("{sign}{body}{suffix}"))
}

/// Plain two-decimal figure such as a P/E ratio, e.g. `29.40`.
pub fn format_ratio(value: f64) -> Result<String, FormatError> {
    let (negative, body) = fixed_two(value)?;
    let sign = if negative { "-" } else { "" };
    Ok(format!("{sign}{body}"))
}

pub fn display_currency(value: Option<f64>, currency_code: &str) -> String {
    or_not_available(value.map(|value| format_currency(value, currency_code)))
}

pub fn display_percent(value: Option<f64>) -> String {
    or_not_available(value.map(format_signed_percent))
}

pub fn display_number(value: Option<f64>) -> String {
    or_not_available(value.map(format_compact_number))
}

pub fn display_compact_currency(value: Option<f64>, currency_code: &str) -> String {
    or_not_available(value.map(|value| format_compact_currency(value, currency_code)))
}

pub fn display_ratio(value: Option<f64>) -> String {
    or_not_available(value.map(format_ratio))
}

/// A fraction such as a dividend yield or margin, shown as a percentage.
pub fn display_fraction(value: Option<f64>) -> String {
    or_not_available(value.map(|fraction| format_percent(fraction * 100.0)))
}

/// Collapse an optional formatting result into display text, using
/// [`NOT_AVAILABLE`] for absent values and formatting failures.
pub fn or_not_available(formatted: Option<Result<String, FormatError>>) -> String {
    formatted
        .and_then(Result::ok)
        .unwrap_or_else(|| String::from(NOT_AVAILABLE))
}

fn currency_prefix(currency_code: &str) -> String {
    let Some(code) = validate_currency_code(currency_code) else {
        let raw = currency_code.trim();
        return if raw.is_empty() {
            String::new()
        } else {
            format!("{} ", raw.to_ascii_uppercase())
        };
    };

    let symbol = match code.as_str() {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "CAD" => "CA$",
        "AUD" => "A$",
        "HKD" => "HK$",
        "INR" => "₹",
        "CNY" => "CN¥",
        _ => return format!("{code} "),
    };
    String::from(symbol)
}

fn compact_scale(value: f64, scales: &[(f64, &'static str)]) -> Option<(f64, &'static str)> {
    scales
        .iter()
        .find(|(threshold, _)| value.abs() >= *threshold)
        .map(|(threshold, suffix)| (value / threshold, *suffix))
}

/// Render `|value|` with two decimals and grouped thousands.
///
/// Returns whether a minus sign is needed; values that round to zero never
/// carry one.
fn fixed_two(value: f64) -> Result<(bool, String), FormatError> {
    if !value.is_finite() {
        return Err(FormatError::NonFinite);
    }

    let rendered = format!("{:.2}", value.abs());
    let (integer, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3 + 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped.push('.');
    grouped.push_str(fraction);

    let negative = value < 0.0 && grouped != "0.00";
    Ok((negative, grouped))
}
