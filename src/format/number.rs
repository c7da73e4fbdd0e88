//! Number and currency rendering on top of CLDR separators.

use crate::i18n::{CountryCode, Language};
use num_format::{Locale, ToFormattedString};

/// Separator conventions for a language/country pair.
///
/// Tries `<lang>-<COUNTRY>`, then the bare language, then English.
pub fn number_locale(language: Language, country: CountryCode) -> Locale {
    let lang = language.bcp47_code();
    Locale::from_name(format!("{}-{}", lang, country))
        .or_else(|_| Locale::from_name(lang))
        .unwrap_or(Locale::en)
}

/// Upper bound on fraction digits.
pub const MAX_FRACTION_DIGITS: usize = 20;

/// Render `value` with grouping and between `min` and `max` fraction digits.
///
/// Both bounds are capped at [`MAX_FRACTION_DIGITS`]. `None` for non-finite
/// values.
pub fn format_decimal(value: f64, locale: &Locale, min: usize, max: usize) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let min = min.min(MAX_FRACTION_DIGITS);
    let max = max.min(MAX_FRACTION_DIGITS).max(min);

    let rounded = format!("{:.*}", max, value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));

    let mut fraction = frac_part.trim_end_matches('0').to_string();
    while fraction.len() < min {
        fraction.push('0');
    }

    let grouped = int_part
        .parse::<u128>()
        .map(|n| n.to_formatted_string(locale))
        .unwrap_or_else(|_| int_part.to_string());

    let is_zero = int_part.bytes().all(|b| b == b'0') && fraction.bytes().all(|b| b == b'0');
    let mut out = String::new();
    if value.is_sign_negative() && !is_zero {
        out.push_str(locale.minus_sign());
    }
    out.push_str(&grouped);
    if !fraction.is_empty() {
        out.push_str(locale.decimal());
        out.push_str(&fraction);
    }
    Some(out)
}

/// Percent sign placement: attached for English-style locales, otherwise
/// separated by a no-break space.
pub fn percent_suffix(language: Language) -> &'static str {
    match language.code() {
        "en" | "ch" | "hi" => "%",
        _ => "\u{a0}%",
    }
}

/// Whether `code` looks like an ISO 4217 code (three ASCII letters).
pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic())
}

pub fn currency_symbol(code: &str) -> &str {
    match code {
        "EUR" => "€",
        "USD" => "$",
        "GBP" => "£",
        "JPY" | "CNY" => "¥",
        "INR" => "₹",
        "RUB" => "₽",
        "BRL" => "R$",
        "KRW" => "₩",
        "CAD" => "CA$",
        "AUD" => "A$",
        "MXN" => "MX$",
        other => other,
    }
}

/// Minor-unit digits shown for a currency.
pub fn currency_digits(code: &str) -> usize {
    match code {
        "JPY" | "KRW" | "CLP" | "VND" | "ISK" => 0,
        _ => 2,
    }
}

/// Place `symbol` around an already formatted absolute amount.
pub fn place_currency(language: Language, negative: bool, symbol: &str, amount: &str) -> String {
    let sign = if negative { "-" } else { "" };
    match language.code() {
        "en" | "hi" | "ch" => {
            if symbol.chars().all(|c| c.is_ascii_alphabetic()) {
                format!("{}{}\u{a0}{}", sign, symbol, amount)
            } else {
                format!("{}{}{}", sign, symbol, amount)
            }
        }
        _ => format!("{}{}\u{a0}{}", sign, amount, symbol),
    }
}
