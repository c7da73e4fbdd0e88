//! Per-country date layout and clock convention.

use crate::i18n::CountryCode;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Order and separator of the date fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePattern {
    /// 15/03/2024
    DayMonthYearSlash,
    /// 03/15/2024
    MonthDayYearSlash,
    /// 15.03.2024
    DayMonthYearDot,
    /// 15-03-2024
    DayMonthYearDash,
    /// 2024-03-15
    YearMonthDayDash,
    /// 2024/03/15
    YearMonthDaySlash,
}

impl DatePattern {
    /// Pattern used for countries without an entry.
    pub const FALLBACK: DatePattern = DatePattern::MonthDayYearSlash;

    /// strftime layout.
    pub fn layout(&self) -> &'static str {
        match self {
            DatePattern::DayMonthYearSlash => "%d/%m/%Y",
            DatePattern::MonthDayYearSlash => "%m/%d/%Y",
            DatePattern::DayMonthYearDot => "%d.%m.%Y",
            DatePattern::DayMonthYearDash => "%d-%m-%Y",
            DatePattern::YearMonthDayDash => "%Y-%m-%d",
            DatePattern::YearMonthDaySlash => "%Y/%m/%d",
        }
    }

    /// Human-readable template, e.g. "DD/MM/YYYY".
    pub fn template(&self) -> &'static str {
        match self {
            DatePattern::DayMonthYearSlash => "DD/MM/YYYY",
            DatePattern::MonthDayYearSlash => "MM/DD/YYYY",
            DatePattern::DayMonthYearDot => "DD.MM.YYYY",
            DatePattern::DayMonthYearDash => "DD-MM-YYYY",
            DatePattern::YearMonthDayDash => "YYYY-MM-DD",
            DatePattern::YearMonthDaySlash => "YYYY/MM/DD",
        }
    }
}

const DATE_PATTERNS: &[(DatePattern, &[&str])] = &[
    (
        DatePattern::DayMonthYearSlash,
        &[
            "FR", "BE", "LU", "MC", "ES", "IT", "PT", "BR", "GB", "IE", "AU", "NZ", "IN", "MX",
            "AR", "CO", "PE", "VE", "EC", "UY", "PY", "BO", "SA", "AE", "EG", "MA", "DZ", "TN",
            "QA", "KW", "BH", "OM", "JO", "LB", "GR", "VN", "ID", "MY", "SG", "TH", "IL", "HK",
            "SN", "CI", "CM", "PK",
        ],
    ),
    (DatePattern::MonthDayYearSlash, &["US", "PH", "PR"]),
    (
        DatePattern::DayMonthYearDot,
        &[
            "DE", "AT", "CH", "LI", "RU", "BY", "KZ", "KG", "TJ", "UA", "PL", "CZ", "SK", "FI",
            "NO", "DK", "TR", "RO", "AZ", "AM", "GE",
        ],
    ),
    (DatePattern::DayMonthYearDash, &["NL", "CL", "BD"]),
    (DatePattern::YearMonthDayDash, &["CA", "SE", "LT"]),
    (DatePattern::YearMonthDaySlash, &["CN", "TW", "JP", "ZA", "IR", "MO"]),
];

/// Countries whose default clock is 12-hour with AM/PM.
const TWELVE_HOUR_COUNTRIES: &[&str] = &[
    "US", "CA", "AU", "NZ", "IN", "PH", "PK", "BD", "EG", "SA", "AE", "JO", "MY", "CO", "MX",
    "SV", "HN", "NI", "PR",
];

static COUNTRY_TO_PATTERN: OnceLock<HashMap<&'static str, DatePattern>> = OnceLock::new();
static TWELVE_HOUR: OnceLock<HashSet<&'static str>> = OnceLock::new();

/// Date layout for `country`, falling back to [`DatePattern::FALLBACK`].
pub fn date_pattern(country: CountryCode) -> DatePattern {
    COUNTRY_TO_PATTERN
        .get_or_init(|| {
            DATE_PATTERNS
                .iter()
                .flat_map(|(pattern, countries)| countries.iter().map(move |c| (*c, *pattern)))
                .collect()
        })
        .get(country.as_str())
        .copied()
        .unwrap_or(DatePattern::FALLBACK)
}

pub fn uses_twelve_hour_clock(country: CountryCode) -> bool {
    TWELVE_HOUR
        .get_or_init(|| TWELVE_HOUR_COUNTRIES.iter().copied().collect())
        .contains(country.as_str())
}

/// strftime layout for a time of day.
pub fn time_layout(twelve_hour: bool, include_seconds: bool) -> &'static str {
    match (twelve_hour, include_seconds) {
        (true, false) => "%-I:%M %p",
        (true, true) => "%-I:%M:%S %p",
        (false, false) => "%H:%M",
        (false, true) => "%H:%M:%S",
    }
}
