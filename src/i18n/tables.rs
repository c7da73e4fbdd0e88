//! Static lookup tables: country → language and timezone → country.
//!
//! Both are built once on first access and never mutated. A key missing from
//! a table means "no match", never an error.

use crate::i18n::{CountryCode, Language};
use std::collections::HashMap;
use std::sync::OnceLock;

const COUNTRY_LANGUAGES: &[(&str, &[&str])] = &[
    (
        "fr",
        &[
            "FR", "BE", "LU", "MC", "SN", "CI", "ML", "BF", "NE", "TG", "BJ", "GN", "CM", "GA",
            "CG", "CD", "MG", "HT", "RE", "GP", "MQ", "GF", "NC", "PF", "YT", "PM",
        ],
    ),
    (
        "en",
        &[
            "US", "GB", "IE", "AU", "NZ", "CA", "ZA", "NG", "KE", "GH", "UG", "ZW", "JM", "TT",
            "SG", "PH", "MT",
        ],
    ),
    (
        "es",
        &[
            "ES", "MX", "AR", "CO", "CL", "PE", "VE", "EC", "GT", "CU", "BO", "DO", "HN", "PY",
            "SV", "NI", "CR", "PA", "UY", "PR",
        ],
    ),
    ("de", &["DE", "AT", "CH", "LI"]),
    ("ru", &["RU", "BY", "KZ", "KG", "TJ"]),
    ("pt", &["PT", "BR", "AO", "MZ", "CV", "GW", "ST", "TL"]),
    ("ch", &["CN", "TW", "HK", "MO"]),
    ("hi", &["IN"]),
    (
        "ar",
        &[
            "SA", "AE", "EG", "MA", "DZ", "TN", "LY", "QA", "KW", "BH", "OM", "JO", "LB", "SY",
            "IQ", "YE", "SD", "PS", "MR",
        ],
    ),
];

const TIMEZONE_COUNTRIES: &[(&str, &str)] = &[
    // Europe
    ("Europe/Paris", "FR"),
    ("Europe/Brussels", "BE"),
    ("Europe/Luxembourg", "LU"),
    ("Europe/Monaco", "MC"),
    ("Europe/Zurich", "CH"),
    ("Europe/Berlin", "DE"),
    ("Europe/Busingen", "DE"),
    ("Europe/Vienna", "AT"),
    ("Europe/Madrid", "ES"),
    ("Atlantic/Canary", "ES"),
    ("Europe/Lisbon", "PT"),
    ("Atlantic/Madeira", "PT"),
    ("Atlantic/Azores", "PT"),
    ("Europe/London", "GB"),
    ("Europe/Dublin", "IE"),
    ("Europe/Rome", "IT"),
    ("Europe/Amsterdam", "NL"),
    ("Europe/Stockholm", "SE"),
    ("Europe/Oslo", "NO"),
    ("Europe/Copenhagen", "DK"),
    ("Europe/Helsinki", "FI"),
    ("Europe/Warsaw", "PL"),
    ("Europe/Prague", "CZ"),
    ("Europe/Budapest", "HU"),
    ("Europe/Athens", "GR"),
    ("Europe/Bucharest", "RO"),
    ("Europe/Kiev", "UA"),
    ("Europe/Kyiv", "UA"),
    ("Europe/Istanbul", "TR"),
    ("Europe/Moscow", "RU"),
    ("Europe/Samara", "RU"),
    ("Europe/Minsk", "BY"),
    ("Asia/Yekaterinburg", "RU"),
    ("Asia/Novosibirsk", "RU"),
    ("Asia/Vladivostok", "RU"),
    // Americas
    ("America/New_York", "US"),
    ("America/Chicago", "US"),
    ("America/Denver", "US"),
    ("America/Phoenix", "US"),
    ("America/Los_Angeles", "US"),
    ("America/Anchorage", "US"),
    ("Pacific/Honolulu", "US"),
    ("America/Detroit", "US"),
    ("America/Toronto", "CA"),
    ("America/Vancouver", "CA"),
    ("America/Montreal", "CA"),
    ("America/Edmonton", "CA"),
    ("America/Halifax", "CA"),
    ("America/Winnipeg", "CA"),
    ("America/Mexico_City", "MX"),
    ("America/Cancun", "MX"),
    ("America/Tijuana", "MX"),
    ("America/Bogota", "CO"),
    ("America/Lima", "PE"),
    ("America/Caracas", "VE"),
    ("America/Santiago", "CL"),
    ("America/Argentina/Buenos_Aires", "AR"),
    ("America/Buenos_Aires", "AR"),
    ("America/Montevideo", "UY"),
    ("America/Asuncion", "PY"),
    ("America/La_Paz", "BO"),
    ("America/Guayaquil", "EC"),
    ("America/Havana", "CU"),
    ("America/Santo_Domingo", "DO"),
    ("America/Puerto_Rico", "PR"),
    ("America/Panama", "PA"),
    ("America/Costa_Rica", "CR"),
    ("America/Guatemala", "GT"),
    ("America/Sao_Paulo", "BR"),
    ("America/Manaus", "BR"),
    ("America/Fortaleza", "BR"),
    ("America/Recife", "BR"),
    ("America/Bahia", "BR"),
    ("America/Port-au-Prince", "HT"),
    ("America/Guadeloupe", "GP"),
    ("America/Martinique", "MQ"),
    ("America/Cayenne", "GF"),
    // Africa
    ("Africa/Casablanca", "MA"),
    ("Africa/Algiers", "DZ"),
    ("Africa/Tunis", "TN"),
    ("Africa/Tripoli", "LY"),
    ("Africa/Cairo", "EG"),
    ("Africa/Khartoum", "SD"),
    ("Africa/Dakar", "SN"),
    ("Africa/Abidjan", "CI"),
    ("Africa/Bamako", "ML"),
    ("Africa/Douala", "CM"),
    ("Africa/Kinshasa", "CD"),
    ("Africa/Lagos", "NG"),
    ("Africa/Accra", "GH"),
    ("Africa/Nairobi", "KE"),
    ("Africa/Johannesburg", "ZA"),
    ("Africa/Luanda", "AO"),
    ("Africa/Maputo", "MZ"),
    ("Indian/Reunion", "RE"),
    ("Indian/Antananarivo", "MG"),
    // Middle East
    ("Asia/Riyadh", "SA"),
    ("Asia/Dubai", "AE"),
    ("Asia/Qatar", "QA"),
    ("Asia/Kuwait", "KW"),
    ("Asia/Bahrain", "BH"),
    ("Asia/Muscat", "OM"),
    ("Asia/Amman", "JO"),
    ("Asia/Beirut", "LB"),
    ("Asia/Damascus", "SY"),
    ("Asia/Baghdad", "IQ"),
    ("Asia/Aden", "YE"),
    ("Asia/Jerusalem", "IL"),
    ("Asia/Tehran", "IR"),
    // Asia & Pacific
    ("Asia/Kolkata", "IN"),
    ("Asia/Calcutta", "IN"),
    ("Asia/Shanghai", "CN"),
    ("Asia/Chongqing", "CN"),
    ("Asia/Urumqi", "CN"),
    ("Asia/Hong_Kong", "HK"),
    ("Asia/Macau", "MO"),
    ("Asia/Taipei", "TW"),
    ("Asia/Tokyo", "JP"),
    ("Asia/Seoul", "KR"),
    ("Asia/Singapore", "SG"),
    ("Asia/Manila", "PH"),
    ("Asia/Bangkok", "TH"),
    ("Asia/Jakarta", "ID"),
    ("Asia/Kuala_Lumpur", "MY"),
    ("Asia/Ho_Chi_Minh", "VN"),
    ("Asia/Karachi", "PK"),
    ("Asia/Dhaka", "BD"),
    ("Asia/Almaty", "KZ"),
    ("Asia/Bishkek", "KG"),
    ("Australia/Sydney", "AU"),
    ("Australia/Melbourne", "AU"),
    ("Australia/Brisbane", "AU"),
    ("Australia/Perth", "AU"),
    ("Australia/Adelaide", "AU"),
    ("Pacific/Auckland", "NZ"),
    ("Pacific/Noumea", "NC"),
    ("Pacific/Tahiti", "PF"),
];

static COUNTRY_TO_LANGUAGE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
static TIMEZONE_TO_COUNTRY: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

fn country_table() -> &'static HashMap<&'static str, &'static str> {
    COUNTRY_TO_LANGUAGE.get_or_init(|| {
        COUNTRY_LANGUAGES
            .iter()
            .flat_map(|(lang, countries)| countries.iter().map(move |country| (*country, *lang)))
            .collect()
    })
}

fn timezone_table() -> &'static HashMap<&'static str, &'static str> {
    TIMEZONE_TO_COUNTRY.get_or_init(|| TIMEZONE_COUNTRIES.iter().copied().collect())
}

/// Language spoken by default in `country`, if the country is known.
pub fn language_for_country(country: CountryCode) -> Option<Language> {
    country_table()
        .get(country.as_str())
        .and_then(|code| Language::from_code(code).ok())
}

/// Country for an IANA timezone identifier such as "Europe/Paris".
pub fn country_for_timezone(timezone: &str) -> Option<CountryCode> {
    timezone_table()
        .get(timezone.trim())
        .and_then(|code| CountryCode::parse(code))
}
