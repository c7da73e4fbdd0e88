//! Integration tests for the locale engine
//!
//! These tests drive the public API end to end: detection against mocked
//! geolocation services, persistence through file-backed state, and the
//! formatter and route codec consuming the detected signals.

use chrono::{TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use locale_engine::environment::{FixedLanguages, FixedTimezone};
use locale_engine::format::{FormatOptions, LocaleFormatter};
use locale_engine::providers::{CountryField, GeoProvider};
use locale_engine::storage::{FileStorage, Storage};
use locale_engine::{Config, CountryCode, CountryResolver, Language, RouteLocaleCodec};

// ==================== Test Helpers ====================

/// Resolver over file state in `dir` with no timezone and no client languages
fn file_resolver(dir: &TempDir, providers: Vec<GeoProvider>) -> CountryResolver {
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::in_dir(dir.path()));
    CountryResolver::with_storage(storage)
        .with_timezone_source(Arc::new(FixedTimezone::none()))
        .with_client_languages(Arc::new(FixedLanguages(Vec::new())))
        .with_providers(providers)
        .with_provider_timeout(Duration::from_millis(500))
}

/// Mocked cascade: plain-text provider answering 429, then a JSON provider
async fn mocked_cascade(server: &MockServer, country: &str) -> Vec<GeoProvider> {
    Mock::given(method("GET"))
        .and(path("/country/"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": "success", "countryCode": country})),
        )
        .expect(1)
        .mount(server)
        .await;

    vec![
        GeoProvider::new(
            "text",
            format!("{}/country/", server.uri()),
            CountryField::PlainText,
        ),
        GeoProvider::new(
            "json",
            format!("{}/json", server.uri()),
            CountryField::Json("/countryCode"),
        ),
    ]
}

fn sample_instant() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 14, 30, 0).unwrap()
}

// ==================== Detection Pipeline Tests ====================

#[tokio::test]
async fn test_cold_start_detects_language_from_providers() {
    let dir = TempDir::new().expect("Should create temp dir");
    let server = MockServer::start().await;
    let providers = mocked_cascade(&server, "BR").await;

    let resolver = file_resolver(&dir, providers);
    let language = resolver.detect_user_language(Language::ENGLISH).await;

    assert_eq!(language, Language::PORTUGUESE);
    assert_eq!(resolver.metrics().provider_calls(), 2);
    assert_eq!(resolver.metrics().provider_rate_limits(), 1);
}

#[tokio::test]
async fn test_detected_country_survives_restart() {
    let dir = TempDir::new().expect("Should create temp dir");
    let server = MockServer::start().await;
    let providers = mocked_cascade(&server, "DE").await;

    let first = file_resolver(&dir, providers);
    assert_eq!(first.detect_country().await, CountryCode::parse("DE"));

    // Fresh resolver over the same directory: no provider is reachable, the
    // cached entry must answer.
    let second = file_resolver(&dir, Vec::new());
    assert_eq!(second.get_cached_geo_data(), CountryCode::parse("DE"));
    assert_eq!(
        second.detect_user_language(Language::ENGLISH).await,
        Language::GERMAN
    );
    assert_eq!(second.metrics().provider_calls(), 0);
}

#[tokio::test]
async fn test_all_sources_exhausted_returns_default() {
    let dir = TempDir::new().expect("Should create temp dir");
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let providers = vec![GeoProvider::new(
        "down",
        format!("{}/country/", server.uri()),
        CountryField::PlainText,
    )];
    let resolver = file_resolver(&dir, providers);

    assert_eq!(
        resolver.detect_user_language(Language::FRENCH).await,
        Language::FRENCH
    );
    assert_eq!(resolver.get_cached_geo_data(), None);
}

#[tokio::test]
async fn test_saved_preference_persists_and_wins() {
    let dir = TempDir::new().expect("Should create temp dir");

    let first = file_resolver(&dir, Vec::new());
    first
        .save_language(Language::ARABIC)
        .expect("Should save language");

    let raw = std::fs::read_to_string(dir.path().join(FileStorage::FILE_NAME))
        .expect("Should write state file");
    assert!(raw.contains("locale.saved_language"));

    let second = file_resolver(&dir, Vec::new())
        .with_timezone_source(Arc::new(FixedTimezone::new("Europe/Paris")));
    assert_eq!(
        second.detect_user_language(Language::ENGLISH).await,
        Language::ARABIC
    );

    second.clear_saved_language().expect("Should clear language");
    assert_eq!(
        second.detect_user_language(Language::ENGLISH).await,
        Language::FRENCH
    );
}

// ==================== Config Integration Tests ====================

#[tokio::test]
async fn test_resolver_from_config_without_providers() {
    let dir = TempDir::new().expect("Should create temp dir");
    let config = Config {
        state_dir: dir.path().join("nested"),
        default_language: Language::SPANISH,
        provider_timeout: Duration::from_millis(100),
        geo_providers_enabled: false,
        ipinfo_token: None,
    };

    let resolver = CountryResolver::from_config(&config).expect("Should build resolver");
    assert!(resolver.providers().is_empty());

    resolver
        .save_language(Language::HINDI)
        .expect("Should create nested state dir");
    assert!(dir.path().join("nested").join(FileStorage::FILE_NAME).exists());
}

// ==================== Formatter And Route Tests ====================

#[tokio::test]
async fn test_formatter_and_codec_follow_detection() {
    let dir = TempDir::new().expect("Should create temp dir");
    let server = MockServer::start().await;
    let providers = mocked_cascade(&server, "BR").await;

    let resolver = file_resolver(&dir, providers);
    let language = resolver.detect_user_language(Language::ENGLISH).await;

    let formatter = LocaleFormatter::from_resolver(&resolver);
    let options = FormatOptions::new();
    assert_eq!(formatter.resolve_country(&options).as_str(), "BR");
    assert_eq!(formatter.format_date(sample_instant(), &options), "15/03/2024");
    assert_eq!(formatter.format_time(sample_instant(), &options), "14:30");
    assert!(formatter.format_currency(100.0, &options).ends_with('€'));

    let codec = RouteLocaleCodec::from_resolver(&resolver);
    assert_eq!(codec.get_locale_string(language, None), "pt-br");

    let redirect = codec.parse_legacy_locale_from_path("/es/cookies");
    assert_eq!(redirect.new_path.as_deref(), Some("/es-br/cookies"));
}

#[test]
fn test_standalone_surfaces_need_no_runtime_state() {
    let formatter = LocaleFormatter::standalone();
    let options = FormatOptions::new()
        .language(Language::GERMAN)
        .country("DE");

    assert_eq!(formatter.format_date(sample_instant(), &options), "15.03.2024");
    assert_eq!(formatter.format_number(1234567.89, &options), "1.234.567,89");
    assert_eq!(formatter.format_date(None::<i64>, &options), locale_engine::PLACEHOLDER);

    let codec = RouteLocaleCodec::standalone();
    let parsed = codec.parse_locale_from_path("/de-at/preise");
    assert_eq!(parsed.lang, Some(Language::GERMAN));
    assert_eq!(parsed.path_without_locale, "/preise");
    assert_eq!(codec.get_locale_string(Language::GERMAN, None), "de-de");
}
