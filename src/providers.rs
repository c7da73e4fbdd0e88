//! External IP-geolocation providers.
//!
//! Each provider is a plain HTTP GET whose body is either bare text ("FR\n")
//! or JSON containing the country code at a provider-specific location. None
//! of them needs a credential; ipinfo accepts an optional token.

use crate::i18n::CountryCode;
use reqwest::StatusCode;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Default time box for a single provider attempt.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_millis(1500);

/// Why a single provider attempt produced no country.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("rate limited (HTTP 429)")]
    RateLimited,

    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("cancelled")]
    Cancelled,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

/// Where the country code lives in a provider response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryField {
    /// The whole body is the code.
    PlainText,
    /// JSON body; the code is at this JSON pointer (e.g. "/countryCode").
    Json(&'static str),
}

/// One geolocation-by-IP service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoProvider {
    pub name: String,
    pub url: String,
    pub field: CountryField,
}

impl GeoProvider {
    pub fn new(name: impl Into<String>, url: impl Into<String>, field: CountryField) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            field,
        }
    }

    pub fn ipapi() -> Self {
        Self::new("ipapi.co", "https://ipapi.co/country/", CountryField::PlainText)
    }

    pub fn ip_api() -> Self {
        Self::new(
            "ip-api.com",
            "http://ip-api.com/json/?fields=status,countryCode",
            CountryField::Json("/countryCode"),
        )
    }

    pub fn ipwho() -> Self {
        Self::new(
            "ipwho.is",
            "https://ipwho.is/",
            CountryField::Json("/country_code"),
        )
    }

    /// ipinfo.io, with `?token=` appended when a key is configured.
    pub fn ipinfo(token: Option<&str>) -> Self {
        let url = match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => format!("https://ipinfo.io/json?token={}", token),
            None => "https://ipinfo.io/json".to_string(),
        };
        Self::new("ipinfo.io", url, CountryField::Json("/country"))
    }

    /// The providers in the order they are consulted.
    pub fn default_cascade(ipinfo_token: Option<&str>) -> Vec<GeoProvider> {
        vec![
            Self::ipapi(),
            Self::ip_api(),
            Self::ipwho(),
            Self::ipinfo(ipinfo_token),
        ]
    }

    /// Pull the country code out of a response body.
    pub fn extract_country(&self, body: &str) -> Result<CountryCode, ProviderError> {
        let raw = match self.field {
            CountryField::PlainText => body.trim().to_string(),
            CountryField::Json(pointer) => {
                let value: serde_json::Value = serde_json::from_str(body)
                    .map_err(|e| ProviderError::InvalidPayload(format!("not JSON: {}", e)))?;
                value
                    .pointer(pointer)
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| {
                        ProviderError::InvalidPayload(format!("missing string at {}", pointer))
                    })?
                    .to_string()
            }
        };

        CountryCode::parse(&raw)
            .ok_or_else(|| ProviderError::InvalidPayload(format!("not a country code: {:?}", raw)))
    }

    /// Single request without a time box.
    pub async fn lookup(&self, client: &reqwest::Client) -> Result<CountryCode, ProviderError> {
        let response = client.get(&self.url).send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            return Err(ProviderError::Status(status));
        }

        let body = response.text().await?;
        self.extract_country(&body)
    }

    /// Single request raced against `timeout` and `cancel`.
    ///
    /// Whichever loses is dropped, which aborts the in-flight request.
    pub async fn lookup_with_timeout(
        &self,
        client: &reqwest::Client,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<CountryCode, ProviderError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ProviderError::Cancelled),
            result = tokio::time::timeout(timeout, self.lookup(client)) => {
                result.unwrap_or(Err(ProviderError::Timeout(timeout)))
            }
        }
    }
}

impl fmt::Display for GeoProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn mock_provider(server: &MockServer, route: &str, field: CountryField) -> GeoProvider {
        GeoProvider::new("mock", format!("{}{}", server.uri(), route), field)
    }

    // ==================== Preset Tests ====================

    #[test]
    fn test_default_cascade_order() {
        let names: Vec<_> = GeoProvider::default_cascade(None)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["ipapi.co", "ip-api.com", "ipwho.is", "ipinfo.io"]);
    }

    #[test]
    fn test_ipinfo_token_appended_when_configured() {
        assert_eq!(
            GeoProvider::ipinfo(Some("abc123")).url,
            "https://ipinfo.io/json?token=abc123"
        );
        assert_eq!(GeoProvider::ipinfo(None).url, "https://ipinfo.io/json");
        assert_eq!(GeoProvider::ipinfo(Some("  ")).url, "https://ipinfo.io/json");
    }

    // ==================== extract_country Tests ====================

    #[test]
    fn test_extract_plain_text() {
        let provider = GeoProvider::ipapi();
        let code = provider.extract_country("FR\n").expect("Should extract");
        assert_eq!(code.as_str(), "FR");
    }

    #[test]
    fn test_extract_json_field() {
        let provider = GeoProvider::ip_api();
        let code = provider
            .extract_country(r#"{"status":"success","countryCode":"de"}"#)
            .expect("Should extract");
        assert_eq!(code.as_str(), "DE");
    }

    #[test]
    fn test_extract_json_missing_field() {
        let provider = GeoProvider::ip_api();
        let err = provider
            .extract_country(r#"{"status":"fail","message":"reserved range"}"#)
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidPayload(_)));
    }

    #[test]
    fn test_extract_rejects_html_and_garbage() {
        assert!(GeoProvider::ipapi()
            .extract_country("<!DOCTYPE html><html></html>")
            .is_err());
        assert!(GeoProvider::ipwho().extract_country("not json").is_err());
        assert!(GeoProvider::ipinfo(None)
            .extract_country(r#"{"country":"France"}"#)
            .is_err());
    }

    // ==================== lookup Tests ====================

    #[tokio::test]
    async fn test_lookup_success_json() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"ip": "1.2.3.4", "country": "BR"})),
            )
            .mount(&mock_server)
            .await;

        let provider = mock_provider(&mock_server, "/json", CountryField::Json("/country"));
        let code = provider
            .lookup(&reqwest::Client::new())
            .await
            .expect("Should resolve");
        assert_eq!(code.as_str(), "BR");
    }

    #[tokio::test]
    async fn test_lookup_429_is_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/country/"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let provider = mock_provider(&mock_server, "/country/", CountryField::PlainText);
        let err = provider.lookup(&reqwest::Client::new()).await.unwrap_err();
        assert!(matches!(err, ProviderError::RateLimited));
    }

    #[tokio::test]
    async fn test_lookup_server_error_is_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/country/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let provider = mock_provider(&mock_server, "/country/", CountryField::PlainText);
        let err = provider.lookup(&reqwest::Client::new()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Status(s) if s.as_u16() == 503));
    }

    #[tokio::test]
    async fn test_lookup_connection_error_is_transport() {
        // Use an invalid URL that will fail to connect
        let provider = GeoProvider::new("dead", "http://localhost:1/", CountryField::PlainText);
        let err = provider.lookup(&reqwest::Client::new()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)));
    }

    #[tokio::test]
    async fn test_lookup_with_timeout_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("FR")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let provider = mock_provider(&mock_server, "/slow", CountryField::PlainText);
        let err = provider
            .lookup_with_timeout(
                &reqwest::Client::new(),
                Duration::from_millis(50),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_lookup_with_timeout_cancelled() {
        let provider = GeoProvider::new("never", "http://localhost:1/", CountryField::PlainText);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = provider
            .lookup_with_timeout(&reqwest::Client::new(), DEFAULT_PROVIDER_TIMEOUT, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Cancelled));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ProviderError::RateLimited.to_string(), "rate limited (HTTP 429)");
        assert!(ProviderError::Timeout(Duration::from_millis(1500))
            .to_string()
            .contains("1.5s"));
    }
}
