//! Language and country vocabulary shared by every component.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for the supported languages and their metadata
//! - `language`: Validated `Language` type (closed set of nine codes)
//! - `country`: Uppercase two-letter `CountryCode`
//! - `tables`: Static country → language and timezone → country lookups
//!
//! # Example
//!
//! ```rust
//! use locale_engine::i18n::{language_for_country, CountryCode, Language};
//!
//! let brazil = CountryCode::parse("br").unwrap();
//! assert_eq!(language_for_country(brazil), Some(Language::PORTUGUESE));
//! assert_eq!(Language::normalize("zh"), Some(Language::CHINESE));
//! ```

mod country;
mod language;
mod registry;
mod tables;

pub use country::CountryCode;
pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use tables::{country_for_timezone, language_for_country};
