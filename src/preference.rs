//! Explicit, user-chosen language.

use crate::i18n::Language;
use crate::storage::Storage;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

/// Storage key of the saved language.
pub const SAVED_LANGUAGE_KEY: &str = "locale.saved_language";

/// Saved language preference stored as a raw code.
///
/// Values that are not one of the supported codes read as "no preference".
#[derive(Clone)]
pub struct PreferenceStore {
    storage: Arc<dyn Storage>,
}

impl PreferenceStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn load(&self) -> Option<Language> {
        let raw = match self.storage.get(SAVED_LANGUAGE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                debug!("Saved language unreadable: {:#}", e);
                return None;
            }
        };

        match Language::from_code(raw.trim()) {
            Ok(language) => Some(language),
            Err(_) => {
                debug!("Ignoring unsupported saved language {:?}", raw);
                None
            }
        }
    }

    pub fn save(&self, language: Language) -> Result<()> {
        self.storage
            .set(SAVED_LANGUAGE_KEY, language.code())
            .context("Failed to save language preference")
    }

    pub fn clear(&self) -> Result<()> {
        self.storage
            .remove(SAVED_LANGUAGE_KEY)
            .context("Failed to clear language preference")
    }
}
