//! Key/value preferences, including the UI language.

use rusqlite::params;

use murmur_shared::constants::DEFAULT_LANGUAGE;

use crate::database::Database;
use crate::error::{Result, StoreError};

/// Preference key under which the UI language is saved.
pub const PREF_LANGUAGE: &str = "selectedLanguage";

/// Languages the UI can be switched to: `(code, display name)`.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("zh", "中文 (Chinese)"),
    ("es", "Español (Spanish)"),
    ("hi", "हिन्दी (Hindi)"),
    ("ar", "العربية (Arabic)"),
    ("pt", "Português (Portuguese)"),
    ("ru", "Русский (Russian)"),
    ("ja", "日本語 (Japanese)"),
    ("fr", "Français (French)"),
    ("de", "Deutsch (German)"),
    ("ko", "한국어 (Korean)"),
    ("it", "Italiano (Italian)"),
];

/// Whether `code` names a supported UI language.
pub fn is_supported_language(code: &str) -> bool {
    SUPPORTED_LANGUAGES.iter().any(|(c, _)| *c == code)
}

impl Database {
    pub fn get_preference(&self, key: &str) -> Result<Option<String>> {
        let result: std::result::Result<String, _> = self.conn().query_row(
            "SELECT value FROM preferences WHERE key = ?1",
            params![key],
            |row| row.get(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(other) => Err(StoreError::Sqlite(other)),
        }
    }

    pub fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO preferences (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Saved UI language, falling back to the default for missing or unknown
    /// codes.
    pub fn language(&self) -> Result<String> {
        match self.get_preference(PREF_LANGUAGE)? {
            Some(code) if is_supported_language(&code) => Ok(code),
            _ => Ok(DEFAULT_LANGUAGE.to_string()),
        }
    }

    /// Persist the UI language.  Unknown codes are rejected.
    pub fn set_language(&self, code: &str) -> Result<()> {
        if !is_supported_language(code) {
            return Err(StoreError::UnknownLanguage(code.to_string()));
        }
        self.set_preference(PREF_LANGUAGE, code)?;
        tracing::info!(language = code, "UI language saved");
        Ok(())
    }
}
