//! Store settings
//!
//! Loaded from TOML; every key is optional.
//!
//! ```toml
//! debounce_ms = 250
//! validate_on_load = false
//! view_format = "yaml"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use foundry_config::ViewFormat;

use crate::error::SettingsError;

/// Tunables of a [`ConfigStore`](crate::ConfigStore)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSettings {
    /// Quiet period after the last edit before validation is issued
    pub debounce_ms: u64,
    /// Validate freshly loaded or restored configs without waiting for an edit
    pub validate_on_load: bool,
    /// Format of the live view
    pub view_format: ViewFormat,
}

impl StoreSettings {
    /// Create default settings
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With debounce window
    #[inline]
    #[must_use]
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// With validate-on-load behaviour
    #[inline]
    #[must_use]
    pub fn with_validate_on_load(mut self, enabled: bool) -> Self {
        self.validate_on_load = enabled;
        self
    }

    /// With view format
    #[inline]
    #[must_use]
    pub fn with_view_format(mut self, format: ViewFormat) -> Self {
        self.view_format = format;
        self
    }

    /// Debounce window as a duration
    #[inline]
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Parse settings from TOML text
    ///
    /// # Errors
    /// Returns [`SettingsError::Parse`] on malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    /// Read settings from a TOML file
    ///
    /// # Errors
    /// Returns [`SettingsError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            validate_on_load: true,
            view_format: ViewFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn settings_defaults() {
        let settings = StoreSettings::default();
        assert_eq!(settings.debounce(), Duration::from_millis(500));
        assert!(settings.validate_on_load);
        assert_eq!(settings.view_format, ViewFormat::Json);
    }

    #[test]
    fn settings_partial_toml() {
        let settings = StoreSettings::from_toml_str("debounce_ms = 120\n").unwrap();
        assert_eq!(settings, StoreSettings::new().with_debounce_ms(120));
    }

    #[test]
    fn settings_rejects_unknown_keys() {
        let err = StoreSettings::from_toml_str("debounce = 1\n").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn settings_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "validate_on_load = false\nview_format = \"yaml\"").unwrap();
        let settings = StoreSettings::load(file.path()).unwrap();
        assert!(!settings.validate_on_load);
        assert_eq!(settings.view_format, ViewFormat::Yaml);

        let missing = StoreSettings::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(SettingsError::Io(_))));
    }
}
