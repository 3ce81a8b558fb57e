//! Serialized view of a config
//!
//! [`render`] is total: any [`Config`] produces a string. It is the single
//! source for the text shown to the user and is regenerated on every change.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};

/// Output format for the serialized view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewFormat {
    /// Two-space indented JSON
    #[default]
    Json,
    /// YAML document
    Yaml,
}

impl ViewFormat {
    /// Render `config` in this format
    ///
    /// YAML falls back to JSON if the YAML writer fails, so this stays total.
    #[must_use]
    pub fn render(self, config: &Config) -> String {
        match self {
            Self::Json => render(config),
            Self::Yaml => render_yaml(config).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "yaml view failed, falling back to json");
                render(config)
            }),
        }
    }
}

impl Display for ViewFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Yaml => f.write_str("yaml"),
        }
    }
}

impl FromStr for ViewFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(ConfigError::Serialization(format!(
                "unknown view format: {other}"
            ))),
        }
    }
}

/// Canonical 2-space indented JSON for `config`
///
/// Never fails. If the pretty writer errors the compact form is returned.
#[must_use]
pub fn render(config: &Config) -> String {
    serde_json::to_string_pretty(config.as_map()).unwrap_or_else(|err| {
        tracing::debug!(error = %err, "pretty view failed, using compact form");
        config.to_value().to_string()
    })
}

/// YAML rendering of `config`
///
/// # Errors
/// Returns [`ConfigError::Serialization`] if the YAML writer fails
pub fn render_yaml(config: &Config) -> Result<String, ConfigError> {
    serde_yaml::to_string(config.as_map()).map_err(|e| ConfigError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn render_uses_two_space_indent() {
        let config = Config::from_value(json!({"item": {"rarity": "common"}})).unwrap();
        assert_eq!(
            render(&config),
            "{\n  \"item\": {\n    \"rarity\": \"common\"\n  }\n}"
        );
    }

    #[test]
    fn render_empty_config() {
        assert_eq!(render(&Config::new()), "{}");
    }

    #[test]
    fn render_is_parseable_back() {
        let config = Config::from_value(json!({"seed": 42, "form": {"length": 0.6}})).unwrap();
        let back = Config::from_json(&render(&config)).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn render_yaml_contains_fields() {
        let config = Config::from_value(json!({"scene": {"biome": "arctic"}})).unwrap();
        let yaml = render_yaml(&config).unwrap();
        assert!(yaml.contains("scene:"));
        assert!(yaml.contains("biome: arctic"));
    }

    #[test]
    fn view_format_parse() {
        assert_eq!("JSON".parse::<ViewFormat>().unwrap(), ViewFormat::Json);
        assert_eq!("yml".parse::<ViewFormat>().unwrap(), ViewFormat::Yaml);
        assert!("toml".parse::<ViewFormat>().is_err());
        assert_eq!(ViewFormat::default().to_string(), "json");
    }
}
