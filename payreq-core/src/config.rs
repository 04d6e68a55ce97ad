use serde::{Deserialize, Serialize};

use crate::parser::ParseMode;

pub const DEFAULT_LOCALE: &str = "en";
pub const NEVER_LABEL: &str = "never";
pub const EXPIRED_LABEL: &str = "expired";

/// Settings for deriving payment and invoice facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactsConfig {
    pub locale: String,
    pub parse_mode: ParseMode,
    /// Treat invoices without an `expiry` tag as expiring after the BOLT11 default of
    /// one hour instead of never.
    pub apply_default_expiry: bool,
    pub never_label: String,
    pub expired_label: String,
}

impl Default for FactsConfig {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            parse_mode: ParseMode::default(),
            apply_default_expiry: false,
            never_label: NEVER_LABEL.to_string(),
            expired_label: EXPIRED_LABEL.to_string(),
        }
    }
}

pub struct FactsConfigBuilder {
    locale: Option<String>,
    parse_mode: ParseMode,
    apply_default_expiry: bool,
    never_label: Option<String>,
    expired_label: Option<String>,
}

impl FactsConfigBuilder {
    pub fn new() -> FactsConfigBuilder {
        FactsConfigBuilder {
            locale: None,
            parse_mode: ParseMode::default(),
            apply_default_expiry: false,
            never_label: None,
            expired_label: None,
        }
    }

    pub fn with_locale(mut self, locale: String) -> FactsConfigBuilder {
        self.locale = Some(locale);
        self
    }

    pub fn with_parse_mode(mut self, parse_mode: ParseMode) -> FactsConfigBuilder {
        self.parse_mode = parse_mode;
        self
    }

    pub fn with_default_expiry(mut self) -> FactsConfigBuilder {
        self.apply_default_expiry = true;
        self
    }

    pub fn with_never_label(mut self, label: String) -> FactsConfigBuilder {
        self.never_label = Some(label);
        self
    }

    pub fn with_expired_label(mut self, label: String) -> FactsConfigBuilder {
        self.expired_label = Some(label);
        self
    }

    pub fn build(self) -> FactsConfig {
        FactsConfig {
            locale: self.locale.unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            parse_mode: self.parse_mode,
            apply_default_expiry: self.apply_default_expiry,
            never_label: self.never_label.unwrap_or_else(|| NEVER_LABEL.to_string()),
            expired_label: self
                .expired_label
                .unwrap_or_else(|| EXPIRED_LABEL.to_string()),
        }
    }
}

impl Default for FactsConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        assert_eq!(FactsConfigBuilder::new().build(), FactsConfig::default());
    }

    #[test]
    fn test_builder() {
        let config = FactsConfigBuilder::new()
            .with_locale("fr".to_string())
            .with_parse_mode(ParseMode::Exhaustive)
            .with_default_expiry()
            .with_never_label("jamais".to_string())
            .with_expired_label("expiré".to_string())
            .build();

        assert_eq!(config.locale, "fr");
        assert_eq!(config.parse_mode, ParseMode::Exhaustive);
        assert!(config.apply_default_expiry);
        assert_eq!(config.never_label, "jamais");
        assert_eq!(config.expired_label, "expiré");
    }

    #[test]
    fn test_deserialize_partial() {
        let config: FactsConfig = serde_json::from_str(
            r#"{"locale": "zh", "parse_mode": "exhaustive"}"#,
        )
        .unwrap();

        assert_eq!(config.locale, "zh");
        assert_eq!(config.parse_mode, ParseMode::Exhaustive);
        assert!(!config.apply_default_expiry);
        assert_eq!(config.never_label, NEVER_LABEL);

        let config: FactsConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, FactsConfig::default());
    }
}
