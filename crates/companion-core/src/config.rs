//! Widget configuration.

use crate::chat::{HistoryFilter, PrimaryCoursePolicy};
use crate::error::{CompanionError, Result};
use crate::session::View;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Configuration handed to the widget at init and via `update_config`.
///
/// Every field has a default, so a partial TOML file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Base URL of the course/chat backend.
    pub api_base_url: String,
    /// Which course of a new chat is marked primary.
    pub primary_course: PrimaryCoursePolicy,
    /// History list mode used when the caller does not pick one.
    pub history_filter: HistoryFilter,
    /// Panel shown right after init.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_view: Option<View>,
    /// Expand the launcher menu at init. Ignored when `initial_view` is set.
    pub open_menu_on_init: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            primary_course: PrimaryCoursePolicy::default(),
            history_filter: HistoryFilter::default(),
            initial_view: None,
            open_menu_on_init: false,
        }
    }
}

impl WidgetConfig {
    pub fn validate(&self) -> Result<()> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(CompanionError::config("api_base_url must not be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CompanionError::config(format!(
                "api_base_url must be an http(s) URL, got '{}'",
                url
            )));
        }
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = WidgetConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.primary_course, PrimaryCoursePolicy::FirstSelected);
        assert_eq!(config.history_filter, HistoryFilter::Related);
    }

    #[test]
    fn test_partial_toml() {
        let config = WidgetConfig::from_toml_str(
            r#"
            primary_course = "current_course"
            initial_view = "discovery"
            "#,
        )
        .unwrap();
        assert_eq!(config.primary_course, PrimaryCoursePolicy::CurrentCourse);
        assert_eq!(config.initial_view, Some(View::Discovery));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_rejects_non_http_url() {
        let config = WidgetConfig {
            api_base_url: "ftp://example.com".to_string(),
            ..WidgetConfig::default()
        };
        assert!(config.validate().unwrap_err().is_config());

        let config = WidgetConfig {
            api_base_url: "  ".to_string(),
            ..WidgetConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = WidgetConfig {
            history_filter: HistoryFilter::All,
            open_menu_on_init: true,
            ..WidgetConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(WidgetConfig::from_toml_str(&text).unwrap(), config);
    }
}
