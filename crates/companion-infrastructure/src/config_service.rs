//! Configuration service implementation.
//!
//! Loads the widget configuration from a TOML file
//! (`~/.config/course-companion/widget.toml` by default) and caches it.

use crate::paths::CompanionPaths;
use companion_core::config::WidgetConfig;
use companion_core::error::{CompanionError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Environment variable that overrides `api_base_url` at load time.
pub const API_BASE_URL_ENV: &str = "COMPANION_API_BASE_URL";

/// Configuration service that loads and caches the widget configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<WidgetConfig>>>,
}

impl ConfigService {
    /// Creates a service bound to an explicit config file path.
    ///
    /// Nothing is read until the first [`get_config`](Self::get_config).
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service for the default config file location.
    pub fn from_paths(paths: &CompanionPaths) -> Result<Self> {
        Ok(Self::new(paths.config_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// A missing file yields defaults. A file that does not parse or
    /// validate is an error; it is never silently replaced.
    pub fn get_config(&self) -> Result<WidgetConfig> {
        {
            let cached = self.config.read().map_err(|_| poisoned())?;
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let loaded = apply_env_override(
            load_config(&self.path)?,
            std::env::var(API_BASE_URL_ENV).ok(),
        );
        loaded.validate()?;

        let mut cached = self.config.write().map_err(|_| poisoned())?;
        *cached = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) -> Result<()> {
        let mut cached = self.config.write().map_err(|_| poisoned())?;
        *cached = None;
        Ok(())
    }

    /// Validates and writes `config`, then refreshes the cache.
    ///
    /// The file is replaced atomically: content goes to a sibling temp file
    /// which is then renamed over the target.
    pub fn save(&self, config: &WidgetConfig) -> Result<()> {
        config.validate()?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = config.to_toml_string()?;
        let tmp_path = self.path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;
        tracing::info!(path = %self.path.display(), "Saved widget config");

        let mut cached = self.config.write().map_err(|_| poisoned())?;
        *cached = Some(config.clone());
        Ok(())
    }
}

fn poisoned() -> CompanionError {
    CompanionError::internal("config cache lock poisoned")
}

fn load_config(path: &Path) -> Result<WidgetConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No widget config file, using defaults");
        return Ok(WidgetConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config = WidgetConfig::from_toml_str(&content)?;
    tracing::debug!(path = %path.display(), "Loaded widget config");
    Ok(config)
}

/// Applies the `COMPANION_API_BASE_URL` override, ignoring blank values.
pub fn apply_env_override(mut config: WidgetConfig, api_base_url: Option<String>) -> WidgetConfig {
    if let Some(url) = api_base_url.filter(|url| !url.trim().is_empty()) {
        config.api_base_url = url.trim().to_string();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use companion_core::chat::{HistoryFilter, PrimaryCoursePolicy};
    use companion_core::session::View;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let service = ConfigService::new(dir.path().join("widget.toml"));
        let config = service.get_config().unwrap();
        assert_eq!(config.primary_course, PrimaryCoursePolicy::FirstSelected);
        assert!(!service.path().exists());
    }

    #[test]
    fn test_save_then_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("widget.toml");
        let service = ConfigService::new(path.clone());

        let config = WidgetConfig {
            api_base_url: "https://courses.example.com".to_string(),
            history_filter: HistoryFilter::Exact,
            initial_view: Some(View::Discovery),
            ..WidgetConfig::default()
        };
        service.save(&config).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("toml.tmp").exists());

        let fresh = ConfigService::new(path);
        let loaded = fresh.get_config().unwrap();
        assert_eq!(loaded.history_filter, HistoryFilter::Exact);
        assert_eq!(loaded.initial_view, Some(View::Discovery));
    }

    #[test]
    fn test_cache_until_invalidated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("widget.toml");
        let service = ConfigService::new(path.clone());
        assert_eq!(service.get_config().unwrap().history_filter, HistoryFilter::Related);

        fs::write(&path, "history_filter = \"all\"\n").unwrap();
        assert_eq!(service.get_config().unwrap().history_filter, HistoryFilter::Related);

        service.invalidate_cache().unwrap();
        assert_eq!(service.get_config().unwrap().history_filter, HistoryFilter::All);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("widget.toml");
        fs::write(&path, "api_base_url = \"localhost\"\n").unwrap();
        let err = ConfigService::new(path).get_config().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_save_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let service = ConfigService::new(dir.path().join("widget.toml"));
        let config = WidgetConfig {
            api_base_url: String::new(),
            ..WidgetConfig::default()
        };
        assert!(service.save(&config).is_err());
        assert!(!service.path().exists());
    }

    #[test]
    fn test_env_override() {
        let config = apply_env_override(
            WidgetConfig::default(),
            Some(" https://api.example.com ".to_string()),
        );
        assert_eq!(config.api_base_url, "https://api.example.com");

        let config = apply_env_override(WidgetConfig::default(), Some("   ".to_string()));
        assert_eq!(config.api_base_url, companion_core::config::DEFAULT_API_BASE_URL);
    }
}
