//! Filesystem locations used by the widget tooling.

use companion_core::error::{CompanionError, Result};
use std::path::PathBuf;

const APP_DIR: &str = "course-companion";
const CONFIG_FILE: &str = "widget.toml";

/// Resolves the widget's config locations.
///
/// - Linux: `~/.config/course-companion/widget.toml`
/// - macOS: `~/Library/Application Support/course-companion/widget.toml`
/// - Windows: `%APPDATA%\course-companion\widget.toml`
#[derive(Debug, Clone)]
pub struct CompanionPaths {
    base_override: Option<PathBuf>,
}

impl CompanionPaths {
    /// `base_override` replaces the platform config dir (used by tests and
    /// the CLI's `--config-dir`).
    pub fn new(base_override: Option<PathBuf>) -> Self {
        Self { base_override }
    }

    pub fn config_dir(&self) -> Result<PathBuf> {
        match &self.base_override {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or_else(|| {
                    CompanionError::config("could not determine the user config directory")
                }),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(CONFIG_FILE))
    }
}

impl Default for CompanionPaths {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_is_used_verbatim() {
        let paths = CompanionPaths::new(Some(PathBuf::from("/tmp/cc")));
        assert_eq!(paths.config_file().unwrap(), PathBuf::from("/tmp/cc/widget.toml"));
    }
}
