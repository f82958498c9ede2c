//! Persistent application settings.
//!
//! Settings live in a small JSON file (`config.json` by default):
//!
//! ```json
//! {
//!   "logs_folder": "/home/me/.local/share/chatterino/Logs",
//!   "utc_offset": -6,
//!   "exclude_commands": true,
//!   "exclude_bots": true,
//!   "terms_dir": "."
//! }
//! ```
//!
//! Command-line flags override whatever was loaded.
//!
//! # Example
//!
//! ```rust
//! use chatlog::config::AppConfig;
//!
//! let config = AppConfig::new()
//!     .with_logs_folder("/data/Logs")
//!     .with_utc_offset(-6)
//!     .with_exclude_bots(true);
//!
//! assert!(config.validate().is_ok());
//! assert!(config.filter_config().exclude_bots);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::FilterConfig;
use crate::error::{ChatlogError, Result};

/// Default name of the settings file.
pub const CONFIG_FILE: &str = "config.json";

/// Valid range of UTC offsets, in hours.
pub const UTC_OFFSET_RANGE: std::ops::RangeInclusive<i32> = -12..=14;

/// Settings shared by every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Chatterino logs folder (the one containing `Twitch/`).
    pub logs_folder: PathBuf,

    /// Local offset from UTC in hours (UTC-6 is `-6`).
    pub utc_offset: i32,

    /// Drop `!command` messages unless the query asks for commands.
    pub exclude_commands: bool,

    /// Drop bot messages unless the query names an exact user.
    pub exclude_bots: bool,

    /// Directory holding the five term list files.
    pub terms_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logs_folder: PathBuf::new(),
            utc_offset: 0,
            exclude_commands: false,
            exclude_bots: false,
            terms_dir: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the logs folder.
    #[must_use]
    pub fn with_logs_folder(mut self, path: impl Into<PathBuf>) -> Self {
        self.logs_folder = path.into();
        self
    }

    /// Sets the UTC offset in hours.
    #[must_use]
    pub fn with_utc_offset(mut self, offset: i32) -> Self {
        self.utc_offset = offset;
        self
    }

    /// Sets command exclusion.
    #[must_use]
    pub fn with_exclude_commands(mut self, exclude: bool) -> Self {
        self.exclude_commands = exclude;
        self
    }

    /// Sets bot exclusion.
    #[must_use]
    pub fn with_exclude_bots(mut self, exclude: bool) -> Self {
        self.exclude_bots = exclude;
        self
    }

    /// Sets the term list directory.
    #[must_use]
    pub fn with_terms_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.terms_dir = path.into();
        self
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ChatlogError::InvalidUtcOffset`] for offsets outside
    /// -12..=14.
    pub fn validate(&self) -> Result<()> {
        if !UTC_OFFSET_RANGE.contains(&self.utc_offset) {
            return Err(ChatlogError::InvalidUtcOffset {
                offset: self.utc_offset,
            });
        }
        Ok(())
    }

    /// Record filters implied by these settings.
    pub fn filter_config(&self) -> FilterConfig {
        FilterConfig::new()
            .with_exclude_commands(self.exclude_commands)
            .with_exclude_bots(self.exclude_bots)
    }

    /// Loads settings from `path`.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(Some(config))
    }

    /// Writes settings to `path` as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        tracing::info!(path = %path.display(), "Configuration saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.utc_offset, 0);
        assert!(!config.exclude_commands);
        assert!(!config.exclude_bots);
        assert_eq!(config.terms_dir, PathBuf::from("."));
        assert!(!config.filter_config().is_active());
    }

    #[test]
    fn test_config_builder() {
        let config = AppConfig::new()
            .with_logs_folder("/logs")
            .with_utc_offset(5)
            .with_exclude_commands(true)
            .with_terms_dir("terms");
        assert_eq!(config.logs_folder, PathBuf::from("/logs"));
        assert_eq!(config.utc_offset, 5);
        assert!(config.filter_config().exclude_commands);
        assert_eq!(config.terms_dir, PathBuf::from("terms"));
    }

    #[test]
    fn test_validate_offset_range() {
        assert!(AppConfig::new().with_utc_offset(-12).validate().is_ok());
        assert!(AppConfig::new().with_utc_offset(14).validate().is_ok());
        let err = AppConfig::new().with_utc_offset(15).validate().unwrap_err();
        assert!(err.is_config());
        assert!(AppConfig::new().with_utc_offset(-13).validate().is_err());
    }

    #[test]
    fn test_load_missing_is_none() {
        let dir = tempdir().unwrap();
        assert!(AppConfig::load(&dir.path().join(CONFIG_FILE)).unwrap().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let config = AppConfig::new()
            .with_logs_folder("/data/Logs")
            .with_utc_offset(-6)
            .with_exclude_bots(true);
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_original_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"{"logs_folder": "C:/Logs", "utc_offset": 2, "exclude_commands": true, "exclude_bots": false}"#,
        )
        .unwrap();
        let loaded = AppConfig::load(&path).unwrap().unwrap();
        assert_eq!(loaded.utc_offset, 2);
        assert!(loaded.exclude_commands);
        assert_eq!(loaded.terms_dir, PathBuf::from("."));
    }

    #[test]
    fn test_load_rejects_bad_json_and_offsets() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(ChatlogError::Json(_))));

        fs::write(&path, r#"{"utc_offset": 99}"#).unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ChatlogError::InvalidUtcOffset { offset: 99 })
        ));
    }
}
