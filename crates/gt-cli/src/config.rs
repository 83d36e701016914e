//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Default cache lifetime for the raw sheet data (1 hour).
const DEFAULT_CACHE_TTL_MS: u64 = 3_600_000;

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Google spreadsheet ID holding the workout log.
    pub spreadsheet_id: Option<String>,

    /// Sheet (tab) name within the spreadsheet.
    pub sheet_name: String,

    /// Column span to read, A1 style without the sheet prefix.
    pub columns: String,

    /// Pre-issued OAuth access token for the Sheets API.
    pub access_token: Option<String>,

    /// How long fetched sheet data stays fresh.
    pub cache_ttl_ms: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("sheet_name", &self.sheet_name)
            .field("columns", &self.columns)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("cache_ttl_ms", &self.cache_ttl_ms)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            sheet_name: "LPP".to_string(),
            columns: "A:BX".to_string(),
            access_token: None,
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (GT_*)
        figment = figment.merge(Env::prefixed("GT_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for gt.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("gt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sheet_layout_matches_the_workout_log() {
        let config = Config::default();
        assert_eq!(config.sheet_name, "LPP");
        assert_eq!(config.columns, "A:BX");
        assert_eq!(config.cache_ttl_ms, 3_600_000);
        assert!(config.spreadsheet_id.is_none());
    }

    #[test]
    fn debug_redacts_access_token() {
        let config = Config {
            access_token: Some("ya29.secret".to_string()),
            ..Config::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("ya29.secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn config_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "sheet_name = \"PPL\"\ncache_ttl_ms = 60000\n").unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.sheet_name, "PPL");
        assert_eq!(config.cache_ttl_ms, 60_000);
        // Untouched keys keep their defaults.
        assert_eq!(config.columns, "A:BX");
    }
}
