/// Configuration for the timetable service
use crate::catalog::{
    AnyCatalogProvider, CatalogError, FileCatalogProvider, HttpCatalogProvider,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use url::Url;

/// Where the session catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    File(PathBuf),
    Url(String),
}

impl Default for CatalogSource {
    fn default() -> Self {
        CatalogSource::File(PathBuf::from("data/timetable.json"))
    }
}

/// Top-level service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimetableConfig {
    /// Grid rows, in display order
    pub days: Vec<String>,
    /// Grid columns, in display order
    pub slots: Vec<String>,
    pub catalog: CatalogSource,
    pub bind_address: String,
    /// How long a fetched catalog is reused
    pub catalog_ttl_secs: u64,
    /// Attempts per HTTP catalog fetch
    pub fetch_retries: u32,
    /// Sessions untouched for this long are dropped
    pub session_idle_secs: u64,
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self {
            days: ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
                .into_iter()
                .map(String::from)
                .collect(),
            slots: [
                "09:00 to 10:30",
                "10:40 to 12:10",
                "12:20 to 14:20",
                "14:30 to 16:00",
                "16:10 to 17:40",
                "17:40 to 19:10",
                "19:10 to 20:40",
                "20:40 to 22:10",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            catalog: CatalogSource::default(),
            bind_address: "127.0.0.1:3000".to_string(),
            catalog_ttl_secs: 300,
            fetch_retries: 3,
            session_idle_secs: 3600,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid config: {message}")]
    Invalid { message: String },
}

impl TimetableConfig {
    /// Loads and validates a config file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: TimetableConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`Self::load_from_path`], but falls back to the defaults when the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(path = %path.display(), "No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(path)
    }

    /// Checks that the grid layout is usable and the catalog source parses.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.days.is_empty() {
            return Err(invalid("days must not be empty"));
        }
        if self.slots.is_empty() {
            return Err(invalid("slots must not be empty"));
        }

        let mut days = HashSet::new();
        for day in &self.days {
            if day.trim().is_empty() {
                return Err(invalid("day labels must not be blank"));
            }
            if !days.insert(day.to_lowercase()) {
                return Err(invalid(format!("duplicate day: {}", day)));
            }
        }

        let mut slots = HashSet::new();
        for slot in &self.slots {
            if slot.trim().is_empty() {
                return Err(invalid("slot labels must not be blank"));
            }
            if !slots.insert(slot.as_str()) {
                return Err(invalid(format!("duplicate slot: {}", slot)));
            }
        }

        if self.session_idle_secs == 0 {
            return Err(invalid("session_idle_secs must be positive"));
        }

        if let CatalogSource::Url(url) = &self.catalog {
            Url::parse(url).map_err(|e| invalid(format!("bad catalog url {}: {}", url, e)))?;
        }

        Ok(())
    }

    /// Builds the catalog provider described by this config.
    pub fn provider(&self) -> Result<AnyCatalogProvider, CatalogError> {
        match &self.catalog {
            CatalogSource::File(path) => {
                Ok(AnyCatalogProvider::File(FileCatalogProvider::new(path)))
            }
            CatalogSource::Url(url) => {
                let url = Url::parse(url).map_err(|e| CatalogError::Network {
                    message: format!("Invalid catalog URL: {}", e),
                })?;
                Ok(AnyCatalogProvider::Http(HttpCatalogProvider::new(
                    url,
                    self.fetch_retries,
                )?))
            }
        }
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_weekly_layout() {
        let config = TimetableConfig::default();

        assert_eq!(config.days.len(), 5);
        assert_eq!(config.slots.len(), 8);
        assert_eq!(config.slots[0], "09:00 to 10:30");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: TimetableConfig = serde_json::from_str(
            r#"{"days":["Saturday"],"catalog":{"url":"https://example.org/timetable.json"}}"#,
        )
        .unwrap();

        assert_eq!(config.days, vec!["Saturday".to_string()]);
        assert_eq!(config.slots.len(), 8);
        assert_eq!(
            config.catalog,
            CatalogSource::Url("https://example.org/timetable.json".to_string())
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_duplicate_days_are_rejected() {
        let config = TimetableConfig {
            days: vec!["Monday".to_string(), "monday".to_string()],
            ..Default::default()
        };

        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_bad_url_is_rejected() {
        let config = TimetableConfig {
            catalog: CatalogSource::Url("not a url".to_string()),
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config =
            TimetableConfig::load_or_default(Path::new("/nonexistent/timetable.json")).unwrap();
        assert_eq!(config, TimetableConfig::default());
    }

    #[test]
    fn test_zero_session_idle_is_invalid() {
        let config = TimetableConfig {
            session_idle_secs: 0,
            ..TimetableConfig::default()
        };

        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }
}
