//! Client settings.
//!
//! Settings live in `<config_dir>/effortless/settings.json`. A missing file
//! yields the defaults; the service URL can be overridden through the
//! `EFFORTLESS_SERVICE_URL` environment variable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Environment variable overriding [`Settings::service_url`].
pub const SERVICE_URL_ENV: &str = "EFFORTLESS_SERVICE_URL";

const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for talking to the Mail Service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the Mail Service.
    pub service_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Default location of the settings file.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("effortless")
            .join("settings.json")
    }

    /// Loads settings from the default location and applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load() -> Result<Self> {
        let settings = Self::load_from(&Self::default_path()).await?;
        let settings = settings.with_service_url(std::env::var(SERVICE_URL_ENV).ok());
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed or validated.
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = tokio::fs::read_to_string(path).await?;
        let settings: Self = serde_json::from_str(&contents)?;
        settings.validate()?;

        tracing::debug!("Settings loaded from {:?}", path);
        Ok(settings)
    }

    /// Saves settings to a specific file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;

        tracing::info!("Settings saved to {:?}", path);
        Ok(())
    }

    /// Replaces the service URL when an override is present and non-empty.
    #[must_use]
    pub fn with_service_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.map(|u| u.trim().to_string())
            && !url.is_empty()
        {
            self.service_url = url;
        }
        self
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Checks that the settings are usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a non-HTTP service URL or a zero timeout.
    pub fn validate(&self) -> Result<()> {
        let url = self.service_url.to_lowercase();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(Error::Config(format!(
                "service_url must be an http(s) URL, got {:?}",
                self.service_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("effortless-test-{}", std::process::id()))
            .join(name)
    }

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let settings = Settings::load_from(&scratch_path("does-not-exist.json"))
            .await
            .unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.service_url, "http://127.0.0.1:8000");
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let path = scratch_path("roundtrip.json");
        let settings = Settings {
            service_url: "https://mail.example.com".to_string(),
            request_timeout_secs: 5,
        };

        settings.save_to(&path).await.unwrap();
        let loaded = Settings::load_from(&path).await.unwrap();
        assert_eq!(loaded, settings);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_partial_file_fills_defaults() {
        let path = scratch_path("partial.json");
        tokio::fs::create_dir_all(path.parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(&path, r#"{"request_timeout_secs": 3}"#)
            .await
            .unwrap();

        let loaded = Settings::load_from(&path).await.unwrap();
        assert_eq!(loaded.request_timeout_secs, 3);
        assert_eq!(loaded.service_url, DEFAULT_SERVICE_URL);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[test]
    fn test_service_url_override() {
        let settings = Settings::default().with_service_url(Some("http://10.0.0.2:9000".into()));
        assert_eq!(settings.service_url, "http://10.0.0.2:9000");

        let unchanged = Settings::default().with_service_url(Some("   ".into()));
        assert_eq!(unchanged.service_url, DEFAULT_SERVICE_URL);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_url = Settings {
            service_url: "ftp://example.com".into(),
            ..Settings::default()
        };
        assert!(matches!(bad_url.validate(), Err(Error::Config(_))));

        let zero_timeout = Settings {
            request_timeout_secs: 0,
            ..Settings::default()
        };
        assert!(zero_timeout.validate().is_err());
        assert!(Settings::default().validate().is_ok());
    }
}
