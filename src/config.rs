//! Configuration management for Keydriver
//!
//! Settings are resolved in layers: environment variables (`KEYDRIVER_*`)
//! override values from a TOML file, which override built-in defaults.
//! Settings are read-only after loading and shared across contexts.

use crate::session::traits::BrowserKind;
use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Toolkit configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Browser kind to launch by default
    pub browser: String,

    /// Headless mode
    pub headless: bool,

    /// Implicit wait applied to every session, in seconds
    pub implicit_wait_secs: u64,

    /// Explicit (default) wait used by synchronized interactions, in seconds
    pub explicit_wait_secs: u64,

    /// Poll interval for bounded waits, in milliseconds
    pub poll_interval_ms: u64,

    /// Window width
    pub window_width: u32,

    /// Window height
    pub window_height: u32,

    /// Active environment name for URL selection
    pub environment: String,

    /// Application URL per environment
    pub app_urls: HashMap<String, String>,

    /// Screenshots directory
    pub screenshots_dir: PathBuf,

    /// Enable screenshot capture
    pub screenshots_enabled: bool,

    /// Free-form properties for test-case use
    pub extra: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            browser: "chrome".to_string(),
            headless: false,
            implicit_wait_secs: 10,
            explicit_wait_secs: 20,
            poll_interval_ms: 100,
            window_width: 1920,
            window_height: 1080,
            environment: "dev".to_string(),
            app_urls: HashMap::new(),
            screenshots_dir: PathBuf::from("./screenshots"),
            screenshots_enabled: true,
            extra: HashMap::new(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file, then apply environment overrides
    pub fn load(path: &str) -> Result<Self> {
        let mut settings = Self::from_file(path)?;
        settings.apply_env_overrides()?;
        Ok(settings)
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::configuration(format!("Failed to read config file: {}", e)))?;

        let settings: Settings = toml::from_str(&content)
            .map_err(|e| Error::configuration(format!("Failed to parse config: {}", e)))?;

        Ok(settings)
    }

    /// Load settings from environment variables only
    pub fn from_env() -> Result<Self> {
        let mut settings = Settings::default();
        settings.apply_env_overrides()?;
        Ok(settings)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(browser) = env::var("KEYDRIVER_BROWSER") {
            self.browser = browser;
        }

        if let Ok(headless) = env::var("KEYDRIVER_HEADLESS") {
            self.headless = headless
                .parse()
                .map_err(|_| Error::configuration("Invalid KEYDRIVER_HEADLESS"))?;
        }

        if let Ok(implicit) = env::var("KEYDRIVER_IMPLICIT_WAIT") {
            self.implicit_wait_secs = implicit
                .parse()
                .map_err(|_| Error::configuration("Invalid KEYDRIVER_IMPLICIT_WAIT"))?;
        }

        if let Ok(explicit) = env::var("KEYDRIVER_EXPLICIT_WAIT") {
            self.explicit_wait_secs = explicit
                .parse()
                .map_err(|_| Error::configuration("Invalid KEYDRIVER_EXPLICIT_WAIT"))?;
        }

        if let Ok(environment) = env::var("KEYDRIVER_ENVIRONMENT") {
            self.environment = environment;
        }

        if let Ok(dir) = env::var("KEYDRIVER_SCREENSHOTS_DIR") {
            self.screenshots_dir = PathBuf::from(dir);
        }

        Ok(())
    }

    /// Get a free-form property. An environment variable
    /// `KEYDRIVER_<KEY>` (upper-cased) takes precedence over the file value.
    pub fn get(&self, key: &str) -> Option<String> {
        let env_key = format!("KEYDRIVER_{}", key.to_uppercase().replace('.', "_"));
        if let Ok(value) = env::var(env_key) {
            return Some(value);
        }
        self.extra.get(key).cloned()
    }

    /// Get a free-form property with a default fallback
    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Configured browser kind
    pub fn browser_kind(&self) -> Result<BrowserKind> {
        self.browser.parse()
    }

    /// Implicit wait duration
    pub fn implicit_wait(&self) -> Duration {
        Duration::from_secs(self.implicit_wait_secs)
    }

    /// Explicit wait duration
    pub fn explicit_wait(&self) -> Duration {
        Duration::from_secs(self.explicit_wait_secs)
    }

    /// Poll interval for bounded waits
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Application URL for the active environment
    pub fn app_url(&self) -> Result<&str> {
        self.app_urls
            .get(&self.environment)
            .map(|s| s.as_str())
            .ok_or_else(|| {
                Error::configuration(format!(
                    "No application URL configured for environment '{}'",
                    self.environment
                ))
            })
    }
}
