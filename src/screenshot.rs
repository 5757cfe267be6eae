//! Screenshot capture
//!
//! Evidence capture for test reporting. Capture failures degrade to a
//! warning and `None` instead of failing the caller: a missing screenshot
//! must never mask or replace the test outcome it documents.

use crate::session::traits::Session;
use crate::{Result, Settings};
use chrono::{Duration as ChronoDuration, Local};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Screenshot writer over a session's driver
pub struct Screenshots {
    dir: PathBuf,
    enabled: bool,
}

impl Screenshots {
    pub fn new(settings: &Settings) -> Self {
        Self {
            dir: settings.screenshots_dir.clone(),
            enabled: settings.screenshots_enabled,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Capture a screenshot of the session's current page
    ///
    /// Returns the written path, or `None` when capture is disabled or the
    /// driver refused. File names carry the label and a local timestamp so
    /// repeated captures never clobber each other across runs.
    pub async fn capture(&self, session: &Session, label: &str) -> Result<Option<PathBuf>> {
        if !self.enabled {
            return Ok(None);
        }

        let png = match session.driver().screenshot_png().await {
            Ok(png) => png,
            Err(e) => {
                warn!(label, error = %e, "Screenshot capture failed");
                return Ok(None);
            }
        };

        tokio::fs::create_dir_all(&self.dir).await?;

        let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let path = self
            .dir
            .join(format!("{}_{}.png", sanitize(label), timestamp));
        tokio::fs::write(&path, png).await?;

        debug!(path = %path.display(), "Screenshot written");
        Ok(Some(path))
    }

    /// Capture a failure screenshot, named so failures sort together
    pub async fn capture_failure(&self, session: &Session, label: &str) -> Result<Option<PathBuf>> {
        self.capture(session, &format!("FAILED_{}", label)).await
    }

    /// Delete screenshots older than the given number of days
    ///
    /// Housekeeping only. Errors are logged and swallowed; stale evidence
    /// files are not worth failing a run over.
    pub async fn cleanup_older_than(&self, days: i64) {
        let cutoff = Local::now() - ChronoDuration::days(days);
        let cutoff = std::time::SystemTime::from(cutoff);

        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(_) => return,
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.extension().map(|e| e != "png").unwrap_or(true) {
                continue;
            }

            let modified = match entry.metadata().await.and_then(|m| m.modified()) {
                Ok(modified) => modified,
                Err(_) => continue,
            };

            if modified < cutoff {
                if let Err(e) = tokio::fs::remove_file(&path).await {
                    warn!(path = %path.display(), error = %e, "Screenshot cleanup failed");
                }
            }
        }
    }
}

/// Keep file names portable: labels come from free-form test names
fn sanitize(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::MockDriver;
    use crate::driver::traits::DriverSession as _;
    use crate::keywords::wait::Wait;
    use crate::session::traits::BrowserKind;
    use std::time::Duration;

    fn session() -> (Session, std::sync::Arc<MockDriver>) {
        let driver = MockDriver::new();
        let session = Session::new(
            BrowserKind::Chrome,
            Duration::from_secs(10),
            Wait::new(Duration::from_secs(20)),
            driver.clone(),
        );
        (session, driver)
    }

    fn screenshots_in(dir: &Path) -> Screenshots {
        let mut settings = Settings::default();
        settings.screenshots_dir = dir.to_path_buf();
        settings.screenshots_enabled = true;
        Screenshots::new(&settings)
    }

    #[tokio::test]
    async fn test_capture_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let shots = screenshots_in(dir.path());
        let (session, _) = session();

        let path = shots.capture(&session, "login_page").await.unwrap().unwrap();
        assert!(path.exists());
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("login_page_"));
        assert_eq!(path.extension().unwrap(), "png");

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[tokio::test]
    async fn test_capture_failure_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let shots = screenshots_in(dir.path());
        let (session, _) = session();

        let path = shots
            .capture_failure(&session, "checkout test")
            .await
            .unwrap()
            .unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("FAILED_checkout_test_"));
    }

    #[tokio::test]
    async fn test_disabled_capture_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.screenshots_dir = dir.path().to_path_buf();
        settings.screenshots_enabled = false;
        let shots = Screenshots::new(&settings);
        let (session, _) = session();

        assert!(shots.capture(&session, "skipped").await.unwrap().is_none());
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_dead_driver_degrades_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let shots = screenshots_in(dir.path());
        let (session, driver) = session();
        driver.quit().await.unwrap();

        // Never an error, the test outcome stays untouched
        assert!(shots.capture(&session, "after_quit").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cleanup_spares_recent_files() {
        let dir = tempfile::tempdir().unwrap();
        let shots = screenshots_in(dir.path());
        let (session, _) = session();

        let path = shots.capture(&session, "fresh").await.unwrap().unwrap();
        shots.cleanup_older_than(7).await;
        assert!(path.exists());
    }
}
