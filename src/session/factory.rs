//! Session factory
//!
//! Builds sessions over the closed set of browser kinds: validates the
//! kind, assembles per-kind driver arguments, launches the backend, then
//! applies the session-wide settings (implicit wait, maximized window)
//! exactly once.

use crate::driver::traits::DriverLauncher;
use crate::keywords::wait::Wait;
use crate::session::traits::{BrowserKind, Capabilities, Session};
use crate::{Result, Settings};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Session factory
pub struct SessionFactory {
    launcher: Arc<dyn DriverLauncher>,
    explicit_wait: Duration,
    poll_interval: Duration,
}

impl SessionFactory {
    pub fn new(launcher: Arc<dyn DriverLauncher>, settings: &Settings) -> Self {
        Self {
            launcher,
            explicit_wait: settings.explicit_wait(),
            poll_interval: settings.poll_interval(),
        }
    }

    /// Build a session for a browser kind
    ///
    /// Kind-string validation happens in `BrowserKind::from_str`, before
    /// this is reached, so no native resource is ever allocated for an
    /// unsupported kind.
    pub async fn build(&self, kind: BrowserKind, mut caps: Capabilities) -> Result<Session> {
        caps.kind = kind;
        self.assemble_args(kind, &mut caps);

        let driver = self.launcher.launch(&caps).await?;

        // Session-wide side effects, applied exactly once at creation
        driver.set_implicit_wait(caps.implicit_wait).await?;
        driver.maximize_window().await?;

        info!(
            kind = %kind,
            headless = caps.headless,
            implicit_wait_secs = caps.implicit_wait.as_secs(),
            "Browser session created"
        );

        Ok(Session::new(
            kind,
            caps.implicit_wait,
            Wait::new(self.explicit_wait).with_poll_interval(self.poll_interval),
            driver,
        ))
    }

    fn assemble_args(&self, kind: BrowserKind, caps: &mut Capabilities) {
        match kind {
            BrowserKind::Chrome => {
                if caps.headless {
                    caps.args.push("--headless".to_string());
                }
                caps.args.push("--no-sandbox".to_string());
                caps.args.push("--disable-dev-shm-usage".to_string());
                caps.args.push("--disable-gpu".to_string());
                caps.args.push(format!(
                    "--window-size={},{}",
                    caps.window_width, caps.window_height
                ));
                caps.args.push("--disable-extensions".to_string());
            }
            BrowserKind::Firefox => {
                if caps.headless {
                    caps.args.push("--headless".to_string());
                }
                caps.args.push(format!("--width={}", caps.window_width));
                caps.args.push(format!("--height={}", caps.window_height));
            }
            BrowserKind::Edge => {
                if caps.headless {
                    caps.args.push("--headless".to_string());
                }
                caps.args.push("--no-sandbox".to_string());
                caps.args.push("--disable-dev-shm-usage".to_string());
                caps.args.push("--disable-gpu".to_string());
                caps.args.push(format!(
                    "--window-size={},{}",
                    caps.window_width, caps.window_height
                ));
            }
            BrowserKind::Safari => {
                // Safari has no headless mode; a requested flag is ignored
                // rather than rejected
                if caps.headless {
                    warn!("Safari does not support headless mode; ignoring headless flag");
                    caps.headless = false;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::MockLauncher;

    fn factory_with_launcher() -> (SessionFactory, Arc<MockLauncher>) {
        let launcher = Arc::new(MockLauncher::new());
        let factory = SessionFactory::new(launcher.clone(), &Settings::default());
        (factory, launcher)
    }

    #[tokio::test]
    async fn test_build_applies_implicit_wait_and_maximizes() {
        let launcher = Arc::new(MockLauncher::new());
        let driver = crate::driver::mock::MockDriver::new();
        launcher.prepare(driver.clone());

        let factory = SessionFactory::new(launcher, &Settings::default());
        let caps = Capabilities {
            implicit_wait: Duration::from_secs(12),
            ..Default::default()
        };
        let session = factory.build(BrowserKind::Chrome, caps).await.unwrap();

        assert_eq!(session.implicit_wait(), Duration::from_secs(12));
        assert_eq!(
            driver.recorded_implicit_wait(),
            Some(Duration::from_secs(12))
        );
        assert!(driver.was_maximized());
        assert_eq!(session.kind(), BrowserKind::Chrome);
    }

    #[tokio::test]
    async fn test_chrome_headless_arg() {
        let (factory, launcher) = factory_with_launcher();
        let caps = Capabilities {
            headless: true,
            ..Default::default()
        };
        factory.build(BrowserKind::Chrome, caps).await.unwrap();

        let caps = launcher.last_capabilities().unwrap();
        assert!(caps.headless);
        assert!(caps.args.iter().any(|a| a == "--headless"));
        assert!(caps.args.iter().any(|a| a == "--no-sandbox"));
        assert!(caps.args.iter().any(|a| a == "--window-size=1920,1080"));
    }

    #[tokio::test]
    async fn test_firefox_window_args() {
        let (factory, launcher) = factory_with_launcher();
        factory
            .build(BrowserKind::Firefox, Capabilities::default())
            .await
            .unwrap();

        let caps = launcher.last_capabilities().unwrap();
        assert!(caps.args.iter().any(|a| a == "--width=1920"));
        assert!(caps.args.iter().any(|a| a == "--height=1080"));
        assert!(!caps.args.iter().any(|a| a == "--headless"));
    }

    #[tokio::test]
    async fn test_safari_ignores_headless() {
        let (factory, launcher) = factory_with_launcher();
        let caps = Capabilities {
            headless: true,
            ..Default::default()
        };
        let session = factory.build(BrowserKind::Safari, caps).await.unwrap();

        // Session created, headless dropped, no args, no error
        assert_eq!(session.kind(), BrowserKind::Safari);
        let caps = launcher.last_capabilities().unwrap();
        assert!(!caps.headless);
        assert!(caps.args.is_empty());
    }

    #[tokio::test]
    async fn test_default_wait_from_settings() {
        let launcher = Arc::new(MockLauncher::new());
        let mut settings = Settings::default();
        settings.explicit_wait_secs = 25;

        let factory = SessionFactory::new(launcher, &settings);
        let session = factory
            .build(BrowserKind::Chrome, Capabilities::default())
            .await
            .unwrap();

        assert_eq!(session.default_wait().timeout(), Duration::from_secs(25));
    }
}
