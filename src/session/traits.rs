//! Session types
//!
//! Browser kinds, capability configuration, execution-context identity, and
//! the session handle itself.

use crate::driver::traits::DriverSession;
use crate::keywords::wait::Wait;
use crate::{Error, Result, Settings};
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Supported browser kinds
///
/// A closed set: no kind is added without a corresponding native driver, so
/// dispatch is a tagged variant rather than an open trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowserKind {
    Chrome,
    Firefox,
    Edge,
    Safari,
}

impl BrowserKind {
    /// Whether this browser supports headless operation
    pub fn supports_headless(&self) -> bool {
        !matches!(self, BrowserKind::Safari)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chrome => "chrome",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Edge => "edge",
            BrowserKind::Safari => "safari",
        }
    }
}

impl FromStr for BrowserKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "chrome" => Ok(BrowserKind::Chrome),
            "firefox" => Ok(BrowserKind::Firefox),
            "edge" => Ok(BrowserKind::Edge),
            "safari" => Ok(BrowserKind::Safari),
            _ => Err(Error::unsupported_browser(s)),
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability configuration, resolved once at session creation and frozen
/// for the session's lifetime
#[derive(Debug, Clone)]
pub struct Capabilities {
    /// Browser kind
    pub kind: BrowserKind,
    /// Headless mode (no GUI)
    pub headless: bool,
    /// Window width
    pub window_width: u32,
    /// Window height
    pub window_height: u32,
    /// Implicit wait applied at creation
    pub implicit_wait: Duration,
    /// Driver arguments assembled per kind
    pub args: Vec<String>,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            kind: BrowserKind::Chrome,
            headless: false,
            window_width: 1920,
            window_height: 1080,
            implicit_wait: Duration::from_secs(10),
            args: vec![],
        }
    }
}

impl Capabilities {
    /// Capabilities for a kind, taking the rest from configuration
    pub fn from_settings(kind: BrowserKind, settings: &Settings) -> Self {
        Self {
            kind,
            headless: settings.headless,
            window_width: settings.window_width,
            window_height: settings.window_height,
            implicit_wait: settings.implicit_wait(),
            args: vec![],
        }
    }
}

/// Execution-context identity
///
/// The unit of concurrency that owns at most one session. Typically one per
/// parallel test case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContextId(String);

impl ContextId {
    /// Fresh anonymous context
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Named context, e.g. a test case name
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A live browser session
///
/// Owned by exactly one execution context; never shared across contexts, so
/// it carries no locking of its own. The default wait lives and dies with
/// the session.
#[derive(Debug)]
pub struct Session {
    id: String,
    kind: BrowserKind,
    created_at: DateTime<Utc>,
    implicit_wait: Duration,
    default_wait: Wait,
    driver: Arc<dyn DriverSession>,
}

impl Session {
    pub(crate) fn new(
        kind: BrowserKind,
        implicit_wait: Duration,
        default_wait: Wait,
        driver: Arc<dyn DriverSession>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            created_at: Utc::now(),
            implicit_wait,
            default_wait,
            driver,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> BrowserKind {
        self.kind
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Implicit wait applied to the driver at creation
    pub fn implicit_wait(&self) -> Duration {
        self.implicit_wait
    }

    /// The session's reusable default wait
    pub fn default_wait(&self) -> &Wait {
        &self.default_wait
    }

    pub fn driver(&self) -> &Arc<dyn DriverSession> {
        &self.driver
    }

    pub fn is_active(&self) -> bool {
        self.driver.is_active()
    }
}
