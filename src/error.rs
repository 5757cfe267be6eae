//! Unified error types for Keydriver

use std::time::Duration;
use thiserror::Error;

/// Unified Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Keydriver
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Browser kind outside the supported set
    #[error("Browser not supported: {0}")]
    UnsupportedBrowserKind(String),

    /// Locator strategy outside the recognized set
    #[error("Locator strategy not supported: {0}")]
    UnsupportedLocatorStrategy(String),

    /// A session is already bound to the execution context
    #[error("Session already active for context: {0}")]
    SessionAlreadyActive(String),

    /// No session is bound to the execution context
    #[error("No active session for context: {0}")]
    NoActiveSession(String),

    /// Element did not become present within the wait bound
    #[error("Element not found within {elapsed:?}: {locator}")]
    ElementNotFound { locator: String, elapsed: Duration },

    /// Element did not become visible within the wait bound
    #[error("Element not visible within {elapsed:?}: {locator}")]
    ElementNotVisible { locator: String, elapsed: Duration },

    /// Element did not become clickable within the wait bound
    #[error("Element not clickable within {elapsed:?}: {locator}")]
    ElementNotClickable { locator: String, elapsed: Duration },

    /// Select option not present in the dropdown
    #[error("Option '{option}' not found in {locator}")]
    OptionNotFound { locator: String, option: String },

    /// Element detached from the document between locate and act
    #[error("Stale element: {0}")]
    StaleElement(String),

    /// Driver backend error
    #[error("Driver error: {0}")]
    Driver(String),

    /// Script execution failed
    #[error("Script execution failed: {0}")]
    ScriptExecutionFailed(String),

    /// Named element missing from a page map
    #[error("Unknown page element: {0}")]
    UnknownElement(String),

    /// Data record not found
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }

    /// Create a new unsupported browser kind error
    pub fn unsupported_browser<S: Into<String>>(kind: S) -> Self {
        Error::UnsupportedBrowserKind(kind.into())
    }

    /// Create a new unsupported locator strategy error
    pub fn unsupported_strategy<S: Into<String>>(strategy: S) -> Self {
        Error::UnsupportedLocatorStrategy(strategy.into())
    }

    /// Create a new driver error
    pub fn driver<S: Into<String>>(msg: S) -> Self {
        Error::Driver(msg.into())
    }

    /// Create a new stale element error
    pub fn stale_element<S: Into<String>>(msg: S) -> Self {
        Error::StaleElement(msg.into())
    }

    /// Create a new script execution failed error
    pub fn script_execution_failed<S: Into<String>>(msg: S) -> Self {
        Error::ScriptExecutionFailed(msg.into())
    }

    /// Create a new record not found error
    pub fn record_not_found<S: Into<String>>(key: S) -> Self {
        Error::RecordNotFound(key.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }

    /// Whether this is a bounded-wait timeout (element never reached the
    /// required condition). Distinguishes test-defect signals from backend
    /// faults.
    pub fn is_sync_timeout(&self) -> bool {
        matches!(
            self,
            Error::ElementNotFound { .. }
                | Error::ElementNotVisible { .. }
                | Error::ElementNotClickable { .. }
        )
    }
}
