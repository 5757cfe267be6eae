//! Driver layer traits
//!
//! This module defines the abstract interfaces to the browser-automation
//! backend. The core never talks to a native driver directly; it goes
//! through these traits so backends are swappable and tests run against the
//! mock implementation.

use crate::locator::ElementQuery;
use crate::session::traits::Capabilities;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Frame switch target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameTarget {
    /// Frame by zero-based index
    Index(u16),
    /// Frame by name or id attribute
    NameOrId(String),
}

impl From<u16> for FrameTarget {
    fn from(index: u16) -> Self {
        FrameTarget::Index(index)
    }
}

impl From<&str> for FrameTarget {
    fn from(name_or_id: &str) -> Self {
        FrameTarget::NameOrId(name_or_id.to_string())
    }
}

/// An option entry of a select element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Value attribute
    pub value: String,
    /// Visible text
    pub text: String,
    /// Currently selected
    pub selected: bool,
}

/// Driver session trait
///
/// Represents one live connection to a browser automation backend.
#[async_trait]
pub trait DriverSession: Send + Sync + std::fmt::Debug {
    /// Navigate to a URL
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Get the current URL
    async fn current_url(&self) -> Result<String>;

    /// Get the page title
    async fn title(&self) -> Result<String>;

    /// Go back in history
    async fn back(&self) -> Result<()>;

    /// Go forward in history
    async fn forward(&self) -> Result<()>;

    /// Reload the page
    async fn refresh(&self) -> Result<()>;

    /// Find all elements matching a query. An empty result is not an error.
    async fn find_all(&self, query: &ElementQuery) -> Result<Vec<Arc<dyn ElementHandle>>>;

    /// Execute JavaScript in the page and return its JSON result
    async fn execute_script(&self, script: &str) -> Result<serde_json::Value>;

    /// Switch the document context to a frame
    async fn switch_to_frame(&self, target: FrameTarget) -> Result<()>;

    /// Switch the document context back to the top-level document
    async fn switch_to_default_content(&self) -> Result<()>;

    /// Set the session-wide implicit wait
    async fn set_implicit_wait(&self, timeout: std::time::Duration) -> Result<()>;

    /// Maximize the browser window
    async fn maximize_window(&self) -> Result<()>;

    /// Capture a PNG screenshot of the current page
    async fn screenshot_png(&self) -> Result<Vec<u8>>;

    /// Quit the browser and release the native connection
    async fn quit(&self) -> Result<()>;

    /// Check if the session is still live
    fn is_active(&self) -> bool;
}

/// Element handle trait
///
/// Ephemeral reference to a located page element, valid only until the next
/// page mutation. Never cached beyond a single interaction.
#[async_trait]
pub trait ElementHandle: Send + Sync {
    /// Click the element
    async fn click(&self) -> Result<()>;

    /// Clear an input field
    async fn clear(&self) -> Result<()>;

    /// Type text into the element
    async fn send_keys(&self, text: &str) -> Result<()>;

    /// Get the rendered text
    async fn text(&self) -> Result<String>;

    /// Get the tag name
    async fn tag_name(&self) -> Result<String>;

    /// Get an attribute value
    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    /// Check if the element is displayed
    async fn is_displayed(&self) -> Result<bool>;

    /// Check if the element is enabled
    async fn is_enabled(&self) -> Result<bool>;

    /// List the options of a select element
    async fn options(&self) -> Result<Vec<SelectOption>>;

    /// Select the option with the given value attribute
    async fn select_value(&self, value: &str) -> Result<()>;

    /// Move the pointer over the element
    async fn hover(&self) -> Result<()>;

    /// Double-click the element
    async fn double_click(&self) -> Result<()>;

    /// Right-click the element
    async fn context_click(&self) -> Result<()>;

    /// Scroll the element into view
    async fn scroll_into_view(&self) -> Result<()>;
}

/// Driver launcher trait
///
/// The seam to the existing automation library: given frozen capabilities,
/// allocate a native browser connection.
#[async_trait]
pub trait DriverLauncher: Send + Sync {
    /// Launch a driver session with the given capabilities
    async fn launch(&self, caps: &Capabilities) -> Result<Arc<dyn DriverSession>>;
}
