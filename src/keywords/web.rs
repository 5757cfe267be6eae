//! Web keywords
//!
//! The synchronized interaction layer exposed to test-case code. Every
//! element operation is two-phase: wait for the required condition with a
//! bounded timeout, then act on the ephemeral handle. One `WebKeywords`
//! instance belongs to one execution context.

use crate::driver::traits::{ElementHandle, FrameTarget};
use crate::keywords::wait::{Wait, WaitCondition};
use crate::locator::Locator;
use crate::session::registry::SessionRegistry;
use crate::session::traits::{Capabilities, ContextId, Session};
use crate::{Error, Result, Settings};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Keyword library bound to one execution context
pub struct WebKeywords {
    context: ContextId,
    registry: Arc<SessionRegistry>,
    settings: Arc<Settings>,
}

impl WebKeywords {
    pub fn new(context: ContextId, registry: Arc<SessionRegistry>, settings: Arc<Settings>) -> Self {
        Self {
            context,
            registry,
            settings,
        }
    }

    pub fn context(&self) -> &ContextId {
        &self.context
    }

    /// The session owned by this context
    pub fn current_session(&self) -> Result<Arc<Session>> {
        self.registry.current_session(&self.context)
    }

    // ---- session lifecycle -------------------------------------------------

    /// Open a browser of the given kind and navigate to a URL
    ///
    /// If the initial navigation fails, the just-created session is torn
    /// down before the error propagates, so a failed open never leaves the
    /// context holding a registered session.
    #[instrument(skip(self))]
    pub async fn open_browser(&self, browser: &str, url: &str) -> Result<()> {
        let kind = browser.parse()?;
        let caps = Capabilities::from_settings(kind, &self.settings);
        self.registry
            .create_session(&self.context, kind, caps)
            .await?;

        if let Err(e) = self.navigate_to(url).await {
            warn!(url, error = %e, "Initial navigation failed; tearing session down");
            if let Err(teardown_err) = self.close_browser().await {
                warn!(error = %teardown_err, "Session teardown failed after navigation failure");
            }
            return Err(e);
        }
        Ok(())
    }

    /// Open the configured default browser and navigate to a URL
    pub async fn open_browser_default(&self, url: &str) -> Result<()> {
        let browser = self.settings.browser.clone();
        self.open_browser(&browser, url).await
    }

    /// Close this context's browser. Idempotent.
    #[instrument(skip(self))]
    pub async fn close_browser(&self) -> Result<()> {
        self.registry.destroy_session(&self.context).await
    }

    /// Open a browser, run the body, and always close the browser again.
    /// The body's failure is preserved even when teardown itself fails.
    pub async fn with_browser<T, F>(&self, browser: &str, url: &str, body: F) -> Result<T>
    where
        F: for<'a> FnOnce(&'a WebKeywords) -> BoxFuture<'a, Result<T>>,
    {
        self.open_browser(browser, url).await?;
        let outcome = body(self).await;
        let teardown = self.close_browser().await;

        match (outcome, teardown) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(teardown_err)) => {
                warn!(error = %teardown_err, "Session teardown failed after test failure");
                Err(e)
            }
        }
    }

    // ---- navigation --------------------------------------------------------

    pub async fn navigate_to(&self, url: &str) -> Result<()> {
        self.current_session()?.driver().navigate(url).await
    }

    pub async fn page_title(&self) -> Result<String> {
        self.current_session()?.driver().title().await
    }

    pub async fn current_url(&self) -> Result<String> {
        self.current_session()?.driver().current_url().await
    }

    pub async fn refresh(&self) -> Result<()> {
        self.current_session()?.driver().refresh().await
    }

    pub async fn back(&self) -> Result<()> {
        self.current_session()?.driver().back().await
    }

    pub async fn forward(&self) -> Result<()> {
        self.current_session()?.driver().forward().await
    }

    // ---- synchronized interactions -----------------------------------------

    /// Find an element, waiting for presence
    #[instrument(skip(self))]
    pub async fn find_element(&self, locator: &Locator) -> Result<Arc<dyn ElementHandle>> {
        self.wait_default(locator, WaitCondition::Present).await
    }

    /// Find all matching elements, waiting for at least one to be present
    #[instrument(skip(self))]
    pub async fn find_elements(&self, locator: &Locator) -> Result<Vec<Arc<dyn ElementHandle>>> {
        let session = self.current_session()?;
        session
            .default_wait()
            .until(session.driver(), locator, WaitCondition::Present)
            .await?;
        session.driver().find_all(&locator.to_query()).await
    }

    /// Click an element, waiting for it to become clickable
    #[instrument(skip(self))]
    pub async fn click(&self, locator: &Locator) -> Result<()> {
        let element = self.wait_default(locator, WaitCondition::Clickable).await?;
        element.click().await
    }

    /// Clear a field and type text into it, waiting for presence
    #[instrument(skip(self, text))]
    pub async fn enter_text(&self, locator: &Locator, text: &str) -> Result<()> {
        let element = self.wait_default(locator, WaitCondition::Present).await?;
        element.clear().await?;
        element.send_keys(text).await
    }

    /// Read the rendered text of an element, waiting for presence
    #[instrument(skip(self))]
    pub async fn get_text(&self, locator: &Locator) -> Result<String> {
        let element = self.wait_default(locator, WaitCondition::Present).await?;
        element.text().await
    }

    /// Select a dropdown option by its visible text
    #[instrument(skip(self))]
    pub async fn select_by_text(&self, locator: &Locator, option_text: &str) -> Result<()> {
        let element = self.wait_default(locator, WaitCondition::Present).await?;
        let options = element.options().await?;

        let option = options
            .iter()
            .find(|o| o.text == option_text)
            .ok_or_else(|| Error::OptionNotFound {
                locator: locator.to_string(),
                option: option_text.to_string(),
            })?;

        element.select_value(&option.value).await
    }

    /// Select a dropdown option by its value attribute
    #[instrument(skip(self))]
    pub async fn select_by_value(&self, locator: &Locator, value: &str) -> Result<()> {
        let element = self.wait_default(locator, WaitCondition::Present).await?;
        let options = element.options().await?;

        if !options.iter().any(|o| o.value == value) {
            return Err(Error::OptionNotFound {
                locator: locator.to_string(),
                option: value.to_string(),
            });
        }

        element.select_value(value).await
    }

    /// Hover the pointer over an element
    #[instrument(skip(self))]
    pub async fn hover(&self, locator: &Locator) -> Result<()> {
        let element = self.wait_default(locator, WaitCondition::Present).await?;
        element.hover().await
    }

    /// Double-click an element
    #[instrument(skip(self))]
    pub async fn double_click(&self, locator: &Locator) -> Result<()> {
        let element = self.wait_default(locator, WaitCondition::Present).await?;
        element.double_click().await
    }

    /// Right-click an element
    #[instrument(skip(self))]
    pub async fn right_click(&self, locator: &Locator) -> Result<()> {
        let element = self.wait_default(locator, WaitCondition::Present).await?;
        element.context_click().await
    }

    /// Scroll an element into view
    #[instrument(skip(self))]
    pub async fn scroll_to(&self, locator: &Locator) -> Result<()> {
        let element = self.wait_default(locator, WaitCondition::Present).await?;
        element.scroll_into_view().await
    }

    // ---- probes ------------------------------------------------------------

    /// Whether the element exists right now. Never fails; calling code
    /// branches on UI state without exception-driven control flow.
    pub async fn is_present(&self, locator: &Locator) -> bool {
        match self.probe(locator).await {
            Ok(elements) => !elements.is_empty(),
            Err(e) => {
                debug!(locator = %locator, error = %e, "Presence probe treated as absent");
                false
            }
        }
    }

    /// Whether the element exists and is displayed right now. Never fails.
    pub async fn is_visible(&self, locator: &Locator) -> bool {
        let elements = match self.probe(locator).await {
            Ok(elements) => elements,
            Err(e) => {
                debug!(locator = %locator, error = %e, "Visibility probe treated as absent");
                return false;
            }
        };

        match elements.first() {
            Some(element) => element.is_displayed().await.unwrap_or(false),
            None => false,
        }
    }

    async fn probe(&self, locator: &Locator) -> Result<Vec<Arc<dyn ElementHandle>>> {
        let session = self.current_session()?;
        session.driver().find_all(&locator.to_query()).await
    }

    // ---- explicit waits ----------------------------------------------------

    /// Wait for visibility with a caller-supplied timeout. The wait is
    /// freshly constructed, independent of the session's default wait.
    #[instrument(skip(self))]
    pub async fn wait_for_visible(&self, locator: &Locator, timeout: Duration) -> Result<()> {
        self.wait_custom(locator, WaitCondition::Visible, timeout)
            .await
            .map(|_| ())
    }

    /// Wait for clickability with a caller-supplied timeout
    #[instrument(skip(self))]
    pub async fn wait_for_clickable(&self, locator: &Locator, timeout: Duration) -> Result<()> {
        self.wait_custom(locator, WaitCondition::Clickable, timeout)
            .await
            .map(|_| ())
    }

    // ---- pass-through operations -------------------------------------------

    /// Execute JavaScript in the page. No wait phase; sequencing against
    /// frame switches is the caller's responsibility. Backend faults surface
    /// as `ScriptExecutionFailed` naming the script.
    pub async fn execute_script(&self, script: &str) -> Result<serde_json::Value> {
        self.current_session()?
            .driver()
            .execute_script(script)
            .await
            .map_err(|e| Error::script_execution_failed(format!("{}: {}", script, e)))
    }

    /// Switch the document context to a frame by index or name/id
    pub async fn switch_to_frame<T: Into<FrameTarget>>(&self, target: T) -> Result<()> {
        self.current_session()?
            .driver()
            .switch_to_frame(target.into())
            .await
    }

    /// Switch the document context back to the top-level document
    pub async fn switch_to_default_content(&self) -> Result<()> {
        self.current_session()?
            .driver()
            .switch_to_default_content()
            .await
    }

    // ---- internals ---------------------------------------------------------

    async fn wait_default(
        &self,
        locator: &Locator,
        condition: WaitCondition,
    ) -> Result<Arc<dyn ElementHandle>> {
        let session = self.current_session()?;
        session
            .default_wait()
            .until(session.driver(), locator, condition)
            .await
    }

    async fn wait_custom(
        &self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<Arc<dyn ElementHandle>> {
        let session = self.current_session()?;
        Wait::new(timeout)
            .with_poll_interval(self.settings.poll_interval())
            .until(session.driver(), locator, condition)
            .await
    }
}
