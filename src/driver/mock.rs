//! Mock driver backend
//!
//! In-memory implementations of the driver traits. Tests script a page out
//! of mock elements, flip their state flags, and assert on recorded
//! interactions without any native browser.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::driver::traits::*;
use crate::locator::ElementQuery;
use crate::session::traits::Capabilities;
use crate::{Error, Result};

/// Mock page element
///
/// State flags are atomics so a test can hold an `Arc` to the element and
/// mutate it while the layer under test polls it.
#[derive(Debug)]
pub struct MockElement {
    query: ElementQuery,
    tag: Mutex<String>,
    present: AtomicBool,
    displayed: AtomicBool,
    enabled: AtomicBool,
    stale: AtomicBool,
    present_at: Mutex<Option<Instant>>,
    displayed_at: Mutex<Option<Instant>>,
    text: Mutex<String>,
    options: Mutex<Vec<SelectOption>>,
    attributes: Mutex<std::collections::HashMap<String, String>>,
    clicks: AtomicU32,
    double_clicks: AtomicU32,
    context_clicks: AtomicU32,
    hovers: AtomicU32,
    scrolls: AtomicU32,
}

impl MockElement {
    /// Create a new element answering the given query
    pub fn new(query: ElementQuery) -> Arc<Self> {
        Arc::new(Self {
            query,
            tag: Mutex::new("div".to_string()),
            present: AtomicBool::new(true),
            displayed: AtomicBool::new(true),
            enabled: AtomicBool::new(true),
            stale: AtomicBool::new(false),
            present_at: Mutex::new(None),
            displayed_at: Mutex::new(None),
            text: Mutex::new(String::new()),
            options: Mutex::new(Vec::new()),
            attributes: Mutex::new(std::collections::HashMap::new()),
            clicks: AtomicU32::new(0),
            double_clicks: AtomicU32::new(0),
            context_clicks: AtomicU32::new(0),
            hovers: AtomicU32::new(0),
            scrolls: AtomicU32::new(0),
        })
    }

    /// Element answering the query a locator normalizes to
    pub fn for_locator(locator: &crate::locator::Locator) -> Arc<Self> {
        Self::new(locator.to_query())
    }

    pub fn set_tag(&self, tag: &str) {
        *self.tag.lock().unwrap() = tag.to_string();
    }

    pub fn set_text(&self, text: &str) {
        *self.text.lock().unwrap() = text.to_string();
    }

    pub fn set_present(&self, present: bool) {
        self.present.store(present, Ordering::Relaxed);
    }

    pub fn set_displayed(&self, displayed: bool) {
        self.displayed.store(displayed, Ordering::Relaxed);
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn set_stale(&self, stale: bool) {
        self.stale.store(stale, Ordering::Relaxed);
    }

    /// Element appears in the document only after the given delay
    pub fn present_after(&self, delay: Duration) {
        *self.present_at.lock().unwrap() = Some(Instant::now() + delay);
    }

    /// Element becomes displayed only after the given delay
    pub fn displayed_after(&self, delay: Duration) {
        self.displayed.store(true, Ordering::Relaxed);
        *self.displayed_at.lock().unwrap() = Some(Instant::now() + delay);
    }

    pub fn set_options(&self, options: Vec<SelectOption>) {
        *self.options.lock().unwrap() = options;
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.attributes
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }

    pub fn click_count(&self) -> u32 {
        self.clicks.load(Ordering::Relaxed)
    }

    pub fn double_click_count(&self) -> u32 {
        self.double_clicks.load(Ordering::Relaxed)
    }

    pub fn context_click_count(&self) -> u32 {
        self.context_clicks.load(Ordering::Relaxed)
    }

    pub fn hover_count(&self) -> u32 {
        self.hovers.load(Ordering::Relaxed)
    }

    pub fn scroll_count(&self) -> u32 {
        self.scrolls.load(Ordering::Relaxed)
    }

    pub fn selected_value(&self) -> Option<String> {
        self.options
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.selected)
            .map(|o| o.value.clone())
    }

    fn is_present_now(&self) -> bool {
        if !self.present.load(Ordering::Relaxed) {
            return false;
        }
        match *self.present_at.lock().unwrap() {
            Some(at) => Instant::now() >= at,
            None => true,
        }
    }

    fn is_displayed_now(&self) -> bool {
        if !self.displayed.load(Ordering::Relaxed) {
            return false;
        }
        match *self.displayed_at.lock().unwrap() {
            Some(at) => Instant::now() >= at,
            None => true,
        }
    }

    fn check_fresh(&self) -> Result<()> {
        if self.stale.load(Ordering::Relaxed) {
            return Err(Error::stale_element(self.query.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ElementHandle for MockElement {
    async fn click(&self) -> Result<()> {
        self.check_fresh()?;
        self.clicks.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.check_fresh()?;
        self.text.lock().unwrap().clear();
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> Result<()> {
        self.check_fresh()?;
        self.text.lock().unwrap().push_str(text);
        Ok(())
    }

    async fn text(&self) -> Result<String> {
        self.check_fresh()?;
        Ok(self.text.lock().unwrap().clone())
    }

    async fn tag_name(&self) -> Result<String> {
        Ok(self.tag.lock().unwrap().clone())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.check_fresh()?;
        Ok(self.attributes.lock().unwrap().get(name).cloned())
    }

    async fn is_displayed(&self) -> Result<bool> {
        self.check_fresh()?;
        Ok(self.is_displayed_now())
    }

    async fn is_enabled(&self) -> Result<bool> {
        self.check_fresh()?;
        Ok(self.enabled.load(Ordering::Relaxed))
    }

    async fn options(&self) -> Result<Vec<SelectOption>> {
        self.check_fresh()?;
        Ok(self.options.lock().unwrap().clone())
    }

    async fn select_value(&self, value: &str) -> Result<()> {
        self.check_fresh()?;
        let mut options = self.options.lock().unwrap();
        if !options.iter().any(|o| o.value == value) {
            return Err(Error::driver(format!("no option with value '{}'", value)));
        }
        for option in options.iter_mut() {
            option.selected = option.value == value;
        }
        Ok(())
    }

    async fn hover(&self) -> Result<()> {
        self.check_fresh()?;
        self.hovers.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn double_click(&self) -> Result<()> {
        self.check_fresh()?;
        self.double_clicks.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn context_click(&self) -> Result<()> {
        self.check_fresh()?;
        self.context_clicks.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn scroll_into_view(&self) -> Result<()> {
        self.check_fresh()?;
        self.scrolls.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct PageState {
    url: String,
    title: String,
    history: Vec<String>,
    history_index: usize,
    frame: Option<FrameTarget>,
}

/// Mock driver session
#[derive(Debug)]
pub struct MockDriver {
    id: String,
    active: AtomicBool,
    state: Mutex<PageState>,
    elements: Mutex<Vec<Arc<MockElement>>>,
    implicit_wait: Mutex<Option<Duration>>,
    maximized: AtomicBool,
    navigation_fails: AtomicBool,
    scripts: Mutex<Vec<String>>,
    script_result: Mutex<serde_json::Value>,
}

impl MockDriver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: uuid::Uuid::new_v4().to_string(),
            active: AtomicBool::new(true),
            state: Mutex::new(PageState::default()),
            elements: Mutex::new(Vec::new()),
            implicit_wait: Mutex::new(None),
            maximized: AtomicBool::new(false),
            navigation_fails: AtomicBool::new(false),
            scripts: Mutex::new(Vec::new()),
            script_result: Mutex::new(serde_json::Value::Null),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Add an element to the mock page
    pub fn install(&self, element: Arc<MockElement>) {
        self.elements.lock().unwrap().push(element);
    }

    pub fn set_title(&self, title: &str) {
        self.state.lock().unwrap().title = title.to_string();
    }

    /// Make every `navigate` call fail while the session stays live
    pub fn fail_navigation(&self, fail: bool) {
        self.navigation_fails.store(fail, Ordering::Relaxed);
    }

    /// Fix the value returned by `execute_script`
    pub fn set_script_result(&self, value: serde_json::Value) {
        *self.script_result.lock().unwrap() = value;
    }

    pub fn executed_scripts(&self) -> Vec<String> {
        self.scripts.lock().unwrap().clone()
    }

    pub fn recorded_implicit_wait(&self) -> Option<Duration> {
        *self.implicit_wait.lock().unwrap()
    }

    pub fn was_maximized(&self) -> bool {
        self.maximized.load(Ordering::Relaxed)
    }

    pub fn current_frame(&self) -> Option<FrameTarget> {
        self.state.lock().unwrap().frame.clone()
    }

    fn check_active(&self) -> Result<()> {
        if !self.active.load(Ordering::Relaxed) {
            return Err(Error::driver("session is closed"));
        }
        Ok(())
    }
}

#[async_trait]
impl DriverSession for MockDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.check_active()?;
        if self.navigation_fails.load(Ordering::Relaxed) {
            return Err(Error::driver(format!("navigation to {} failed", url)));
        }
        let mut state = self.state.lock().unwrap();
        let index = state.history_index;
        if !state.history.is_empty() {
            state.history.truncate(index + 1);
        }
        state.history.push(url.to_string());
        state.history_index = state.history.len() - 1;
        state.url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        self.check_active()?;
        Ok(self.state.lock().unwrap().url.clone())
    }

    async fn title(&self) -> Result<String> {
        self.check_active()?;
        Ok(self.state.lock().unwrap().title.clone())
    }

    async fn back(&self) -> Result<()> {
        self.check_active()?;
        let mut state = self.state.lock().unwrap();
        if state.history_index > 0 {
            state.history_index -= 1;
            state.url = state.history[state.history_index].clone();
        }
        Ok(())
    }

    async fn forward(&self) -> Result<()> {
        self.check_active()?;
        let mut state = self.state.lock().unwrap();
        if state.history_index + 1 < state.history.len() {
            state.history_index += 1;
            state.url = state.history[state.history_index].clone();
        }
        Ok(())
    }

    async fn refresh(&self) -> Result<()> {
        self.check_active()
    }

    async fn find_all(&self, query: &ElementQuery) -> Result<Vec<Arc<dyn ElementHandle>>> {
        self.check_active()?;
        let elements = self.elements.lock().unwrap();
        Ok(elements
            .iter()
            .filter(|e| &e.query == query && e.is_present_now())
            .map(|e| e.clone() as Arc<dyn ElementHandle>)
            .collect())
    }

    async fn execute_script(&self, script: &str) -> Result<serde_json::Value> {
        self.check_active()?;
        self.scripts.lock().unwrap().push(script.to_string());
        Ok(self.script_result.lock().unwrap().clone())
    }

    async fn switch_to_frame(&self, target: FrameTarget) -> Result<()> {
        self.check_active()?;
        self.state.lock().unwrap().frame = Some(target);
        Ok(())
    }

    async fn switch_to_default_content(&self) -> Result<()> {
        self.check_active()?;
        self.state.lock().unwrap().frame = None;
        Ok(())
    }

    async fn set_implicit_wait(&self, timeout: Duration) -> Result<()> {
        self.check_active()?;
        *self.implicit_wait.lock().unwrap() = Some(timeout);
        Ok(())
    }

    async fn maximize_window(&self) -> Result<()> {
        self.check_active()?;
        self.maximized.store(true, Ordering::Relaxed);
        Ok(())
    }

    async fn screenshot_png(&self) -> Result<Vec<u8>> {
        self.check_active()?;
        // Minimal PNG signature, enough for file-handling tests
        Ok(vec![
            0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
            0x44, 0x52,
        ])
    }

    async fn quit(&self) -> Result<()> {
        self.active.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}

/// Mock driver launcher
///
/// Records every launch and hands out either prepared drivers (in order) or
/// fresh ones.
#[derive(Debug, Default)]
pub struct MockLauncher {
    prepared: Mutex<Vec<Arc<MockDriver>>>,
    launched: Mutex<Vec<Capabilities>>,
}

impl MockLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a driver to be returned by the next launch
    pub fn prepare(&self, driver: Arc<MockDriver>) {
        self.prepared.lock().unwrap().push(driver);
    }

    pub fn launch_count(&self) -> usize {
        self.launched.lock().unwrap().len()
    }

    pub fn last_capabilities(&self) -> Option<Capabilities> {
        self.launched.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl DriverLauncher for MockLauncher {
    async fn launch(&self, caps: &Capabilities) -> Result<Arc<dyn DriverSession>> {
        self.launched.lock().unwrap().push(caps.clone());

        let driver = {
            let mut prepared = self.prepared.lock().unwrap();
            if prepared.is_empty() {
                MockDriver::new()
            } else {
                prepared.remove(0)
            }
        };

        Ok(driver as Arc<dyn DriverSession>)
    }
}
