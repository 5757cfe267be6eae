//! Test lifecycle reporting
//!
//! Observes test lifecycle events, logs them, and captures failure
//! evidence. Strictly side-effecting: nothing here changes a test's
//! outcome, and a reporting problem never turns into a test problem.

use crate::screenshot::Screenshots;
use crate::session::registry::SessionRegistry;
use crate::session::traits::ContextId;
use crate::{Error, Settings};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Test lifecycle reporter
pub struct TestReporter {
    registry: Arc<SessionRegistry>,
    screenshots: Screenshots,
}

impl TestReporter {
    pub fn new(registry: Arc<SessionRegistry>, settings: &Settings) -> Self {
        Self {
            registry,
            screenshots: Screenshots::new(settings),
        }
    }

    pub fn on_test_start(&self, name: &str) {
        info!(test = name, "Test started");
    }

    pub fn on_test_success(&self, name: &str) {
        info!(test = name, "Test passed");
    }

    pub fn on_test_skipped(&self, name: &str) {
        warn!(test = name, "Test skipped");
    }

    /// Record a failure and capture evidence
    ///
    /// Captures a failure screenshot when the failing context still holds a
    /// live session. Returns the evidence path if one was written; the
    /// failure itself is only observed, never altered.
    pub async fn on_test_failure(
        &self,
        ctx: &ContextId,
        name: &str,
        failure: &Error,
    ) -> Option<PathBuf> {
        error!(test = name, error = %failure, "Test failed");

        let session = match self.registry.current_session(ctx) {
            Ok(session) => session,
            Err(_) => return None,
        };

        match self.screenshots.capture_failure(&session, name).await {
            Ok(path) => path,
            Err(e) => {
                warn!(test = name, error = %e, "Failure evidence capture failed");
                None
            }
        }
    }
}
