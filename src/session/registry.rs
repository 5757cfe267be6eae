//! Session registry
//!
//! Maps each execution context to at most one live session. Sessions are
//! context-local: a session is visible only to the context that created it,
//! so concurrency safety comes from partitioning, not from locking the
//! session itself.

use crate::session::factory::SessionFactory;
use crate::session::traits::{BrowserKind, Capabilities, ContextId, Session};
use crate::{Error, Result};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Session registry
pub struct SessionRegistry {
    sessions: RwLock<HashMap<ContextId, Arc<Session>>>,
    factory: SessionFactory,
}

impl SessionRegistry {
    pub fn new(factory: SessionFactory) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            factory,
        }
    }

    /// Create a session for a context
    ///
    /// Rejects with `SessionAlreadyActive` if the context already holds a
    /// live session: silently replacing one would leak the native browser
    /// process behind it. The lock cannot be held across the async build, so
    /// occupancy is re-checked at insert time; a session built by a racing
    /// create is quit and discarded instead of replacing the winner.
    pub async fn create_session(
        &self,
        ctx: &ContextId,
        kind: BrowserKind,
        caps: Capabilities,
    ) -> Result<String> {
        if self.has_session(ctx)? {
            return Err(Error::SessionAlreadyActive(ctx.to_string()));
        }

        let session = Arc::new(self.factory.build(kind, caps).await?);
        let session_id = session.id().to_string();

        let inserted = {
            let mut sessions = self
                .sessions
                .write()
                .map_err(|e| Error::internal(format!("Lock error: {}", e)))?;
            match sessions.entry(ctx.clone()) {
                Entry::Occupied(_) => false,
                Entry::Vacant(slot) => {
                    slot.insert(session.clone());
                    true
                }
            }
        };

        if !inserted {
            warn!(context = %ctx, session = %session_id, "Lost create race; discarding session");
            if let Err(e) = session.driver().quit().await {
                warn!(context = %ctx, error = %e, "Driver quit failed for discarded session");
            }
            return Err(Error::SessionAlreadyActive(ctx.to_string()));
        }

        debug!(context = %ctx, session = %session_id, "Session registered");
        Ok(session_id)
    }

    /// Get the session owned by a context
    pub fn current_session(&self, ctx: &ContextId) -> Result<Arc<Session>> {
        self.sessions
            .read()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?
            .get(ctx)
            .cloned()
            .ok_or_else(|| Error::NoActiveSession(ctx.to_string()))
    }

    /// Destroy the session owned by a context
    ///
    /// Idempotent: destroying an absent session is a no-op. The driver quit
    /// is attempted even when the owning test already failed; a quit error
    /// is logged but the registry entry is removed regardless, so a
    /// half-dead driver cannot wedge the context.
    pub async fn destroy_session(&self, ctx: &ContextId) -> Result<()> {
        let session = self
            .sessions
            .write()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?
            .remove(ctx);

        if let Some(session) = session {
            debug!(context = %ctx, session = %session.id(), "Destroying session");
            if let Err(e) = session.driver().quit().await {
                warn!(context = %ctx, error = %e, "Driver quit failed during destroy");
            }
        }

        Ok(())
    }

    /// Whether a context currently holds a session
    pub fn has_session(&self, ctx: &ContextId) -> Result<bool> {
        Ok(self
            .sessions
            .read()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?
            .contains_key(ctx))
    }

    /// Number of live sessions across all contexts
    pub fn session_count(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::{MockDriver, MockLauncher};
    use crate::driver::traits::DriverSession;
    use crate::Settings;

    fn registry() -> (Arc<SessionRegistry>, Arc<MockLauncher>) {
        let launcher = Arc::new(MockLauncher::new());
        let factory = SessionFactory::new(launcher.clone(), &Settings::default());
        (Arc::new(SessionRegistry::new(factory)), launcher)
    }

    #[tokio::test]
    async fn test_create_and_get_session() {
        let (registry, _) = registry();
        let ctx = ContextId::named("tc-1");

        let session_id = registry
            .create_session(&ctx, BrowserKind::Chrome, Capabilities::default())
            .await
            .unwrap();

        let session = registry.current_session(&ctx).unwrap();
        assert_eq!(session.id(), session_id);
        assert_eq!(registry.session_count(), 1);
    }

    #[tokio::test]
    async fn test_no_active_session() {
        let (registry, _) = registry();
        let ctx = ContextId::named("tc-none");

        assert!(matches!(
            registry.current_session(&ctx),
            Err(Error::NoActiveSession(_))
        ));
    }

    #[tokio::test]
    async fn test_double_create_rejected() {
        let (registry, launcher) = registry();
        let ctx = ContextId::named("tc-dup");

        registry
            .create_session(&ctx, BrowserKind::Chrome, Capabilities::default())
            .await
            .unwrap();

        let result = registry
            .create_session(&ctx, BrowserKind::Firefox, Capabilities::default())
            .await;
        assert!(matches!(result, Err(Error::SessionAlreadyActive(_))));

        // The rejection happened before any second launch
        assert_eq!(launcher.launch_count(), 1);
    }

    #[tokio::test]
    async fn test_destroy_is_idempotent() {
        let (registry, launcher) = registry();
        let ctx = ContextId::named("tc-destroy");
        let driver = MockDriver::new();
        launcher.prepare(driver.clone());

        registry
            .create_session(&ctx, BrowserKind::Chrome, Capabilities::default())
            .await
            .unwrap();

        registry.destroy_session(&ctx).await.unwrap();
        assert!(!driver.is_active());
        assert!(matches!(
            registry.current_session(&ctx),
            Err(Error::NoActiveSession(_))
        ));

        // Second destroy is a no-op, never an error
        registry.destroy_session(&ctx).await.unwrap();
        assert_eq!(registry.session_count(), 0);
    }

    #[tokio::test]
    async fn test_context_isolation() {
        let (registry, _) = registry();
        let ctx_a = ContextId::named("tc-a");
        let ctx_b = ContextId::named("tc-b");

        registry
            .create_session(&ctx_a, BrowserKind::Chrome, Capabilities::default())
            .await
            .unwrap();
        registry
            .create_session(&ctx_b, BrowserKind::Firefox, Capabilities::default())
            .await
            .unwrap();

        let session_a = registry.current_session(&ctx_a).unwrap();
        let session_b = registry.current_session(&ctx_b).unwrap();
        assert_ne!(session_a.id(), session_b.id());
        assert_eq!(session_a.kind(), BrowserKind::Chrome);
        assert_eq!(session_b.kind(), BrowserKind::Firefox);

        // Destroying one context leaves the other untouched
        registry.destroy_session(&ctx_a).await.unwrap();
        assert!(registry.current_session(&ctx_b).is_ok());
    }

    #[tokio::test]
    async fn test_racing_creates_on_one_context() {
        let (registry, launcher) = registry();
        let drivers = [MockDriver::new(), MockDriver::new()];
        launcher.prepare(drivers[0].clone());
        launcher.prepare(drivers[1].clone());
        let ctx = ContextId::named("tc-race");

        let mut handles = Vec::new();
        for _ in 0..2 {
            let registry = registry.clone();
            let ctx = ctx.clone();
            handles.push(tokio::spawn(async move {
                registry
                    .create_session(&ctx, BrowserKind::Chrome, Capabilities::default())
                    .await
            }));
        }

        let mut outcomes = Vec::new();
        for handle in handles {
            outcomes.push(handle.await.unwrap());
        }

        // Exactly one winner, and the loser was rejected, not replaced
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes
            .iter()
            .all(|r| r.is_ok() || matches!(r, Err(Error::SessionAlreadyActive(_)))));
        assert_eq!(registry.session_count(), 1);

        // The registered session is live, and of the drivers actually
        // launched exactly one survived; a discarded duplicate was quit
        assert!(registry.current_session(&ctx).unwrap().is_active());
        let launched = launcher.launch_count();
        let live = drivers[..launched]
            .iter()
            .filter(|d| {
                use crate::driver::traits::DriverSession as _;
                d.is_active()
            })
            .count();
        assert_eq!(live, 1);
    }

    #[tokio::test]
    async fn test_concurrent_contexts() {
        let (registry, _) = registry();
        let mut handles = Vec::new();

        for i in 0..10 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                let ctx = ContextId::named(format!("tc-par-{}", i));
                registry
                    .create_session(&ctx, BrowserKind::Chrome, Capabilities::default())
                    .await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(registry.session_count(), 10);
    }
}
