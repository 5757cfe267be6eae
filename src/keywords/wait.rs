//! Bounded element waits
//!
//! Every synchronized interaction waits for a required element condition
//! before acting. Waiting is polling with a bounded total duration: probe
//! the condition, sleep, repeat until it holds or the timeout elapses. On
//! elapse the failure is typed by condition and carries the locator and the
//! elapsed duration.

use crate::driver::traits::{DriverSession, ElementHandle};
use crate::locator::Locator;
use crate::{Error, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Required element condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitCondition {
    /// Element exists in the document
    Present,
    /// Element exists and is displayed
    Visible,
    /// Element is displayed and enabled
    Clickable,
}

/// Bounded polling wait
#[derive(Debug, Clone)]
pub struct Wait {
    timeout: Duration,
    poll_interval: Duration,
}

impl Wait {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: Duration::from_millis(100),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Wait until the first element matching the locator satisfies the
    /// condition, and return its handle.
    ///
    /// Driver faults inside the poll loop propagate immediately; they mean
    /// the backend broke, not that the element is absent. A timeout maps to
    /// the condition's failure variant.
    pub async fn until(
        &self,
        driver: &Arc<dyn DriverSession>,
        locator: &Locator,
        condition: WaitCondition,
    ) -> Result<Arc<dyn ElementHandle>> {
        let query = locator.to_query();
        let start = Instant::now();

        loop {
            let elements = driver.find_all(&query).await?;

            if let Some(element) = elements.into_iter().next() {
                if Self::satisfies(&element, condition).await? {
                    return Ok(element);
                }
            }

            if start.elapsed() >= self.timeout {
                let elapsed = start.elapsed();
                debug!(
                    locator = %locator,
                    ?condition,
                    ?elapsed,
                    "Wait timed out"
                );
                return Err(Self::timeout_error(locator, condition, elapsed));
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn satisfies(
        element: &Arc<dyn ElementHandle>,
        condition: WaitCondition,
    ) -> Result<bool> {
        match condition {
            WaitCondition::Present => Ok(true),
            WaitCondition::Visible => element.is_displayed().await,
            WaitCondition::Clickable => {
                Ok(element.is_displayed().await? && element.is_enabled().await?)
            }
        }
    }

    fn timeout_error(locator: &Locator, condition: WaitCondition, elapsed: Duration) -> Error {
        let locator = locator.to_string();
        match condition {
            WaitCondition::Present => Error::ElementNotFound { locator, elapsed },
            WaitCondition::Visible => Error::ElementNotVisible { locator, elapsed },
            WaitCondition::Clickable => Error::ElementNotClickable { locator, elapsed },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::{MockDriver, MockElement};

    fn short_wait() -> Wait {
        Wait::new(Duration::from_millis(300)).with_poll_interval(Duration::from_millis(20))
    }

    #[tokio::test]
    async fn test_immediate_presence() {
        let driver = MockDriver::new();
        let locator = Locator::parse("id", "ready").unwrap();
        driver.install(MockElement::for_locator(&locator));

        let driver = driver as Arc<dyn DriverSession>;
        let handle = short_wait()
            .until(&driver, &locator, WaitCondition::Present)
            .await
            .unwrap();
        assert!(handle.is_displayed().await.unwrap());
    }

    #[tokio::test]
    async fn test_waits_for_late_element() {
        let driver = MockDriver::new();
        let locator = Locator::parse("id", "late").unwrap();
        let element = MockElement::for_locator(&locator);
        element.present_after(Duration::from_millis(100));
        driver.install(element);

        let driver = driver as Arc<dyn DriverSession>;
        let start = Instant::now();
        short_wait()
            .until(&driver, &locator, WaitCondition::Present)
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_present_but_never_visible() {
        let driver = MockDriver::new();
        let locator = Locator::parse("id", "hidden").unwrap();
        let element = MockElement::for_locator(&locator);
        element.set_displayed(false);
        driver.install(element);

        let driver = driver as Arc<dyn DriverSession>;
        let result = short_wait()
            .until(&driver, &locator, WaitCondition::Visible)
            .await;
        assert!(matches!(result, Err(Error::ElementNotVisible { .. })));
    }

    #[tokio::test]
    async fn test_timeout_error_carries_locator_and_elapsed() {
        let driver = MockDriver::new() as Arc<dyn DriverSession>;
        let locator = Locator::parse("id", "absent").unwrap();

        let result = short_wait()
            .until(&driver, &locator, WaitCondition::Present)
            .await;

        match result {
            Err(Error::ElementNotFound { locator, elapsed }) => {
                assert_eq!(locator, "id=absent");
                assert!(elapsed >= Duration::from_millis(300));
            }
            other => panic!("expected ElementNotFound, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_disabled_element_not_clickable() {
        let driver = MockDriver::new();
        let locator = Locator::parse("id", "submit").unwrap();
        let element = MockElement::for_locator(&locator);
        element.set_enabled(false);
        driver.install(element);

        let driver = driver as Arc<dyn DriverSession>;
        let result = short_wait()
            .until(&driver, &locator, WaitCondition::Clickable)
            .await;
        assert!(matches!(result, Err(Error::ElementNotClickable { .. })));
    }

    #[tokio::test]
    async fn test_driver_fault_propagates_immediately() {
        let driver = MockDriver::new();
        driver.quit().await.unwrap();
        let locator = Locator::parse("id", "any").unwrap();

        let driver = driver as Arc<dyn DriverSession>;
        let start = Instant::now();
        let result = Wait::new(Duration::from_secs(10))
            .until(&driver, &locator, WaitCondition::Present)
            .await;

        assert!(matches!(result, Err(Error::Driver(_))));
        // No ten-second poll against a dead backend
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
