//! Automation driver layer
//!
//! Abstract interfaces to the browser-automation backend, plus an in-memory
//! mock backend for development and testing.

pub mod mock;
pub mod traits;

pub use traits::{DriverLauncher, DriverSession, ElementHandle, FrameTarget, SelectOption};
