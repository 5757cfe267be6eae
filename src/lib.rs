//! Keydriver: keyword-driven browser test automation toolkit
//!
//! This library drives a browser through an opaque automation-driver backend,
//! synchronizes keyword actions against asynchronous page state, and supplies
//! data-driven test inputs from record sources.

pub mod error;
pub mod config;

pub mod locator;
pub mod driver;
pub mod session;
pub mod keywords;

pub mod screenshot;
pub mod data;
pub mod page;
pub mod listener;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
pub use keywords::web::WebKeywords;
pub use locator::{Locator, Strategy};
pub use session::registry::SessionRegistry;
pub use session::traits::{BrowserKind, Capabilities, ContextId};

/// Keydriver library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
