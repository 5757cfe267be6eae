//! Keyword layer
//!
//! The synchronized interaction operations exposed to test-case code.

pub mod wait;
pub mod web;

pub use wait::{Wait, WaitCondition};
pub use web::WebKeywords;
