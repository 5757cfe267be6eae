//! Session management
//!
//! Creates, tracks, and tears down browser sessions, one per execution
//! context.

pub mod factory;
pub mod registry;
pub mod traits;

pub use factory::SessionFactory;
pub use registry::SessionRegistry;
pub use traits::{BrowserKind, Capabilities, ContextId, Session};
