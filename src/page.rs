//! Page maps
//!
//! Named locator collections, one per application page. Test code refers to
//! elements by logical name and the page map owns the locator details, so a
//! UI change touches one map instead of every test.

use crate::locator::Locator;
use crate::{Error, Result};
use std::collections::HashMap;

/// Named locators of one page
#[derive(Debug, Clone)]
pub struct PageMap {
    name: String,
    elements: HashMap<String, Locator>,
}

impl PageMap {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            elements: HashMap::new(),
        }
    }

    /// Register an element under a logical name
    pub fn with<S: Into<String>>(mut self, element: S, locator: Locator) -> Self {
        self.elements.insert(element.into(), locator);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a locator by its logical element name
    pub fn locator(&self, element: &str) -> Result<&Locator> {
        self.elements.get(element).ok_or_else(|| {
            Error::UnknownElement(format!("{} on page {}", element, self.name))
        })
    }

    pub fn element_names(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }
}
