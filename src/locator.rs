//! Locator resolution
//!
//! Converts (strategy, value) pairs into normalized element query
//! descriptors the driver backend understands. Resolution is pure and
//! side-effect free.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Locator strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Id,
    Name,
    ClassName,
    TagName,
    XPath,
    Css,
    LinkText,
    PartialLinkText,
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "id" => Ok(Strategy::Id),
            "name" => Ok(Strategy::Name),
            "class" | "classname" => Ok(Strategy::ClassName),
            "tag" | "tagname" => Ok(Strategy::TagName),
            "xpath" => Ok(Strategy::XPath),
            "css" | "cssselector" => Ok(Strategy::Css),
            "linktext" => Ok(Strategy::LinkText),
            "partiallinktext" => Ok(Strategy::PartialLinkText),
            _ => Err(Error::unsupported_strategy(s)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Id => "id",
            Strategy::Name => "name",
            Strategy::ClassName => "class",
            Strategy::TagName => "tag",
            Strategy::XPath => "xpath",
            Strategy::Css => "css",
            Strategy::LinkText => "linktext",
            Strategy::PartialLinkText => "partiallinktext",
        };
        f.write_str(name)
    }
}

/// A (strategy, value) pair identifying a set of page elements.
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    strategy: Strategy,
    value: String,
}

impl Locator {
    /// Create a locator from an already-typed strategy
    pub fn new<S: Into<String>>(strategy: Strategy, value: S) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    /// Resolve a locator from a strategy string (case-insensitive)
    pub fn parse(strategy: &str, value: &str) -> Result<Self> {
        Ok(Self::new(strategy.parse::<Strategy>()?, value))
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Normalize into the query form the driver executes
    pub fn to_query(&self) -> ElementQuery {
        match self.strategy {
            Strategy::Id => ElementQuery::Css(format!("[id='{}']", escape_css(&self.value))),
            Strategy::Name => ElementQuery::Css(format!("[name='{}']", escape_css(&self.value))),
            Strategy::ClassName => ElementQuery::Css(format!(".{}", self.value)),
            Strategy::TagName => ElementQuery::Css(self.value.clone()),
            Strategy::Css => ElementQuery::Css(self.value.clone()),
            Strategy::XPath => ElementQuery::XPath(self.value.clone()),
            Strategy::LinkText => {
                ElementQuery::XPath(format!("//a[normalize-space(.)='{}']", self.value))
            }
            Strategy::PartialLinkText => {
                ElementQuery::XPath(format!("//a[contains(., '{}')]", self.value))
            }
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy, self.value)
    }
}

/// Normalized element query descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementQuery {
    /// CSS selector query
    Css(String),
    /// XPath expression query
    XPath(String),
}

impl fmt::Display for ElementQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementQuery::Css(s) => write!(f, "css:{}", s),
            ElementQuery::XPath(s) => write!(f, "xpath:{}", s),
        }
    }
}

fn escape_css(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_aliases_case_insensitive() {
        for (input, expected) in [
            ("id", Strategy::Id),
            ("ID", Strategy::Id),
            ("name", Strategy::Name),
            ("class", Strategy::ClassName),
            ("ClassName", Strategy::ClassName),
            ("tag", Strategy::TagName),
            ("TAGNAME", Strategy::TagName),
            ("xpath", Strategy::XPath),
            ("css", Strategy::Css),
            ("CssSelector", Strategy::Css),
            ("linktext", Strategy::LinkText),
            ("PartialLinkText", Strategy::PartialLinkText),
        ] {
            assert_eq!(input.parse::<Strategy>().unwrap(), expected, "{}", input);
        }
    }

    #[test]
    fn test_unsupported_strategy() {
        let result = Locator::parse("data-testid", "submit");
        assert!(matches!(
            result,
            Err(Error::UnsupportedLocatorStrategy(s)) if s == "data-testid"
        ));
    }

    #[test]
    fn test_query_normalization() {
        assert_eq!(
            Locator::parse("id", "username").unwrap().to_query(),
            ElementQuery::Css("[id='username']".to_string())
        );
        assert_eq!(
            Locator::parse("class", "error-message").unwrap().to_query(),
            ElementQuery::Css(".error-message".to_string())
        );
        assert_eq!(
            Locator::parse("xpath", "//button[@type='submit']")
                .unwrap()
                .to_query(),
            ElementQuery::XPath("//button[@type='submit']".to_string())
        );
        assert_eq!(
            Locator::parse("linktext", "Forgot Password?")
                .unwrap()
                .to_query(),
            ElementQuery::XPath("//a[normalize-space(.)='Forgot Password?']".to_string())
        );
    }

    #[test]
    fn test_css_value_escaping() {
        let query = Locator::parse("id", "user's-input").unwrap().to_query();
        assert_eq!(query, ElementQuery::Css("[id='user\\'s-input']".to_string()));
    }

    #[test]
    fn test_display() {
        let locator = Locator::parse("ID", "loginButton").unwrap();
        assert_eq!(locator.to_string(), "id=loginButton");
    }
}
