use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use fed_core::Result;

pub mod chromium;
pub mod memory;

pub use chromium::ChromiumSession;
pub use memory::{MemoryElement, MemoryPage, MemorySession, SessionJournal};

/// How an element is looked up on a page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(String),
    XPath(String),
    TagName(String),
    ClassName(String),
    Id(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Locator::XPath(expression.into())
    }

    pub fn class(name: impl Into<String>) -> Self {
        Locator::ClassName(name.into())
    }

    pub fn id(id: impl Into<String>) -> Self {
        Locator::Id(id.into())
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Locator::TagName(name.into())
    }

    /// CSS equivalent, for every kind except XPath.
    pub fn to_css(&self) -> Option<String> {
        match self {
            Locator::Css(selector) => Some(selector.clone()),
            Locator::TagName(name) => Some(name.clone()),
            Locator::ClassName(name) => Some(format!(".{}", name)),
            // `[id=..]` rather than `#..` so every element sharing the id matches
            Locator::Id(id) => Some(format!("[id=\"{}\"]", id.replace('"', "\\\""))),
            Locator::XPath(_) => None,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(selector) => write!(f, "css `{}`", selector),
            Locator::XPath(expression) => write!(f, "xpath `{}`", expression),
            Locator::TagName(name) => write!(f, "tag `{}`", name),
            Locator::ClassName(name) => write!(f, "class `{}`", name),
            Locator::Id(id) => write!(f, "id `{}`", id),
        }
    }
}

/// A single controlled browser tab.
///
/// Lookups that match nothing fail with `BrowserError::ElementNotFound`, so
/// callers can tell an absent element apart from a broken session.
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigate the tab and wait for the load to finish.
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// Rendered text of the first matching element.
    async fn text(&mut self, locator: &Locator) -> Result<String>;

    /// Rendered text of every matching element, in document order.
    async fn texts(&mut self, locator: &Locator) -> Result<Vec<String>>;

    /// Value of `name` on every matching element that carries it.
    async fn attributes(&mut self, locator: &Locator, name: &str) -> Result<Vec<String>>;

    async fn count(&mut self, locator: &Locator) -> Result<usize>;

    /// Click the first matching element.
    async fn click(&mut self, locator: &Locator) -> Result<()>;

    /// Wait until at least one element matches, or fail with
    /// `BrowserError::Timeout`.
    async fn wait_for(&mut self, locator: &Locator, timeout: Duration) -> Result<()>;

    /// Close the browser. Consumes the session so it can only happen once.
    async fn quit(self) -> Result<()>
    where
        Self: Sized;
}
