//! A browser session over canned pages.
//!
//! Pages are keyed by URL and hold elements keyed by the exact [`Locator`]
//! that finds them. Clicking an element with a target switches the current
//! page, which is enough to replay a paginated listing without a browser.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use fed_core::{BrowserError, Result};

use super::{BrowserSession, Locator};

#[derive(Debug, Clone)]
pub struct MemoryElement {
    locator: Locator,
    text: String,
    attributes: HashMap<String, String>,
    navigates_to: Option<String>,
}

impl MemoryElement {
    pub fn new(locator: Locator) -> Self {
        Self {
            locator,
            text: String::new(),
            attributes: HashMap::new(),
            navigates_to: None,
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Clicking the element loads the page registered under `url`.
    pub fn navigates_to(mut self, url: impl Into<String>) -> Self {
        self.navigates_to = Some(url.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    elements: Vec<MemoryElement>,
    broken: Vec<Locator>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, element: MemoryElement) -> Self {
        self.elements.push(element);
        self
    }

    pub fn with_text(self, locator: Locator, text: impl Into<String>) -> Self {
        self.with(MemoryElement::new(locator).text(text))
    }

    pub fn with_link(self, locator: Locator, href: impl Into<String>) -> Self {
        self.with(MemoryElement::new(locator).attribute("href", href))
    }

    /// Any lookup of `locator` on this page fails with a protocol error.
    pub fn with_broken(mut self, locator: Locator) -> Self {
        self.broken.push(locator);
        self
    }
}

/// What a [`MemorySession`] was asked to do. Shared, so it can still be read
/// after the session has been consumed by `quit`.
#[derive(Debug, Default)]
pub struct SessionJournal {
    pub visits: Vec<String>,
    pub clicks: Vec<Locator>,
    pub quits: usize,
}

#[derive(Debug, Default)]
pub struct MemorySession {
    pages: HashMap<String, MemoryPage>,
    current: Option<String>,
    journal: Arc<Mutex<SessionJournal>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, page: MemoryPage) -> Self {
        self.pages.insert(url.into(), page);
        self
    }

    pub fn journal(&self) -> Arc<Mutex<SessionJournal>> {
        self.journal.clone()
    }

    fn record(&self) -> MutexGuard<'_, SessionJournal> {
        self.journal.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn load(&mut self, url: &str) -> Result<()> {
        if !self.pages.contains_key(url) {
            return Err(BrowserError::Protocol(format!("no page served at {}", url)).into());
        }
        self.current = Some(url.to_string());
        Ok(())
    }

    fn matching(&self, locator: &Locator) -> Result<Vec<&MemoryElement>> {
        let page = self
            .current
            .as_ref()
            .and_then(|url| self.pages.get(url))
            .ok_or(BrowserError::NoPage)?;
        if page.broken.contains(locator) {
            return Err(BrowserError::Protocol(format!("stale element for {}", locator)).into());
        }
        Ok(page.elements.iter().filter(|e| &e.locator == locator).collect())
    }

    fn first(&self, locator: &Locator) -> Result<&MemoryElement> {
        self.matching(locator)?
            .into_iter()
            .next()
            .ok_or_else(|| BrowserError::ElementNotFound(locator.to_string()).into())
    }
}

#[async_trait]
impl BrowserSession for MemorySession {
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.load(url)?;
        self.record().visits.push(url.to_string());
        Ok(())
    }

    async fn text(&mut self, locator: &Locator) -> Result<String> {
        Ok(self.first(locator)?.text.clone())
    }

    async fn texts(&mut self, locator: &Locator) -> Result<Vec<String>> {
        Ok(self.matching(locator)?.into_iter().map(|e| e.text.clone()).collect())
    }

    async fn attributes(&mut self, locator: &Locator, name: &str) -> Result<Vec<String>> {
        Ok(self
            .matching(locator)?
            .into_iter()
            .filter_map(|e| e.attributes.get(name).cloned())
            .collect())
    }

    async fn count(&mut self, locator: &Locator) -> Result<usize> {
        Ok(self.matching(locator)?.len())
    }

    async fn click(&mut self, locator: &Locator) -> Result<()> {
        let target = self.first(locator)?.navigates_to.clone();
        self.record().clicks.push(locator.clone());
        if let Some(url) = target {
            self.load(&url)?;
        }
        Ok(())
    }

    async fn wait_for(&mut self, locator: &Locator, timeout: Duration) -> Result<()> {
        if self.matching(locator)?.is_empty() {
            return Err(BrowserError::Timeout {
                locator: locator.to_string(),
                timeout,
            }
            .into());
        }
        Ok(())
    }

    async fn quit(self) -> Result<()> {
        self.record().quits += 1;
        Ok(())
    }
}
