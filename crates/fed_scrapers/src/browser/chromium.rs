use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use fed_core::{BrowserError, BrowserOptions, Result};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::{BrowserSession, Locator};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Browser session driven over the Chrome DevTools Protocol.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromiumSession {
    pub async fn launch(options: &BrowserOptions) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .window_size(options.window_size.width, options.window_size.height);
        if !options.headless {
            builder = builder.with_head();
        }
        match options.resolve_executable()? {
            Some(path) => {
                debug!("Using {} executable at {}", options.engine, path.display());
                builder = builder.chrome_executable(path);
            }
            None => warn!(
                "⚠️ No {} executable found on PATH, falling back to auto-detection",
                options.engine
            ),
        }
        let config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut events) = Browser::launch(config).await.map_err(launch_error)?;
        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(err) = event {
                    debug!("CDP handler event error: {}", err);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(err) => {
                handler.abort();
                return Err(launch_error(err));
            }
        };

        info!(
            "🌐 Launched {} ({}, {})",
            options.engine,
            if options.headless { "headless" } else { "headful" },
            options.window_size
        );
        Ok(Self {
            browser,
            page,
            handler,
        })
    }

    async fn elements(&self, locator: &Locator) -> Result<Vec<Element>> {
        if let Locator::XPath(expression) = locator {
            // performSearch errors on an empty result range, so count first
            if self.xpath_count(expression).await? == 0 {
                return Ok(Vec::new());
            }
            return self
                .page
                .find_xpaths(expression.as_str())
                .await
                .map_err(protocol_error);
        }
        let css = locator
            .to_css()
            .ok_or_else(|| BrowserError::Protocol(format!("{} has no css form", locator)))?;
        self.page.find_elements(css).await.map_err(protocol_error)
    }

    async fn xpath_count(&self, expression: &str) -> Result<usize> {
        let script = format!(
            "document.evaluate({}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null).snapshotLength",
            serde_json::to_string(expression)?
        );
        let result = self.page.evaluate(script).await.map_err(protocol_error)?;
        Ok(result.into_value::<usize>()?)
    }

    async fn first(&self, locator: &Locator) -> Result<Element> {
        self.elements(locator)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BrowserError::ElementNotFound(locator.to_string()).into())
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn goto(&mut self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);
        self.page.goto(url).await.map_err(protocol_error)?;
        Ok(())
    }

    async fn text(&mut self, locator: &Locator) -> Result<String> {
        let element = self.first(locator).await?;
        element_text(&element).await
    }

    async fn texts(&mut self, locator: &Locator) -> Result<Vec<String>> {
        let mut texts = Vec::new();
        for element in self.elements(locator).await? {
            texts.push(element_text(&element).await?);
        }
        Ok(texts)
    }

    async fn attributes(&mut self, locator: &Locator, name: &str) -> Result<Vec<String>> {
        let mut values = Vec::new();
        for element in self.elements(locator).await? {
            if let Some(value) = element.attribute(name).await.map_err(protocol_error)? {
                values.push(value);
            }
        }
        Ok(values)
    }

    async fn count(&mut self, locator: &Locator) -> Result<usize> {
        Ok(self.elements(locator).await?.len())
    }

    async fn click(&mut self, locator: &Locator) -> Result<()> {
        let element = self.first(locator).await?;
        element.click().await.map_err(protocol_error)?;
        Ok(())
    }

    async fn wait_for(&mut self, locator: &Locator, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.count(locator).await? > 0 {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout {
                    locator: locator.to_string(),
                    timeout,
                }
                .into());
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn quit(mut self) -> Result<()> {
        let closed = self.browser.close().await.map_err(protocol_error);
        match Shutdown::after_close(&closed) {
            Shutdown::Wait => {
                if let Err(err) = self.browser.wait().await {
                    warn!("⚠️ Browser process did not exit cleanly: {}", err);
                }
            }
            Shutdown::Kill => {
                if let Some(Err(err)) = self.browser.kill().await {
                    warn!("⚠️ Failed to kill browser process: {}", err);
                }
            }
        }
        self.handler.abort();
        closed?;
        info!("🌐 Browser session closed");
        Ok(())
    }
}

/// How to reap the browser process once `close` has been sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shutdown {
    /// The browser acknowledged the close and exits on its own.
    Wait,
    /// The close was never acknowledged; waiting could block forever.
    Kill,
}

impl Shutdown {
    fn after_close<T>(closed: &Result<T>) -> Self {
        if closed.is_ok() {
            Shutdown::Wait
        } else {
            Shutdown::Kill
        }
    }
}

async fn element_text(element: &Element) -> Result<String> {
    let text = element.inner_text().await.map_err(protocol_error)?;
    Ok(text.unwrap_or_default().trim().to_string())
}

fn protocol_error(err: CdpError) -> fed_core::Error {
    BrowserError::Protocol(err.to_string()).into()
}

fn launch_error(err: CdpError) -> fed_core::Error {
    BrowserError::Launch(err.to_string()).into()
}
