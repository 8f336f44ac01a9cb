use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;
use crate::types::{BrowserEngine, Speaker};

pub const LISTING_URL: &str = "https://www.federalreserve.gov/newsevents/speeches.htm";
pub const SPEECH_URL_PREFIX: &str = "https://www.federalreserve.gov/newsevents/speech/";
pub const DEFAULT_OUTPUT_DIR: &str = "data";
pub const DEFAULT_ELEMENT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_PAGE_SETTLE_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1872,
            height: 1344,
        }
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for WindowSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidWindowSize(s.to_string());
        let (width, height) = s.trim().split_once(|c: char| c == 'x' || c == 'X').ok_or_else(invalid)?;
        let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
        let height = height.trim().parse::<u32>().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

/// How the browser session is launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserOptions {
    pub engine: BrowserEngine,
    pub headless: bool,
    pub window_size: WindowSize,
    /// Explicit browser binary; when unset the engine's executables are
    /// looked up on `PATH`.
    pub executable: Option<PathBuf>,
}

impl BrowserOptions {
    pub fn new(engine: BrowserEngine, headless: bool) -> Self {
        Self {
            engine,
            headless,
            window_size: WindowSize::default(),
            executable: None,
        }
    }

    /// Picks the browser binary to launch. `Ok(None)` leaves detection to the
    /// CDP launcher.
    pub fn resolve_executable(&self) -> Result<Option<PathBuf>, ConfigError> {
        if let Some(path) = &self.executable {
            return if path.is_file() {
                Ok(Some(path.clone()))
            } else {
                Err(ConfigError::ExecutableNotFound {
                    engine: self.engine,
                    path: path.display().to_string(),
                })
            };
        }

        let Some(paths) = std::env::var_os("PATH") else {
            return Ok(None);
        };
        let found = std::env::split_paths(&paths).find_map(|dir| {
            self.engine
                .executable_candidates()
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
        });
        Ok(found)
    }
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self::new(BrowserEngine::default(), false)
    }
}

/// Everything a scrape run needs, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeConfig {
    pub browser: BrowserOptions,
    pub speaker: Speaker,
    pub output_dir: PathBuf,
    pub listing_url: Url,
    pub element_timeout: Duration,
    /// Fixed pause before reading each listing page.
    pub page_settle_delay: Duration,
}

impl ScrapeConfig {
    pub fn new(engine: BrowserEngine, headless: bool, speaker: Speaker) -> Self {
        Self {
            browser: BrowserOptions::new(engine, headless),
            speaker,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            listing_url: default_listing_url(),
            element_timeout: DEFAULT_ELEMENT_TIMEOUT,
            page_settle_delay: DEFAULT_PAGE_SETTLE_DELAY,
        }
    }

    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_listing_url(mut self, url: Url) -> Self {
        self.listing_url = url;
        self
    }

    pub fn with_element_timeout(mut self, timeout: Duration) -> Self {
        self.element_timeout = timeout;
        self
    }

    pub fn with_page_settle_delay(mut self, delay: Duration) -> Self {
        self.page_settle_delay = delay;
        self
    }

    pub fn with_window_size(mut self, size: WindowSize) -> Self {
        self.browser.window_size = size;
        self
    }

    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.browser.executable = Some(path.into());
        self
    }

    /// Rejects settings that would leave the run unable to work, before any
    /// browser is started.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyOutputDir);
        }
        if self.element_timeout.is_zero() {
            return Err(ConfigError::ZeroDuration("element timeout"));
        }
        let size = self.browser.window_size;
        if size.width == 0 || size.height == 0 {
            return Err(ConfigError::InvalidWindowSize(size.to_string()));
        }
        self.browser.resolve_executable()?;
        Ok(())
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self::new(BrowserEngine::default(), false, Speaker::default())
    }
}

fn default_listing_url() -> Url {
    Url::parse(LISTING_URL).expect("listing URL constant is valid")
}
