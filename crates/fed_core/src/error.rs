use std::time::Duration;

use thiserror::Error;

use crate::types::{BrowserEngine, Field};

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    /// A labeled region of a speech page was not present.
    #[error("{0} data inexistent")]
    MissingField(Field),

    #[error("Invalid speech date {value:?}: {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Scraping error: {0}")]
    Scraping(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// True when the error only says that a locator matched nothing.
    pub fn is_element_not_found(&self) -> bool {
        matches!(self, Error::Browser(BrowserError::ElementNotFound(_)))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unsupported browser {0:?} (expected one of: chrome, chromium)")]
    UnsupportedBrowser(String),

    #[error("unknown speaker {0:?}")]
    UnknownSpeaker(String),

    #[error("invalid window size {0:?} (expected WIDTHxHEIGHT)")]
    InvalidWindowSize(String),

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("output directory must not be empty")]
    EmptyOutputDir,

    #[error("no {engine} executable at {path}")]
    ExecutableNotFound { engine: BrowserEngine, path: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrowserError {
    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("timed out after {timeout:?} waiting for {locator}")]
    Timeout { locator: String, timeout: Duration },

    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("no page loaded")]
    NoPage,
}
