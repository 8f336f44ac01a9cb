pub mod config;
pub mod error;
pub mod storage;
pub mod types;

pub use config::{BrowserOptions, ScrapeConfig, WindowSize};
pub use error::{BrowserError, ConfigError, Error};
pub use storage::{SpeechStore, TextFileStore};
pub use types::{ArticleDocument, BrowserEngine, Field, Speaker, SpeechLink};

pub type Result<T> = std::result::Result<T, Error>;
