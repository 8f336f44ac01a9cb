pub mod browser;
pub mod cli;
pub mod logging;
pub mod scrapers;

pub use browser::{BrowserSession, ChromiumSession, Locator, MemorySession};
pub use cli::{handle_command, ScraperArgs, ScraperCommands};
pub use logging::{init_logging, Logger};
pub use scrapers::{Pipeline, RunSummary};

pub mod prelude {
    pub use super::browser::{BrowserSession, Locator};
    pub use super::scrapers::federal_reserve::{PaginationEnd, Pipeline, RunSummary};
    pub use fed_core::{Error, Result, ScrapeConfig, Speaker};
}
