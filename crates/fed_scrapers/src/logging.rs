use std::collections::VecDeque;
use std::sync::Once;

use tracing::Level;

static INIT: Once = Once::new();

/// Prefixes every message with the context it was created with, e.g. the
/// speaker or the link being processed.
#[derive(Debug, Clone, Default)]
pub struct Logger {
    prefixes: VecDeque<String>,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            prefixes: VecDeque::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push_back(prefix.into());
        self
    }

    fn line(&self, message: &str) -> String {
        let prefix = self.prefixes.iter().map(|p| format!("{} ", p)).collect::<String>();
        format!("{}{}", prefix, message)
    }

    pub fn info(&self, message: &str) {
        tracing::info!("{}", self.line(message));
    }

    pub fn error(&self, message: &str) {
        tracing::error!("{}", self.line(message));
    }

    pub fn warn(&self, message: &str) {
        tracing::warn!("{}", self.line(message));
    }

    pub fn debug(&self, message: &str) {
        tracing::debug!("{}", self.line(message));
    }
}

/// Install the global `fmt` subscriber once. Later calls, or a subscriber set
/// elsewhere, leave the existing one in place.
pub fn init_logging(verbose: bool) -> Logger {
    if !tracing::dispatcher::has_been_set() {
        INIT.call_once(|| {
            let level = if verbose { Level::DEBUG } else { Level::INFO };
            let _ = tracing_subscriber::fmt()
                .with_max_level(level)
                .with_target(false)
                .try_init();
        });
    }
    Logger::new()
}
