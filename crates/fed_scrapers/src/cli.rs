use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::{Args, Subcommand};
use fed_core::config::DEFAULT_OUTPUT_DIR;
use fed_core::{BrowserEngine, Result, ScrapeConfig, Speaker, WindowSize};

use crate::scrapers::federal_reserve::{PaginationEnd, Pipeline, RunSummary};

/// A duration written as `1h15m30s`, `10s`, `500ms` or a bare number of
/// seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanDuration(pub Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total = Duration::ZERO;
        let mut current_number = String::new();
        let mut has_value = false;
        let mut chars = s.trim().chars().peekable();

        while let Some(c) = chars.next() {
            if c.is_ascii_digit() {
                current_number.push(c);
                continue;
            }
            if c.is_whitespace() {
                continue;
            }
            let num = current_number
                .parse::<u64>()
                .map_err(|_| format!("Invalid character in duration: {}", c))?;
            let part = match c {
                'm' if chars.peek() == Some(&'s') => {
                    chars.next();
                    Some(Duration::from_millis(num))
                }
                's' => Some(Duration::from_secs(num)),
                'm' => num.checked_mul(60).map(Duration::from_secs),
                'h' => num.checked_mul(3600).map(Duration::from_secs),
                'd' => num.checked_mul(86400).map(Duration::from_secs),
                _ => return Err(format!("Invalid duration unit: {}", c)),
            };
            total = part
                .and_then(|part| total.checked_add(part))
                .ok_or_else(|| format!("Duration too large: {}", s))?;
            current_number.clear();
            has_value = true;
        }

        // A trailing number without a unit counts as seconds
        if !current_number.is_empty() {
            let num = current_number
                .parse::<u64>()
                .map_err(|_| "Invalid number in duration".to_string())?;
            total = total
                .checked_add(Duration::from_secs(num))
                .ok_or_else(|| format!("Duration too large: {}", s))?;
            has_value = true;
        }

        if !has_value {
            return Err("Duration must include a number".to_string());
        }
        Ok(HumanDuration(total))
    }
}

/// Options shared by every command that drives a browser.
#[derive(Args, Debug, Clone)]
pub struct BrowserArgs {
    /// Speaker to filter the listing by
    #[arg(long, value_enum, default_value_t = Speaker::Powell)]
    pub speaker: Speaker,
    /// Browser to launch
    #[arg(long, value_enum, default_value_t = BrowserEngine::Chrome)]
    pub browser: BrowserEngine,
    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,
    /// Browser binary to use instead of looking it up on PATH
    #[arg(long)]
    pub executable: Option<PathBuf>,
    /// Browser window size
    #[arg(long, default_value = "1872x1344")]
    pub window_size: WindowSize,
    /// Directory the speech files are written to
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,
    /// How long to wait for a speech page to render (e.g. 10s)
    #[arg(long, default_value = "10s")]
    pub timeout: HumanDuration,
    /// Pause before reading each listing page (e.g. 1s, 500ms)
    #[arg(long, default_value = "1s")]
    pub settle: HumanDuration,
}

impl BrowserArgs {
    pub fn to_config(&self) -> ScrapeConfig {
        let mut config = ScrapeConfig::new(self.browser, self.headless, self.speaker)
            .with_output_dir(&self.output_dir)
            .with_window_size(self.window_size)
            .with_element_timeout(self.timeout.0)
            .with_page_settle_delay(self.settle.0);
        if let Some(path) = &self.executable {
            config = config.with_executable(path);
        }
        config
    }
}

#[derive(Args, Debug, Clone)]
pub struct ScraperArgs {
    #[command(subcommand)]
    pub command: ScraperCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ScraperCommands {
    /// Save every speech by a speaker as a text file
    Scrape(BrowserArgs),
    /// Print the speech links for a speaker without visiting them
    Links {
        #[command(flatten)]
        browser: BrowserArgs,
        /// Print the links as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// List the speakers the listing can be filtered by
    Speakers,
}

pub async fn handle_command(args: ScraperArgs) -> Result<()> {
    match args.command {
        ScraperCommands::Scrape(browser) => {
            let pipeline = Pipeline::new(browser.to_config())?;
            let summary = pipeline.run().await?;
            report(&summary);
        }
        ScraperCommands::Links { browser, json } => {
            let pipeline = Pipeline::new(browser.to_config())?;
            let harvest = pipeline.collect_links().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&harvest.links)?);
            } else {
                for link in &harvest.links {
                    println!("{}", link);
                }
            }
        }
        ScraperCommands::Speakers => {
            println!("Available speakers:");
            for speaker in Speaker::ALL {
                let note = if speaker.is_catch_all() { " (name read from the listing)" } else { "" };
                println!("  {:<10} filter #{}{}", speaker, speaker.filter_index(), note);
            }
        }
    }
    Ok(())
}

fn report(summary: &RunSummary) {
    let pagination = match &summary.pagination {
        PaginationEnd::Completed => "all pages read".to_string(),
        PaginationEnd::Exhausted { page } => format!("listing ended after page {}", page),
        PaginationEnd::Failed { page, reason } => format!("stopped on page {}: {}", page, reason),
    };
    println!(
        "{}: {} links over {} pages ({}), {} speeches written",
        summary.speaker,
        summary.links.len(),
        summary.total_pages,
        pagination,
        summary.written.len()
    );
    if let Some(failure) = &summary.aborted {
        eprintln!("Stopped at {}: {}", failure.link, failure.error);
    }
}
