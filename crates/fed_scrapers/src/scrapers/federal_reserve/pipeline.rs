use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use fed_core::{BrowserError, Error, Result, ScrapeConfig, Speaker, SpeechLink, SpeechStore, TextFileStore};
use tracing::{debug, info};

use super::{filter_checkbox, ArticleExtractor, LinkCollector, NEXT_PAGE, PAGE_LINKS, PAGINATION, SHOW_MORE};
use crate::browser::{BrowserSession, ChromiumSession};
use crate::logging::Logger;

/// Phases of a run, in order. `Done` is reached from every exit path once the
/// session has been released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    FilterSelected,
    Paginating,
    LinksCollected,
    Extracting,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::FilterSelected => "filter selected",
            Stage::Paginating => "paginating",
            Stage::LinksCollected => "links collected",
            Stage::Extracting => "extracting",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Result of reading one listing page and moving past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStep {
    /// The Next control was clicked.
    Advanced,
    /// There is no Next control: the listing has ended.
    Exhausted,
}

/// Why pagination stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationEnd {
    /// Every counted page was walked.
    Completed,
    /// The Next control was missing after reading `page`.
    Exhausted { page: usize },
    /// Reading or leaving `page` failed unexpectedly.
    Failed { page: usize, reason: String },
}

/// Links gathered from the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkHarvest {
    pub total_pages: usize,
    pub end: PaginationEnd,
    pub links: Vec<SpeechLink>,
}

/// The extraction error that stopped a run.
#[derive(Debug)]
pub struct ExtractionFailure {
    pub link: SpeechLink,
    pub error: Error,
}

#[derive(Debug)]
pub struct RunSummary {
    pub speaker: Speaker,
    pub total_pages: usize,
    pub pagination: PaginationEnd,
    pub links: Vec<SpeechLink>,
    pub written: Vec<PathBuf>,
    /// Set when an extraction failed; the links after it were not visited.
    pub aborted: Option<ExtractionFailure>,
}

impl RunSummary {
    pub fn is_complete(&self) -> bool {
        self.aborted.is_none()
    }
}

/// Number of result pages behind a pagination widget with `link_count`
/// anchors, one of which leads and one trails the numbered pages.
pub fn total_pages(link_count: usize) -> usize {
    link_count.saturating_sub(2)
}

/// Scrapes one speaker's speeches: filter, paginate, extract.
pub struct Pipeline {
    config: ScrapeConfig,
    store: Arc<dyn SpeechStore>,
    logger: Logger,
}

impl Pipeline {
    /// Validates `config` and writes speeches into its output directory.
    pub fn new(config: ScrapeConfig) -> Result<Self> {
        let store = Arc::new(TextFileStore::new(&config.output_dir));
        Self::with_store(config, store)
    }

    pub fn with_store(config: ScrapeConfig, store: Arc<dyn SpeechStore>) -> Result<Self> {
        config.validate()?;
        let logger = Logger::new().with_prefix(format!("[{}]", config.speaker));
        Ok(Self {
            config,
            store,
            logger,
        })
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Launch the configured browser and run the whole pipeline.
    pub async fn run(&self) -> Result<RunSummary> {
        let session = ChromiumSession::launch(&self.config.browser).await?;
        self.run_with_session(session).await
    }

    /// Launch the configured browser and only gather links.
    pub async fn collect_links(&self) -> Result<LinkHarvest> {
        let session = ChromiumSession::launch(&self.config.browser).await?;
        self.collect_links_with_session(session).await
    }

    /// Run the pipeline on `session`, which is quit exactly once before
    /// returning, whatever happens.
    ///
    /// Extraction errors end the run early but are reported in the summary;
    /// only filter selection and pagination discovery errors are returned.
    pub async fn run_with_session<S: BrowserSession>(&self, mut session: S) -> Result<RunSummary> {
        let outcome = self.drive(&mut session).await;
        self.teardown(session).await;
        outcome
    }

    /// Select the filter and walk the listing on `session`, then quit it.
    pub async fn collect_links_with_session<S: BrowserSession>(&self, mut session: S) -> Result<LinkHarvest> {
        let outcome = self.harvest(&mut session).await;
        self.teardown(session).await;
        outcome
    }

    async fn drive<S: BrowserSession>(&self, session: &mut S) -> Result<RunSummary> {
        let harvest = self.harvest(session).await?;

        self.enter(Stage::Extracting);
        let (written, aborted) = self.extract_all(session, &harvest.links).await;
        if aborted.is_none() {
            self.logger.info(&format!("✅ Wrote {} speeches", written.len()));
        }

        Ok(RunSummary {
            speaker: self.config.speaker,
            total_pages: harvest.total_pages,
            pagination: harvest.end,
            links: harvest.links,
            written,
            aborted,
        })
    }

    async fn harvest<S: BrowserSession>(&self, session: &mut S) -> Result<LinkHarvest> {
        self.enter(Stage::Init);
        self.select_filter(session).await?;
        self.enter(Stage::FilterSelected);

        let total_pages = self.count_pages(session).await?;
        self.enter(Stage::Paginating);

        let mut collector = LinkCollector::new(self.config.speaker, self.config.listing_url.clone());
        let mut end = PaginationEnd::Completed;
        for page in 1..total_pages {
            match self.step(session, &mut collector, page).await {
                Ok(PageStep::Advanced) => {}
                Ok(PageStep::Exhausted) => {
                    self.logger.info(&format!("🏁 No Next control after page {}", page));
                    end = PaginationEnd::Exhausted { page };
                    break;
                }
                Err(err) => {
                    self.logger.error(&format!("❌ Pagination stopped on page {}: {}", page, err));
                    end = PaginationEnd::Failed {
                        page,
                        reason: err.to_string(),
                    };
                    break;
                }
            }
        }

        let links = collector.into_links();
        self.enter(Stage::LinksCollected);
        self.logger.info(&format!("🔗 Speeches found: {}", links.len()));
        for link in &links {
            self.logger.debug(link.as_str());
        }

        Ok(LinkHarvest {
            total_pages,
            end,
            links,
        })
    }

    async fn select_filter<S: BrowserSession>(&self, session: &mut S) -> Result<()> {
        session.goto(self.config.listing_url.as_str()).await?;
        session.click(&filter_checkbox(self.config.speaker)).await?;
        session.click(&SHOW_MORE).await?;
        Ok(())
    }

    async fn count_pages<S: BrowserSession>(&self, session: &mut S) -> Result<usize> {
        if session.count(&PAGINATION).await? == 0 {
            return Err(BrowserError::ElementNotFound(PAGINATION.to_string()).into());
        }
        let total = total_pages(session.count(&PAGE_LINKS).await?);
        self.logger.info(&format!("📚 Total pages: {}", total));
        Ok(total)
    }

    async fn step<S: BrowserSession>(
        &self,
        session: &mut S,
        collector: &mut LinkCollector,
        page: usize,
    ) -> Result<PageStep> {
        if !self.config.page_settle_delay.is_zero() {
            tokio::time::sleep(self.config.page_settle_delay).await;
        }

        self.logger.info(&format!("📑 Extracting page links from page {}", page));
        let added = collector.collect(session).await?;
        self.logger.debug(&format!("Page {} added {} links", page, added));

        match session.click(&NEXT_PAGE).await {
            Ok(()) => Ok(PageStep::Advanced),
            Err(err) if err.is_element_not_found() => Ok(PageStep::Exhausted),
            Err(err) => Err(err),
        }
    }

    async fn extract_all<S: BrowserSession>(
        &self,
        session: &mut S,
        links: &[SpeechLink],
    ) -> (Vec<PathBuf>, Option<ExtractionFailure>) {
        let extractor = ArticleExtractor::new(self.store.clone(), self.config.element_timeout);
        let mut written = Vec::with_capacity(links.len());

        for (index, link) in links.iter().enumerate() {
            match extractor.generate(session, link).await {
                Ok(path) => written.push(path),
                Err(error) => {
                    let remaining = links.len() - index - 1;
                    self.logger.error(&format!(
                        "❌ Extraction failed for {}, abandoning {} remaining links: {}",
                        link, remaining, error
                    ));
                    return (
                        written,
                        Some(ExtractionFailure {
                            link: link.clone(),
                            error,
                        }),
                    );
                }
            }
        }
        (written, None)
    }

    async fn teardown<S: BrowserSession>(&self, session: S) {
        if let Err(err) = session.quit().await {
            self.logger.warn(&format!("⚠️ Failed to close browser session: {}", err));
        }
        self.enter(Stage::Done);
    }

    fn enter(&self, stage: Stage) {
        match stage {
            Stage::Init => info!("🦗 Scraping speeches by {}", self.config.speaker),
            Stage::Done => info!("🛑 Session released"),
            _ => debug!("Stage: {}", stage),
        }
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline").field("config", &self.config).finish()
    }
}
