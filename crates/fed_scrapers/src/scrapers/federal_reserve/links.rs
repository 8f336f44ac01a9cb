use fed_core::config::SPEECH_URL_PREFIX;
use fed_core::{Error, Result, Speaker, SpeechLink};
use regex::Regex;
use tracing::{debug, info};
use url::Url;

use super::{ANCHORS, SPEAKER_CAPTION};
use crate::browser::BrowserSession;

/// Accumulates speech links across the pages of the listing.
#[derive(Debug, Clone)]
pub struct LinkCollector {
    speaker: Speaker,
    base: Url,
    links: Vec<SpeechLink>,
}

impl LinkCollector {
    /// `base` is the listing URL, used to resolve relative hrefs.
    pub fn new(speaker: Speaker, base: Url) -> Self {
        Self {
            speaker,
            base,
            links: Vec::new(),
        }
    }

    /// Add every matching link on the current page. Returns how many were
    /// added; duplicates are kept.
    pub async fn collect<S>(&mut self, session: &mut S) -> Result<usize>
    where
        S: BrowserSession + ?Sized,
    {
        let identifier = if self.speaker.is_catch_all() {
            let caption = session.text(&SPEAKER_CAPTION).await?;
            let name = surname(&caption).ok_or_else(|| {
                Error::Scraping(format!("speaker caption {:?} holds no name", caption))
            })?;
            info!("👤 Last name found: {}", name);
            name
        } else {
            self.speaker.identifier().to_string()
        };
        let pattern = speech_pattern(&identifier)?;

        let before = self.links.len();
        for href in session.attributes(&ANCHORS, "href").await? {
            let url = match self.base.join(&href) {
                Ok(url) => url,
                Err(err) => {
                    debug!("Skipping unparsable href {:?}: {}", href, err);
                    continue;
                }
            };
            if pattern.is_match(url.as_str()) {
                self.links.push(SpeechLink::new(url));
            }
        }
        Ok(self.links.len() - before)
    }

    pub fn links(&self) -> &[SpeechLink] {
        &self.links
    }

    pub fn into_links(self) -> Vec<SpeechLink> {
        self.links
    }
}

/// `^<speech prefix><identifier>.*$`, with both parts taken literally.
pub fn speech_pattern(identifier: &str) -> Result<Regex> {
    let pattern = format!(
        "^{}{}.*$",
        regex::escape(SPEECH_URL_PREFIX),
        regex::escape(identifier)
    );
    Regex::new(&pattern).map_err(|e| Error::Scraping(format!("Invalid link pattern: {}", e)))
}

/// Last whitespace-separated word of a caption, lowercased to match the
/// speech URLs.
pub fn surname(caption: &str) -> Option<String> {
    caption.split_whitespace().last().map(str::to_lowercase)
}
