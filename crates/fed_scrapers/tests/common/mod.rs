//! Canned federalreserve.gov pages for driving the pipeline without a browser.

#![allow(dead_code)]

use fed_core::config::LISTING_URL;
use fed_core::{Field, Speaker};
use fed_scrapers::browser::{MemoryElement, MemoryPage, MemorySession};
use fed_scrapers::scrapers::federal_reserve::{
    field_locator, filter_checkbox, ANCHORS, NEXT_PAGE, PAGE_LINKS, PAGINATION, SHOW_MORE, SPEAKER_CAPTION,
};

pub const SPEECH_BASE: &str = "https://www.federalreserve.gov/newsevents/speech/";

pub fn speech_url(slug: &str) -> String {
    format!("{}{}.htm", SPEECH_BASE, slug)
}

fn page_url(index: usize) -> String {
    if index == 0 {
        LISTING_URL.to_string()
    } else {
        format!("{}?page={}", LISTING_URL, index + 1)
    }
}

/// A filtered listing.
pub struct Listing {
    pub speaker: Speaker,
    pub caption: Option<String>,
    /// Anchors inside the pagination widget, previous/next included.
    pub page_links: usize,
    /// Hrefs shown on each listing page.
    pub pages: Vec<Vec<String>>,
    /// Whether the last page still shows a Next control.
    pub next_on_last: bool,
}

impl Listing {
    pub fn new(speaker: Speaker, page_links: usize, pages: Vec<Vec<String>>) -> Self {
        Self {
            speaker,
            caption: None,
            page_links,
            pages,
            next_on_last: false,
        }
    }

    pub fn caption(mut self, caption: &str) -> Self {
        self.caption = Some(caption.to_string());
        self
    }

    pub fn page(&self, index: usize) -> MemoryPage {
        let mut page = MemoryPage::new();
        if index == 0 {
            page = page
                .with(MemoryElement::new(filter_checkbox(self.speaker)))
                .with(MemoryElement::new(SHOW_MORE.clone()))
                .with(MemoryElement::new(PAGINATION.clone()));
            for _ in 0..self.page_links {
                page = page.with(MemoryElement::new(PAGE_LINKS.clone()));
            }
        }
        if let Some(caption) = &self.caption {
            page = page.with_text(SPEAKER_CAPTION.clone(), caption.clone());
        }
        for href in &self.pages[index] {
            page = page.with_link(ANCHORS.clone(), href.clone());
        }
        let last = index + 1 == self.pages.len();
        if !last {
            page = page.with(MemoryElement::new(NEXT_PAGE.clone()).navigates_to(page_url(index + 1)));
        } else if self.next_on_last {
            page = page.with(MemoryElement::new(NEXT_PAGE.clone()).navigates_to(page_url(index)));
        }
        page
    }

    pub fn session(&self) -> MemorySession {
        (0..self.pages.len()).fold(MemorySession::new(), |session, index| {
            session.with_page(page_url(index), self.page(index))
        })
    }
}

pub fn speech_page(date: &str, title: &str, speaker: &str, location: Option<&str>, body: &[&str]) -> MemoryPage {
    let mut page = MemoryPage::new()
        .with_text(field_locator(Field::Date), date)
        .with_text(field_locator(Field::Title), title)
        .with_text(field_locator(Field::Speaker), speaker);
    if let Some(location) = location {
        page = page.with_text(field_locator(Field::Location), location);
    }
    for paragraph in body {
        page = page.with_text(field_locator(Field::Content), *paragraph);
    }
    page
}
