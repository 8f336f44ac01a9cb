//! Speeches published on federalreserve.gov.
//!
//! The listing page is an Angular app: a speaker filter made of checkboxes, a
//! "show more" toggle and a `uib-pagination` widget. Detail pages carry the
//! speech metadata in a handful of fixed classes.

use fed_core::{Field, Speaker};
use lazy_static::lazy_static;

use crate::browser::Locator;

pub mod article;
pub mod filename;
pub mod links;
pub mod pipeline;

pub use article::ArticleExtractor;
pub use filename::{output_file_name, sanitize_filename};
pub use links::LinkCollector;
pub use pipeline::{ExtractionFailure, LinkHarvest, PageStep, PaginationEnd, Pipeline, RunSummary, Stage};

lazy_static! {
    pub static ref SHOW_MORE: Locator = Locator::css(".icon-more");
    pub static ref PAGINATION: Locator = Locator::xpath("//ul[@uib-pagination]");
    /// Anchors of the first pagination widget only; the listing may render
    /// another copy below the results.
    pub static ref PAGE_LINKS: Locator = Locator::xpath("(//ul[@uib-pagination])[1]//a");
    pub static ref NEXT_PAGE: Locator =
        Locator::xpath("//li[contains(@class, 'pagination-next')]//a[text()='Next']");
    pub static ref ANCHORS: Locator = Locator::xpath("//a[@href]");
    pub static ref SPEAKER_CAPTION: Locator =
        Locator::xpath("//p[@class='news__speaker ng-binding']");
}

/// Checkbox selecting `speaker` in the listing filter.
pub fn filter_checkbox(speaker: Speaker) -> Locator {
    Locator::css(format!(".checkbox:nth-child({}) .ng-scope", speaker.filter_index()))
}

/// Where a labeled region lives on a detail page.
pub fn field_locator(field: Field) -> Locator {
    match field {
        Field::Date => Locator::class("article__time"),
        Field::Title => Locator::class("title"),
        Field::Speaker => Locator::class("speaker"),
        Field::Location => Locator::class("location"),
        Field::Content => Locator::id("article"),
    }
}
