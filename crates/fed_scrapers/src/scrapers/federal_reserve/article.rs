use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use fed_core::{ArticleDocument, Error, Field, Result, SpeechLink, SpeechStore};

use super::{field_locator, output_file_name};
use crate::browser::BrowserSession;
use crate::logging::Logger;

/// Turns a speech detail page into a text file.
#[derive(Clone)]
pub struct ArticleExtractor {
    store: Arc<dyn SpeechStore>,
    timeout: Duration,
}

impl ArticleExtractor {
    /// `timeout` bounds the wait for the page title to render.
    pub fn new(store: Arc<dyn SpeechStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Navigate to `link` and read the speech. Nothing is written.
    pub async fn extract<S>(&self, session: &mut S, link: &SpeechLink) -> Result<ArticleDocument>
    where
        S: BrowserSession + ?Sized,
    {
        session.goto(link.as_str()).await?;
        session.wait_for(&field_locator(Field::Title), self.timeout).await?;

        let date = read_field(session, Field::Date).await?;
        let title = read_field(session, Field::Title).await?;
        let speaker = read_field(session, Field::Speaker).await?;
        let location = read_field(session, Field::Location).await?;

        let paragraphs = session.texts(&field_locator(Field::Content)).await?;
        if paragraphs.is_empty() {
            return Err(Error::MissingField(Field::Content));
        }

        ArticleDocument::new(date, title, speaker, location, paragraphs.join("\n"))
    }

    /// Extract `link` and write it to the store, returning the file path.
    pub async fn generate<S>(&self, session: &mut S, link: &SpeechLink) -> Result<PathBuf>
    where
        S: BrowserSession + ?Sized,
    {
        let logger = Logger::new().with_prefix("📄").with_prefix(format!("[{}]", link));
        logger.info("Generating document");

        let document = match self.extract(session, link).await {
            Ok(document) => document,
            Err(err) => {
                logger.error(&format!("Error occurred: {}", err));
                return Err(err);
            }
        };

        let file_name = output_file_name(&document.title, document.date);
        let path = self.store.store(&file_name, &document.render()).await?;
        logger.info(&format!("Saved \"{}\" to {}", document.title, path.display()));
        Ok(path)
    }
}

async fn read_field<S>(session: &mut S, field: Field) -> Result<String>
where
    S: BrowserSession + ?Sized,
{
    session
        .text(&field_locator(field))
        .await
        .map_err(|err| if err.is_element_not_found() { Error::MissingField(field) } else { err })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{MemoryPage, MemorySession};
    use fed_core::{BrowserError, TextFileStore};

    const LINK: &str = "https://www.federalreserve.gov/newsevents/speech/powell20240105a.htm";

    fn page() -> MemoryPage {
        MemoryPage::new()
            .with_text(field_locator(Field::Date), "January 5, 2024")
            .with_text(field_locator(Field::Title), "Remarks on Economic Outlook")
            .with_text(field_locator(Field::Speaker), "Chair Jerome H. Powell")
            .with_text(field_locator(Field::Location), "At the Economic Club, Washington, D.C.")
            .with_text(field_locator(Field::Content), "Thank you.")
            .with_text(field_locator(Field::Content), "Let me begin.")
    }

    fn extractor(dir: &std::path::Path) -> ArticleExtractor {
        ArticleExtractor::new(Arc::new(TextFileStore::new(dir)), Duration::from_secs(10))
    }

    #[tokio::test]
    async fn test_extract_reads_all_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = MemorySession::new().with_page(LINK, page());

        let document = extractor(dir.path())
            .extract(&mut session, &SpeechLink::new(LINK))
            .await
            .unwrap();

        assert_eq!(document.title, "Remarks on Economic Outlook");
        assert_eq!(document.speaker, "Chair Jerome H. Powell");
        assert_eq!(document.location, "At the Economic Club, Washington, D.C.");
        assert_eq!(document.body, "Thank you.\nLet me begin.");
        assert_eq!(document.date.to_string(), "2024-01-05");
    }

    #[tokio::test]
    async fn test_generate_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = MemorySession::new().with_page(LINK, page());

        let path = extractor(dir.path())
            .generate(&mut session, &SpeechLink::new(LINK))
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("Remarks_on_Economic_Outlook_01_05_2024.txt"));
        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            contents,
            "Date: January 5, 2024\n\nTitle: Remarks on Economic Outlook\n\nSpeaker: Chair Jerome H. Powell\n\nLocation: At the Economic Club, Washington, D.C.\n\nThank you.\nLet me begin."
        );
    }

    #[tokio::test]
    async fn test_missing_location_names_field_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let page = MemoryPage::new()
            .with_text(field_locator(Field::Date), "January 5, 2024")
            .with_text(field_locator(Field::Title), "Remarks on Economic Outlook")
            .with_text(field_locator(Field::Speaker), "Chair Jerome H. Powell")
            .with_text(field_locator(Field::Content), "Thank you.");
        let mut session = MemorySession::new().with_page(LINK, page);

        let err = extractor(dir.path())
            .generate(&mut session, &SpeechLink::new(LINK))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::MissingField(Field::Location)));
        assert!(err.to_string().contains("location"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_body_is_a_field_error() {
        let dir = tempfile::tempdir().unwrap();
        let page = MemoryPage::new()
            .with_text(field_locator(Field::Date), "January 5, 2024")
            .with_text(field_locator(Field::Title), "Remarks")
            .with_text(field_locator(Field::Speaker), "Chair Jerome H. Powell")
            .with_text(field_locator(Field::Location), "Washington, D.C.");
        let mut session = MemorySession::new().with_page(LINK, page);

        let err = extractor(dir.path())
            .extract(&mut session, &SpeechLink::new(LINK))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingField(Field::Content)));
    }

    #[tokio::test]
    async fn test_title_never_appears() {
        let dir = tempfile::tempdir().unwrap();
        let page = MemoryPage::new().with_text(field_locator(Field::Date), "January 5, 2024");
        let mut session = MemorySession::new().with_page(LINK, page);

        let err = extractor(dir.path())
            .extract(&mut session, &SpeechLink::new(LINK))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Browser(BrowserError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_unparsable_date_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let page = MemoryPage::new()
            .with_text(field_locator(Field::Date), "2024-01-05")
            .with_text(field_locator(Field::Title), "Remarks")
            .with_text(field_locator(Field::Speaker), "Chair Jerome H. Powell")
            .with_text(field_locator(Field::Location), "Washington, D.C.")
            .with_text(field_locator(Field::Content), "Thank you.");
        let mut session = MemorySession::new().with_page(LINK, page);

        let err = extractor(dir.path())
            .generate(&mut session, &SpeechLink::new(LINK))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDate { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
