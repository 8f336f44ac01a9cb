use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error};
use crate::Result;

/// Date format used on speech pages, e.g. `January 5, 2024`.
pub const SPEECH_DATE_FORMAT: &str = "%B %d, %Y";

/// Speakers selectable in the listing filter.
///
/// The two catch-all categories do not name a person; the surname used to
/// match their links is read from the listing page instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Powell,
    Jefferson,
    Barr,
    Bowman,
    Cook,
    Kugler,
    Waller,
    Former,
    Other,
}

impl Speaker {
    pub const ALL: [Speaker; 9] = [
        Speaker::Powell,
        Speaker::Jefferson,
        Speaker::Barr,
        Speaker::Bowman,
        Speaker::Cook,
        Speaker::Kugler,
        Speaker::Waller,
        Speaker::Former,
        Speaker::Other,
    ];

    pub fn identifier(&self) -> &'static str {
        match self {
            Speaker::Powell => "powell",
            Speaker::Jefferson => "jefferson",
            Speaker::Barr => "barr",
            Speaker::Bowman => "bowman",
            Speaker::Cook => "cook",
            Speaker::Kugler => "kugler",
            Speaker::Waller => "waller",
            Speaker::Former => "former",
            Speaker::Other => "other",
        }
    }

    /// Position of the speaker's checkbox in the listing filter (1-based,
    /// slot 5 is not a speaker).
    pub fn filter_index(&self) -> usize {
        match self {
            Speaker::Powell => 1,
            Speaker::Jefferson => 2,
            Speaker::Barr => 3,
            Speaker::Bowman => 4,
            Speaker::Cook => 6,
            Speaker::Kugler => 7,
            Speaker::Waller => 8,
            Speaker::Former => 9,
            Speaker::Other => 10,
        }
    }

    pub fn is_catch_all(&self) -> bool {
        matches!(self, Speaker::Former | Speaker::Other)
    }
}

impl Default for Speaker {
    fn default() -> Self {
        Speaker::Powell
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for Speaker {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Speaker::ALL
            .into_iter()
            .find(|speaker| speaker.identifier() == wanted)
            .ok_or_else(|| ConfigError::UnknownSpeaker(s.to_string()))
    }
}

/// Browser families the CDP session can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BrowserEngine {
    Chrome,
    Chromium,
}

impl BrowserEngine {
    pub fn name(&self) -> &'static str {
        match self {
            BrowserEngine::Chrome => "chrome",
            BrowserEngine::Chromium => "chromium",
        }
    }

    /// Executable names looked up on `PATH`, most specific first.
    pub fn executable_candidates(&self) -> &'static [&'static str] {
        match self {
            BrowserEngine::Chrome => &["google-chrome-stable", "google-chrome", "chrome"],
            BrowserEngine::Chromium => &["chromium", "chromium-browser"],
        }
    }
}

impl Default for BrowserEngine {
    fn default() -> Self {
        BrowserEngine::Chrome
    }
}

impl fmt::Display for BrowserEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BrowserEngine {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chrome" | "google-chrome" => Ok(BrowserEngine::Chrome),
            "chromium" => Ok(BrowserEngine::Chromium),
            _ => Err(ConfigError::UnsupportedBrowser(s.to_string())),
        }
    }
}

/// URL of a single speech's detail page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeechLink(String);

impl SpeechLink {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpeechLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SpeechLink {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Labeled regions read from a speech page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Date,
    Title,
    Speaker,
    Location,
    Content,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Title => "title",
            Field::Speaker => "speaker",
            Field::Location => "location",
            Field::Content => "content",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDocument {
    pub date: NaiveDate,
    /// The date exactly as printed on the page.
    pub date_text: String,
    pub title: String,
    pub speaker: String,
    pub location: String,
    pub body: String,
}

impl ArticleDocument {
    pub fn new(
        date_text: impl Into<String>,
        title: impl Into<String>,
        speaker: impl Into<String>,
        location: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self> {
        let date_text = date_text.into();
        let date = parse_speech_date(&date_text)?;
        Ok(Self {
            date,
            date_text,
            title: title.into(),
            speaker: speaker.into(),
            location: location.into(),
            body: body.into(),
        })
    }

    /// Text written to the speech's output file.
    pub fn render(&self) -> String {
        format!(
            "Date: {}\n\nTitle: {}\n\nSpeaker: {}\n\nLocation: {}\n\n{}",
            self.date_text, self.title, self.speaker, self.location, self.body
        )
    }
}

pub fn parse_speech_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), SPEECH_DATE_FORMAT).map_err(|source| Error::InvalidDate {
        value: value.to_string(),
        source,
    })
}
