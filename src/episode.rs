use chrono::{DateTime, NaiveDate, Utc};
use url::Url;

use crate::error::ExtractionError;
use crate::scrape::rules::Field;

/// One episode as scraped from the listing page.
///
/// Built only through [`EpisodeRecord::new`], which checks every field, so a
/// value of this type is always complete.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeRecord {
    id: String,
    title: String,
    description: String,
    enclosure_url: String,
    published_at: DateTime<Utc>,
}

impl EpisodeRecord {
    pub fn new(
        id: &str,
        title: &str,
        description: &str,
        enclosure_url: &str,
        published_at: DateTime<Utc>,
    ) -> Result<Self, ExtractionError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ExtractionError::Empty { field: Field::Id });
        }
        let title = title.trim();
        if title.is_empty() {
            return Err(ExtractionError::Empty { field: Field::Title });
        }
        let enclosure_url = enclosure_url.trim();
        Url::parse(enclosure_url).map_err(|source| ExtractionError::InvalidEnclosure {
            url: enclosure_url.to_string(),
            source,
        })?;

        Ok(Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.trim().to_string(),
            enclosure_url: enclosure_url.to_string(),
            published_at,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn enclosure_url(&self) -> &str {
        &self.enclosure_url
    }

    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }
}

/// Parse a listing date such as `03.15.2024` into midnight UTC.
///
/// Only the zero-padded `MM.DD.YYYY` shape is accepted.
pub fn parse_published(raw: &str) -> Result<DateTime<Utc>, ExtractionError> {
    let text = raw.trim();
    let invalid = || ExtractionError::InvalidDate(text.to_string());

    let bytes = text.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'.',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(invalid());
    }

    let date = NaiveDate::parse_from_str(text, "%m.%d.%Y").map_err(|_| invalid())?;
    date.and_hms_opt(0, 0, 0)
        .map(|d| d.and_utc())
        .ok_or_else(invalid)
}
