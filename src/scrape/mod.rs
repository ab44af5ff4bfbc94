pub mod rules;

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::episode::{EpisodeRecord, parse_published};
use crate::error::ExtractionError;
use rules::{Field, FieldRule, MARKER_FIELD, ROW_SELECTOR, Source, rule_for};

fn compile(selector: &'static str) -> Result<Selector, ExtractionError> {
    Selector::parse(selector).map_err(|e| ExtractionError::Selector {
        selector,
        message: e.to_string(),
    })
}

/// The rule table with its selectors parsed once.
pub struct ExtractionRules {
    row: Selector,
    fields: Vec<Selector>,
}

impl ExtractionRules {
    pub fn compile() -> Result<Self, ExtractionError> {
        let row = compile(ROW_SELECTOR)?;
        let fields = Field::ALL
            .iter()
            .map(|field| compile(rule_for(*field).selector))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { row, fields })
    }

    fn selector(&self, field: Field) -> &Selector {
        &self.fields[field as usize]
    }

    fn is_episode_row(&self, row: &ElementRef<'_>) -> bool {
        row.select(self.selector(MARKER_FIELD)).next().is_some()
    }

    fn value(&self, row: &ElementRef<'_>, field: Field) -> Result<String, ExtractionError> {
        let FieldRule {
            selector, source, ..
        } = *rule_for(field);
        let element = row
            .select(self.selector(field))
            .next()
            .ok_or(ExtractionError::MissingElement { field, selector })?;
        let value = match source {
            Source::Text => element.text().collect::<String>(),
            Source::Attr(attr) => element
                .value()
                .attr(attr)
                .ok_or(ExtractionError::MissingAttribute {
                    field,
                    selector,
                    attr,
                })?
                .to_string(),
        };
        debug!(%field, value = %value.trim(), "extracted");
        Ok(value)
    }

    /// Build a record from one episode row. Any missing piece fails the
    /// whole record.
    pub fn extract(&self, row: ElementRef<'_>) -> Result<EpisodeRecord, ExtractionError> {
        let id = self.value(&row, Field::Id)?;
        let title = self.value(&row, Field::Title)?;
        let description = self.value(&row, Field::Description)?;
        let published_at: DateTime<Utc> = parse_published(&self.value(&row, Field::Published)?)?;
        let enclosure_url = self.value(&row, Field::Enclosure)?;

        EpisodeRecord::new(&id, &title, &description, &enclosure_url, published_at)
    }
}

/// A parsed listing page.
pub struct Listing {
    document: Html,
}

impl Listing {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Episode rows in document order.
    pub fn entries<'a>(
        &'a self,
        rules: &'a ExtractionRules,
    ) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.document
            .select(&rules.row)
            .filter(move |row| rules.is_episode_row(row))
    }

    pub fn episodes<'a>(
        &'a self,
        rules: &'a ExtractionRules,
    ) -> impl Iterator<Item = Result<EpisodeRecord, ExtractionError>> + 'a {
        self.entries(rules).map(move |row| rules.extract(row))
    }
}
