pub mod rss;

use chrono::{DateTime, Utc};

use crate::episode::EpisodeRecord;

pub const DEFAULT_PAGE_URL: &str =
    "https://podcast.app/paul-graham-essays-audio-p1755465/?limit=250&offset=0";
pub const DEFAULT_BASE_URL: &str = "https://podcast.app";

/// Feed-level metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    pub id: String,
    pub title: String,
    pub link: String,
    pub logo: String,
    pub language: String,
    pub description: String,
    pub docs: String,
    /// Prefix joined with each episode id to form entry ids.
    pub base_url: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            id: DEFAULT_PAGE_URL.to_string(),
            title: "Paul Graham Essays (Audio)".to_string(),
            link: "https://podcast.app/paul-graham-essays-audio-p1755465/".to_string(),
            logo: "https://podcast-api-images.s3.amazonaws.com/podcast_logo_1755465_300x300.jpg"
                .to_string(),
            language: "en".to_string(),
            description: "PG Podcast".to_string(),
            docs: "http://www.rssboard.org/rss-specification".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub id: String,
    pub title: String,
    /// The enclosure url, used as the alternate link.
    pub link: String,
    pub content: String,
    pub enclosure_url: String,
    pub updated: DateTime<Utc>,
    pub published: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedDocument {
    pub config: FeedConfig,
    entries: Vec<FeedEntry>,
}

impl FeedDocument {
    pub fn new(config: FeedConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
        }
    }

    pub fn append_item(&mut self, record: EpisodeRecord) {
        self.append_item_at(record, Utc::now());
    }

    /// `updated` is the generation time; the episode date goes to `published`.
    pub fn append_item_at(&mut self, record: EpisodeRecord, updated: DateTime<Utc>) {
        let entry = FeedEntry {
            id: format!("{}{}", self.config.base_url, record.id()),
            title: record.title().to_string(),
            link: record.enclosure_url().to_string(),
            content: record.description().to_string(),
            enclosure_url: record.enclosure_url().to_string(),
            updated,
            published: record.published_at(),
        };
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[FeedEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
    }

    fn record(id: &str, title: &str, published: DateTime<Utc>) -> EpisodeRecord {
        EpisodeRecord::new(
            id,
            title,
            &format!("About {title}"),
            &format!("https://cdn.example.com{id}.mp3"),
            published,
        )
        .unwrap()
    }

    #[test]
    fn test_entry_fields() {
        let mut feed = FeedDocument::new(FeedConfig::default());
        let generated = date(2024, 6, 1);
        feed.append_item_at(record("/episode/42", "Do Things", date(2023, 1, 2)), generated);

        let entry = &feed.entries()[0];
        assert_eq!(entry.id, "https://podcast.app/episode/42");
        assert_eq!(entry.title, "Do Things");
        assert_eq!(entry.link, "https://cdn.example.com/episode/42.mp3");
        assert_eq!(entry.enclosure_url, entry.link);
        assert_eq!(entry.content, "About Do Things");
        assert_eq!(entry.updated, generated);
        assert_eq!(entry.published, date(2023, 1, 2));
    }

    #[test]
    fn test_entry_id_differs_from_link() {
        let mut feed = FeedDocument::new(FeedConfig::default());
        feed.append_item(record("/e/1", "One", date(2023, 1, 2)));
        let entry = &feed.entries()[0];
        assert_ne!(entry.id, entry.link);
    }

    #[test]
    fn test_entry_id_uses_configured_base_url() {
        let config = FeedConfig {
            base_url: "http://127.0.0.1:8080".to_string(),
            ..FeedConfig::default()
        };
        let mut feed = FeedDocument::new(config);
        feed.append_item(record("/e/1", "One", date(2023, 1, 2)));
        assert_eq!(feed.entries()[0].id, "http://127.0.0.1:8080/e/1");
    }

    #[test]
    fn test_entries_keep_append_order() {
        let mut feed = FeedDocument::new(FeedConfig::default());
        feed.append_item(record("/e/2", "Second", date(2022, 1, 1)));
        feed.append_item(record("/e/1", "First", date(2024, 1, 1)));
        feed.append_item(record("/e/3", "Third", date(2023, 1, 1)));

        let titles: Vec<&str> = feed.entries().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Second", "First", "Third"]);
    }

    #[test]
    fn test_duplicate_ids_are_kept() {
        let mut feed = FeedDocument::new(FeedConfig::default());
        feed.append_item(record("/e/1", "One", date(2023, 1, 2)));
        feed.append_item(record("/e/1", "One again", date(2023, 1, 3)));
        assert_eq!(feed.entries().len(), 2);
    }

    #[test]
    fn test_updated_is_generation_time() {
        let before = Utc::now();
        let mut feed = FeedDocument::new(FeedConfig::default());
        feed.append_item(record("/e/1", "One", date(2020, 1, 1)));
        let after = Utc::now();

        let updated = feed.entries()[0].updated;
        assert!(updated >= before && updated <= after);
    }
}
