use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use atom_syndication::LinkBuilder;
use rss::extension::atom::AtomExtensionBuilder;
use rss::extension::dublincore::DublinCoreExtensionBuilder;
use rss::{Channel, ChannelBuilder, EnclosureBuilder, GuidBuilder, ImageBuilder, Item, ItemBuilder};

use super::{FeedDocument, FeedEntry};
use crate::error::WriteError;

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
const CONTENT_NS: &str = "http://purl.org/rss/1.0/modules/content/";
const DC_NS: &str = "http://purl.org/dc/elements/1.1/";

fn namespaces() -> BTreeMap<String, String> {
    [("atom", ATOM_NS), ("content", CONTENT_NS), ("dc", DC_NS)]
        .into_iter()
        .map(|(prefix, url)| (prefix.to_string(), url.to_string()))
        .collect()
}

fn entry_to_item(entry: &FeedEntry) -> Item {
    ItemBuilder::default()
        .title(Some(entry.title.clone()))
        .link(Some(entry.link.clone()))
        .guid(Some(
            GuidBuilder::default()
                .value(entry.id.clone())
                .permalink(false)
                .build(),
        ))
        .description(Some(entry.content.clone()))
        .content(Some(entry.content.clone()))
        .enclosure(Some(
            EnclosureBuilder::default()
                .url(entry.enclosure_url.clone())
                .length("0".to_string())
                .mime_type("audio/mpeg".to_string())
                .build(),
        ))
        .pub_date(Some(entry.published.to_rfc2822()))
        .dublin_core_ext(Some(
            DublinCoreExtensionBuilder::default()
                .dates(vec![entry.updated.to_rfc3339()])
                .build(),
        ))
        .build()
}

pub fn to_channel(feed: &FeedDocument) -> Channel {
    let config = &feed.config;
    let self_link = LinkBuilder::default()
        .href(config.link.clone())
        .rel("self".to_string())
        .mime_type(Some("application/rss+xml".to_string()))
        .build();

    ChannelBuilder::default()
        .namespaces(namespaces())
        .title(config.title.clone())
        .link(config.link.clone())
        .description(config.description.clone())
        .language(Some(config.language.clone()))
        .docs(Some(config.docs.clone()))
        .image(Some(
            ImageBuilder::default()
                .url(config.logo.clone())
                .title(config.title.clone())
                .link(config.link.clone())
                .build(),
        ))
        .atom_ext(Some(AtomExtensionBuilder::default().links(vec![self_link]).build()))
        .dublin_core_ext(Some(
            DublinCoreExtensionBuilder::default()
                .identifiers(vec![config.id.clone()])
                .build(),
        ))
        .items(feed.entries().iter().map(entry_to_item).collect::<Vec<_>>())
        .build()
}

/// Render the feed as indented RSS 2.0.
pub fn render(feed: &FeedDocument) -> Result<Vec<u8>, WriteError> {
    let xml = to_channel(feed).pretty_write_to(Vec::new(), b' ', 2)?;
    Ok(xml)
}

/// Replace whatever is at `path` with the rendered feed. Nothing is written
/// unless rendering succeeds.
pub fn write(feed: &FeedDocument, path: &Path) -> Result<(), WriteError> {
    let xml = render(feed)?;
    let io_err = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, xml).map_err(io_err)
}
