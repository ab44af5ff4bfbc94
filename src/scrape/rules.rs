//! Where each episode field lives in the listing markup.
//!
//! Markup changes on the listing site should only need edits here.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Title,
    Description,
    Published,
    Enclosure,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Id,
        Field::Title,
        Field::Description,
        Field::Published,
        Field::Enclosure,
    ];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Id => "id",
            Field::Title => "title",
            Field::Description => "description",
            Field::Published => "publication date",
            Field::Enclosure => "enclosure url",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Concatenated text of the element and its descendants.
    Text,
    Attr(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: Field,
    pub selector: &'static str,
    pub source: Source,
}

/// Every episode row is a table row.
pub const ROW_SELECTOR: &str = "tr";

/// Field that marks a row as an episode; rows without it are skipped.
pub const MARKER_FIELD: Field = Field::Published;

/// One rule per field, in `Field::ALL` order.
pub const EPISODE_RULES: [FieldRule; 5] = [
    FieldRule {
        field: Field::Id,
        selector: "a.ep-item",
        source: Source::Attr("href"),
    },
    FieldRule {
        field: Field::Title,
        selector: "h3.ep-row-title",
        source: Source::Text,
    },
    FieldRule {
        field: Field::Description,
        selector: "p.ep-row-desc",
        source: Source::Text,
    },
    FieldRule {
        field: Field::Published,
        selector: "span.ep-published",
        source: Source::Text,
    },
    FieldRule {
        field: Field::Enclosure,
        selector: "a.play-btn",
        source: Source::Attr("data-mp3"),
    },
];

pub fn rule_for(field: Field) -> &'static FieldRule {
    &EPISODE_RULES[field as usize]
}
