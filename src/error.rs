use std::path::PathBuf;

use thiserror::Error;

use crate::scrape::rules::Field;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered {report}")]
    Status { url: String, report: String },
}

impl FetchError {
    /// Status code and reason phrase, or the transport error text.
    pub fn report(&self) -> String {
        match self {
            FetchError::Request { source, .. } => source.to_string(),
            FetchError::Status { report, .. } => report.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("invalid selector `{selector}`: {message}")]
    Selector {
        selector: &'static str,
        message: String,
    },
    #[error("no element matching `{selector}` for {field}")]
    MissingElement {
        field: Field,
        selector: &'static str,
    },
    #[error("element `{selector}` has no `{attr}` attribute for {field}")]
    MissingAttribute {
        field: Field,
        selector: &'static str,
        attr: &'static str,
    },
    #[error("{field} is empty")]
    Empty { field: Field },
    #[error("invalid publication date {0:?}, expected MM.DD.YYYY")]
    InvalidDate(String),
    #[error("enclosure url {url:?} is not absolute: {source}")]
    InvalidEnclosure {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to render feed: {0}")]
    Xml(#[from] rss::Error),
    #[error("failed to write feed to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Write(#[from] WriteError),
}
