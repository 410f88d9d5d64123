use std::path::PathBuf;

use thiserror::Error;

/// Errors that can abort a run. Every stage maps its failure to one of these.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failure while fetching {url}: {source}")]
    Fetch {
        url: String,
        source: ureq::Error,
    },

    #[error("invalid feed XML: {0}")]
    Xml(String),

    #[error("could not find <{what}> containing rateName={rate_name}")]
    NotFound {
        what: &'static str,
        rate_name: String,
    },

    #[error("{0} not found in matched item")]
    MissingField(&'static str),

    #[error("invalid date '{text}': {source}")]
    Date { text: String, source: jiff::Error },

    #[error("invalid value '{text}': {reason}")]
    Value { text: String, reason: String },

    #[error("{operation} '{}': {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize record: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<quick_xml::Error> for Error {
    fn from(e: quick_xml::Error) -> Self {
        Error::Xml(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
