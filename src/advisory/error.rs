use std::path::PathBuf;

use thiserror::Error;

use crate::version::error::FormatError;

#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("{0} isn't a valid advisory ID or filename")]
    InvalidId(String),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed advisory XML: {0}")]
    Xml(String),

    #[error("Wrong DOCTYPE: {}", .0.as_deref().unwrap_or("none"))]
    WrongDoctype(Option<String>),

    #[error("Advisory is missing the <{0}> element")]
    MissingElement(&'static str),

    #[error("Filename and internal ID don't match: {found} != {expected}")]
    IdMismatch { expected: String, found: String },

    #[error(transparent)]
    Format(#[from] FormatError),
}
