use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Unknown range operator: {0}")]
    UnknownOperator(String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Invalid atom: {0}")]
    InvalidAtom(String),

    #[error("Affected package {package} lists no vulnerable versions")]
    MissingVulnerableAtoms { package: String },

    #[error("Atom {atom} does not belong to package {package}")]
    PackageMismatch { package: String, atom: String },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Catalog lists {package}-{existing} and {package}-{duplicate} in slot {slot}")]
    DuplicateVersion {
        package: String,
        slot: String,
        existing: String,
        duplicate: String,
    },
}
