//! Security advisories
//!
//! Loads advisory documents, checks them against the host and renders them.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Repository  │────▶│     Xml     │────▶│  Advisory   │
//! │ (glsa dir)   │     │  (parsing)  │     │   (types)   │
//! └──────────────┘     └─────────────┘     └─────────────┘
//!                                                 │
//!                             ┌───────────────────┤
//!                             ▼                   ▼
//!                      ┌─────────────┐     ┌─────────────┐
//!                      │  Evaluator  │     │   Render    │
//!                      │ (catalogs)  │     │   (text)    │
//!                      └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`]: Advisory, affected-package entries, IDs and arch filters
//! - [`xml`]: Parsing advisory documents
//! - [`repository`]: Locating advisory files by ID
//! - [`evaluator`]: Vulnerability checks and merge lists against catalogs
//! - [`render`]: Text output
//! - [`error`]: Error types

pub mod error;
pub mod evaluator;
pub mod render;
pub mod repository;
pub mod types;
pub mod xml;

pub use error::AdvisoryError;
pub use evaluator::Evaluator;
pub use repository::AdvisoryRepository;
pub use types::{Advisory, AdvisoryId, AffectedPackageEntry, ArchFilter};
