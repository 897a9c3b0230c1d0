//! Version matching and upgrade resolution
//!
//! This module decides, for one package, whether an installed version falls
//! in a vulnerable range and which available version is the fix.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │    Atom     │────▶│   Matcher   │────▶│  Resolver   │
//! │ (op+version)│     │ (filtering) │     │  (upgrades) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │
//!        ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐
//! │     Pv      │     │   Catalog   │
//! │(version cmp)│     │ (vdb, repo) │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`pv`]: Structured versions and their total order
//! - [`atom`]: Range operators and atoms
//! - [`catalog`]: Package version records and the catalog trait
//! - [`catalogs`]: Concrete catalogs (in-memory, installed, repository)
//! - [`matcher`]: Matching atoms against catalogs
//! - [`resolver`]: Minimal/latest upgrade resolution
//! - [`error`]: Error types for parsing and catalog access

pub mod atom;
pub mod catalog;
pub mod catalogs;
pub mod error;
pub mod matcher;
pub mod pv;
pub mod resolver;
