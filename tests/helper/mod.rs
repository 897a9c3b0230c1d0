//! Shared fixtures for integration tests

#![allow(dead_code)]

pub mod advisory;
pub mod catalog;

pub use advisory::{advisory_xml, entry, write_advisory};
pub use catalog::{memory_catalog, write_repo_entry, write_vdb_entry};
