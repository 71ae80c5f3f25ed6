//! Core domain types shared across the Folio crates.
//!
//! This crate defines:
//! - Configuration for the server, the backing store and the admin client
//! - Document names, their store paths and default commit messages
//! - Typed page schemas for the catalogued documents

pub mod config;
pub mod document;
pub mod error;
pub mod page;

pub use document::{CATALOG, CatalogEntry, DocumentName, WriteAction};
pub use error::{Error, Result};
pub use page::PageDocument;

/// Repository directory holding the content documents.
pub const DEFAULT_CONTENT_ROOT: &str = "src/assets/data";

/// File extension of every content document.
pub const DOCUMENT_EXTENSION: &str = "json";
