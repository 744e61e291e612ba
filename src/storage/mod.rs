//! Index storage
//!
//! Persists pages and the keyword-frequency postings that form the inverted
//! index. The [`IndexStore`] trait is the contract the crawler and search
//! engine are written against; [`SqliteStore`] is the SQLite adapter.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{IndexStore, StorageError, StorageResult};

use crate::DriftError;
use std::path::Path;

/// Opens or creates an index database at the given path
pub fn open_store(path: &Path) -> Result<SqliteStore, DriftError> {
    Ok(SqliteStore::new(path)?)
}

/// A page row in the index
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub id: i64,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: String,
    pub last_crawled: String,
}

/// One inverted-index entry for a query term, joined with its page
///
/// `document_frequency` is the number of pages holding any posting for the
/// term, shared by every posting of that term.
#[derive(Debug, Clone)]
pub struct Posting {
    pub page_id: i64,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub term_frequency: u32,
    pub document_frequency: u64,
}

/// Aggregate index counters for the stats mode
#[derive(Debug, Clone, Copy)]
pub struct IndexStats {
    pub pages: u64,
    pub keywords: u64,
    pub postings: u64,
}
