//! Storage trait and error types

use crate::storage::{IndexStats, PageRecord, Posting};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Contract between the crawler/search engine and the index storage
///
/// Implementations must guarantee that `replace_postings` and `index_page`
/// are transactional per page: a reader never observes a page with a partial
/// posting set.
pub trait IndexStore {
    /// Inserts a page, or updates it in place by unique URL
    ///
    /// Updates refresh `last_crawled`; the page id is stable across
    /// re-crawls. Returns the page id.
    fn upsert_page(
        &mut self,
        url: &str,
        title: Option<&str>,
        description: Option<&str>,
        content: &str,
    ) -> StorageResult<i64>;

    /// Replaces all postings for a page with the given word frequencies
    ///
    /// Missing keywords are created first, then every existing posting for
    /// the page is deleted and the new set inserted, all in one transaction.
    /// An empty map leaves the page with no postings.
    fn replace_postings(
        &mut self,
        page_id: i64,
        frequencies: &HashMap<String, u32>,
    ) -> StorageResult<()>;

    /// Upserts a page and replaces its postings in a single transaction
    ///
    /// This is the per-page write the crawler uses: either both the page row
    /// and its postings reflect the new crawl, or neither does.
    fn index_page(
        &mut self,
        url: &str,
        title: Option<&str>,
        description: Option<&str>,
        content: &str,
        frequencies: &HashMap<String, u32>,
    ) -> StorageResult<i64>;

    /// Total number of indexed pages
    fn count_pages(&self) -> StorageResult<u64>;

    /// All postings for a word, joined with their pages, ordered by page id
    fn postings_for_word(&self, word: &str) -> StorageResult<Vec<Posting>>;

    /// Reads a page back by its canonical URL
    fn get_page_by_url(&self, url: &str) -> StorageResult<Option<PageRecord>>;

    /// Aggregate counters for reporting
    fn stats(&self) -> StorageResult<IndexStats>;
}
