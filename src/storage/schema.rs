//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Driftnet index.

/// SQL schema for the index database
pub const SCHEMA_SQL: &str = r#"
-- One row per canonical URL; re-crawls update in place
CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    title TEXT,
    description TEXT,
    content TEXT NOT NULL,
    last_crawled TEXT NOT NULL
);

-- Lazily created vocabulary; words are never deleted
CREATE TABLE IF NOT EXISTS keywords (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    word TEXT NOT NULL UNIQUE
);

-- Inverted index: occurrence count of a keyword on a page
CREATE TABLE IF NOT EXISTS postings (
    keyword_id INTEGER NOT NULL REFERENCES keywords(id),
    page_id INTEGER NOT NULL REFERENCES pages(id),
    frequency INTEGER NOT NULL CHECK (frequency > 0),
    UNIQUE(keyword_id, page_id)
);

CREATE INDEX IF NOT EXISTS idx_postings_page ON postings(page_id);
CREATE INDEX IF NOT EXISTS idx_postings_keyword ON postings(keyword_id);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
