//! SQLite storage implementation

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{IndexStore, StorageResult};
use crate::storage::{IndexStats, PageRecord, Posting};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

/// SQLite index backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates the index database at the given path
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Inserts or updates a page row; shared by the single-op and combined paths
fn upsert_page_on(
    conn: &Connection,
    url: &str,
    title: Option<&str>,
    description: Option<&str>,
    content: &str,
) -> StorageResult<i64> {
    let now = Utc::now().to_rfc3339();

    let existing: Option<i64> = conn
        .query_row("SELECT id FROM pages WHERE url = ?1", params![url], |row| {
            row.get(0)
        })
        .optional()?;

    if let Some(id) = existing {
        conn.execute(
            "UPDATE pages SET title = ?1, description = ?2, content = ?3, last_crawled = ?4
             WHERE id = ?5",
            params![title, description, content, now, id],
        )?;
        Ok(id)
    } else {
        conn.execute(
            "INSERT INTO pages (url, title, description, content, last_crawled)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![url, title, description, content, now],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

/// Creates missing keywords and replaces the page's posting set
fn replace_postings_on(
    conn: &Connection,
    page_id: i64,
    frequencies: &HashMap<String, u32>,
) -> StorageResult<()> {
    {
        let mut insert_keyword = conn.prepare_cached(
            "INSERT INTO keywords (word) VALUES (?1) ON CONFLICT(word) DO NOTHING",
        )?;
        for word in frequencies.keys() {
            insert_keyword.execute(params![word])?;
        }
    }

    conn.execute("DELETE FROM postings WHERE page_id = ?1", params![page_id])?;

    let mut insert_posting = conn.prepare_cached(
        "INSERT INTO postings (keyword_id, page_id, frequency)
         SELECT id, ?2, ?3 FROM keywords WHERE word = ?1",
    )?;
    for (word, frequency) in frequencies {
        insert_posting.execute(params![word, page_id, frequency])?;
    }

    Ok(())
}

impl IndexStore for SqliteStore {
    fn upsert_page(
        &mut self,
        url: &str,
        title: Option<&str>,
        description: Option<&str>,
        content: &str,
    ) -> StorageResult<i64> {
        let tx = self.conn.transaction()?;
        let id = upsert_page_on(&tx, url, title, description, content)?;
        tx.commit()?;
        Ok(id)
    }

    fn replace_postings(
        &mut self,
        page_id: i64,
        frequencies: &HashMap<String, u32>,
    ) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        replace_postings_on(&tx, page_id, frequencies)?;
        tx.commit()?;
        Ok(())
    }

    fn index_page(
        &mut self,
        url: &str,
        title: Option<&str>,
        description: Option<&str>,
        content: &str,
        frequencies: &HashMap<String, u32>,
    ) -> StorageResult<i64> {
        let tx = self.conn.transaction()?;
        let page_id = upsert_page_on(&tx, url, title, description, content)?;
        replace_postings_on(&tx, page_id, frequencies)?;
        tx.commit()?;
        Ok(page_id)
    }

    fn count_pages(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn postings_for_word(&self, word: &str) -> StorageResult<Vec<Posting>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT p.id, p.url, p.title, p.description, po.frequency,
                    (SELECT COUNT(*) FROM postings WHERE keyword_id = k.id)
             FROM postings po
             JOIN pages p ON p.id = po.page_id
             JOIN keywords k ON k.id = po.keyword_id
             WHERE k.word = ?1
             ORDER BY p.id",
        )?;

        let rows = stmt.query_map(params![word], |row| {
            Ok(Posting {
                page_id: row.get(0)?,
                url: row.get(1)?,
                title: row.get(2)?,
                description: row.get(3)?,
                term_frequency: row.get(4)?,
                document_frequency: row.get::<_, i64>(5)? as u64,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn get_page_by_url(&self, url: &str) -> StorageResult<Option<PageRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, url, title, description, content, last_crawled
             FROM pages WHERE url = ?1",
        )?;

        let page = stmt
            .query_row(params![url], |row| {
                Ok(PageRecord {
                    id: row.get(0)?,
                    url: row.get(1)?,
                    title: row.get(2)?,
                    description: row.get(3)?,
                    content: row.get(4)?,
                    last_crawled: row.get(5)?,
                })
            })
            .optional()?;

        Ok(page)
    }

    fn stats(&self) -> StorageResult<IndexStats> {
        let pages: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        let keywords: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM keywords", [], |row| row.get(0))?;
        let postings: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM postings", [], |row| row.get(0))?;

        Ok(IndexStats {
            pages: pages as u64,
            keywords: keywords as u64,
            postings: postings as u64,
        })
    }
}
