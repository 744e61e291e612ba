//! TF-IDF ranking engine

use crate::crawler::tokenize;
use crate::storage::{IndexStore, StorageResult};
use std::cmp::Ordering;
use std::collections::HashMap;

/// One ranked search result
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub page_id: i64,
    pub url: String,
    /// Page title, falling back to the URL when the page had none
    pub title: String,
    /// Meta description, empty when the page had none
    pub description: String,
    pub score: f64,
}

/// Ranks pages for a free-text query, best first, at most `limit` results
///
/// Query text is tokenized like page text but without stopword removal (a
/// stopword has no postings, so it contributes nothing either way). For each
/// term every posting contributes `tf * ln(total_pages / df)` to its page;
/// pages matching several terms accumulate across them (union semantics).
/// Ties are broken by ascending page id so the ordering is deterministic.
pub fn search<S: IndexStore + ?Sized>(
    store: &S,
    query: &str,
    limit: usize,
) -> StorageResult<Vec<SearchHit>> {
    let terms = tokenize(query);
    if terms.is_empty() {
        return Ok(Vec::new());
    }

    let total_pages = store.count_pages()? as f64;

    let mut hits: HashMap<i64, SearchHit> = HashMap::new();

    for term in &terms {
        for posting in store.postings_for_word(term)? {
            // A term with no postings yields no rows, so df >= 1 whenever
            // this runs; the max(1) keeps the division total
            let document_frequency = posting.document_frequency.max(1) as f64;
            let idf = (total_pages / document_frequency).ln();
            let score = posting.term_frequency as f64 * idf;

            hits.entry(posting.page_id)
                .and_modify(|hit| hit.score += score)
                .or_insert_with(|| SearchHit {
                    page_id: posting.page_id,
                    title: posting
                        .title
                        .clone()
                        .unwrap_or_else(|| posting.url.clone()),
                    description: posting.description.clone().unwrap_or_default(),
                    url: posting.url,
                    score,
                });
        }
    }

    let mut results: Vec<SearchHit> = hits.into_values().collect();
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(a.page_id.cmp(&b.page_id))
    });
    results.truncate(limit);

    Ok(results)
}
