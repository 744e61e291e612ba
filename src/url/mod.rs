//! URL canonicalization and crawl-scope filtering
//!
//! Equivalent URLs must map to one canonical string because that string is
//! the frontier's deduplication key and the `pages.url` unique column.

mod normalize;
mod scope;

pub use normalize::normalize_url;
pub use scope::ScopeFilter;
