//! Query-time search
//!
//! Turns a free-text query into a ranked page list using TF-IDF over the
//! postings in the index store.

mod engine;

pub use engine::{search, SearchHit};
