//! Keyword extraction
//!
//! Tokenizes extracted page text into a word -> frequency mapping for the
//! inverted index. Intentionally simple lexical indexing: no stemming, no
//! lemmatization.

use std::collections::HashMap;

/// Words too common to be worth indexing
const STOPWORDS: &[&str] = &[
    "the", "and", "is", "in", "to", "of", "a", "for", "with", "on", "at", "from", "by",
];

/// Minimum token length; shorter words carry too little signal
const MIN_WORD_LEN: usize = 3;

/// Splits text into lowercase alphabetic tokens of length >= 3
///
/// Tokens are maximal alphanumeric runs that consist entirely of ASCII
/// letters, so `abc123` produces no token: the letters are not word-bounded.
/// Queries and page text go through this same function.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut run = String::new();
    let mut alphabetic = true;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            alphabetic &= c.is_ascii_alphabetic();
            run.push(c);
        } else {
            if alphabetic && run.len() >= MIN_WORD_LEN {
                tokens.push(run.to_lowercase());
            }
            run.clear();
            alphabetic = true;
        }
    }
    if alphabetic && run.len() >= MIN_WORD_LEN {
        tokens.push(run.to_lowercase());
    }

    tokens
}

/// Counts word occurrences in text, with stopwords removed
pub fn extract_keywords(text: &str) -> HashMap<String, u32> {
    let mut frequencies: HashMap<String, u32> = HashMap::new();

    for word in tokenize(text) {
        *frequencies.entry(word).or_insert(0) += 1;
    }

    for stopword in STOPWORDS {
        frequencies.remove(*stopword);
    }

    frequencies
}
