use url::Url;

/// Decides whether a URL belongs to the crawl neighborhood
///
/// A URL is in scope when its `host + path` contains any of the configured
/// allow-substrings. The filter is applied to discovered links after
/// normalization and never to the normalization itself.
#[derive(Debug, Clone)]
pub struct ScopeFilter {
    allow: Vec<String>,
}

impl ScopeFilter {
    pub fn new(allow: Vec<String>) -> Self {
        Self { allow }
    }

    /// Returns true if the URL's host+path contains any allow-substring
    pub fn matches(&self, url: &Url) -> bool {
        let host_and_path = format!("{}{}", url.host_str().unwrap_or(""), url.path());
        self.allow
            .iter()
            .any(|needle| host_and_path.contains(needle.as_str()))
    }
}
