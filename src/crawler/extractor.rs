//! Page extraction
//!
//! Parses fetched HTML into the pieces the index needs: title, meta
//! description, visible prose, and the outbound links that feed the frontier.

use crate::url::{normalize_url, ScopeFilter};
use scraper::{Html, Node, Selector};
use std::collections::HashSet;
use url::Url;

/// Everything extracted from one fetched page
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    /// `<title>` text, if present and non-empty
    pub title: Option<String>,

    /// `meta[name=description]` content attribute
    pub description: Option<String>,

    /// Cleaned visible text, one fragment per line
    pub text: String,

    /// In-scope outbound links, normalized and deduplicated
    pub links: Vec<Url>,
}

/// Parses HTML and extracts metadata, text, and in-scope links
///
/// Links are resolved against `base_url`, normalized, filtered through the
/// scope filter, and collapsed to one entry per canonical URL.
pub fn extract_page(html: &str, base_url: &Url, scope: &ScopeFilter) -> ExtractedPage {
    let document = Html::parse_document(html);

    ExtractedPage {
        title: extract_title(&document),
        description: extract_description(&document),
        text: extract_text(&document),
        links: extract_links(&document, base_url, scope),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts the meta description, if any
fn extract_description(document: &Html) -> Option<String> {
    let selector = Selector::parse(r#"meta[name="description"]"#).ok()?;

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(|s| s.to_string())
        .filter(|s| !s.is_empty())
}

/// Collects visible text, skipping script and style subtrees
///
/// Text nodes are concatenated, then split on line boundaries and double
/// spaces; trimmed non-empty fragments are joined with newlines. This
/// approximates visible prose and deliberately discards formatting.
fn extract_text(document: &Html) -> String {
    let mut raw = String::new();
    let mut stack = vec![document.tree.root()];

    while let Some(node) = stack.pop() {
        match node.value() {
            Node::Element(element) if matches!(element.name(), "script" | "style") => continue,
            Node::Text(text) => raw.push_str(&text.text),
            _ => {}
        }

        let children: Vec<_> = node.children().collect();
        for child in children.into_iter().rev() {
            stack.push(child);
        }
    }

    let mut fragments = Vec::new();
    for line in raw.lines() {
        for chunk in line.split("  ") {
            let chunk = chunk.trim();
            if !chunk.is_empty() {
                fragments.push(chunk);
            }
        }
    }

    fragments.join("\n")
}

/// Extracts in-scope links from every anchor in the document
fn extract_links(document: &Html, base_url: &Url, scope: &ScopeFilter) -> Vec<Url> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href = href.trim();

        // Non-navigational hrefs and same-page anchors
        if href.is_empty()
            || href.starts_with("javascript:")
            || href.starts_with("mailto:")
            || href.starts_with("tel:")
            || href.starts_with("data:")
            || href.starts_with('#')
        {
            continue;
        }

        let Ok(normalized) = normalize_url(href, Some(base_url)) else {
            continue;
        };

        if !scope.matches(&normalized) {
            continue;
        }

        if seen.insert(normalized.as_str().to_string()) {
            links.push(normalized);
        }
    }

    links
}
