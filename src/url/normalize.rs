use crate::UrlError;
use url::Url;

/// Query parameters dropped during normalization: tracking and click IDs,
/// session tokens, and pagination/presentation parameters that fan one page
/// out into many URLs with the same content.
const DENYLISTED_PARAMS: &[&str] = &[
    // Tracking / attribution
    "utm_source", "utm_medium", "utm_campaign", "utm_term", "utm_content",
    "gclid", "fbclid", "dclid", "yclid", "msclkid", "twclid", "li_fat_id",
    "_ga", "_gid", "_gl", "ga", "icid", "clid", "clickid", "mc_eid",
    "aff", "aff_id", "affiliate_id", "partner_id", "awc", "zanpid", "pid",
    "ref", "referer", "referrer", "source", "source_url",
    // Sessions / auth
    "sid", "s_id", "sessionid", "jsessionid", "phpsessid", "aspsessionid",
    "csrftoken", "cfid", "cftoken", "token", "auth", "key",
    // Pagination / presentation
    "page", "p", "offset", "start", "limit", "per_page",
    "sort", "order", "orderby", "dir", "direction", "filter", "view",
    "display", "format", "output", "print",
    // Cache busting / experiments
    "cache", "cache_buster", "nocache", "rand", "random", "timestamp", "t",
    "_", "v", "version", "experiment", "variant", "ab_test", "test",
    "preview", "debug",
];

/// Normalizes a URL into its canonical deduplication form
///
/// # Normalization Steps
///
/// 1. Resolve `raw` against `base` when given (relative hrefs), else parse
///    it as an absolute URL; reject if malformed
/// 2. Reject non-HTTP(S) schemes
/// 3. Require a host (the `url` crate lowercases it)
/// 4. Remove the fragment (everything after #)
/// 5. Remove denylisted query parameters
/// 6. Sort remaining query parameters by key and re-encode them
/// 7. Remove the trailing slash from the path (root `/` is kept)
///
/// Two URLs differing only in fragment or denylisted parameters normalize to
/// the same string, and normalization is idempotent.
///
/// # Examples
///
/// ```
/// use driftnet::url::normalize_url;
///
/// let url = normalize_url("https://example.com/docs/?utm_source=x#intro", None).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs");
/// ```
pub fn normalize_url(raw: &str, base: Option<&Url>) -> Result<Url, UrlError> {
    let mut url = match base {
        Some(base) => base.join(raw).map_err(|e| UrlError::Parse(e.to_string()))?,
        None => Url::parse(raw).map_err(|e| UrlError::Parse(e.to_string()))?,
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    if url.query().is_some() {
        let params = filter_and_sort_query_params(&url);

        if params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(params);
        }
    }

    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        url.set_path(&trimmed);
    }

    Ok(url)
}

/// Drops denylisted parameters and sorts the survivors by key
fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_denylisted_param(key))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    params.sort_by(|a, b| a.0.cmp(&b.0));

    params
}

/// Checks if a query parameter key is on the denylist
fn is_denylisted_param(key: &str) -> bool {
    let key = key.to_lowercase();

    if DENYLISTED_PARAMS.contains(&key.as_str()) {
        return true;
    }

    // Any utm_* parameter counts as tracking, listed or not
    key.starts_with("utm_")
}
