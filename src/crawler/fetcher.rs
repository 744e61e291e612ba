//! HTTP fetcher
//!
//! One bounded-timeout GET per URL, filtered to HTML responses. Every failure
//! is an outcome, not an error: the caller logs it and moves on, so no fetch
//! problem can take down a worker.

use crate::config::UserAgentConfig;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Total request timeout; network targets are outside our control, so every
/// fetch is bounded
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of fetching one URL
#[derive(Debug)]
pub enum FetchOutcome {
    /// 2xx response carrying text/html
    Html { body: String },

    /// 2xx response with some other Content-Type; skipped, not an error
    NotHtml { content_type: String },

    /// Non-2xx response
    HttpStatus { status: u16 },

    /// Timeout, connection failure, or body read failure
    Failed { error: String },
}

/// Builds the shared HTTP client with the crawler's user agent
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(FETCH_TIMEOUT)
        .connect_timeout(FETCH_TIMEOUT)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs one GET and classifies the result
pub async fn fetch_page(client: &Client, url: &Url) -> FetchOutcome {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            return FetchOutcome::Failed { error };
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchOutcome::HttpStatus {
            status: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.contains("text/html") {
        return FetchOutcome::NotHtml { content_type };
    }

    match response.text().await {
        Ok(body) => FetchOutcome::Html { body },
        Err(e) => FetchOutcome::Failed {
            error: format!("Failed to read body: {}", e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }

    #[test]
    fn test_build_http_client() {
        let config = create_test_config();
        assert!(build_http_client(&config).is_ok());
    }

    // Fetch behavior against live responses is covered by the wiremock
    // integration tests
}
