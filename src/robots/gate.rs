//! Per-host robots.txt gate
//!
//! One gate is constructed per crawl run and shared by all workers. Rules are
//! fetched at most once per origin and cached for the lifetime of the gate.

use crate::robots::ParsedRobots;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use url::Url;

/// Robots verdict for one URL
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Access {
    /// Whether the agent may fetch the URL
    pub allowed: bool,

    /// Crawl-delay directive in seconds, if the host declares one
    pub crawl_delay: Option<f64>,
}

/// Fetches, caches, and evaluates robots.txt per origin
pub struct RobotsGate {
    client: Client,
    agent: String,
    cache: Mutex<HashMap<String, Arc<ParsedRobots>>>,
}

impl RobotsGate {
    /// Creates a gate using the shared HTTP client and the agent product
    /// token that robots.txt rules are matched against
    pub fn new(client: Client, agent: impl Into<String>) -> Self {
        Self {
            client,
            agent: agent.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Answers allow/deny and the crawl delay for one URL
    pub async fn check_access(&self, url: &Url) -> Access {
        let rules = self.rules_for(url).await;

        Access {
            allowed: rules.is_allowed(url.as_str(), &self.agent),
            crawl_delay: rules.crawl_delay(&self.agent),
        }
    }

    /// Returns the cached rules for the URL's origin, fetching on first use
    async fn rules_for(&self, url: &Url) -> Arc<ParsedRobots> {
        let origin = origin_key(url);

        if let Some(rules) = self.cache.lock().unwrap().get(&origin) {
            return Arc::clone(rules);
        }

        // The lock is not held across the fetch; if two workers race, the
        // first insert wins and the loser's copy is dropped
        let fetched = Arc::new(self.fetch_rules(&origin).await);
        Arc::clone(
            self.cache
                .lock()
                .unwrap()
                .entry(origin)
                .or_insert(fetched),
        )
    }

    /// Fetches robots.txt for an origin; any failure yields allow-all
    async fn fetch_rules(&self, origin: &str) -> ParsedRobots {
        let robots_url = format!("{}/robots.txt", origin);

        match self.client.get(&robots_url).send().await {
            Ok(response) if response.status().is_success() => match response.text().await {
                Ok(body) => {
                    tracing::debug!("Fetched robots.txt from {}", robots_url);
                    ParsedRobots::from_content(&body)
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to read robots.txt body from {}: {}; failing open",
                        robots_url,
                        e
                    );
                    ParsedRobots::allow_all()
                }
            },
            Ok(response) => {
                tracing::warn!(
                    "robots.txt at {} returned HTTP {}; failing open",
                    robots_url,
                    response.status()
                );
                ParsedRobots::allow_all()
            }
            Err(e) => {
                tracing::warn!(
                    "Could not fetch robots.txt at {}: {}; failing open",
                    robots_url,
                    e
                );
                ParsedRobots::allow_all()
            }
        }
    }
}

/// Builds the cache key `scheme://host[:port]` for a URL
fn origin_key(url: &Url) -> String {
    match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), url.host_str().unwrap_or(""), port),
        None => format!("{}://{}", url.scheme(), url.host_str().unwrap_or("")),
    }
}
