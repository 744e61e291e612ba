use serde::Deserialize;

/// Main configuration structure for Driftnet
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// URLs the crawl starts from
    pub seeds: Vec<String>,

    pub crawler: CrawlerConfig,

    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,

    pub storage: StorageConfig,

    pub scope: ScopeConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of concurrent crawl workers
    pub workers: u32,

    /// Hard ceiling on URLs ever admitted to the frontier
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Minimum sleep between requests from one worker (milliseconds);
    /// a larger robots.txt Crawl-delay overrides it
    #[serde(rename = "politeness-floor-ms")]
    pub politeness_floor_ms: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler; also the product token matched against
    /// robots.txt rules
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value:
    /// `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Index storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite index database
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// Crawl scope configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScopeConfig {
    /// A discovered URL is in scope when its host+path contains any of
    /// these substrings
    pub allow: Vec<String>,
}
