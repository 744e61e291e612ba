//! Configuration loading and validation
//!
//! Crawl runs are configured from a TOML file: seed URLs, crawl scope,
//! worker count and page budget, user-agent identification, and the index
//! database path.

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{Config, CrawlerConfig, ScopeConfig, StorageConfig, UserAgentConfig};
pub use validation::validate;
