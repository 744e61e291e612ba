//! Crawl orchestration
//!
//! Owns the worker pool that drains the frontier. Each worker runs the
//! per-URL pipeline: robots gate -> fetch -> extract -> index -> enqueue
//! discovered links -> politeness sleep. No failure on one URL terminates a
//! worker; workers exit only when the frontier is drained.

mod extractor;
mod fetcher;
mod frontier;
mod keywords;

pub use extractor::{extract_page, ExtractedPage};
pub use fetcher::{build_http_client, fetch_page, FetchOutcome};
pub use frontier::{Dequeued, Frontier};
pub use keywords::{extract_keywords, tokenize};

use crate::config::Config;
use crate::robots::RobotsGate;
use crate::storage::{IndexStore, SqliteStore};
use crate::url::{normalize_url, ScopeFilter};
use crate::DriftError;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use url::Url;

/// How long an idle worker waits before re-polling an empty frontier
const QUEUE_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Counters reported after a crawl run
#[derive(Debug, Clone, Copy)]
pub struct CrawlReport {
    /// URLs dequeued and processed (including skips and failures)
    pub pages_visited: u64,

    /// Pages successfully written to the index
    pub pages_indexed: u64,
}

/// Everything a worker needs, constructed once per crawl run
struct CrawlContext {
    config: Arc<Config>,
    client: reqwest::Client,
    robots: RobotsGate,
    frontier: Frontier,
    scope: ScopeFilter,
    store: Mutex<SqliteStore>,
    visited: AtomicU64,
    indexed: AtomicU64,
}

/// Runs a complete crawl: seeds the frontier, spawns the worker pool, and
/// joins it when the frontier drains
pub async fn crawl(config: Config) -> Result<CrawlReport, DriftError> {
    let store = SqliteStore::new(Path::new(&config.storage.database_path))?;
    let client = build_http_client(&config.user_agent)?;
    let robots = RobotsGate::new(client.clone(), config.user_agent.crawler_name.clone());
    let frontier = Frontier::new(config.crawler.max_pages as usize);
    let scope = ScopeFilter::new(config.scope.allow.clone());

    for seed in &config.seeds {
        let normalized = normalize_url(seed, None)?;
        if frontier.admit(&normalized) {
            tracing::debug!("Seeded frontier with {}", normalized);
        }
    }

    let workers = config.crawler.workers as usize;
    tracing::info!(
        "Starting crawl: {} workers, budget of {} pages",
        workers,
        config.crawler.max_pages
    );
    let start_time = Instant::now();

    let ctx = Arc::new(CrawlContext {
        config: Arc::new(config),
        client,
        robots,
        frontier,
        scope,
        store: Mutex::new(store),
        visited: AtomicU64::new(0),
        indexed: AtomicU64::new(0),
    });

    let handles: Vec<_> = (0..workers)
        .map(|worker_id| {
            let ctx = Arc::clone(&ctx);
            tokio::spawn(worker_loop(ctx, worker_id))
        })
        .collect();

    for handle in handles {
        // A JoinError here means a worker panicked; the crawl result is
        // still whatever the other workers managed to index
        if let Err(e) = handle.await {
            tracing::error!("Worker task failed: {}", e);
        }
    }

    let report = CrawlReport {
        pages_visited: ctx.visited.load(Ordering::Relaxed),
        pages_indexed: ctx.indexed.load(Ordering::Relaxed),
    };

    tracing::info!(
        "Crawl completed: {} pages visited, {} indexed in {:?}",
        report.pages_visited,
        report.pages_indexed,
        start_time.elapsed()
    );

    Ok(report)
}

/// One worker: poll the frontier until it drains
async fn worker_loop(ctx: Arc<CrawlContext>, worker_id: usize) {
    loop {
        match ctx.frontier.next() {
            Dequeued::Drained => {
                tracing::debug!("Worker {} exiting: frontier drained", worker_id);
                break;
            }
            Dequeued::Empty => {
                tokio::time::sleep(QUEUE_POLL_INTERVAL).await;
            }
            Dequeued::Url(url) => {
                let delay = process_url(&ctx, &url).await;
                ctx.frontier.mark_done();
                // Per-worker politeness throttle before the next item
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Processes one URL through the full pipeline
///
/// Returns the politeness delay the worker must sleep before its next item:
/// the configured floor, or the robots.txt Crawl-delay when that is larger.
async fn process_url(ctx: &CrawlContext, url: &Url) -> Duration {
    tracing::info!("Crawling {}", url);
    ctx.visited.fetch_add(1, Ordering::Relaxed);

    let floor = Duration::from_millis(ctx.config.crawler.politeness_floor_ms);

    let access = ctx.robots.check_access(url).await;
    let delay = access
        .crawl_delay
        .map(|seconds| Duration::from_secs_f64(seconds).max(floor))
        .unwrap_or(floor);

    if !access.allowed {
        tracing::info!("Blocked by robots.txt: {}", url);
        return delay;
    }

    let body = match fetch_page(&ctx.client, url).await {
        FetchOutcome::Html { body } => body,
        FetchOutcome::NotHtml { content_type } => {
            tracing::info!("Skipping non-HTML content at {} ({})", url, content_type);
            return delay;
        }
        FetchOutcome::HttpStatus { status } => {
            tracing::warn!("HTTP {} fetching {}", status, url);
            return delay;
        }
        FetchOutcome::Failed { error } => {
            tracing::warn!("Error fetching {}: {}", url, error);
            return delay;
        }
    };

    let page = extract_page(&body, url, &ctx.scope);
    let frequencies = extract_keywords(&page.text);

    let index_result = {
        let mut store = ctx.store.lock().unwrap();
        store.index_page(
            url.as_str(),
            page.title.as_deref(),
            page.description.as_deref(),
            &page.text,
            &frequencies,
        )
    };

    match index_result {
        Ok(_) => {
            ctx.indexed.fetch_add(1, Ordering::Relaxed);
            tracing::info!("Indexed {}", url);
        }
        Err(e) => {
            // Abandon this page's index write; its links still feed the
            // frontier, crawl breadth wins over one page's completeness
            tracing::error!("Error indexing {}: {}", url, e);
        }
    }

    for link in &page.links {
        if ctx.frontier.admit(link) {
            tracing::debug!("Queued {}", link);
        }
    }

    delay
}
