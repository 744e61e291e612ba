//! Crawl frontier
//!
//! A shared BFS queue with admission control. Each URL moves unseen ->
//! queued -> visited exactly once; the admitted set is capped by the
//! max-pages budget. One mutex guards the whole state and is only ever held
//! for the check-and-insert, never across I/O.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use url::Url;

/// Result of polling the frontier for work
#[derive(Debug)]
pub enum Dequeued {
    /// A URL to process; the caller must call `mark_done` when finished
    Url(Url),

    /// Queue is empty but other workers are mid-flight and may still
    /// discover links; poll again
    Empty,

    /// Queue is empty and nothing is mid-flight; the crawl is over
    Drained,
}

struct FrontierState {
    queue: VecDeque<Url>,
    admitted: HashSet<String>,
    in_flight: usize,
}

/// Shared frontier queue with at-most-once admission and a page budget
pub struct Frontier {
    state: Mutex<FrontierState>,
    max_pages: usize,
}

impl Frontier {
    pub fn new(max_pages: usize) -> Self {
        Self {
            state: Mutex::new(FrontierState {
                queue: VecDeque::new(),
                admitted: HashSet::new(),
                in_flight: 0,
            }),
            max_pages,
        }
    }

    /// Admits a normalized URL for visitation
    ///
    /// The duplicate check, budget check, and insert happen under one lock
    /// acquisition, so concurrent submissions of the same URL admit exactly
    /// one copy and the budget is a hard ceiling. Returns true if the URL
    /// was enqueued.
    pub fn admit(&self, url: &Url) -> bool {
        let mut state = self.state.lock().unwrap();

        if state.admitted.len() >= self.max_pages {
            return false;
        }
        if !state.admitted.insert(url.as_str().to_string()) {
            return false;
        }

        state.queue.push_back(url.clone());
        true
    }

    /// Takes the next URL, or reports the queue's drain status
    pub fn next(&self) -> Dequeued {
        let mut state = self.state.lock().unwrap();

        match state.queue.pop_front() {
            Some(url) => {
                state.in_flight += 1;
                Dequeued::Url(url)
            }
            None if state.in_flight > 0 => Dequeued::Empty,
            None => Dequeued::Drained,
        }
    }

    /// Marks a previously dequeued URL as fully processed
    pub fn mark_done(&self) {
        let mut state = self.state.lock().unwrap();
        debug_assert!(state.in_flight > 0);
        state.in_flight -= 1;
    }

    /// Number of URLs ever admitted (queued or visited)
    pub fn admitted_count(&self) -> usize {
        self.state.lock().unwrap().admitted.len()
    }

    /// Whether a URL has ever been admitted
    pub fn contains(&self, url: &Url) -> bool {
        self.state.lock().unwrap().admitted.contains(url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_admit_then_next() {
        let frontier = Frontier::new(10);
        assert!(frontier.admit(&url("https://example.com/a")));

        match frontier.next() {
            Dequeued::Url(u) => assert_eq!(u.as_str(), "https://example.com/a"),
            other => panic!("expected a URL, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_admission_rejected() {
        let frontier = Frontier::new(10);
        assert!(frontier.admit(&url("https://example.com/a")));
        assert!(!frontier.admit(&url("https://example.com/a")));
        assert_eq!(frontier.admitted_count(), 1);
    }

    #[test]
    fn test_budget_is_hard_ceiling() {
        let frontier = Frontier::new(2);
        assert!(frontier.admit(&url("https://example.com/a")));
        assert!(frontier.admit(&url("https://example.com/b")));
        assert!(!frontier.admit(&url("https://example.com/c")));
        assert_eq!(frontier.admitted_count(), 2);
    }

    #[test]
    fn test_empty_while_in_flight_then_drained() {
        let frontier = Frontier::new(10);
        frontier.admit(&url("https://example.com/a"));

        let Dequeued::Url(_) = frontier.next() else {
            panic!("expected a URL");
        };

        // The worker holding the URL may still discover links
        assert!(matches!(frontier.next(), Dequeued::Empty));

        frontier.mark_done();
        assert!(matches!(frontier.next(), Dequeued::Drained));
    }

    #[test]
    fn test_drained_when_never_filled() {
        let frontier = Frontier::new(10);
        assert!(matches!(frontier.next(), Dequeued::Drained));
    }

    #[test]
    fn test_fifo_order() {
        let frontier = Frontier::new(10);
        frontier.admit(&url("https://example.com/a"));
        frontier.admit(&url("https://example.com/b"));

        let Dequeued::Url(first) = frontier.next() else {
            panic!("expected a URL");
        };
        let Dequeued::Url(second) = frontier.next() else {
            panic!("expected a URL");
        };
        assert_eq!(first.as_str(), "https://example.com/a");
        assert_eq!(second.as_str(), "https://example.com/b");
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_admission_is_exactly_once() {
        let frontier = Arc::new(Frontier::new(100));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let frontier = Arc::clone(&frontier);
            handles.push(tokio::spawn(async move {
                let mut admitted = 0;
                for n in 0..20 {
                    if frontier.admit(&url(&format!("https://example.com/{}", n))) {
                        admitted += 1;
                    }
                }
                admitted
            }));
        }

        let mut total_admitted = 0;
        for handle in handles {
            total_admitted += handle.await.unwrap();
        }

        // 16 tasks raced over the same 20 URLs; each URL admitted once
        assert_eq!(total_admitted, 20);
        assert_eq!(frontier.admitted_count(), 20);

        let mut dequeued = 0;
        while let Dequeued::Url(_) = frontier.next() {
            dequeued += 1;
        }
        assert_eq!(dequeued, 20);
    }

    #[tokio::test]
    async fn test_concurrent_budget_never_exceeded() {
        let frontier = Arc::new(Frontier::new(25));

        let mut handles = Vec::new();
        for task in 0..8 {
            let frontier = Arc::clone(&frontier);
            handles.push(tokio::spawn(async move {
                for n in 0..50 {
                    frontier.admit(&url(&format!("https://example.com/{}/{}", task, n)));
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(frontier.admitted_count(), 25);
    }
}
