//! Robots.txt handling
//!
//! Fetches, parses, and caches per-host exclusion rules. The gate fails open:
//! an unreachable or unparseable robots.txt means the host is crawlable.

mod gate;
mod parser;

pub use gate::{Access, RobotsGate};
pub use parser::ParsedRobots;
