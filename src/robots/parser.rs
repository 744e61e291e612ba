//! Robots.txt rule evaluation
//!
//! Allow/deny decisions go through the robotstxt crate; the Crawl-delay
//! directive is not exposed by that crate, so it is parsed here with a line
//! scan over User-agent groups.

use robotstxt::DefaultMatcher;

/// Parsed robots.txt rules for one host
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content (empty means allow all)
    content: String,
}

impl ParsedRobots {
    /// Wraps raw robots.txt content for rule evaluation
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// A permissive rule set used when robots.txt cannot be fetched
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
        }
    }

    /// Checks if a URL is allowed for the given agent product token
    pub fn is_allowed(&self, url: &str, agent: &str) -> bool {
        if self.content.is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, agent, url)
    }

    /// Gets the Crawl-delay in seconds for the given agent product token
    ///
    /// A delay in a group naming the agent wins over one in a wildcard group.
    pub fn crawl_delay(&self, agent: &str) -> Option<f64> {
        let agent = agent.to_lowercase();

        let mut group_agents: Vec<String> = Vec::new();
        let mut in_group_body = false;
        let mut wildcard_delay: Option<f64> = None;
        let mut agent_delay: Option<f64> = None;

        for line in self.content.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    // Consecutive User-agent lines share one group; a
                    // User-agent line after other directives starts a new one
                    if in_group_body {
                        group_agents.clear();
                        in_group_body = false;
                    }
                    group_agents.push(value.to_lowercase());
                }
                "crawl-delay" => {
                    in_group_body = true;
                    if let Ok(delay) = value.parse::<f64>() {
                        if group_agents.iter().any(|ua| ua == "*") {
                            wildcard_delay = Some(delay);
                        }
                        if group_agents.iter().any(|ua| ua != "*" && agent.contains(ua.as_str())) {
                            agent_delay = Some(delay);
                        }
                    }
                }
                _ => {
                    in_group_body = true;
                }
            }
        }

        agent_delay.or(wildcard_delay)
    }
}
