//! Robots.txt rule evaluation
//!
//! Wraps the robotstxt crate behind a small ruleset type that also knows
//! the two degenerate policies the gate needs: allow-everything (empty or
//! missing file treated as permissive is NOT used here) and deny-everything
//! (the fail-closed policy cached when a robots.txt cannot be fetched).

use robotstxt::DefaultMatcher;

/// Parsed robots.txt ruleset for one host
#[derive(Debug, Clone)]
pub struct RobotsRules {
    /// Raw robots.txt content; ignored by the degenerate policies
    content: String,
    mode: Mode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Evaluate the parsed content per request
    Content,
    /// Every path is allowed
    AllowAll,
    /// Every path is denied (robots.txt unavailable, fail closed)
    DenyAll,
}

impl RobotsRules {
    /// Creates rules from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            mode: Mode::Content,
        }
    }

    /// Creates a permissive ruleset that allows everything
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            mode: Mode::AllowAll,
        }
    }

    /// Creates the fail-closed ruleset that denies everything
    pub fn deny_all() -> Self {
        Self {
            content: String::new(),
            mode: Mode::DenyAll,
        }
    }

    /// Whether this ruleset denies every request
    pub fn is_deny_all(&self) -> bool {
        self.mode == Mode::DenyAll
    }

    /// Checks if a URL is allowed for the given user agent
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        match self.mode {
            Mode::AllowAll => true,
            Mode::DenyAll => false,
            Mode::Content => {
                if self.content.is_empty() {
                    return true;
                }
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
            }
        }
    }

    /// Gets the crawl delay for a specific user agent
    ///
    /// The robotstxt matcher does not surface Crawl-delay, so the directive
    /// is parsed directly: it applies to the most recent User-agent group,
    /// and a group naming the agent wins over the wildcard group.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        if self.mode != Mode::Content || self.content.is_empty() {
            return None;
        }

        let mut current_agents: Vec<String> = Vec::new();
        let mut wildcard_delay: Option<f64> = None;
        let mut agent_delay: Option<f64> = None;

        let normalized_agent = user_agent.to_lowercase();

        for line in self.content.lines() {
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some((key, value)) = trimmed.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    // Consecutive User-agent lines form one group
                    current_agents.push(value.to_lowercase());
                }
                "crawl-delay" => {
                    // Remote input: only finite, non-negative delays are
                    // usable as a sleep duration
                    let parsed = value
                        .parse::<f64>()
                        .ok()
                        .filter(|d| d.is_finite() && *d >= 0.0);
                    if let Some(delay) = parsed {
                        if current_agents
                            .iter()
                            .any(|ua| ua == "*" || normalized_agent.contains(ua))
                        {
                            if current_agents.contains(&"*".to_string()) {
                                wildcard_delay = Some(delay);
                            } else {
                                agent_delay = Some(delay);
                            }
                        }
                    }
                    current_agents.clear();
                }
                _ => {}
            }
        }

        agent_delay.or(wildcard_delay)
    }
}
