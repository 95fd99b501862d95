//! Per-host robots.txt acquisition and policy enforcement (`spec.md` §4.4).

use std::time::Duration;

use dashmap::DashMap;
use robotstxt::DefaultMatcher;

/// A cached robots.txt outcome for one host. Once stored it is never
/// re-fetched (`spec.md` §4.4).
#[derive(Debug, Clone)]
enum RobotsEntry {
    /// Robots.txt fetched and parsed successfully.
    Policy {
        body: String,
        crawl_delay: Duration,
    },
    /// No robots.txt, or it failed to fetch/parse: allow everything, no delay.
    NoPolicy,
}

/// Write-once-per-host cache of robots.txt policies.
pub struct RobotsCache {
    entries: DashMap<String, RobotsEntry>,
    client: reqwest::Client,
}

impl RobotsCache {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            entries: DashMap::new(),
            client,
        }
    }

    /// Fetches and caches the policy for `host` if not already cached.
    /// Robots acquisition never propagates a failure: any transport or
    /// parse error collapses to the no-policy sentinel.
    pub async fn policy_for(&self, host: &str) -> RobotsPolicy<'_> {
        if let Some(entry) = self.entries.get(host) {
            return RobotsPolicy::from_entry(entry.clone());
        }

        let entry = self.fetch(host).await;
        // Last writer wins on a race; both writers store functionally
        // equivalent results (spec.md §5), so this is not a TOCTOU bug.
        self.entries.insert(host.to_string(), entry.clone());
        RobotsPolicy::from_entry(entry)
    }

    async fn fetch(&self, host: &str) -> RobotsEntry {
        let url = format!("https://{host}/robots.txt");
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(_) => return RobotsEntry::NoPolicy,
        };

        if !response.status().is_success() {
            return RobotsEntry::NoPolicy;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(_) => return RobotsEntry::NoPolicy,
        };

        let crawl_delay = parse_crawl_delay(&body);
        RobotsEntry::Policy { body, crawl_delay }
    }
}

/// A resolved policy for one host, borrowed out of the cache for the
/// duration of a single `allows`/`crawl_delay` check.
pub struct RobotsPolicy<'a> {
    entry: RobotsEntry,
    _marker: std::marker::PhantomData<&'a ()>,
}

impl RobotsPolicy<'_> {
    fn from_entry(entry: RobotsEntry) -> Self {
        Self {
            entry,
            _marker: std::marker::PhantomData,
        }
    }

    #[must_use]
    pub fn allows(&self, url: &str, agent: &str) -> bool {
        match &self.entry {
            RobotsEntry::NoPolicy => true,
            RobotsEntry::Policy { body, .. } => {
                DefaultMatcher::default().one_agent_allowed_by_robots(body, agent, url)
            }
        }
    }

    #[must_use]
    pub fn crawl_delay(&self) -> Duration {
        match &self.entry {
            RobotsEntry::NoPolicy => Duration::from_millis(0),
            RobotsEntry::Policy { crawl_delay, .. } => *crawl_delay,
        }
    }
}

/// Scans for a `Crawl-delay:` directive scoped to the default (`*`) group.
/// The `robotstxt` matcher crate doesn't expose crawl-delay, so this is
/// parsed by hand the same way other crawlers in the wild do it.
///
/// Groups are delimited the standard way: one or more consecutive
/// `User-agent:` lines name a group, and everything up to the next such
/// run of `User-agent:` lines belongs to it. Only a `Crawl-delay:` line
/// inside a group that names `*` counts — a delay set for some other
/// bot's group must never leak into this engine's own pacing.
fn parse_crawl_delay(body: &str) -> Duration {
    let mut in_default_group = false;
    let mut group_is_open = false;

    for line in body.lines() {
        let line = line.split('#').next().unwrap_or("").trim();
        let Some((directive, value)) = line.split_once(':') else {
            continue;
        };
        let directive = directive.trim();
        let value = value.trim();

        if directive.eq_ignore_ascii_case("user-agent") {
            if !group_is_open {
                in_default_group = false;
            }
            in_default_group |= value == "*";
            group_is_open = true;
            continue;
        }

        group_is_open = false;

        if in_default_group && directive.eq_ignore_ascii_case("crawl-delay") {
            if let Ok(seconds) = value.parse::<f64>() {
                return Duration::from_secs_f64(seconds);
            }
        }
    }

    Duration::from_millis(0)
}
