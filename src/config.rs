//! Crawl configuration with a type-safe builder.
//!
//! Mirrors the teacher's `CrawlConfigBuilder` typestate pattern: required
//! fields (`seeds`, `max_depth`) must be set before `build()` is callable,
//! enforced at compile time via a phantom marker rather than a runtime
//! check.

use std::marker::PhantomData;
use std::time::Duration;

/// Default per-host concurrent in-flight fetch cap (`spec.md` §4.5, §6).
pub const MAX_CONCURRENT_REQS_PER_HOST: usize = 5;

/// Default HTTP timeout for page and robots.txt fetches (`spec.md` §5, §6).
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(3);

/// Fallback crawl delay used when a host has no robots policy, or its
/// policy omits `Crawl-Delay`.
pub const DEFAULT_CRAWL_DELAY: Duration = Duration::from_millis(0);

/// Fully resolved crawl configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub(crate) seeds: Vec<String>,
    pub(crate) max_depth: u32,
    pub(crate) max_concurrent_per_host: usize,
    pub(crate) http_timeout: Duration,
    pub(crate) default_crawl_delay: Duration,
    pub(crate) respect_robots: bool,
}

impl EngineConfig {
    #[must_use]
    pub fn builder() -> EngineConfigBuilder<()> {
        EngineConfigBuilder::default()
    }

    #[must_use]
    pub fn seeds(&self) -> &[String] {
        &self.seeds
    }

    #[must_use]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    #[must_use]
    pub fn max_concurrent_per_host(&self) -> usize {
        self.max_concurrent_per_host
    }

    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }

    #[must_use]
    pub fn default_crawl_delay(&self) -> Duration {
        self.default_crawl_delay
    }

    #[must_use]
    pub fn respect_robots(&self) -> bool {
        self.respect_robots
    }
}

// Type states for the builder.
pub struct WithSeeds;
pub struct Complete;

/// Builder for [`EngineConfig`]. `seeds()` must be called before `build()`
/// is available — the typestate parameter tracks that at compile time.
pub struct EngineConfigBuilder<State = ()> {
    seeds: Vec<String>,
    max_depth: u32,
    max_concurrent_per_host: usize,
    http_timeout: Duration,
    default_crawl_delay: Duration,
    respect_robots: bool,
    _state: PhantomData<State>,
}

impl Default for EngineConfigBuilder<()> {
    fn default() -> Self {
        Self {
            seeds: Vec::new(),
            max_depth: 0,
            max_concurrent_per_host: MAX_CONCURRENT_REQS_PER_HOST,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            default_crawl_delay: DEFAULT_CRAWL_DELAY,
            respect_robots: true,
            _state: PhantomData,
        }
    }
}

impl<State> EngineConfigBuilder<State> {
    fn transition<NewState>(self) -> EngineConfigBuilder<NewState> {
        EngineConfigBuilder {
            seeds: self.seeds,
            max_depth: self.max_depth,
            max_concurrent_per_host: self.max_concurrent_per_host,
            http_timeout: self.http_timeout,
            default_crawl_delay: self.default_crawl_delay,
            respect_robots: self.respect_robots,
            _state: PhantomData,
        }
    }

    #[must_use]
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    #[must_use]
    pub fn max_concurrent_per_host(mut self, n: usize) -> Self {
        self.max_concurrent_per_host = n.max(1);
        self
    }

    #[must_use]
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    #[must_use]
    pub fn default_crawl_delay(mut self, delay: Duration) -> Self {
        self.default_crawl_delay = delay;
        self
    }

    #[must_use]
    pub fn respect_robots(mut self, respect: bool) -> Self {
        self.respect_robots = respect;
        self
    }
}

impl EngineConfigBuilder<()> {
    #[must_use]
    pub fn seeds<I, S>(mut self, seeds: I) -> EngineConfigBuilder<WithSeeds>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seeds = seeds.into_iter().map(Into::into).collect();
        self.transition()
    }
}

impl EngineConfigBuilder<WithSeeds> {
    #[must_use]
    pub fn build(self) -> EngineConfig {
        EngineConfig {
            seeds: self.seeds,
            max_depth: self.max_depth,
            max_concurrent_per_host: self.max_concurrent_per_host,
            http_timeout: self.http_timeout,
            default_crawl_delay: self.default_crawl_delay,
            respect_robots: self.respect_robots,
        }
    }
}
