//! The crawl engine: URL identity, per-host queues and workers, robots
//! enforcement, fetching, and the streaming emitter.

mod emitter;
mod facade;
mod fetcher;
mod host_limiter;
mod normalize;
mod queue;
mod record;
mod registry;
mod robots;
mod worker;

pub use facade::crawl;
pub use normalize::{normalize, CanonicalUrl, NormalizeError};
pub use queue::{HostQueueSet, QueueEntry};
pub use record::PageRecord;
pub use registry::{NodeId, NodeRegistry};
pub use robots::RobotsCache;
pub use worker::USER_AGENT;
