mod fastly_api;
mod in_memory_api;

pub use fastly_api::{FastlyApi, FastlyClientFactory, FastlyConfig, DEFAULT_API_URL};
pub use in_memory_api::{CallCounts, InMemoryCdnApi, InMemoryClientFactory};
