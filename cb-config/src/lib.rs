pub mod builder;
pub mod cache;

pub use builder::{ConfigurationBuilder, ConfigurationMap, CACHE_CONFIGURATION_ENTRY};
pub use cache::{CacheLifetime, CacheStats, CacheStore, MemoryCache};
