//! Client configuration: API location, cache timers, form timing and
//! durable storage placement.

mod credentials;
mod loader;
mod types;

pub use credentials::SecureString;
pub use loader::{ConfigError, API_URL_ENV};
pub use types::{ApiConfig, CacheConfig, Config, FormConfig, StorageConfig};
