//! Keyed resource cache with in-flight de-duplication, invalidation,
//! change subscriptions and optional periodic refresh.

mod entry;
mod store;
mod subscription;

pub use entry::EntryState;
pub use store::{LoadFuture, Loader, ResourceCache};
pub use subscription::Subscription;
