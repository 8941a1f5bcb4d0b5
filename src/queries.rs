//! Typed reads of server entities through the resource cache.
//!
//! Every entity lives under one `CacheKey`. Collections are cached whole:
//! a key is either absent or holds the complete list.

use std::fmt;
use std::sync::Arc;

use crate::api::Api;
use crate::cache::{EntryState, LoadFuture, Loader, ResourceCache, Subscription};
use crate::config::CacheConfig;
use crate::error::ClientError;
use crate::models::{ContactMessage, DashboardCounts, DashboardStats, Profile, Project, Service};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheKey {
    Profile,
    Projects,
    Services,
    Messages,
    DashboardStats,
}

impl CacheKey {
    pub const ALL: [CacheKey; 5] = [
        CacheKey::Profile,
        CacheKey::Projects,
        CacheKey::Services,
        CacheKey::Messages,
        CacheKey::DashboardStats,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKey::Profile => "profile",
            CacheKey::Projects => "projects",
            CacheKey::Services => "services",
            CacheKey::Messages => "messages",
            CacheKey::DashboardStats => "dashboard_stats",
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cached server entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Profile(Profile),
    Projects(Vec<Project>),
    Services(Vec<Service>),
    Messages(Vec<ContactMessage>),
    Stats(DashboardStats),
}

impl Resource {
    pub fn key(&self) -> CacheKey {
        match self {
            Resource::Profile(_) => CacheKey::Profile,
            Resource::Projects(_) => CacheKey::Projects,
            Resource::Services(_) => CacheKey::Services,
            Resource::Messages(_) => CacheKey::Messages,
            Resource::Stats(_) => CacheKey::DashboardStats,
        }
    }

    /// Number of records for collection resources.
    pub fn len(&self) -> Option<usize> {
        match self {
            Resource::Projects(items) => Some(items.len()),
            Resource::Services(items) => Some(items.len()),
            Resource::Messages(items) => Some(items.len()),
            Resource::Profile(_) | Resource::Stats(_) => None,
        }
    }
}

pub type Cache = ResourceCache<CacheKey, Resource>;

/// Build the loader that fetches `key` from the API.
pub fn loader_for(api: Api, key: CacheKey) -> Loader<Resource> {
    Arc::new(move || -> LoadFuture<Resource> { Box::pin(load(api.clone(), key)) })
}

async fn load(api: Api, key: CacheKey) -> Result<Resource, ClientError> {
    let resource = match key {
        CacheKey::Profile => Resource::Profile(api.profile().await?),
        CacheKey::Projects => Resource::Projects(api.projects().await?),
        CacheKey::Services => Resource::Services(api.services().await?),
        CacheKey::Messages => Resource::Messages(api.messages().await?),
        CacheKey::DashboardStats => Resource::Stats(api.dashboard_stats().await?),
    };
    Ok(resource)
}

fn mismatch(key: CacheKey, found: &Resource) -> ClientError {
    ClientError::decode(format!(
        "cache key '{}' held a '{}' resource",
        key,
        found.key()
    ))
}

/// Entity reads for views.
#[derive(Clone)]
pub struct Queries {
    api: Api,
    cache: Cache,
}

impl Queries {
    /// Registers the dashboard stats refresh timer when one is configured.
    pub fn new(api: Api, cache: Cache, config: &CacheConfig) -> Self {
        if let Some(period) = config.stats_refresh() {
            cache.set_refresh(
                CacheKey::DashboardStats,
                period,
                loader_for(api.clone(), CacheKey::DashboardStats),
            );
        }
        Self { api, cache }
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Cached read of any key.
    pub async fn read(&self, key: CacheKey) -> Result<Resource, ClientError> {
        let api = self.api.clone();
        self.cache.fetch(key, move || load(api, key)).await
    }

    /// Refetch `key` even if it is ready.
    pub async fn reload(&self, key: CacheKey) -> Result<Resource, ClientError> {
        let api = self.api.clone();
        self.cache.refresh(key, move || load(api, key)).await
    }

    pub fn state(&self, key: CacheKey) -> EntryState<Resource> {
        self.cache.state(&key)
    }

    /// Register a view's interest in `key`.
    pub fn watch<F>(&self, key: CacheKey, listener: F) -> Subscription
    where
        F: Fn(&EntryState<Resource>) + Send + Sync + 'static,
    {
        self.cache.subscribe(key, listener)
    }

    pub async fn profile(&self) -> Result<Profile, ClientError> {
        match self.read(CacheKey::Profile).await? {
            Resource::Profile(profile) => Ok(profile),
            other => Err(mismatch(CacheKey::Profile, &other)),
        }
    }

    pub async fn projects(&self) -> Result<Vec<Project>, ClientError> {
        match self.read(CacheKey::Projects).await? {
            Resource::Projects(projects) => Ok(projects),
            other => Err(mismatch(CacheKey::Projects, &other)),
        }
    }

    pub async fn services(&self) -> Result<Vec<Service>, ClientError> {
        match self.read(CacheKey::Services).await? {
            Resource::Services(services) => Ok(services),
            other => Err(mismatch(CacheKey::Services, &other)),
        }
    }

    pub async fn messages(&self) -> Result<Vec<ContactMessage>, ClientError> {
        match self.read(CacheKey::Messages).await? {
            Resource::Messages(messages) => Ok(messages),
            other => Err(mismatch(CacheKey::Messages, &other)),
        }
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ClientError> {
        match self.read(CacheKey::DashboardStats).await? {
            Resource::Stats(stats) => Ok(stats),
            other => Err(mismatch(CacheKey::DashboardStats, &other)),
        }
    }

    /// Stats plus headline counts, using already cached collections where
    /// the stats report zero. Does not fetch the collections.
    pub async fn dashboard_counts(&self) -> Result<(DashboardStats, DashboardCounts), ClientError> {
        let stats = self.dashboard_stats().await?;
        let cached_len = |key| self.cache.peek(&key).and_then(|r| r.len());
        let counts = stats.counts_with_fallback(
            cached_len(CacheKey::Projects),
            cached_len(CacheKey::Services),
            cached_len(CacheKey::Messages),
        );
        Ok((stats, counts))
    }
}
