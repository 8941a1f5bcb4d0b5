//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use folio::config::{ApiConfig, Config};
use folio::http::HttpClient;
use folio::session::{KeyValueStore, MemoryStore, SessionStore};
use folio::ClientContext;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub use mock_backend::{CapturedRequest, MockBackend, MockResponse};

pub const PROFILE_JSON: &str = r#"{
    "name": "Ada",
    "headline": "Systems engineer",
    "bio": "Writes compilers.",
    "email": "ada@example.com",
    "image_url": "/uploads/ada.png"
}"#;

pub const PROJECTS_JSON: &str = r#"[
    {"id": 1, "title": "Folio", "description": "Portfolio", "live_url": "https://folio.dev",
     "tech_stack": ["Rust", "tokio"], "image_url": "/uploads/folio.png"},
    {"id": 2, "title": "Lexer", "description": "Tokens", "live_url": null,
     "tech_stack": null, "image_url": null}
]"#;

pub const SERVICES_JSON: &str = r#"[
    {"name": "Web app", "price": "$500+", "description": "Full stack"},
    {"name": "Audit", "price": "$200", "description": "Code review"}
]"#;

pub const MESSAGES_JSON: &str = r#"[
    {"id": 7, "name": "Grace", "email": "grace@example.com", "phone": null,
     "message": "Hello", "created_at": "2026-01-02T03:04:05Z"}
]"#;

pub const STATS_JSON: &str = r#"{
    "projectsCount": 2, "servicesCount": 0, "messagesCount": 1, "totalViews": 42,
    "recentActivities": [
        {"id": 1, "action": "New message from Grace", "icon": "mail",
         "created_at": "2026-01-02T03:04:05Z"}
    ]
}"#;

/// Config pointing at `base_url` with short timeouts and no stats timer.
pub fn test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.api = ApiConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        connect_timeout_seconds: 2,
        ..ApiConfig::default()
    };
    config.cache.stats_refresh_seconds = 0;
    config
}

/// Context over in-memory durable storage.
pub fn test_context(base_url: &str) -> (ClientContext, Arc<MemoryStore>) {
    let durable = Arc::new(MemoryStore::new());
    let ctx = ClientContext::new(test_config(base_url), durable.clone())
        .expect("Failed to build context");
    (ctx, durable)
}

/// Bare HTTP adapter with its own session store.
pub fn test_client(base_url: &str) -> (HttpClient, SessionStore) {
    let session = SessionStore::new(Arc::new(MemoryStore::new()));
    let client = HttpClient::new(&test_config(base_url).api, session.clone())
        .expect("Failed to build client");
    (client, session)
}

/// Create a temporary config file with the given TOML content.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}
