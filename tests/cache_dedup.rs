//! Resource cache behaviour through the typed queries, against a mock API.

mod common;

use common::{test_context, MockBackend, MockResponse, PROJECTS_JSON, SERVICES_JSON, STATS_JSON};
use folio::cache::EntryState;
use folio::queries::{CacheKey, Resource};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_concurrent_reads_issue_one_request() {
    let mock = MockBackend::start().await;
    mock.enqueue_for(
        "GET",
        "/api/projects",
        MockResponse::json(PROJECTS_JSON).with_delay(100),
    )
    .await;

    let (ctx, _) = test_context(&mock.base_url());
    let queries = ctx.queries();

    let (a, b, c, d) = tokio::join!(
        queries.projects(),
        queries.projects(),
        queries.projects(),
        queries.projects(),
    );

    for result in [a, b, c, d] {
        assert_eq!(result.unwrap().len(), 2);
    }
    assert_eq!(mock.requests_to("GET", "/api/projects").await.len(), 1);
}

#[tokio::test]
async fn test_ready_value_served_without_request() {
    let mock = MockBackend::start().await;
    mock.enqueue_response(MockResponse::json(SERVICES_JSON)).await;

    let (ctx, _) = test_context(&mock.base_url());
    let first = ctx.queries().services().await.unwrap();
    let second = ctx.queries().services().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(mock.captured_requests().await.len(), 1);
}

#[tokio::test]
async fn test_invalidate_then_fetch_refetches() {
    let mock = MockBackend::start().await;
    mock.enqueue_response(MockResponse::json(PROJECTS_JSON)).await;
    mock.enqueue_response(MockResponse::json("[]")).await;

    let (ctx, _) = test_context(&mock.base_url());
    assert_eq!(ctx.queries().projects().await.unwrap().len(), 2);

    ctx.cache().invalidate(&CacheKey::Projects);
    assert!(ctx.queries().state(CacheKey::Projects).is_absent());

    assert!(ctx.queries().projects().await.unwrap().is_empty());
    assert_eq!(mock.requests_to("GET", "/api/projects").await.len(), 2);
}

#[tokio::test]
async fn test_error_is_cached_until_next_fetch() {
    let mock = MockBackend::start().await;
    mock.enqueue_response(MockResponse::error(500, "boom")).await;
    mock.enqueue_response(MockResponse::json(SERVICES_JSON)).await;

    let (ctx, _) = test_context(&mock.base_url());
    let err = ctx.queries().services().await.unwrap_err();
    assert_eq!(err.status(), Some(500));

    // Late subscribers observe the cached failure without a request.
    let state = ctx.queries().state(CacheKey::Services);
    assert_eq!(state.error(), Some(&err));
    assert_eq!(mock.captured_requests().await.len(), 1);

    // The next explicit read retries.
    assert_eq!(ctx.queries().services().await.unwrap().len(), 2);
    assert_eq!(mock.captured_requests().await.len(), 2);
}

#[tokio::test]
async fn test_invalidation_while_loading_leaves_key_absent() {
    let mock = MockBackend::start().await;
    mock.enqueue_for(
        "GET",
        "/api/projects",
        MockResponse::json(PROJECTS_JSON).with_delay(150),
    )
    .await;
    mock.enqueue_for("GET", "/api/projects", MockResponse::json("[]"))
        .await;

    let (ctx, _) = test_context(&mock.base_url());
    let queries = ctx.queries().clone();

    let reader = tokio::spawn(async move { queries.projects().await });

    while !ctx.queries().state(CacheKey::Projects).is_loading() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    ctx.cache().invalidate(&CacheKey::Projects);
    ctx.cache().invalidate(&CacheKey::Projects);

    // The in-flight caller still gets its answer...
    let projects = reader.await.unwrap().unwrap();
    assert_eq!(projects.len(), 2);

    // ...but it is not kept, so the next read goes to the server.
    assert!(ctx.queries().state(CacheKey::Projects).is_absent());
    assert!(ctx.queries().projects().await.unwrap().is_empty());
    assert_eq!(mock.requests_to("GET", "/api/projects").await.len(), 2);
}

#[tokio::test]
async fn test_watchers_notified_on_each_transition() {
    let mock = MockBackend::start().await;
    mock.enqueue_response(MockResponse::json(PROJECTS_JSON)).await;

    let (ctx, _) = test_context(&mock.base_url());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let _subscription = ctx
        .queries()
        .watch(CacheKey::Projects, move |state: &EntryState<Resource>| {
            sink.lock().push(state.label());
        });

    ctx.queries().projects().await.unwrap();
    ctx.cache().invalidate(&CacheKey::Projects);

    assert_eq!(*seen.lock(), vec!["loading", "ready", "absent"]);
}

#[tokio::test]
async fn test_keys_fetch_independently() {
    let mock = MockBackend::start().await;
    mock.enqueue_for("GET", "/api/projects", MockResponse::json(PROJECTS_JSON).with_delay(50))
        .await;
    mock.enqueue_for("GET", "/api/services", MockResponse::json(SERVICES_JSON))
        .await;

    let (ctx, _) = test_context(&mock.base_url());
    let (projects, services) = tokio::join!(ctx.queries().projects(), ctx.queries().services());

    assert_eq!(projects.unwrap().len(), 2);
    assert_eq!(services.unwrap().len(), 2);
}

#[tokio::test]
async fn test_dashboard_counts_fall_back_to_cached_collections() {
    let mock = MockBackend::start().await;
    mock.enqueue_for("GET", "/api/services", MockResponse::json(SERVICES_JSON))
        .await;
    mock.enqueue_for("GET", "/api/stats/dashboard", MockResponse::json(STATS_JSON))
        .await;

    let (ctx, _) = test_context(&mock.base_url());
    ctx.queries().services().await.unwrap();
    let (stats, counts) = ctx.queries().dashboard_counts().await.unwrap();

    assert_eq!(stats.recent_activities.len(), 1);
    assert_eq!(counts.projects, 2);
    // Stats report zero services; the cached list has two.
    assert_eq!(counts.services, 2);
    assert_eq!(counts.messages, 1);
    assert_eq!(counts.views, 42);
}

#[tokio::test]
async fn test_stats_refresh_only_while_watched() {
    let mock = MockBackend::start().await;
    for _ in 0..10 {
        mock.enqueue_for("GET", "/api/stats/dashboard", MockResponse::json(STATS_JSON))
            .await;
    }

    let durable = Arc::new(folio::session::MemoryStore::new());
    let mut config = common::test_config(&mock.base_url());
    config.cache.stats_refresh_seconds = 1;
    let ctx = folio::ClientContext::new(config, durable).unwrap();

    tokio::time::sleep(Duration::from_millis(1300)).await;
    assert!(mock.captured_requests().await.is_empty());

    let subscription = ctx.queries().watch(CacheKey::DashboardStats, |_| {});
    tokio::time::sleep(Duration::from_millis(1500)).await;
    let while_watched = mock.captured_requests().await.len();
    assert!(while_watched >= 1);
    assert!(ctx.queries().state(CacheKey::DashboardStats).is_ready());

    drop(subscription);
    tokio::time::sleep(Duration::from_millis(1300)).await;
    assert_eq!(mock.captured_requests().await.len(), while_watched);
}
