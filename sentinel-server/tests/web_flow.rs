//! Handler-level tests driving the router with in-memory providers.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use tower::ServiceExt;

use sentinel_core::providers::{
    Article, CaseRecord, CaseTimeSeries, NewsResponse,
};
use sentinel_core::{LocationKind, NewsProvider, ProviderError, StatsProvider};
use sentinel_server::{AppState, Config, routes, startup};

struct FakeStats;

#[async_trait]
impl StatsProvider for FakeStats {
    async fn fetch(
        &self,
        location: &str,
        _kind: LocationKind,
    ) -> Result<CaseTimeSeries, ProviderError> {
        let data = (0..20)
            .map(|day| CaseRecord {
                date: (Utc::now() - Duration::days(day)).date_naive(),
                area_name: location.to_string(),
                area_code: None,
                new_cases: Some(50),
                hospital_cases: Some(7000),
                cumulative_deaths: Some(140_000),
            })
            .collect();
        Ok(CaseTimeSeries { data })
    }
}

struct FakeNews;

#[async_trait]
impl NewsProvider for FakeNews {
    async fn fetch(&self, _terms: &str) -> Result<NewsResponse, ProviderError> {
        Ok(NewsResponse {
            status: Some("ok".to_string()),
            total_results: Some(2),
            articles: vec![
                Article {
                    title: "first-headline".to_string(),
                    description: Some("details".to_string()),
                    url: None,
                },
                Article {
                    title: "second-headline".to_string(),
                    description: None,
                    url: None,
                },
            ],
        })
    }
}

fn test_config() -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        local_location: "Exeter".to_string(),
        local_location_kind: LocationKind::Ltla,
        national_location: "England".to_string(),
        stats_api_base: "http://unused.invalid".to_string(),
        news_api_base: "http://unused.invalid".to_string(),
        news_api_key: String::new(),
        news_search_terms: "Covid COVID-19 coronavirus".to_string(),
    }
}

async fn seeded_state() -> AppState {
    let state =
        AppState::new(test_config(), Arc::new(FakeStats), Arc::new(FakeNews));
    startup::seed_snapshots(&state).await.expect("seed");
    state
}

async fn get(state: &AppState, uri: &str) -> (StatusCode, String) {
    let response = routes::create_router(state.clone())
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, String::from_utf8(bytes.to_vec()).expect("utf8"))
}

#[tokio::test]
async fn index_renders_seeded_snapshots() {
    let state = seeded_state().await;
    let (status, body) = get(&state, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Exeter"));
    assert!(body.contains("England"));
    assert!(body.contains("first-headline"));
    assert!(body.contains("Current hospital cases: 7000"));
}

#[tokio::test]
async fn scheduling_submission_creates_an_update() {
    let state = seeded_state().await;
    let (status, body) = get(
        &state,
        "/index?update=23:59&two=evening&covid-data=covid-data&news=news",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("evening"));

    let dashboard = state.dashboard.lock().await;
    assert!(dashboard.registry.contains("evening"));
}

#[tokio::test]
async fn empty_submission_is_ignored() {
    let state = seeded_state().await;
    let (status, _) = get(&state, "/index?update=&two=ghost").await;

    assert_eq!(status, StatusCode::OK);
    let dashboard = state.dashboard.lock().await;
    assert!(dashboard.registry.items().is_empty());
}

#[tokio::test]
async fn flagless_submission_is_ignored() {
    let state = seeded_state().await;
    get(&state, "/index?update=12:00&two=flagless").await;

    let dashboard = state.dashboard.lock().await;
    assert!(dashboard.registry.items().is_empty());
}

#[tokio::test]
async fn dismissing_an_article_edits_the_latest_entry() {
    let state = seeded_state().await;
    let (status, body) = get(&state, "/index?notif=first-headline").await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("first-headline"));
    assert!(body.contains("second-headline"));

    let dashboard = state.dashboard.lock().await;
    let latest = dashboard.store.latest_news().expect("news entry");
    assert_eq!(latest.articles.len(), 1);
}

#[tokio::test]
async fn cancelling_an_update_removes_it_within_the_render() {
    let state = seeded_state().await;
    get(
        &state,
        "/index?update=23:59&two=victim&covid-data=covid-data",
    )
    .await;
    {
        let dashboard = state.dashboard.lock().await;
        assert!(dashboard.registry.contains("victim"));
    }

    let (status, _) = get(&state, "/index?update_item=victim").await;
    assert_eq!(status, StatusCode::OK);

    let dashboard = state.dashboard.lock().await;
    assert!(!dashboard.registry.contains("victim"));
    assert!(dashboard.schedulers.stats.is_empty());
}
