//! Request handlers for the dashboard pages.
//!
//! `/index` carries the user actions as query parameters, matching the
//! page's form wiring: `update` (a time of day) plus `two`
//! (the title) and the three flag fields schedule a refresh, `notif`
//! dismisses an article, `update_item` cancels a scheduled update. Every
//! request, with or without an action, ends in a full render pass.

use axum::{
    extract::{Query, State},
    response::Html,
};
use chrono::{DateTime, Duration, Local, LocalResult, NaiveTime, TimeZone, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use sentinel_core::{Dashboard, UpdateRequest};

use crate::render;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct IndexParams {
    /// Time of day (HH:MM) for a new scheduled update.
    pub update: Option<String>,
    /// Title of the new scheduled update.
    pub two: Option<String>,
    #[serde(rename = "covid-data")]
    pub covid_data: Option<String>,
    pub news: Option<String>,
    pub repeat: Option<String>,
    /// Article title to dismiss from the latest news entry.
    pub notif: Option<String>,
    /// Update title to flag for cancellation.
    pub update_item: Option<String>,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    info!("user navigated to index");
    render_pass(&state).await
}

pub async fn index_actions(
    State(state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Html<String> {
    {
        let mut dashboard = state.dashboard.lock().await;
        apply_actions(&mut dashboard, &params, Local::now());
    }
    render_pass(&state).await
}

/// The per-render update pipeline: reconcile the registry, poll both
/// schedulers (running due fetches inline), then render the store.
async fn render_pass(state: &AppState) -> Html<String> {
    let mut dashboard = state.dashboard.lock().await;
    let now = Utc::now();
    dashboard.reconcile(now);
    dashboard
        .run_due(
            state.stats_provider.as_ref(),
            state.news_provider.as_ref(),
            now,
        )
        .await;
    render::page(&dashboard)
}

fn apply_actions(
    dashboard: &mut Dashboard,
    params: &IndexParams,
    now: DateTime<Local>,
) {
    if let Some(update) = params.update.as_deref() {
        if update.is_empty() {
            return;
        }
        let Some(title) = params.two.as_deref().filter(|t| !t.is_empty()) else {
            warn!("scheduling submission without a title, ignored");
            return;
        };
        let Ok(time_of_day) = NaiveTime::parse_from_str(update, "%H:%M") else {
            warn!(time = %update, "scheduling submission with unparseable time, ignored");
            return;
        };

        let wants_stats = params.covid_data.is_some();
        let wants_news = params.news.is_some();
        let repeats = params.repeat.is_some();

        let request = UpdateRequest {
            title: title.to_string(),
            content: describe(update, wants_stats, wants_news, repeats),
            time: next_occurrence(now, time_of_day),
            wants_stats,
            wants_news,
            repeats,
        };
        if let Err(err) = dashboard.registry.create(request) {
            warn!(%title, error = %err, "invalid scheduling submission ignored");
        }
    } else if let Some(title) = params.notif.as_deref() {
        dashboard.store.dismiss_article(title);
    } else if let Some(title) = params.update_item.as_deref() {
        if dashboard.registry.cancel(title) {
            info!(%title, "update flagged for cancellation");
        }
    }
}

/// Map a submitted time of day onto the next occurrence of that wall-clock
/// time: today if still ahead, otherwise the same time tomorrow.
fn next_occurrence(now: DateTime<Local>, time_of_day: NaiveTime) -> DateTime<Utc> {
    let naive = now.date_naive().and_time(time_of_day);
    let candidate = match naive.and_local_timezone(Local) {
        LocalResult::Single(time) => time,
        LocalResult::Ambiguous(earliest, _) => earliest,
        // DST gap: the requested wall time does not exist today.
        LocalResult::None => Local.from_utc_datetime(&naive),
    };
    let candidate = if candidate <= now {
        candidate + Duration::days(1)
    } else {
        candidate
    };
    candidate.with_timezone(&Utc)
}

fn describe(
    time_of_day: &str,
    wants_stats: bool,
    wants_news: bool,
    repeats: bool,
) -> String {
    let mut content = format!("Next update is at {time_of_day}.");
    if wants_stats {
        content.push_str(" COVID data updates set.");
    }
    if wants_news {
        content.push_str(if wants_stats {
            " News updates also set."
        } else {
            " News updates set."
        });
    }
    if repeats {
        content.push_str(" Updates will repeat.");
    }
    content
}
