//! Startup seeding: one synchronous fetch per data domain before the
//! listener binds. The process must never begin serving with empty
//! snapshots, so any failure here is fatal.

use anyhow::Context;

use crate::state::AppState;

pub async fn seed_snapshots(state: &AppState) -> anyhow::Result<()> {
    let mut dashboard = state.dashboard.lock().await;

    dashboard
        .seed_stats(state.stats_provider.as_ref())
        .await
        .context("connection to the coronavirus statistics API failed")?;

    dashboard
        .seed_news(state.news_provider.as_ref())
        .await
        .context("connection to the news API failed")?;

    Ok(())
}
