use std::{fmt, sync::Arc};

use tokio::sync::Mutex;

use sentinel_core::{Dashboard, NewsProvider, StatsProvider};

use crate::config::Config;

/// Shared application state. All dashboard mutation happens while holding
/// the single mutex, which serializes the reconcile / poll / render
/// sequence across requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dashboard: Arc<Mutex<Dashboard>>,
    pub stats_provider: Arc<dyn StatsProvider>,
    pub news_provider: Arc<dyn NewsProvider>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        config: Config,
        stats_provider: Arc<dyn StatsProvider>,
        news_provider: Arc<dyn NewsProvider>,
    ) -> Self {
        let dashboard = Dashboard::new(config.fetch_targets());
        Self {
            config: Arc::new(config),
            dashboard: Arc::new(Mutex::new(dashboard)),
            stats_provider,
            news_provider,
        }
    }
}
