//! The dashboard aggregate: registry, scheduler pair, and snapshot store
//! behind one owner, mutated only inside the serialized request path.

use chrono::{DateTime, Utc};
use tracing::error;

use crate::providers::{
    LocationKind, NewsProvider, ProviderError, StatsProvider,
};
use crate::registry::{FetchTargets, UpdateRegistry};
use crate::scheduler::{FetchTask, SchedulerPair};
use crate::snapshot::SnapshotStore;

/// All mutable dashboard state. The server wraps one of these in a mutex
/// and holds the lock across a full reconcile / run-due / render sequence.
#[derive(Debug)]
pub struct Dashboard {
    pub registry: UpdateRegistry,
    pub schedulers: SchedulerPair,
    pub store: SnapshotStore,
    targets: FetchTargets,
}

impl Dashboard {
    pub fn new(targets: FetchTargets) -> Self {
        Self {
            registry: UpdateRegistry::new(),
            schedulers: SchedulerPair::new(),
            store: SnapshotStore::new(),
            targets,
        }
    }

    pub fn targets(&self) -> &FetchTargets {
        &self.targets
    }

    /// Run one registry reconciliation pass against the scheduler pair.
    pub fn reconcile(&mut self, now: DateTime<Utc>) {
        let targets = self.targets.clone();
        self.registry
            .reconcile(&mut self.schedulers, &targets, now);
    }

    /// Poll both schedulers and execute every due fetch inline. Fetches run
    /// synchronously within the render path; a failed fetch is logged and
    /// leaves the previous snapshot untouched.
    pub async fn run_due(
        &mut self,
        stats: &dyn StatsProvider,
        news: &dyn NewsProvider,
        now: DateTime<Utc>,
    ) {
        for task in self.schedulers.stats.run_due(now) {
            self.execute(task, stats, news).await;
        }
        for task in self.schedulers.news.run_due(now) {
            self.execute(task, stats, news).await;
        }
    }

    async fn execute(
        &mut self,
        task: FetchTask,
        stats: &dyn StatsProvider,
        news: &dyn NewsProvider,
    ) {
        match task {
            FetchTask::Stats { location, kind } => {
                match stats.fetch(&location, kind).await {
                    Ok(series) => {
                        let fetched_at = Utc::now();
                        if kind.is_national() {
                            self.store.store_national(&series, fetched_at);
                        } else {
                            self.store.store_local(&series, fetched_at);
                        }
                    }
                    Err(err) => error!(
                        %location,
                        error = %err,
                        "statistics fetch failed, keeping previous snapshot"
                    ),
                }
            }
            FetchTask::News { terms } => match news.fetch(&terms).await {
                Ok(response) => self.store.push_news(response),
                Err(err) => error!(
                    error = %err,
                    "news fetch failed, keeping previous snapshot"
                ),
            },
        }
    }

    /// Seed both statistics snapshots before the server starts listening.
    /// Any failure here is fatal to startup.
    pub async fn seed_stats(
        &mut self,
        stats: &dyn StatsProvider,
    ) -> Result<(), ProviderError> {
        let series = stats
            .fetch(&self.targets.local_location, self.targets.local_kind)
            .await?;
        self.store.store_local(&series, Utc::now());

        let series = stats
            .fetch(&self.targets.national_location, LocationKind::Nation)
            .await?;
        self.store.store_national(&series, Utc::now());
        Ok(())
    }

    /// Seed the news log before the server starts listening.
    pub async fn seed_news(
        &mut self,
        news: &dyn NewsProvider,
    ) -> Result<(), ProviderError> {
        let response = news.fetch(&self.targets.news_terms).await?;
        self.store.push_news(response);
        Ok(())
    }
}
