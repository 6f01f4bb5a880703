//! The update registry: user-scheduled refreshes and their lifecycle.
//!
//! Each item moves through `Pending -> Active (callbacks scheduled)` and,
//! for repeating items, back to `Pending` once its entries fire, until it
//! ends `Completed` or `Cancelled`. Both terminal states imply removal,
//! performed by the next reconciliation pass. The pass applies its rules in
//! a fixed order per item: expiry, cancellation, dispatch, completion sweep.

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::error::ScheduleError;
use crate::providers::LocationKind;
use crate::scheduler::{FetchTask, SchedulerPair, TaskHandle};

/// Fixed fetch destinations for dispatched callbacks, read from static
/// configuration at startup.
#[derive(Debug, Clone)]
pub struct FetchTargets {
    pub local_location: String,
    pub local_kind: LocationKind,
    pub national_location: String,
    pub news_terms: String,
}

const DISPATCH_PRIORITY: u8 = 1;

/// A validated scheduling submission.
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    pub title: String,
    /// Human-readable description shown on the rendered page.
    pub content: String,
    pub time: DateTime<Utc>,
    pub wants_stats: bool,
    pub wants_news: bool,
    pub repeats: bool,
}

/// One scheduled update and the callback handles it currently owns.
#[derive(Debug, Clone)]
pub struct UpdateItem {
    title: String,
    content: String,
    time: DateTime<Utc>,
    wants_stats: bool,
    wants_news: bool,
    repeats: bool,
    completed: bool,
    cancelled: bool,
    /// Local-scope and national-scope entries on the stats scheduler.
    stats_handles: Option<[TaskHandle; 2]>,
    news_handle: Option<TaskHandle>,
}

impl UpdateItem {
    fn from_request(request: UpdateRequest) -> Self {
        Self {
            title: request.title,
            content: request.content,
            time: request.time,
            wants_stats: request.wants_stats,
            wants_news: request.wants_news,
            repeats: request.repeats,
            completed: false,
            cancelled: false,
            stats_handles: None,
            news_handle: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn repeats(&self) -> bool {
        self.repeats
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Whether any recorded handle still names a pending scheduler entry.
    /// Fired and cancelled entries no longer count, which is what lets a
    /// repeating item re-arm on the pass after its entries fire.
    fn has_live_handles(&self, schedulers: &SchedulerPair) -> bool {
        let stats_live = self
            .stats_handles
            .is_some_and(|handles| {
                handles.iter().any(|&h| schedulers.stats.contains(h))
            });
        let news_live = self
            .news_handle
            .is_some_and(|h| schedulers.news.contains(h));
        stats_live || news_live
    }

    fn cancel_scheduled(&mut self, schedulers: &mut SchedulerPair) {
        if let Some(handles) = self.stats_handles.take() {
            for handle in handles {
                schedulers.stats.cancel(handle);
            }
        }
        if let Some(handle) = self.news_handle.take() {
            schedulers.news.cancel(handle);
        }
    }
}

/// Ordered collection of pending updates. All mutation happens through
/// `create`, `cancel`, and the per-render `reconcile` pass.
#[derive(Debug, Default)]
pub struct UpdateRegistry {
    items: Vec<UpdateItem>,
}

impl UpdateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[UpdateItem] {
        &self.items
    }

    pub fn contains(&self, title: &str) -> bool {
        self.items.iter().any(|item| item.title == title)
    }

    /// Append a new pending item. Rejects submissions that request neither
    /// data source, and titles colliding with a currently active item.
    /// Titles of completed or cancelled items may be reused.
    pub fn create(&mut self, request: UpdateRequest) -> Result<(), ScheduleError> {
        if !request.wants_stats && !request.wants_news {
            return Err(ScheduleError::MissingDataFlags);
        }
        if self.contains(&request.title) {
            return Err(ScheduleError::DuplicateTitle(request.title));
        }

        info!(
            title = %request.title,
            time = %request.time,
            stats = request.wants_stats,
            news = request.wants_news,
            repeats = request.repeats,
            "update scheduled"
        );
        self.items.push(UpdateItem::from_request(request));
        Ok(())
    }

    /// Flag the named item for cancellation. Takes effect on the next
    /// reconcile pass; returns whether an active item matched.
    pub fn cancel(&mut self, title: &str) -> bool {
        match self.items.iter_mut().find(|item| item.title == title) {
            Some(item) => {
                item.cancelled = true;
                true
            }
            None => false,
        }
    }

    /// One reconciliation pass, run once per render. Iterates a drained
    /// snapshot of the registry and rebuilds the retained partition, so
    /// removal never disturbs iteration. Per item, in order:
    ///
    /// 1. expiry: a non-repeating item whose time has passed is completed
    /// 2. cancellation: cancel owned entries, drop the item
    /// 3. dispatch: schedule the entries its flags imply, once per cycle;
    ///    a repeating item's time advances one day immediately after
    /// 4. completion sweep: drop completed items
    pub fn reconcile(
        &mut self,
        schedulers: &mut SchedulerPair,
        targets: &FetchTargets,
        now: DateTime<Utc>,
    ) {
        let snapshot = std::mem::take(&mut self.items);
        let mut retained = Vec::with_capacity(snapshot.len());

        for mut item in snapshot {
            if !item.repeats && item.time < now {
                item.completed = true;
            }

            if item.cancelled {
                item.cancel_scheduled(schedulers);
                info!(title = %item.title, time = %item.time, "update cancelled");
                continue;
            }

            if !item.completed && !item.has_live_handles(schedulers) {
                Self::dispatch(&mut item, schedulers, targets);
            }

            if item.completed {
                info!(title = %item.title, time = %item.time, "update completed");
                continue;
            }

            retained.push(item);
        }

        self.items = retained;
    }

    fn dispatch(
        item: &mut UpdateItem,
        schedulers: &mut SchedulerPair,
        targets: &FetchTargets,
    ) {
        if !item.wants_stats && !item.wants_news {
            // Unreachable through create; skipped rather than crashing the pass.
            warn!(title = %item.title, "update requests no data sources, skipping");
            return;
        }

        if item.wants_stats {
            let local = schedulers.stats.schedule_at(
                item.time,
                DISPATCH_PRIORITY,
                FetchTask::Stats {
                    location: targets.local_location.clone(),
                    kind: targets.local_kind,
                },
            );
            let national = schedulers.stats.schedule_at(
                item.time,
                DISPATCH_PRIORITY,
                FetchTask::Stats {
                    location: targets.national_location.clone(),
                    kind: LocationKind::Nation,
                },
            );
            item.stats_handles = Some([local, national]);
            info!(title = %item.title, time = %item.time, "added to the statistics scheduler");
        }

        if item.wants_news {
            item.news_handle = Some(schedulers.news.schedule_at(
                item.time,
                DISPATCH_PRIORITY,
                FetchTask::News {
                    terms: targets.news_terms.clone(),
                },
            ));
            info!(title = %item.title, time = %item.time, "added to the news scheduler");
        }

        if item.repeats {
            // Bump pre-emptively so the next pass sees a fresh future event
            // instead of re-triggering immediately.
            item.time += Duration::days(1);
            info!(title = %item.title, next = %item.time, "update will repeat tomorrow");
        }
    }
}
