//! Time-ordered task queues with non-blocking poll semantics.
//!
//! Each scheduler holds explicit (fire-time, priority, sequence, payload)
//! records rather than live closures, so a handle is a plain lookup key:
//! cancellation removes a record, and tests can inspect the queue. Entries
//! are one-shot; repetition is the registry's job, not the scheduler's.

use chrono::{DateTime, Utc};

use crate::providers::LocationKind;

/// Work a scheduled entry carries. Executed by the dashboard's dispatch
/// routine when the entry comes due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchTask {
    /// Refresh one statistics snapshot.
    Stats { location: String, kind: LocationKind },
    /// Refresh the news log.
    News { terms: String },
}

/// Opaque key naming one pending entry in one scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
struct Entry {
    handle: TaskHandle,
    fire_at: DateTime<Utc>,
    priority: u8,
    task: FetchTask,
}

/// A single time-ordered queue of pending fetch tasks.
#[derive(Debug, Default)]
pub struct TaskScheduler {
    entries: Vec<Entry>,
    next_id: u64,
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `task` to fire at `fire_at`. Lower `priority` fires first
    /// among entries sharing a fire-time.
    pub fn schedule_at(
        &mut self,
        fire_at: DateTime<Utc>,
        priority: u8,
        task: FetchTask,
    ) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            handle,
            fire_at,
            priority,
            task,
        });
        handle
    }

    /// Remove the entry named by `handle`. Cancelling an entry that has
    /// already fired or was already cancelled is a no-op.
    pub fn cancel(&mut self, handle: TaskHandle) {
        self.entries.retain(|entry| entry.handle != handle);
    }

    /// Whether `handle` still names a pending entry.
    pub fn contains(&self, handle: TaskHandle) -> bool {
        self.entries.iter().any(|entry| entry.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry whose fire-time has passed and return its task,
    /// in non-decreasing fire-time order (priority, then insertion order,
    /// break ties). Returns immediately when nothing is due; never waits
    /// for a future entry.
    pub fn run_due(&mut self, now: DateTime<Utc>) -> Vec<FetchTask> {
        let mut due: Vec<Entry> = Vec::new();
        let mut pending: Vec<Entry> = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            if entry.fire_at <= now {
                due.push(entry);
            } else {
                pending.push(entry);
            }
        }
        self.entries = pending;

        due.sort_by_key(|entry| (entry.fire_at, entry.priority, entry.handle.0));
        due.into_iter().map(|entry| entry.task).collect()
    }
}

/// The two independent schedulers the dashboard runs: one per data domain.
/// There is no cross-ordering guarantee between them.
#[derive(Debug, Default)]
pub struct SchedulerPair {
    pub stats: TaskScheduler,
    pub news: TaskScheduler,
}

impl SchedulerPair {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn news_task(terms: &str) -> FetchTask {
        FetchTask::News {
            terms: terms.to_string(),
        }
    }

    #[test]
    fn run_due_fires_past_entries_in_fire_time_order() {
        let mut scheduler = TaskScheduler::new();
        let now = Utc::now();
        scheduler.schedule_at(now - Duration::seconds(5), 1, news_task("b"));
        scheduler.schedule_at(now - Duration::seconds(30), 1, news_task("a"));
        scheduler.schedule_at(now - Duration::seconds(1), 1, news_task("c"));

        let fired = scheduler.run_due(now);
        assert_eq!(fired, vec![news_task("a"), news_task("b"), news_task("c")]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn run_due_never_fires_future_entries() {
        let mut scheduler = TaskScheduler::new();
        let now = Utc::now();
        let handle =
            scheduler.schedule_at(now + Duration::hours(1), 1, news_task("later"));

        assert!(scheduler.run_due(now).is_empty());
        assert!(scheduler.contains(handle));
    }

    #[test]
    fn equal_fire_times_break_ties_on_priority_then_insertion() {
        let mut scheduler = TaskScheduler::new();
        let at = Utc::now() - Duration::seconds(1);
        scheduler.schedule_at(at, 2, news_task("low"));
        scheduler.schedule_at(at, 1, news_task("high"));
        scheduler.schedule_at(at, 1, news_task("high-later"));

        let fired = scheduler.run_due(Utc::now());
        assert_eq!(
            fired,
            vec![news_task("high"), news_task("high-later"), news_task("low")]
        );
    }

    #[test]
    fn cancel_removes_pending_entry_and_is_idempotent() {
        let mut scheduler = TaskScheduler::new();
        let now = Utc::now();
        let handle =
            scheduler.schedule_at(now - Duration::seconds(1), 1, news_task("x"));

        scheduler.cancel(handle);
        assert!(!scheduler.contains(handle));
        assert!(scheduler.run_due(now).is_empty());

        // Cancelling again, or cancelling a fired handle, must not error.
        scheduler.cancel(handle);
    }

    #[test]
    fn cancel_after_fire_is_a_no_op() {
        let mut scheduler = TaskScheduler::new();
        let now = Utc::now();
        let handle =
            scheduler.schedule_at(now - Duration::seconds(1), 1, news_task("x"));
        let kept =
            scheduler.schedule_at(now + Duration::hours(2), 1, news_task("y"));

        assert_eq!(scheduler.run_due(now).len(), 1);
        scheduler.cancel(handle);
        assert!(scheduler.contains(kept));
        assert_eq!(scheduler.len(), 1);
    }
}
