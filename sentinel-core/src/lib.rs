//! # Sentinel Core
//!
//! Domain logic for the Sentinel dashboard:
//!
//! - **Update registry**: the state machine behind user-scheduled data
//!   refreshes (one-off or repeating)
//! - **Scheduler pair**: independent time-ordered task queues for the
//!   statistics and news domains
//! - **Snapshot store**: the most recently fetched statistics and news,
//!   overwritten wholesale on each successful fetch
//! - **Providers**: HTTP clients for the UK coronavirus API and NewsAPI
//! - **Report**: offline processing of the historical statistics CSV

pub mod dashboard;
pub mod error;
pub mod providers;
pub mod registry;
pub mod report;
pub mod scheduler;
pub mod snapshot;

pub use dashboard::Dashboard;
pub use error::ScheduleError;
pub use providers::{
    LocationKind, NewsProvider, ProviderError, StatsProvider,
};
pub use registry::{FetchTargets, UpdateItem, UpdateRegistry, UpdateRequest};
pub use scheduler::{FetchTask, SchedulerPair, TaskHandle, TaskScheduler};
pub use snapshot::SnapshotStore;
