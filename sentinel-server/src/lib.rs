//! # Sentinel Server
//!
//! Web dashboard for cached COVID-19 statistics and news headlines.
//!
//! Every page view runs the full update pipeline: a registry
//! reconciliation pass, a poll of both schedulers (executing any due
//! fetches inline), and a render of the snapshot store. Scheduling,
//! article dismissal, and update cancellation arrive as query parameters
//! on `/index`.

pub mod config;
pub mod handlers;
pub mod render;
pub mod routes;
pub mod startup;
pub mod state;

pub use config::Config;
pub use state::AppState;
