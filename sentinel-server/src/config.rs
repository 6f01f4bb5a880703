use anyhow::Context;
use std::env;

use sentinel_core::{FetchTargets, LocationKind};

/// Server configuration loaded from environment variables (a `.env` file is
/// honoured when present). Every field has a default so a bare environment
/// still boots against the public endpoints.
#[derive(Debug, Clone)]
pub struct Config {
    // Server settings
    pub server_host: String,
    pub server_port: u16,

    // Statistics settings
    pub local_location: String,
    pub local_location_kind: LocationKind,
    pub national_location: String,
    pub stats_api_base: String,

    // News settings
    pub news_api_base: String,
    pub news_api_key: String,
    pub news_search_terms: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let local_location_kind = env::var("LOCAL_LOCATION_KIND")
            .unwrap_or_else(|_| "ltla".to_string())
            .parse::<LocationKind>()
            .map_err(|err| anyhow::anyhow!(err))
            .context("LOCAL_LOCATION_KIND is not a known granularity")?;

        Ok(Self {
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),

            local_location: env::var("LOCAL_LOCATION")
                .unwrap_or_else(|_| "Exeter".to_string()),
            local_location_kind,
            national_location: env::var("NATIONAL_LOCATION")
                .unwrap_or_else(|_| "England".to_string()),
            stats_api_base: env::var("COVID_API_BASE").unwrap_or_else(|_| {
                "https://api.coronavirus.data.gov.uk/v1/data".to_string()
            }),

            news_api_base: env::var("NEWS_API_BASE").unwrap_or_else(|_| {
                "https://newsapi.org/v2/everything".to_string()
            }),
            news_api_key: env::var("NEWS_API_KEY").unwrap_or_default(),
            news_search_terms: env::var("NEWS_SEARCH_TERMS")
                .unwrap_or_else(|_| "Covid COVID-19 coronavirus".to_string()),
        })
    }

    /// The fixed fetch destinations dispatched callbacks target.
    pub fn fetch_targets(&self) -> FetchTargets {
        FetchTargets {
            local_location: self.local_location.clone(),
            local_kind: self.local_location_kind,
            national_location: self.national_location.clone(),
            news_terms: self.news_search_terms.clone(),
        }
    }
}
