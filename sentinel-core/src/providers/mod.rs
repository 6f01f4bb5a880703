//! External data providers.
//!
//! Both providers normalize the upstream wire format into the types the
//! snapshot store consumes; the series index contracts (which entries hold
//! the display figures) live here, not in the store.

mod covid_api;
mod news_api;

pub use covid_api::{CaseRecord, CaseTimeSeries, CovidApiProvider};
pub use news_api::{Article, NewsApiProvider, NewsResponse};

use async_trait::async_trait;
use std::str::FromStr;

/// Geographic granularity accepted by the statistics provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    Overview,
    Nation,
    Region,
    Utla,
    Ltla,
}

impl LocationKind {
    /// The `areaType` value the upstream API expects.
    pub fn as_area_type(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Nation => "nation",
            Self::Region => "region",
            Self::Utla => "utla",
            Self::Ltla => "ltla",
        }
    }

    /// Nation-scope fetches land in the national snapshot; every other
    /// granularity is treated as local.
    pub fn is_national(self) -> bool {
        matches!(self, Self::Nation)
    }
}

impl FromStr for LocationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overview" => Ok(Self::Overview),
            "nation" => Ok(Self::Nation),
            "region" => Ok(Self::Region),
            "utla" => Ok(Self::Utla),
            "ltla" => Ok(Self::Ltla),
            other => Err(format!("unknown location kind '{other}'")),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Not found")]
    NotFound,

    #[error("Rate limited")]
    RateLimited,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Fetches a case time series for one location at one granularity.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    async fn fetch(
        &self,
        location: &str,
        kind: LocationKind,
    ) -> Result<CaseTimeSeries, ProviderError>;
}

/// Fetches the latest headlines matching a set of search terms.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn fetch(&self, terms: &str) -> Result<NewsResponse, ProviderError>;
}
