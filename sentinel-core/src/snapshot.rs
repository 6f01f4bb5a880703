//! Process-wide snapshots of the most recently fetched data.
//!
//! Statistics snapshots are overwritten wholesale on each successful fetch
//! and left untouched on failure. News responses are appended to a log; the
//! newest entry is what the page shows, and dismissing an article edits
//! that entry in place.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use crate::providers::{CaseTimeSeries, NewsResponse};

/// Local-scope statistics snapshot.
#[derive(Debug, Clone, Default)]
pub struct LocalStats {
    pub location: Option<String>,
    pub seven_day_cases: Option<i64>,
    pub last_update: Option<DateTime<Utc>>,
}

/// Cumulative deaths as reported on a specific date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeathFigure {
    pub as_of: NaiveDate,
    pub total: i64,
}

/// National-scope statistics snapshot; carries the two extra display
/// figures the local snapshot lacks.
#[derive(Debug, Clone, Default)]
pub struct NationalStats {
    pub location: Option<String>,
    pub seven_day_cases: Option<i64>,
    pub hospital_cases: Option<i64>,
    pub deaths: Option<DeathFigure>,
    pub last_update: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub struct SnapshotStore {
    local: LocalStats,
    national: NationalStats,
    news_log: Vec<NewsResponse>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn local(&self) -> &LocalStats {
        &self.local
    }

    pub fn national(&self) -> &NationalStats {
        &self.national
    }

    /// Overwrite the local snapshot from a fetched series.
    pub fn store_local(&mut self, series: &CaseTimeSeries, fetched_at: DateTime<Utc>) {
        self.local = LocalStats {
            location: series.area_name().map(str::to_string),
            seven_day_cases: Some(series.seven_day_cases()),
            last_update: Some(fetched_at),
        };
        info!(location = ?self.local.location, "local statistics snapshot updated");
    }

    /// Overwrite the national snapshot from a fetched series.
    pub fn store_national(&mut self, series: &CaseTimeSeries, fetched_at: DateTime<Utc>) {
        self.national = NationalStats {
            location: series.area_name().map(str::to_string),
            seven_day_cases: Some(series.seven_day_cases()),
            hospital_cases: series.current_hospital_cases(),
            deaths: series
                .latest_deaths()
                .map(|(as_of, total)| DeathFigure { as_of, total }),
            last_update: Some(fetched_at),
        };
        info!(location = ?self.national.location, "national statistics snapshot updated");
    }

    /// Append one raw news response to the log.
    pub fn push_news(&mut self, response: NewsResponse) {
        info!(articles = response.articles.len(), "news snapshot appended");
        self.news_log.push(response);
    }

    /// The authoritative entry for display.
    pub fn latest_news(&self) -> Option<&NewsResponse> {
        self.news_log.last()
    }

    /// Remove the first article in the latest log entry whose title matches.
    /// A non-existent title is a no-op; returns whether anything was removed.
    pub fn dismiss_article(&mut self, title: &str) -> bool {
        let Some(latest) = self.news_log.last_mut() else {
            return false;
        };
        let Some(index) = latest
            .articles
            .iter()
            .position(|article| article.title == title)
        else {
            return false;
        };
        latest.articles.remove(index);
        info!(%title, "article dismissed");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::Article;

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            description: None,
            url: None,
        }
    }

    fn response(titles: &[&str]) -> NewsResponse {
        NewsResponse {
            status: Some("ok".to_string()),
            total_results: Some(titles.len() as u64),
            articles: titles.iter().map(|title| article(title)).collect(),
        }
    }

    #[test]
    fn dismiss_removes_exactly_one_matching_article() {
        let mut store = SnapshotStore::new();
        store.push_news(response(&["a", "b", "a", "c"]));

        assert!(store.dismiss_article("a"));

        let titles: Vec<&str> = store
            .latest_news()
            .expect("log entry")
            .articles
            .iter()
            .map(|article| article.title.as_str())
            .collect();
        assert_eq!(titles, vec!["b", "a", "c"]);
    }

    #[test]
    fn dismiss_unknown_title_is_a_no_op() {
        let mut store = SnapshotStore::new();
        store.push_news(response(&["a", "b"]));

        assert!(!store.dismiss_article("zzz"));
        assert_eq!(store.latest_news().expect("log entry").articles.len(), 2);
    }

    #[test]
    fn dismiss_with_empty_log_is_a_no_op() {
        let mut store = SnapshotStore::new();
        assert!(!store.dismiss_article("anything"));
    }

    #[test]
    fn dismiss_only_edits_the_latest_entry() {
        let mut store = SnapshotStore::new();
        store.push_news(response(&["old"]));
        store.push_news(response(&["new"]));

        assert!(!store.dismiss_article("old"));
        assert!(store.dismiss_article("new"));
    }

    #[test]
    fn latest_news_tracks_appends() {
        let mut store = SnapshotStore::new();
        assert!(store.latest_news().is_none());

        store.push_news(response(&["first"]));
        store.push_news(response(&["second"]));
        assert_eq!(
            store.latest_news().expect("log entry").articles[0].title,
            "second"
        );
    }
}
