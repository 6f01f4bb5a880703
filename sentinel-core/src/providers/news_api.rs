//! Client for the NewsAPI `everything` endpoint.

use serde::Deserialize;

use super::{NewsProvider, ProviderError};
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// One raw query response, appended verbatim to the news log.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone)]
pub struct NewsApiProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NewsApiProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl NewsProvider for NewsApiProvider {
    async fn fetch(&self, terms: &str) -> Result<NewsResponse, ProviderError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("q", terms), ("apiKey", &self.api_key)])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<NewsResponse>()
                .await
                .map_err(ProviderError::from);
        }

        // NewsAPI reports failures as {"status":"error","message":...}.
        #[derive(Debug, Deserialize)]
        struct NewsErrorBody {
            #[serde(default)]
            message: Option<String>,
        }

        let message = response
            .json::<NewsErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| {
                format!("news request failed with status {status}")
            });

        match status.as_u16() {
            401 => Err(ProviderError::InvalidApiKey),
            429 => Err(ProviderError::RateLimited),
            _ => Err(ProviderError::ApiError(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_deserializes() {
        let body = serde_json::json!({
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {
                    "title": "Booster rollout expands",
                    "description": "All adults become eligible.",
                    "url": "https://example.com/boosters"
                },
                {
                    "title": "Case numbers fall",
                    "description": null,
                    "url": null
                }
            ]
        });
        let response: NewsResponse =
            serde_json::from_value(body).expect("deserializes");
        assert_eq!(response.total_results, Some(2));
        assert_eq!(response.articles.len(), 2);
        assert_eq!(response.articles[0].title, "Booster rollout expands");
        assert!(response.articles[1].description.is_none());
    }

    #[test]
    fn missing_articles_field_yields_empty_list() {
        let response: NewsResponse =
            serde_json::from_value(serde_json::json!({ "status": "error" }))
                .expect("deserializes");
        assert!(response.articles.is_empty());
    }
}
