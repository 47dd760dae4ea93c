use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FetchError;
use crate::models::{Document, SourceSpec};

/// Retrieves the text content of a source URL
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, source: &SourceSpec) -> Result<Document, FetchError>;
}

/// Configuration for the Firecrawl scrape client
#[derive(Debug, Clone)]
pub struct FirecrawlConfig {
    /// API key (from FIRECRAWL_API_KEY env var)
    pub api_key: String,
    /// Base URL of the API
    pub base_url: String,
}

impl FirecrawlConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("FIRECRAWL_API_KEY")
            .context("FIRECRAWL_API_KEY environment variable not set")?;

        Ok(Self {
            api_key,
            base_url: "https://api.firecrawl.dev".to_string(),
        })
    }

    /// Create with custom settings
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: "https://api.firecrawl.dev".to_string(),
        }
    }
}

/// Firecrawl scrape API client
pub struct FirecrawlClient {
    client: Client,
    config: FirecrawlConfig,
}

impl FirecrawlClient {
    pub fn new(config: FirecrawlConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl ContentFetcher for FirecrawlClient {
    /// Scrape one URL and return its markdown body as a document
    async fn fetch(&self, source: &SourceSpec) -> Result<Document, FetchError> {
        let request = ScrapeRequest {
            url: source.url.clone(),
            formats: vec!["markdown".to_string()],
        };

        debug!("Scrape request for {}", source.url);

        let response = self
            .client
            .post(format!("{}/v1/scrape", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: source.url.clone(),
                source: e,
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                url: source.url.clone(),
                status,
                detail,
            });
        }

        let scrape: ScrapeResponse = response.json().await.map_err(|e| FetchError::Decode {
            url: source.url.clone(),
            source: e,
        })?;

        if !scrape.success {
            let detail = scrape
                .error
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(FetchError::Provider {
                url: source.url.clone(),
                detail,
            });
        }

        let data = scrape.data.unwrap_or_default();
        let body = data.markdown.unwrap_or_default();
        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody {
                url: source.url.clone(),
            });
        }

        let title = data
            .metadata
            .and_then(|m| m.title)
            .filter(|t| !t.is_empty());

        Ok(Document::new(source.clone(), title, body))
    }
}

#[derive(Debug, Serialize)]
struct ScrapeRequest {
    url: String,
    formats: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<ScrapeData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ScrapeData {
    #[serde(default)]
    markdown: Option<String>,
    #[serde(default)]
    metadata: Option<ScrapeMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct ScrapeMetadata {
    #[serde(default)]
    title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scrape_success() {
        let json = r##"{
            "success": true,
            "data": {
                "markdown": "# Headline\n\nArticle body.",
                "metadata": {
                    "title": "Headline",
                    "sourceURL": "https://news.example/story"
                }
            }
        }"##;

        let response: ScrapeResponse = serde_json::from_str(json).unwrap();
        assert!(response.success);
        let data = response.data.unwrap();
        assert_eq!(data.markdown.as_deref(), Some("# Headline\n\nArticle body."));
        assert_eq!(data.metadata.unwrap().title.as_deref(), Some("Headline"));
    }

    #[test]
    fn test_parse_scrape_provider_failure() {
        let json = r#"{"success": false, "error": "This website is not supported"}"#;
        let response: ScrapeResponse = serde_json::from_str(json).unwrap();
        assert!(!response.success);
        assert_eq!(
            response.error.as_deref(),
            Some("This website is not supported")
        );
    }

    #[test]
    fn test_parse_scrape_missing_fields() {
        let response: ScrapeResponse = serde_json::from_str("{}").unwrap();
        assert!(!response.success);
        assert!(response.data.is_none());
        assert!(response.error.is_none());
    }

    #[test]
    fn test_scrape_request_serialization() {
        let request = ScrapeRequest {
            url: "https://news.example/story".to_string(),
            formats: vec!["markdown".to_string()],
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"url":"https://news.example/story","formats":["markdown"]}"#
        );
    }
}
