// src/client.rs
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use std::time::Duration;

use crate::config::StockInfoConfig;
use crate::error::StockInfoError;

/// A fetched page: where the request ended up after redirects, and its HTML.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub body: String,
}

impl Page {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
        }
    }

    /// The site redirects unknown tickers to its `/error` route.
    pub fn is_error_route(&self) -> bool {
        match url::Url::parse(&self.url) {
            Ok(parsed) => parsed.path().contains("/error"),
            Err(_) => self.url.contains("/error"),
        }
    }
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<Page, StockInfoError>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &StockInfoConfig) -> Result<Self, StockInfoError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| StockInfoError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<Page, StockInfoError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                warn!("Request to {} failed: {}", url, e);
                StockInfoError::fetch(url, e)
            })?;

        let final_url = response.url().to_string();
        debug!("{} answered {} from {}", url, response.status(), final_url);

        let body = response
            .text()
            .await
            .map_err(|e| StockInfoError::fetch(url, e))?;

        Ok(Page::new(final_url, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_route_is_detected_from_the_final_url() {
        assert!(Page::new("https://statusinvest.com.br/error/404", "").is_error_route());
        assert!(Page::new("https://statusinvest.com.br/error?code=404", "").is_error_route());
        assert!(!Page::new("https://statusinvest.com.br/acoes/flry3", "").is_error_route());
    }

    #[test]
    fn error_in_the_query_string_is_not_an_error_route() {
        let page = Page::new("https://statusinvest.com.br/acoes/flry3?from=/error", "");
        assert!(!page.is_error_route());
    }
}
