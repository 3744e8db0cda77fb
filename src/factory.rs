// src/factory.rs
use log::{info, warn};
use scraper::Html;

use crate::client::{Fetcher, HttpFetcher};
use crate::config::StockInfoConfig;
use crate::error::StockInfoError;
use crate::extract::extract;
use crate::record::Record;
use crate::selectors::registry;
use crate::types::AssetKind;

/// Builds one [`Record`] per ticker: fetch, check for the error route,
/// extract.
pub struct StockFactory<F = HttpFetcher> {
    config: StockInfoConfig,
    fetcher: F,
}

impl StockFactory<HttpFetcher> {
    pub fn new(config: StockInfoConfig) -> Result<Self, StockInfoError> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self { config, fetcher })
    }
}

impl<F: Fetcher> StockFactory<F> {
    pub fn with_fetcher(config: StockInfoConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &StockInfoConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetches and extracts `ticker`.
    ///
    /// Fails with [`StockInfoError::Fetch`] when the request cannot complete
    /// and [`StockInfoError::NotFound`] when the site routes the ticker to its
    /// error page. Fields that cannot be extracted are left absent.
    pub async fn create(&self, ticker: &str, kind: AssetKind) -> Result<Record, StockInfoError> {
        let url = self.config.url_for(ticker, kind);
        info!("Fetching {} {} from {}", kind, ticker, url);

        let page = self.fetcher.fetch(&url, self.config.timeout).await?;

        if page.is_error_route() {
            warn!("{} was routed to {}", ticker, page.url);
            return Err(StockInfoError::NotFound {
                ticker: ticker.to_string(),
            });
        }

        let document = Html::parse_document(&page.body);
        let record = extract(&document, registry(kind));

        let found = record.iter().filter(|(_, v)| v.is_some()).count();
        info!("{}: extracted {}/{} fields", ticker, found, record.len());

        Ok(record)
    }

    pub async fn create_stock(&self, ticker: &str) -> Result<Record, StockInfoError> {
        self.create(ticker, AssetKind::Equity).await
    }

    pub async fn create_fund(&self, ticker: &str) -> Result<Record, StockInfoError> {
        self.create(ticker, AssetKind::Fund).await
    }
}
