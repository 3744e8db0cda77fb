// src/config.rs
use anyhow::{Context, Result};
use std::time::Duration;

use crate::types::AssetKind;

pub const DEFAULT_BASE_URL: &str = "https://statusinvest.com.br/acoes/%s";
pub const DEFAULT_TIMEOUT_SECS: u64 = 1;
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Placeholder replaced by the ticker in URL templates.
pub const TICKER_PLACEHOLDER: &str = "%s";

#[derive(Clone, Debug)]
pub struct StockInfoConfig {
    /// URL template containing `%s` where the ticker goes.
    pub base_url: String,
    /// Template used for funds; falls back to `base_url` when unset.
    pub fund_base_url: Option<String>,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for StockInfoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            fund_base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl StockInfoConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        validate_template(&base_url)?;
        Ok(Self {
            base_url,
            timeout,
            ..Self::default()
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        validate_template(&base_url)?;
        self.base_url = base_url;
        Ok(self)
    }

    pub fn with_fund_base_url(mut self, fund_base_url: impl Into<String>) -> Result<Self> {
        let fund_base_url = fund_base_url.into();
        validate_template(&fund_base_url)?;
        self.fund_base_url = Some(fund_base_url);
        Ok(self)
    }

    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("B3_BASE_URL") {
            validate_template(&base_url)?;
            config.base_url = base_url;
        }
        if let Ok(fund_base_url) = std::env::var("B3_FUND_BASE_URL") {
            validate_template(&fund_base_url)?;
            config.fund_base_url = Some(fund_base_url);
        }
        if let Ok(secs) = std::env::var("B3_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("B3_TIMEOUT_SECS must be a whole number of seconds, got {:?}", secs))?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Ok(user_agent) = std::env::var("B3_USER_AGENT") {
            config.user_agent = user_agent;
        }

        Ok(config)
    }

    pub fn template(&self, kind: AssetKind) -> &str {
        match (kind, &self.fund_base_url) {
            (AssetKind::Fund, Some(fund)) => fund,
            _ => &self.base_url,
        }
    }

    /// Page URL for `ticker`, URL-encoded into the template.
    pub fn url_for(&self, ticker: &str, kind: AssetKind) -> String {
        self.template(kind)
            .replace(TICKER_PLACEHOLDER, &urlencoding::encode(ticker))
    }
}

fn validate_template(template: &str) -> Result<()> {
    if !template.contains(TICKER_PLACEHOLDER) {
        anyhow::bail!("URL template {:?} has no `{}` placeholder", template, TICKER_PLACEHOLDER);
    }
    url::Url::parse(&template.replace(TICKER_PLACEHOLDER, "ticker"))
        .with_context(|| format!("URL template {:?} is not a valid URL", template))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_statusinvest() {
        let config = StockInfoConfig::default();
        assert_eq!(
            config.url_for("flry3", AssetKind::Equity),
            "https://statusinvest.com.br/acoes/flry3"
        );
        assert_eq!(config.timeout, Duration::from_secs(1));
    }

    #[test]
    fn fund_template_falls_back_to_base() {
        let config = StockInfoConfig::default();
        assert_eq!(config.template(AssetKind::Fund), DEFAULT_BASE_URL);

        let config = config
            .with_fund_base_url("https://statusinvest.com.br/fundos-imobiliarios/%s")
            .unwrap();
        assert_eq!(
            config.url_for("hglg11", AssetKind::Fund),
            "https://statusinvest.com.br/fundos-imobiliarios/hglg11"
        );
        assert_eq!(
            config.url_for("hglg11", AssetKind::Equity),
            "https://statusinvest.com.br/acoes/hglg11"
        );
    }

    #[test]
    fn ticker_is_url_encoded() {
        let config = StockInfoConfig::default();
        assert_eq!(
            config.url_for("a b/c", AssetKind::Equity),
            "https://statusinvest.com.br/acoes/a%20b%2Fc"
        );
    }

    #[test]
    fn templates_are_validated() {
        assert!(StockInfoConfig::new("https://example.com/acoes/", Duration::from_secs(1)).is_err());
        assert!(StockInfoConfig::new("not a url %s", Duration::from_secs(1)).is_err());
        assert!(StockInfoConfig::new("http://localhost:8080/%s", Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn base_url_can_be_replaced_after_construction() {
        let config = StockInfoConfig {
            timeout: Duration::from_secs(3),
            ..StockInfoConfig::default()
        }
        .with_base_url("http://localhost:8080/quote/%s")
        .unwrap();
        assert_eq!(
            config.url_for("flry3", AssetKind::Equity),
            "http://localhost:8080/quote/flry3"
        );
        assert_eq!(config.timeout, Duration::from_secs(3));

        assert!(StockInfoConfig::default().with_base_url("http://localhost:8080/quote").is_err());
        assert!(StockInfoConfig::default().with_fund_base_url("fii/%s").is_err());
    }
}
