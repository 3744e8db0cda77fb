// src/selectors.rs
//! Field tables for the statusinvest summary pages.
//!
//! Every metric is located by a positional CSS selector and converted by a
//! short transform chain. Equity and fund pages share a base table and each
//! overlay their own entries on top of it.
use once_cell::sync::Lazy;

use crate::formatters::{fmt_currency, fmt_percentage, Formatter, CURRENCY, PERCENTAGE};
use crate::parsers::Transform;
use crate::types::AssetKind;

/// How one metric is found on the page and turned into a value.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub query: &'static str,
    pub transforms: &'static [Transform],
    pub unit: Option<&'static str>,
    pub formatter: Option<Formatter>,
    /// Internal alias stored next to the public field (always `_`-prefixed).
    pub canonical: Option<&'static str>,
}

impl FieldSpec {
    pub fn new(name: &'static str, query: &'static str) -> Self {
        Self {
            name,
            query,
            transforms: &[],
            unit: None,
            formatter: None,
            canonical: None,
        }
    }

    pub fn number(name: &'static str, query: &'static str) -> Self {
        Self::new(name, query).transforms(&[Transform::Number])
    }

    pub fn transforms(self, transforms: &'static [Transform]) -> Self {
        Self { transforms, ..self }
    }

    pub fn canonical(self, alias: &'static str) -> Self {
        Self {
            canonical: Some(alias),
            ..self
        }
    }

    pub fn currency(self) -> Self {
        Self {
            unit: Some(CURRENCY),
            formatter: Some(fmt_currency),
            ..self
        }
    }

    pub fn percentage(self) -> Self {
        Self {
            unit: Some(PERCENTAGE),
            formatter: Some(fmt_percentage),
            ..self
        }
    }
}

/// The complete, name-unique field set for one asset kind.
#[derive(Debug, Clone)]
pub struct Registry {
    kind: AssetKind,
    fields: Vec<FieldSpec>,
}

impl Registry {
    /// Key-wise overlay: an overlay entry replaces the base entry with the same
    /// name in place; new names are appended in overlay order.
    pub fn overlay(kind: AssetKind, base: &[FieldSpec], overlay: &[FieldSpec]) -> Self {
        let mut fields: Vec<FieldSpec> = Vec::with_capacity(base.len() + overlay.len());

        for spec in base.iter().chain(overlay) {
            match fields.iter_mut().find(|f| f.name == spec.name) {
                Some(slot) => *slot = *spec,
                None => fields.push(*spec),
            }
        }

        Self { kind, fields }
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|f| f.name == name || f.canonical == Some(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Registry for the given page layout.
pub fn registry(kind: AssetKind) -> &'static Registry {
    match kind {
        AssetKind::Equity => &EQUITY,
        AssetKind::Fund => &FUND,
    }
}

static EQUITY: Lazy<Registry> =
    Lazy::new(|| Registry::overlay(AssetKind::Equity, &base_fields(), &equity_fields()));

static FUND: Lazy<Registry> =
    Lazy::new(|| Registry::overlay(AssetKind::Fund, &base_fields(), &fund_fields()));

fn base_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("ticker", "h1.lh-4")
            .transforms(&[Transform::Ticker])
            .canonical("_ticker"),
        FieldSpec::new("name", "h1.lh-4")
            .transforms(&[Transform::Name])
            .canonical("_name"),
        FieldSpec::number(
            "current_value",
            ".special > div:nth-child(1) > div:nth-child(1) > strong:nth-child(3)",
        )
        .currency()
        .canonical("_current_value"),
        FieldSpec::number(
            "min_52_weeks",
            "div.w-50:nth-child(2) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(3)",
        ),
        FieldSpec::number(
            "max_52_weeks",
            "div.w-50:nth-child(3) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(3)",
        ),
        FieldSpec::number(
            "min_month",
            "div.w-50:nth-child(2) > div:nth-child(1) > div:nth-child(2) > div:nth-child(1) > span:nth-child(2)",
        ),
        FieldSpec::number(
            "max_month",
            "div.w-50:nth-child(3) > div:nth-child(1) > div:nth-child(2) > div:nth-child(1) > span:nth-child(2)",
        ),
        FieldSpec::number(
            "dividend_yield",
            "div.w-50:nth-child(4) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(2)",
        ),
        FieldSpec::number(
            "appreciation_12_months",
            "div.w-50:nth-child(5) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(3)",
        )
        .percentage(),
        FieldSpec::number(
            "appreciation_current_month",
            "div.w-50:nth-child(5) > div:nth-child(1) > div:nth-child(2) > div:nth-child(1) > span:nth-child(2) > b:nth-child(2)",
        )
        .percentage(),
    ]
}

fn equity_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new(
            "type",
            ".top-info-md-3 > div:nth-child(1) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(2)",
        )
        .canonical("_type"),
        FieldSpec::number(
            "average_daily_liquidity",
            ".top-info-md-3 > div:nth-child(3) > div:nth-child(1) > div:nth-child(1) > div:nth-child(2) > strong:nth-child(2)",
        ),
        FieldSpec::number(
            "ibov_share",
            ".top-info-md-3 > div:nth-child(4) > div:nth-child(1) > a:nth-child(1) > div:nth-child(1) > div:nth-child(3) > strong:nth-child(1)",
        )
        .percentage(),
        FieldSpec::number("options_market", "strong.mr-1"),
        FieldSpec::number(
            "p_vp",
            "div.width-auto:nth-child(2) > div:nth-child(1) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(2)",
        ),
        FieldSpec::number(
            "p_l",
            "div.width-auto:nth-child(2) > div:nth-child(2) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(2)",
        ),
        FieldSpec::number(
            "p_ebitda",
            "div.width-auto:nth-child(2) > div:nth-child(3) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(2)",
        ),
        FieldSpec::number(
            "p_ebit",
            "div.width-auto:nth-child(2) > div:nth-child(4) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(2)",
        ),
        FieldSpec::number(
            "p_asset",
            "div.width-auto:nth-child(2) > div:nth-child(5) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(2)",
        ),
        FieldSpec::number(
            "ev_ebitda",
            "div.width-auto:nth-child(2) > div:nth-child(6) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(2)",
        ),
        FieldSpec::number(
            "ev_ebit",
            "div.width-auto:nth-child(2) > div:nth-child(7) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(2)",
        ),
        FieldSpec::number(
            "psr",
            "div.width-auto:nth-child(2) > div:nth-child(8) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(2)",
        ),
        FieldSpec::number(
            "p_working_capital",
            "div.width-auto:nth-child(2) > div:nth-child(9) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(2)",
        ),
        FieldSpec::number(
            "p_net_current_assets",
            "div.width-auto:nth-child(2) > div:nth-child(10) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(2)",
        ),
        FieldSpec::number(
            "gross_margin",
            "div.width-auto:nth-child(2) > div:nth-child(11) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(2)",
        ),
        FieldSpec::number(
            "ebitda_margin",
            "div.width-auto:nth-child(2) > div:nth-child(12) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(2)",
        ),
        FieldSpec::number(
            "ebit_margin",
            "div.info:nth-child(13) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(2)",
        ),
        FieldSpec::number(
            "net_margin",
            "div.info:nth-child(14) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(2)",
        ),
        FieldSpec::number(
            "asset_turnover",
            "div.info:nth-child(15) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(2)",
        ),
        FieldSpec::number(
            "roe",
            "div.info:nth-child(16) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(2)",
        ),
        FieldSpec::number(
            "roa",
            "div.info:nth-child(17) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(2)",
        ),
        FieldSpec::number(
            "roic",
            "div.info:nth-child(18) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(2)",
        ),
        FieldSpec::number(
            "lpa",
            "div.info:nth-child(19) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(2)",
        ),
        FieldSpec::number(
            "vpa",
            "div.info:nth-child(20) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(2)",
        ),
    ]
}

fn fund_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::number(
            "average_daily_liquidity",
            ".p-0 > div:nth-child(1) > div:nth-child(1) > div:nth-child(2) > strong:nth-child(2)",
        )
        .currency(),
        FieldSpec::number(
            "appreciation_12_months",
            "div.pb-7:nth-child(3) > div:nth-child(1) > div:nth-child(5) > div:nth-child(1) > div:nth-child(1) > strong:nth-child(3)",
        )
        .percentage(),
        FieldSpec::number(
            "appreciation_current_month",
            "div.pb-7:nth-child(3) > div:nth-child(1) > div:nth-child(5) > div:nth-child(1) > div:nth-child(2) > div:nth-child(1) > span:nth-child(2) > b:nth-child(2)",
        )
        .percentage(),
        FieldSpec::number(
            "net_worth",
            ".top-info-md-3 > div:nth-child(1) > div:nth-child(1) > div:nth-child(2) > span:nth-child(2)",
        )
        .currency(),
        FieldSpec::number("equity_value_per_share", "strong.value:nth-child(5)").currency(),
    ]
}
