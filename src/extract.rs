// src/extract.rs
use log::debug;
use scraper::{Html, Selector};
use thiserror::Error;

use crate::parsers::ParseError;
use crate::record::Record;
use crate::selectors::{FieldSpec, Registry};
use crate::types::FieldValue;

/// Why a single field came out empty. Never escapes `extract`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionMiss {
    #[error("selector matched nothing")]
    NoMatch,

    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    #[error("transform failed: {0}")]
    Transform(#[from] ParseError),
}

/// Applies every field of `registry` to `document`.
///
/// Each field is resolved on its own; a miss stores `None` under the field
/// name and the walk carries on.
pub fn extract(document: &Html, registry: &Registry) -> Record {
    let mut record = Record::new(registry.kind());

    for spec in registry.iter() {
        let value = match resolve_field(document, spec) {
            Ok(value) => Some(value),
            Err(miss) => {
                debug!("{}: {} ({})", spec.name, miss, spec.query);
                None
            }
        };

        record.insert(spec.name, value.clone());
        if let Some(alias) = spec.canonical {
            record.insert(alias, value);
        }
    }

    record
}

/// Text of the first element matching `query`, descendants included, with
/// whitespace runs collapsed to one space.
pub fn first_text(document: &Html, query: &str) -> Result<String, ExtractionMiss> {
    let selector =
        Selector::parse(query).map_err(|e| ExtractionMiss::InvalidSelector(format!("{:?}", e)))?;

    document
        .select(&selector)
        .next()
        .map(|element| {
            let raw = element.text().collect::<String>();
            raw.split_whitespace().collect::<Vec<_>>().join(" ")
        })
        .ok_or(ExtractionMiss::NoMatch)
}

pub fn resolve_field(document: &Html, spec: &FieldSpec) -> Result<FieldValue, ExtractionMiss> {
    let text = first_text(document, spec.query)?;

    spec.transforms
        .iter()
        .try_fold(FieldValue::Text(text), |value, transform| transform.apply(value))
        .map_err(ExtractionMiss::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::Transform;
    use crate::types::AssetKind;

    const PAGE: &str = r#"
        <html><body>
            <h1 class="lh-4">LREN3 - Lojas Renner S.A.</h1>
            <ul>
                <li><span>Preço</span><strong class="price">R$ 13,20</strong></li>
                <li><span>Volume</span><strong class="volume">1.234.567</strong></li>
                <li><span>P/L</span><strong class="pl">-</strong></li>
            </ul>
        </body></html>
    "#;

    fn registry() -> Registry {
        Registry::overlay(
            AssetKind::Equity,
            &[
                FieldSpec::new("ticker", "h1.lh-4")
                    .transforms(&[Transform::Ticker])
                    .canonical("_ticker"),
                FieldSpec::number("price", "li > strong.price").currency(),
                FieldSpec::number("volume", "strong.volume"),
                FieldSpec::number("p_l", "strong.pl"),
                FieldSpec::number("roe", "strong.roe"),
                FieldSpec::new("broken", "div[[["),
                FieldSpec::new("raw_price", "strong.price").transforms(&[Transform::Currency]),
            ],
            &[],
        )
    }

    #[test]
    fn every_field_becomes_a_key() {
        let record = extract(&Html::parse_document(PAGE), &registry());
        assert_eq!(
            record.attributes(true),
            vec!["ticker", "_ticker", "price", "volume", "p_l", "roe", "broken", "raw_price"]
        );
    }

    #[test]
    fn matched_fields_are_transformed() {
        let record = extract(&Html::parse_document(PAGE), &registry());
        assert_eq!(record.ticker(), Some("LREN3"));
        assert_eq!(record.get("ticker"), Some(&FieldValue::from("LREN3")));
        assert_eq!(record.get("price"), Some(&FieldValue::Float(13.2)));
        assert_eq!(record.get("volume"), Some(&FieldValue::Integer(1_234_567)));
        assert_eq!(record.get("raw_price"), Some(&FieldValue::Float(13.2)));
    }

    #[test]
    fn misses_only_blank_their_own_field() {
        let record = extract(&Html::parse_document(PAGE), &registry());
        assert_eq!(record.get("p_l"), None);
        assert_eq!(record.get("roe"), None);
        assert_eq!(record.get("broken"), None);
        assert!(record.get("volume").is_some());
    }

    #[test]
    fn miss_reasons() {
        let doc = Html::parse_document(PAGE);
        let reg = registry();
        assert_eq!(resolve_field(&doc, reg.get("roe").unwrap()), Err(ExtractionMiss::NoMatch));
        assert!(matches!(
            resolve_field(&doc, reg.get("broken").unwrap()),
            Err(ExtractionMiss::InvalidSelector(_))
        ));
        assert!(matches!(
            resolve_field(&doc, reg.get("p_l").unwrap()),
            Err(ExtractionMiss::Transform(ParseError::InvalidNumber(_)))
        ));
    }

    #[test]
    fn first_match_wins() {
        let doc = Html::parse_document("<p class='v'> first </p><p class='v'>second</p>");
        assert_eq!(first_text(&doc, "p.v").as_deref(), Ok("first"));
    }

    #[test]
    fn wrapped_heading_text_is_collapsed() {
        let doc = Html::parse_document(
            "<h1 class='lh-4'>FLRY3 -\n      Fleury\n      <small>S.A.</small></h1>",
        );
        assert_eq!(first_text(&doc, "h1.lh-4").as_deref(), Ok("FLRY3 - Fleury S.A."));

        let name = FieldSpec::new("name", "h1.lh-4").transforms(&[Transform::Name]);
        assert_eq!(resolve_field(&doc, &name), Ok(FieldValue::from("Fleury S.A.")));
        let record = extract(&doc, &registry());
        assert_eq!(record.ticker(), Some("FLRY3"));
    }

    #[test]
    fn transforms_run_in_declared_order() {
        let doc = Html::parse_document("<span class='chain'>A - B - C</span>");

        let middle =
            FieldSpec::new("middle", "span.chain").transforms(&[Transform::Name, Transform::Ticker]);
        assert_eq!(resolve_field(&doc, &middle), Ok(FieldValue::from("B")));

        // "A" has no second segment left for the name step
        let reversed =
            FieldSpec::new("middle", "span.chain").transforms(&[Transform::Ticker, Transform::Name]);
        assert!(matches!(
            resolve_field(&doc, &reversed),
            Err(ExtractionMiss::Transform(ParseError::MissingSegment(_)))
        ));
    }

    #[test]
    fn empty_document_gives_all_absent_record() {
        let reg = registry();
        let record = extract(&Html::parse_document(""), &reg);
        assert_eq!(record.len(), reg.len() + 1);
        assert!(record.iter().all(|(_, v)| v.is_none()));
    }
}
