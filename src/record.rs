// src/record.rs
use serde::ser::{self, Serialize, SerializeMap, Serializer};
use serde_json::ser::PrettyFormatter;
use std::fmt;

use crate::error::StockInfoError;
use crate::selectors::registry;
use crate::types::{AssetKind, FieldValue};

/// Field names starting with this prefix are bookkeeping aliases and stay
/// out of the default serialization.
pub const INTERNAL_PREFIX: &str = "_";

const JSON_INDENT: &[u8] = b"    ";

/// Flat result of applying a registry to one fetched page.
///
/// Keys keep insertion order. A key with a `None` value was looked for but
/// could not be extracted.
#[derive(Clone, PartialEq)]
pub struct Record {
    kind: AssetKind,
    entries: Vec<(String, Option<FieldValue>)>,
}

impl Record {
    pub fn from_entries<I, K>(kind: AssetKind, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<FieldValue>)>,
        K: Into<String>,
    {
        let mut record = Self::new(kind);
        for (name, value) in entries {
            record.insert(name, value);
        }
        record
    }

    pub(crate) fn new(kind: AssetKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: Option<FieldValue>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Extracted value, `None` when absent or when the key is unknown.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .and_then(|(_, v)| v.as_ref())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&FieldValue>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn attributes(&self, display_internal: bool) -> Vec<&str> {
        self.entries
            .iter()
            .map(|(k, _)| k.as_str())
            .filter(|k| display_internal || !is_internal(k))
            .collect()
    }

    pub fn ticker(&self) -> Option<&str> {
        self.get("_ticker").and_then(FieldValue::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.get("_name").and_then(FieldValue::as_str)
    }

    pub fn current_value(&self) -> Option<&FieldValue> {
        self.get("_current_value")
    }

    /// Value rendered with its field's unit formatter, if it has one.
    pub fn formatted(&self, name: &str) -> Option<String> {
        let value = self.get(name)?;
        let formatter = registry(self.kind).get(name).and_then(|spec| spec.formatter);
        Some(match formatter {
            Some(render) => render(value),
            None => value.to_string(),
        })
    }

    /// Four-space indented JSON object of the public fields.
    pub fn to_json(&self) -> Result<String, StockInfoError> {
        self.to_json_with(false)
    }

    pub fn to_json_with(&self, display_internal: bool) -> Result<String, StockInfoError> {
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(JSON_INDENT));
        RecordView {
            record: self,
            display_internal,
        }
        .serialize(&mut serializer)?;

        String::from_utf8(buf).map_err(|e| StockInfoError::Serialization(ser::Error::custom(e)))
    }
}

fn is_internal(name: &str) -> bool {
    name.starts_with(INTERNAL_PREFIX)
}

struct RecordView<'a> {
    record: &'a Record,
    display_internal: bool,
}

impl Serialize for RecordView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let visible: Vec<_> = self
            .record
            .entries
            .iter()
            .filter(|(k, _)| self.display_internal || !is_internal(k))
            .collect();

        let mut map = serializer.serialize_map(Some(visible.len()))?;
        for (name, value) in visible {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RecordView {
            record: self,
            display_internal: false,
        }
        .serialize(serializer)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = self.to_json().map_err(|_| fmt::Error)?;
        write!(f, "{}", json)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Record(kind={}, ticker={:?}, name={:?}, value={})",
            self.kind,
            self.ticker(),
            self.name(),
            self.current_value()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "None".to_string())
        )
    }
}
