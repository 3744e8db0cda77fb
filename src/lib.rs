// src/lib.rs
pub mod config;
pub mod error;
pub mod types;
pub mod client;
pub mod parsers;
pub mod formatters;
pub mod selectors;
pub mod extract;
pub mod record;
pub mod factory;

// Optional re-exports
pub use client::{Fetcher, HttpFetcher, Page};
pub use config::StockInfoConfig;
pub use error::StockInfoError;
pub use factory::StockFactory;
pub use record::Record;
pub use selectors::{registry, FieldSpec, Registry};
pub use types::{AssetKind, FieldValue};
