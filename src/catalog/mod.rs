//! Catalog module - loading and normalizing record summaries / 目录模块
//!
//! The loader is the only part of the crate that touches the network or the
//! filesystem, and it runs once per service.

pub mod loader;
pub mod schema;

pub use loader::{fetch_catalog, load_catalog, parse_catalog, CatalogSource, LoadedCatalog};
pub use schema::{LoadReport, RawEntry, Record, KNOWN_REALMS};
