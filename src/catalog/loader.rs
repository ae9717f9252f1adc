//! Catalog loader - the only step that performs I/O / 目录加载器
//!
//! - fetch_catalog: read the raw document from a file or an http(s) URL
//! - parse_catalog: validate the shape and normalize entries into records

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::Value;
use url::Url;

use super::schema::{LoadReport, RawEntry, Record};
use crate::error::CatalogError;

/// Where the catalog document lives / 目录文档的位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Path(PathBuf),
    Url(Url),
}

impl CatalogSource {
    /// Interpret a configured location: http(s) URLs are fetched, anything else is a path
    pub fn parse(location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => CatalogSource::Url(url),
            _ => CatalogSource::Path(PathBuf::from(location)),
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Path(path) => write!(f, "{}", path.display()),
            CatalogSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Records in load order plus the load report / 按加载顺序排列的记录
#[derive(Debug, Clone, Default)]
pub struct LoadedCatalog {
    pub records: Vec<Record>,
    pub report: LoadReport,
}

/// Fetch the raw catalog document / 获取原始目录文档
pub async fn fetch_catalog(source: &CatalogSource) -> Result<String, CatalogError> {
    match source {
        CatalogSource::Path(path) => tokio::fs::read_to_string(path).await.map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            source: e,
        }),
        CatalogSource::Url(url) => {
            let http_err = |e| CatalogError::Http {
                url: url.to_string(),
                source: e,
            };
            let response = reqwest::get(url.clone()).await.map_err(http_err)?;
            let status = response.status();
            if !status.is_success() {
                return Err(CatalogError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }
            response.text().await.map_err(http_err)
        }
    }
}

/// Top-level entries in document order, duplicate keys included / 按文档顺序的顶层条目
struct CatalogEntries(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for CatalogEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = CatalogEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of catalog entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, serde_json::Value>()? {
                    entries.push((key, value));
                }
                Ok(CatalogEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Parse and normalize a catalog document / 解析并规范化目录文档
///
/// Any shape violation rejects the whole document. Keys are lower-cased into
/// ids; when two keys collide, including a key repeated verbatim, the first
/// one wins.
pub fn parse_catalog(text: &str) -> Result<LoadedCatalog, CatalogError> {
    let CatalogEntries(entries) =
        serde_json::from_str::<CatalogEntries>(text).map_err(|e| CatalogError::Malformed(e.to_string()))?;

    let mut report = LoadReport {
        source_entries: entries.len(),
        ..LoadReport::default()
    };
    let mut seen = HashSet::with_capacity(entries.len());
    let mut records = Vec::with_capacity(entries.len());

    for (key, value) in entries {
        let entry: RawEntry = serde_json::from_value(value).map_err(|e| CatalogError::InvalidEntry {
            key: key.clone(),
            reason: e.to_string(),
        })?;

        let record = Record::from_entry(&key, entry);
        if !seen.insert(record.id.clone()) {
            tracing::warn!("Catalog id collision: `{}` normalizes to existing id `{}`, keeping the first", key, record.id);
            report.collisions.push(record.id);
            continue;
        }
        if !record.has_known_realm() {
            tracing::warn!("Catalog record `{}` has unknown realm `{}`", record.id, record.realm);
            report.unknown_realms.push(record.id.clone());
        }
        records.push(record);
    }

    report.records = records.len();
    Ok(LoadedCatalog { records, report })
}

/// Fetch then parse / 获取并解析
pub async fn load_catalog(source: &CatalogSource) -> Result<LoadedCatalog, CatalogError> {
    let text = fetch_catalog(source).await?;
    let loaded = parse_catalog(&text)?;
    tracing::info!(
        "Loaded catalog from {}: {} records ({} collisions)",
        source,
        loaded.report.records,
        loaded.report.collisions.len()
    );
    Ok(loaded)
}
