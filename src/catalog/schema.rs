//! Catalog record schema / 目录记录的 Schema 定义

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Realms the documentation build is known to emit / 已知的 realm
pub const KNOWN_REALMS: &[&str] = &["atmos", "land", "seaIce", "ocean", "generic"];

/// Raw catalog entry as it appears in the source document / 源文档中的原始条目
#[derive(Debug, Clone, Deserialize)]
pub struct RawEntry {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    #[serde(default)]
    pub vars: Map<String, Value>,
    pub realm: String,
    pub name: String,
}

/// Catalog record - one normalized, immutable entry / 目录记录
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    /// Lower-cased source key / 小写化的源键
    pub id: String,
    /// Display name / 显示名称
    pub title: String,
    /// Free-text description / 描述
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Variable name -> metadata, in source order / 变量名 -> 元数据
    pub variables: Map<String, Value>,
    /// Realm used for the documentation link / 文档链接使用的 realm
    pub realm: String,
    /// Reference name used for the documentation link / 文档链接使用的名称
    pub name: String,
}

impl Record {
    /// Normalize a source key into a record id / 规范化源键为记录ID
    pub fn generate_id(key: &str) -> String {
        key.to_lowercase()
    }

    /// Build a record from its source key and raw attributes / 从原始条目构建记录
    pub fn from_entry(key: &str, entry: RawEntry) -> Self {
        Self {
            id: Self::generate_id(key),
            title: entry.title,
            abstract_text: entry.abstract_text,
            variables: entry.vars,
            realm: entry.realm,
            name: entry.name,
        }
    }

    /// Variable names in source order / 变量名列表
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Derived searchable text: the space-joined variable names / 变量名拼接的可搜索文本
    pub fn variables_text(&self) -> String {
        self.variable_names().collect::<Vec<_>>().join(" ")
    }

    pub fn has_known_realm(&self) -> bool {
        KNOWN_REALMS.contains(&self.realm.as_str())
    }
}

/// Summary of one catalog load / 目录加载报告
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    /// Entries present in the source document / 源文档条目数
    pub source_entries: usize,
    /// Records kept after collision handling / 保留的记录数
    pub records: usize,
    /// Ids whose later duplicates were dropped / 发生冲突的ID
    pub collisions: Vec<String>,
    /// Ids of records with a realm outside [`KNOWN_REALMS`]
    pub unknown_realms: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(vars: Value) -> RawEntry {
        serde_json::from_value(json!({
            "title": "Mean Temperature",
            "abstract": "Mean of daily mean temperature.",
            "vars": vars,
            "realm": "atmos",
            "name": "tg_mean",
        }))
        .unwrap()
    }

    #[test]
    fn test_generate_id_lowercases() {
        assert_eq!(Record::generate_id("TG_MEAN"), "tg_mean");
        assert_eq!(Record::generate_id("tg_mean"), "tg_mean");
    }

    #[test]
    fn test_variables_text_keeps_source_order() {
        let record = Record::from_entry("DLYFRZTHW", entry(json!({"tasmax": {}, "tasmin": {"kind": 0}})));
        assert_eq!(record.id, "dlyfrzthw");
        assert_eq!(record.variables_text(), "tasmax tasmin");
        assert_eq!(record.variables["tasmin"], json!({"kind": 0}));
    }

    #[test]
    fn test_missing_vars_defaults_to_empty() {
        let raw: RawEntry = serde_json::from_value(json!({
            "title": "t", "abstract": "a", "realm": "land", "name": "n"
        }))
        .unwrap();
        let record = Record::from_entry("x", raw);
        assert!(record.variables.is_empty());
        assert_eq!(record.variables_text(), "");
    }

    #[test]
    fn test_known_realm() {
        let mut record = Record::from_entry("x", entry(json!({})));
        assert!(record.has_known_realm());
        record.realm = "space".to_string();
        assert!(!record.has_known_realm());
    }
}
