//! Search index schema definition / 搜索索引的 Schema 定义

use serde::{Deserialize, Serialize};

/// Indexed field of a catalog record / 被索引的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Abstract,
    /// Derived field: the space-joined variable names / 派生字段：变量名
    Variables,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Title, Field::Abstract, Field::Variables];
    pub const COUNT: usize = Self::ALL.len();

    pub fn slot(self) -> usize {
        match self {
            Field::Title => 0,
            Field::Abstract => 1,
            Field::Variables => 2,
        }
    }
}

/// Index configuration / 索引配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexOptions {
    /// Allowed edit distance as a fraction of the query term length / 模糊匹配比例
    pub fuzzy: f32,
    /// Enable prefix matching / 启用前缀匹配
    pub prefix: bool,
    pub title_boost: f32,
    pub abstract_boost: f32,
    pub variables_boost: f32,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            fuzzy: 0.1,
            prefix: true,
            title_boost: 3.0,
            abstract_boost: 1.0,
            variables_boost: 2.0,
        }
    }
}

impl IndexOptions {
    pub fn boost(&self, field: Field) -> f32 {
        match field {
            Field::Title => self.title_boost,
            Field::Abstract => self.abstract_boost,
            Field::Variables => self.variables_boost,
        }
    }

    /// Maximum edit distance for a query term of `term_len` characters / 最大编辑距离
    pub fn max_distance(&self, term_len: usize) -> usize {
        if self.fuzzy <= 0.0 {
            return 0;
        }
        (self.fuzzy * term_len as f32).round() as usize
    }
}

/// One ranked hit, referring to a record by load position / 搜索命中
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Position of the record in load order / 记录的加载位置
    pub doc: usize,
    /// Relevance score / 相关性分数
    pub score: f32,
    /// Normalized query equals the normalized title / 标题完全匹配
    pub exact_title: bool,
}

/// Index statistics / 索引统计
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    pub document_count: usize,
    pub term_count: usize,
    pub built_at: Option<i64>,
}
