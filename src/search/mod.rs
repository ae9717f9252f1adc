//! Search module - only provides search primitives, does not control flow / 搜索模块
//!
//! Architecture principles / 架构原则：
//! - The index is built once from the full record list: CatalogIndex::build
//! - Queries only read it: CatalogIndex::search
//! - The owning service decides when to build and how to present hits
//!
//! Index features / 索引特性：
//! - Weighted fields (title > variable names > abstract)
//! - Prefix matching for partial terms
//! - Fuzzy matching, tolerance proportional to term length
//! - Multilingual tokenization (jieba for CJK text)

pub mod engine;
pub mod schema;
pub mod tokenizer;

pub use engine::CatalogIndex;
pub use schema::{Field, IndexOptions, IndexStats, SearchHit};
