//! Catalog error types / 目录错误类型

use thiserror::Error;

/// Errors raised while loading or querying the catalog / 加载或查询目录时的错误
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read / 无法读取目录文件
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Network failure while fetching the catalog / 获取目录时网络错误
    #[error("failed to fetch catalog from {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Catalog endpoint answered with a non-success status / 非成功状态码
    #[error("catalog request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// Payload is not valid JSON or not an object / 负载不是合法的 JSON 对象
    #[error("malformed catalog: {0}")]
    Malformed(String),

    /// A single entry does not match the expected shape / 条目结构不符合预期
    #[error("invalid catalog entry `{key}`: {reason}")]
    InvalidEntry { key: String, reason: String },

    /// Query issued before the catalog finished loading / 目录尚未加载完成
    #[error("catalog is still loading")]
    Loading,

    /// Load failed; queries cannot be served / 目录加载失败
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    /// `load` was called on a service that already left the loading state
    #[error("catalog has already been loaded")]
    AlreadyLoaded,
}
