//! Application configuration module / 应用配置模块
//!
//! Manages application configuration loaded from config.json
//! Creates default config file on first run / 首次运行时创建默认配置文件

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::CatalogSource;
use crate::render::TemplateOptions;
use crate::search::IndexOptions;

/// Application configuration / 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration / 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// Catalog configuration / 目录配置
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Search configuration / 搜索配置
    #[serde(default)]
    pub search: IndexOptions,
    /// Page and template configuration / 页面与模板配置
    #[serde(default)]
    pub render: RenderConfig,
}

/// Server configuration / 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address / 服务器监听地址
    pub host: String,
    /// Server port / 服务器端口
    pub port: u16,
}

/// Catalog configuration / 目录配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// File path or http(s) URL of the catalog document / 目录文档路径或URL
    pub source: String,
}

/// Page and template configuration / 页面与模板配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Id of the element that receives rendered records / 结果容器ID
    pub container_id: String,
    /// Id of the query text input / 查询输入框ID
    pub input_id: String,
    #[serde(flatten)]
    pub template: TemplateOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8180,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: "data/indicators.json".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            container_id: "indicators".to_string(),
            input_id: "queryInput".to_string(),
            template: TemplateOptions::default(),
        }
    }
}

impl AppConfig {
    /// Get the catalog source / 获取目录来源
    pub fn catalog_source(&self) -> CatalogSource {
        CatalogSource::parse(&self.catalog.source)
    }

    /// Get the server bind address / 获取服务器绑定地址
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Get the config file path / 获取配置文件路径
pub fn get_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from file, or create default if not exists / 加载配置文件，不存在则创建默认配置
pub fn load_config() -> Result<AppConfig, String> {
    load_config_from(&get_config_path())
}

/// Load configuration from a specific path / 从指定路径加载配置
pub fn load_config_from(config_path: &Path) -> Result<AppConfig, String> {
    if config_path.exists() {
        // Load existing config / 加载现有配置
        let content = std::fs::read_to_string(config_path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        tracing::info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    } else {
        // Create default config / 创建默认配置
        let config = AppConfig::default();
        save_config_to(&config, config_path)?;
        tracing::info!("Created default configuration at {:?}", config_path);
        Ok(config)
    }
}

/// Save configuration to file / 保存配置到文件
fn save_config_to(config: &AppConfig, config_path: &Path) -> Result<(), String> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    std::fs::write(config_path, content)
        .map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_created_on_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = load_config_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.get_bind_address(), "0.0.0.0:8180");
        assert_eq!(config.render.container_id, "indicators");

        let reloaded = load_config_from(&path).unwrap();
        assert_eq!(reloaded.catalog.source, config.catalog.source);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"catalog": {"source": "https://example.org/indicators.json"}, "search": {"fuzzy": 0.2}}"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert!(matches!(config.catalog_source(), CatalogSource::Url(_)));
        assert_eq!(config.search.fuzzy, 0.2);
        assert_eq!(config.search.title_boost, 3.0);
        assert_eq!(config.server.port, 8180);
        assert_eq!(config.render.input_id, "queryInput");
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(load_config_from(&path).unwrap_err().contains("Failed to parse config file"));
    }
}
