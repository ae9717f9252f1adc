//! Catalog search widget - the owned service behind the query box / 目录搜索组件
//!
//! Lifecycle / 生命周期：Loading -> Ready | Failed. The catalog is loaded and
//! indexed exactly once; queries are only answered in the Ready state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use crate::catalog::{load_catalog, CatalogSource, LoadReport, LoadedCatalog, Record};
use crate::error::CatalogError;
use crate::render::{render_loading, render_records, render_unavailable, TemplateOptions};
use crate::search::{CatalogIndex, IndexOptions, IndexStats};

/// Loaded records plus their index / 已加载的记录和索引
pub struct Catalog {
    records: Vec<Record>,
    index: CatalogIndex,
    report: LoadReport,
    loaded_at: i64,
}

/// One ordered search result / 有序搜索结果
#[derive(Debug, Clone, Serialize)]
pub struct RankedRecord<'a> {
    pub record: &'a Record,
    /// None for the unranked empty query / 空查询没有分数
    pub score: Option<f32>,
}

impl Catalog {
    /// Build the index over the loaded records / 构建目录索引
    pub fn build(loaded: LoadedCatalog, options: IndexOptions) -> Self {
        let index = CatalogIndex::build(&loaded.records, options);
        Self {
            records: loaded.records,
            index,
            report: loaded.report,
            loaded_at: chrono::Utc::now().timestamp(),
        }
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn index_stats(&self) -> IndexStats {
        self.index.stats()
    }

    pub fn loaded_at(&self) -> i64 {
        self.loaded_at
    }

    /// Result set for a query / 查询结果集
    ///
    /// The empty query returns every record in load order without touching
    /// the index; anything else goes through the ranked index search.
    pub fn query(&self, query: &str) -> Vec<RankedRecord<'_>> {
        if query.is_empty() {
            return self
                .records
                .iter()
                .map(|record| RankedRecord { record, score: None })
                .collect();
        }

        self.index
            .search(query)
            .into_iter()
            .map(|hit| RankedRecord {
                record: &self.records[hit.doc],
                score: Some(hit.score),
            })
            .collect()
    }

    /// Render the result set of a query / 渲染查询结果
    pub fn render(&self, query: &str, template: &TemplateOptions) -> String {
        render_records(self.query(query).into_iter().map(|r| r.record), template)
    }
}

/// Service state machine / 服务状态机
#[derive(Clone)]
pub enum CatalogState {
    Loading,
    Ready(Arc<Catalog>),
    Failed(String),
}

impl CatalogState {
    pub fn name(&self) -> &'static str {
        match self {
            CatalogState::Loading => "loading",
            CatalogState::Ready(_) => "ready",
            CatalogState::Failed(_) => "failed",
        }
    }
}

/// The page element whose content the widget replaces / 显示容器
pub struct DisplayContainer {
    id: String,
    content: RwLock<String>,
}

impl DisplayContainer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: RwLock::new(render_loading()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current inner content / 当前内容
    pub fn content(&self) -> String {
        self.content.read().clone()
    }

    /// Replace the inner content / 替换内容
    pub fn replace(&self, markup: String) {
        *self.content.write() = markup;
    }
}

/// Catalog search service / 目录搜索服务
pub struct CatalogService {
    state: RwLock<CatalogState>,
    /// Set by the first `load` call before it starts fetching
    load_started: AtomicBool,
    container: DisplayContainer,
    index_options: IndexOptions,
    template: TemplateOptions,
}

impl CatalogService {
    /// Create a service in the Loading state / 创建处于加载状态的服务
    pub fn new(container_id: impl Into<String>, index_options: IndexOptions, template: TemplateOptions) -> Self {
        Self {
            state: RwLock::new(CatalogState::Loading),
            load_started: AtomicBool::new(false),
            container: DisplayContainer::new(container_id),
            index_options,
            template,
        }
    }

    pub fn state(&self) -> CatalogState {
        self.state.read().clone()
    }

    pub fn container(&self) -> &DisplayContainer {
        &self.container
    }

    /// Markup for a freshly opened page / 新页面的初始内容
    ///
    /// The full catalog once ready, otherwise the loading or unavailable
    /// notice. Unlike the container this never reflects an earlier query.
    pub fn initial_markup(&self) -> String {
        match self.state() {
            CatalogState::Ready(catalog) => catalog.render("", &self.template),
            CatalogState::Loading => render_loading(),
            CatalogState::Failed(reason) => render_unavailable(&reason),
        }
    }

    /// Fetch, index and publish the catalog; runs once / 加载目录（只执行一次）
    ///
    /// On failure the service moves to Failed and the container shows the
    /// unavailable notice.
    pub async fn load(&self, source: &CatalogSource) -> Result<LoadReport, CatalogError> {
        if self.load_started.swap(true, Ordering::AcqRel) || !matches!(*self.state.read(), CatalogState::Loading) {
            return Err(CatalogError::AlreadyLoaded);
        }

        match load_catalog(source).await {
            Ok(loaded) => self.install(loaded),
            Err(e) => {
                tracing::error!("Failed to load catalog from {}: {}", source, e);
                self.fail(e.to_string());
                Err(e)
            }
        }
    }

    /// Index loaded records, switch to Ready and render everything / 安装目录
    pub fn install(&self, loaded: LoadedCatalog) -> Result<LoadReport, CatalogError> {
        let mut state = self.state.write();
        if !matches!(*state, CatalogState::Loading) {
            return Err(CatalogError::AlreadyLoaded);
        }

        let catalog = Arc::new(Catalog::build(loaded, self.index_options.clone()));
        let report = catalog.report().clone();
        self.container.replace(catalog.render("", &self.template));
        *state = CatalogState::Ready(catalog);

        tracing::info!("Catalog ready: {} records", report.records);
        Ok(report)
    }

    /// Switch to Failed and show the unavailable notice / 标记加载失败
    pub fn fail(&self, reason: String) {
        let mut state = self.state.write();
        if !matches!(*state, CatalogState::Loading) {
            return;
        }
        self.container.replace(render_unavailable(&reason));
        *state = CatalogState::Failed(reason);
    }

    /// Ready catalog, or the reason queries cannot be served / 获取就绪的目录
    pub fn catalog(&self) -> Result<Arc<Catalog>, CatalogError> {
        match &*self.state.read() {
            CatalogState::Ready(catalog) => Ok(catalog.clone()),
            CatalogState::Loading => Err(CatalogError::Loading),
            CatalogState::Failed(reason) => Err(CatalogError::Unavailable(reason.clone())),
        }
    }

    /// Render the result set for a query into the container / 按查询渲染
    ///
    /// The markup is returned and also replaces the container content.
    pub fn render_for_query(&self, query: &str) -> Result<String, CatalogError> {
        let catalog = self.catalog()?;
        let markup = catalog.render(query, &self.template);
        tracing::debug!("Rendered query {:?}: {} bytes", query, markup.len());
        self.container.replace(markup.clone());
        Ok(markup)
    }
}
