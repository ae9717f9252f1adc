//! Record template - pure HTML fragment rendering / 记录模板
//!
//! Every interpolated value is escaped; catalog text is not trusted.

use serde::{Deserialize, Serialize};

use crate::catalog::Record;

/// Template settings / 模板配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateOptions {
    /// Reference documentation page; the anchor is appended / 参考文档地址
    pub docs_base_url: String,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            docs_base_url: "https://xclim.readthedocs.io/en/stable/api_indicators.html".to_string(),
        }
    }
}

impl TemplateOptions {
    /// Documentation link for a record / 记录的文档链接
    pub fn reference_url(&self, record: &Record) -> String {
        format!("{}#xclim.indicators.{}.{}", self.docs_base_url, record.realm, record.name)
    }
}

/// Render one record as an HTML fragment / 渲染单条记录
pub fn render_record(record: &Record, options: &TemplateOptions) -> String {
    let badges: String = record
        .variable_names()
        .map(|name| format!("<code class=\"catalog-variable\">{}</code>", escape_html(name)))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        concat!(
            "<article class=\"catalog-record\" id=\"{id}\">\n",
            "  <div class=\"catalog-record-header\">\n",
            "    <h3 class=\"catalog-record-title\">{title}</h3>\n",
            "    <a class=\"catalog-record-link\" href=\"{url}\" title=\"{name}\">{name}</a>\n",
            "  </div>\n",
            "  <div class=\"catalog-record-variables\">{badges}</div>\n",
            "  <p class=\"catalog-record-abstract\">{summary}</p>\n",
            "  <p class=\"catalog-record-id\">Id: <code>{id}</code></p>\n",
            "</article>\n",
        ),
        id = escape_html(&record.id),
        title = escape_html(&record.title),
        url = escape_html(&options.reference_url(record)),
        name = escape_html(&record.name),
        badges = badges,
        summary = escape_html(&record.abstract_text),
    )
}

/// Render a list of records in order / 按顺序渲染记录列表
pub fn render_records<'a, I>(records: I, options: &TemplateOptions) -> String
where
    I: IntoIterator<Item = &'a Record>,
{
    records.into_iter().map(|r| render_record(r, options)).collect()
}

/// Visible notice shown when the catalog could not be loaded / 目录不可用提示
pub fn render_unavailable(reason: &str) -> String {
    format!(
        "<div class=\"catalog-unavailable\" role=\"alert\">The catalog is currently unavailable: {}</div>\n",
        escape_html(reason)
    )
}

/// Notice shown while the catalog is loading / 加载中提示
pub fn render_loading() -> String {
    "<div class=\"catalog-loading\">Loading catalog…</div>\n".to_string()
}

/// Escapes HTML special characters in a string.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
