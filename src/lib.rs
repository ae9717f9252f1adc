pub mod catalog;
pub mod config;
pub mod error;
pub mod render;
pub mod search;
pub mod widget;

pub use error::CatalogError;
pub use widget::{CatalogService, CatalogState};
