//! Data grid configuration: columns, toolbar and export settings.

mod columns;
mod export;
mod toolbar;

use serde::Serialize;

use crate::client::DEFAULT_PAGE_SIZE;
use crate::models::ModelDescriptor;

pub use columns::{generate_columns, ColumnLookup, GridColumn};
pub use export::{generate_export_config, generate_export_config_on, ExportColumn, ExportConfig};
pub use toolbar::{generate_toolbar, Toolbar, ToolbarItem, ToolbarItemType};

/// Everything a list view needs to render a model's grid.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    pub columns: Vec<GridColumn>,
    pub toolbar: Toolbar,
    pub page_size: u32,
}

impl GridConfig {
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

pub fn generate_grid(model: &ModelDescriptor) -> GridConfig {
    GridConfig {
        columns: generate_columns(model),
        toolbar: generate_toolbar(model.model_name()),
        page_size: DEFAULT_PAGE_SIZE,
    }
}
