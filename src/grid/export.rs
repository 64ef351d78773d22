use chrono::{NaiveDate, Utc};
use serde::Serialize;

use super::columns::generate_columns;
use crate::models::ModelDescriptor;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportColumn {
    pub field: String,
    pub header: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    pub file_name: String,
    pub columns: Vec<ExportColumn>,
}

/// Export configuration stamped with today's UTC date.
pub fn generate_export_config(model: &ModelDescriptor) -> ExportConfig {
    generate_export_config_on(model, Utc::now().date_naive())
}

pub fn generate_export_config_on(model: &ModelDescriptor, date: NaiveDate) -> ExportConfig {
    ExportConfig {
        file_name: format!("{}_{}", model.model_name(), date.format("%Y-%m-%d")),
        columns: generate_columns(model)
            .into_iter()
            .map(|c| ExportColumn {
                field: c.field,
                header: c.header,
            })
            .collect(),
    }
}
