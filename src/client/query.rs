//! List query parameters.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{is_empty_value, value_to_text, Record, ESTATUS_ACTIVE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Excel,
    Pdf,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Excel => "excel",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Paging, sorting, search and arbitrary filters for a list request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_field: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub search: Option<String>,
    #[serde(default)]
    pub filters: Record,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_field = Some(field.into());
        self.sort_order = Some(order);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Restrict to rows whose `estatus` is active.
    pub fn active(self) -> Self {
        self.filter("estatus", ESTATUS_ACTIVE)
    }

    /// Flatten into query-string pairs. Null and empty values are omitted.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("pageSize".to_string(), page_size.to_string()));
        }
        if let Some(field) = self.sort_field.as_ref().filter(|f| !f.is_empty()) {
            pairs.push(("sortField".to_string(), field.clone()));
        }
        if let Some(order) = self.sort_order {
            pairs.push(("sortOrder".to_string(), order.as_str().to_string()));
        }
        if let Some(term) = self.search.as_ref().filter(|s| !s.is_empty()) {
            pairs.push(("search".to_string(), term.clone()));
        }
        for (key, value) in &self.filters {
            if !is_empty_value(Some(value)) {
                pairs.push((key.clone(), value_to_text(value)));
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_pairs_skip_empty_values() {
        let params = QueryParams::new()
            .page(2)
            .page_size(50)
            .sort("nombre", SortOrder::Desc)
            .search("")
            .filter("obra_id", "abc")
            .filter("subarco_id", json!(null))
            .filter("titulo", "")
            .active();

        assert_eq!(
            params.to_query_pairs(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("pageSize".to_string(), "50".to_string()),
                ("sortField".to_string(), "nombre".to_string()),
                ("sortOrder".to_string(), "desc".to_string()),
                ("obra_id".to_string(), "abc".to_string()),
                ("estatus".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_default_params_are_empty() {
        assert!(QueryParams::default().to_query_pairs().is_empty());
    }
}
