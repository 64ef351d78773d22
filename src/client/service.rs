//! Generic REST service bound to one backend endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::http::ApiClient;
use super::query::{ExportFormat, QueryParams};
use crate::errors::AppError;
use crate::models::Record;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// A list response with client-computed paging figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse {
    pub data: Vec<Record>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

/// Operations the CRUD state drives. Implemented by [`RestService`] and by
/// services that specialize some operations for one endpoint.
#[async_trait]
pub trait CrudService: Send + Sync {
    fn endpoint(&self) -> &str;
    async fn list_paginated(&self, params: &QueryParams) -> Result<PaginatedResponse, AppError>;
    async fn list_active(&self, params: &QueryParams) -> Result<Vec<Record>, AppError>;
    async fn get_by_id(&self, id: &str) -> Result<Record, AppError>;
    async fn create(&self, item: &Record) -> Result<Record, AppError>;
    async fn update(&self, id: &str, item: &Record) -> Result<Record, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn batch_delete(&self, ids: &[String]) -> Result<(), AppError>;
}

#[derive(Debug, Clone)]
pub struct RestService {
    client: Arc<ApiClient>,
    endpoint: String,
}

impl RestService {
    pub fn new(client: Arc<ApiClient>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.endpoint, id)
    }

    pub async fn list(&self, params: &QueryParams) -> Result<Vec<Record>, AppError> {
        self.client
            .get_json(&self.endpoint, &params.to_query_pairs())
            .await
            .inspect_err(|e| tracing::error!("Error listing {}: {}", self.endpoint, e))
    }

    /// The backend returns the whole list; paging figures are derived from
    /// its length and the rows are passed through unsliced.
    pub async fn list_paginated(&self, params: &QueryParams) -> Result<PaginatedResponse, AppError> {
        let data: Vec<Record> = self
            .client
            .get_json(&self.endpoint, &params.to_query_pairs())
            .await
            .inspect_err(|e| tracing::error!("Error listing paginated {}: {}", self.endpoint, e))?;

        let page = params.page.filter(|&n| n > 0).unwrap_or(DEFAULT_PAGE);
        let page_size = params
            .page_size
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let total = data.len() as u64;

        Ok(PaginatedResponse {
            data,
            total,
            page,
            page_size,
            total_pages: total.div_ceil(u64::from(page_size)),
        })
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Record, AppError> {
        let path = self.item_path(id);
        self.client
            .get_json(&path, &[])
            .await
            .inspect_err(|e| tracing::error!("Error getting {}: {}", path, e))
    }

    pub async fn create(&self, item: &Record) -> Result<Record, AppError> {
        self.client
            .post_json(&self.endpoint, item)
            .await
            .inspect_err(|e| tracing::error!("Error creating {}: {}", self.endpoint, e))
    }

    pub async fn update(&self, id: &str, item: &Record) -> Result<Record, AppError> {
        let path = self.item_path(id);
        self.client
            .put_json(&path, item)
            .await
            .inspect_err(|e| tracing::error!("Error updating {}: {}", path, e))
    }

    /// Soft delete; the backend deactivates the row.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let path = self.item_path(id);
        self.client
            .delete(&path)
            .await
            .inspect_err(|e| tracing::error!("Error deleting {}: {}", path, e))
    }

    pub async fn batch_delete(&self, ids: &[String]) -> Result<(), AppError> {
        let path = format!("{}/batch-delete", self.endpoint);
        self.client
            .post_unit(&path, &json!({ "ids": ids }))
            .await
            .inspect_err(|e| tracing::error!("Error batch deleting {}: {}", self.endpoint, e))
    }

    pub async fn list_active(&self, params: &QueryParams) -> Result<Vec<Record>, AppError> {
        self.list(&params.clone().active()).await
    }

    pub async fn search(&self, term: &str, params: &QueryParams) -> Result<Vec<Record>, AppError> {
        self.list(&params.clone().search(term)).await
    }

    pub async fn export(&self, format: ExportFormat, params: &QueryParams) -> Result<Bytes, AppError> {
        let path = format!("{}/export/{}", self.endpoint, format.as_str());
        self.client
            .get_bytes(&path, &params.to_query_pairs())
            .await
            .inspect_err(|e| tracing::error!("Error exporting {}: {}", self.endpoint, e))
    }
}

#[async_trait]
impl CrudService for RestService {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn list_paginated(&self, params: &QueryParams) -> Result<PaginatedResponse, AppError> {
        RestService::list_paginated(self, params).await
    }

    async fn list_active(&self, params: &QueryParams) -> Result<Vec<Record>, AppError> {
        RestService::list_active(self, params).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Record, AppError> {
        RestService::get_by_id(self, id).await
    }

    async fn create(&self, item: &Record) -> Result<Record, AppError> {
        RestService::create(self, item).await
    }

    async fn update(&self, id: &str, item: &Record) -> Result<Record, AppError> {
        RestService::update(self, id, item).await
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        RestService::delete(self, id).await
    }

    async fn batch_delete(&self, ids: &[String]) -> Result<(), AppError> {
        RestService::batch_delete(self, ids).await
    }
}
