//! Image service: uploads go through the multipart endpoint.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::http::ApiClient;
use super::query::QueryParams;
use super::service::{CrudService, PaginatedResponse, RestService};
use crate::errors::AppError;
use crate::models::{is_empty_value, Record};

pub const IMAGE_ENDPOINT: &str = "/imagenes";

/// An image file ready to upload.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            data: data.into(),
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read an image from disk, guessing the content type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = match path.extension().and_then(|e| e.to_str()) {
            Some("png") => Some("image/png"),
            Some("jpg" | "jpeg") => Some("image/jpeg"),
            Some("gif") => Some("image/gif"),
            Some("webp") => Some("image/webp"),
            _ => None,
        };

        Ok(Self {
            file_name,
            content_type: content_type.map(str::to_string),
            data: Bytes::from(data),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUploadResponse {
    pub id: String,
    pub nombre: String,
    pub url_archivo: String,
    pub url_busqueda: String,
    pub created_at: String,
    pub estatus: i64,
}

impl ImageUploadResponse {
    pub fn into_record(self) -> Result<Record, AppError> {
        match serde_json::to_value(self)? {
            Value::Object(record) => Ok(record),
            _ => Err(AppError::Internal("Upload response is not an object".to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageService {
    rest: RestService,
}

impl ImageService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            rest: RestService::new(client, IMAGE_ENDPOINT),
        }
    }

    pub fn rest(&self) -> &RestService {
        &self.rest
    }

    /// Create always uploads. `nombre` and `file` (a local file path) are
    /// checked before any request is made.
    pub async fn create(&self, item: &Record) -> Result<Record, AppError> {
        let nombre = required_text(item, "nombre")?;
        let file_path = required_text(item, "file")?;

        let file = ImageFile::from_path(&file_path).await?;
        let uploaded = self
            .upload(file, &nombre)
            .await
            .inspect_err(|e| tracing::error!("Error creating image: {}", e))?;
        uploaded.into_record()
    }

    /// POST `{endpoint}/upload` as multipart `file` + `nombre`.
    pub async fn upload(&self, file: ImageFile, nombre: &str) -> Result<ImageUploadResponse, AppError> {
        let mut part = Part::bytes(file.data.to_vec()).file_name(file.file_name);
        if let Some(content_type) = &file.content_type {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new().part("file", part).text("nombre", nombre.to_string());

        let path = format!("{}/upload", IMAGE_ENDPOINT);
        self.rest
            .client()
            .post_multipart(&path, form)
            .await
            .inspect_err(|e| tracing::error!("Error uploading image: {}", e))
    }

    pub async fn get_by_url_busqueda(&self, url_busqueda: &str) -> Result<Record, AppError> {
        self.rest
            .get_by_id(url_busqueda)
            .await
            .inspect_err(|e| {
                tracing::error!("Error getting image by url_busqueda {}: {}", url_busqueda, e)
            })
    }

    pub async fn delete_image(&self, id: &str) -> Result<(), AppError> {
        self.rest
            .delete(id)
            .await
            .inspect_err(|e| tracing::error!("Error deleting image {}: {}", id, e))
    }
}

fn required_text(item: &Record, key: &str) -> Result<String, AppError> {
    let value = item.get(key);
    if is_empty_value(value) {
        return Err(AppError::Guard(format!("El campo \"{}\" es requerido", key)));
    }
    match value {
        Some(Value::String(text)) => Ok(text.clone()),
        _ => Err(AppError::Guard(format!("El campo \"{}\" debe ser texto", key))),
    }
}

#[async_trait]
impl CrudService for ImageService {
    fn endpoint(&self) -> &str {
        IMAGE_ENDPOINT
    }

    async fn list_paginated(&self, params: &QueryParams) -> Result<PaginatedResponse, AppError> {
        self.rest.list_paginated(params).await
    }

    async fn list_active(&self, params: &QueryParams) -> Result<Vec<Record>, AppError> {
        self.rest.list_active(params).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Record, AppError> {
        self.rest.get_by_id(id).await
    }

    async fn create(&self, item: &Record) -> Result<Record, AppError> {
        ImageService::create(self, item).await
    }

    async fn update(&self, id: &str, item: &Record) -> Result<Record, AppError> {
        self.rest.update(id, item).await
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.delete_image(id).await
    }

    async fn batch_delete(&self, ids: &[String]) -> Result<(), AppError> {
        self.rest.batch_delete(ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_required_text_guards() {
        let item = json!({ "nombre": "", "file": 3 }).as_object().cloned().unwrap();
        assert!(matches!(required_text(&item, "nombre"), Err(AppError::Guard(_))));
        assert!(matches!(required_text(&item, "file"), Err(AppError::Guard(_))));
        assert!(matches!(required_text(&item, "missing"), Err(AppError::Guard(_))));
    }

    #[tokio::test]
    async fn test_image_file_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("portada.png");
        std::fs::write(&path, b"\x89PNG").unwrap();

        let file = ImageFile::from_path(&path).await.unwrap();
        assert_eq!(file.file_name, "portada.png");
        assert_eq!(file.content_type.as_deref(), Some("image/png"));
        assert_eq!(file.data.as_ref(), b"\x89PNG");
    }

    #[test]
    fn test_upload_response_into_record() {
        let response = ImageUploadResponse {
            id: "img-1".into(),
            nombre: "portada".into(),
            url_archivo: "/files/portada.png".into(),
            url_busqueda: "portada".into(),
            created_at: "2024-01-01T00:00:00".into(),
            estatus: 1,
        };
        let record = response.into_record().unwrap();
        assert_eq!(record["id"], "img-1");
        assert_eq!(record["estatus"], 1);
    }
}
