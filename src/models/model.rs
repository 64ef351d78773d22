//! Model descriptor: endpoint, display hints and the flattened field list.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{FieldDescriptor, FieldType, Record};
use crate::errors::AppError;
use crate::registry::FieldSet;

/// Fields managed by the backend that a client never writes.
pub const SYSTEM_FIELDS: [&str; 4] = ["id", "created_at", "updated_at", "url_busqueda"];

/// How a model's list view is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewType {
    #[default]
    Table,
    CardGrid,
}

/// Immutable description of one admin model.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    model_name: String,
    endpoint: String,
    display_field: String,
    icon: String,
    has_seo: bool,
    view_type: ViewType,
    fields: Vec<FieldDescriptor>,
    #[serde(skip)]
    field_set: Arc<FieldSet>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl ModelDescriptor {
    pub fn builder(model_name: impl Into<String>) -> ModelBuilder {
        ModelBuilder::new(model_name)
    }

    /// Start a model that inherits this model's settings and fields.
    pub fn derive(&self, model_name: impl Into<String>) -> ModelBuilder {
        ModelBuilder {
            model_name: model_name.into(),
            endpoint: Some(self.endpoint.clone()),
            display_field: Some(self.display_field.clone()),
            icon: Some(self.icon.clone()),
            has_seo: self.has_seo,
            view_type: self.view_type,
            parent: Some(Arc::clone(&self.field_set)),
            fields: Vec::new(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn display_field(&self) -> &str {
        &self.display_field
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn has_seo(&self) -> bool {
        self.has_seo
    }

    pub fn view_type(&self) -> ViewType {
        self.view_type
    }

    /// Flattened fields, most derived declarations first.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn field_set(&self) -> &Arc<FieldSet> {
        &self.field_set
    }

    /// Project a record onto what the backend accepts.
    ///
    /// Drops system-managed keys and fields marked `persist(false)`; every
    /// other key, including explicit nulls and keys unknown to the model,
    /// passes through unchanged.
    pub fn prepare_for_backend(&self, data: &Record) -> Record {
        data.iter()
            .filter(|(key, _)| !SYSTEM_FIELDS.contains(&key.as_str()))
            .filter(|(key, _)| self.field(key).map_or(true, FieldDescriptor::is_persisted))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// Builder for [`ModelDescriptor`].
#[derive(Debug)]
pub struct ModelBuilder {
    model_name: String,
    endpoint: Option<String>,
    display_field: Option<String>,
    icon: Option<String>,
    has_seo: bool,
    view_type: ViewType,
    parent: Option<Arc<FieldSet>>,
    fields: Vec<FieldDescriptor>,
}

impl ModelBuilder {
    fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            endpoint: None,
            display_field: None,
            icon: None,
            has_seo: false,
            view_type: ViewType::Table,
            parent: None,
            fields: Vec::new(),
        }
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn display_field(mut self, display_field: impl Into<String>) -> Self {
        self.display_field = Some(display_field.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn has_seo(mut self, has_seo: bool) -> Self {
        self.has_seo = has_seo;
        self
    }

    pub fn view_type(mut self, view_type: ViewType) -> Self {
        self.view_type = view_type;
        self
    }

    /// Inherit the fields of an abstract base level.
    pub fn extends(mut self, parent: Arc<FieldSet>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> Result<ModelDescriptor, AppError> {
        if self.model_name.trim().is_empty() {
            return Err(AppError::Configuration(
                "Model name must not be empty".to_string(),
            ));
        }

        let endpoint = self.endpoint.ok_or_else(|| {
            AppError::Configuration(format!("Model {} has no endpoint", self.model_name))
        })?;
        if !endpoint.starts_with('/') {
            return Err(AppError::Configuration(format!(
                "Endpoint of model {} must start with '/': {}",
                self.model_name, endpoint
            )));
        }

        let mut level = FieldSet::new(self.model_name.clone());
        if let Some(parent) = self.parent {
            level = level.with_parent(parent);
        }
        for field in self.fields {
            check_field(&self.model_name, &field)?;
            level.register(field);
        }

        let fields = level.collect_fields();
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();

        Ok(ModelDescriptor {
            model_name: self.model_name,
            endpoint,
            display_field: self.display_field.unwrap_or_else(|| "id".to_string()),
            icon: self.icon.unwrap_or_else(|| "Document".to_string()),
            has_seo: self.has_seo,
            view_type: self.view_type,
            fields,
            field_set: Arc::new(level),
            index,
        })
    }
}

fn check_field(model_name: &str, field: &FieldDescriptor) -> Result<(), AppError> {
    if field.label.trim().is_empty() {
        return Err(AppError::Configuration(format!(
            "Field {}.{} has no label",
            model_name, field.name
        )));
    }
    if field.related_model.is_some() && field.field_type != FieldType::ForeignKey {
        return Err(AppError::Configuration(format!(
            "Field {}.{} declares a related model but is not a foreign key",
            model_name, field.name
        )));
    }
    if !field.options.is_empty() && !field.field_type.has_options() {
        return Err(AppError::Configuration(format!(
            "Field {}.{} declares options but is not a select",
            model_name, field.name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn imagen() -> ModelDescriptor {
        ModelDescriptor::builder("Imagen")
            .endpoint("/imagenes")
            .display_field("nombre")
            .icon("Picture")
            .field(FieldDescriptor::new("nombre", FieldType::String, "Nombre").required())
            .field(FieldDescriptor::new("url_archivo", FieldType::Image, "Vista Previa").persist(false))
            .build()
            .unwrap()
    }

    fn record(value: serde_json::Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_prepare_for_backend_strips_system_and_client_only_fields() {
        let model = imagen();
        let prepared = model.prepare_for_backend(&record(json!({
            "id": "x",
            "nombre": "A",
            "url_busqueda": "y",
            "url_archivo": "preview"
        })));

        assert_eq!(serde_json::Value::Object(prepared), json!({ "nombre": "A" }));
    }

    #[test]
    fn test_prepare_for_backend_passes_unknown_keys_and_nulls() {
        let model = imagen();
        let prepared = model.prepare_for_backend(&record(json!({
            "created_at": "2024-01-01",
            "updated_at": "2024-01-02",
            "estatus": 1,
            "nombre": null
        })));

        assert_eq!(
            serde_json::Value::Object(prepared),
            json!({ "estatus": 1, "nombre": null })
        );
    }

    #[test]
    fn test_derive_inherits_settings_and_shadows_fields() {
        let usuario = ModelDescriptor::builder("Usuario")
            .endpoint("/usuarios")
            .display_field("nombre")
            .field(FieldDescriptor::new("nombre", FieldType::String, "Nombre"))
            .field(FieldDescriptor::new("contraseña", FieldType::String, "Contraseña").min_length(6))
            .build()
            .unwrap();

        let admin = usuario
            .derive("Administrador")
            .field(FieldDescriptor::new("contraseña", FieldType::String, "Contraseña").min_length(8))
            .build()
            .unwrap();

        assert_eq!(admin.endpoint(), "/usuarios");
        assert_eq!(admin.display_field(), "nombre");
        assert_eq!(admin.fields().len(), 2);
        assert_eq!(admin.field("contraseña").unwrap().min_length, Some(8));
        assert_eq!(usuario.field("contraseña").unwrap().min_length, Some(6));
    }

    #[test]
    fn test_build_defaults_and_errors() {
        let model = ModelDescriptor::builder("Arco").endpoint("/arcos").build().unwrap();
        assert_eq!(model.display_field(), "id");
        assert_eq!(model.icon(), "Document");
        assert_eq!(model.view_type(), ViewType::Table);

        assert!(ModelDescriptor::builder("SinEndpoint").build().is_err());
        assert!(ModelDescriptor::builder("Mal").endpoint("arcos").build().is_err());

        let bad_fk = ModelDescriptor::builder("Mal")
            .endpoint("/mal")
            .field(FieldDescriptor::new("obra", FieldType::String, "Obra").related_model("Obra"))
            .build();
        assert!(matches!(bad_fk, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_view_type_wire_names() {
        assert_eq!(serde_json::to_value(ViewType::CardGrid).unwrap(), "card-grid");
        assert_eq!(serde_json::to_value(ViewType::Table).unwrap(), "table");
    }
}
