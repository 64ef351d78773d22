//! Model registry: model name -> descriptor.
//!
//! Populated once at startup. The process-wide instance is installed a
//! single time and is read-only from then on.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::ModelDescriptor;

static GLOBAL_REGISTRY: OnceCell<Arc<ModelRegistry>> = OnceCell::new();

/// Navigation entry derived from a registered model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationEntry {
    pub name: String,
    pub label: String,
    pub icon: String,
    pub path: String,
}

/// Registration-ordered lookup table of model descriptors.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: Vec<Arc<ModelDescriptor>>,
    index: HashMap<String, usize>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model. A model with the same name is overwritten in place
    /// and returned.
    pub fn register(&mut self, model: ModelDescriptor) -> Option<Arc<ModelDescriptor>> {
        let model = Arc::new(model);
        match self.index.get(model.model_name()) {
            Some(&i) => {
                tracing::info!("Re-registering model {}", model.model_name());
                Some(std::mem::replace(&mut self.models[i], model))
            }
            None => {
                self.index
                    .insert(model.model_name().to_string(), self.models.len());
                self.models.push(model);
                None
            }
        }
    }

    pub fn get(&self, model_name: &str) -> Option<&Arc<ModelDescriptor>> {
        self.index.get(model_name).map(|&i| &self.models[i])
    }

    /// Look a model up by its navigation path segment.
    pub fn get_by_slug(&self, slug: &str) -> Option<&Arc<ModelDescriptor>> {
        self.models
            .iter()
            .find(|m| slugify(m.model_name()) == slug)
    }

    /// Look a model up by name, falling back to its navigation slug.
    pub fn resolve(&self, name_or_slug: &str) -> Result<&Arc<ModelDescriptor>, AppError> {
        self.get(name_or_slug)
            .or_else(|| self.get_by_slug(name_or_slug))
            .ok_or_else(|| AppError::NotFound(format!("Model {} not found", name_or_slug)))
    }

    pub fn all(&self) -> &[Arc<ModelDescriptor>] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Menu entries for every registered model, in registration order.
    pub fn navigation(&self) -> Vec<NavigationEntry> {
        self.models
            .iter()
            .map(|m| NavigationEntry {
                name: m.model_name().to_string(),
                label: m.model_name().to_string(),
                icon: m.icon().to_string(),
                path: format!("/{}", slugify(m.model_name())),
            })
            .collect()
    }

    /// Install this registry as the process-wide instance.
    pub fn install(self) -> Result<Arc<ModelRegistry>, AppError> {
        let registry = Arc::new(self);
        GLOBAL_REGISTRY
            .set(Arc::clone(&registry))
            .map_err(|_| AppError::Configuration("Model registry already installed".to_string()))?;
        tracing::info!("Installed model registry with {} models", registry.len());
        Ok(registry)
    }

    /// The process-wide registry, if one was installed.
    pub fn global() -> Option<Arc<ModelRegistry>> {
        GLOBAL_REGISTRY.get().cloned()
    }
}

/// Lower-case a model name and collapse whitespace runs into `-`.
pub fn slugify(model_name: &str) -> String {
    model_name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldDescriptor, FieldType};

    fn model(name: &str, endpoint: &str, label: &str) -> ModelDescriptor {
        ModelDescriptor::builder(name)
            .endpoint(endpoint)
            .icon("Picture")
            .field(FieldDescriptor::new("nombre", FieldType::String, label))
            .build()
            .unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ModelRegistry::new();
        assert!(registry.register(model("Obra", "/obras", "Nombre")).is_none());
        assert!(registry
            .register(model("Galería de Imágenes", "/imagenes", "Nombre"))
            .is_none());

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("Obra").unwrap().endpoint(), "/obras");
        assert_eq!(
            registry.get_by_slug("galería-de-imágenes").unwrap().endpoint(),
            "/imagenes"
        );
        assert!(registry.resolve("obra").is_err());
        assert!(matches!(
            registry.resolve("Desconocido"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_reregistration_overwrites_in_place() {
        let mut registry = ModelRegistry::new();
        registry.register(model("Obra", "/obras", "Nombre"));
        registry.register(model("Arco", "/arcos", "Nombre"));

        let previous = registry.register(model("Obra", "/obras-v2", "Título"));
        assert_eq!(previous.unwrap().endpoint(), "/obras");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.all()[0].endpoint(), "/obras-v2");
    }

    #[test]
    fn test_navigation_paths() {
        let mut registry = ModelRegistry::new();
        registry.register(model("PersonajeFicticio", "/personajes-ficticios", "Nombre"));
        registry.register(model("Galería de Imágenes", "/imagenes", "Nombre"));

        let nav = registry.navigation();
        assert_eq!(nav[0].path, "/personajeficticio");
        assert_eq!(nav[1].path, "/galería-de-imágenes");
        assert_eq!(nav[1].icon, "Picture");
    }

    #[test]
    fn test_slugify_collapses_whitespace() {
        assert_eq!(slugify("Mi  Modelo\tNuevo"), "mi-modelo-nuevo");
    }
}
