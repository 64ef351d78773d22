//! The admin's built-in model catalog.

mod models;
mod seo;

pub use models::{
    arco, capitulo, galeria_imagenes, imagen, noticia, obra, personaje_ficticio, usuario,
    variable_sistema,
};
pub use seo::seo_fields;

use crate::errors::AppError;
use crate::registry::ModelRegistry;

/// Build a registry holding every built-in model, in menu order.
pub fn default_registry() -> Result<ModelRegistry, AppError> {
    let seo = seo_fields()?;
    let imagen = imagen()?;
    let galeria = galeria_imagenes(&imagen)?;

    let mut registry = ModelRegistry::new();
    registry.register(obra()?);
    registry.register(capitulo(&seo)?);
    registry.register(arco()?);
    registry.register(noticia(&seo)?);
    registry.register(personaje_ficticio()?);
    registry.register(usuario()?);
    registry.register(variable_sistema()?);
    registry.register(imagen);
    registry.register(galeria);

    tracing::debug!("Built default catalog with {} models", registry.len());
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_contents() {
        let registry = default_registry().unwrap();
        let names: Vec<_> = registry.all().iter().map(|m| m.model_name()).collect();
        assert_eq!(
            names,
            [
                "Obra",
                "Capitulo",
                "Arco",
                "Noticia",
                "PersonajeFicticio",
                "Usuario",
                "VariableSistema",
                "Imagen",
                "Galería de Imágenes"
            ]
        );
        assert_eq!(registry.get("Noticia").unwrap().icon(), "Notification");
        assert!(registry.get_by_slug("variablesistema").is_some());
    }
}
