//! Abstract SEO base shared by publishable content models.

use std::sync::Arc;

use crate::errors::AppError;
use crate::models::{FieldDescriptor, FieldPattern, FieldType, GridRender};
use crate::registry::FieldSet;

const SEO: &str = "seo";

fn seo_field(name: &str, field_type: FieldType, label: &str, order: u32) -> FieldDescriptor {
    FieldDescriptor::new(name, field_type, label)
        .form_group(SEO)
        .form_order(order)
}

/// The seventeen SEO fields, all in the `seo` form group.
pub fn seo_fields() -> Result<Arc<FieldSet>, AppError> {
    let set = FieldSet::new("SeoBase")
        .field(
            seo_field("titulo_seo", FieldType::String, "Título SEO", 1)
                .max_length(60)
                .help_text("Título optimizado para motores de búsqueda (máx. 60 caracteres)"),
        )
        .field(
            seo_field("descripcion_seo", FieldType::Text, "Descripción SEO", 2)
                .max_length(160)
                .help_text("Descripción optimizada para motores de búsqueda (máx. 160 caracteres)"),
        )
        .field(
            seo_field("slug", FieldType::String, "Slug", 3)
                .max_length(255)
                .pattern(FieldPattern::new("^[a-z0-9-]+$")?)
                .help_text("URL amigable (solo letras minúsculas, números y guiones)"),
        )
        .field(
            seo_field("keywords", FieldType::String, "Keywords", 4)
                .max_length(255)
                .editor("TagsInput")
                .help_text("Palabras clave separadas por comas"),
        )
        .field(seo_field("canonical_url", FieldType::URL, "URL Canónica", 5).max_length(500))
        .field(
            seo_field("no_index", FieldType::Boolean, "No Index", 6)
                .help_text("Evitar indexación en motores de búsqueda"),
        )
        .field(
            seo_field("no_follow", FieldType::Boolean, "No Follow", 7)
                .help_text("No seguir enlaces en esta página"),
        )
        .field(
            seo_field("og_title", FieldType::String, "OG Title", 8)
                .max_length(95)
                .help_text("Título para Open Graph (redes sociales)"),
        )
        .field(
            seo_field("og_description", FieldType::Text, "OG Description", 9)
                .max_length(200)
                .help_text("Descripción para Open Graph"),
        )
        .field(
            seo_field("og_image", FieldType::Image, "OG Image", 10)
                .editor("ImageUploader")
                .help_text("Imagen para compartir en redes sociales"),
        )
        .field(
            seo_field("og_type", FieldType::String, "OG Type", 11)
                .max_length(50)
                .help_text("Tipo de contenido Open Graph (article, website, etc.)"),
        )
        .field(seo_field("og_url", FieldType::URL, "OG URL", 12).max_length(500))
        .field(
            seo_field("alt_text_image", FieldType::String, "Texto Alternativo Imagen", 13)
                .max_length(255)
                .help_text("Descripción de la imagen para accesibilidad"),
        )
        .field(
            seo_field("schema_type", FieldType::String, "Tipo de Schema", 14)
                .max_length(100)
                .help_text("Tipo de datos estructurados (Article, Book, etc.)"),
        )
        .field(
            seo_field("tags", FieldType::String, "Tags", 15)
                .max_length(500)
                .editor("TagsInput")
                .help_text("Etiquetas separadas por comas"),
        )
        .field(seo_field(
            "social_sharing_enabled",
            FieldType::Boolean,
            "Compartir en Redes Sociales",
            16,
        ))
        .field(
            seo_field("seo_score", FieldType::Number, "SEO Score", 17)
                .min(0.0)
                .max(100.0)
                .form_visible(false)
                .grid_visible(true)
                .grid_width(100)
                .grid_render(GridRender::Badge),
        );

    Ok(Arc::new(set))
}
