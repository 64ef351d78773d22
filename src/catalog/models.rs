//! Built-in content models.

use std::sync::Arc;

use crate::errors::AppError;
use crate::models::{
    FieldDescriptor, FieldPattern, FieldType, GridRender, InputType, ModelDescriptor, ViewType,
};
use crate::registry::FieldSet;

const URL_BUSQUEDA_PATTERN: &str = "^[a-zA-Z0-9-_]+$";

fn url_busqueda(placeholder: &str, help: &str) -> Result<FieldDescriptor, AppError> {
    Ok(FieldDescriptor::new("url_busqueda", FieldType::String, "URL de Búsqueda")
        .required()
        .max_length(255)
        .grid_visible(true)
        .grid_width(200)
        .grid_filterable(true)
        .form_group("general")
        .form_order(2)
        .placeholder(placeholder)
        .help_text(help)
        .pattern(FieldPattern::new(URL_BUSQUEDA_PATTERN)?))
}

fn nombre(label: &str, max_length: usize, placeholder: &str) -> FieldDescriptor {
    FieldDescriptor::new("nombre", FieldType::String, label)
        .required()
        .max_length(max_length)
        .grid_visible(true)
        .grid_width(250)
        .grid_sortable(true)
        .grid_filterable(true)
        .form_group("general")
        .form_order(1)
        .placeholder(placeholder)
}

fn portada(help: &str) -> FieldDescriptor {
    FieldDescriptor::new("url_portada", FieldType::Image, "Portada")
        .grid_visible(true)
        .grid_width(100)
        .grid_render(GridRender::ImageThumbnail)
        .form_group("media")
        .form_order(1)
        .help_text(help)
}

pub fn obra() -> Result<ModelDescriptor, AppError> {
    ModelDescriptor::builder("Obra")
        .endpoint("/obras")
        .display_field("nombre")
        .icon("Reading")
        .field(nombre("Nombre de la Obra", 100, "Ingrese el nombre de la obra"))
        .field(url_busqueda(
            "url-unica-de-la-obra",
            "URL única para identificar esta obra. Alfanumérico, guiones permitidos.",
        )?)
        .field(
            FieldDescriptor::new("descripcion", FieldType::Text, "Descripción")
                .grid_visible(true)
                .grid_width(350)
                .form_group("general")
                .form_order(3)
                .editor("TextArea")
                .placeholder("Descripción de la obra"),
        )
        .field(portada("Imagen de portada de la obra").editor("ImageUploader"))
        .field(
            FieldDescriptor::new("orden", FieldType::Number, "Orden")
                .min(0.0)
                .grid_visible(true)
                .grid_width(80)
                .grid_sortable(true)
                .form_group("general")
                .form_order(4)
                .help_text("Orden de visualización"),
        )
        .build()
}

pub fn capitulo(seo: &Arc<FieldSet>) -> Result<ModelDescriptor, AppError> {
    ModelDescriptor::builder("Capitulo")
        .endpoint("/capitulos")
        .display_field("titulo")
        .icon("Document")
        .has_seo(true)
        .extends(Arc::clone(seo))
        .field(
            FieldDescriptor::new("titulo", FieldType::String, "Título")
                .required()
                .max_length(200)
                .grid_visible(true)
                .grid_width(250)
                .grid_sortable(true)
                .grid_filterable(true)
                .form_group("general")
                .form_order(1)
                .placeholder("Título del capítulo"),
        )
        .field(
            FieldDescriptor::new("descripcion_larga", FieldType::Text, "Descripción Larga")
                .grid_visible(false)
                .form_group("general")
                .form_order(2)
                .editor("TextArea")
                .placeholder("Descripción detallada del capítulo"),
        )
        .field(
            FieldDescriptor::new("descripcion_corta", FieldType::String, "Descripción Corta")
                .max_length(255)
                .grid_visible(true)
                .grid_width(300)
                .form_group("general")
                .form_order(3)
                .placeholder("Resumen breve del capítulo"),
        )
        .field(portada("Imagen de portada del capítulo"))
        .field(
            FieldDescriptor::new("texto_capitulo", FieldType::Text, "Texto del Capítulo")
                .required()
                .form_group("contenido")
                .form_order(1)
                .editor("RichText")
                .help_text("Contenido completo del capítulo"),
        )
        .field(
            FieldDescriptor::new("comentario_creador", FieldType::Text, "Comentario del Creador")
                .form_group("contenido")
                .form_order(2)
                .editor("TextArea")
                .placeholder("Notas o comentarios del autor"),
        )
        .field(
            FieldDescriptor::new("numero_capitulo", FieldType::Number, "Número de Capítulo")
                .required()
                .min(1.0)
                .grid_visible(true)
                .grid_width(120)
                .grid_sortable(true)
                .form_group("general")
                .form_order(4)
                .help_text("Número secuencial del capítulo"),
        )
        .field(
            FieldDescriptor::new("obra_id", FieldType::ForeignKey, "Obra")
                .related("Obra", "nombre")
                .required()
                .grid_visible(true)
                .grid_width(200)
                .grid_filterable(true)
                .form_group("relaciones")
                .form_order(1)
                .help_text("Obra a la que pertenece este capítulo"),
        )
        .field(
            FieldDescriptor::new("subarco_id", FieldType::ForeignKey, "Subarco")
                .related("Arco", "nombre")
                .grid_visible(true)
                .grid_width(200)
                .grid_filterable(true)
                .form_group("relaciones")
                .form_order(2)
                .help_text("Subarco al que pertenece este capítulo (opcional)"),
        )
        .build()
}

pub fn arco() -> Result<ModelDescriptor, AppError> {
    ModelDescriptor::builder("Arco")
        .endpoint("/arcos")
        .display_field("nombre")
        .icon("List")
        .field(nombre("Nombre del Arco", 100, "Nombre del arco narrativo"))
        .field(url_busqueda(
            "url-unica-del-arco",
            "URL única para identificar este arco. Alfanumérico, guiones permitidos.",
        )?)
        .field(
            FieldDescriptor::new("es_subarco", FieldType::Boolean, "Es Subarco")
                .grid_visible(true)
                .grid_width(100)
                .grid_render(GridRender::Boolean)
                .form_group("general")
                .form_order(3)
                .help_text("Indica si es un subarco dentro de un arco principal"),
        )
        .build()
}

pub fn noticia(seo: &Arc<FieldSet>) -> Result<ModelDescriptor, AppError> {
    ModelDescriptor::builder("Noticia")
        .endpoint("/noticias")
        .display_field("titulo")
        .icon("Notification")
        .has_seo(true)
        .extends(Arc::clone(seo))
        .field(
            FieldDescriptor::new("titulo", FieldType::String, "Título")
                .required()
                .max_length(200)
                .grid_visible(true)
                .grid_width(250)
                .grid_sortable(true)
                .grid_filterable(true)
                .form_group("general")
                .form_order(1)
                .placeholder("Título de la noticia"),
        )
        .field(url_busqueda(
            "url-unica-de-la-noticia",
            "URL única para identificar esta noticia. Alfanumérico, guiones permitidos.",
        )?)
        .field(
            FieldDescriptor::new("descripcion_larga", FieldType::Text, "Descripción Larga")
                .grid_visible(false)
                .form_group("general")
                .form_order(3)
                .editor("TextArea")
                .placeholder("Descripción detallada de la noticia"),
        )
        .field(
            FieldDescriptor::new("descripcion_corta", FieldType::String, "Descripción Corta")
                .max_length(255)
                .grid_visible(true)
                .grid_width(300)
                .form_group("general")
                .form_order(4)
                .placeholder("Resumen breve de la noticia"),
        )
        .field(portada("Imagen de portada de la noticia").editor("ImageUploader"))
        .field(
            FieldDescriptor::new("texto_noticia", FieldType::Text, "Texto de la Noticia")
                .required()
                .form_group("contenido")
                .form_order(1)
                .editor("RichText")
                .help_text("Contenido completo de la noticia"),
        )
        .field(
            FieldDescriptor::new("autor_id", FieldType::ForeignKey, "Autor")
                .related("PersonajeFicticio", "nombre")
                .required()
                .grid_visible(true)
                .grid_width(150)
                .grid_filterable(true)
                .form_group("general")
                .form_order(5)
                .help_text("Autor de la noticia (Personaje Ficticio)"),
        )
        .build()
}

pub fn personaje_ficticio() -> Result<ModelDescriptor, AppError> {
    ModelDescriptor::builder("PersonajeFicticio")
        .endpoint("/personajes-ficticios")
        .display_field("nombre")
        .icon("User")
        .field(nombre("Nombre", 100, "Nombre del personaje"))
        .field(
            FieldDescriptor::new("url_foto_perfil", FieldType::Image, "Foto de Perfil")
                .grid_visible(true)
                .grid_width(100)
                .grid_render(GridRender::ImageThumbnail)
                .form_group("media")
                .form_order(1)
                .help_text("Imagen de perfil del personaje"),
        )
        .field(
            FieldDescriptor::new("descripcion", FieldType::Text, "Descripción")
                .grid_visible(true)
                .grid_width(350)
                .form_group("general")
                .form_order(2)
                .editor("TextArea")
                .placeholder("Descripción del personaje"),
        )
        .build()
}

fn mac_address(name: &str, label: &str, order: u32, help: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, FieldType::String, label)
        .max_length(17)
        .grid_visible(true)
        .grid_width(150)
        .grid_filterable(true)
        .form_group("general")
        .form_order(order)
        .placeholder("XX:XX:XX:XX:XX:XX")
        .help_text(help)
}

pub fn usuario() -> Result<ModelDescriptor, AppError> {
    ModelDescriptor::builder("Usuario")
        .endpoint("/usuarios")
        .display_field("nombre")
        .icon("UserFilled")
        .field(nombre("Nombre", 100, "Nombre del usuario"))
        .field(
            FieldDescriptor::new("contraseña", FieldType::String, "Contraseña")
                .max_length(255)
                .grid_visible(false)
                .form_group("general")
                .form_order(2)
                .placeholder("Contraseña del usuario")
                .help_text(
                    "Mínimo 6 caracteres. Requerido al crear. Dejar vacío para mantener la contraseña actual al editar.",
                )
                .input_type(InputType::Password),
        )
        .field(mac_address(
            "direccion_mac_pc",
            "Dirección MAC PC",
            3,
            "Dirección MAC del dispositivo PC",
        ))
        .field(mac_address(
            "direccion_mac_mobile",
            "Dirección MAC Mobile",
            4,
            "Dirección MAC del dispositivo móvil",
        ))
        .build()
}

pub fn variable_sistema() -> Result<ModelDescriptor, AppError> {
    ModelDescriptor::builder("VariableSistema")
        .endpoint("/variables-sistema")
        .display_field("nombre")
        .icon("Setting")
        .field(nombre("Nombre", 100, "Nombre de la variable"))
        .field(url_busqueda(
            "url-unica-de-la-variable",
            "URL única para identificar esta variable. Alfanumérico, guiones permitidos.",
        )?)
        .field(
            FieldDescriptor::new("valor", FieldType::Text, "Valor")
                .required()
                .grid_visible(true)
                .grid_width(350)
                .form_group("general")
                .form_order(3)
                .editor("TextArea")
                .placeholder("Valor de la variable"),
        )
        .build()
}

pub fn imagen() -> Result<ModelDescriptor, AppError> {
    ModelDescriptor::builder("Imagen")
        .endpoint("/imagenes")
        .display_field("nombre")
        .icon("Picture")
        .field(
            nombre("Nombre de la Imagen", 255, "Ej: portada-obra-1")
                .help_text("Nombre descriptivo para la imagen"),
        )
        .field(
            FieldDescriptor::new("file", FieldType::File, "Archivo de Imagen")
                .required()
                .grid_visible(false)
                .form_group("general")
                .form_order(2)
                .editor("FileUpload")
                .help_text("Sube el archivo de imagen (JPG, PNG - Máx. 5MB)"),
        )
        .field(
            FieldDescriptor::new("url_archivo", FieldType::Image, "Vista Previa")
                .persist(false)
                .grid_visible(true)
                .grid_width(150)
                .grid_render(GridRender::ImageThumbnail)
                .form_visible(true),
        )
        .build()
}

/// Card-grid view over the same `/imagenes` resource.
pub fn galeria_imagenes(imagen: &ModelDescriptor) -> Result<ModelDescriptor, AppError> {
    imagen
        .derive("Galería de Imágenes")
        .view_type(ViewType::CardGrid)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seo_fields;

    #[test]
    fn test_capitulo_flattens_own_fields_before_seo() {
        let seo = seo_fields().unwrap();
        let model = capitulo(&seo).unwrap();

        assert_eq!(model.fields().len(), 9 + 17);
        assert_eq!(model.fields()[0].name, "titulo");
        assert_eq!(model.fields()[9].name, "titulo_seo");
        assert!(model.has_seo());
        assert_eq!(model.field("obra_id").unwrap().related_model.as_deref(), Some("Obra"));
    }

    #[test]
    fn test_galeria_shares_imagen_fields() {
        let imagen = imagen().unwrap();
        let galeria = galeria_imagenes(&imagen).unwrap();

        assert_eq!(galeria.endpoint(), "/imagenes");
        assert_eq!(galeria.view_type(), ViewType::CardGrid);
        assert_eq!(galeria.icon(), "Picture");
        let names: Vec<_> = galeria.field_names().collect();
        assert_eq!(names, ["nombre", "file", "url_archivo"]);
    }

    #[test]
    fn test_usuario_password_hints() {
        let model = usuario().unwrap();
        let password = model.field("contraseña").unwrap();
        assert_eq!(password.input_type, Some(InputType::Password));
        assert!(!password.is_grid_visible());
        assert!(!password.required);
    }
}
