//! Data grid column configuration.

use serde::Serialize;

use crate::models::{FieldDescriptor, FieldType, GridRender, ModelDescriptor};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnLookup {
    pub data_source: String,
    pub display_field: String,
    pub value_field: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridColumn {
    pub field: String,
    pub header: String,
    pub width: u32,
    pub sortable: bool,
    pub filterable: bool,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub render: GridRender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup: Option<ColumnLookup>,
}

impl GridColumn {
    fn from_descriptor(field: &FieldDescriptor) -> Self {
        let lookup = match (&field.field_type, &field.related_model) {
            (FieldType::ForeignKey, Some(related)) => Some(ColumnLookup {
                data_source: format!("{}Service", related),
                display_field: field
                    .related_field
                    .clone()
                    .unwrap_or_else(|| "nombre".to_string()),
                value_field: "id".to_string(),
            }),
            _ => None,
        };

        Self {
            field: field.name.clone(),
            header: field.label.clone(),
            width: field.effective_grid_width(),
            sortable: field.grid_sortable != Some(false),
            filterable: field.grid_filterable != Some(false),
            field_type: field.field_type,
            render: field.grid_render.unwrap_or_default(),
            lookup,
        }
    }
}

/// One column per grid-visible field (never `id`), followed by the
/// creation date and status columns every model shares.
pub fn generate_columns(model: &ModelDescriptor) -> Vec<GridColumn> {
    let mut columns: Vec<GridColumn> = model
        .fields()
        .iter()
        .filter(|f| f.is_grid_visible() && f.name != "id")
        .map(GridColumn::from_descriptor)
        .collect();

    columns.push(GridColumn {
        field: "created_at".to_string(),
        header: "Fecha Creación".to_string(),
        width: 150,
        sortable: true,
        filterable: false,
        field_type: FieldType::DateTime,
        render: GridRender::DateTime,
        lookup: None,
    });
    columns.push(GridColumn {
        field: "estatus".to_string(),
        header: "Estatus".to_string(),
        width: 100,
        sortable: true,
        filterable: true,
        field_type: FieldType::Number,
        render: GridRender::Badge,
        lookup: None,
    });

    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model() -> ModelDescriptor {
        ModelDescriptor::builder("Noticia")
            .endpoint("/noticias")
            .field(FieldDescriptor::new("id", FieldType::String, "ID"))
            .field(FieldDescriptor::new("titulo", FieldType::String, "Título"))
            .field(FieldDescriptor::new("descripcion_larga", FieldType::Text, "Descripción").grid_visible(false))
            .field(
                FieldDescriptor::new("url_portada", FieldType::Image, "Portada")
                    .grid_width(150)
                    .grid_render(GridRender::ImageThumbnail)
                    .grid_sortable(false),
            )
            .field(FieldDescriptor::new("autor_id", FieldType::ForeignKey, "Autor").related("PersonajeFicticio", "nombre"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_columns_follow_field_order_then_trailing_columns() {
        let columns = generate_columns(&model());
        let names: Vec<_> = columns.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(names, ["titulo", "url_portada", "autor_id", "created_at", "estatus"]);
    }

    #[test]
    fn test_column_defaults_and_overrides() {
        let columns = generate_columns(&model());

        assert_eq!(columns[0].width, 200);
        assert!(columns[0].sortable && columns[0].filterable);
        assert_eq!(columns[0].render, GridRender::Default);

        assert_eq!(columns[1].width, 150);
        assert!(!columns[1].sortable);
        assert_eq!(columns[1].render, GridRender::ImageThumbnail);

        assert_eq!(
            columns[2].lookup,
            Some(ColumnLookup {
                data_source: "PersonajeFicticioService".into(),
                display_field: "nombre".into(),
                value_field: "id".into(),
            })
        );
    }

    #[test]
    fn test_trailing_columns_serialize() {
        let columns = generate_columns(&model());
        let value = serde_json::to_value(&columns[3..]).unwrap();
        assert_eq!(
            value,
            json!([
                { "field": "created_at", "header": "Fecha Creación", "width": 150, "sortable": true,
                  "filterable": false, "type": "datetime", "render": "datetime" },
                { "field": "estatus", "header": "Estatus", "width": 100, "sortable": true,
                  "filterable": true, "type": "number", "render": "badge" }
            ])
        );
    }
}
