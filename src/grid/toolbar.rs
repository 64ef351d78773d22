use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolbarItemType {
    Add,
    Delete,
    Refresh,
    Export,
    Separator,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolbarItem {
    #[serde(rename = "type")]
    pub item_type: ToolbarItemType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl ToolbarItem {
    fn button(item_type: ToolbarItemType, text: impl Into<String>, icon: &str) -> Self {
        Self {
            item_type,
            text: Some(text.into()),
            placeholder: None,
            icon: Some(icon.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toolbar {
    pub items: Vec<ToolbarItem>,
}

pub fn generate_toolbar(model_name: &str) -> Toolbar {
    Toolbar {
        items: vec![
            ToolbarItem::button(ToolbarItemType::Add, format!("Agregar {}", model_name), "Plus"),
            ToolbarItem::button(ToolbarItemType::Delete, "Eliminar Seleccionados", "Delete"),
            ToolbarItem::button(ToolbarItemType::Refresh, "Refrescar", "Refresh"),
            ToolbarItem::button(ToolbarItemType::Export, "Exportar", "Download"),
            ToolbarItem {
                item_type: ToolbarItemType::Separator,
                text: None,
                placeholder: None,
                icon: None,
            },
            ToolbarItem {
                item_type: ToolbarItemType::Search,
                text: None,
                placeholder: Some("Buscar...".to_string()),
                icon: Some("Search".to_string()),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_toolbar_items() {
        let value = serde_json::to_value(generate_toolbar("Obra")).unwrap();
        assert_eq!(
            value,
            json!({ "items": [
                { "type": "add", "text": "Agregar Obra", "icon": "Plus" },
                { "type": "delete", "text": "Eliminar Seleccionados", "icon": "Delete" },
                { "type": "refresh", "text": "Refrescar", "icon": "Refresh" },
                { "type": "export", "text": "Exportar", "icon": "Download" },
                { "type": "separator" },
                { "type": "search", "placeholder": "Buscar...", "icon": "Search" }
            ]})
        );
    }
}
