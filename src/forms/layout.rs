use serde::Serialize;

use super::config::{FormConfig, FormGroup};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormLayout {
    pub label_position: &'static str,
    pub label_width: &'static str,
    pub col_count: u8,
    pub groups: Vec<LayoutGroup>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutGroup {
    #[serde(flatten)]
    pub group: FormGroup,
    pub col_span: u8,
}

/// Two-column layout; the SEO group spans the full width.
pub fn generate_layout(config: &FormConfig) -> FormLayout {
    FormLayout {
        label_position: "top",
        label_width: "120px",
        col_count: 2,
        groups: config
            .groups
            .iter()
            .map(|group| LayoutGroup {
                col_span: if group.name == "seo" { 2 } else { 1 },
                group: group.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_layout_spans_seo_group() {
        let config = FormConfig {
            groups: vec![
                FormGroup { name: "general".into(), title: "Información General".into(), fields: vec![] },
                FormGroup { name: "seo".into(), title: "SEO y Metadatos".into(), fields: vec![] },
            ],
        };

        let value = serde_json::to_value(generate_layout(&config)).unwrap();
        assert_eq!(
            value,
            json!({
                "labelPosition": "top",
                "labelWidth": "120px",
                "colCount": 2,
                "groups": [
                    { "name": "general", "title": "Información General", "fields": [], "colSpan": 1 },
                    { "name": "seo", "title": "SEO y Metadatos", "fields": [], "colSpan": 2 }
                ]
            })
        );
    }
}
