//! Grouped, ordered form configuration derived from a model.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::models::{
    FieldDescriptor, FieldType, InputType, ModelDescriptor, SelectOption, DEFAULT_FORM_GROUP,
    SYSTEM_FIELDS,
};
use crate::validation::{generate_field_rules, ValidationRule};

const SEO_GROUP: &str = "seo";

#[derive(Debug, Clone, Serialize)]
pub struct FormConfig {
    pub groups: Vec<FormGroup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormGroup {
    pub name: String,
    pub title: String,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub editor: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub validation: Vec<ValidationRule>,
    pub order: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_type: Option<InputType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_expr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_expr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
}

impl FormField {
    fn from_descriptor(field: &FieldDescriptor) -> Self {
        let mut form_field = Self {
            name: field.name.clone(),
            label: field.label.clone(),
            field_type: field.field_type,
            editor: field.effective_editor().to_string(),
            required: field.required,
            max_length: field.max_length,
            min_length: field.min_length,
            min: field.min,
            max: field.max,
            validation: generate_field_rules(field),
            order: field.effective_form_order(),
            placeholder: field.placeholder.clone(),
            help_text: field.help_text.clone(),
            input_type: field.input_type,
            data_source: None,
            display_expr: None,
            value_expr: None,
            options: None,
        };

        if field.field_type == FieldType::ForeignKey {
            if let Some(related) = &field.related_model {
                form_field.data_source = Some(format!("{}Service", related));
                form_field.display_expr =
                    Some(field.related_field.clone().unwrap_or_else(|| "nombre".to_string()));
                form_field.value_expr = Some("id".to_string());
            }
        }

        if field.field_type == FieldType::Select && !field.options.is_empty() {
            form_field.options = Some(field.options.clone());
        }

        form_field
    }
}

/// Build the form configuration for a model.
///
/// Hidden and system-managed fields are left out. Groups come out with
/// `general` first, `seo` last and the rest alphabetical; fields inside a
/// group are stably sorted by their order.
pub fn generate_form_config(model: &ModelDescriptor) -> FormConfig {
    let mut buckets: Vec<(String, Vec<FormField>)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for field in model.fields() {
        if !field.is_form_visible() || SYSTEM_FIELDS.contains(&field.name.as_str()) {
            continue;
        }

        let group = field.effective_form_group().to_string();
        let slot = *positions.entry(group.clone()).or_insert_with(|| {
            buckets.push((group, Vec::new()));
            buckets.len() - 1
        });
        buckets[slot].1.push(FormField::from_descriptor(field));
    }

    let mut groups: Vec<FormGroup> = buckets
        .into_iter()
        .map(|(name, mut fields)| {
            fields.sort_by_key(|f| f.order);
            FormGroup {
                title: group_title(&name),
                name,
                fields,
            }
        })
        .collect();
    groups.sort_by(|a, b| compare_groups(&a.name, &b.name));

    FormConfig { groups }
}

fn compare_groups(a: &str, b: &str) -> Ordering {
    let rank = |name: &str| match name {
        DEFAULT_FORM_GROUP => 0,
        SEO_GROUP => 2,
        _ => 1,
    };
    rank(a)
        .cmp(&rank(b))
        .then_with(|| collation_key(a).cmp(&collation_key(b)))
}

/// Dictionary order for Spanish names: letters compare without accents or
/// case first, then unaccented before accented, then lowercase before
/// uppercase.
fn collation_key(name: &str) -> (String, String, Vec<bool>) {
    let lower = name.to_lowercase();
    let base = lower.chars().map(fold_accent).collect();
    let case = name.chars().map(char::is_uppercase).collect();
    (base, lower, case)
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

/// Display title for a form group.
pub fn group_title(group: &str) -> String {
    match group {
        "general" => "Información General".to_string(),
        "media" => "Multimedia".to_string(),
        "contenido" => "Contenido".to_string(),
        "relaciones" => "Relaciones".to_string(),
        "seo" => "SEO y Metadatos".to_string(),
        other => humanize(other),
    }
}

/// Space out camel-case words and capitalize the first letter.
pub fn humanize(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        if c.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(c);
    }

    let mut chars = out.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    capitalized.trim().to_string()
}
