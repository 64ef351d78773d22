//! Field descriptor: the per-field metadata every generator reads.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Default sort key for fields without an explicit form order.
pub const DEFAULT_FORM_ORDER: u32 = 999;

/// Default form group for fields without an explicit group.
pub const DEFAULT_FORM_GROUP: &str = "general";

/// Closed set of field types.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Text,
    Number,
    Boolean,
    Date,
    DateTime,
    Image,
    File,
    Email,
    URL,
    ForeignKey,
    Select,
    MultiSelect,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Image => "image",
            FieldType::File => "file",
            FieldType::Email => "email",
            FieldType::URL => "url",
            FieldType::ForeignKey => "foreignkey",
            FieldType::Select => "select",
            FieldType::MultiSelect => "multiselect",
        }
    }

    /// Widget tag used by forms when the field has no explicit editor.
    pub fn default_editor(&self) -> &'static str {
        match self {
            FieldType::String => "TextInput",
            FieldType::Text => "TextArea",
            FieldType::Number => "NumberInput",
            FieldType::Boolean => "Switch",
            FieldType::Date => "DatePicker",
            FieldType::DateTime => "DateTimePicker",
            FieldType::Image => "ImageUploader",
            FieldType::File => "FileUploader",
            FieldType::Email => "EmailInput",
            FieldType::URL => "URLInput",
            FieldType::ForeignKey | FieldType::Select => "SelectInput",
            FieldType::MultiSelect => "MultiSelectInput",
        }
    }

    /// Column width used by grids when the field has no explicit width.
    pub fn default_grid_width(&self) -> u32 {
        match self {
            FieldType::String => 200,
            FieldType::Text => 300,
            FieldType::Number => 100,
            FieldType::Boolean => 100,
            FieldType::Date => 120,
            FieldType::DateTime => 150,
            FieldType::Image => 100,
            FieldType::File => 150,
            FieldType::Email => 200,
            FieldType::URL => 250,
            FieldType::ForeignKey => 200,
            FieldType::Select => 150,
            FieldType::MultiSelect => 200,
        }
    }

    pub fn has_options(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::MultiSelect)
    }
}

/// Rendering hint for grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GridRender {
    #[default]
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "image-thumbnail")]
    ImageThumbnail,
    #[serde(rename = "badge")]
    Badge,
    #[serde(rename = "link")]
    Link,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "datetime")]
    DateTime,
    #[serde(rename = "boolean")]
    Boolean,
}

impl GridRender {
    pub fn as_str(&self) -> &'static str {
        match self {
            GridRender::Default => "default",
            GridRender::ImageThumbnail => "image-thumbnail",
            GridRender::Badge => "badge",
            GridRender::Link => "link",
            GridRender::Date => "date",
            GridRender::DateTime => "datetime",
            GridRender::Boolean => "boolean",
        }
    }
}

/// HTML input type hint for text-like editors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Password,
    Email,
    Number,
    Tel,
    Url,
}

/// One entry of a Select/MultiSelect option list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: Value,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Compiled regular expression attached to a field.
#[derive(Debug, Clone)]
pub struct FieldPattern(Regex);

impl FieldPattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl Serialize for FieldPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Pure validation hook: returns an error message for an invalid value.
#[derive(Clone)]
pub struct CustomValidator(Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>);

impl CustomValidator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, value: &Value) -> Option<String> {
        (self.0)(value)
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomValidator(..)")
    }
}

/// Metadata for a single model field.
///
/// Built with the chained setters below; once a descriptor is handed to a
/// model it is only ever read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<FieldPattern>,

    // Grid hints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_sortable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_filterable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_render: Option<GridRender>,

    // Form hints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_order: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_type: Option<InputType>,

    // Foreign key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_field: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist: Option<bool>,

    #[serde(skip)]
    pub custom_validation: Option<CustomValidator>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type,
            label: label.into(),
            required: false,
            min_length: None,
            max_length: None,
            min: None,
            max: None,
            pattern: None,
            grid_visible: None,
            grid_width: None,
            grid_sortable: None,
            grid_filterable: None,
            grid_render: None,
            form_visible: None,
            form_group: None,
            form_order: None,
            editor: None,
            placeholder: None,
            help_text: None,
            input_type: None,
            related_model: None,
            related_field: None,
            options: Vec::new(),
            persist: None,
            custom_validation: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: FieldPattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn grid_visible(mut self, visible: bool) -> Self {
        self.grid_visible = Some(visible);
        self
    }

    pub fn grid_width(mut self, width: u32) -> Self {
        self.grid_width = Some(width);
        self
    }

    pub fn grid_sortable(mut self, sortable: bool) -> Self {
        self.grid_sortable = Some(sortable);
        self
    }

    pub fn grid_filterable(mut self, filterable: bool) -> Self {
        self.grid_filterable = Some(filterable);
        self
    }

    pub fn grid_render(mut self, render: GridRender) -> Self {
        self.grid_render = Some(render);
        self
    }

    pub fn form_visible(mut self, visible: bool) -> Self {
        self.form_visible = Some(visible);
        self
    }

    pub fn form_group(mut self, group: impl Into<String>) -> Self {
        self.form_group = Some(group.into());
        self
    }

    pub fn form_order(mut self, order: u32) -> Self {
        self.form_order = Some(order);
        self
    }

    pub fn editor(mut self, editor: impl Into<String>) -> Self {
        self.editor = Some(editor.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = Some(help_text.into());
        self
    }

    pub fn input_type(mut self, input_type: InputType) -> Self {
        self.input_type = Some(input_type);
        self
    }

    pub fn related(mut self, model: impl Into<String>, field: impl Into<String>) -> Self {
        self.related_model = Some(model.into());
        self.related_field = Some(field.into());
        self
    }

    pub fn related_model(mut self, model: impl Into<String>) -> Self {
        self.related_model = Some(model.into());
        self
    }

    pub fn options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn persist(mut self, persist: bool) -> Self {
        self.persist = Some(persist);
        self
    }

    pub fn custom_validation(mut self, validator: CustomValidator) -> Self {
        self.custom_validation = Some(validator);
        self
    }

    pub fn is_grid_visible(&self) -> bool {
        self.grid_visible != Some(false)
    }

    pub fn is_form_visible(&self) -> bool {
        self.form_visible != Some(false)
    }

    /// Whether the field is sent to the backend on writes.
    pub fn is_persisted(&self) -> bool {
        self.persist != Some(false)
    }

    pub fn effective_form_group(&self) -> &str {
        self.form_group.as_deref().unwrap_or(DEFAULT_FORM_GROUP)
    }

    pub fn effective_form_order(&self) -> u32 {
        self.form_order.unwrap_or(DEFAULT_FORM_ORDER)
    }

    pub fn effective_editor(&self) -> &str {
        self.editor
            .as_deref()
            .unwrap_or_else(|| self.field_type.default_editor())
    }

    pub fn effective_grid_width(&self) -> u32 {
        self.grid_width
            .unwrap_or_else(|| self.field_type.default_grid_width())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_type_wire_names() {
        assert_eq!(serde_json::to_value(FieldType::DateTime).unwrap(), "datetime");
        assert_eq!(serde_json::to_value(FieldType::URL).unwrap(), "url");
        assert_eq!(
            serde_json::to_value(FieldType::ForeignKey).unwrap(),
            "foreignkey"
        );
        assert_eq!(
            serde_json::from_value::<FieldType>(json!("multiselect")).unwrap(),
            FieldType::MultiSelect
        );
        assert_eq!(FieldType::MultiSelect.as_str(), "multiselect");
    }

    #[test]
    fn test_effective_defaults() {
        let field = FieldDescriptor::new("resumen", FieldType::Text, "Resumen");
        assert!(field.is_grid_visible());
        assert!(field.is_form_visible());
        assert!(field.is_persisted());
        assert_eq!(field.effective_form_group(), "general");
        assert_eq!(field.effective_form_order(), 999);
        assert_eq!(field.effective_editor(), "TextArea");
        assert_eq!(field.effective_grid_width(), 300);
    }

    #[test]
    fn test_serialization_skips_unset_hints() {
        let field = FieldDescriptor::new("slug", FieldType::String, "Slug")
            .pattern(FieldPattern::new("^[a-z0-9-]+$").unwrap())
            .grid_render(GridRender::ImageThumbnail)
            .custom_validation(CustomValidator::new(|_| None));

        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(value["type"], "string");
        assert_eq!(value["pattern"], "^[a-z0-9-]+$");
        assert_eq!(value["gridRender"], "image-thumbnail");
        assert!(value.get("gridWidth").is_none());
        assert!(value.get("options").is_none());
        assert!(value.get("customValidation").is_none());
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(FieldPattern::new("([a-z").is_err());
    }
}
