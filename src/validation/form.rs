//! Validation state for one form bound to a model.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use super::rules::{generate_rules, ValidationRule};
use super::validator::{validate_model, validate_value, FieldErrors};
use crate::models::{ModelDescriptor, Record};

#[derive(Debug, Clone)]
pub struct FormValidator {
    model: Arc<ModelDescriptor>,
    errors: FieldErrors,
    is_valid: bool,
}

impl FormValidator {
    pub fn new(model: Arc<ModelDescriptor>) -> Self {
        Self {
            model,
            errors: FieldErrors::new(),
            is_valid: true,
        }
    }

    /// Validate one field, updating its stored error. Unknown fields pass.
    pub fn validate_field(&mut self, field_name: &str, value: Option<&Value>) -> bool {
        let Some(field) = self.model.field(field_name) else {
            return true;
        };

        match validate_value(value, field) {
            Some(error) => {
                self.errors.insert(field_name.to_string(), error);
                false
            }
            None => {
                self.errors.remove(field_name);
                true
            }
        }
    }

    /// Validate the whole record, replacing all stored errors.
    pub fn validate(&mut self, data: &Record) -> bool {
        self.errors = validate_model(data, &self.model);
        self.is_valid = self.errors.is_empty();
        self.is_valid
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
        self.is_valid = true;
    }

    pub fn clear_field_error(&mut self, field_name: &str) {
        self.errors.remove(field_name);
    }

    /// Record an externally produced error, e.g. a server-side rejection.
    pub fn set_error(&mut self, field_name: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(field_name.into(), message.into());
        self.is_valid = false;
    }

    pub fn rules(&self) -> BTreeMap<String, Vec<ValidationRule>> {
        generate_rules(&self.model)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field_name: &str) -> Option<&str> {
        self.errors.get(field_name).map(String::as_str)
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldDescriptor, FieldType};
    use serde_json::json;

    fn validator() -> FormValidator {
        let model = ModelDescriptor::builder("VariableSistema")
            .endpoint("/variables-sistema")
            .field(FieldDescriptor::new("nombre", FieldType::String, "Nombre").required())
            .field(FieldDescriptor::new("valor", FieldType::Text, "Valor").required())
            .build()
            .unwrap();
        FormValidator::new(Arc::new(model))
    }

    #[test]
    fn test_validate_sets_errors_and_flag() {
        let mut form = validator();
        let data = json!({ "nombre": "MAX_UPLOAD" }).as_object().cloned().unwrap();

        assert!(!form.validate(&data));
        assert!(!form.is_valid());
        assert_eq!(form.error("valor"), Some("Valor es obligatorio"));
        assert_eq!(form.errors().len(), 1);
    }

    #[test]
    fn test_validate_field_adds_and_removes_error() {
        let mut form = validator();
        assert!(!form.validate_field("nombre", Some(&json!(""))));
        assert_eq!(form.error("nombre"), Some("Nombre es obligatorio"));

        assert!(form.validate_field("nombre", Some(&json!("X"))));
        assert_eq!(form.error("nombre"), None);

        assert!(form.validate_field("inexistente", None));
    }

    #[test]
    fn test_set_and_clear_errors() {
        let mut form = validator();
        form.set_error("nombre", "Ya existe");
        assert!(!form.is_valid());

        form.clear_field_error("nombre");
        assert!(form.errors().is_empty());

        form.set_error("valor", "Inválido");
        form.clear_errors();
        assert!(form.is_valid());
        assert!(form.errors().is_empty());
        assert_eq!(form.rules().len(), 2);
    }
}
