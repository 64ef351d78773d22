//! Single-value and whole-record validation.
//!
//! Precedence: required check, then type-specific checks, then the field
//! pattern, then the custom hook. The first failure wins.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::messages;
use crate::models::{is_empty_value, value_to_text, FieldDescriptor, FieldType, ModelDescriptor, Record};

/// Field name -> first error message.
pub type FieldErrors = BTreeMap<String, String>;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

pub fn is_valid_email(text: &str) -> bool {
    EMAIL_RE.is_match(text)
}

/// Absolute URL check.
pub fn is_valid_url(text: &str) -> bool {
    url::Url::parse(text).is_ok()
}

/// Lenient numeric reading of a form value.
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Some(0.0);
            }
            trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Accepts RFC 3339 timestamps, plain dates, naive date-times and epoch
/// milliseconds.
pub fn is_valid_date(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => {
            DateTime::parse_from_rfc3339(s).is_ok()
                || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
                || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").is_ok()
                || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").is_ok()
        }
        _ => false,
    }
}

/// Validate one value against its field. Returns the first error message.
pub fn validate_value(value: Option<&Value>, field: &FieldDescriptor) -> Option<String> {
    let value = match value {
        Some(v) if !is_empty_value(Some(v)) => v,
        _ if field.required => return Some(messages::required(field)),
        _ => return None,
    };

    if let Some(message) = check_type(value, field) {
        return Some(message);
    }

    if let Some(pattern) = &field.pattern {
        if !pattern.is_match(&value_to_text(value)) {
            return Some(messages::pattern_mismatch(field));
        }
    }

    field
        .custom_validation
        .as_ref()
        .and_then(|validator| validator.call(value))
}

fn check_type(value: &Value, field: &FieldDescriptor) -> Option<String> {
    match field.field_type {
        FieldType::String | FieldType::Text => {
            let Value::String(text) = value else {
                return Some(messages::not_text(field));
            };
            let length = text.chars().count();
            if let Some(min) = field.min_length.filter(|&n| n > 0) {
                if length < min {
                    return Some(messages::min_length(field, min));
                }
            }
            if let Some(max) = field.max_length.filter(|&n| n > 0) {
                if length > max {
                    return Some(messages::max_length(field, max));
                }
            }
            None
        }
        FieldType::Number => {
            let Some(number) = parse_number(value) else {
                return Some(messages::not_number(field));
            };
            if let Some(min) = field.min {
                if number < min {
                    return Some(messages::min_value(min));
                }
            }
            if let Some(max) = field.max {
                if number > max {
                    return Some(messages::max_value(max));
                }
            }
            None
        }
        FieldType::Email => {
            (!is_valid_email(&value_to_text(value))).then(messages::invalid_email)
        }
        FieldType::URL => (!is_valid_url(&value_to_text(value))).then(messages::invalid_url),
        _ => None,
    }
}

/// Validate a whole record against a model, one message per failing field.
pub fn validate_model(data: &Record, model: &ModelDescriptor) -> FieldErrors {
    model
        .fields()
        .iter()
        .filter_map(|field| {
            validate_value(data.get(&field.name), field).map(|err| (field.name.clone(), err))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CustomValidator, FieldPattern};
    use serde_json::json;

    fn text(required: bool) -> FieldDescriptor {
        let field = FieldDescriptor::new("nombre", FieldType::String, "Nombre")
            .min_length(3)
            .max_length(5);
        if required {
            field.required()
        } else {
            field
        }
    }

    #[test]
    fn test_required_empty_values_fail() {
        let field = text(true);
        for value in [None, Some(json!(null)), Some(json!(""))] {
            assert_eq!(
                validate_value(value.as_ref(), &field).as_deref(),
                Some("Nombre es obligatorio")
            );
        }
    }

    #[test]
    fn test_optional_empty_values_short_circuit() {
        let field = text(false)
            .pattern(FieldPattern::new("^x+$").unwrap())
            .custom_validation(CustomValidator::new(|_| Some("nunca".to_string())));
        for value in [None, Some(json!(null)), Some(json!(""))] {
            assert_eq!(validate_value(value.as_ref(), &field), None);
        }
    }

    #[test]
    fn test_string_length_bounds() {
        let field = text(false);
        assert_eq!(
            validate_value(Some(&json!("ab")), &field).as_deref(),
            Some("Nombre debe tener al menos 3 caracteres")
        );
        assert_eq!(
            validate_value(Some(&json!("abcdef")), &field).as_deref(),
            Some("Nombre no puede exceder 5 caracteres")
        );
        assert_eq!(validate_value(Some(&json!("ñandú")), &field), None);
        assert_eq!(
            validate_value(Some(&json!(12)), &field).as_deref(),
            Some("Nombre debe ser texto")
        );
    }

    #[test]
    fn test_number_parse_and_bounds() {
        let field = FieldDescriptor::new("orden", FieldType::Number, "Orden")
            .min(0.0)
            .max(100.0);
        assert_eq!(validate_value(Some(&json!("42")), &field), None);
        assert_eq!(validate_value(Some(&json!(7.5)), &field), None);
        assert_eq!(
            validate_value(Some(&json!("abc")), &field).as_deref(),
            Some("Orden debe ser un número")
        );
        assert_eq!(
            validate_value(Some(&json!(-1)), &field).as_deref(),
            Some("El valor mínimo es 0")
        );
        assert_eq!(
            validate_value(Some(&json!("101")), &field).as_deref(),
            Some("El valor máximo es 100")
        );
    }

    #[test]
    fn test_infinite_strings_are_not_numbers() {
        let field = FieldDescriptor::new("orden", FieldType::Number, "Orden").max(100.0);
        for raw in ["inf", "-infinity", "Infinity", "NaN"] {
            assert_eq!(parse_number(&json!(raw)), None, "{}", raw);
            assert_eq!(
                validate_value(Some(&json!(raw)), &field).as_deref(),
                Some("Orden debe ser un número")
            );
        }
    }

    #[test]
    fn test_email_format() {
        let field = FieldDescriptor::new("email", FieldType::Email, "Email");
        assert_eq!(validate_value(Some(&json!("a@b.co")), &field), None);
        assert!(validate_value(Some(&json!("a@b")), &field).is_some());
        assert!(validate_value(Some(&json!("a.com")), &field).is_some());
    }

    #[test]
    fn test_url_parseability() {
        let field = FieldDescriptor::new("canonical_url", FieldType::URL, "URL Canónica");
        assert_eq!(validate_value(Some(&json!("https://example.com/a")), &field), None);
        assert_eq!(
            validate_value(Some(&json!("/relativa")), &field).as_deref(),
            Some("Por favor ingrese una URL válida")
        );
    }

    #[test]
    fn test_pattern_runs_after_type_checks_and_custom_last() {
        let field = FieldDescriptor::new("slug", FieldType::String, "Slug")
            .max_length(10)
            .pattern(FieldPattern::new("^[a-z0-9-]+$").unwrap())
            .custom_validation(CustomValidator::new(|v| {
                (v == &json!("reservado")).then(|| "Slug reservado".to_string())
            }));

        assert_eq!(
            validate_value(Some(&json!("demasiado-largo")), &field).as_deref(),
            Some("Slug no puede exceder 10 caracteres")
        );
        assert_eq!(
            validate_value(Some(&json!("Mayús")), &field).as_deref(),
            Some("Slug no cumple con el formato requerido")
        );
        assert_eq!(
            validate_value(Some(&json!("reservado")), &field).as_deref(),
            Some("Slug reservado")
        );
        assert_eq!(validate_value(Some(&json!("libre")), &field), None);
    }

    #[test]
    fn test_validate_model_reports_first_error_per_field() {
        let model = ModelDescriptor::builder("Usuario")
            .endpoint("/usuarios")
            .field(text(true))
            .field(FieldDescriptor::new("email", FieldType::Email, "Email"))
            .field(FieldDescriptor::new("edad", FieldType::Number, "Edad").min(18.0))
            .build()
            .unwrap();

        let data = json!({ "email": "x", "edad": "10" }).as_object().cloned().unwrap();
        let errors = validate_model(&data, &model);

        assert_eq!(errors.len(), 3);
        assert_eq!(errors["nombre"], "Nombre es obligatorio");
        assert_eq!(errors["email"], "Por favor ingrese un email válido");
        assert_eq!(errors["edad"], "El valor mínimo es 18");
    }

    #[test]
    fn test_is_valid_date() {
        assert!(is_valid_date(&json!("2024-05-01")));
        assert!(is_valid_date(&json!("2024-05-01T10:00:00Z")));
        assert!(is_valid_date(&json!("2024-05-01 10:00:00")));
        assert!(is_valid_date(&json!(1714557600000i64)));
        assert!(!is_valid_date(&json!("mañana")));
        assert!(!is_valid_date(&json!(true)));
    }
}
