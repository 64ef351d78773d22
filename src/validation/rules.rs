//! Per-field validation rules in the form widget rule-engine format.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::messages;
use super::validator::{is_valid_date, is_valid_email, is_valid_url, parse_number};
use crate::models::{
    is_empty_value, value_to_text, CustomValidator, FieldDescriptor, FieldPattern, FieldType,
    ModelDescriptor,
};

/// When a form widget evaluates a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    Blur,
    Change,
}

#[derive(Debug, Clone)]
pub enum RuleKind {
    Required,
    MinLength(usize),
    MaxLength(usize),
    NumberType,
    MinValue(f64),
    MaxValue(f64),
    Email,
    Url,
    BooleanType,
    Date,
    /// Required choice on a foreign key.
    Selection,
    Pattern(FieldPattern),
    Custom(CustomValidator),
}

/// One executable validation rule.
#[derive(Debug, Clone)]
pub struct ValidationRule {
    pub kind: RuleKind,
    /// Absent for custom rules, which report the hook's own message.
    pub message: Option<String>,
    pub trigger: Trigger,
}

impl ValidationRule {
    fn new(kind: RuleKind, message: String, trigger: Trigger) -> Self {
        Self {
            kind,
            message: Some(message),
            trigger,
        }
    }

    /// Run the rule against a value, returning the failure message.
    ///
    /// Only the required-style rules fail on an empty value; custom rules
    /// always run.
    pub fn check(&self, value: Option<&Value>) -> Result<(), String> {
        let empty = is_empty_value(value);
        let failed = match (&self.kind, value) {
            (RuleKind::Required | RuleKind::Selection, _) => empty,
            (RuleKind::Custom(validator), _) => {
                let error = validator.call(value.unwrap_or(&Value::Null));
                return error.map_or(Ok(()), Err);
            }
            (_, None) => false,
            _ if empty => false,
            (kind, Some(value)) => !passes(kind, value),
        };

        if failed {
            Err(self.message.clone().unwrap_or_default())
        } else {
            Ok(())
        }
    }
}

fn passes(kind: &RuleKind, value: &Value) -> bool {
    match kind {
        RuleKind::MinLength(min) => value
            .as_str()
            .map_or(true, |s| s.chars().count() >= *min),
        RuleKind::MaxLength(max) => value
            .as_str()
            .map_or(true, |s| s.chars().count() <= *max),
        RuleKind::NumberType => parse_number(value).is_some(),
        RuleKind::MinValue(min) => parse_number(value).map_or(true, |n| n >= *min),
        RuleKind::MaxValue(max) => parse_number(value).map_or(true, |n| n <= *max),
        RuleKind::Email => is_valid_email(&value_to_text(value)),
        RuleKind::Url => is_valid_url(&value_to_text(value)),
        RuleKind::BooleanType => value.is_boolean(),
        RuleKind::Date => is_valid_date(value),
        RuleKind::Pattern(pattern) => pattern.is_match(&value_to_text(value)),
        RuleKind::Required | RuleKind::Selection | RuleKind::Custom(_) => true,
    }
}

impl Serialize for ValidationRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match &self.kind {
            RuleKind::Required | RuleKind::Selection => map.serialize_entry("required", &true)?,
            RuleKind::MinLength(n) => map.serialize_entry("min", n)?,
            RuleKind::MaxLength(n) => map.serialize_entry("max", n)?,
            RuleKind::NumberType => map.serialize_entry("type", "number")?,
            RuleKind::MinValue(n) => {
                map.serialize_entry("type", "number")?;
                map.serialize_entry("min", n)?;
            }
            RuleKind::MaxValue(n) => {
                map.serialize_entry("type", "number")?;
                map.serialize_entry("max", n)?;
            }
            RuleKind::Email => map.serialize_entry("type", "email")?,
            RuleKind::Url => map.serialize_entry("type", "url")?,
            RuleKind::BooleanType => map.serialize_entry("type", "boolean")?,
            RuleKind::Date => map.serialize_entry("type", "date")?,
            RuleKind::Pattern(pattern) => map.serialize_entry("pattern", pattern.as_str())?,
            RuleKind::Custom(_) => map.serialize_entry("validator", "custom")?,
        }
        if let Some(message) = &self.message {
            map.serialize_entry("message", message)?;
        }
        map.serialize_entry("trigger", &self.trigger)?;
        map.end()
    }
}

/// Rules for one field: required, type-specific, pattern, custom.
pub fn generate_field_rules(field: &FieldDescriptor) -> Vec<ValidationRule> {
    let mut rules = Vec::new();

    if field.required {
        rules.push(ValidationRule::new(
            RuleKind::Required,
            messages::required(field),
            Trigger::Blur,
        ));
    }

    match field.field_type {
        FieldType::String | FieldType::Text => {
            if let Some(min) = field.min_length.filter(|&n| n > 0) {
                rules.push(ValidationRule::new(
                    RuleKind::MinLength(min),
                    messages::min_length(field, min),
                    Trigger::Blur,
                ));
            }
            if let Some(max) = field.max_length.filter(|&n| n > 0) {
                rules.push(ValidationRule::new(
                    RuleKind::MaxLength(max),
                    messages::max_length(field, max),
                    Trigger::Blur,
                ));
            }
        }
        FieldType::Number => {
            rules.push(ValidationRule::new(
                RuleKind::NumberType,
                messages::not_number(field),
                Trigger::Blur,
            ));
            if let Some(min) = field.min {
                rules.push(ValidationRule::new(
                    RuleKind::MinValue(min),
                    messages::min_value(min),
                    Trigger::Blur,
                ));
            }
            if let Some(max) = field.max {
                rules.push(ValidationRule::new(
                    RuleKind::MaxValue(max),
                    messages::max_value(max),
                    Trigger::Blur,
                ));
            }
        }
        FieldType::Email => rules.push(ValidationRule::new(
            RuleKind::Email,
            messages::invalid_email(),
            Trigger::Blur,
        )),
        FieldType::URL => rules.push(ValidationRule::new(
            RuleKind::Url,
            messages::invalid_url(),
            Trigger::Blur,
        )),
        FieldType::Boolean => rules.push(ValidationRule::new(
            RuleKind::BooleanType,
            messages::not_boolean(field),
            Trigger::Change,
        )),
        FieldType::Date | FieldType::DateTime => rules.push(ValidationRule::new(
            RuleKind::Date,
            messages::invalid_date(field),
            Trigger::Change,
        )),
        FieldType::ForeignKey if field.required => rules.push(ValidationRule::new(
            RuleKind::Selection,
            messages::selection_required(field),
            Trigger::Change,
        )),
        _ => {}
    }

    if let Some(pattern) = &field.pattern {
        rules.push(ValidationRule::new(
            RuleKind::Pattern(pattern.clone()),
            messages::pattern_mismatch(field),
            Trigger::Blur,
        ));
    }

    if let Some(validator) = &field.custom_validation {
        rules.push(ValidationRule {
            kind: RuleKind::Custom(validator.clone()),
            message: None,
            trigger: Trigger::Blur,
        });
    }

    rules
}

/// Field name -> rules, for every field that has at least one rule.
pub fn generate_rules(model: &ModelDescriptor) -> BTreeMap<String, Vec<ValidationRule>> {
    model
        .fields()
        .iter()
        .map(|field| (field.name.clone(), generate_field_rules(field)))
        .filter(|(_, rules)| !rules.is_empty())
        .collect()
}
