//! Validation: rule generation, value/record validation and form state.

mod form;
mod messages;
mod rules;
mod validator;

pub use form::FormValidator;
pub use rules::{generate_field_rules, generate_rules, RuleKind, Trigger, ValidationRule};
pub use validator::{
    is_valid_date, is_valid_email, is_valid_url, parse_number, validate_model, validate_value,
    FieldErrors,
};
