//! User-facing validation messages.

use crate::models::FieldDescriptor;

pub fn required(field: &FieldDescriptor) -> String {
    format!("{} es obligatorio", field.label)
}

pub fn min_length(field: &FieldDescriptor, min: usize) -> String {
    format!("{} debe tener al menos {} caracteres", field.label, min)
}

pub fn max_length(field: &FieldDescriptor, max: usize) -> String {
    format!("{} no puede exceder {} caracteres", field.label, max)
}

pub fn not_text(field: &FieldDescriptor) -> String {
    format!("{} debe ser texto", field.label)
}

pub fn not_number(field: &FieldDescriptor) -> String {
    format!("{} debe ser un número", field.label)
}

pub fn min_value(min: f64) -> String {
    format!("El valor mínimo es {}", min)
}

pub fn max_value(max: f64) -> String {
    format!("El valor máximo es {}", max)
}

pub fn invalid_email() -> String {
    "Por favor ingrese un email válido".to_string()
}

pub fn invalid_url() -> String {
    "Por favor ingrese una URL válida".to_string()
}

pub fn not_boolean(field: &FieldDescriptor) -> String {
    format!("{} debe ser verdadero o falso", field.label)
}

pub fn invalid_date(field: &FieldDescriptor) -> String {
    format!("{} debe ser una fecha válida", field.label)
}

pub fn selection_required(field: &FieldDescriptor) -> String {
    format!("Debe seleccionar {}", field.label)
}

pub fn pattern_mismatch(field: &FieldDescriptor) -> String {
    format!("{} no cumple con el formato requerido", field.label)
}
