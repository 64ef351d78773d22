//! Field metadata registry.
//!
//! Each inheritance level of a model owns a `FieldSet` linked to its parent.
//! Flattening walks from the most derived level to the root, so a field
//! declared closer to the model always wins over an ancestor's field of the
//! same name.

use std::collections::HashSet;
use std::sync::Arc;

use crate::models::FieldDescriptor;

/// Fields declared at one inheritance level.
#[derive(Debug, Clone, Default)]
pub struct FieldSet {
    name: String,
    parent: Option<Arc<FieldSet>>,
    fields: Vec<FieldDescriptor>,
}

impl FieldSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            fields: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: Arc<FieldSet>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Chained form of [`FieldSet::register`].
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.register(field);
        self
    }

    /// Store a descriptor at this level. Re-registering a name replaces the
    /// earlier descriptor in place.
    pub fn register(&mut self, field: FieldDescriptor) {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Arc<FieldSet>> {
        self.parent.as_ref()
    }

    /// Fields declared at this level only.
    pub fn declared(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// This level followed by each ancestor up to the root.
    pub fn lineage(&self) -> impl Iterator<Item = &FieldSet> {
        std::iter::successors(Some(self), |level| level.parent.as_deref())
    }

    /// Flatten the chain into one ordered list, closest definition wins.
    pub fn collect_fields(&self) -> Vec<FieldDescriptor> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut collected = Vec::new();

        for level in self.lineage() {
            for field in &level.fields {
                if seen.insert(field.name.as_str()) {
                    collected.push(field.clone());
                }
            }
        }

        collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldType;

    fn password(min_length: usize) -> FieldDescriptor {
        FieldDescriptor::new("contraseña", FieldType::String, "Contraseña").min_length(min_length)
    }

    #[test]
    fn test_closest_definition_wins() {
        let base = Arc::new(
            FieldSet::new("Usuario")
                .field(FieldDescriptor::new("nombre", FieldType::String, "Nombre"))
                .field(password(6)),
        );
        let derived = FieldSet::new("Administrador")
            .with_parent(base)
            .field(password(8));

        let fields = derived.collect_fields();
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["contraseña", "nombre"]);
        assert_eq!(fields[0].min_length, Some(8));
    }

    #[test]
    fn test_register_same_name_replaces_in_place() {
        let mut level = FieldSet::new("Obra");
        level.register(FieldDescriptor::new("nombre", FieldType::String, "Nombre"));
        level.register(FieldDescriptor::new("orden", FieldType::Number, "Orden"));
        level.register(FieldDescriptor::new("nombre", FieldType::Text, "Nombre largo"));

        let declared = level.declared();
        assert_eq!(declared.len(), 2);
        assert_eq!(declared[0].name, "nombre");
        assert_eq!(declared[0].field_type, FieldType::Text);
    }

    #[test]
    fn test_lineage_walks_to_root() {
        let root = Arc::new(FieldSet::new("Base"));
        let middle = Arc::new(FieldSet::new("Seo").with_parent(root));
        let leaf = FieldSet::new("Noticia").with_parent(middle);

        let names: Vec<&str> = leaf.lineage().map(FieldSet::name).collect();
        assert_eq!(names, vec!["Noticia", "Seo", "Base"]);
        assert!(leaf.collect_fields().is_empty());
    }
}
