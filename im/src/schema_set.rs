use xb_xstypes::QName;

use crate::attribute::AttributeUse;
use crate::complex_type::{AttributeGroupDefinition, ComplexType};
use crate::model_group::ModelGroupDefinition;
use crate::simple_type::SimpleType;
use crate::ElementDeclaration;
use crate::Schema;

/// A sequence of schemas plus a `resolved` flag (spec §3.2).
///
/// Lookups are linear scans over the contained schemas in insertion order and return the first
/// match (spec §4.9, §5): two schemas may legally declare the same target namespace, and the
/// resolver (in `xb-schema-set`) is responsible for rejecting genuine duplicates within a kind.
#[derive(Clone, Debug, Default)]
pub struct SchemaSet {
    schemas: Vec<Schema>,
    resolved: bool,
}

impl SchemaSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, schema: Schema) {
        self.schemas.push(schema);
        self.resolved = false;
    }

    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }

    pub fn schemas_mut(&mut self) -> &mut Vec<Schema> {
        self.resolved = false;
        &mut self.schemas
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Set only by the resolver in `xb-schema-set`; any mutation through `schemas_mut` resets it.
    pub fn set_resolved(&mut self, resolved: bool) {
        self.resolved = resolved;
    }

    pub fn find_simple_type(&self, name: &QName) -> Option<&SimpleType> {
        self.schemas.iter().find_map(|s| s.find_simple_type(name))
    }

    pub fn find_complex_type(&self, name: &QName) -> Option<&ComplexType> {
        self.schemas.iter().find_map(|s| s.find_complex_type(name))
    }

    pub fn find_element(&self, name: &QName) -> Option<&ElementDeclaration> {
        self.schemas.iter().find_map(|s| s.find_element(name))
    }

    pub fn find_attribute(&self, name: &QName) -> Option<&AttributeUse> {
        self.schemas.iter().find_map(|s| s.find_attribute(name))
    }

    pub fn find_model_group_def(&self, name: &QName) -> Option<&ModelGroupDefinition> {
        self.schemas.iter().find_map(|s| s.find_model_group_def(name))
    }

    pub fn find_attribute_group_def(&self, name: &QName) -> Option<&AttributeGroupDefinition> {
        self.schemas.iter().find_map(|s| s.find_attribute_group_def(name))
    }

    /// Either a simple or complex type definition with this name.
    pub fn find_type(&self, name: &QName) -> bool {
        self.find_simple_type(name).is_some() || self.find_complex_type(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_first_match_in_insertion_order() {
        let mut set = SchemaSet::new();
        let mut a = Schema::new("urn:a");
        a.simple_types.push(SimpleType {
            name: QName::new("urn:a", "Side"),
            base: QName::new(crate::builtins::XSD_NS, "string"),
            variety: crate::simple_type::SimpleTypeVariety::Atomic,
            facets: Default::default(),
        });
        set.push(a);
        assert!(set.find_simple_type(&QName::new("urn:a", "Side")).is_some());
        assert!(!set.is_resolved());
    }
}
