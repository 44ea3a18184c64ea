use xb_xstypes::QName;

use crate::attribute::AttributeUse;
use crate::complex_type::{AttributeGroupDefinition, ComplexType};
use crate::model_group::ModelGroupDefinition;
use crate::simple_type::SimpleType;
use crate::wildcard::Wildcard;
use crate::ElementDeclaration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import {
    pub namespace: Option<String>,
    pub schema_location: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Include {
    pub schema_location: String,
}

/// A flat container scoped to a single target namespace URI (spec §3.2). Top-level definitions
/// are kept in insertion order, which the resolver's lookups and the code generator's emission
/// both rely on for determinism (spec §4.3, §5).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schema {
    pub target_namespace: String,
    pub simple_types: Vec<SimpleType>,
    pub complex_types: Vec<ComplexType>,
    pub elements: Vec<ElementDeclaration>,
    pub attributes: Vec<AttributeUse>,
    pub model_groups: Vec<ModelGroupDefinition>,
    pub attribute_groups: Vec<AttributeGroupDefinition>,
    pub imports: Vec<Import>,
    pub includes: Vec<Include>,
    pub default_open_content: Option<Wildcard>,
}

impl Schema {
    pub fn new(target_namespace: impl Into<String>) -> Self {
        Self { target_namespace: target_namespace.into(), ..Default::default() }
    }

    pub fn find_simple_type(&self, name: &QName) -> Option<&SimpleType> {
        self.simple_types.iter().find(|t| &t.name == name)
    }

    pub fn find_complex_type(&self, name: &QName) -> Option<&ComplexType> {
        self.complex_types.iter().find(|t| &t.name == name)
    }

    pub fn find_element(&self, name: &QName) -> Option<&ElementDeclaration> {
        self.elements.iter().find(|e| &e.name == name)
    }

    pub fn find_attribute(&self, name: &QName) -> Option<&AttributeUse> {
        self.attributes.iter().find(|a| &a.name == name)
    }

    pub fn find_model_group_def(&self, name: &QName) -> Option<&ModelGroupDefinition> {
        self.model_groups.iter().find(|g| &g.name == name)
    }

    pub fn find_attribute_group_def(&self, name: &QName) -> Option<&AttributeGroupDefinition> {
        self.attribute_groups.iter().find(|g| &g.name == name)
    }
}
