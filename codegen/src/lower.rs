//! Lowers a resolved `xb_im::SchemaSet` into the codegen [`ist`](crate::ist) tree (spec §4.13).
//! Every type in a schema set is already uniquely named by the time it reaches this stage — the
//! XSD/RNG/DTD frontends synthesize a name for anonymous types during translation — so lowering
//! is a single linear pass per schema with no anonymous-naming concerns of its own.

use xb_im::{
    AttributeGroupDefinition, AttributeUse, Compositor, ComplexType, ContentType, ModelGroup, Occurs, Schema,
    SchemaSet, SimpleType, Term,
};
use xb_xstypes::QName;

use crate::ist::{AliasType, ElementBinding, EnumType, EnumVariant, Field, Module, RecordType, Type};
use crate::naming;
use crate::namespace::NamespaceMap;
use crate::type_map::TypeMap;

pub fn lower_schema_set(set: &SchemaSet, namespaces: &NamespaceMap, type_map: &TypeMap) -> Vec<Module> {
    set.schemas().iter().map(|schema| lower_schema(schema, set, namespaces, type_map)).collect()
}

fn lower_schema(schema: &Schema, set: &SchemaSet, namespaces: &NamespaceMap, type_map: &TypeMap) -> Module {
    let mut types = Vec::new();
    for simple_type in &schema.simple_types {
        types.push(lower_simple_type(simple_type, type_map));
    }
    for complex_type in &schema.complex_types {
        types.push(lower_complex_type(complex_type, set, type_map));
    }

    let elements = schema
        .elements
        .iter()
        .map(|el| {
            let (type_name, _) = mapped(&el.type_, type_map);
            ElementBinding {
                element_name: naming::field_name(&el.name.local),
                type_name,
                xml_name: el.name.local.clone(),
            }
        })
        .collect();

    Module { namespace_path: namespaces.resolve(&schema.target_namespace), types, elements }
}

fn mapped(name: &QName, type_map: &TypeMap) -> (String, Option<String>) {
    match type_map.lookup(name) {
        Some(mapping) => (mapping.target_type.clone(), mapping.required_import.clone()),
        None => (naming::type_name(&name.local), None),
    }
}

fn lower_simple_type(simple_type: &SimpleType, type_map: &TypeMap) -> Type {
    if simple_type.has_enumeration() {
        let variants = simple_type
            .facets
            .enumeration
            .as_ref()
            .expect("has_enumeration checked Some above")
            .iter()
            .map(|value| EnumVariant { name: naming::type_name(value), xml_value: value.clone() })
            .collect();
        Type::Enum(EnumType { name: naming::type_name(&simple_type.name.local), variants })
    } else {
        let (target, required_import) = mapped(&simple_type.base, type_map);
        Type::Alias(AliasType { name: naming::type_name(&simple_type.name.local), target, required_import })
    }
}

fn lower_complex_type(complex_type: &ComplexType, set: &SchemaSet, type_map: &TypeMap) -> Type {
    let mut fields = Vec::new();

    match &complex_type.content {
        ContentType::Empty => {}
        ContentType::Simple { base, .. } => {
            let (target, required_import) = mapped(base, type_map);
            fields.push(Field {
                name: "value".to_string(),
                type_expr: target,
                required_import,
                optional: false,
                repeating: false,
                default: None,
                documentation: None,
                is_attribute: false,
                xml_name: "#text".to_string(),
            });
        }
        ContentType::ElementOnly { content_model, .. } | ContentType::Mixed { content_model, .. } => {
            if let Some(model_group) = content_model {
                collect_particles(model_group, set, type_map, &mut fields);
            }
        }
    }

    for attribute in &complex_type.attributes {
        fields.push(lower_attribute(attribute, type_map));
    }
    for group_ref in &complex_type.attribute_group_refs {
        if let Some(def) = set.find_attribute_group_def(group_ref) {
            flatten_attribute_group(def, set, type_map, &mut fields);
        }
    }

    Type::Record(RecordType { name: naming::type_name(&complex_type.name.local), fields })
}

fn flatten_attribute_group(def: &AttributeGroupDefinition, set: &SchemaSet, type_map: &TypeMap, fields: &mut Vec<Field>) {
    for attribute in &def.attributes {
        fields.push(lower_attribute(attribute, type_map));
    }
    for group_ref in &def.attribute_group_refs {
        if let Some(nested) = set.find_attribute_group_def(group_ref) {
            flatten_attribute_group(nested, set, type_map, fields);
        }
    }
}

fn lower_attribute(attribute: &AttributeUse, type_map: &TypeMap) -> Field {
    let (target, required_import) = mapped(&attribute.type_, type_map);
    Field {
        name: naming::field_name(&attribute.name.local),
        type_expr: target,
        required_import,
        optional: !attribute.required,
        repeating: false,
        default: attribute.default.clone().or_else(|| attribute.fixed.clone()),
        documentation: None,
        is_attribute: true,
        xml_name: attribute.name.local.clone(),
    }
}

/// Flattens a model group's particles into a flat field list (spec §4.13's "one field per child
/// particle"). Nested groups recurse in place rather than nesting a sub-record: a `sequence`'s
/// or `all`'s members are all simultaneously present fields either way, and a `choice`'s
/// branches become mutually-exclusive optional fields rather than a tagged-union variant (the
/// generator has no tagged-union IST node yet — see DESIGN.md).
fn collect_particles(model_group: &ModelGroup, set: &SchemaSet, type_map: &TypeMap, fields: &mut Vec<Field>) {
    let force_optional = matches!(model_group.compositor, Compositor::Choice);

    for particle in &model_group.particles {
        let repeating = matches!(particle.max_occurs, Occurs::Unbounded)
            || matches!(particle.max_occurs, Occurs::Bounded(n) if n > 1);
        let optional = (particle.min_occurs == 0 && !repeating) || (force_optional && !repeating);

        match &particle.term {
            Term::InlineElement(element) => {
                let (target, required_import) = mapped(&element.type_, type_map);
                fields.push(Field {
                    name: naming::field_name(&element.name.local),
                    type_expr: target,
                    required_import,
                    optional,
                    repeating,
                    default: element.default.clone(),
                    documentation: None,
                    is_attribute: false,
                    xml_name: element.name.local.clone(),
                });
            }
            Term::ElementRef(name) => {
                if let Some(element) = set.find_element(name) {
                    let (target, required_import) = mapped(&element.type_, type_map);
                    fields.push(Field {
                        name: naming::field_name(&name.local),
                        type_expr: target,
                        required_import,
                        optional,
                        repeating,
                        default: element.default.clone(),
                        documentation: None,
                        is_attribute: false,
                        xml_name: name.local.clone(),
                    });
                }
            }
            Term::GroupRef(name) => {
                if let Some(def) = set.find_model_group_def(name) {
                    collect_particles(&def.model_group, set, type_map, fields);
                }
            }
            Term::Group(nested) => collect_particles(nested, set, type_map, fields),
            Term::Wildcard(_) => fields.push(Field {
                name: "any".to_string(),
                type_expr: "String".to_string(),
                required_import: None,
                optional,
                repeating,
                default: None,
                documentation: None,
                is_attribute: false,
                xml_name: "*".to_string(),
            }),
        }
    }
}
