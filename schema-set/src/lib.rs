//! Schema set registration and resolution (spec §4.9): a two-phase walk over an
//! [`xb_im::SchemaSet`] that registers every top-level definition into one of five disjoint
//! tables, then checks every reference against those tables (or the closed set of XSD builtins).

mod error;

pub use error::{ComponentKind, ResolveError};

use std::collections::HashSet;

use xb_im::{ContentType, ModelGroup, SchemaSet, SimpleTypeVariety, Term};
use xb_xstypes::QName;

#[derive(Default)]
struct Tables {
    types: HashSet<QName>,
    elements: HashSet<QName>,
    attributes: HashSet<QName>,
    model_groups: HashSet<QName>,
    attribute_groups: HashSet<QName>,
}

/// Registers every top-level definition in `set`, then checks every reference against the
/// registered tables and the closed set of XSD builtins. On success, marks `set` resolved (spec
/// §4.9, §5: a single boolean flag on the owning set, toggled only here).
pub fn resolve(set: &mut SchemaSet) -> Result<(), ResolveError> {
    let tables = register(set)?;
    check(set, &tables)?;
    set.set_resolved(true);
    Ok(())
}

fn register(set: &SchemaSet) -> Result<Tables, ResolveError> {
    let mut tables = Tables::default();
    for schema in set.schemas() {
        for st in &schema.simple_types {
            insert(&mut tables.types, st.name.clone(), ComponentKind::Type)?;
        }
        for ct in &schema.complex_types {
            insert(&mut tables.types, ct.name.clone(), ComponentKind::Type)?;
        }
        for el in &schema.elements {
            insert(&mut tables.elements, el.name.clone(), ComponentKind::Element)?;
        }
        for attr in &schema.attributes {
            insert(&mut tables.attributes, attr.name.clone(), ComponentKind::Attribute)?;
        }
        for mg in &schema.model_groups {
            insert(&mut tables.model_groups, mg.name.clone(), ComponentKind::ModelGroup)?;
        }
        for ag in &schema.attribute_groups {
            insert(&mut tables.attribute_groups, ag.name.clone(), ComponentKind::AttributeGroup)?;
        }
    }
    Ok(tables)
}

fn insert(table: &mut HashSet<QName>, name: QName, kind: ComponentKind) -> Result<(), ResolveError> {
    if !table.insert(name.clone()) {
        return Err(ResolveError::DuplicateName { kind, name });
    }
    Ok(())
}

fn check(set: &SchemaSet, tables: &Tables) -> Result<(), ResolveError> {
    for schema in set.schemas() {
        for st in &schema.simple_types {
            check_type(&st.base, tables)?;
            match &st.variety {
                SimpleTypeVariety::Atomic => {}
                SimpleTypeVariety::List { item } => check_type(item, tables)?,
                SimpleTypeVariety::Union { members } => {
                    for m in members {
                        check_type(m, tables)?;
                    }
                }
            }
        }
        for ct in &schema.complex_types {
            for attr in &ct.attributes {
                check_type(&attr.type_, tables)?;
            }
            for ag_ref in &ct.attribute_group_refs {
                check_ref(&tables.attribute_groups, ag_ref, ComponentKind::AttributeGroup)?;
            }
            match &ct.content {
                ContentType::Simple { base, .. } => check_type(base, tables)?,
                ContentType::ElementOnly { base, content_model, .. } | ContentType::Mixed { base, content_model, .. } => {
                    if let Some(base) = base {
                        check_type(base, tables)?;
                    }
                    if let Some(group) = content_model {
                        check_model_group(group, tables)?;
                    }
                }
                ContentType::Empty => {}
            }
        }
        for el in &schema.elements {
            check_type(&el.type_, tables)?;
            for alt in &el.type_alternatives {
                check_type(&alt.type_, tables)?;
            }
        }
        for attr in &schema.attributes {
            check_type(&attr.type_, tables)?;
        }
        for ag in &schema.attribute_groups {
            for attr in &ag.attributes {
                check_type(&attr.type_, tables)?;
            }
            for ag_ref in &ag.attribute_group_refs {
                check_ref(&tables.attribute_groups, ag_ref, ComponentKind::AttributeGroup)?;
            }
        }
        for mg in &schema.model_groups {
            check_model_group(&mg.model_group, tables)?;
        }
    }
    Ok(())
}

fn check_model_group(group: &ModelGroup, tables: &Tables) -> Result<(), ResolveError> {
    for particle in &group.particles {
        match &particle.term {
            Term::ElementRef(name) => check_ref(&tables.elements, name, ComponentKind::Element)?,
            Term::GroupRef(name) => check_ref(&tables.model_groups, name, ComponentKind::ModelGroup)?,
            Term::Group(nested) => check_model_group(nested, tables)?,
            Term::InlineElement(decl) => check_type(&decl.type_, tables)?,
            Term::Wildcard(_) => {}
        }
    }
    Ok(())
}

fn check_type(name: &QName, tables: &Tables) -> Result<(), ResolveError> {
    check_ref(&tables.types, name, ComponentKind::Type)
}

fn check_ref(table: &HashSet<QName>, name: &QName, kind: ComponentKind) -> Result<(), ResolveError> {
    if kind == ComponentKind::Type && xb_im::builtins::is_builtin(name) {
        return Ok(());
    }
    if table.contains(name) {
        return Ok(());
    }
    Err(ResolveError::UnresolvedReference { kind, name: name.clone() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use xb_im::builtins::XSD_NS;
    use xb_im::{AttributeUse, Compositor, ComplexType, ContentType, Derivation, ElementDeclaration, Occurs, Particle, Schema, SimpleType};

    fn builtin_string() -> QName {
        QName::new(XSD_NS, "string")
    }

    #[test]
    fn resolves_a_consistent_schema_set() {
        let mut schema = Schema::new("urn:example");
        schema.elements.push(ElementDeclaration {
            name: QName::new("urn:example", "title"),
            type_: builtin_string(),
            nillable: false,
            abstract_: false,
            default: None,
            fixed: None,
            substitution_group: None,
            type_alternatives: vec![],
        });
        let mut set = SchemaSet::new();
        set.push(schema);
        assert!(resolve(&mut set).is_ok());
        assert!(set.is_resolved());
    }

    #[test]
    fn duplicate_element_name_fails() {
        let mut schema = Schema::new("urn:example");
        for _ in 0..2 {
            schema.elements.push(ElementDeclaration {
                name: QName::new("urn:example", "title"),
                type_: builtin_string(),
                nillable: false,
                abstract_: false,
                default: None,
                fixed: None,
                substitution_group: None,
                type_alternatives: vec![],
            });
        }
        let mut set = SchemaSet::new();
        set.push(schema);
        match resolve(&mut set) {
            Err(ResolveError::DuplicateName { kind: ComponentKind::Element, .. }) => {}
            other => panic!("expected a duplicate element error, got {other:?}"),
        }
    }

    #[test]
    fn unresolved_type_reference_fails() {
        let mut schema = Schema::new("urn:example");
        schema.elements.push(ElementDeclaration {
            name: QName::new("urn:example", "title"),
            type_: QName::new("urn:example", "MissingType"),
            nillable: false,
            abstract_: false,
            default: None,
            fixed: None,
            substitution_group: None,
            type_alternatives: vec![],
        });
        let mut set = SchemaSet::new();
        set.push(schema);
        match resolve(&mut set) {
            Err(ResolveError::UnresolvedReference { kind: ComponentKind::Type, .. }) => {}
            other => panic!("expected an unresolved reference error, got {other:?}"),
        }
    }

    #[test]
    fn element_ref_inside_a_model_group_must_resolve() {
        let mut schema = Schema::new("urn:example");
        schema.complex_types.push(ComplexType {
            name: QName::new("urn:example", "BookType"),
            abstract_: false,
            mixed: false,
            content: ContentType::ElementOnly {
                base: None,
                derivation: Derivation::Restriction,
                content_model: Some(xb_im::ModelGroup {
                    compositor: Compositor::Sequence,
                    particles: vec![Particle {
                        term: xb_im::Term::ElementRef(QName::new("urn:example", "title")),
                        min_occurs: 1,
                        max_occurs: Occurs::Bounded(1),
                    }],
                }),
            },
            attributes: vec![AttributeUse {
                name: QName::no_namespace("isbn"),
                type_: builtin_string(),
                required: true,
                default: None,
                fixed: None,
            }],
            attribute_group_refs: vec![],
            attribute_wildcard: None,
            assertions: vec![],
        });
        schema.elements.push(ElementDeclaration {
            name: QName::new("urn:example", "title"),
            type_: builtin_string(),
            nillable: false,
            abstract_: false,
            default: None,
            fixed: None,
            substitution_group: None,
            type_alternatives: vec![],
        });
        let mut set = SchemaSet::new();
        set.push(schema);
        assert!(resolve(&mut set).is_ok());
    }

    #[test]
    fn simple_type_union_member_must_resolve() {
        let mut schema = Schema::new("urn:example");
        schema.simple_types.push(SimpleType {
            name: QName::new("urn:example", "Mixed"),
            base: builtin_string(),
            variety: SimpleTypeVariety::Union { members: vec![QName::new("urn:example", "Ghost")] },
            facets: Default::default(),
        });
        let mut set = SchemaSet::new();
        set.push(schema);
        assert!(resolve(&mut set).is_err());
    }
}
