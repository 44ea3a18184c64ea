//! DTD → intermediate-model translation (spec §4.5).
//!
//! - Each element declaration becomes a top-level element referencing a complex type named
//!   `<name>Type` — except a bare `(#PCDATA)` content spec with no attributes, which collapses
//!   straight to `xs:string` with no complex type at all.
//! - `ANY` content becomes mixed content with an unbounded wildcard particle.
//! - Enumeration and `NOTATION` attributes synthesize a restricted simple type named
//!   `<attribute>Type`.
//! - A child name with no matching `ELEMENT` declaration resolves to an element of type
//!   `xs:string` (spec §4.5) rather than failing translation.
//! - Multiple `ATTLIST` declarations for the same element merge in declaration order; within that
//!   merge, the first declaration of a given attribute name wins (matching XML's own rule).

use std::collections::HashSet;

use xb_im::builtins::XSD_NS;
use xb_im::{
    AttributeUse, Compositor, ContentType, Derivation, ElementDeclaration, FacetSet, ModelGroup, Occurs,
    Particle, Schema, SimpleType, SimpleTypeVariety, Term, Wildcard,
};
use xb_xstypes::QName;

use crate::model::{
    AttlistDecl, AttrDefault, AttrType, AttributeDef, ContentSpec, Document, ElementDecl, Quantifier, Separator, Term as DtdTerm,
};

struct Builder {
    schema: Schema,
    declared: HashSet<String>,
    synthesized_string_elements: HashSet<String>,
}

pub fn translate(doc: &Document) -> Schema {
    let mut builder = Builder {
        schema: Schema::new(String::new()),
        declared: doc.elements.iter().map(|e| e.name.clone()).collect(),
        synthesized_string_elements: HashSet::new(),
    };

    for element in &doc.elements {
        translate_element(&mut builder, element, &doc.attlists);
    }

    builder.schema
}

fn translate_element(builder: &mut Builder, element: &ElementDecl, attlists: &[AttlistDecl]) {
    let name = QName::no_namespace(&element.name);
    let attributes = merge_attributes(builder, &element.name, attlists);

    if let ContentSpec::Mixed { names } = &element.content_spec {
        if names.is_empty() && attributes.is_empty() {
            builder.schema.elements.push(ElementDeclaration {
                name,
                type_: string_type(),
                nillable: false,
                abstract_: false,
                default: None,
                fixed: None,
                substitution_group: None,
                type_alternatives: Vec::new(),
            });
            return;
        }
    }

    let type_name = QName::no_namespace(format!("{}Type", element.name));
    let (mixed, content) = content_type_for(builder, &element.content_spec);

    builder.schema.complex_types.push(xb_im::ComplexType {
        name: type_name.clone(),
        abstract_: false,
        mixed,
        content,
        attributes,
        attribute_group_refs: Vec::new(),
        attribute_wildcard: None,
        assertions: Vec::new(),
    });

    builder.schema.elements.push(ElementDeclaration {
        name,
        type_: type_name,
        nillable: false,
        abstract_: false,
        default: None,
        fixed: None,
        substitution_group: None,
        type_alternatives: Vec::new(),
    });
}

fn content_type_for(builder: &mut Builder, spec: &ContentSpec) -> (bool, ContentType) {
    match spec {
        ContentSpec::Empty => (false, ContentType::Empty),
        ContentSpec::Any => {
            let model = ModelGroup {
                compositor: Compositor::Sequence,
                particles: vec![Particle { term: Term::Wildcard(Wildcard::any()), min_occurs: 0, max_occurs: Occurs::Unbounded }],
            };
            (true, ContentType::Mixed { base: None, derivation: Derivation::Restriction, content_model: Some(model) })
        }
        ContentSpec::Mixed { names } => {
            let particles = names
                .iter()
                .map(|n| Particle {
                    term: Term::ElementRef(resolve_child_element(builder, n)),
                    min_occurs: 0,
                    max_occurs: Occurs::Unbounded,
                })
                .collect();
            let model = ModelGroup { compositor: Compositor::Choice, particles };
            (true, ContentType::Mixed { base: None, derivation: Derivation::Restriction, content_model: Some(model) })
        }
        ContentSpec::Children(particle) => {
            // Always wrap in an outer single-particle sequence so the top-level quantifier (e.g.
            // the `+` in `(title,author)+`) is preserved even when the term itself is a group.
            let term = translate_term(builder, &particle.term);
            let top = occurs_particle(term, particle.quantifier);
            let model = ModelGroup { compositor: Compositor::Sequence, particles: vec![top] };
            (false, ContentType::ElementOnly { base: None, derivation: Derivation::Restriction, content_model: Some(model) })
        }
    }
}

fn translate_term(builder: &mut Builder, term: &DtdTerm) -> Term {
    match term {
        DtdTerm::Name(name) => Term::ElementRef(resolve_child_element(builder, name)),
        DtdTerm::Group { separator, items } => {
            let compositor = match separator {
                Separator::Sequence => Compositor::Sequence,
                Separator::Choice => Compositor::Choice,
            };
            let particles = items
                .iter()
                .map(|item| {
                    let term = translate_term(builder, &item.term);
                    occurs_particle(term, item.quantifier)
                })
                .collect();
            Term::Group(Box::new(ModelGroup { compositor, particles }))
        }
    }
}

fn occurs_particle(term: Term, quantifier: Quantifier) -> Particle {
    let (min_occurs, max_occurs) = match quantifier {
        Quantifier::One => (1, Occurs::Bounded(1)),
        Quantifier::Optional => (0, Occurs::Bounded(1)),
        Quantifier::Star => (0, Occurs::Unbounded),
        Quantifier::Plus => (1, Occurs::Unbounded),
    };
    Particle { term, min_occurs, max_occurs }
}

/// A child element name with no `ELEMENT` declaration of its own resolves to `xs:string` (spec
/// §4.5); it's synthesized exactly once, on first reference.
fn resolve_child_element(builder: &mut Builder, name: &str) -> QName {
    let qname = QName::no_namespace(name);
    if !builder.declared.contains(name) && builder.synthesized_string_elements.insert(name.to_string()) {
        builder.schema.elements.push(ElementDeclaration {
            name: qname.clone(),
            type_: string_type(),
            nillable: false,
            abstract_: false,
            default: None,
            fixed: None,
            substitution_group: None,
            type_alternatives: Vec::new(),
        });
    }
    qname
}

fn merge_attributes(builder: &mut Builder, element: &str, attlists: &[AttlistDecl]) -> Vec<AttributeUse> {
    let mut seen = HashSet::new();
    let mut uses = Vec::new();
    for attlist in attlists.iter().filter(|a| a.element == element) {
        for def in &attlist.attributes {
            if !seen.insert(def.name.clone()) {
                continue;
            }
            uses.push(translate_attribute(builder, def));
        }
    }
    uses
}

fn translate_attribute(builder: &mut Builder, def: &AttributeDef) -> AttributeUse {
    let type_ = attribute_type(builder, def);
    let (required, default, fixed) = match &def.default {
        AttrDefault::Required => (true, None, None),
        AttrDefault::Implied => (false, None, None),
        AttrDefault::Fixed(v) => (false, None, Some(v.clone())),
        AttrDefault::Value(v) => (false, Some(v.clone()), None),
    };
    AttributeUse { name: QName::no_namespace(&def.name), type_, required, default, fixed }
}

fn attribute_type(builder: &mut Builder, def: &AttributeDef) -> QName {
    match &def.type_ {
        AttrType::CData => string_type(),
        AttrType::Id => QName::new(XSD_NS, "ID"),
        AttrType::IdRef => QName::new(XSD_NS, "IDREF"),
        AttrType::IdRefs => QName::new(XSD_NS, "IDREFS"),
        AttrType::NmToken => QName::new(XSD_NS, "NMTOKEN"),
        AttrType::NmTokens => QName::new(XSD_NS, "NMTOKENS"),
        AttrType::Entity => QName::new(XSD_NS, "ENTITY"),
        AttrType::Entities => QName::new(XSD_NS, "ENTITIES"),
        AttrType::Enumeration(values) | AttrType::Notation(values) => {
            let name = QName::no_namespace(format!("{}Type", def.name));
            builder.schema.simple_types.push(SimpleType {
                name: name.clone(),
                base: string_type(),
                variety: SimpleTypeVariety::Atomic,
                facets: FacetSet { enumeration: Some(values.clone()), ..Default::default() },
            });
            name
        }
    }
}

fn string_type() -> QName {
    QName::new(XSD_NS, "string")
}
