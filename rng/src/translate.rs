//! RELAX NG → intermediate-model translation (spec §4.8): lowers an already-simplified,
//! grammar-rooted pattern into an [`xb_im::Schema`], mirroring the shape of `xb_dtd::translate`
//! (a `Builder` owning the `Schema` under construction, synthesizing names for anonymous
//! restricted types the same way the DTD translator synthesizes `<attr>Type` names).
//!
//! Contract (spec §4.8):
//! - `element(specificName(ns,ln), body)` becomes a top-level element, with `body` collapsing
//!   straight to a builtin/synthesized simple type when it carries no structure of its own (bare
//!   `text`/`data`/`value`) — the RELAX NG analogue of the DTD frontend's `(#PCDATA)` collapse —
//!   or to a complex type otherwise.
//! - `group`/`interleave` children lower to a model group with the matching compositor;
//!   `choice` lowers to compositor `choice`.
//! - `oneOrMore(p)` lowers to a particle with occurrence `{1, unbounded}`; the simplified form of
//!   `optional`, `choice(p, empty)`, lowers to `{0, 1}`.
//! - `attribute(specificName, body)` lowers to a required `AttributeUse` on the owning complex
//!   type, not a content-model particle.
//! - `data(library, type, ...)` lowers to an XSD simple type reference; `value` becomes an
//!   enumeration facet on a synthesized restricted simple type.
//! - `ref(name)` lowers to an element reference if the named define is itself an element pattern,
//!   otherwise to a group reference backed by a synthesized [`xb_im::ModelGroupDefinition`].
//! - `interleave(_, text)` (the image of a simplified `mixed`) forces `content_kind = mixed`;
//!   any other element child forces `element_only`; a pattern with no structure at all is
//!   `simple`.

use std::collections::{HashMap, HashSet};

use xb_im::builtins::XSD_NS;
use xb_im::{
    AttributeUse, Compositor, ComplexType, ContentType, Derivation, ElementDeclaration, FacetSet, ModelGroup,
    ModelGroupDefinition, Occurs, Particle, Schema, SimpleType, SimpleTypeVariety, Term,
};
use xb_xstypes::QName;

use crate::name_class::NameClass;
use crate::pattern::{Grammar, Pattern};

/// What a `ref(name)` resolves to, cached once per define so a grammar's mutually-recursive
/// defines are each translated exactly once (spec §5: no component depends on re-deriving another
/// component's intermediate state).
#[derive(Clone)]
enum RefKind {
    Element(QName),
    Group(QName),
    Attribute(QName, QName),
    None,
}

struct Builder<'a> {
    schema: Schema,
    target_ns: String,
    defines: HashMap<&'a str, &'a Pattern>,
    cache: HashMap<String, RefKind>,
    in_progress: HashSet<String>,
    anon_counter: u32,
}

/// Lowers a simplified, grammar-rooted pattern into a [`Schema`] (spec §4.8).
pub fn translate(pattern: &Pattern) -> Schema {
    let target_ns = infer_target_namespace(pattern);
    let mut builder = Builder {
        schema: Schema::new(target_ns.clone()),
        target_ns,
        defines: HashMap::new(),
        cache: HashMap::new(),
        in_progress: HashSet::new(),
        anon_counter: 0,
    };

    let mut scratch_attrs = Vec::new();
    let mut scratch_text = false;
    match pattern {
        Pattern::Grammar(g) => {
            for define in &g.defines {
                builder.defines.insert(define.name.as_str(), &define.body);
            }
            builder.lower(&g.start, &mut scratch_attrs, &mut scratch_text);
        }
        other => {
            builder.lower(other, &mut scratch_attrs, &mut scratch_text);
        }
    }

    builder.schema
}

fn infer_target_namespace(pattern: &Pattern) -> String {
    fn first_ns(p: &Pattern) -> Option<String> {
        match p {
            Pattern::Element(nc, body) => nc.as_specific().map(|q| q.uri.clone()).or_else(|| first_ns(body)),
            Pattern::Attribute(_, body) => first_ns(body),
            Pattern::Group(a, b) | Pattern::Interleave(a, b) | Pattern::Choice(a, b) => first_ns(a).or_else(|| first_ns(b)),
            Pattern::OneOrMore(p) | Pattern::List(p) => first_ns(p),
            Pattern::Grammar(g) => first_ns(&g.start).or_else(|| g.defines.iter().find_map(|d| first_ns(&d.body))),
            _ => None,
        }
    }
    first_ns(pattern).unwrap_or_default()
}

impl<'a> Builder<'a> {
    fn synth_name(&mut self, hint: &str) -> QName {
        self.anon_counter += 1;
        QName::new(self.target_ns.clone(), format!("{hint}{}", self.anon_counter))
    }

    /// Resolves a `ref`/`parentRef` target, translating and registering its define on first use.
    fn resolve_ref(&mut self, name: &str) -> RefKind {
        if let Some(kind) = self.cache.get(name) {
            return kind.clone();
        }
        let body = match self.defines.get(name) {
            Some(b) => *b,
            None => return RefKind::None,
        };
        if self.in_progress.contains(name) {
            // A direct self-recursive reference: predict the element name it will register under
            // without re-entering translation, so the cycle doesn't recurse forever.
            if let Pattern::Element(nc, _) = body {
                if let Some(q) = nc.as_specific() {
                    return RefKind::Element(q.clone());
                }
            }
            return RefKind::None;
        }
        self.in_progress.insert(name.to_string());

        let kind = match body {
            Pattern::Element(nc, el_body) => RefKind::Element(self.translate_element(nc, el_body)),
            Pattern::Attribute(nc, attr_body) => match nc.as_specific() {
                Some(q) => RefKind::Attribute(q.clone(), self.leaf_type(attr_body)),
                None => RefKind::None,
            },
            Pattern::Text | Pattern::Empty | Pattern::NotAllowed | Pattern::Data { .. } | Pattern::Value { .. } => RefKind::None,
            other => {
                // A named content fragment (group/choice/interleave/oneOrMore/ref of something
                // else): register it as a model group definition, the RNG analogue of an XSD
                // named `<group>`. Cache before descending so a recursive group reference
                // resolves to the same name instead of looping.
                let qname = QName::new(self.target_ns.clone(), name.to_string());
                self.cache.insert(name.to_string(), RefKind::Group(qname.clone()));
                let mut attrs = Vec::new();
                let mut has_text = false;
                let particle = self.lower(other, &mut attrs, &mut has_text);
                let group = top_group(particle);
                self.schema.model_groups.push(ModelGroupDefinition {
                    name: qname.clone(),
                    model_group: group.unwrap_or(ModelGroup { compositor: Compositor::Sequence, particles: Vec::new() }),
                });
                self.in_progress.remove(name);
                return RefKind::Group(qname);
            }
        };
        self.in_progress.remove(name);
        self.cache.insert(name.to_string(), kind.clone());
        kind
    }

    /// Registers `element(specificName, body)` as a top-level element, collapsing a bodyless
    /// text/data/value leaf straight to the matching simple type and building a complex type
    /// otherwise. Idempotent: a name already registered (seen through an earlier `ref`) is
    /// returned as-is.
    fn translate_element(&mut self, nc: &NameClass, body: &Pattern) -> QName {
        let qname = nc.as_specific().cloned().unwrap_or_else(|| self.synth_name("AnyElement"));
        if self.schema.find_element(&qname).is_some() {
            return qname;
        }

        match body {
            Pattern::Text => {
                self.push_element(qname.clone(), string_type());
            }
            Pattern::Data { library, type_, params, except } if params.is_empty() && except.is_none() => {
                self.push_element(qname.clone(), data_type_qname(library, type_));
            }
            Pattern::Data { .. } => {
                let ty = self.synth_restricted_type(&qname, body);
                self.push_element(qname.clone(), ty);
            }
            Pattern::Value { .. } => {
                let ty = self.synth_enum_type(&qname, body);
                self.push_element(qname.clone(), ty);
            }
            _ => {
                let type_name = QName::new(qname.uri.clone(), format!("{}Type", qname.local));
                // Registered before descending so a self-referential element content (e.g. a
                // recursive tree node) resolves `ref`s back to this same element name.
                self.push_element(qname.clone(), type_name.clone());

                let mut attrs = Vec::new();
                let mut has_text = false;
                let particle = self.lower(body, &mut attrs, &mut has_text);
                let group = top_group(particle);
                let content = if has_text {
                    ContentType::Mixed { base: None, derivation: Derivation::Restriction, content_model: group }
                } else if group.is_some() {
                    ContentType::ElementOnly { base: None, derivation: Derivation::Restriction, content_model: group }
                } else {
                    ContentType::Empty
                };
                self.schema.complex_types.push(ComplexType {
                    name: type_name,
                    abstract_: false,
                    mixed: has_text,
                    content,
                    attributes: attrs,
                    attribute_group_refs: Vec::new(),
                    attribute_wildcard: None,
                    assertions: Vec::new(),
                });
            }
        }
        qname
    }

    fn push_element(&mut self, name: QName, type_: QName) {
        self.schema.elements.push(ElementDeclaration {
            name,
            type_,
            nillable: false,
            abstract_: false,
            default: None,
            fixed: None,
            substitution_group: None,
            type_alternatives: Vec::new(),
        });
    }

    /// The type a bare attribute/leaf body collapses to: `text`/`data` map directly, `value`
    /// synthesizes a single-member enumeration, anything else falls back to `xs:string`.
    fn leaf_type(&mut self, body: &Pattern) -> QName {
        match body {
            Pattern::Data { library, type_, .. } => data_type_qname(library, type_),
            Pattern::Value { .. } => {
                let name = self.synth_name("AttrValueType");
                self.synth_enum_type(&name, body)
            }
            _ => string_type(),
        }
    }

    fn synth_restricted_type(&mut self, element_name: &QName, body: &Pattern) -> QName {
        let Pattern::Data { library, type_, params, .. } = body else { return string_type() };
        let base = data_type_qname(library, type_);
        let mut facets = FacetSet::default();
        for param in params {
            match param.name.as_str() {
                "minInclusive" => facets.min_inclusive = Some(param.value.clone()),
                "maxInclusive" => facets.max_inclusive = Some(param.value.clone()),
                "minExclusive" => facets.min_exclusive = Some(param.value.clone()),
                "maxExclusive" => facets.max_exclusive = Some(param.value.clone()),
                "pattern" => facets.pattern = Some(param.value.clone()),
                "length" => facets.length = param.value.parse().ok(),
                "minLength" => facets.min_length = param.value.parse().ok(),
                "maxLength" => facets.max_length = param.value.parse().ok(),
                "totalDigits" => facets.total_digits = param.value.parse().ok(),
                "fractionDigits" => facets.fraction_digits = param.value.parse().ok(),
                _ => {}
            }
        }
        let name = QName::new(element_name.uri.clone(), format!("{}Type", element_name.local));
        self.schema.simple_types.push(SimpleType { name: name.clone(), base, variety: SimpleTypeVariety::Atomic, facets });
        name
    }

    fn synth_enum_type(&mut self, element_name: &QName, body: &Pattern) -> QName {
        let Pattern::Value { library, type_, content, .. } = body else { return string_type() };
        let base = data_type_qname(library, type_);
        let name = QName::new(element_name.uri.clone(), format!("{}Type", element_name.local));
        self.schema.simple_types.push(SimpleType {
            name: name.clone(),
            base,
            variety: SimpleTypeVariety::Atomic,
            facets: FacetSet { enumeration: Some(vec![content.clone()]), ..Default::default() },
        });
        name
    }

    /// Lowers a content-model fragment into a single particle, threading attribute uses and a
    /// "does this subtree carry a `text` leaf" flag (spec §4.8's mixed-content detection) out
    /// through `attrs`/`has_text` rather than a richer return type, since only the top-level
    /// caller needs to distinguish content kinds.
    fn lower(&mut self, pattern: &Pattern, attrs: &mut Vec<AttributeUse>, has_text: &mut bool) -> Option<Particle> {
        match pattern {
            Pattern::Element(nc, body) => {
                let qname = self.translate_element(nc, body);
                Some(one(Term::ElementRef(qname)))
            }
            Pattern::Attribute(nc, body) => {
                if let Some(q) = nc.as_specific() {
                    let type_ = self.leaf_type(body);
                    attrs.push(AttributeUse { name: q.clone(), type_, required: true, default: None, fixed: None });
                }
                None
            }
            Pattern::Ref(name) | Pattern::ParentRef(name) => match self.resolve_ref(name) {
                RefKind::Element(q) => Some(one(Term::ElementRef(q))),
                RefKind::Group(q) => Some(one(Term::GroupRef(q))),
                RefKind::Attribute(name, type_) => {
                    attrs.push(AttributeUse { name, type_, required: true, default: None, fixed: None });
                    None
                }
                RefKind::None => None,
            },
            Pattern::Group(a, b) => self.combine(Compositor::Sequence, a, b, attrs, has_text),
            Pattern::Interleave(a, b) => {
                if matches!(**a, Pattern::Text) {
                    *has_text = true;
                    return self.lower(b, attrs, has_text);
                }
                if matches!(**b, Pattern::Text) {
                    *has_text = true;
                    return self.lower(a, attrs, has_text);
                }
                self.combine(Compositor::Interleave, a, b, attrs, has_text)
            }
            Pattern::Choice(a, b) => {
                if matches!(**b, Pattern::Empty) {
                    let inner = self.lower(a, attrs, has_text)?;
                    return Some(Particle { min_occurs: 0, ..inner });
                }
                if matches!(**a, Pattern::Empty) {
                    let inner = self.lower(b, attrs, has_text)?;
                    return Some(Particle { min_occurs: 0, ..inner });
                }
                self.combine(Compositor::Choice, a, b, attrs, has_text)
            }
            Pattern::OneOrMore(inner) => {
                let p = self.lower(inner, attrs, has_text)?;
                Some(Particle { term: p.term, min_occurs: 1, max_occurs: Occurs::Unbounded })
            }
            Pattern::Text => {
                *has_text = true;
                None
            }
            // Bare data/value/list outside an element/attribute wrapper, a nested grammar
            // inside content, and an unresolved externalRef carry no content-model structure of
            // their own (spec §4.8 deals with them only at the element/attribute boundary).
            Pattern::Data { .. }
            | Pattern::Value { .. }
            | Pattern::List(_)
            | Pattern::Grammar(_)
            | Pattern::ExternalRef { .. }
            | Pattern::Empty
            | Pattern::NotAllowed => None,
        }
    }

    fn combine(
        &mut self,
        compositor: Compositor,
        a: &Pattern,
        b: &Pattern,
        attrs: &mut Vec<AttributeUse>,
        has_text: &mut bool,
    ) -> Option<Particle> {
        let pa = self.lower(a, attrs, has_text);
        let pb = self.lower(b, attrs, has_text);
        match (pa, pb) {
            (None, None) => None,
            (Some(p), None) | (None, Some(p)) => Some(p),
            (Some(p1), Some(p2)) => {
                Some(one(Term::Group(Box::new(ModelGroup { compositor, particles: vec![p1, p2] }))))
            }
        }
    }
}

fn one(term: Term) -> Particle {
    Particle { term, min_occurs: 1, max_occurs: Occurs::Bounded(1) }
}

/// Unwraps a single top-level particle into the [`ModelGroup`] a [`ContentType`] carries: a bare
/// `Term::Group` with no occurrence override surfaces its own compositor directly (so
/// `element(nc, choice(a,b))` reports `compositor = choice`, not a `sequence` of one `choice`
/// particle); anything else is wrapped in a one-particle sequence.
fn top_group(particle: Option<Particle>) -> Option<ModelGroup> {
    match particle {
        None => None,
        Some(Particle { term: Term::Group(group), min_occurs: 1, max_occurs: Occurs::Bounded(1) }) => Some(*group),
        Some(p) => Some(ModelGroup { compositor: Compositor::Sequence, particles: vec![p] }),
    }
}

fn data_type_qname(_library: &str, type_: &str) -> QName {
    QName::new(XSD_NS, type_)
}

fn string_type() -> QName {
    QName::new(XSD_NS, "string")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{Combine, Define, Include, Param};

    const XSD_DT: &str = "http://www.w3.org/2001/XMLSchema-datatypes";

    fn grammar(start_ref: &str, defines: Vec<Define>) -> Pattern {
        Pattern::Grammar(Box::new(Grammar { start: Box::new(Pattern::Ref(start_ref.to_string())), defines, includes: vec![] }))
    }

    #[test]
    fn element_with_text_becomes_element_decl() {
        let p = grammar(
            "doc",
            vec![Define {
                name: "doc".into(),
                combine: None,
                body: Pattern::Element(NameClass::SpecificName(QName::new("urn:test", "doc")), Box::new(Pattern::Text)),
            }],
        );
        let schema = translate(&p);
        assert_eq!(schema.elements.len(), 1);
        assert_eq!(schema.elements[0].name, QName::new("urn:test", "doc"));
        assert_eq!(schema.elements[0].type_, string_type());
    }

    #[test]
    fn data_type_maps_directly_to_xsd_type() {
        let p = grammar(
            "qty",
            vec![Define {
                name: "qty".into(),
                combine: None,
                body: Pattern::Element(
                    NameClass::SpecificName(QName::new("urn:test", "qty")),
                    Box::new(Pattern::Data { library: XSD_DT.into(), type_: "integer".into(), params: vec![], except: None }),
                ),
            }],
        );
        let schema = translate(&p);
        assert_eq!(schema.elements[0].type_, QName::new(XSD_NS, "integer"));
        assert!(schema.complex_types.is_empty());
    }

    #[test]
    fn element_with_attribute_gets_attribute_use() {
        let content = Pattern::Group(
            Box::new(Pattern::Attribute(
                NameClass::SpecificName(QName::no_namespace("type")),
                Box::new(Pattern::Data { library: XSD_DT.into(), type_: "string".into(), params: vec![], except: None }),
            )),
            Box::new(Pattern::Text),
        );
        let p = grammar(
            "card",
            vec![Define {
                name: "card".into(),
                combine: None,
                body: Pattern::Element(NameClass::SpecificName(QName::new("urn:test", "card")), Box::new(content)),
            }],
        );
        let schema = translate(&p);
        let ct = schema.find_complex_type(&QName::new("urn:test", "cardType")).unwrap();
        assert_eq!(ct.attributes.len(), 1);
        assert_eq!(ct.attributes[0].name, QName::no_namespace("type"));
        assert!(ct.attributes[0].required);
    }

    #[test]
    fn choice_becomes_choice_compositor() {
        let content = Pattern::Choice(
            Box::new(Pattern::Element(NameClass::SpecificName(QName::new("urn:test", "a")), Box::new(Pattern::Text))),
            Box::new(Pattern::Element(NameClass::SpecificName(QName::new("urn:test", "b")), Box::new(Pattern::Text))),
        );
        let p = grammar(
            "root",
            vec![Define {
                name: "root".into(),
                combine: None,
                body: Pattern::Element(NameClass::SpecificName(QName::new("urn:test", "root")), Box::new(content)),
            }],
        );
        let schema = translate(&p);
        let ct = schema.find_complex_type(&QName::new("urn:test", "rootType")).unwrap();
        assert_eq!(ct.content.content_model().unwrap().compositor, Compositor::Choice);
    }

    #[test]
    fn interleave_becomes_interleave_compositor() {
        let content = Pattern::Interleave(
            Box::new(Pattern::Element(NameClass::SpecificName(QName::new("urn:test", "x")), Box::new(Pattern::Text))),
            Box::new(Pattern::Element(NameClass::SpecificName(QName::new("urn:test", "y")), Box::new(Pattern::Text))),
        );
        let p = grammar(
            "unord",
            vec![Define {
                name: "unord".into(),
                combine: None,
                body: Pattern::Element(NameClass::SpecificName(QName::new("urn:test", "unord")), Box::new(content)),
            }],
        );
        let schema = translate(&p);
        let ct = schema.find_complex_type(&QName::new("urn:test", "unordType")).unwrap();
        assert_eq!(ct.content.content_model().unwrap().compositor, Compositor::Interleave);
    }

    #[test]
    fn one_or_more_becomes_unbounded_particle() {
        let content = Pattern::OneOrMore(Box::new(Pattern::Element(
            NameClass::SpecificName(QName::new("urn:test", "item")),
            Box::new(Pattern::Text),
        )));
        let p = grammar(
            "list",
            vec![Define {
                name: "list".into(),
                combine: None,
                body: Pattern::Element(NameClass::SpecificName(QName::new("urn:test", "list")), Box::new(content)),
            }],
        );
        let schema = translate(&p);
        let ct = schema.find_complex_type(&QName::new("urn:test", "listType")).unwrap();
        let group = ct.content.content_model().unwrap();
        assert!(group.particles.iter().any(|p| p.max_occurs == Occurs::Unbounded));
    }

    #[test]
    fn simplified_optional_becomes_zero_one_particle() {
        let content = Pattern::Choice(
            Box::new(Pattern::Element(NameClass::SpecificName(QName::new("urn:test", "opt")), Box::new(Pattern::Text))),
            Box::new(Pattern::Empty),
        );
        let p = grammar(
            "root",
            vec![Define {
                name: "root".into(),
                combine: None,
                body: Pattern::Element(NameClass::SpecificName(QName::new("urn:test", "root")), Box::new(content)),
            }],
        );
        let schema = translate(&p);
        let ct = schema.find_complex_type(&QName::new("urn:test", "rootType")).unwrap();
        let group = ct.content.content_model().unwrap();
        assert!(group.particles.iter().any(|p| p.min_occurs == 0 && p.max_occurs == Occurs::Bounded(1)));
    }

    #[test]
    fn ref_to_element_define_links_both_as_elements() {
        let p = grammar(
            "container",
            vec![
                Define {
                    name: "item".into(),
                    combine: None,
                    body: Pattern::Element(NameClass::SpecificName(QName::new("urn:test", "item")), Box::new(Pattern::Text)),
                },
                Define {
                    name: "container".into(),
                    combine: None,
                    body: Pattern::Element(
                        NameClass::SpecificName(QName::new("urn:test", "container")),
                        Box::new(Pattern::Ref("item".into())),
                    ),
                },
            ],
        );
        let schema = translate(&p);
        assert!(schema.find_element(&QName::new("urn:test", "item")).is_some());
        assert!(schema.find_element(&QName::new("urn:test", "container")).is_some());
    }

    #[test]
    fn mixed_content_marks_complex_type_mixed() {
        // Simplified form of `mixed(element(b,text))`: interleave(element(b,text), text).
        let content = Pattern::Interleave(
            Box::new(Pattern::Element(NameClass::SpecificName(QName::new("urn:test", "b")), Box::new(Pattern::Text))),
            Box::new(Pattern::Text),
        );
        let p = grammar(
            "root",
            vec![Define {
                name: "root".into(),
                combine: None,
                body: Pattern::Element(NameClass::SpecificName(QName::new("urn:test", "root")), Box::new(content)),
            }],
        );
        let schema = translate(&p);
        let ct = schema.find_complex_type(&QName::new("urn:test", "rootType")).unwrap();
        assert!(ct.mixed);
        assert!(matches!(ct.content, ContentType::Mixed { .. }));
    }

    #[test]
    fn value_pattern_synthesizes_enumeration() {
        let p = grammar(
            "side",
            vec![Define {
                name: "side".into(),
                combine: None,
                body: Pattern::Element(
                    NameClass::SpecificName(QName::new("urn:test", "side")),
                    Box::new(Pattern::Value { ns: String::new(), library: String::new(), type_: "token".into(), content: "Buy".into() }),
                ),
            }],
        );
        let schema = translate(&p);
        let el = schema.find_element(&QName::new("urn:test", "side")).unwrap();
        let st = schema.find_simple_type(&el.type_).unwrap();
        assert_eq!(st.facets.enumeration, Some(vec!["Buy".to_string()]));
    }

    #[test]
    fn unused_param_helper_compiles() {
        let _ = Param { name: "x".into(), value: "y".into() };
        let _ = Combine::Choice;
        let _ = Include { href: "x".into() };
    }
}
