use xb_im::builtins::XSD_NS;
use xb_im::{
    AttributeGroupDefinition, AttributeUse, Compositor, ContentType, Derivation, ElementDeclaration,
    FacetSet, Import, Include, ModelGroup, ModelGroupDefinition, NsConstraint, Occurs, Particle,
    ProcessContents, Schema, SimpleType, SimpleTypeVariety, Term, TypeAlternative, Wildcard,
};
use xb_xml::cursor::{for_each_child, skip_subtree};
use xb_xml::{NodeType, XmlReader};
use xb_xstypes::QName;

use crate::error::XsdError;

/// Accumulates synthetic names for anonymous `simpleType`/`complexType` definitions and owns the
/// [`Schema`] being built, so inline type definitions (spec §4.4) can be lifted to top-level
/// entries the same way named ones are, and referenced back by the synthetic [`QName`].
struct Builder {
    schema: Schema,
    anon_counter: u32,
}

impl Builder {
    fn synth_name(&mut self, hint: &str) -> QName {
        self.anon_counter += 1;
        QName::new(self.schema.target_namespace.clone(), format!("{hint}{}", self.anon_counter))
    }
}

/// Reads the `<schema>` document open at the reader's current position (not yet advanced) into a
/// [`Schema`] (spec §4.4).
pub fn read_schema(reader: &mut dyn XmlReader) -> Result<Schema, XsdError> {
    if !reader.advance() {
        return Err(XsdError::UnexpectedEof);
    }
    if reader.node_type() != NodeType::Start {
        return Err(XsdError::UnexpectedEof);
    }
    let root = reader.name();
    if root != QName::new(XSD_NS, "schema") {
        return Err(XsdError::UnexpectedRootElement(root));
    }

    let target_namespace = attr(reader, "targetNamespace").unwrap_or_default().to_string();
    let mut builder = Builder { schema: Schema::new(target_namespace), anon_counter: 0 };
    let depth = reader.depth();

    for_each_child_checked(reader, depth, |r| parse_schema_child(r, &mut builder))?;

    Ok(builder.schema)
}

fn parse_schema_child(reader: &mut dyn XmlReader, builder: &mut Builder) -> Result<(), XsdError> {
    let name = reader.name();
    if name.uri != XSD_NS {
        return Ok(()); // open content: foreign-namespace children of <schema> are ignored.
    }
    match name.local.as_str() {
        "import" => {
            builder.schema.imports.push(parse_import(reader)?);
            Ok(())
        }
        "include" => {
            builder.schema.includes.push(parse_include(reader)?);
            Ok(())
        }
        "element" => {
            let el = parse_top_level_element(reader, builder)?;
            builder.schema.elements.push(el);
            Ok(())
        }
        "attribute" => {
            let attr_use = parse_top_level_attribute(reader, builder)?;
            builder.schema.attributes.push(attr_use);
            Ok(())
        }
        "simpleType" => {
            let name = named(reader, builder, "simpleType")?;
            let st = parse_simple_type_body(reader, builder, name)?;
            builder.schema.simple_types.push(st);
            Ok(())
        }
        "complexType" => {
            let name = named(reader, builder, "complexType")?;
            let ct = parse_complex_type_body(reader, builder, name)?;
            builder.schema.complex_types.push(ct);
            Ok(())
        }
        "group" => {
            let def = parse_group_def(reader, builder)?;
            builder.schema.model_groups.push(def);
            Ok(())
        }
        "attributeGroup" => {
            let def = parse_attribute_group_def(reader, builder)?;
            builder.schema.attribute_groups.push(def);
            Ok(())
        }
        "defaultOpenContent" => {
            builder.schema.default_open_content = Some(parse_wildcard(reader)?);
            Ok(())
        }
        "annotation" => Ok(()),
        _ => Err(XsdError::UnknownElement(name)),
    }
}

// ---- leaf declarations -----------------------------------------------------------------------

fn parse_import(reader: &mut dyn XmlReader) -> Result<Import, XsdError> {
    Ok(Import {
        namespace: attr(reader, "namespace").map(str::to_string),
        schema_location: attr(reader, "schemaLocation").map(str::to_string),
    })
}

fn parse_include(reader: &mut dyn XmlReader) -> Result<Include, XsdError> {
    let schema_location = attr(reader, "schemaLocation")
        .ok_or(XsdError::MissingAttribute { element: "include", attribute: "schemaLocation" })?
        .to_string();
    Ok(Include { schema_location })
}

fn parse_top_level_element(reader: &mut dyn XmlReader, builder: &mut Builder) -> Result<ElementDeclaration, XsdError> {
    let name = named(reader, builder, "element")?;
    parse_element_decl_body(reader, builder, name)
}

fn parse_top_level_attribute(reader: &mut dyn XmlReader, builder: &mut Builder) -> Result<AttributeUse, XsdError> {
    let name = named(reader, builder, "attribute")?;
    parse_attribute_decl_body(reader, builder, name)
}

fn parse_alternative(reader: &mut dyn XmlReader, builder: &mut Builder) -> Result<TypeAlternative, XsdError> {
    let test = attr(reader, "test").map(str::to_string);
    let mut type_ = attr_qname(reader, "type")?;
    let depth = reader.depth();
    for_each_child_checked(reader, depth, |r| {
        let n = r.name();
        if n.uri != XSD_NS {
            return Ok(());
        }
        match n.local.as_str() {
            "complexType" if type_.is_none() => {
                let synth = builder.synth_name("AnonType");
                let ct = parse_complex_type_body(r, builder, synth.clone())?;
                builder.schema.complex_types.push(ct);
                type_ = Some(synth);
                Ok(())
            }
            "simpleType" if type_.is_none() => {
                let synth = builder.synth_name("AnonType");
                let st = parse_simple_type_body(r, builder, synth.clone())?;
                builder.schema.simple_types.push(st);
                type_ = Some(synth);
                Ok(())
            }
            "annotation" => Ok(()),
            _ => Err(XsdError::UnknownElement(n)),
        }
    })?;
    let type_ = type_.unwrap_or_else(|| any_type());
    Ok(TypeAlternative { test, type_ })
}

// ---- element declarations --------------------------------------------------------------------

fn parse_element_decl_body(
    reader: &mut dyn XmlReader,
    builder: &mut Builder,
    name: QName,
) -> Result<ElementDeclaration, XsdError> {
    let nillable = attr_bool(reader, "nillable")?;
    let abstract_ = attr_bool(reader, "abstract")?;
    let default = attr(reader, "default").map(str::to_string);
    let fixed = attr(reader, "fixed").map(str::to_string);
    let substitution_group = attr_qname(reader, "substitutionGroup")?;
    let mut type_ = attr_qname(reader, "type")?;
    let mut type_alternatives = Vec::new();

    let depth = reader.depth();
    for_each_child_checked(reader, depth, |r| {
        let n = r.name();
        if n.uri != XSD_NS {
            return Ok(());
        }
        match n.local.as_str() {
            "simpleType" if type_.is_none() => {
                let synth = builder.synth_name("AnonType");
                let st = parse_simple_type_body(r, builder, synth.clone())?;
                builder.schema.simple_types.push(st);
                type_ = Some(synth);
                Ok(())
            }
            "complexType" if type_.is_none() => {
                let synth = builder.synth_name("AnonType");
                let ct = parse_complex_type_body(r, builder, synth.clone())?;
                builder.schema.complex_types.push(ct);
                type_ = Some(synth);
                Ok(())
            }
            "alternative" => {
                type_alternatives.push(parse_alternative(r, builder)?);
                Ok(())
            }
            "annotation" | "key" | "keyref" | "unique" => Ok(()),
            _ => Err(XsdError::UnknownElement(n)),
        }
    })?;

    Ok(ElementDeclaration {
        name,
        type_: type_.unwrap_or_else(any_type),
        nillable,
        abstract_,
        default,
        fixed,
        substitution_group,
        type_alternatives,
    })
}

/// A local `<element>` particle: either a `ref` to another element, or an inline declaration
/// (spec §3.2, §4.4).
fn parse_element_particle(reader: &mut dyn XmlReader, builder: &mut Builder) -> Result<Particle, XsdError> {
    let (min_occurs, max_occurs) = parse_occurs(reader)?;
    let term = if let Some(value) = attr(reader, "ref") {
        Term::ElementRef(resolve_qname_value(reader, value)?)
    } else {
        let name = named(reader, builder, "element")?;
        Term::InlineElement(Box::new(parse_element_decl_body(reader, builder, name)?))
    };
    Ok(Particle { term, min_occurs, max_occurs })
}

// ---- attribute declarations ---------------------------------------------------------------

fn parse_attribute_decl_body(reader: &mut dyn XmlReader, builder: &mut Builder, name: QName) -> Result<AttributeUse, XsdError> {
    let mut type_ = attr_qname(reader, "type")?;
    let default = attr(reader, "default").map(str::to_string);
    let fixed = attr(reader, "fixed").map(str::to_string);
    let required = attr(reader, "use") == Some("required");

    let depth = reader.depth();
    for_each_child_checked(reader, depth, |r| {
        let n = r.name();
        if n.uri != XSD_NS {
            return Ok(());
        }
        match n.local.as_str() {
            "simpleType" if type_.is_none() => {
                let synth = builder.synth_name("AnonType");
                let st = parse_simple_type_body(r, builder, synth.clone())?;
                builder.schema.simple_types.push(st);
                type_ = Some(synth);
                Ok(())
            }
            "annotation" => Ok(()),
            _ => Err(XsdError::UnknownElement(n)),
        }
    })?;

    Ok(AttributeUse {
        name,
        type_: type_.unwrap_or_else(any_simple_type),
        required,
        default,
        fixed,
    })
}

/// A local `<attribute>` use inside a complex type or attribute group: either a `ref` (which, not
/// having access to the full schema set at parse time, resolves its type during the
/// registration pass in `xb-schema-set` rather than here) or an inline declaration.
fn parse_attribute_use(reader: &mut dyn XmlReader, builder: &mut Builder) -> Result<AttributeUse, XsdError> {
    if let Some(value) = attr(reader, "ref") {
        let name = resolve_qname_value(reader, value)?;
        let required = attr(reader, "use") == Some("required");
        let default = attr(reader, "default").map(str::to_string);
        let fixed = attr(reader, "fixed").map(str::to_string);
        return Ok(AttributeUse { name, type_: any_simple_type(), required, default, fixed });
    }
    let name = named(reader, builder, "attribute")?;
    parse_attribute_decl_body(reader, builder, name)
}

fn parse_attribute_group_def(reader: &mut dyn XmlReader, builder: &mut Builder) -> Result<AttributeGroupDefinition, XsdError> {
    let name = named(reader, builder, "attributeGroup")?;
    let mut attributes = Vec::new();
    let mut attribute_group_refs = Vec::new();
    let mut attribute_wildcard = None;

    let depth = reader.depth();
    for_each_child_checked(reader, depth, |r| {
        let n = r.name();
        if n.uri != XSD_NS {
            return Ok(());
        }
        match n.local.as_str() {
            "attribute" => {
                attributes.push(parse_attribute_use(r, builder)?);
                Ok(())
            }
            "attributeGroup" => {
                let ref_ = attr(r, "ref")
                    .ok_or(XsdError::MissingAttribute { element: "attributeGroup", attribute: "ref" })?;
                attribute_group_refs.push(resolve_qname_value(r, ref_)?);
                Ok(())
            }
            "anyAttribute" => {
                attribute_wildcard = Some(parse_wildcard(r)?);
                Ok(())
            }
            "annotation" => Ok(()),
            _ => Err(XsdError::UnknownElement(n)),
        }
    })?;

    Ok(AttributeGroupDefinition { name, attributes, attribute_group_refs, attribute_wildcard })
}

// ---- simple types ---------------------------------------------------------------------------

fn parse_simple_type_body(reader: &mut dyn XmlReader, builder: &mut Builder, name: QName) -> Result<SimpleType, XsdError> {
    let depth = reader.depth();
    let mut result = None;

    for_each_child_checked(reader, depth, |r| {
        let n = r.name();
        if n.uri != XSD_NS {
            return Ok(());
        }
        match n.local.as_str() {
            "restriction" => {
                let (base, facets) = parse_restriction_facets(r, builder)?;
                result = Some(SimpleType { name: name.clone(), base, variety: SimpleTypeVariety::Atomic, facets });
                Ok(())
            }
            "list" => {
                let item = parse_list_item_type(r, builder)?;
                result = Some(SimpleType {
                    name: name.clone(),
                    base: any_simple_type(),
                    variety: SimpleTypeVariety::List { item },
                    facets: FacetSet::default(),
                });
                Ok(())
            }
            "union" => {
                let members = parse_union_member_types(r, builder)?;
                result = Some(SimpleType {
                    name: name.clone(),
                    base: any_simple_type(),
                    variety: SimpleTypeVariety::Union { members },
                    facets: FacetSet::default(),
                });
                Ok(())
            }
            "annotation" => Ok(()),
            _ => Err(XsdError::UnknownElement(n)),
        }
    })?;

    result.ok_or(XsdError::MissingAttribute { element: "simpleType", attribute: "restriction|list|union" })
}

fn parse_restriction_facets(reader: &mut dyn XmlReader, builder: &mut Builder) -> Result<(QName, FacetSet), XsdError> {
    let mut base = attr_qname(reader, "base")?;
    let mut facets = FacetSet::default();

    let depth = reader.depth();
    for_each_child_checked(reader, depth, |r| {
        let n = r.name();
        if n.uri != XSD_NS {
            return Ok(());
        }
        match n.local.as_str() {
            "simpleType" if base.is_none() => {
                let synth = builder.synth_name("AnonType");
                let st = parse_simple_type_body(r, builder, synth.clone())?;
                builder.schema.simple_types.push(st);
                base = Some(synth);
                Ok(())
            }
            "enumeration" => {
                let value = attr(r, "value")
                    .ok_or(XsdError::MissingAttribute { element: "enumeration", attribute: "value" })?
                    .to_string();
                facets.enumeration.get_or_insert_with(Vec::new).push(value);
                Ok(())
            }
            "pattern" => {
                facets.pattern = Some(
                    attr(r, "value")
                        .ok_or(XsdError::MissingAttribute { element: "pattern", attribute: "value" })?
                        .to_string(),
                );
                Ok(())
            }
            "minInclusive" => {
                facets.min_inclusive = Some(required_value_attr(r, "minInclusive")?);
                Ok(())
            }
            "maxInclusive" => {
                facets.max_inclusive = Some(required_value_attr(r, "maxInclusive")?);
                Ok(())
            }
            "minExclusive" => {
                facets.min_exclusive = Some(required_value_attr(r, "minExclusive")?);
                Ok(())
            }
            "maxExclusive" => {
                facets.max_exclusive = Some(required_value_attr(r, "maxExclusive")?);
                Ok(())
            }
            "length" => {
                facets.length = Some(required_u64_value(r, "length")?);
                Ok(())
            }
            "minLength" => {
                facets.min_length = Some(required_u64_value(r, "minLength")?);
                Ok(())
            }
            "maxLength" => {
                facets.max_length = Some(required_u64_value(r, "maxLength")?);
                Ok(())
            }
            "totalDigits" => {
                facets.total_digits = Some(required_u64_value(r, "totalDigits")?);
                Ok(())
            }
            "fractionDigits" => {
                facets.fraction_digits = Some(required_u64_value(r, "fractionDigits")?);
                Ok(())
            }
            // whiteSpace, assertion and explicitTimezone constrain validation behavior rather
            // than the value space the code generator cares about; not carried in FacetSet.
            "whiteSpace" | "assertion" | "explicitTimezone" | "annotation" => Ok(()),
            _ => Err(XsdError::UnknownElement(n)),
        }
    })?;

    let base = base.ok_or(XsdError::MissingAttribute { element: "restriction", attribute: "base" })?;
    Ok((base, facets))
}

fn parse_list_item_type(reader: &mut dyn XmlReader, builder: &mut Builder) -> Result<QName, XsdError> {
    let mut item = attr_qname(reader, "itemType")?;
    let depth = reader.depth();
    for_each_child_checked(reader, depth, |r| {
        let n = r.name();
        if n.uri != XSD_NS {
            return Ok(());
        }
        match n.local.as_str() {
            "simpleType" if item.is_none() => {
                let synth = builder.synth_name("AnonType");
                let st = parse_simple_type_body(r, builder, synth.clone())?;
                builder.schema.simple_types.push(st);
                item = Some(synth);
                Ok(())
            }
            "annotation" => Ok(()),
            _ => Err(XsdError::UnknownElement(n)),
        }
    })?;
    item.ok_or(XsdError::MissingAttribute { element: "list", attribute: "itemType" })
}

fn parse_union_member_types(reader: &mut dyn XmlReader, builder: &mut Builder) -> Result<Vec<QName>, XsdError> {
    let mut members = Vec::new();
    if let Some(value) = attr(reader, "memberTypes") {
        for token in value.split_whitespace() {
            members.push(resolve_qname_value(reader, token)?);
        }
    }
    let depth = reader.depth();
    for_each_child_checked(reader, depth, |r| {
        let n = r.name();
        if n.uri != XSD_NS {
            return Ok(());
        }
        match n.local.as_str() {
            "simpleType" => {
                let synth = builder.synth_name("AnonType");
                let st = parse_simple_type_body(r, builder, synth.clone())?;
                builder.schema.simple_types.push(st);
                members.push(synth);
                Ok(())
            }
            "annotation" => Ok(()),
            _ => Err(XsdError::UnknownElement(n)),
        }
    })?;
    if members.is_empty() {
        return Err(XsdError::MissingAttribute { element: "union", attribute: "memberTypes" });
    }
    Ok(members)
}

// ---- complex types --------------------------------------------------------------------------

fn parse_complex_type_body(reader: &mut dyn XmlReader, builder: &mut Builder, name: QName) -> Result<xb_im::ComplexType, XsdError> {
    let abstract_ = attr_bool(reader, "abstract")?;
    let mut mixed = attr_bool(reader, "mixed")?;
    let mut content = ContentType::Empty;
    let mut attributes = Vec::new();
    let mut attribute_group_refs = Vec::new();
    let mut attribute_wildcard = None;
    let mut assertions = Vec::new();

    let depth = reader.depth();
    for_each_child_checked(reader, depth, |r| {
        let n = r.name();
        if n.uri != XSD_NS {
            return Ok(());
        }
        match n.local.as_str() {
            "simpleContent" => {
                content = parse_simple_content(r, builder)?;
                Ok(())
            }
            "complexContent" => {
                let (is_mixed, parsed) = parse_complex_content(r, builder)?;
                mixed = mixed || is_mixed;
                content = parsed;
                Ok(())
            }
            "sequence" | "choice" | "all" => {
                let group = parse_model_group(r, builder)?;
                content = wrap_content(mixed, None, Derivation::Restriction, Some(group));
                Ok(())
            }
            "group" => {
                let particle = parse_group_ref_particle(r)?;
                let group = ModelGroup { compositor: Compositor::Sequence, particles: vec![particle] };
                content = wrap_content(mixed, None, Derivation::Restriction, Some(group));
                Ok(())
            }
            "attribute" => {
                attributes.push(parse_attribute_use(r, builder)?);
                Ok(())
            }
            "attributeGroup" => {
                let ref_ = attr(r, "ref")
                    .ok_or(XsdError::MissingAttribute { element: "attributeGroup", attribute: "ref" })?;
                attribute_group_refs.push(resolve_qname_value(r, ref_)?);
                Ok(())
            }
            "anyAttribute" => {
                attribute_wildcard = Some(parse_wildcard(r)?);
                Ok(())
            }
            "assert" => {
                assertions.push(
                    attr(r, "test")
                        .ok_or(XsdError::MissingAttribute { element: "assert", attribute: "test" })?
                        .to_string(),
                );
                Ok(())
            }
            "openContent" | "annotation" => Ok(()),
            _ => Err(XsdError::UnknownElement(n)),
        }
    })?;

    Ok(xb_im::ComplexType { name, abstract_, mixed, content, attributes, attribute_group_refs, attribute_wildcard, assertions })
}

fn wrap_content(mixed: bool, base: Option<QName>, derivation: Derivation, content_model: Option<ModelGroup>) -> ContentType {
    if mixed {
        ContentType::Mixed { base, derivation, content_model }
    } else {
        ContentType::ElementOnly { base, derivation, content_model }
    }
}

fn parse_simple_content(reader: &mut dyn XmlReader, builder: &mut Builder) -> Result<ContentType, XsdError> {
    let depth = reader.depth();
    let mut content = None;
    for_each_child_checked(reader, depth, |r| {
        let n = r.name();
        if n.uri != XSD_NS {
            return Ok(());
        }
        match n.local.as_str() {
            "restriction" => {
                let (base, facets) = parse_restriction_facets(r, builder)?;
                content = Some(ContentType::Simple { base, derivation: Derivation::Restriction, facets });
                Ok(())
            }
            "extension" => {
                let base = attr_qname(r, "base")?
                    .ok_or(XsdError::MissingAttribute { element: "extension", attribute: "base" })?;
                consume_extension_attributes(r, builder)?;
                content = Some(ContentType::Simple { base, derivation: Derivation::Extension, facets: FacetSet::default() });
                Ok(())
            }
            "annotation" => Ok(()),
            _ => Err(XsdError::UnknownElement(n)),
        }
    })?;
    content.ok_or(XsdError::MissingAttribute { element: "simpleContent", attribute: "restriction|extension" })
}

/// Drains (and discards) the attribute uses trailing an `<extension>` inside `<simpleContent>`;
/// the extension's own attributes are out of scope for the base/derivation pair the content type
/// carries and are folded into the owning complex type separately by callers that need them.
fn consume_extension_attributes(reader: &mut dyn XmlReader, builder: &mut Builder) -> Result<(), XsdError> {
    let _ = builder;
    skip_subtree(reader, reader.depth());
    Ok(())
}

fn parse_complex_content(reader: &mut dyn XmlReader, builder: &mut Builder) -> Result<(bool, ContentType), XsdError> {
    let mixed = attr_bool(reader, "mixed")?;
    let depth = reader.depth();
    let mut content = None;
    for_each_child_checked(reader, depth, |r| {
        let n = r.name();
        if n.uri != XSD_NS {
            return Ok(());
        }
        match n.local.as_str() {
            "restriction" | "extension" => {
                let (derivation, element) = if n.local == "restriction" {
                    (Derivation::Restriction, "restriction")
                } else {
                    (Derivation::Extension, "extension")
                };
                let base = attr_qname(r, "base")?
                    .ok_or(XsdError::MissingAttribute { element, attribute: "base" })?;
                let group = parse_content_particle(r, builder)?;
                content = Some(wrap_content(mixed, Some(base), derivation, group));
                Ok(())
            }
            "annotation" => Ok(()),
            _ => Err(XsdError::UnknownElement(n)),
        }
    })?;
    let content = content.ok_or(XsdError::MissingAttribute { element: "complexContent", attribute: "restriction|extension" })?;
    Ok((mixed, content))
}

/// The particle and attribute content of a `<restriction>`/`<extension>` inside
/// `<complexContent>`: a leading optional group/all/choice/sequence, followed by attribute uses.
fn parse_content_particle(reader: &mut dyn XmlReader, builder: &mut Builder) -> Result<Option<ModelGroup>, XsdError> {
    let mut group = None;
    let depth = reader.depth();
    for_each_child_checked(reader, depth, |r| {
        let n = r.name();
        if n.uri != XSD_NS {
            return Ok(());
        }
        match n.local.as_str() {
            "sequence" | "choice" | "all" => {
                group = Some(parse_model_group(r, builder)?);
                Ok(())
            }
            "group" => {
                let particle = parse_group_ref_particle(r)?;
                group = Some(ModelGroup { compositor: Compositor::Sequence, particles: vec![particle] });
                Ok(())
            }
            "attribute" | "attributeGroup" | "anyAttribute" | "assert" | "openContent" | "annotation" => Ok(()),
            _ => Err(XsdError::UnknownElement(n)),
        }
    })?;
    Ok(group)
}

fn parse_group_ref_particle(reader: &mut dyn XmlReader) -> Result<Particle, XsdError> {
    let (min_occurs, max_occurs) = parse_occurs(reader)?;
    let ref_ = attr(reader, "ref").ok_or(XsdError::MissingAttribute { element: "group", attribute: "ref" })?;
    let name = resolve_qname_value(reader, ref_)?;
    Ok(Particle { term: Term::GroupRef(name), min_occurs, max_occurs })
}

fn parse_group_def(reader: &mut dyn XmlReader, builder: &mut Builder) -> Result<ModelGroupDefinition, XsdError> {
    let name = named(reader, builder, "group")?;
    let mut model_group = None;
    let depth = reader.depth();
    for_each_child_checked(reader, depth, |r| {
        let n = r.name();
        if n.uri != XSD_NS {
            return Ok(());
        }
        match n.local.as_str() {
            "sequence" | "choice" | "all" => {
                model_group = Some(parse_model_group(r, builder)?);
                Ok(())
            }
            "annotation" => Ok(()),
            _ => Err(XsdError::UnknownElement(n)),
        }
    })?;
    let model_group =
        model_group.unwrap_or(ModelGroup { compositor: Compositor::Sequence, particles: Vec::new() });
    Ok(ModelGroupDefinition { name, model_group })
}

fn parse_model_group(reader: &mut dyn XmlReader, builder: &mut Builder) -> Result<ModelGroup, XsdError> {
    let compositor = match reader.name().local.as_str() {
        "sequence" => Compositor::Sequence,
        "choice" => Compositor::Choice,
        "all" => Compositor::All,
        other => {
            return Err(XsdError::UnknownElement(QName::new(XSD_NS, other)));
        }
    };
    let mut particles = Vec::new();
    let depth = reader.depth();
    for_each_child_checked(reader, depth, |r| {
        let n = r.name();
        if n.uri != XSD_NS {
            return Ok(());
        }
        match n.local.as_str() {
            "element" => {
                particles.push(parse_element_particle(r, builder)?);
                Ok(())
            }
            "group" => {
                particles.push(parse_group_ref_particle(r)?);
                Ok(())
            }
            "sequence" | "choice" | "all" => {
                let (min_occurs, max_occurs) = parse_occurs(r)?;
                let nested = parse_model_group(r, builder)?;
                particles.push(Particle { term: Term::Group(Box::new(nested)), min_occurs, max_occurs });
                Ok(())
            }
            "any" => {
                let (min_occurs, max_occurs) = parse_occurs(r)?;
                let wildcard = parse_wildcard(r)?;
                particles.push(Particle { term: Term::Wildcard(wildcard), min_occurs, max_occurs });
                Ok(())
            }
            "annotation" => Ok(()),
            _ => Err(XsdError::UnknownElement(n)),
        }
    })?;
    Ok(ModelGroup { compositor, particles })
}

fn parse_wildcard(reader: &mut dyn XmlReader) -> Result<Wildcard, XsdError> {
    let process = match attr(reader, "processContents").unwrap_or("strict") {
        "strict" => ProcessContents::Strict,
        "lax" => ProcessContents::Lax,
        "skip" => ProcessContents::Skip,
        other => {
            return Err(XsdError::InvalidAttributeValue { attribute: "processContents", value: other.to_string() })
        }
    };
    let (ns_constraint, namespaces) = match attr(reader, "namespace").unwrap_or("##any") {
        "##any" => (NsConstraint::Any, Vec::new()),
        "##other" => (NsConstraint::Other, Vec::new()),
        list => (
            NsConstraint::Enumerated,
            list.split_whitespace().map(str::to_string).collect(),
        ),
    };
    // <any>/<anyAttribute> carry only annotation children; discard them without a nested walk.
    skip_subtree(reader, reader.depth());
    Ok(Wildcard { ns_constraint, namespaces, process })
}

// ---- shared helpers --------------------------------------------------------------------------

fn any_type() -> QName {
    xb_im::builtins::builtin("anyType").expect("anyType is a builtin")
}

fn any_simple_type() -> QName {
    xb_im::builtins::builtin("anySimpleType").expect("anySimpleType is a builtin")
}

fn parse_occurs(reader: &dyn XmlReader) -> Result<(u64, Occurs), XsdError> {
    let min_occurs = match attr(reader, "minOccurs") {
        None => 1,
        Some(value) => value
            .parse()
            .map_err(|_| XsdError::InvalidAttributeValue { attribute: "minOccurs", value: value.to_string() })?,
    };
    let max_occurs = match attr(reader, "maxOccurs") {
        None => Occurs::Bounded(1),
        Some("unbounded") => Occurs::Unbounded,
        Some(value) => Occurs::Bounded(
            value
                .parse()
                .map_err(|_| XsdError::InvalidAttributeValue { attribute: "maxOccurs", value: value.to_string() })?,
        ),
    };
    Ok((min_occurs, max_occurs))
}

/// The `QName` a top-level declaration or named type definition gets: its local `name` attribute
/// qualified by the schema's own target namespace (spec §3.2).
fn named(reader: &dyn XmlReader, builder: &Builder, element: &'static str) -> Result<QName, XsdError> {
    let local = attr(reader, "name").ok_or(XsdError::MissingAttribute { element, attribute: "name" })?;
    Ok(QName::new(builder.schema.target_namespace.clone(), local))
}

fn attr<'a>(reader: &'a dyn XmlReader, local: &str) -> Option<&'a str> {
    reader.attribute_value_by_name(&QName::no_namespace(local))
}

fn required_value_attr(reader: &dyn XmlReader, element: &'static str) -> Result<String, XsdError> {
    attr(reader, "value")
        .map(str::to_string)
        .ok_or(XsdError::MissingAttribute { element, attribute: "value" })
}

fn required_u64_value(reader: &dyn XmlReader, element: &'static str) -> Result<u64, XsdError> {
    let value = attr(reader, "value").ok_or(XsdError::MissingAttribute { element, attribute: "value" })?;
    value
        .parse()
        .map_err(|_| XsdError::InvalidAttributeValue { attribute: "value", value: value.to_string() })
}

fn attr_bool(reader: &dyn XmlReader, local: &'static str) -> Result<bool, XsdError> {
    match attr(reader, local) {
        None => Ok(false),
        Some("true" | "1") => Ok(true),
        Some("false" | "0") => Ok(false),
        Some(other) => Err(XsdError::InvalidAttributeValue { attribute: local, value: other.to_string() }),
    }
}

fn attr_qname(reader: &dyn XmlReader, local: &str) -> Result<Option<QName>, XsdError> {
    attr(reader, local).map(|value| resolve_qname_value(reader, value)).transpose()
}

/// Resolves a lexical `QName` attribute value (e.g. `xs:string`) against namespace bindings in
/// scope at the reader's current position (spec §4.1's prefix-resolution contract).
fn resolve_qname_value(reader: &dyn XmlReader, value: &str) -> Result<QName, XsdError> {
    let value = value.trim();
    match value.split_once(':') {
        Some((prefix, local)) => match reader.resolve_prefix(Some(prefix)) {
            Some(uri) => Ok(QName::new(uri, local)),
            None => Err(XsdError::NamePrefixNotResolved(prefix.to_string())),
        },
        None => match reader.resolve_prefix(None) {
            Some(uri) => Ok(QName::new(uri, value)),
            None => Ok(QName::no_namespace(value)),
        },
    }
}

/// Runs `f` over every direct XSD-namespace-relevant child, stopping at (and propagating) the
/// first error while still letting the underlying cursor consume the remainder of the subtree.
fn for_each_child_checked(
    reader: &mut dyn XmlReader,
    depth: usize,
    mut f: impl FnMut(&mut dyn XmlReader) -> Result<(), XsdError>,
) -> Result<(), XsdError> {
    let mut error = None;
    for_each_child(reader, depth, |r| {
        if error.is_some() {
            return;
        }
        if let Err(e) = f(r) {
            error = Some(e);
        }
    });
    match error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
