//! The intermediate codegen tree (spec §4.13), the generator's counterpart to `xb_im`'s
//! schema-level intermediate model. Lowering (`crate::lower`) builds this from a resolved
//! `SchemaSet`, resolving each field's and alias's target type through the active `TypeMap` —
//! `type_expr` therefore already names a Rust type (e.g. `xb_xstypes::BigDecimal`). The Rust
//! emitter (`crate::emit`) renders that name directly; the TypeScript emitter (`crate::emit_ts`)
//! translates it through a small Rust-name-to-TypeScript-name table rather than the tree
//! carrying two parallel type names.

/// A field inside a generated record: one per attribute or content-model particle, in
/// declaration order (spec §4.13, §5).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub type_expr: String,
    pub required_import: Option<String>,
    pub optional: bool,
    pub repeating: bool,
    pub default: Option<String>,
    pub documentation: Option<String>,
    /// `true` for an attribute-derived field, `false` for a content-model (element/text)
    /// field. Drives whether [`crate::emit`]'s parse/serialize glue reads it off the element's
    /// attribute list or off its child content.
    pub is_attribute: bool,
    /// The field's original (pre-`naming`) XML local name: the attribute name, the child
    /// element's name, or the sentinel `"#text"` for a simple-content value field.
    pub xml_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumVariant {
    pub name: String,
    pub xml_value: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    pub variants: Vec<EnumVariant>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AliasType {
    pub name: String,
    pub target: String,
    pub required_import: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordType {
    pub name: String,
    pub fields: Vec<Field>,
}

/// One generated declaration. A simple type without an enumeration facet becomes an
/// [`AliasType`]; one with an enumeration facet becomes an [`EnumType`] plus its to/from
/// conversion functions (synthesized at emission time, not carried in the tree); a complex type
/// becomes a [`RecordType`] (spec §4.13).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    Enum(EnumType),
    Alias(AliasType),
    Record(RecordType),
}

impl Type {
    pub fn name(&self) -> &str {
        match self {
            Type::Enum(e) => &e.name,
            Type::Alias(a) => &a.name,
            Type::Record(r) => &r.name,
        }
    }
}

/// A top-level element's generated binding (spec §4.13): a type alias to its (possibly
/// anonymous, already-lowered) type, plus free parse/serialize functions named after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementBinding {
    pub element_name: String,
    pub type_name: String,
    /// The element's original XML local name, used as the emitted parse/serialize functions'
    /// wire tag (`element_name` is already snake-cased for the function name itself).
    pub xml_name: String,
}

/// Everything generated for one target namespace (spec §4.13's "per-schema output model"). Types
/// appear in the order they were registered in the source schema, which the resolver and the
/// code generator both treat as the deterministic emission order (spec §5).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Module {
    pub namespace_path: String,
    pub types: Vec<Type>,
    pub elements: Vec<ElementBinding>,
}
