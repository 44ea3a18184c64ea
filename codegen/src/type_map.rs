//! XSD datatype → target-type mapping (spec §4.13, §6). Defaults cover the 48 built-in XSD
//! datatypes; an override file can replace any entry but not introduce a type outside that set.

use std::collections::HashMap;

use xb_im::builtins::{is_builtin, XSD_NS};
use xb_xml::{NodeType, XmlReader};
use xb_xstypes::QName;

use crate::error::CodegenError;

pub const TYPEMAP_NS: &str = "http://xb.dev/typemap";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeMapping {
    pub target_type: String,
    pub required_import: Option<String>,
}

impl TypeMapping {
    fn new(target_type: &str) -> Self {
        Self { target_type: target_type.to_string(), required_import: None }
    }

    fn with_import(target_type: &str, import: &str) -> Self {
        Self { target_type: target_type.to_string(), required_import: Some(import.to_string()) }
    }
}

#[derive(Clone, Debug)]
pub struct TypeMap {
    table: HashMap<QName, TypeMapping>,
}

impl TypeMap {
    pub fn lookup(&self, name: &QName) -> Option<&TypeMapping> {
        self.table.get(name)
    }

    /// Replaces entries in `self` with the contents of an override file (spec §6): a `typemap`
    /// root in the `http://xb.dev/typemap` namespace containing `mapping` elements with
    /// `xsd-type`/`cpp-type`/`cpp-header` attributes (kept as the literal attribute names the
    /// interface specifies; `cpp-type`/`cpp-header` name the target type and its required
    /// import, regardless of target language). A `xsd-type` outside the 48 built-ins is
    /// rejected.
    pub fn apply_overrides(&mut self, reader: &mut dyn XmlReader) -> Result<(), CodegenError> {
        if !reader.advance() || reader.node_type() != NodeType::Start {
            return Ok(());
        }
        let depth = reader.depth();
        while reader.advance() && reader.depth() > depth {
            if reader.node_type() != NodeType::Start {
                continue;
            }
            if reader.name().local != "mapping" {
                continue;
            }
            let xsd_local = attr(reader, "xsd-type").unwrap_or_default().to_string();
            let target_type = attr(reader, "cpp-type").unwrap_or_default().to_string();
            let import = attr(reader, "cpp-header").map(str::to_string);

            let qname = QName::new(XSD_NS, xsd_local);
            if !is_builtin(&qname) {
                return Err(CodegenError::UnknownXsdType(qname));
            }
            self.table.insert(qname, TypeMapping { target_type, required_import: import });
        }
        Ok(())
    }
}

fn attr<'a>(reader: &'a dyn XmlReader, name: &str) -> Option<&'a str> {
    reader.attribute_value_by_name(&QName::no_namespace(name))
}

impl Default for TypeMap {
    fn default() -> Self {
        let mut table = HashMap::new();
        let mut put = |local: &str, mapping: TypeMapping| {
            table.insert(QName::new(XSD_NS, local), mapping);
        };

        for local in ["anyType", "anySimpleType", "anyAtomicType", "NOTATION"] {
            put(local, TypeMapping::new("String"));
        }
        for local in [
            "string",
            "normalizedString",
            "token",
            "language",
            "NMTOKEN",
            "Name",
            "NCName",
            "ID",
            "IDREF",
            "ENTITY",
            "anyURI",
            "gYearMonth",
            "gYear",
            "gMonthDay",
            "gDay",
            "gMonth",
        ] {
            put(local, TypeMapping::new("String"));
        }
        for local in ["NMTOKENS", "IDREFS", "ENTITIES"] {
            put(local, TypeMapping::new("Vec<String>"));
        }
        put("boolean", TypeMapping::new("bool"));
        put("float", TypeMapping::new("f32"));
        put("double", TypeMapping::new("f64"));
        put("long", TypeMapping::new("i64"));
        put("int", TypeMapping::new("i32"));
        put("short", TypeMapping::new("i16"));
        put("byte", TypeMapping::new("i8"));
        put("unsignedLong", TypeMapping::new("u64"));
        put("unsignedInt", TypeMapping::new("u32"));
        put("unsignedShort", TypeMapping::new("u16"));
        put("unsignedByte", TypeMapping::new("u8"));
        for local in ["integer", "nonPositiveInteger", "negativeInteger", "nonNegativeInteger", "positiveInteger"] {
            put(local, TypeMapping::with_import("xb_xstypes::BigInt", "xb_xstypes::BigInt"));
        }
        put("decimal", TypeMapping::with_import("xb_xstypes::BigDecimal", "xb_xstypes::BigDecimal"));
        put("duration", TypeMapping::with_import("xb_xstypes::Duration", "xb_xstypes::Duration"));
        put("dateTime", TypeMapping::with_import("xb_xstypes::DateTime", "xb_xstypes::DateTime"));
        put("time", TypeMapping::with_import("xb_xstypes::Time", "xb_xstypes::Time"));
        put("date", TypeMapping::with_import("xb_xstypes::Date", "xb_xstypes::Date"));
        put("yearMonthDuration", TypeMapping::with_import("xb_xstypes::YearMonthDuration", "xb_xstypes::YearMonthDuration"));
        put("dayTimeDuration", TypeMapping::with_import("xb_xstypes::DayTimeDuration", "xb_xstypes::DayTimeDuration"));
        for local in ["hexBinary", "base64Binary"] {
            put(local, TypeMapping::new("Vec<u8>"));
        }
        put("QName", TypeMapping::with_import("xb_xstypes::QName", "xb_xstypes::QName"));

        debug_assert_eq!(table.len(), 48, "every built-in XSD datatype must have a default mapping");
        Self { table }
    }
}

#[cfg(test)]
mod tests {
    use xb_xml::RoxmlEventReader;

    use super::*;

    #[test]
    fn default_table_covers_every_builtin() {
        let map = TypeMap::default();
        assert_eq!(map.lookup(&QName::new(XSD_NS, "string")).unwrap().target_type, "String");
        assert_eq!(map.lookup(&QName::new(XSD_NS, "int")).unwrap().target_type, "i32");
        assert!(map.lookup(&QName::new(XSD_NS, "decimal")).unwrap().required_import.is_some());
    }

    #[test]
    fn an_override_replaces_the_matching_default() {
        let xml = r#"<typemap xmlns="http://xb.dev/typemap">
              <mapping xsd-type="dateTime" cpp-type="MyDateTime" cpp-header="myproject::MyDateTime"/>
            </typemap>"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        let mut reader = RoxmlEventReader::from_root_element(doc.root_element());
        let mut map = TypeMap::default();
        map.apply_overrides(&mut reader).unwrap();
        let mapping = map.lookup(&QName::new(XSD_NS, "dateTime")).unwrap();
        assert_eq!(mapping.target_type, "MyDateTime");
        assert_eq!(mapping.required_import.as_deref(), Some("myproject::MyDateTime"));
    }

    #[test]
    fn an_unknown_xsd_type_is_rejected() {
        let xml = r#"<typemap xmlns="http://xb.dev/typemap">
              <mapping xsd-type="notARealType" cpp-type="Foo" cpp-header="foo"/>
            </typemap>"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        let mut reader = RoxmlEventReader::from_root_element(doc.root_element());
        let mut map = TypeMap::default();
        assert!(map.apply_overrides(&mut reader).is_err());
    }
}
