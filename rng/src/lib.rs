//! The RELAX NG frontend (spec §3.3, §4.6, §4.7, §4.8): parses either XML or compact syntax into
//! the pattern tree in [`pattern`], simplifies it to the fixed set of primitive patterns
//! (§4.7), then lowers the result into [`xb_im::Schema`].

mod error;
mod name_class;
mod pattern;
mod simplify;
mod translate;
mod xml_parser;

pub mod compact;

pub use error::RngError;
pub use name_class::NameClass;
pub use pattern::{Combine, Define, Grammar, Include, Param, Pattern};
pub use simplify::{simplify, FileResolver};
pub use translate::translate;
pub use xml_parser::{parse as parse_xml, RNG_NS};

use xb_xml::XmlReader;

/// Parses, simplifies and translates an XML-syntax RELAX NG schema in one call, mirroring
/// `xb_xsd::read_schema`/`xb_dtd::read_schema`. `resolver` supplies the content of
/// `externalRef`/`include` targets; pass `None` to leave unresolved references in place.
pub fn read_schema_xml(reader: &mut dyn XmlReader, resolver: Option<&dyn FileResolver>) -> Result<xb_im::Schema, RngError> {
    let pattern = xml_parser::parse(reader)?;
    let pattern = simplify::simplify(pattern, resolver)?;
    Ok(translate::translate(&pattern))
}

/// Parses, simplifies and translates a compact-syntax RELAX NG schema in one call.
pub fn read_schema_compact(source: &str, resolver: Option<&dyn FileResolver>) -> Result<xb_im::Schema, RngError> {
    let pattern = compact::parse(source)?;
    let pattern = simplify::simplify(pattern, resolver)?;
    Ok(translate::translate(&pattern))
}

#[cfg(test)]
mod tests {
    use xb_im::builtins::XSD_NS;
    use xb_xml::RoxmlEventReader;
    use xb_xstypes::QName;

    use super::*;

    #[test]
    fn reads_an_xml_syntax_schema_into_a_schema() {
        let xml = r#"<element xmlns="http://relaxng.org/ns/structure/1.0" name="doc">
              <text/>
            </element>"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        let mut reader = RoxmlEventReader::from_root_element(doc.root_element());
        let schema = read_schema_xml(&mut reader, None).unwrap();
        let el = schema.find_element(&QName::no_namespace("doc")).unwrap();
        assert_eq!(el.type_, QName::new(XSD_NS, "string"));
    }

    #[test]
    fn reads_a_compact_syntax_schema_into_a_schema() {
        let schema = read_schema_compact("element doc { element title { text } }", None).unwrap();
        assert!(schema.find_element(&QName::no_namespace("doc")).is_some());
    }
}
