//! The Schematron overlay (spec §4.10): parses a Schematron document into [`model`], then
//! attaches each rule's assert/report checks as `assertion` strings on the complex type backing
//! its context element in a resolved [`xb_im::SchemaSet`].

mod error;
mod model;
mod overlay;
mod parse;

pub use error::SchematronError;
pub use model::{Check, CheckKind, NamespaceBinding, Pattern, Rule, SchematronSchema};
pub use overlay::{apply_overlay, Outcome};
pub use parse::{read_schematron, SCHEMATRON_NS};

#[cfg(test)]
mod tests {
    use xb_im::{ComplexType, ContentType, ElementDeclaration, Schema, SchemaSet};
    use xb_xml::RoxmlEventReader;
    use xb_xstypes::QName;

    use super::*;

    #[test]
    fn parses_and_applies_in_one_pipeline() {
        let xml = r#"<schema xmlns="http://purl.oclc.org/dsdl/schematron">
              <pattern>
                <rule context="invoice">
                  <assert test="total &gt; 0">positive total</assert>
                </rule>
              </pattern>
            </schema>"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        let mut reader = RoxmlEventReader::from_root_element(doc.root_element());
        let schematron = read_schematron(&mut reader).unwrap();

        let mut schema = Schema::new("");
        schema.elements.push(ElementDeclaration {
            name: QName::no_namespace("invoice"),
            type_: QName::no_namespace("invoiceType"),
            nillable: false,
            abstract_: false,
            default: None,
            fixed: None,
            substitution_group: None,
            type_alternatives: vec![],
        });
        schema.complex_types.push(ComplexType {
            name: QName::no_namespace("invoiceType"),
            abstract_: false,
            mixed: false,
            content: ContentType::Empty,
            attributes: vec![],
            attribute_group_refs: vec![],
            attribute_wildcard: None,
            assertions: vec![],
        });
        let mut set = SchemaSet::new();
        set.push(schema);

        let outcome = apply_overlay(&mut set, &schematron);
        assert_eq!(outcome.matched, 1);
        let ct = set.find_complex_type(&QName::no_namespace("invoiceType")).unwrap();
        assert_eq!(ct.assertions, vec!["total > 0".to_string()]);
    }
}
