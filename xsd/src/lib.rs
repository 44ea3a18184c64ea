//! The XSD frontend (spec §4.4): reads a W3C XML Schema document, driven by an
//! [`xb_xml::XmlReader`] event stream, into an [`xb_im::Schema`].
//!
//! The state machine is keyed on element name in the XML Schema namespace
//! (`http://www.w3.org/2001/XMLSchema`); an unknown element in that namespace is a parse error,
//! while an unknown element in any other namespace is silently skipped as open content, matching
//! XSD's own extensibility model.

mod error;
mod parse;

pub use error::XsdError;
pub use parse::read_schema;

#[cfg(test)]
mod tests {
    use xb_im::builtins::XSD_NS;
    use xb_im::{Compositor, ContentType, Occurs, Term};
    use xb_xml::RoxmlEventReader;
    use xb_xstypes::QName;

    use super::*;

    fn schema_from(xml: &str) -> xb_im::Schema {
        let doc = roxmltree::Document::parse(xml).unwrap();
        let mut reader = RoxmlEventReader::from_root_element(doc.root_element());
        read_schema(&mut reader).unwrap()
    }

    #[test]
    fn parses_a_top_level_element_with_named_type() {
        let schema = schema_from(
            r#"<schema xmlns="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:example">
                 <element name="title" type="string"/>
               </schema>"#,
        );
        assert_eq!(schema.target_namespace, "urn:example");
        let el = schema.find_element(&QName::new("urn:example", "title")).unwrap();
        assert_eq!(el.type_, QName::new(XSD_NS, "string"));
        assert!(!el.nillable);
    }

    #[test]
    fn parses_a_complex_type_with_sequence_and_attribute() {
        let schema = schema_from(
            r#"<schema xmlns="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:example">
                 <complexType name="Book">
                   <sequence>
                     <element name="title" type="string"/>
                     <element name="year" type="int" minOccurs="0"/>
                   </sequence>
                   <attribute name="isbn" type="string" use="required"/>
                 </complexType>
               </schema>"#,
        );
        let ct = schema.find_complex_type(&QName::new("urn:example", "Book")).unwrap();
        assert_eq!(ct.attributes.len(), 1);
        assert!(ct.attributes[0].required);
        match &ct.content {
            ContentType::ElementOnly { content_model: Some(group), .. } => {
                assert_eq!(group.compositor, Compositor::Sequence);
                assert_eq!(group.particles.len(), 2);
                assert_eq!(group.particles[1].min_occurs, 0);
            }
            other => panic!("expected element-only content, got {other:?}"),
        }
    }

    #[test]
    fn anonymous_simple_type_is_lifted_and_referenced() {
        let schema = schema_from(
            r#"<schema xmlns="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:example">
                 <element name="size">
                   <simpleType>
                     <restriction base="string">
                       <enumeration value="S"/>
                       <enumeration value="M"/>
                     </restriction>
                   </simpleType>
                 </element>
               </schema>"#,
        );
        let el = schema.find_element(&QName::new("urn:example", "size")).unwrap();
        let st = schema.find_simple_type(&el.type_).unwrap();
        assert_eq!(st.base, QName::new(XSD_NS, "string"));
        assert_eq!(st.facets.enumeration.as_ref().unwrap(), &vec!["S".to_string(), "M".to_string()]);
    }

    #[test]
    fn unbounded_max_occurs_resolves_to_unbounded() {
        let schema = schema_from(
            r#"<schema xmlns="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:example">
                 <complexType name="List">
                   <sequence>
                     <element name="item" type="string" maxOccurs="unbounded"/>
                   </sequence>
                 </complexType>
               </schema>"#,
        );
        let ct = schema.find_complex_type(&QName::new("urn:example", "List")).unwrap();
        let group = ct.content.content_model().unwrap();
        assert_eq!(group.particles[0].max_occurs, Occurs::Unbounded);
    }

    #[test]
    fn group_ref_particle_resolves_against_default_namespace() {
        let schema = schema_from(
            r#"<schema xmlns="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:example">
                 <group name="common">
                   <sequence>
                     <element name="id" type="string"/>
                   </sequence>
                 </group>
                 <complexType name="Thing">
                   <sequence>
                     <group ref="common"/>
                   </sequence>
                 </complexType>
               </schema>"#,
        );
        let ct = schema.find_complex_type(&QName::new("urn:example", "Thing")).unwrap();
        let group = ct.content.content_model().unwrap();
        match &group.particles[0].term {
            Term::GroupRef(name) => assert_eq!(*name, QName::new(XSD_NS, "common")),
            other => panic!("expected a group ref, got {other:?}"),
        }
    }

    #[test]
    fn unknown_element_in_xsd_namespace_is_a_parse_error() {
        let doc = roxmltree::Document::parse(
            r#"<schema xmlns="http://www.w3.org/2001/XMLSchema">
                 <bogus/>
               </schema>"#,
        )
        .unwrap();
        let mut reader = RoxmlEventReader::from_root_element(doc.root_element());
        assert!(matches!(read_schema(&mut reader), Err(XsdError::UnknownElement(_))));
    }

    #[test]
    fn unknown_element_in_foreign_namespace_is_ignored() {
        let schema = schema_from(
            r#"<schema xmlns="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:example">
                 <xs:annotation xmlns:xs="urn:other"><xs:documentation/></xs:annotation>
                 <element name="ok" type="string"/>
               </schema>"#,
        );
        assert!(schema.find_element(&QName::new("urn:example", "ok")).is_some());
    }
}
