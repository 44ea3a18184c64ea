//! The DTD frontend (spec §3.4, §4.5): parses a DTD internal/external subset into the raw
//! model in [`model`], then lowers it into [`xb_im::Schema`].

mod content_model;
mod error;
mod model;
mod parameter_entities;
mod parse;
mod tokenizer;
mod translate;

pub use error::DtdError;
pub use model::{
    AttlistDecl, AttrDefault, AttrType, AttributeDef, ContentSpec, Document, ElementDecl, EntityDecl, Particle,
    Quantifier, Separator, Term,
};
pub use parse::parse_document;
pub use translate::translate;

/// Parses a DTD subset and lowers it straight to a [`xb_im::Schema`], mirroring `xb_xsd::read_schema`.
pub fn read_schema(input: &str) -> Result<xb_im::Schema, DtdError> {
    let doc = parse_document(input)?;
    Ok(translate(&doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use xb_im::builtins::XSD_NS;
    use xb_xstypes::QName;

    #[test]
    fn reads_a_small_document_into_a_schema() {
        let schema = read_schema(
            r#"
            <!ELEMENT book (title, author+)>
            <!ATTLIST book isbn CDATA #REQUIRED>
            <!ELEMENT title (#PCDATA)>
            <!ELEMENT author (#PCDATA)>
            "#,
        )
        .unwrap();

        let book = schema.find_element(&QName::no_namespace("book")).unwrap();
        assert_eq!(book.type_, QName::no_namespace("bookType"));
        let title = schema.find_element(&QName::no_namespace("title")).unwrap();
        assert_eq!(title.type_, QName::new(XSD_NS, "string"));

        let book_type = schema.find_complex_type(&QName::no_namespace("bookType")).unwrap();
        assert_eq!(book_type.attributes.len(), 1);
        assert!(book_type.attributes[0].required);
    }

    #[test]
    fn malformed_content_spec_is_reported() {
        assert!(read_schema("<!ELEMENT book (title,)>").is_err());
    }
}
