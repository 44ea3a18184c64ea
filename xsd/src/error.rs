use xb_xstypes::QName;

/// Errors raised while reading an XSD document into the intermediate model (spec §4.4, §7).
///
/// Unknown elements in the XML Schema namespace are parse errors (spec §4.4); unknown elements in
/// any other namespace are silently skipped as open content and never reach this type.
#[derive(Debug, thiserror::Error)]
pub enum XsdError {
    #[error("empty document: expected a <schema> root element")]
    UnexpectedEof,

    #[error("expected the document element to be <schema>, found {0}")]
    UnexpectedRootElement(QName),

    #[error("unknown element {0} in the XML Schema namespace")]
    UnknownElement(QName),

    #[error("missing required attribute `{attribute}` on <{element}>")]
    MissingAttribute { element: &'static str, attribute: &'static str },

    #[error("invalid value {value:?} for attribute `{attribute}`")]
    InvalidAttributeValue { attribute: &'static str, value: String },

    #[error("could not resolve namespace prefix {0:?}")]
    NamePrefixNotResolved(String),
}
