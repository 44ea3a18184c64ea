/// Errors raised while parsing a Schematron document (spec §4.10). Overlay application itself
/// never fails: an unresolved context degrades to a warning, per spec §7.
#[derive(Debug, thiserror::Error)]
pub enum SchematronError {
    #[error("empty document: expected a <schema> element")]
    UnexpectedEof,

    #[error("unexpected root element {0}, expected <schema> in the Schematron namespace")]
    UnexpectedRootElement(xb_xstypes::QName),

    #[error("<rule> is missing a required `context` attribute")]
    MissingContext,

    #[error("<{0}> is missing a required `test` attribute")]
    MissingTest(&'static str),
}
