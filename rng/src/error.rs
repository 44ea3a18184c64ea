/// Errors raised while parsing, simplifying or translating a RELAX NG schema (spec §4.6, §4.7,
/// §4.8, §7).
#[derive(Debug, thiserror::Error)]
pub enum RngError {
    #[error("empty document: expected a pattern element")]
    UnexpectedEof,

    #[error("unknown element {0} in the RELAX NG namespace")]
    UnknownElement(String),

    #[error("missing required attribute `{attribute}` on <{element}>")]
    MissingAttribute { element: &'static str, attribute: &'static str },

    #[error("<{element}> has no pattern content")]
    EmptyContent { element: &'static str },

    #[error("combine methods for define {0:?} conflict: a shared name must use one method consistently")]
    ConflictingCombine(String),

    #[error("unexpected token at position {position}: {message}")]
    UnexpectedToken { position: usize, message: String },

    #[error("unterminated string literal starting at position {0}")]
    UnterminatedString(usize),
}
