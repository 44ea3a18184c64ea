/// Errors raised while tokenizing or parsing a DTD document (spec §4.5, §7).
#[derive(Debug, thiserror::Error)]
pub enum DtdError {
    #[error("unterminated markup declaration starting at byte offset {0}")]
    UnterminatedDeclaration(usize),

    #[error("unknown markup declaration keyword {0:?}")]
    UnknownDeclarationKeyword(String),

    #[error("reference to undefined parameter entity %{0};")]
    UndefinedParameterEntity(String),

    #[error("malformed content spec: {0}")]
    MalformedContentSpec(String),

    #[error("mixed sequence (`,`) and choice (`|`) separators within one group")]
    MixedSeparators,

    #[error("malformed ATTLIST declaration: {0}")]
    MalformedAttlist(String),

    #[error("malformed ENTITY declaration: {0}")]
    MalformedEntity(String),

    #[error("unexpected end of input while parsing a {0}")]
    UnexpectedEof(&'static str),
}
