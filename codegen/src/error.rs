use xb_xstypes::QName;

#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("type map override names an unknown XSD type {0:?}")]
    UnknownXsdType(QName),

    #[error("generated name {0:?} collides with an existing declaration after snake-case normalization")]
    NameCollision(String),

    #[error("type {0:?} combines facets in a way codegen does not support: {1}")]
    UnsupportedFacetCombination(QName, &'static str),

    #[error("{0:?} has no mapped target type and no override was supplied")]
    UnmappedType(QName),
}
