use xb_xstypes::QName;

/// The five disjoint tables a schema set's top-level definitions are registered into (spec §4.9).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ComponentKind {
    Type,
    Element,
    Attribute,
    ModelGroup,
    AttributeGroup,
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ComponentKind::Type => "type",
            ComponentKind::Element => "element",
            ComponentKind::Attribute => "attribute",
            ComponentKind::ModelGroup => "model group",
            ComponentKind::AttributeGroup => "attribute group",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("duplicate {kind} name {name:?}")]
    DuplicateName { kind: ComponentKind, name: QName },

    #[error("unresolved {kind} reference {name:?}")]
    UnresolvedReference { kind: ComponentKind, name: QName },
}
