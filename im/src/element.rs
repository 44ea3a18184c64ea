use xb_xstypes::QName;

/// Schema Component: Element Declaration (spec §3.2).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementDeclaration {
    pub name: QName,
    pub type_: QName,
    pub nillable: bool,
    pub abstract_: bool,
    pub default: Option<String>,
    pub fixed: Option<String>,
    pub substitution_group: Option<QName>,
    pub type_alternatives: Vec<TypeAlternative>,
}

/// A conditional type assignment (XSD 1.1 `<alternative>`). A `test` of `None` marks the
/// default branch, which must be considered last.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeAlternative {
    pub test: Option<String>,
    pub type_: QName,
}

impl ElementDeclaration {
    pub fn default_alternative(&self) -> Option<&TypeAlternative> {
        self.type_alternatives.iter().find(|alt| alt.test.is_none())
    }
}
