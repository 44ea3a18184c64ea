use xb_xstypes::QName;

/// RELAX NG name class (spec §3.3): what an `element`/`attribute` pattern's tag may match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NameClass {
    SpecificName(QName),
    /// `anyName`, optionally excluding the names matched by a nested class.
    AnyName(Option<Box<NameClass>>),
    /// `nsName`, optionally excluding the names matched by a nested class.
    NsName(String, Option<Box<NameClass>>),
    Choice(Box<NameClass>, Box<NameClass>),
}

impl NameClass {
    /// Whether `name` is matched by this class. Used by the translator to decide whether an
    /// `element`/`attribute` pattern names one specific tag (the only case the IM can represent).
    pub fn matches(&self, name: &QName) -> bool {
        match self {
            NameClass::SpecificName(n) => n == name,
            NameClass::AnyName(except) => !except.as_ref().is_some_and(|e| e.matches(name)),
            NameClass::NsName(ns, except) => name.uri == *ns && !except.as_ref().is_some_and(|e| e.matches(name)),
            NameClass::Choice(a, b) => a.matches(name) || b.matches(name),
        }
    }

    /// The one name this class names exactly, if it is a bare [`NameClass::SpecificName`].
    pub fn as_specific(&self) -> Option<&QName> {
        match self {
            NameClass::SpecificName(n) => Some(n),
            _ => None,
        }
    }
}
