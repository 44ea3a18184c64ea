use xb_xstypes::QName;

use crate::element::ElementDeclaration;
use crate::model_group::ModelGroup;
use crate::wildcard::Wildcard;

/// Schema Component: Particle, pairing a [`Term`] with an occurrence range (spec §3.2).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Particle {
    pub term: Term,
    pub min_occurs: u64,
    pub max_occurs: Occurs,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Occurs {
    Bounded(u64),
    Unbounded,
}

/// A content-model term. `Group` owns its nested model group directly (recursion through an
/// owned child tree, per spec §3.5); `ElementRef`/`GroupRef` recurse only by name, resolved at
/// lookup time through the schema set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Term {
    InlineElement(Box<ElementDeclaration>),
    ElementRef(QName),
    GroupRef(QName),
    Group(Box<ModelGroup>),
    Wildcard(Wildcard),
}

impl Particle {
    pub fn is_emptiable(&self) -> bool {
        self.min_occurs == 0
    }
}
