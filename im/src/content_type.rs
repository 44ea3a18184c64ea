use xb_xstypes::QName;

use crate::facets::FacetSet;
use crate::model_group::ModelGroup;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Derivation {
    Restriction,
    Extension,
}

/// Schema Component: Content Type, a tagged variant over four kinds (spec §3.2). `Simple` and
/// the `Element`/`Mixed` pair correspond to the two payload shapes named in the spec; `Element`
/// and `Mixed` share the "complex" payload but are kept as distinct variants so the content
/// kind itself is visible without inspecting `content_model`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentType {
    Empty,
    Simple {
        base: QName,
        derivation: Derivation,
        facets: FacetSet,
    },
    ElementOnly {
        base: Option<QName>,
        derivation: Derivation,
        content_model: Option<ModelGroup>,
    },
    Mixed {
        base: Option<QName>,
        derivation: Derivation,
        content_model: Option<ModelGroup>,
    },
}

impl ContentType {
    pub fn is_empty(&self) -> bool {
        matches!(self, ContentType::Empty)
    }

    pub fn content_model(&self) -> Option<&ModelGroup> {
        match self {
            ContentType::ElementOnly { content_model, .. } | ContentType::Mixed { content_model, .. } => {
                content_model.as_ref()
            }
            _ => None,
        }
    }
}
