use xb_xstypes::QName;

use crate::attribute::AttributeUse;
use crate::content_type::ContentType;
use crate::wildcard::Wildcard;

/// Schema Component: Complex Type Definition (spec §3.2).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComplexType {
    pub name: QName,
    pub abstract_: bool,
    pub mixed: bool,
    pub content: ContentType,
    pub attributes: Vec<AttributeUse>,
    pub attribute_group_refs: Vec<QName>,
    pub attribute_wildcard: Option<Wildcard>,
    pub assertions: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeGroupDefinition {
    pub name: QName,
    pub attributes: Vec<AttributeUse>,
    pub attribute_group_refs: Vec<QName>,
    pub attribute_wildcard: Option<Wildcard>,
}
