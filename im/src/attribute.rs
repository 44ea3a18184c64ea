use xb_xstypes::QName;

/// Schema Component: Attribute Use (spec §3.2, merging XSD's attribute declaration and
/// attribute use into a single record since the distinction is not load-bearing for a data
/// binding). `default` and `fixed` are mutually exclusive on a used attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeUse {
    pub name: QName,
    pub type_: QName,
    pub required: bool,
    pub default: Option<String>,
    pub fixed: Option<String>,
}

impl AttributeUse {
    pub fn is_valid(&self) -> bool {
        self.default.is_none() || self.fixed.is_none()
    }
}
