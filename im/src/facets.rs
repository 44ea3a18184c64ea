/// A record of optional restrictions on a simple type (spec §3.2). Fields are independently
/// optional; min/max bounds are kept in their unparsed lexical form since their datatype
/// depends on the base type they constrain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FacetSet {
    pub enumeration: Option<Vec<String>>,
    pub pattern: Option<String>,
    pub min_inclusive: Option<String>,
    pub max_inclusive: Option<String>,
    pub min_exclusive: Option<String>,
    pub max_exclusive: Option<String>,
    pub length: Option<u64>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub total_digits: Option<u64>,
    pub fraction_digits: Option<u64>,
}

impl FacetSet {
    pub fn is_empty(&self) -> bool {
        self == &FacetSet::default()
    }
}
