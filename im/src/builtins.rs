use xb_xstypes::QName;

pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";

/// The closed set of 48 built-in XSD datatype local names (spec §4.9), used by the resolver to
/// accept references that are not defined anywhere in the schema set.
pub const BUILTIN_LOCAL_NAMES: [&str; 48] = [
    "anyType",
    "anySimpleType",
    "anyAtomicType",
    "string",
    "boolean",
    "decimal",
    "float",
    "double",
    "duration",
    "dateTime",
    "time",
    "date",
    "gYearMonth",
    "gYear",
    "gMonthDay",
    "gDay",
    "gMonth",
    "hexBinary",
    "base64Binary",
    "anyURI",
    "QName",
    "NOTATION",
    "normalizedString",
    "token",
    "language",
    "NMTOKEN",
    "NMTOKENS",
    "Name",
    "NCName",
    "ID",
    "IDREF",
    "IDREFS",
    "ENTITY",
    "ENTITIES",
    "integer",
    "nonPositiveInteger",
    "negativeInteger",
    "long",
    "int",
    "short",
    "byte",
    "nonNegativeInteger",
    "unsignedLong",
    "unsignedInt",
    "unsignedShort",
    "unsignedByte",
    "positiveInteger",
    "yearMonthDuration",
    "dayTimeDuration",
];

pub fn is_builtin(name: &QName) -> bool {
    name.uri == XSD_NS && BUILTIN_LOCAL_NAMES.contains(&name.local.as_str())
}

pub fn builtin(local_name: &str) -> Option<QName> {
    BUILTIN_LOCAL_NAMES
        .contains(&local_name)
        .then(|| QName::new(XSD_NS, local_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_forty_eight() {
        assert_eq!(BUILTIN_LOCAL_NAMES.len(), 48);
    }

    #[test]
    fn recognizes_builtins_only_in_xsd_namespace() {
        assert!(is_builtin(&QName::new(XSD_NS, "string")));
        assert!(!is_builtin(&QName::new("urn:other", "string")));
    }
}
