use std::cmp::Ordering;
use std::fmt;

/// A qualified name: a (namespace URI, local name) pair.
///
/// An empty `uri` denotes the no-namespace case, not an unknown namespace — callers that need
/// "unknown" should use `Option<QName>` rather than relying on emptiness meaning anything else.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct QName {
    pub uri: String,
    pub local: String,
}

impl QName {
    pub fn new(uri: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            local: local.into(),
        }
    }

    pub fn no_namespace(local: impl Into<String>) -> Self {
        Self {
            uri: String::new(),
            local: local.into(),
        }
    }

    pub fn is_no_namespace(&self) -> bool {
        self.uri.is_empty()
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.uri.is_empty() {
            write!(f, "{}", self.local)
        } else {
            write!(f, "{{{}}}{}", self.uri, self.local)
        }
    }
}

// Total order, URI first, matching spec §3.1.
impl PartialOrd for QName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.uri.cmp(&other.uri).then_with(|| self.local.cmp(&other.local))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_namespace_is_empty_uri() {
        let q = QName::no_namespace("foo");
        assert!(q.is_no_namespace());
        assert_eq!(q.to_string(), "foo");
    }

    #[test]
    fn ordering_is_uri_first() {
        let a = QName::new("http://a", "z");
        let b = QName::new("http://b", "a");
        assert!(a < b);
    }
}
