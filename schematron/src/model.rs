/// A parsed Schematron document (spec §4.10): patterns with rules, each rule carrying a context
/// expression and a sequence of assert/report checks, plus the namespace prefix bindings needed
/// to resolve a rule's context to a `(ns, local)` pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchematronSchema {
    pub namespaces: Vec<NamespaceBinding>,
    pub patterns: Vec<Pattern>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceBinding {
    pub prefix: String,
    pub uri: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pattern {
    pub rules: Vec<Rule>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub context: String,
    pub checks: Vec<Check>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Check {
    pub kind: CheckKind,
    pub test: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CheckKind {
    Assert,
    Report,
}

impl SchematronSchema {
    pub fn resolve_prefix(&self, prefix: &str) -> Option<&str> {
        self.namespaces.iter().find(|n| n.prefix == prefix).map(|n| n.uri.as_str())
    }
}
