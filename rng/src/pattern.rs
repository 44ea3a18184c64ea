use crate::name_class::NameClass;

/// RELAX NG pattern tree (spec §3.3). Children are exclusively owned by their parent; back
/// references (`ref`/`parentRef`) use names, never pointers, so the tree has no cycles even
/// though a grammar's defines are mutually recursive in the abstract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pattern {
    Element(NameClass, Box<Pattern>),
    Attribute(NameClass, Box<Pattern>),
    Group(Box<Pattern>, Box<Pattern>),
    Interleave(Box<Pattern>, Box<Pattern>),
    Choice(Box<Pattern>, Box<Pattern>),
    OneOrMore(Box<Pattern>),
    /// Eliminated by the simplifier (rule 3): `zeroOrMore(p) => choice(oneOrMore(p), empty)`.
    ZeroOrMore(Box<Pattern>),
    /// Eliminated by the simplifier (rule 2): `optional(p) => choice(p, empty)`.
    Optional(Box<Pattern>),
    /// Eliminated by the simplifier (rule 1): `mixed(p) => interleave(p, text)`.
    Mixed(Box<Pattern>),
    Ref(String),
    ParentRef(String),
    Empty,
    Text,
    NotAllowed,
    Data {
        library: String,
        type_: String,
        params: Vec<Param>,
        except: Option<Box<Pattern>>,
    },
    Value {
        ns: String,
        library: String,
        type_: String,
        content: String,
    },
    List(Box<Pattern>),
    ExternalRef {
        href: String,
        ns: String,
    },
    Grammar(Box<Grammar>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub value: String,
}

/// `grammar{start, defines, includes}` (spec §3.3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grammar {
    pub start: Box<Pattern>,
    pub defines: Vec<Define>,
    pub includes: Vec<Include>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Define {
    pub name: String,
    pub body: Pattern,
    pub combine: Option<Combine>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Combine {
    Choice,
    Interleave,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Include {
    pub href: String,
}

impl Grammar {
    pub fn find_define(&self, name: &str) -> Option<&Define> {
        self.defines.iter().find(|d| d.name == name)
    }

    /// Every define name reachable from `start` through `ref` edges (spec §4.7 rule 6).
    pub fn reachable_define_names(&self) -> std::collections::HashSet<String> {
        let mut reachable = std::collections::HashSet::new();
        let mut stack: Vec<&Pattern> = vec![&self.start];
        while let Some(p) = stack.pop() {
            walk_refs(p, &mut reachable, &mut stack, self);
        }
        reachable
    }
}

fn walk_refs<'a>(
    p: &'a Pattern,
    reachable: &mut std::collections::HashSet<String>,
    stack: &mut Vec<&'a Pattern>,
    grammar: &'a Grammar,
) {
    match p {
        Pattern::Ref(name) | Pattern::ParentRef(name) => {
            if reachable.insert(name.clone()) {
                if let Some(def) = grammar.find_define(name) {
                    stack.push(&def.body);
                }
            }
        }
        Pattern::Element(_, body) | Pattern::Attribute(_, body) => stack.push(body),
        Pattern::Group(a, b) | Pattern::Interleave(a, b) | Pattern::Choice(a, b) => {
            stack.push(a);
            stack.push(b);
        }
        Pattern::OneOrMore(p) | Pattern::ZeroOrMore(p) | Pattern::Optional(p) | Pattern::Mixed(p) | Pattern::List(p) => {
            stack.push(p)
        }
        Pattern::Data { except, .. } => {
            if let Some(p) = except {
                stack.push(p)
            }
        }
        Pattern::Grammar(g) => stack.push(&g.start),
        Pattern::Empty
        | Pattern::Text
        | Pattern::NotAllowed
        | Pattern::Value { .. }
        | Pattern::ExternalRef { .. } => {}
    }
}
