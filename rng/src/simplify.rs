//! The RELAX NG simplifier (spec §4.7): a fixed-point rewrite engine reducing a pattern tree to
//! its canonical simplified form — no `mixed`, `optional` or `zeroOrMore` nodes remain, `combine`
//! siblings are merged, unreachable defines are dropped, and (given a resolver) `externalRef` and
//! `include` directives are substituted.
//!
//! Each rule is a total function on the pattern variant applied bottom-up: children are
//! simplified first, then the node itself is rewritten until no rule fires at that node. Every
//! rule strictly reduces either the node's syntactic size (rules 1-4) or the grammar's define
//! count (rules 5-6), so the whole rewrite terminates on any finite input (spec §8 "simplifier
//! termination").

use crate::error::RngError;
use crate::pattern::{Combine, Define, Grammar, Include, Pattern};

/// Resolves an `externalRef`/`include` `href` to source text. Returning `None` leaves the
/// reference in place, matching spec §4.7 rule 7's "absence of a resolver" behavior.
pub trait FileResolver {
    fn resolve(&self, href: &str) -> Option<String>;
}

impl<F: Fn(&str) -> Option<String>> FileResolver for F {
    fn resolve(&self, href: &str) -> Option<String> {
        self(href)
    }
}

/// Simplifies `pattern` to its fixed point (spec §4.7). `resolver` is consulted for
/// `externalRef`/`include` hrefs; pass `None` to leave them unresolved.
pub fn simplify(pattern: Pattern, resolver: Option<&dyn FileResolver>) -> Result<Pattern, RngError> {
    let resolved = resolve_external(pattern, resolver)?;
    simplify_node(resolved)
}

fn resolve_external(pattern: Pattern, resolver: Option<&dyn FileResolver>) -> Result<Pattern, RngError> {
    let resolver = match resolver {
        Some(r) => r,
        None => return Ok(pattern),
    };
    Ok(match pattern {
        Pattern::ExternalRef { href, ns } => match resolver.resolve(&href) {
            Some(source) => {
                let parsed = parse_external_source(&href, &source)?;
                resolve_external(parsed, Some(resolver))?
            }
            None => Pattern::ExternalRef { href, ns },
        },
        Pattern::Element(nc, body) => Pattern::Element(nc, Box::new(resolve_external(*body, Some(resolver))?)),
        Pattern::Attribute(nc, body) => Pattern::Attribute(nc, Box::new(resolve_external(*body, Some(resolver))?)),
        Pattern::Group(a, b) => Pattern::Group(
            Box::new(resolve_external(*a, Some(resolver))?),
            Box::new(resolve_external(*b, Some(resolver))?),
        ),
        Pattern::Interleave(a, b) => Pattern::Interleave(
            Box::new(resolve_external(*a, Some(resolver))?),
            Box::new(resolve_external(*b, Some(resolver))?),
        ),
        Pattern::Choice(a, b) => Pattern::Choice(
            Box::new(resolve_external(*a, Some(resolver))?),
            Box::new(resolve_external(*b, Some(resolver))?),
        ),
        Pattern::OneOrMore(p) => Pattern::OneOrMore(Box::new(resolve_external(*p, Some(resolver))?)),
        Pattern::ZeroOrMore(p) => Pattern::ZeroOrMore(Box::new(resolve_external(*p, Some(resolver))?)),
        Pattern::Optional(p) => Pattern::Optional(Box::new(resolve_external(*p, Some(resolver))?)),
        Pattern::Mixed(p) => Pattern::Mixed(Box::new(resolve_external(*p, Some(resolver))?)),
        Pattern::List(p) => Pattern::List(Box::new(resolve_external(*p, Some(resolver))?)),
        Pattern::Data { library, type_, params, except } => Pattern::Data {
            library,
            type_,
            params,
            except: except.map(|e| resolve_external(*e, Some(resolver)).map(Box::new)).transpose()?,
        },
        Pattern::Grammar(g) => {
            let Grammar { start, defines, includes } = *g;
            let mut defines = defines
                .into_iter()
                .map(|d| -> Result<Define, RngError> { Ok(Define { body: resolve_external(d.body, Some(resolver))?, ..d }) })
                .collect::<Result<Vec<_>, _>>()?;
            let start = Box::new(resolve_external(*start, Some(resolver))?);
            let mut remaining_includes = Vec::new();
            for include in includes {
                match resolve_included_grammar(&include, resolver)? {
                    Some(included_defines) => {
                        let existing: std::collections::HashSet<_> = defines.iter().map(|d| d.name.clone()).collect();
                        for d in included_defines {
                            if !existing.contains(&d.name) {
                                defines.push(d);
                            }
                        }
                    }
                    None => remaining_includes.push(include),
                }
            }
            Pattern::Grammar(Box::new(Grammar { start, defines, includes: remaining_includes }))
        }
        leaf @ (Pattern::Ref(_)
        | Pattern::ParentRef(_)
        | Pattern::Empty
        | Pattern::Text
        | Pattern::NotAllowed
        | Pattern::Value { .. }) => leaf,
    })
}

fn resolve_included_grammar(include: &Include, resolver: &dyn FileResolver) -> Result<Option<Vec<Define>>, RngError> {
    let source = match resolver.resolve(&include.href) {
        Some(s) => s,
        None => return Ok(None),
    };
    let parsed = parse_external_source(&include.href, &source)?;
    Ok(match parsed {
        Pattern::Grammar(g) => Some(g.defines),
        _ => Some(Vec::new()),
    })
}

fn parse_external_source(href: &str, source: &str) -> Result<Pattern, RngError> {
    if href.ends_with(".rnc") {
        crate::compact::parse(source)
    } else {
        let doc = roxmltree::Document::parse(source)
            .map_err(|e| RngError::UnexpectedToken { position: 0, message: e.to_string() })?;
        let mut reader = xb_xml::RoxmlEventReader::from_root_element(doc.root_element());
        crate::xml_parser::parse(&mut reader)
    }
}

fn simplify_node(pattern: Pattern) -> Result<Pattern, RngError> {
    let pattern = simplify_children(pattern)?;
    rewrite_fixed_point(pattern)
}

fn simplify_children(pattern: Pattern) -> Result<Pattern, RngError> {
    Ok(match pattern {
        Pattern::Element(nc, body) => Pattern::Element(nc, Box::new(simplify_node(*body)?)),
        Pattern::Attribute(nc, body) => Pattern::Attribute(nc, Box::new(simplify_node(*body)?)),
        Pattern::Group(a, b) => Pattern::Group(Box::new(simplify_node(*a)?), Box::new(simplify_node(*b)?)),
        Pattern::Interleave(a, b) => Pattern::Interleave(Box::new(simplify_node(*a)?), Box::new(simplify_node(*b)?)),
        Pattern::Choice(a, b) => Pattern::Choice(Box::new(simplify_node(*a)?), Box::new(simplify_node(*b)?)),
        Pattern::OneOrMore(p) => Pattern::OneOrMore(Box::new(simplify_node(*p)?)),
        Pattern::ZeroOrMore(p) => Pattern::ZeroOrMore(Box::new(simplify_node(*p)?)),
        Pattern::Optional(p) => Pattern::Optional(Box::new(simplify_node(*p)?)),
        Pattern::Mixed(p) => Pattern::Mixed(Box::new(simplify_node(*p)?)),
        Pattern::List(p) => Pattern::List(Box::new(simplify_node(*p)?)),
        Pattern::Data { library, type_, params, except } => Pattern::Data {
            library,
            type_,
            params,
            except: except.map(|e| simplify_node(*e).map(Box::new)).transpose()?,
        },
        Pattern::Grammar(g) => Pattern::Grammar(Box::new(simplify_grammar(*g)?)),
        other => other,
    })
}

/// Rule 5 (combine merging) then rule 6 (unreachable define elimination), applied once the
/// grammar's own define bodies and start pattern are already simplified.
///
/// The normal shape for a combined name is one base define with no `combine` attribute plus one
/// or more defines carrying `combine="choice"`/`"interleave"`: only the attribute-bearing defines
/// need to agree on a method, and the base define simply adopts it. Mixing `choice` and
/// `interleave` for one name is a fatal error; so is leaving more than one define in the group
/// without a `combine` attribute, since then there is no method to adopt at all.
fn simplify_grammar(grammar: Grammar) -> Result<Grammar, RngError> {
    let Grammar { start, defines, includes } = grammar;
    let start = Box::new(simplify_node(*start)?);

    struct Merging {
        define: Define,
        method: Option<Combine>,
        uncombined: usize,
    }

    let mut merged: Vec<Merging> = Vec::new();
    for define in defines {
        if let Some(existing) = merged.iter_mut().find(|m| m.define.name == define.name) {
            match (existing.method, define.combine) {
                (Some(prior), Some(next)) if prior != next => {
                    return Err(RngError::ConflictingCombine(define.name.clone()));
                }
                (Some(_), Some(_)) | (Some(_), None) => {}
                (None, Some(next)) => existing.method = Some(next),
                (None, None) => {}
            }
            if define.combine.is_none() {
                existing.uncombined += 1;
            }
            if existing.uncombined > 1 {
                return Err(RngError::ConflictingCombine(define.name.clone()));
            }
            let method = existing.method.ok_or_else(|| RngError::ConflictingCombine(define.name.clone()))?;
            let prior_body = std::mem::replace(&mut existing.define.body, Pattern::Empty);
            existing.define.body = match method {
                Combine::Choice => Pattern::Choice(Box::new(prior_body), Box::new(define.body)),
                Combine::Interleave => Pattern::Interleave(Box::new(prior_body), Box::new(define.body)),
            };
        } else {
            let uncombined = if define.combine.is_none() { 1 } else { 0 };
            let method = define.combine;
            merged.push(Merging { define, method, uncombined });
        }
    }

    let defines: Vec<Define> = merged.into_iter().map(|m| m.define).collect();
    let grammar = Grammar { start, defines, includes };
    let reachable = grammar.reachable_define_names();
    let defines = grammar.defines.into_iter().filter(|d| reachable.contains(&d.name)).collect();
    Ok(Grammar { start: grammar.start, defines, includes: grammar.includes })
}

/// Applies the notAllowed-propagation and desugaring rules (1-4) at the top of an
/// already-children-simplified node, repeating until none fires. A rule firing can synthesize a
/// brand-new compound node (e.g. rule 3's `choice(oneOrMore(p), empty)`) whose children were
/// never themselves passed through `simplify_node` — re-simplifying through `simplify_node`
/// rather than looping `rewrite_once` alone ensures propagation reaches those freshly produced
/// subtrees too (e.g. `oneOrMore(notAllowed)` inside the synthesized `choice`).
fn rewrite_fixed_point(pattern: Pattern) -> Result<Pattern, RngError> {
    match rewrite_once(pattern)? {
        Rewritten::Changed(p) => simplify_node(p),
        Rewritten::Stable(p) => Ok(p),
    }
}

enum Rewritten {
    Changed(Pattern),
    Stable(Pattern),
}

fn rewrite_once(pattern: Pattern) -> Result<Rewritten, RngError> {
    use Rewritten::*;
    Ok(match pattern {
        Pattern::Mixed(p) => Changed(Pattern::Interleave(p, Box::new(Pattern::Text))),
        Pattern::Optional(p) => Changed(Pattern::Choice(p, Box::new(Pattern::Empty))),
        Pattern::ZeroOrMore(p) => Changed(Pattern::Choice(Box::new(Pattern::OneOrMore(p)), Box::new(Pattern::Empty))),
        Pattern::Group(a, b) => {
            if matches!(*a, Pattern::NotAllowed) || matches!(*b, Pattern::NotAllowed) {
                Changed(Pattern::NotAllowed)
            } else {
                Stable(Pattern::Group(a, b))
            }
        }
        Pattern::Interleave(a, b) => {
            if matches!(*a, Pattern::NotAllowed) || matches!(*b, Pattern::NotAllowed) {
                Changed(Pattern::NotAllowed)
            } else {
                Stable(Pattern::Interleave(a, b))
            }
        }
        Pattern::OneOrMore(p) => {
            if matches!(*p, Pattern::NotAllowed) {
                Changed(Pattern::NotAllowed)
            } else {
                Stable(Pattern::OneOrMore(p))
            }
        }
        Pattern::Choice(a, b) => {
            if matches!(*a, Pattern::NotAllowed) {
                Changed(*b)
            } else if matches!(*b, Pattern::NotAllowed) {
                Changed(*a)
            } else {
                Stable(Pattern::Choice(a, b))
            }
        }
        Pattern::Attribute(nc, body) => {
            if matches!(*body, Pattern::NotAllowed) {
                Changed(Pattern::NotAllowed)
            } else {
                Stable(Pattern::Attribute(nc, body))
            }
        }
        Pattern::List(p) => {
            if matches!(*p, Pattern::NotAllowed) {
                Changed(Pattern::NotAllowed)
            } else {
                Stable(Pattern::List(p))
            }
        }
        // element(nc, notAllowed) is preserved as-is (spec §4.7 rule 4).
        other => Stable(other),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name_class::NameClass;
    use xb_xstypes::QName;

    #[test]
    fn mixed_desugars_to_interleave_with_text() {
        let p = simplify(Pattern::Mixed(Box::new(Pattern::Empty)), None).unwrap();
        match p {
            Pattern::Interleave(a, b) => {
                assert!(matches!(*a, Pattern::Empty));
                assert!(matches!(*b, Pattern::Text));
            }
            other => panic!("expected interleave, got {other:?}"),
        }
    }

    #[test]
    fn optional_desugars_to_choice_with_empty() {
        let p = simplify(Pattern::Optional(Box::new(Pattern::Text)), None).unwrap();
        match p {
            Pattern::Choice(a, b) => {
                assert!(matches!(*a, Pattern::Text));
                assert!(matches!(*b, Pattern::Empty));
            }
            other => panic!("expected choice, got {other:?}"),
        }
    }

    #[test]
    fn zero_or_more_desugars_to_choice_of_one_or_more_and_empty() {
        let p = simplify(Pattern::ZeroOrMore(Box::new(Pattern::Text)), None).unwrap();
        match p {
            Pattern::Choice(a, b) => {
                assert!(matches!(*a, Pattern::OneOrMore(_)));
                assert!(matches!(*b, Pattern::Empty));
            }
            other => panic!("expected choice, got {other:?}"),
        }
    }

    #[test]
    fn group_with_not_allowed_propagates() {
        let p = simplify(Pattern::Group(Box::new(Pattern::NotAllowed), Box::new(Pattern::Text)), None).unwrap();
        assert!(matches!(p, Pattern::NotAllowed));
    }

    #[test]
    fn choice_with_not_allowed_resolves_to_other_branch() {
        let p = simplify(Pattern::Choice(Box::new(Pattern::NotAllowed), Box::new(Pattern::Text)), None).unwrap();
        assert!(matches!(p, Pattern::Text));
    }

    #[test]
    fn zero_or_more_not_allowed_fully_propagates_to_empty() {
        // zeroOrMore(notAllowed) => choice(oneOrMore(notAllowed), empty), then
        // oneOrMore(notAllowed) => notAllowed, then choice(notAllowed, empty) => empty.
        // The synthesized choice/oneOrMore nodes must themselves be re-simplified, not just the
        // original zeroOrMore node.
        let p = simplify(Pattern::ZeroOrMore(Box::new(Pattern::NotAllowed)), None).unwrap();
        assert!(matches!(p, Pattern::Empty));
    }

    #[test]
    fn element_with_not_allowed_body_is_preserved() {
        let nc = NameClass::SpecificName(QName::no_namespace("x"));
        let p = simplify(Pattern::Element(nc, Box::new(Pattern::NotAllowed)), None).unwrap();
        assert!(matches!(p, Pattern::Element(_, _)));
    }

    #[test]
    fn combine_choice_merges_defines_sharing_a_name() {
        let defs = vec![
            Define { name: "inline".into(), body: Pattern::Text, combine: None },
            Define {
                name: "inline".into(),
                body: Pattern::Element(NameClass::SpecificName(QName::no_namespace("code")), Box::new(Pattern::Text)),
                combine: Some(Combine::Choice),
            },
        ];
        let grammar = Pattern::Grammar(Box::new(Grammar { start: Box::new(Pattern::Ref("inline".into())), defines: defs, includes: vec![] }));
        let p = simplify(grammar, None).unwrap();
        match p {
            Pattern::Grammar(g) => {
                assert_eq!(g.defines.len(), 1);
                assert!(matches!(g.defines[0].body, Pattern::Choice(_, _)));
            }
            other => panic!("expected grammar, got {other:?}"),
        }
    }

    #[test]
    fn combine_choice_and_interleave_for_one_name_is_an_error() {
        let defs = vec![
            Define { name: "inline".into(), body: Pattern::Text, combine: Some(Combine::Choice) },
            Define {
                name: "inline".into(),
                body: Pattern::Element(NameClass::SpecificName(QName::no_namespace("code")), Box::new(Pattern::Text)),
                combine: Some(Combine::Interleave),
            },
        ];
        let grammar = Pattern::Grammar(Box::new(Grammar { start: Box::new(Pattern::Ref("inline".into())), defines: defs, includes: vec![] }));
        let err = simplify(grammar, None).unwrap_err();
        assert!(matches!(err, RngError::ConflictingCombine(name) if name == "inline"));
    }

    #[test]
    fn two_defines_sharing_a_name_with_neither_combined_is_an_error() {
        let defs = vec![
            Define { name: "inline".into(), body: Pattern::Text, combine: None },
            Define { name: "inline".into(), body: Pattern::Empty, combine: None },
        ];
        let grammar = Pattern::Grammar(Box::new(Grammar { start: Box::new(Pattern::Ref("inline".into())), defines: defs, includes: vec![] }));
        let err = simplify(grammar, None).unwrap_err();
        assert!(matches!(err, RngError::ConflictingCombine(name) if name == "inline"));
    }

    #[test]
    fn unreachable_defines_are_removed() {
        let defs = vec![
            Define { name: "used".into(), body: Pattern::Text, combine: None },
            Define { name: "unused".into(), body: Pattern::Empty, combine: None },
        ];
        let grammar = Pattern::Grammar(Box::new(Grammar { start: Box::new(Pattern::Ref("used".into())), defines: defs, includes: vec![] }));
        let p = simplify(grammar, None).unwrap();
        match p {
            Pattern::Grammar(g) => {
                assert_eq!(g.defines.len(), 1);
                assert_eq!(g.defines[0].name, "used");
            }
            other => panic!("expected grammar, got {other:?}"),
        }
    }

    #[test]
    fn no_simplified_node_kind_remains_after_simplification() {
        let nested = Pattern::Element(
            NameClass::SpecificName(QName::no_namespace("root")),
            Box::new(Pattern::Mixed(Box::new(Pattern::ZeroOrMore(Box::new(Pattern::Optional(Box::new(Pattern::Text))))))),
        );
        let p = simplify(nested, None).unwrap();
        assert!(!contains_simplifiable(&p));
    }

    fn contains_simplifiable(p: &Pattern) -> bool {
        match p {
            Pattern::Mixed(_) | Pattern::Optional(_) | Pattern::ZeroOrMore(_) => true,
            Pattern::Element(_, body) | Pattern::Attribute(_, body) | Pattern::List(body) | Pattern::OneOrMore(body) => {
                contains_simplifiable(body)
            }
            Pattern::Group(a, b) | Pattern::Interleave(a, b) | Pattern::Choice(a, b) => {
                contains_simplifiable(a) || contains_simplifiable(b)
            }
            _ => false,
        }
    }

    #[test]
    fn absent_resolver_leaves_external_ref_in_place() {
        let p = simplify(Pattern::ExternalRef { href: "other.rng".into(), ns: String::new() }, None).unwrap();
        assert!(matches!(p, Pattern::ExternalRef { .. }));
    }
}
