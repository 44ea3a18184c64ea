//! The RELAX NG XML-syntax frontend (spec §4.6): an event-driven walker over an
//! [`xb_xml::XmlReader`] that recognizes the RELAX NG namespace and builds the pattern tree of
//! [`crate::pattern`].
//!
//! Attributes `name`, `ns`, `datatypeLibrary` and `combine` are honored; name-class elements
//! (`anyName`, `nsName`, `name`, `choice`, `except`) are recognized and nested, same as the
//! pattern-level `choice`/`except` they share a tag name with — which one applies is decided by
//! context, exactly as it is in the concrete grammar (spec §4.6).

use xb_xml::cursor::{for_each_child, text_content};
use xb_xml::{NodeType, XmlReader};

use crate::error::RngError;
use crate::name_class::NameClass;
use crate::pattern::{Combine, Define, Grammar, Include, Param, Pattern};

pub const RNG_NS: &str = "http://relaxng.org/ns/structure/1.0";

/// Parses the pattern document open at the reader's current position (not yet advanced).
pub fn parse(reader: &mut dyn XmlReader) -> Result<Pattern, RngError> {
    if !reader.advance() || reader.node_type() != NodeType::Start {
        return Err(RngError::UnexpectedEof);
    }
    parse_pattern_element(reader)
}

fn local(reader: &dyn XmlReader) -> String {
    reader.name().local.clone()
}

fn attr<'a>(reader: &'a dyn XmlReader, name: &str) -> Option<&'a str> {
    reader.attribute_value_by_name(&xb_xstypes::QName::no_namespace(name))
}

/// Parses a single pattern element (the reader positioned at its `Start` event) into a
/// [`Pattern`], consuming the whole subtree.
fn parse_pattern_element(reader: &mut dyn XmlReader) -> Result<Pattern, RngError> {
    let name = local(reader);
    let depth = reader.depth();
    match name.as_str() {
        "element" => {
            let nc = parse_element_or_attribute_name_class(reader, depth)?;
            let body = parse_child_pattern_sequence(reader, depth)?;
            Ok(Pattern::Element(nc, Box::new(body)))
        }
        "attribute" => {
            let nc = parse_element_or_attribute_name_class(reader, depth)?;
            let body = parse_child_pattern_sequence(reader, depth)?;
            Ok(Pattern::Attribute(nc, Box::new(body)))
        }
        "group" => fold_group(parse_children_patterns(reader, depth)?, Pattern::Group),
        "interleave" => fold_group(parse_children_patterns(reader, depth)?, Pattern::Interleave),
        "choice" => fold_group(parse_children_patterns(reader, depth)?, Pattern::Choice),
        "oneOrMore" => Ok(Pattern::OneOrMore(Box::new(parse_child_pattern_sequence(reader, depth)?))),
        "zeroOrMore" => Ok(Pattern::ZeroOrMore(Box::new(parse_child_pattern_sequence(reader, depth)?))),
        "optional" => Ok(Pattern::Optional(Box::new(parse_child_pattern_sequence(reader, depth)?))),
        "mixed" => Ok(Pattern::Mixed(Box::new(parse_child_pattern_sequence(reader, depth)?))),
        "ref" => {
            let n = attr(reader, "name")
                .ok_or(RngError::MissingAttribute { element: "ref", attribute: "name" })?
                .to_string();
            skip_rest(reader, depth);
            Ok(Pattern::Ref(n))
        }
        "parentRef" => {
            let n = attr(reader, "name")
                .ok_or(RngError::MissingAttribute { element: "parentRef", attribute: "name" })?
                .to_string();
            skip_rest(reader, depth);
            Ok(Pattern::ParentRef(n))
        }
        "empty" => {
            skip_rest(reader, depth);
            Ok(Pattern::Empty)
        }
        "text" => {
            skip_rest(reader, depth);
            Ok(Pattern::Text)
        }
        "notAllowed" => {
            skip_rest(reader, depth);
            Ok(Pattern::NotAllowed)
        }
        "data" => parse_data(reader, depth),
        "value" => parse_value(reader, depth),
        "list" => Ok(Pattern::List(Box::new(parse_child_pattern_sequence(reader, depth)?))),
        "externalRef" => {
            let href = attr(reader, "href")
                .ok_or(RngError::MissingAttribute { element: "externalRef", attribute: "href" })?
                .to_string();
            let ns = attr(reader, "ns").unwrap_or_default().to_string();
            skip_rest(reader, depth);
            Ok(Pattern::ExternalRef { href, ns })
        }
        "grammar" => parse_grammar(reader, depth),
        other => Err(RngError::UnknownElement(other.to_string())),
    }
}

fn skip_rest(reader: &mut dyn XmlReader, depth: usize) {
    for_each_child(reader, depth, |_| {});
}

/// Parses every direct child pattern element, ignoring `name`-class-only or annotation content.
fn parse_children_patterns(reader: &mut dyn XmlReader, depth: usize) -> Result<Vec<Pattern>, RngError> {
    let mut patterns = Vec::new();
    let mut error = None;
    for_each_child(reader, depth, |r| {
        if error.is_some() {
            return;
        }
        match parse_pattern_element(r) {
            Ok(p) => patterns.push(p),
            Err(e) => error = Some(e),
        }
    });
    match error {
        Some(e) => Err(e),
        None => Ok(patterns),
    }
}

/// A container with exactly one pattern child expected (`oneOrMore`, `zeroOrMore`, `optional`,
/// `mixed`, `list`, `element`/`attribute` bodies): multiple children implicitly group, per the
/// RELAX NG XML syntax's "two or more patterns are grouped" rule.
fn parse_child_pattern_sequence(reader: &mut dyn XmlReader, depth: usize) -> Result<Pattern, RngError> {
    let children = parse_children_patterns(reader, depth)?;
    fold_group(children, Pattern::Group)
}

fn fold_group(mut patterns: Vec<Pattern>, combine: impl Fn(Box<Pattern>, Box<Pattern>) -> Pattern) -> Result<Pattern, RngError> {
    if patterns.is_empty() {
        return Ok(Pattern::Empty);
    }
    let mut result = patterns.remove(0);
    for next in patterns {
        result = combine(Box::new(result), Box::new(next));
    }
    Ok(result)
}

fn parse_data(reader: &mut dyn XmlReader, depth: usize) -> Result<Pattern, RngError> {
    let library = attr(reader, "datatypeLibrary").unwrap_or_default().to_string();
    let type_ = attr(reader, "type").unwrap_or("string").to_string();
    let mut params = Vec::new();
    let mut except = None;
    let mut error = None;
    for_each_child(reader, depth, |r| {
        if error.is_some() {
            return;
        }
        match local(r).as_str() {
            "param" => {
                let name = attr(r, "name").unwrap_or_default().to_string();
                let child_depth = r.depth();
                let value = text_content(r, child_depth);
                params.push(Param { name, value });
            }
            "except" => match parse_child_pattern_sequence(r, r.depth()) {
                Ok(p) => except = Some(Box::new(p)),
                Err(e) => error = Some(e),
            },
            _ => {}
        }
    });
    if let Some(e) = error {
        return Err(e);
    }
    Ok(Pattern::Data { library, type_, params, except })
}

fn parse_value(reader: &mut dyn XmlReader, depth: usize) -> Result<Pattern, RngError> {
    let library = attr(reader, "datatypeLibrary").unwrap_or_default().to_string();
    let type_ = attr(reader, "type").unwrap_or("token").to_string();
    let ns = attr(reader, "ns").unwrap_or_default().to_string();
    let content = text_content(reader, depth);
    Ok(Pattern::Value { ns, library, type_, content })
}

/// `<element>`/`<attribute>`'s name class: either a `name` attribute directly, or a nested
/// name-class element child (spec §3.3, §4.6).
fn parse_element_or_attribute_name_class(reader: &mut dyn XmlReader, depth: usize) -> Result<NameClass, RngError> {
    if let Some(n) = attr(reader, "name") {
        let ns = attr(reader, "ns").unwrap_or_default().to_string();
        return Ok(NameClass::SpecificName(xb_xstypes::QName::new(ns, n.to_string())));
    }
    let mut nc = None;
    let mut error = None;
    for_each_child(reader, depth, |r| {
        if nc.is_some() || error.is_some() {
            return;
        }
        match parse_name_class_element(r) {
            Ok(Some(parsed)) => nc = Some(parsed),
            Ok(None) => {}
            Err(e) => error = Some(e),
        }
    });
    if let Some(e) = error {
        return Err(e);
    }
    nc.ok_or(RngError::MissingAttribute { element: "element", attribute: "name" })
}

/// Parses a name-class element (`name`, `anyName`, `nsName`, `choice`). Returns `Ok(None)` for a
/// non-name-class child (e.g. a pattern element encountered where only a name class was
/// expected) so callers can skip over it without failing.
fn parse_name_class_element(reader: &mut dyn XmlReader) -> Result<Option<NameClass>, RngError> {
    let depth = reader.depth();
    match local(reader).as_str() {
        "name" => {
            let ns = attr(reader, "ns").unwrap_or_default().to_string();
            let local_name = text_content(reader, depth);
            Ok(Some(NameClass::SpecificName(xb_xstypes::QName::new(ns, local_name.trim().to_string()))))
        }
        "anyName" => {
            let except = parse_name_class_except(reader, depth)?;
            Ok(Some(NameClass::AnyName(except)))
        }
        "nsName" => {
            let ns = attr(reader, "ns").unwrap_or_default().to_string();
            let except = parse_name_class_except(reader, depth)?;
            Ok(Some(NameClass::NsName(ns, except)))
        }
        "choice" => {
            let mut classes = Vec::new();
            let mut error = None;
            for_each_child(reader, depth, |r| {
                if error.is_some() {
                    return;
                }
                match parse_name_class_element(r) {
                    Ok(Some(nc)) => classes.push(nc),
                    Ok(None) => {}
                    Err(e) => error = Some(e),
                }
            });
            if let Some(e) = error {
                return Err(e);
            }
            let mut iter = classes.into_iter();
            let first = iter.next().ok_or(RngError::EmptyContent { element: "choice" })?;
            Ok(Some(iter.fold(first, |acc, next| NameClass::Choice(Box::new(acc), Box::new(next)))))
        }
        _ => Ok(None),
    }
}

fn parse_name_class_except(reader: &mut dyn XmlReader, depth: usize) -> Result<Option<Box<NameClass>>, RngError> {
    let mut except = None;
    let mut error = None;
    for_each_child(reader, depth, |r| {
        if local(r) != "except" || except.is_some() || error.is_some() {
            return;
        }
        let except_depth = r.depth();
        let mut inner = None;
        for_each_child(r, except_depth, |rr| {
            if inner.is_some() {
                return;
            }
            match parse_name_class_element(rr) {
                Ok(Some(nc)) => inner = Some(nc),
                Ok(None) => {}
                Err(e) => error = Some(e),
            }
        });
        except = inner.map(Box::new);
    });
    if let Some(e) = error {
        return Err(e);
    }
    Ok(except)
}

fn parse_grammar(reader: &mut dyn XmlReader, depth: usize) -> Result<Pattern, RngError> {
    let mut start = None;
    let mut defines = Vec::new();
    let mut includes = Vec::new();
    let mut error = None;
    for_each_child(reader, depth, |r| {
        if error.is_some() {
            return;
        }
        match local(r).as_str() {
            "start" => {
                let combine = parse_combine_attr(r);
                match parse_child_pattern_sequence(r, r.depth()) {
                    Ok(p) => {
                        start = Some(match (&start, combine) {
                            (Some(_), Some(Combine::Choice)) | (None, _) => p,
                            (Some(prev), Some(Combine::Interleave)) => {
                                Pattern::Interleave(Box::new(prev.clone()), Box::new(p))
                            }
                            (Some(prev), None) => Pattern::Choice(Box::new(prev.clone()), Box::new(p)),
                        });
                    }
                    Err(e) => error = Some(e),
                }
            }
            "define" => {
                let name = match attr(r, "name") {
                    Some(n) => n.to_string(),
                    None => {
                        error = Some(RngError::MissingAttribute { element: "define", attribute: "name" });
                        return;
                    }
                };
                let combine = parse_combine_attr(r);
                match parse_child_pattern_sequence(r, r.depth()) {
                    Ok(body) => defines.push(Define { name, body, combine }),
                    Err(e) => error = Some(e),
                }
            }
            "include" => {
                if let Some(href) = attr(r, "href") {
                    includes.push(Include { href: href.to_string() });
                }
                skip_rest(r, r.depth());
            }
            _ => {}
        }
    });
    if let Some(e) = error {
        return Err(e);
    }
    let start = start.ok_or(RngError::EmptyContent { element: "grammar" })?;
    Ok(Pattern::Grammar(Box::new(Grammar { start: Box::new(start), defines, includes })))
}

fn parse_combine_attr(reader: &dyn XmlReader) -> Option<Combine> {
    match attr(reader, "combine") {
        Some("choice") => Some(Combine::Choice),
        Some("interleave") => Some(Combine::Interleave),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xb_xml::RoxmlEventReader;

    fn parse_str(xml: &str) -> Pattern {
        let doc = roxmltree::Document::parse(xml).unwrap();
        let mut reader = RoxmlEventReader::from_root_element(doc.root_element());
        parse(&mut reader).unwrap()
    }

    #[test]
    fn element_with_text_content() {
        let p = parse_str(
            r#"<element name="card" xmlns="http://relaxng.org/ns/structure/1.0"><text/></element>"#,
        );
        match p {
            Pattern::Element(nc, body) => {
                assert_eq!(nc.as_specific(), Some(&xb_xstypes::QName::no_namespace("card")));
                assert!(matches!(*body, Pattern::Text));
            }
            other => panic!("expected element pattern, got {other:?}"),
        }
    }

    #[test]
    fn grammar_with_one_define() {
        let p = parse_str(
            r#"<grammar xmlns="http://relaxng.org/ns/structure/1.0">
                 <start><ref name="card"/></start>
                 <define name="card"><element name="name"><text/></element></define>
               </grammar>"#,
        );
        match p {
            Pattern::Grammar(g) => {
                assert_eq!(g.defines.len(), 1);
                assert_eq!(g.defines[0].name, "card");
                assert!(matches!(*g.start, Pattern::Ref(ref n) if n == "card"));
            }
            other => panic!("expected grammar pattern, got {other:?}"),
        }
    }

    #[test]
    fn choice_name_class_on_attribute() {
        let p = parse_str(
            r#"<attribute xmlns="http://relaxng.org/ns/structure/1.0">
                 <choice><name>a</name><name>b</name></choice>
                 <text/>
               </attribute>"#,
        );
        match p {
            Pattern::Attribute(NameClass::Choice(a, b), _) => {
                assert_eq!(a.as_specific(), Some(&xb_xstypes::QName::no_namespace("a")));
                assert_eq!(b.as_specific(), Some(&xb_xstypes::QName::no_namespace("b")));
            }
            other => panic!("expected attribute with choice name class, got {other:?}"),
        }
    }
}
