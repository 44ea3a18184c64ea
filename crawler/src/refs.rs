//! Extracts the external references (import/include/externalRef targets) a fetched schema
//! document names, so the crawler can queue them (spec §4.12). A parse failure here is not
//! fatal to the crawl: the document is still kept in the results, it just contributes no further
//! edges to the BFS (mirrors the original crawler's "keep content, skip transitive deps").

use xb_rng::Pattern;
use xb_xml::RoxmlEventReader;

fn has_extension(url: &str, ext: &str) -> bool {
    url.to_ascii_lowercase().ends_with(ext)
}

/// The schema references named by `content`, fetched from `url`. `url`'s extension picks the
/// frontend: `.rnc` for RELAX NG compact syntax, `.rng` for RELAX NG XML syntax, anything else
/// for XSD.
pub fn extract_refs(url: &str, content: &str) -> Vec<String> {
    if has_extension(url, ".rnc") {
        match xb_rng::compact::parse(content) {
            Ok(pattern) => collect_rng_refs(&pattern),
            Err(_) => Vec::new(),
        }
    } else if has_extension(url, ".rng") {
        match roxmltree::Document::parse(content) {
            Ok(doc) => {
                let mut reader = RoxmlEventReader::from_root_element(doc.root_element());
                match xb_rng::parse_xml(&mut reader) {
                    Ok(pattern) => collect_rng_refs(&pattern),
                    Err(_) => Vec::new(),
                }
            }
            Err(_) => Vec::new(),
        }
    } else {
        match roxmltree::Document::parse(content) {
            Ok(doc) => {
                let mut reader = RoxmlEventReader::from_root_element(doc.root_element());
                match xb_xsd::read_schema(&mut reader) {
                    Ok(schema) => schema
                        .imports
                        .iter()
                        .filter_map(|i| i.schema_location.clone())
                        .chain(schema.includes.iter().map(|i| i.schema_location.clone()))
                        .collect(),
                    Err(_) => Vec::new(),
                }
            }
            Err(_) => Vec::new(),
        }
    }
}

fn collect_rng_refs(pattern: &Pattern) -> Vec<String> {
    let mut refs = Vec::new();
    walk(pattern, &mut refs);
    refs
}

fn walk(pattern: &Pattern, refs: &mut Vec<String>) {
    match pattern {
        Pattern::ExternalRef { href, .. } => {
            if !href.is_empty() {
                refs.push(href.clone());
            }
        }
        Pattern::Grammar(grammar) => {
            walk(&grammar.start, refs);
            for define in &grammar.defines {
                walk(&define.body, refs);
            }
            for include in &grammar.includes {
                if !include.href.is_empty() {
                    refs.push(include.href.clone());
                }
            }
        }
        Pattern::Element(_, body) | Pattern::Attribute(_, body) => walk(body, refs),
        Pattern::Group(a, b) | Pattern::Interleave(a, b) | Pattern::Choice(a, b) => {
            walk(a, refs);
            walk(b, refs);
        }
        Pattern::OneOrMore(p)
        | Pattern::ZeroOrMore(p)
        | Pattern::Optional(p)
        | Pattern::Mixed(p)
        | Pattern::List(p) => walk(p, refs),
        Pattern::Data { except, .. } => {
            if let Some(p) = except {
                walk(p, refs);
            }
        }
        Pattern::Empty | Pattern::Text | Pattern::NotAllowed | Pattern::Value { .. } | Pattern::Ref(_) | Pattern::ParentRef(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_xsd_imports_and_includes() {
        let xml = r#"<schema xmlns="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:a">
              <import namespace="urn:b" schemaLocation="b.xsd"/>
              <include schemaLocation="common.xsd"/>
            </schema>"#;
        let refs = extract_refs("root.xsd", xml);
        assert_eq!(refs, vec!["b.xsd".to_string(), "common.xsd".to_string()]);
    }

    #[test]
    fn extracts_rng_external_ref_and_grammar_include() {
        let xml = r#"<grammar xmlns="http://relaxng.org/ns/structure/1.0">
              <start><externalRef href="other.rng"/></start>
              <include href="shared.rng"/>
            </grammar>"#;
        let refs = extract_refs("root.rng", xml);
        assert_eq!(refs, vec!["other.rng".to_string(), "shared.rng".to_string()]);
    }

    #[test]
    fn unparsable_content_yields_no_refs_but_does_not_panic() {
        assert!(extract_refs("broken.xsd", "not xml at all").is_empty());
    }
}
