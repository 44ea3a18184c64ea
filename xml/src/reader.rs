use xb_xstypes::QName;

use crate::{NodeType, XmlReader};

enum Event<'a> {
    Start { name: QName, attributes: Vec<(QName, String)>, node: roxmltree::Node<'a, 'a> },
    End { name: QName },
    Text { content: String },
}

/// An [`XmlReader`] built over a parsed `roxmltree::Document`.
///
/// `roxmltree` already resolves namespace prefixes to expanded URIs and performs entity
/// expansion while building its tree, so satisfying the §4.1 contract is a matter of flattening
/// that tree into a depth-first event list with adjacent text runs coalesced. The original
/// `roxmltree::Node` is kept alongside each `Start` event so `resolve_prefix` can still answer
/// prefix lookups for `QName`-valued attribute content (e.g. `type="xs:string"`).
pub struct RoxmlEventReader<'a> {
    events: Vec<Event<'a>>,
    depths: Vec<usize>,
    position: isize,
}

impl<'a> RoxmlEventReader<'a> {
    pub fn from_root_element(root: roxmltree::Node<'a, 'a>) -> Self {
        let mut events = Vec::new();
        let mut depths = Vec::new();
        Self::walk(root, 1, &mut events, &mut depths);
        Self { events, depths, position: -1 }
    }

    fn walk(node: roxmltree::Node<'a, 'a>, depth: usize, events: &mut Vec<Event<'a>>, depths: &mut Vec<usize>) {
        let name = expanded_name(node);
        let attributes = node
            .attributes()
            .map(|a| (expanded_attribute_name(a), a.value().to_string()))
            .collect();
        events.push(Event::Start { name: name.clone(), attributes, node });
        depths.push(depth);

        let mut pending_text = String::new();
        let flush_text = |pending: &mut String, events: &mut Vec<Event<'a>>, depths: &mut Vec<usize>| {
            if !pending.is_empty() {
                events.push(Event::Text { content: std::mem::take(pending) });
                depths.push(depth);
            }
        };
        for child in node.children() {
            if child.is_element() {
                flush_text(&mut pending_text, events, depths);
                Self::walk(child, depth + 1, events, depths);
            } else if child.is_text() {
                if let Some(text) = child.text() {
                    pending_text.push_str(text);
                }
            }
            // Comments and processing instructions are skipped: not part of the §4.1 contract.
        }
        flush_text(&mut pending_text, events, depths);

        events.push(Event::End { name });
        depths.push(depth);
    }
}

fn expanded_name(node: roxmltree::Node) -> QName {
    let tag = node.tag_name();
    QName::new(tag.namespace().unwrap_or("").to_string(), tag.name().to_string())
}

fn expanded_attribute_name(attr: roxmltree::Attribute) -> QName {
    QName::new(attr.namespace().unwrap_or("").to_string(), attr.name().to_string())
}

impl<'a> XmlReader for RoxmlEventReader<'a> {
    fn advance(&mut self) -> bool {
        self.position += 1;
        (self.position as usize) < self.events.len()
    }

    fn node_type(&self) -> NodeType {
        match &self.events[self.position as usize] {
            Event::Start { .. } => NodeType::Start,
            Event::End { .. } => NodeType::End,
            Event::Text { .. } => NodeType::Text,
        }
    }

    fn name(&self) -> QName {
        match &self.events[self.position as usize] {
            Event::Start { name, .. } | Event::End { name } => name.clone(),
            Event::Text { .. } => QName::no_namespace(""),
        }
    }

    fn attribute_count(&self) -> usize {
        match &self.events[self.position as usize] {
            Event::Start { attributes, .. } => attributes.len(),
            _ => 0,
        }
    }

    fn attribute_name(&self, index: usize) -> QName {
        match &self.events[self.position as usize] {
            Event::Start { attributes, .. } => attributes[index].0.clone(),
            _ => panic!("attribute_name called on a non-Start event"),
        }
    }

    fn attribute_value(&self, index: usize) -> &str {
        match &self.events[self.position as usize] {
            Event::Start { attributes, .. } => &attributes[index].1,
            _ => panic!("attribute_value called on a non-Start event"),
        }
    }

    fn text(&self) -> &str {
        match &self.events[self.position as usize] {
            Event::Text { content } => content,
            _ => panic!("text called on a non-Text event"),
        }
    }

    fn depth(&self) -> usize {
        self.depths[self.position as usize]
    }

    fn resolve_prefix(&self, prefix: Option<&str>) -> Option<String> {
        match &self.events[self.position as usize] {
            Event::Start { node, .. } => node.lookup_namespace_uri(prefix).map(str::to_string),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coalesces_adjacent_text_and_tracks_depth() {
        let doc = roxmltree::Document::parse("<root><a>hello<!--c--> world</a></root>").unwrap();
        let mut reader = RoxmlEventReader::from_root_element(doc.root_element());

        assert!(reader.advance());
        assert_eq!(reader.node_type(), NodeType::Start);
        assert_eq!(reader.depth(), 1);

        assert!(reader.advance());
        assert_eq!(reader.node_type(), NodeType::Start);
        assert_eq!(reader.depth(), 2);

        assert!(reader.advance());
        assert_eq!(reader.node_type(), NodeType::Text);
        assert_eq!(reader.text(), "hello world");

        assert!(reader.advance());
        assert_eq!(reader.node_type(), NodeType::End);
        assert_eq!(reader.depth(), 2);

        assert!(reader.advance());
        assert_eq!(reader.node_type(), NodeType::End);
        assert_eq!(reader.depth(), 1);

        assert!(!reader.advance());
    }

    #[test]
    fn resolves_namespace_uris() {
        let doc = roxmltree::Document::parse(
            r#"<root xmlns="urn:example"><child/></root>"#,
        )
        .unwrap();
        let mut reader = RoxmlEventReader::from_root_element(doc.root_element());
        reader.advance();
        assert_eq!(reader.name(), QName::new("urn:example", "root"));
    }

    #[test]
    fn resolves_prefix_in_scope() {
        let doc = roxmltree::Document::parse(
            r#"<root xmlns:xs="http://www.w3.org/2001/XMLSchema"><child/></root>"#,
        )
        .unwrap();
        let mut reader = RoxmlEventReader::from_root_element(doc.root_element());
        reader.advance();
        assert_eq!(
            reader.resolve_prefix(Some("xs")),
            Some("http://www.w3.org/2001/XMLSchema".to_string())
        );
    }
}
