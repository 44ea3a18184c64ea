//! The abstract pull-mode XML event stream contract (spec §4.1) consumed by every frontend, and
//! a concrete reader built over `roxmltree`.
//!
//! Every frontend in this workspace (`xb-xsd`, the RELAX NG XML-syntax parser in `xb-rng`) is
//! written against the [`XmlReader`] trait rather than against `roxmltree` directly, so a future
//! streaming reader (or a test double) can be substituted without touching frontend code.

pub mod cursor;
mod escape;
mod reader;

pub use escape::{escape_attribute, escape_text};
pub use reader::RoxmlEventReader;

use xb_xstypes::QName;

/// The kind of the current event. Depth is meaningful for `Start` and `End`; `Text` events
/// report the depth of their enclosing element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeType {
    Start,
    End,
    Text,
}

/// A single attribute on a `Start` event.
pub struct Attribute<'a> {
    pub name: QName,
    pub value: &'a str,
}

/// Pull-mode XML event reader contract (spec §4.1).
///
/// Contract:
/// - adjacent text between structural events is coalesced into a single `Text` event;
/// - entity expansion happens under the reader, never visible to callers;
/// - namespace bindings are resolved so `name()` and attribute names carry fully expanded URIs,
///   never bare prefixes;
/// - depth is 1 at the document root element and increments by one per open tag.
pub trait XmlReader {
    /// Advances to the next event. Returns `false` once the stream is exhausted.
    fn advance(&mut self) -> bool;

    /// The kind of the current event. Undefined before the first `advance()`.
    fn node_type(&self) -> NodeType;

    /// The expanded name of the current `Start`/`End` element.
    fn name(&self) -> QName;

    /// Number of attributes on the current `Start` element.
    fn attribute_count(&self) -> usize;

    /// The name of the `index`-th attribute on the current `Start` element.
    fn attribute_name(&self, index: usize) -> QName;

    /// The value of the `index`-th attribute on the current `Start` element.
    fn attribute_value(&self, index: usize) -> &str;

    /// Looks up an attribute by expanded name on the current `Start` element.
    fn attribute_value_by_name(&self, name: &QName) -> Option<&str> {
        (0..self.attribute_count())
            .find(|&i| self.attribute_name(i) == *name)
            .map(|i| self.attribute_value(i))
    }

    /// The coalesced text payload of the current `Text` event.
    fn text(&self) -> &str;

    /// The nesting depth of the current event; 1 at the document root element.
    fn depth(&self) -> usize;

    /// Resolves a namespace prefix (`None` for the default namespace) to its URI, in scope at
    /// the current `Start` event. Frontends use this to expand `QName`-valued attribute content
    /// (e.g. `type="xs:string"`), which carries unexpanded prefixes even though element and
    /// attribute *names* are already expanded by the reader itself.
    fn resolve_prefix(&self, prefix: Option<&str>) -> Option<String>;
}

#[cfg(test)]
mod mock {
    //! A minimal in-memory `XmlReader` used by consumer crates' tests as a test double,
    //! independent of any concrete XML library.
    use super::*;

    pub struct MockEvent {
        pub node_type: NodeType,
        pub name: QName,
        pub attributes: Vec<(QName, String)>,
        pub text: String,
        pub depth: usize,
    }

    pub struct MockReader {
        events: Vec<MockEvent>,
        position: isize,
    }

    impl MockReader {
        pub fn new(events: Vec<MockEvent>) -> Self {
            Self { events, position: -1 }
        }
    }

    impl XmlReader for MockReader {
        fn advance(&mut self) -> bool {
            self.position += 1;
            (self.position as usize) < self.events.len()
        }

        fn node_type(&self) -> NodeType {
            self.events[self.position as usize].node_type
        }

        fn name(&self) -> QName {
            self.events[self.position as usize].name.clone()
        }

        fn attribute_count(&self) -> usize {
            self.events[self.position as usize].attributes.len()
        }

        fn attribute_name(&self, index: usize) -> QName {
            self.events[self.position as usize].attributes[index].0.clone()
        }

        fn attribute_value(&self, index: usize) -> &str {
            &self.events[self.position as usize].attributes[index].1
        }

        fn text(&self) -> &str {
            &self.events[self.position as usize].text
        }

        fn depth(&self) -> usize {
            self.events[self.position as usize].depth
        }

        fn resolve_prefix(&self, _prefix: Option<&str>) -> Option<String> {
            None
        }
    }

    #[test]
    fn mock_reader_walks_events() {
        let mut reader = MockReader::new(vec![MockEvent {
            node_type: NodeType::Start,
            name: QName::no_namespace("root"),
            attributes: vec![(QName::no_namespace("a"), "1".into())],
            text: String::new(),
            depth: 1,
        }]);
        assert!(reader.advance());
        assert_eq!(reader.node_type(), NodeType::Start);
        assert_eq!(reader.attribute_value_by_name(&QName::no_namespace("a")), Some("1"));
        assert!(!reader.advance());
    }
}
