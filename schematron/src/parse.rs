use xb_xml::cursor::for_each_child;
use xb_xml::{NodeType, XmlReader};
use xb_xstypes::QName;

use crate::error::SchematronError;
use crate::model::{Check, CheckKind, NamespaceBinding, Pattern, Rule, SchematronSchema};

pub const SCHEMATRON_NS: &str = "http://purl.oclc.org/dsdl/schematron";

/// Reads the `<schema>` document open at the reader's current position (not yet advanced) into a
/// [`SchematronSchema`] (spec §4.10).
pub fn read_schematron(reader: &mut dyn XmlReader) -> Result<SchematronSchema, SchematronError> {
    if !reader.advance() || reader.node_type() != NodeType::Start {
        return Err(SchematronError::UnexpectedEof);
    }
    let root = reader.name();
    if root != QName::new(SCHEMATRON_NS, "schema") {
        return Err(SchematronError::UnexpectedRootElement(root));
    }

    let mut schema = SchematronSchema::default();
    let depth = reader.depth();
    for_each_child_checked(reader, depth, |r| parse_schema_child(r, &mut schema))?;
    Ok(schema)
}

fn parse_schema_child(reader: &mut dyn XmlReader, schema: &mut SchematronSchema) -> Result<(), SchematronError> {
    let name = reader.name();
    if name.uri != SCHEMATRON_NS {
        return Ok(());
    }
    match name.local.as_str() {
        "ns" => {
            let prefix = attr(reader, "prefix").unwrap_or_default().to_string();
            let uri = attr(reader, "uri").unwrap_or_default().to_string();
            schema.namespaces.push(NamespaceBinding { prefix, uri });
            Ok(())
        }
        "pattern" => {
            let pattern = parse_pattern(reader)?;
            schema.patterns.push(pattern);
            Ok(())
        }
        _ => Ok(()),
    }
}

fn parse_pattern(reader: &mut dyn XmlReader) -> Result<Pattern, SchematronError> {
    let mut pattern = Pattern::default();
    let depth = reader.depth();
    for_each_child_checked(reader, depth, |r| {
        let name = r.name();
        if name.uri == SCHEMATRON_NS && name.local == "rule" {
            pattern.rules.push(parse_rule(r)?);
        }
        Ok(())
    })?;
    Ok(pattern)
}

fn parse_rule(reader: &mut dyn XmlReader) -> Result<Rule, SchematronError> {
    let context = attr(reader, "context").ok_or(SchematronError::MissingContext)?.to_string();
    let mut checks = Vec::new();
    let depth = reader.depth();
    for_each_child_checked(reader, depth, |r| {
        let name = r.name();
        if name.uri != SCHEMATRON_NS {
            return Ok(());
        }
        let kind = match name.local.as_str() {
            "assert" => CheckKind::Assert,
            "report" => CheckKind::Report,
            _ => return Ok(()),
        };
        let test = attr(r, "test")
            .ok_or(SchematronError::MissingTest(if kind == CheckKind::Assert { "assert" } else { "report" }))?
            .to_string();
        checks.push(Check { kind, test });
        Ok(())
    })?;
    Ok(Rule { context, checks })
}

fn attr<'a>(reader: &'a dyn XmlReader, name: &str) -> Option<&'a str> {
    reader.attribute_value_by_name(&QName::no_namespace(name))
}

fn for_each_child_checked(
    reader: &mut dyn XmlReader,
    depth: usize,
    mut f: impl FnMut(&mut dyn XmlReader) -> Result<(), SchematronError>,
) -> Result<(), SchematronError> {
    let mut error = None;
    for_each_child(reader, depth, |r| {
        if error.is_some() {
            return;
        }
        if let Err(e) = f(r) {
            error = Some(e);
        }
    });
    match error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xb_xml::RoxmlEventReader;

    fn schema_from(xml: &str) -> SchematronSchema {
        let doc = roxmltree::Document::parse(xml).unwrap();
        let mut reader = RoxmlEventReader::from_root_element(doc.root_element());
        read_schematron(&mut reader).unwrap()
    }

    #[test]
    fn parses_a_rule_with_an_assert() {
        let schema = schema_from(
            r#"<schema xmlns="http://purl.oclc.org/dsdl/schematron">
                 <pattern>
                   <rule context="invoice">
                     <assert test="total &gt; 0">total must be positive</assert>
                   </rule>
                 </pattern>
               </schema>"#,
        );
        assert_eq!(schema.patterns.len(), 1);
        let rule = &schema.patterns[0].rules[0];
        assert_eq!(rule.context, "invoice");
        assert_eq!(rule.checks[0].kind, CheckKind::Assert);
        assert_eq!(rule.checks[0].test, "total > 0");
    }

    #[test]
    fn parses_namespace_bindings() {
        let schema = schema_from(
            r#"<schema xmlns="http://purl.oclc.org/dsdl/schematron">
                 <ns prefix="inv" uri="urn:invoice"/>
               </schema>"#,
        );
        assert_eq!(schema.resolve_prefix("inv"), Some("urn:invoice"));
    }

    #[test]
    fn missing_context_is_an_error() {
        let doc = roxmltree::Document::parse(
            r#"<schema xmlns="http://purl.oclc.org/dsdl/schematron">
                 <pattern><rule><assert test="1">x</assert></rule></pattern>
               </schema>"#,
        )
        .unwrap();
        let mut reader = RoxmlEventReader::from_root_element(doc.root_element());
        assert!(matches!(read_schematron(&mut reader), Err(SchematronError::MissingContext)));
    }
}
