use xb_im::SchemaSet;
use xb_xstypes::QName;

use crate::model::{CheckKind, SchematronSchema};

/// Result of applying a [`SchematronSchema`] to a schema set (spec §4.10).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub matched: u32,
    pub unmatched: u32,
    pub warnings: Vec<String>,
}

/// Attaches each rule's checks as `assertion` strings on the complex type backing its context
/// element. A context is rejected outright (`/`, `[`, `::`) or simply not found; either way it is
/// never fatal — it just adds to `unmatched` and records a warning (spec §7).
pub fn apply_overlay(set: &mut SchemaSet, schematron: &SchematronSchema) -> Outcome {
    let mut outcome = Outcome::default();

    for pattern in &schematron.patterns {
        for rule in &pattern.rules {
            match resolve_context(&rule.context, schematron) {
                Some(name) => {
                    if attach(set, &name, rule) {
                        outcome.matched += 1;
                    } else {
                        outcome.unmatched += 1;
                        outcome.warnings.push(format!("context {:?} does not name a known element with a complex type", rule.context));
                    }
                }
                None => {
                    outcome.unmatched += 1;
                    outcome.warnings.push(format!("unsupported or unresolved context {:?}", rule.context));
                }
            }
        }
    }

    outcome
}

/// Resolves a simple element-name context to a `QName`, rejecting anything beyond a bare
/// (optionally prefixed) name: a path step (`/`), a predicate (`[`), or an axis (`::`).
fn resolve_context(context: &str, schematron: &SchematronSchema) -> Option<QName> {
    if context.contains('/') || context.contains('[') || context.contains("::") {
        return None;
    }
    match context.split_once(':') {
        Some((prefix, local)) => schematron.resolve_prefix(prefix).map(|ns| QName::new(ns, local)),
        None => Some(QName::no_namespace(context)),
    }
}

fn attach(set: &mut SchemaSet, element_name: &QName, rule: &crate::model::Rule) -> bool {
    let Some(type_name) = set.find_element(element_name).map(|e| e.type_.clone()) else {
        return false;
    };
    for schema in set.schemas_mut() {
        if let Some(ct) = schema.complex_types.iter_mut().find(|ct| ct.name == type_name) {
            for check in &rule.checks {
                let test = match check.kind {
                    CheckKind::Assert => check.test.clone(),
                    CheckKind::Report => format!("not({})", check.test),
                };
                ct.assertions.push(test);
            }
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use xb_im::{ComplexType, ContentType, ElementDeclaration, Schema};

    fn schema_with_invoice() -> SchemaSet {
        let mut schema = Schema::new("");
        schema.elements.push(ElementDeclaration {
            name: QName::no_namespace("invoice"),
            type_: QName::no_namespace("invoiceType"),
            nillable: false,
            abstract_: false,
            default: None,
            fixed: None,
            substitution_group: None,
            type_alternatives: vec![],
        });
        schema.complex_types.push(ComplexType {
            name: QName::no_namespace("invoiceType"),
            abstract_: false,
            mixed: false,
            content: ContentType::Empty,
            attributes: vec![],
            attribute_group_refs: vec![],
            attribute_wildcard: None,
            assertions: vec![],
        });
        let mut set = SchemaSet::new();
        set.push(schema);
        set
    }

    #[test]
    fn assert_is_attached_as_is() {
        let mut set = schema_with_invoice();
        let schematron = SchematronSchema {
            namespaces: vec![],
            patterns: vec![crate::model::Pattern {
                rules: vec![crate::model::Rule {
                    context: "invoice".into(),
                    checks: vec![crate::model::Check { kind: CheckKind::Assert, test: "total > 0".into() }],
                }],
            }],
        };
        let outcome = apply_overlay(&mut set, &schematron);
        assert_eq!(outcome.matched, 1);
        assert_eq!(outcome.unmatched, 0);
        let ct = set.find_complex_type(&QName::no_namespace("invoiceType")).unwrap();
        assert_eq!(ct.assertions, vec!["total > 0".to_string()]);
    }

    #[test]
    fn report_is_negated() {
        let mut set = schema_with_invoice();
        let schematron = SchematronSchema {
            namespaces: vec![],
            patterns: vec![crate::model::Pattern {
                rules: vec![crate::model::Rule {
                    context: "invoice".into(),
                    checks: vec![crate::model::Check { kind: CheckKind::Report, test: "total <= 0".into() }],
                }],
            }],
        };
        apply_overlay(&mut set, &schematron);
        let ct = set.find_complex_type(&QName::no_namespace("invoiceType")).unwrap();
        assert_eq!(ct.assertions, vec!["not(total <= 0)".to_string()]);
    }

    #[test]
    fn unmatched_context_is_warned_not_fatal() {
        let mut set = schema_with_invoice();
        let schematron = SchematronSchema {
            namespaces: vec![],
            patterns: vec![crate::model::Pattern {
                rules: vec![crate::model::Rule {
                    context: "nonexistent".into(),
                    checks: vec![crate::model::Check { kind: CheckKind::Assert, test: "1 = 1".into() }],
                }],
            }],
        };
        let outcome = apply_overlay(&mut set, &schematron);
        assert_eq!(outcome.matched, 0);
        assert_eq!(outcome.unmatched, 1);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn path_context_is_rejected_as_unsupported() {
        let mut set = schema_with_invoice();
        let schematron = SchematronSchema {
            namespaces: vec![],
            patterns: vec![crate::model::Pattern {
                rules: vec![crate::model::Rule {
                    context: "invoice/line".into(),
                    checks: vec![crate::model::Check { kind: CheckKind::Assert, test: "1 = 1".into() }],
                }],
            }],
        };
        let outcome = apply_overlay(&mut set, &schematron);
        assert_eq!(outcome.unmatched, 1);
    }
}
