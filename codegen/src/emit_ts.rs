//! Renders the [`ist`](crate::ist) tree to TypeScript source (spec.md's codegen module is
//! generalized in SPEC_FULL.md §1 to the teacher's own `generator-rust`/`generator-typescript`
//! target split). `lower` already resolved every field and alias to a Rust type name through the
//! active `TypeMap`; this emitter translates that name to its TypeScript counterpart through
//! [`ts_type_name`] rather than re-lowering from the schema set a second time.

use crate::ist::{EnumType, Field, Module, RecordType, Type};

pub fn emit_module(module: &Module) -> String {
    let mut out = String::new();

    for ty in &module.types {
        if let Type::Enum(enum_type) = ty {
            emit_enum(enum_type, &mut out);
            emit_enum_conversions(enum_type, &mut out);
        }
    }
    for ty in &module.types {
        if let Type::Alias(alias) = ty {
            out.push_str(&format!("export type {} = {};\n\n", alias.name, ts_type_name(&alias.target)));
        }
    }
    for ty in &module.types {
        if let Type::Record(record) = ty {
            emit_record(record, &mut out);
        }
    }

    for element in &module.elements {
        out.push_str(&format!(
            "export function parse{0}(reader: XmlReader): {1} {{\n  throw new Error(\"not implemented\");\n}}\n\n",
            to_pascal(&element.element_name),
            element.type_name,
        ));
        out.push_str(&format!(
            "export function serialize{0}(value: {1}, writer: XmlWriter): void {{\n  throw new Error(\"not implemented\");\n}}\n\n",
            to_pascal(&element.element_name),
            element.type_name,
        ));
    }

    out
}

fn emit_enum(enum_type: &EnumType, out: &mut String) {
    out.push_str(&format!("export enum {} {{\n", enum_type.name));
    for variant in &enum_type.variants {
        out.push_str(&format!("  {} = {:?},\n", variant.name, variant.xml_value));
    }
    out.push_str("}\n\n");
}

/// The to/from XML-lexical-value conversion pair (spec §4.13); an unrecognized lexical value
/// throws rather than returning a sentinel.
fn emit_enum_conversions(enum_type: &EnumType, out: &mut String) {
    let name = &enum_type.name;
    out.push_str(&format!("export function {}ToXmlValue(value: {name}): string {{\n  return value;\n}}\n\n", to_camel(name)));

    out.push_str(&format!("export function {}FromXmlValue(value: string): {name} {{\n  switch (value) {{\n", to_camel(name)));
    for variant in &enum_type.variants {
        out.push_str(&format!("    case {:?}: return {name}.{};\n", variant.xml_value, variant.name));
    }
    out.push_str(&format!(
        "    default: throw new Error(`unknown enumeration value ${{JSON.stringify(value)}} for {name}`);\n  }}\n}}\n\n"
    ));
}

fn emit_record(record: &RecordType, out: &mut String) {
    out.push_str(&format!("export interface {} {{\n", record.name));
    for field in &record.fields {
        out.push_str(&format!("  {};\n", emit_field(field)));
    }
    out.push_str("}\n\n");
}

fn emit_field(field: &Field) -> String {
    let base = ts_type_name(&field.type_expr);
    let ty = if field.repeating { format!("{base}[]") } else { base };
    let optional_marker = if field.optional { "?" } else { "" };
    format!("{}{optional_marker}: {ty}", field.name)
}

/// Translates an already-resolved Rust target type name to its TypeScript counterpart. Anything
/// not recognized (a generated enum/alias/record name, which never contains `::`) passes
/// through unchanged.
fn ts_type_name(rust_type: &str) -> String {
    match rust_type {
        "String" => "string".to_string(),
        "bool" => "boolean".to_string(),
        "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "u64" | "f32" | "f64" => "number".to_string(),
        "Vec<u8>" => "Uint8Array".to_string(),
        "Vec<String>" => "string[]".to_string(),
        "xb_xstypes::BigInt" | "xb_xstypes::BigDecimal" => "string".to_string(),
        "xb_xstypes::Date"
        | "xb_xstypes::Time"
        | "xb_xstypes::DateTime"
        | "xb_xstypes::Duration"
        | "xb_xstypes::DayTimeDuration"
        | "xb_xstypes::YearMonthDuration" => "string".to_string(),
        "xb_xstypes::QName" => "{ uri: string; local: string }".to_string(),
        other => other.to_string(),
    }
}

fn to_pascal(snake: &str) -> String {
    use heck::ToUpperCamelCase;
    snake.to_upper_camel_case()
}

fn to_camel(pascal: &str) -> String {
    use heck::ToLowerCamelCase;
    pascal.to_lower_camel_case()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ist::{AliasType, ElementBinding, EnumVariant};

    #[test]
    fn emits_an_enum_with_string_literal_variants_and_conversions() {
        let module = Module {
            namespace_path: "schema".into(),
            types: vec![Type::Enum(EnumType {
                name: "Side".into(),
                variants: vec![
                    EnumVariant { name: "Left".into(), xml_value: "left".into() },
                    EnumVariant { name: "Right".into(), xml_value: "right".into() },
                ],
            })],
            elements: Vec::new(),
        };
        let rendered = emit_module(&module);
        assert!(rendered.contains("export enum Side"));
        assert!(rendered.contains("Left = \"left\""));
        assert!(rendered.contains("export function sideToXmlValue"));
        assert!(rendered.contains("export function sideFromXmlValue"));
    }

    #[test]
    fn emits_an_interface_with_optional_and_array_fields() {
        let module = Module {
            namespace_path: "schema".into(),
            types: vec![Type::Record(RecordType {
                name: "Order".into(),
                fields: vec![
                    Field {
                        name: "id".into(),
                        type_expr: "String".into(),
                        required_import: None,
                        optional: false,
                        repeating: false,
                        default: None,
                        documentation: None,
                        is_attribute: true,
                        xml_name: "id".into(),
                    },
                    Field {
                        name: "total".into(),
                        type_expr: "xb_xstypes::BigDecimal".into(),
                        required_import: Some("xb_xstypes::BigDecimal".into()),
                        optional: true,
                        repeating: false,
                        default: None,
                        documentation: None,
                        is_attribute: false,
                        xml_name: "total".into(),
                    },
                    Field {
                        name: "items".into(),
                        type_expr: "String".into(),
                        required_import: None,
                        optional: false,
                        repeating: true,
                        default: None,
                        documentation: None,
                        is_attribute: false,
                        xml_name: "item".into(),
                    },
                ],
            })],
            elements: Vec::new(),
        };
        let rendered = emit_module(&module);
        assert!(rendered.contains("export interface Order"));
        assert!(rendered.contains("id: string"));
        assert!(rendered.contains("total?: string"));
        assert!(rendered.contains("items: string[]"));
    }

    #[test]
    fn emits_a_type_alias() {
        let module = Module {
            namespace_path: "schema".into(),
            types: vec![Type::Alias(AliasType {
                name: "Quantity".into(),
                target: "xb_xstypes::BigInt".into(),
                required_import: Some("xb_xstypes::BigInt".into()),
            })],
            elements: Vec::new(),
        };
        let rendered = emit_module(&module);
        assert!(rendered.contains("export type Quantity = string;"));
    }

    #[test]
    fn emits_parse_and_serialize_functions_for_top_level_elements() {
        let module = Module {
            namespace_path: "schema".into(),
            types: vec![Type::Record(RecordType { name: "Order".into(), fields: Vec::new() })],
            elements: vec![ElementBinding { element_name: "order".into(), type_name: "Order".into(), xml_name: "order".into() }],
        };
        let rendered = emit_module(&module);
        assert!(rendered.contains("export function parseOrder"));
        assert!(rendered.contains("export function serializeOrder"));
    }
}
