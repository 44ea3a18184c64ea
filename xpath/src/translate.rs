use crate::ast::{CmpOp, Expr, Func};
use crate::parser::parse;

/// Translates a bounded XPath expression into a target-language boolean expression (spec
/// §4.11). `value_prefix` is `"value"` for a simple-type assertion (where `$value` names the
/// whole scalar) or `"value."` for a complex-type assertion (where a bare path like `total`
/// becomes a member access `value.total`). Returns `None` for anything outside the grammar —
/// never a crash; the caller decides whether to skip, warn, or fail (spec §7).
pub fn translate(expr: &str, value_prefix: &str) -> Option<String> {
    let ast = parse(expr)?;
    emit(&ast, value_prefix)
}

fn emit(expr: &Expr, prefix: &str) -> Option<String> {
    match expr {
        Expr::Or(a, b) => Some(format!("({} || {})", emit(a, prefix)?, emit(b, prefix)?)),
        Expr::And(a, b) => Some(format!("({} && {})", emit(a, prefix)?, emit(b, prefix)?)),
        Expr::Not(inner) => Some(format!("!({})", emit(inner, prefix)?)),
        Expr::Cmp(a, op, b) => Some(format!("{} {} {}", emit(a, prefix)?, emit_op(*op), emit(b, prefix)?)),
        Expr::Value => Some(self_name(prefix)),
        Expr::Attribute(name) => Some(field_ref(prefix, name)),
        Expr::Number(n) => Some(n.clone()),
        Expr::StringLit(s) => Some(format!("{s:?}")),
        Expr::Path(segments) => Some(field_ref(prefix, &segments.join("."))),
        Expr::Call(func, args) => emit_call(*func, args, prefix),
    }
}

fn emit_op(op: CmpOp) -> &'static str {
    match op {
        CmpOp::Ge => ">=",
        CmpOp::Le => "<=",
        CmpOp::Ne => "!=",
        CmpOp::Gt => ">",
        CmpOp::Lt => "<",
        CmpOp::Eq => "==",
    }
}

fn emit_call(func: Func, args: &[Expr], prefix: &str) -> Option<String> {
    match (func, args) {
        (Func::Count, [a]) => Some(format!("{}.len()", emit(a, prefix)?)),
        (Func::StringLength, [a]) => Some(format!("{}.len()", emit(a, prefix)?)),
        (Func::Contains, [a, b]) => Some(format!("{}.contains({})", emit(a, prefix)?, emit(b, prefix)?)),
        (Func::StartsWith, [a, b]) => Some(format!("{}.starts_with({})", emit(a, prefix)?, emit(b, prefix)?)),
        (Func::True, []) => Some("true".to_string()),
        (Func::False, []) => Some("false".to_string()),
        _ => None,
    }
}

fn self_name(prefix: &str) -> String {
    prefix.trim_end_matches('.').to_string()
}

fn field_ref(prefix: &str, path: &str) -> String {
    if prefix.ends_with('.') {
        format!("{prefix}{path}")
    } else {
        format!("{prefix}.{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_comparison_on_a_complex_type_field() {
        let out = translate("total > 0", "value.").unwrap();
        assert_eq!(out, "value.total > 0");
    }

    #[test]
    fn dollar_value_on_a_simple_type() {
        let out = translate("$value > 0", "value").unwrap();
        assert_eq!(out, "value > 0");
    }

    #[test]
    fn equals_maps_to_double_equals() {
        let out = translate("total = 0", "value.").unwrap();
        assert_eq!(out, "value.total == 0");
    }

    #[test]
    fn and_or_not_are_short_circuit() {
        let out = translate("not(a = 1 and b = 2)", "value.").unwrap();
        assert_eq!(out, "!((value.a == 1 && value.b == 2))");
    }

    #[test]
    fn count_and_contains_and_starts_with() {
        assert_eq!(translate("count(items) > 0", "value.").unwrap(), "value.items.len() > 0");
        assert_eq!(translate("contains(name, 'x')", "value.").unwrap(), r#"value.name.contains("x")"#);
        assert_eq!(translate("starts-with(name, 'x')", "value.").unwrap(), r#"value.name.starts_with("x")"#);
    }

    #[test]
    fn out_of_grammar_expression_is_a_miss() {
        assert!(translate("items[1] = 1", "value.").is_none());
        assert!(translate("local-name() = 'x'", "value.").is_none());
    }
}
