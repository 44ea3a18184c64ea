//! Parameter-entity expansion (spec §4.5): `%name;` references are pasted in textually before a
//! content-model body is parsed. Parameter entities never expand inside attribute default values.

use std::collections::HashMap;

use crate::error::DtdError;

const MAX_DEPTH: u32 = 32;

pub fn expand(body: &str, entities: &HashMap<String, String>) -> Result<String, DtdError> {
    expand_at_depth(body, entities, 0)
}

fn expand_at_depth(body: &str, entities: &HashMap<String, String>, depth: u32) -> Result<String, DtdError> {
    if !body.contains('%') {
        return Ok(body.to_string());
    }
    if depth >= MAX_DEPTH {
        return Err(DtdError::MalformedContentSpec(
            "parameter entity expansion exceeded maximum nesting depth".into(),
        ));
    }

    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let name_start = i + 1;
        let rest = &body[name_start..];
        let name_len = rest.find(';').ok_or_else(|| {
            DtdError::MalformedContentSpec(format!("unterminated parameter entity reference at byte {i}"))
        })?;
        let name = &rest[..name_len];
        let replacement = entities
            .get(name)
            .ok_or_else(|| DtdError::UndefinedParameterEntity(name.to_string()))?;
        out.push_str(&expand_at_depth(replacement, entities, depth + 1)?);

        // Skip past the name and the trailing ';' we just consumed.
        for _ in 0..name_len + 1 {
            chars.next();
        }
    }
    Ok(out)
}

/// Like [`expand`], but leaves the contents of single- or double-quoted literals untouched — used
/// for `ATTLIST` bodies, where a `%`-reference inside an attribute's default-value literal must
/// not be expanded (spec §4.5).
pub fn expand_outside_quotes(body: &str, entities: &HashMap<String, String>) -> Result<String, DtdError> {
    let mut out = String::with_capacity(body.len());
    let mut quote: Option<char> = None;
    let mut chars = body.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match quote {
            Some(q) if c == q => {
                quote = None;
                out.push(c);
            }
            Some(_) => out.push(c),
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                out.push(c);
            }
            None if c == '%' => {
                let rest = &body[i + 1..];
                let name_len = rest.find(';').ok_or_else(|| {
                    DtdError::MalformedContentSpec(format!("unterminated parameter entity reference at byte {i}"))
                })?;
                let name = &rest[..name_len];
                let replacement = entities
                    .get(name)
                    .ok_or_else(|| DtdError::UndefinedParameterEntity(name.to_string()))?;
                out.push_str(&expand_at_depth(replacement, entities, 0)?);
                for _ in 0..name_len + 1 {
                    chars.next();
                }
            }
            None => out.push(c),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_a_single_reference() {
        let mut entities = HashMap::new();
        entities.insert("common".to_string(), "title, author".to_string());
        assert_eq!(expand("(%common;)", &entities).unwrap(), "(title, author)");
    }

    #[test]
    fn expands_nested_references() {
        let mut entities = HashMap::new();
        entities.insert("inner".to_string(), "b".to_string());
        entities.insert("outer".to_string(), "a, %inner;".to_string());
        assert_eq!(expand("(%outer;)", &entities).unwrap(), "(a, b)");
    }

    #[test]
    fn undefined_reference_is_an_error() {
        let entities = HashMap::new();
        assert!(matches!(expand("(%missing;)", &entities), Err(DtdError::UndefinedParameterEntity(n)) if n == "missing"));
    }

    #[test]
    fn expand_outside_quotes_leaves_default_value_literals_alone() {
        let mut entities = HashMap::new();
        entities.insert("vals".to_string(), "one|two".to_string());
        let expanded = expand_outside_quotes(r#"book kind (%vals;) "a % literal""#, &entities).unwrap();
        assert_eq!(expanded, r#"book kind (one|two) "a % literal""#);
    }
}
