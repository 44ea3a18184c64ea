//! Identifier naming rules (spec §4.13): every XSD/RELAX NG identifier is normalized through a
//! snake-case (fields, functions) or upper-camel-case (types) transformer, then checked against
//! the target language's reserved words.

use check_keyword::CheckKeyword;
use heck::{ToSnakeCase, ToUpperCamelCase};

/// `FooBar → foo_bar`, `HTMLParser → html_parser`, `foo-bar → foo_bar`, `foo.bar → foo_bar`.
/// Leading digits get an underscore prefix; a name that collides with a Rust keyword gets a
/// trailing underscore (`type` → `type_`).
pub fn field_name(source: &str) -> String {
    finish(clean(source).to_snake_case())
}

/// The upper-camel-case counterpart used for generated type names (`foo_bar → FooBar`).
pub fn type_name(source: &str) -> String {
    let name = clean(source).to_upper_camel_case();
    prefix_leading_digit(&name)
}

/// Replaces every separator `heck` wouldn't otherwise treat as a word boundary (`.`, and any
/// other non-alphanumeric, non-underscore byte) with `_`, so `foo.bar` splits the same way
/// `foo_bar` would.
fn clean(source: &str) -> String {
    source
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

fn finish(name: String) -> String {
    let name = prefix_leading_digit(&name);
    name.as_str().into_safe()
}

fn prefix_leading_digit(name: &str) -> String {
    match name.chars().next() {
        Some(c) if c.is_ascii_digit() => format!("_{name}"),
        _ => name.to_string(),
    }
}
