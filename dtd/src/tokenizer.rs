use crate::error::DtdError;

/// A single markup declaration with its body verbatim (not yet entity-expanded or parsed), e.g.
/// `RawDecl { keyword: "ELEMENT", body: "book (title, author*)" }` for `<!ELEMENT book (title,
/// author*)>` (spec §4.5). Comments and processing instructions are recognized and discarded; they
/// never produce a `RawDecl`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawDecl {
    pub keyword: String,
    pub body: String,
}

/// Splits a DTD's internal (or external) subset into its markup declarations.
pub fn tokenize(input: &str) -> Result<Vec<RawDecl>, DtdError> {
    let bytes = input.as_bytes();
    let mut decls = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        if input[i..].starts_with("<!--") {
            let end = input[i + 4..]
                .find("-->")
                .ok_or(DtdError::UnterminatedDeclaration(i))?;
            i = i + 4 + end + 3;
        } else if input[i..].starts_with("<?") {
            let end = input[i + 2..].find("?>").ok_or(DtdError::UnterminatedDeclaration(i))?;
            i = i + 2 + end + 2;
        } else if input[i..].starts_with("<!") {
            let rest = &input[i + 2..];
            let keyword_len = rest.find(|c: char| c.is_whitespace()).unwrap_or(rest.len());
            let keyword = rest[..keyword_len].to_string();
            let body_start = i + 2 + keyword_len;
            let (body_end, decl_end) = find_declaration_end(input, body_start)?;
            let body = input[body_start..body_end].trim().to_string();
            decls.push(RawDecl { keyword, body });
            i = decl_end;
        } else {
            i += input[i..].chars().next().map(char::len_utf8).unwrap_or(1);
        }
    }

    Ok(decls)
}

/// Scans forward from `start` for the unquoted `>` that closes a declaration, tracking quote state
/// so a literal `>` inside an `ENTITY` value (or an attribute default) doesn't terminate it early.
/// Returns `(body_end, index_just_past_the_closing_angle_bracket)`.
fn find_declaration_end(input: &str, start: usize) -> Result<(usize, usize), DtdError> {
    let mut quote: Option<char> = None;
    let mut iter = input[start..].char_indices();
    while let Some((offset, c)) = iter.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' => quote = Some(c),
                '>' => return Ok((start + offset, start + offset + 1)),
                _ => {}
            },
        }
    }
    Err(DtdError::UnterminatedDeclaration(start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_element_and_attlist_declarations() {
        let decls = tokenize(
            r#"<!ELEMENT book (title, author*)>
               <!ATTLIST book isbn CDATA #REQUIRED>"#,
        )
        .unwrap();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].keyword, "ELEMENT");
        assert_eq!(decls[0].body, "book (title, author*)");
        assert_eq!(decls[1].keyword, "ATTLIST");
    }

    #[test]
    fn skips_comments_and_processing_instructions() {
        let decls = tokenize("<!-- a comment with > inside --><?pi data?><!ELEMENT e EMPTY>").unwrap();
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].body, "e EMPTY");
    }

    #[test]
    fn tolerates_greater_than_inside_quoted_entity_value() {
        let decls = tokenize(r#"<!ENTITY foo "a > b">"#).unwrap();
        assert_eq!(decls[0].keyword, "ENTITY");
        assert_eq!(decls[0].body, r#"foo "a > b""#);
    }

    #[test]
    fn unterminated_declaration_is_an_error() {
        assert!(matches!(tokenize("<!ELEMENT book (title)"), Err(DtdError::UnterminatedDeclaration(_))));
    }
}
