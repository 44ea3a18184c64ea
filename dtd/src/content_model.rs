//! Recursive-descent parser for the `contentspec` grammar (spec §4.5):
//!
//! ```text
//! spec     := "EMPTY" | "ANY" | mixed | children
//! mixed    := "(" "#PCDATA" ("|" NAME)* ")" "*"?
//! children := group QUANT?
//! group    := "(" item ("|" item | "," item)* ")"
//! item     := NAME QUANT? | group QUANT?
//! QUANT    := "?" | "*" | "+"
//! ```
//!
//! The input has already had its parameter entities expanded (spec §4.5: expansion happens before
//! content-particle parsing, never inside attribute defaults).

use crate::error::DtdError;
use crate::model::{ContentSpec, Particle, Quantifier, Separator, Term};

pub fn parse_content_spec(input: &str) -> Result<ContentSpec, DtdError> {
    let mut p = Cursor::new(input);
    p.skip_ws();
    let spec = if p.eat_keyword("EMPTY") {
        ContentSpec::Empty
    } else if p.eat_keyword("ANY") {
        ContentSpec::Any
    } else if p.peek_is_pcdata_group() {
        p.parse_mixed()?
    } else {
        ContentSpec::Children(p.parse_children()?)
    };
    p.skip_ws();
    if !p.at_end() {
        return Err(DtdError::MalformedContentSpec(format!("trailing input: {:?}", p.rest())));
    }
    Ok(spec)
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.rest().is_empty()
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.rest().starts_with(kw) {
            self.pos += kw.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), DtdError> {
        self.skip_ws();
        if self.bump() == Some(c) {
            Ok(())
        } else {
            Err(DtdError::MalformedContentSpec(format!("expected {c:?} at {:?}", self.rest())))
        }
    }

    /// True if, ignoring leading whitespace, the cursor sits on `(#PCDATA`.
    fn peek_is_pcdata_group(&self) -> bool {
        self.rest().trim_start().starts_with("(#PCDATA")
    }

    fn parse_name(&mut self) -> Result<String, DtdError> {
        self.skip_ws();
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() || matches!(c, '(' | ')' | '|' | ',' | '?' | '*' | '+') {
                break;
            }
            self.bump();
        }
        if self.pos == start {
            return Err(DtdError::MalformedContentSpec(format!("expected a name at {:?}", self.rest())));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_quantifier(&mut self) -> Quantifier {
        match self.peek_char() {
            Some('?') => {
                self.bump();
                Quantifier::Optional
            }
            Some('*') => {
                self.bump();
                Quantifier::Star
            }
            Some('+') => {
                self.bump();
                Quantifier::Plus
            }
            _ => Quantifier::One,
        }
    }

    fn parse_mixed(&mut self) -> Result<ContentSpec, DtdError> {
        self.expect('(')?;
        self.skip_ws();
        if !self.eat_keyword("#PCDATA") {
            return Err(DtdError::MalformedContentSpec("mixed content must start with #PCDATA".into()));
        }
        let mut names = Vec::new();
        loop {
            self.skip_ws();
            match self.peek_char() {
                Some('|') => {
                    self.bump();
                    names.push(self.parse_name()?);
                }
                Some(')') => {
                    self.bump();
                    break;
                }
                _ => {
                    return Err(DtdError::MalformedContentSpec(format!(
                        "expected '|' or ')' in mixed content at {:?}",
                        self.rest()
                    )))
                }
            }
        }
        if !names.is_empty() {
            self.skip_ws();
            if self.peek_char() != Some('*') {
                return Err(DtdError::MalformedContentSpec(
                    "mixed content with child names must be quantified with '*'".into(),
                ));
            }
            self.bump();
        } else {
            // `(#PCDATA)` on its own may optionally carry a redundant `*`.
            self.skip_ws();
            if self.peek_char() == Some('*') {
                self.bump();
            }
        }
        Ok(ContentSpec::Mixed { names })
    }

    fn parse_children(&mut self) -> Result<Particle, DtdError> {
        let term = self.parse_group()?;
        self.skip_ws();
        let quantifier = self.parse_quantifier();
        Ok(Particle { term, quantifier })
    }

    fn parse_group(&mut self) -> Result<Term, DtdError> {
        self.expect('(')?;
        let mut items = vec![self.parse_item()?];
        let mut separator: Option<Separator> = None;
        loop {
            self.skip_ws();
            match self.peek_char() {
                Some(')') => {
                    self.bump();
                    break;
                }
                Some(c @ ('|' | ',')) => {
                    let this_sep = if c == '|' { Separator::Choice } else { Separator::Sequence };
                    match separator {
                        None => separator = Some(this_sep),
                        Some(s) if s == this_sep => {}
                        Some(_) => return Err(DtdError::MixedSeparators),
                    }
                    self.bump();
                    items.push(self.parse_item()?);
                }
                _ => {
                    return Err(DtdError::MalformedContentSpec(format!(
                        "expected ',', '|' or ')' at {:?}",
                        self.rest()
                    )))
                }
            }
        }
        Ok(Term::Group { separator: separator.unwrap_or(Separator::Sequence), items })
    }

    fn parse_item(&mut self) -> Result<Particle, DtdError> {
        self.skip_ws();
        let term = if self.peek_char() == Some('(') {
            self.parse_group()?
        } else {
            Term::Name(self.parse_name()?)
        };
        let quantifier = self.parse_quantifier();
        Ok(Particle { term, quantifier })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_empty_and_any() {
        assert_eq!(parse_content_spec("EMPTY").unwrap(), ContentSpec::Empty);
        assert_eq!(parse_content_spec("ANY").unwrap(), ContentSpec::Any);
    }

    #[test]
    fn parses_bare_pcdata() {
        assert_eq!(parse_content_spec("(#PCDATA)").unwrap(), ContentSpec::Mixed { names: vec![] });
    }

    #[test]
    fn parses_mixed_with_children() {
        let spec = parse_content_spec("(#PCDATA|b|i)*").unwrap();
        assert_eq!(spec, ContentSpec::Mixed { names: vec!["b".into(), "i".into()] });
    }

    #[test]
    fn rejects_unquantified_mixed_with_children() {
        assert!(parse_content_spec("(#PCDATA|b)").is_err());
    }

    #[test]
    fn parses_sequence_children() {
        let spec = parse_content_spec("(title, author*, isbn?)").unwrap();
        match spec {
            ContentSpec::Children(Particle { term: Term::Group { separator, items }, quantifier }) => {
                assert_eq!(separator, Separator::Sequence);
                assert_eq!(items.len(), 3);
                assert_eq!(quantifier, Quantifier::One);
                assert_eq!(items[1].quantifier, Quantifier::Star);
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn parses_nested_choice_groups() {
        let spec = parse_content_spec("((a,b)|c)+").unwrap();
        match spec {
            ContentSpec::Children(Particle { term: Term::Group { separator, items }, quantifier }) => {
                assert_eq!(separator, Separator::Choice);
                assert_eq!(quantifier, Quantifier::Plus);
                assert!(matches!(items[0].term, Term::Group { .. }));
                assert!(matches!(items[1].term, Term::Name(ref n) if n == "c"));
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn rejects_mixed_separators_within_one_group() {
        assert!(matches!(parse_content_spec("(a,b|c)"), Err(DtdError::MixedSeparators)));
    }
}
