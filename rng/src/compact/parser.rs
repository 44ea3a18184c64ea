//! Recursive-descent parser over the compact-syntax tokenizer (spec §4.6). Keywords and
//! punctuation follow the RELAX NG compact grammar for the bounded subset this workspace
//! supports: namespace/datatype declarations, `element`/`attribute`/`list`/`mixed` patterns,
//! quantifiers, grouping via `,`/`&`/`|`, datatype and value patterns, `ref`/`parent` references,
//! and grammar bodies (`NAME = pattern`, `start = pattern`, `include`).
//!
//! Operator precedence (lowest to highest binding): `|` (choice), `&` (interleave), `,` (group),
//! postfix quantifier. Mixing operators without explicit `(...)` grouping is accepted with this
//! fixed precedence rather than rejected, which is a deliberate simplification of the full RNC
//! grammar (real RNC requires parens when mixing `,`/`&`/`|` at the same level).

use std::collections::HashMap;

use xb_xstypes::QName;

use super::tokenizer::{tokenize, Token, TokenKind};
use crate::error::RngError;
use crate::name_class::NameClass;
use crate::pattern::{Combine, Define, Grammar, Include, Param, Pattern};

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    default_ns: String,
    prefix_ns: HashMap<String, String>,
    default_datatype_lib: String,
    prefix_datatype_lib: HashMap<String, String>,
}

pub fn parse(source: &str) -> Result<Pattern, RngError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        default_ns: String::new(),
        prefix_ns: HashMap::new(),
        default_datatype_lib: String::new(),
        prefix_datatype_lib: HashMap::new(),
    };
    parser.parse_top_level()
}

impl Parser {
    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn pos_at(&self) -> usize {
        self.tokens[self.pos].pos
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.tokens[self.pos].kind.clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        kind
    }

    fn expect(&mut self, expected: &TokenKind, context: &str) -> Result<(), RngError> {
        if self.peek() == expected {
            self.advance();
            Ok(())
        } else {
            Err(RngError::UnexpectedToken { position: self.pos_at(), message: format!("expected {expected:?} {context}") })
        }
    }

    fn ident_is(&self, word: &str) -> bool {
        matches!(self.peek(), TokenKind::Ident(i) if i == word)
    }

    /// Consumes leading `namespace`/`datatypes` declarations, then parses the remaining body:
    /// either a grammar (if it contains at least one `NAME = pattern` assignment or `include`) or
    /// a bare top-level pattern expression.
    fn parse_top_level(&mut self) -> Result<Pattern, RngError> {
        self.parse_decls()?;

        let mut start = None;
        let mut defines = Vec::new();
        let mut includes = Vec::new();
        let mut saw_grammar_content = false;

        loop {
            match self.peek().clone() {
                TokenKind::Eof => break,
                TokenKind::Ident(ref kw) if kw == "start" => {
                    saw_grammar_content = true;
                    self.advance();
                    let combine = self.parse_optional_combine()?;
                    let body = self.parse_expr()?;
                    start = Some(merge_combine(start, body, combine));
                }
                TokenKind::Ident(ref kw) if kw == "include" => {
                    saw_grammar_content = true;
                    self.advance();
                    if let TokenKind::Str(href) = self.advance() {
                        includes.push(Include { href });
                    } else {
                        return Err(RngError::UnexpectedToken { position: self.pos_at(), message: "expected a string literal after `include`".into() });
                    }
                }
                TokenKind::Ident(name) if self.is_define_start() => {
                    saw_grammar_content = true;
                    self.advance();
                    let combine = self.parse_optional_combine()?;
                    let body = self.parse_expr()?;
                    defines.push(Define { name, body, combine });
                }
                _ => {
                    if saw_grammar_content {
                        return Err(RngError::UnexpectedToken {
                            position: self.pos_at(),
                            message: "expected a define, `start =`, or `include` in a grammar body".into(),
                        });
                    }
                    let pattern = self.parse_expr()?;
                    self.expect(&TokenKind::Eof, "at end of document")?;
                    return Ok(pattern);
                }
            }
        }

        let start = start.unwrap_or(Pattern::Empty);
        Ok(Pattern::Grammar(Box::new(Grammar { start: Box::new(start), defines, includes })))
    }

    /// Whether the identifier at the current position begins a `NAME =`/`NAME |=`/`NAME &=`
    /// define (as opposed to a bare pattern reference).
    fn is_define_start(&self) -> bool {
        matches!(self.peek(), TokenKind::Ident(_))
            && matches!(
                self.tokens.get(self.pos + 1).map(|t| &t.kind),
                Some(TokenKind::Eq) | Some(TokenKind::PipeEq) | Some(TokenKind::AmpEq)
            )
    }

    fn parse_optional_combine(&mut self) -> Result<Option<Combine>, RngError> {
        match self.peek() {
            TokenKind::Eq => {
                self.advance();
                Ok(None)
            }
            TokenKind::PipeEq => {
                self.advance();
                Ok(Some(Combine::Choice))
            }
            TokenKind::AmpEq => {
                self.advance();
                Ok(Some(Combine::Interleave))
            }
            _ => Err(RngError::UnexpectedToken { position: self.pos_at(), message: "expected `=`, `|=` or `&=`".into() }),
        }
    }

    fn parse_decls(&mut self) -> Result<(), RngError> {
        loop {
            if self.ident_is("default") {
                self.advance();
                self.expect_ident("namespace")?;
                let prefix = self.optional_ident();
                self.expect(&TokenKind::Eq, "after namespace declaration")?;
                let uri = self.expect_string()?;
                self.default_ns = uri.clone();
                if let Some(p) = prefix {
                    self.prefix_ns.insert(p, uri);
                }
            } else if self.ident_is("namespace") {
                self.advance();
                let prefix = self.expect_ident_any()?;
                self.expect(&TokenKind::Eq, "after namespace declaration")?;
                let uri = self.expect_string()?;
                self.prefix_ns.insert(prefix, uri);
            } else if self.ident_is("datatypes") {
                self.advance();
                let prefix = self.expect_ident_any()?;
                self.expect(&TokenKind::Eq, "after datatypes declaration")?;
                let uri = self.expect_string()?;
                self.prefix_datatype_lib.insert(prefix, uri);
            } else {
                return Ok(());
            }
        }
    }

    fn expect_ident(&mut self, word: &'static str) -> Result<(), RngError> {
        match self.advance() {
            TokenKind::Ident(i) if i == word => Ok(()),
            _ => Err(RngError::UnexpectedToken { position: self.pos_at(), message: format!("expected `{word}`") }),
        }
    }

    fn expect_ident_any(&mut self) -> Result<String, RngError> {
        match self.advance() {
            TokenKind::Ident(i) => Ok(i),
            _ => Err(RngError::UnexpectedToken { position: self.pos_at(), message: "expected an identifier".into() }),
        }
    }

    fn optional_ident(&mut self) -> Option<String> {
        if let TokenKind::Ident(_) = self.peek() {
            if let TokenKind::Ident(i) = self.advance() {
                return Some(i);
            }
        }
        None
    }

    fn expect_string(&mut self) -> Result<String, RngError> {
        match self.advance() {
            TokenKind::Str(s) => Ok(s),
            _ => Err(RngError::UnexpectedToken { position: self.pos_at(), message: "expected a string literal".into() }),
        }
    }

    // ---- pattern expressions --------------------------------------------------------------

    fn parse_expr(&mut self) -> Result<Pattern, RngError> {
        self.parse_choice()
    }

    fn parse_choice(&mut self) -> Result<Pattern, RngError> {
        let mut left = self.parse_interleave()?;
        while matches!(self.peek(), TokenKind::Pipe) {
            self.advance();
            let right = self.parse_interleave()?;
            left = Pattern::Choice(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_interleave(&mut self) -> Result<Pattern, RngError> {
        let mut left = self.parse_group()?;
        while matches!(self.peek(), TokenKind::Amp) {
            self.advance();
            let right = self.parse_group()?;
            left = Pattern::Interleave(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_group(&mut self) -> Result<Pattern, RngError> {
        let mut left = self.parse_postfix()?;
        while matches!(self.peek(), TokenKind::Comma) {
            self.advance();
            let right = self.parse_postfix()?;
            left = Pattern::Group(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_postfix(&mut self) -> Result<Pattern, RngError> {
        let mut p = self.parse_primary()?;
        loop {
            match self.peek() {
                TokenKind::Question => {
                    self.advance();
                    p = Pattern::Optional(Box::new(p));
                }
                TokenKind::Star => {
                    self.advance();
                    p = Pattern::ZeroOrMore(Box::new(p));
                }
                TokenKind::Plus => {
                    self.advance();
                    p = Pattern::OneOrMore(Box::new(p));
                }
                _ => break,
            }
        }
        Ok(p)
    }

    fn parse_primary(&mut self) -> Result<Pattern, RngError> {
        match self.peek().clone() {
            TokenKind::LParen => {
                self.advance();
                let p = self.parse_expr()?;
                self.expect(&TokenKind::RParen, "to close `(`")?;
                Ok(p)
            }
            TokenKind::Str(value) => {
                self.advance();
                Ok(Pattern::Value { ns: self.default_ns.clone(), library: String::new(), type_: "token".to_string(), content: value })
            }
            TokenKind::Ident(word) if word == "empty" => {
                self.advance();
                Ok(Pattern::Empty)
            }
            TokenKind::Ident(word) if word == "text" => {
                self.advance();
                Ok(Pattern::Text)
            }
            TokenKind::Ident(word) if word == "notAllowed" => {
                self.advance();
                Ok(Pattern::NotAllowed)
            }
            TokenKind::Ident(word) if word == "element" => {
                self.advance();
                let nc = self.parse_name_class()?;
                self.expect(&TokenKind::LBrace, "after `element` name class")?;
                let body = self.parse_expr()?;
                self.expect(&TokenKind::RBrace, "to close `element { ... }`")?;
                Ok(Pattern::Element(nc, Box::new(body)))
            }
            TokenKind::Ident(word) if word == "attribute" => {
                self.advance();
                let nc = self.parse_name_class()?;
                self.expect(&TokenKind::LBrace, "after `attribute` name class")?;
                let body = self.parse_expr()?;
                self.expect(&TokenKind::RBrace, "to close `attribute { ... }`")?;
                Ok(Pattern::Attribute(nc, Box::new(body)))
            }
            TokenKind::Ident(word) if word == "list" => {
                self.advance();
                self.expect(&TokenKind::LBrace, "after `list`")?;
                let body = self.parse_expr()?;
                self.expect(&TokenKind::RBrace, "to close `list { ... }`")?;
                Ok(Pattern::List(Box::new(body)))
            }
            TokenKind::Ident(word) if word == "mixed" => {
                self.advance();
                self.expect(&TokenKind::LBrace, "after `mixed`")?;
                let body = self.parse_expr()?;
                self.expect(&TokenKind::RBrace, "to close `mixed { ... }`")?;
                Ok(Pattern::Mixed(Box::new(body)))
            }
            TokenKind::Ident(word) if word == "parent" => {
                self.advance();
                let name = self.expect_ident_any()?;
                Ok(Pattern::ParentRef(name))
            }
            TokenKind::Ident(word) if word == "external" => {
                self.advance();
                let href = self.expect_string()?;
                Ok(Pattern::ExternalRef { href, ns: self.default_ns.clone() })
            }
            TokenKind::Ident(word) if word == "grammar" => {
                self.advance();
                self.expect(&TokenKind::LBrace, "after `grammar`")?;
                let grammar = self.parse_grammar_body()?;
                self.expect(&TokenKind::RBrace, "to close `grammar { ... }`")?;
                Ok(grammar)
            }
            TokenKind::Ident(word) if word == "string" || word == "token" => {
                self.advance();
                self.parse_datatype_tail(String::new(), word)
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Pattern::Ref(name))
            }
            TokenKind::Prefixed(prefix, local) => {
                self.advance();
                let lib = self.prefix_datatype_lib.get(&prefix).cloned().unwrap_or_default();
                self.parse_datatype_tail(lib, local)
            }
            _ => Err(RngError::UnexpectedToken { position: self.pos_at(), message: "expected a pattern".into() }),
        }
    }

    fn parse_datatype_tail(&mut self, library: String, type_: String) -> Result<Pattern, RngError> {
        let mut params = Vec::new();
        if matches!(self.peek(), TokenKind::LBrace) {
            self.advance();
            while !matches!(self.peek(), TokenKind::RBrace) {
                let name = self.expect_ident_any()?;
                self.expect(&TokenKind::Eq, "after datatype param name")?;
                let value = self.expect_string()?;
                params.push(Param { name, value });
            }
            self.advance(); // RBrace
        }
        let except = if matches!(self.peek(), TokenKind::Minus) {
            self.advance();
            Some(Box::new(self.parse_postfix()?))
        } else {
            None
        };
        Ok(Pattern::Data { library, type_, params, except })
    }

    fn parse_grammar_body(&mut self) -> Result<Pattern, RngError> {
        let mut start = None;
        let mut defines = Vec::new();
        let mut includes = Vec::new();
        loop {
            match self.peek().clone() {
                TokenKind::RBrace => break,
                TokenKind::Ident(ref kw) if kw == "start" => {
                    self.advance();
                    let combine = self.parse_optional_combine()?;
                    let body = self.parse_expr()?;
                    start = Some(merge_combine(start, body, combine));
                }
                TokenKind::Ident(ref kw) if kw == "include" => {
                    self.advance();
                    let href = self.expect_string()?;
                    includes.push(Include { href });
                }
                TokenKind::Ident(_) if self.is_define_start() => {
                    let name = self.expect_ident_any()?;
                    let combine = self.parse_optional_combine()?;
                    let body = self.parse_expr()?;
                    defines.push(Define { name, body, combine });
                }
                _ => {
                    return Err(RngError::UnexpectedToken {
                        position: self.pos_at(),
                        message: "expected a define, `start =`, or `include` inside `grammar { ... }`".into(),
                    });
                }
            }
        }
        let start = start.unwrap_or(Pattern::Empty);
        Ok(Pattern::Grammar(Box::new(Grammar { start: Box::new(start), defines, includes })))
    }

    // ---- name classes ----------------------------------------------------------------------

    fn parse_name_class(&mut self) -> Result<NameClass, RngError> {
        let mut left = self.parse_name_class_term()?;
        while matches!(self.peek(), TokenKind::Pipe) {
            self.advance();
            let right = self.parse_name_class_term()?;
            left = NameClass::Choice(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_name_class_term(&mut self) -> Result<NameClass, RngError> {
        let base = match self.peek().clone() {
            TokenKind::Star => {
                self.advance();
                NameClass::AnyName(None)
            }
            TokenKind::Prefixed(prefix, local) if local == "*" => {
                self.advance();
                let ns = self.prefix_ns.get(&prefix).cloned().unwrap_or_default();
                NameClass::NsName(ns, None)
            }
            TokenKind::Prefixed(prefix, local) => {
                self.advance();
                let ns = self.prefix_ns.get(&prefix).cloned().unwrap_or_default();
                NameClass::SpecificName(QName::new(ns, local))
            }
            TokenKind::Ident(name) => {
                self.advance();
                NameClass::SpecificName(QName::new(self.default_ns.clone(), name))
            }
            TokenKind::LParen => {
                self.advance();
                let nc = self.parse_name_class()?;
                self.expect(&TokenKind::RParen, "to close `(` in a name class")?;
                nc
            }
            _ => return Err(RngError::UnexpectedToken { position: self.pos_at(), message: "expected a name class".into() }),
        };
        if matches!(self.peek(), TokenKind::Minus) {
            self.advance();
            let except = self.parse_name_class_term()?;
            return Ok(match base {
                NameClass::AnyName(_) => NameClass::AnyName(Some(Box::new(except))),
                NameClass::NsName(ns, _) => NameClass::NsName(ns, Some(Box::new(except))),
                other => other,
            });
        }
        Ok(base)
    }
}

fn merge_combine(existing: Option<Pattern>, next: Pattern, combine: Option<Combine>) -> Pattern {
    match (existing, combine) {
        (None, _) => next,
        (Some(_), None) => next,
        (Some(prev), Some(Combine::Choice)) => Pattern::Choice(Box::new(prev), Box::new(next)),
        (Some(prev), Some(Combine::Interleave)) => Pattern::Interleave(Box::new(prev), Box::new(next)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_card_grammar() {
        let p = parse("start = card\ncard = element name { text }").unwrap();
        match p {
            Pattern::Grammar(g) => {
                assert_eq!(g.defines.len(), 1);
                assert_eq!(g.defines[0].name, "card");
                assert!(matches!(*g.start, Pattern::Ref(ref n) if n == "card"));
            }
            other => panic!("expected a grammar, got {other:?}"),
        }
    }

    #[test]
    fn bare_pattern_with_no_defines_is_returned_directly() {
        let p = parse("element doc { text }").unwrap();
        assert!(matches!(p, Pattern::Element(..)));
    }

    #[test]
    fn datatype_with_params_and_namespace_prefix() {
        let p = parse(
            "datatypes xsd = \"http://www.w3.org/2001/XMLSchema-datatypes\"\nelement n { xsd:int { maxInclusive = \"10\" } }",
        )
        .unwrap();
        match p {
            Pattern::Element(_, body) => match *body {
                Pattern::Data { library, type_, params, .. } => {
                    assert_eq!(library, "http://www.w3.org/2001/XMLSchema-datatypes");
                    assert_eq!(type_, "int");
                    assert_eq!(params[0].name, "maxInclusive");
                }
                other => panic!("expected data pattern, got {other:?}"),
            },
            other => panic!("expected element, got {other:?}"),
        }
    }

    #[test]
    fn combine_interleave_merges_attrs_defines() {
        let p = parse("start = attrs\nattrs = text\nattrs &= empty").unwrap();
        match p {
            Pattern::Grammar(g) => {
                assert_eq!(g.defines.len(), 2);
                assert_eq!(g.defines[1].combine, Some(Combine::Interleave));
            }
            other => panic!("expected grammar, got {other:?}"),
        }
    }

    #[test]
    fn group_choice_and_quantifiers() {
        let p = parse("element root { (a, b)? | c+ }").unwrap();
        assert!(matches!(p, Pattern::Element(..)));
    }
}
