//! Assembles a [`Document`] from the raw markup declarations the tokenizer produces: `ENTITY`
//! declarations are collected first (so parameter entities are known before content specs and
//! attribute lists are expanded), then `ELEMENT` and `ATTLIST` bodies are expanded and parsed
//! (spec §4.5).

use std::collections::HashMap;

use crate::content_model;
use crate::error::DtdError;
use crate::model::{AttlistDecl, AttrDefault, AttrType, AttributeDef, ContentSpec, Document, ElementDecl, EntityDecl};
use crate::parameter_entities;
use crate::tokenizer::{self, RawDecl};

pub fn parse_document(input: &str) -> Result<Document, DtdError> {
    let decls = tokenizer::tokenize(input)?;

    let entities = decls
        .iter()
        .filter(|d| d.keyword == "ENTITY")
        .map(|d| parse_entity_decl(&d.body))
        .collect::<Result<Vec<_>, _>>()?;

    let parameter_entities: HashMap<String, String> = entities
        .iter()
        .filter(|e| e.parameter)
        .map(|e| (e.name.clone(), e.replacement_text.clone()))
        .collect();

    let mut elements = Vec::new();
    let mut attlists = Vec::new();

    for decl in &decls {
        match decl.keyword.as_str() {
            "ELEMENT" => elements.push(parse_element_decl(decl, &parameter_entities)?),
            "ATTLIST" => attlists.push(parse_attlist_decl(decl, &parameter_entities)?),
            "ENTITY" | "NOTATION" => {} // entities already collected; notations aren't modeled
            other => return Err(DtdError::UnknownDeclarationKeyword(other.to_string())),
        }
    }

    Ok(Document { elements, attlists, entities })
}

fn parse_element_decl(decl: &RawDecl, pe: &HashMap<String, String>) -> Result<ElementDecl, DtdError> {
    let expanded = parameter_entities::expand_outside_quotes(&decl.body, pe)?;
    let (name, spec_raw) = split_first_token(&expanded)
        .ok_or_else(|| DtdError::MalformedContentSpec(format!("missing content spec in {:?}", decl.body)))?;
    let content_spec = content_model::parse_content_spec(spec_raw)?;
    Ok(ElementDecl { name: name.to_string(), content_spec })
}

fn parse_attlist_decl(decl: &RawDecl, pe: &HashMap<String, String>) -> Result<AttlistDecl, DtdError> {
    let expanded = parameter_entities::expand_outside_quotes(&decl.body, pe)?;
    let mut c = Cursor::new(&expanded);
    let element = c.parse_token().ok_or_else(|| DtdError::MalformedAttlist(decl.body.clone()))?;

    let mut attributes = Vec::new();
    loop {
        c.skip_ws();
        if c.at_end() {
            break;
        }
        let name = c.parse_token().ok_or_else(|| DtdError::MalformedAttlist(decl.body.clone()))?;
        c.skip_ws();
        let type_ = parse_attr_type(&mut c, &decl.body)?;
        c.skip_ws();
        let default = parse_attr_default(&mut c, &decl.body)?;
        attributes.push(AttributeDef { name: name.to_string(), type_, default });
    }

    Ok(AttlistDecl { element: element.to_string(), attributes })
}

fn parse_attr_type(c: &mut Cursor, raw: &str) -> Result<AttrType, DtdError> {
    if c.peek() == Some('(') {
        let values = c.parse_paren_list().ok_or_else(|| DtdError::MalformedAttlist(raw.to_string()))?;
        return Ok(AttrType::Enumeration(values));
    }
    let keyword = c.parse_token().ok_or_else(|| DtdError::MalformedAttlist(raw.to_string()))?;
    match keyword {
        "CDATA" => Ok(AttrType::CData),
        "ID" => Ok(AttrType::Id),
        "IDREF" => Ok(AttrType::IdRef),
        "IDREFS" => Ok(AttrType::IdRefs),
        "NMTOKEN" => Ok(AttrType::NmToken),
        "NMTOKENS" => Ok(AttrType::NmTokens),
        "ENTITY" => Ok(AttrType::Entity),
        "ENTITIES" => Ok(AttrType::Entities),
        "NOTATION" => {
            c.skip_ws();
            let values = c.parse_paren_list().ok_or_else(|| DtdError::MalformedAttlist(raw.to_string()))?;
            Ok(AttrType::Notation(values))
        }
        other => Err(DtdError::MalformedAttlist(format!("unknown attribute type {other:?} in {raw:?}"))),
    }
}

fn parse_attr_default(c: &mut Cursor, raw: &str) -> Result<AttrDefault, DtdError> {
    if c.peek() == Some('#') {
        c.bump();
        let keyword = c.parse_token().ok_or_else(|| DtdError::MalformedAttlist(raw.to_string()))?;
        return match keyword {
            "REQUIRED" => Ok(AttrDefault::Required),
            "IMPLIED" => Ok(AttrDefault::Implied),
            "FIXED" => {
                c.skip_ws();
                let value = c.parse_quoted().ok_or_else(|| DtdError::MalformedAttlist(raw.to_string()))?;
                Ok(AttrDefault::Fixed(value))
            }
            other => Err(DtdError::MalformedAttlist(format!("unknown default kind #{other} in {raw:?}"))),
        };
    }
    let value = c.parse_quoted().ok_or_else(|| DtdError::MalformedAttlist(raw.to_string()))?;
    Ok(AttrDefault::Value(value))
}

fn parse_entity_decl(raw: &str) -> Result<EntityDecl, DtdError> {
    let mut c = Cursor::new(raw);
    c.skip_ws();
    let parameter = if c.peek() == Some('%') {
        c.bump();
        c.skip_ws();
        true
    } else {
        false
    };
    let name = c.parse_token().ok_or_else(|| DtdError::MalformedEntity(raw.to_string()))?.to_string();
    c.skip_ws();
    let replacement_text = match c.peek() {
        Some('"') | Some('\'') => c.parse_quoted().ok_or_else(|| DtdError::MalformedEntity(raw.to_string()))?,
        _ => String::new(), // external (SYSTEM/PUBLIC) entity: identifier resolution is out of scope
    };
    Ok(EntityDecl { name, parameter, replacement_text })
}

/// Splits off the first whitespace-delimited token, returning `(token, rest_trimmed)`.
fn split_first_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    let end = s.find(char::is_whitespace)?;
    Some((&s[..end], s[end..].trim_start()))
}

/// A minimal cursor for the flat `NAME TYPE DEFAULT ...` token stream inside `ATTLIST` and
/// `ENTITY` bodies (as distinct from [`content_model`]'s grammar, which needs to track nested
/// groups).
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

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// A run of non-whitespace, non-`(`/`)`/`|` characters.
    fn parse_token(&mut self) -> Option<&'a str> {
        self.skip_ws();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, '(' | ')' | '|') {
                break;
            }
            self.bump();
        }
        (self.pos > start).then(|| &self.input[start..self.pos])
    }

    fn parse_quoted(&mut self) -> Option<String> {
        self.skip_ws();
        let quote = self.peek().filter(|c| *c == '"' || *c == '\'')?;
        self.bump();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == quote {
                break;
            }
            self.bump();
        }
        let value = self.input[start..self.pos].to_string();
        self.bump(); // closing quote
        Some(value)
    }

    /// `"(" NAME ("|" NAME)* ")"`, used for both `ENUMERATION` and `NOTATION` attribute types.
    fn parse_paren_list(&mut self) -> Option<Vec<String>> {
        self.skip_ws();
        if self.bump() != Some('(') {
            return None;
        }
        let mut values = vec![self.parse_token()?.to_string()];
        loop {
            self.skip_ws();
            match self.peek() {
                Some('|') => {
                    self.bump();
                    values.push(self.parse_token()?.to_string());
                }
                Some(')') => {
                    self.bump();
                    break;
                }
                _ => return None,
            }
        }
        Some(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Quantifier, Separator, Term};

    #[test]
    fn parses_element_and_attlist() {
        let doc = parse_document(
            r#"<!ELEMENT book (title, author*)>
               <!ATTLIST book isbn CDATA #REQUIRED lang CDATA "en">"#,
        )
        .unwrap();
        assert_eq!(doc.elements.len(), 1);
        assert_eq!(doc.elements[0].name, "book");
        assert_eq!(doc.attlists.len(), 1);
        assert_eq!(doc.attlists[0].element, "book");
        assert_eq!(doc.attlists[0].attributes.len(), 2);
        assert_eq!(doc.attlists[0].attributes[0].type_, AttrType::CData);
        assert_eq!(doc.attlists[0].attributes[0].default, AttrDefault::Required);
        assert_eq!(doc.attlists[0].attributes[1].default, AttrDefault::Value("en".into()));
    }

    #[test]
    fn parses_enumeration_and_notation_attributes() {
        let doc = parse_document(
            r#"<!ATTLIST choice kind (yes|no) #IMPLIED fmt NOTATION (png|jpeg) #FIXED "png">"#,
        )
        .unwrap();
        let attrs = &doc.attlists[0].attributes;
        assert_eq!(attrs[0].type_, AttrType::Enumeration(vec!["yes".into(), "no".into()]));
        assert_eq!(attrs[1].type_, AttrType::Notation(vec!["png".into(), "jpeg".into()]));
        assert_eq!(attrs[1].default, AttrDefault::Fixed("png".into()));
    }

    #[test]
    fn expands_parameter_entities_in_element_content() {
        let doc = parse_document(
            r#"<!ENTITY % inline "b|i">
               <!ELEMENT p (#PCDATA|%inline;)*>"#,
        )
        .unwrap();
        assert_eq!(doc.entities.len(), 1);
        assert!(doc.entities[0].parameter);
        match &doc.elements[0].content_spec {
            ContentSpec::Mixed { names } => assert_eq!(names, &vec!["b".to_string(), "i".to_string()]),
            other => panic!("unexpected content spec: {other:?}"),
        }
    }

    #[test]
    fn unknown_declaration_keyword_is_an_error() {
        assert!(matches!(
            parse_document("<!BOGUS foo>"),
            Err(DtdError::UnknownDeclarationKeyword(k)) if k == "BOGUS"
        ));
    }

    #[test]
    fn parses_nested_group_content() {
        let doc = parse_document("<!ELEMENT chapter ((title,para+)|appendix)>").unwrap();
        match &doc.elements[0].content_spec {
            ContentSpec::Children(p) => match &p.term {
                Term::Group { separator, items } => {
                    assert_eq!(*separator, Separator::Choice);
                    assert_eq!(items.len(), 2);
                    assert_eq!(p.quantifier, Quantifier::One);
                }
                other => panic!("unexpected term: {other:?}"),
            },
            other => panic!("unexpected content spec: {other:?}"),
        }
    }
}
