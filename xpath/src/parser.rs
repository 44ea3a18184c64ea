use crate::ast::{CmpOp, Expr, Func};
use crate::tokenizer::{tokenize, Token};

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

/// Parses a bounded XPath expression (spec §4.11's grammar) into an [`Expr`]. Returns `None` for
/// anything outside the grammar — an unsupported function, a path predicate, a trailing token —
/// which the caller folds into a translation miss.
pub(crate) fn parse(src: &str) -> Option<Expr> {
    let tokens = tokenize(src)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_or()?;
    if parser.pos != parser.tokens.len() {
        return None; // trailing, unconsumed tokens: outside the grammar
    }
    Some(expr)
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        self.pos += 1;
        tok
    }

    fn eat_ident(&mut self, word: &str) -> bool {
        if matches!(self.peek(), Some(Token::Ident(w)) if w == word) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_or(&mut self) -> Option<Expr> {
        let mut left = self.parse_and()?;
        while self.eat_ident("or") {
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Some(left)
    }

    fn parse_and(&mut self) -> Option<Expr> {
        let mut left = self.parse_not()?;
        while self.eat_ident("and") {
            let right = self.parse_not()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Some(left)
    }

    fn parse_not(&mut self) -> Option<Expr> {
        if self.eat_ident("not") {
            if !matches!(self.advance(), Some(Token::LParen)) {
                return None;
            }
            let inner = self.parse_or()?;
            if !matches!(self.advance(), Some(Token::RParen)) {
                return None;
            }
            return Some(Expr::Not(Box::new(inner)));
        }
        self.parse_cmp()
    }

    fn parse_cmp(&mut self) -> Option<Expr> {
        let left = self.parse_primary()?;
        let op = match self.peek() {
            Some(Token::Ge) => CmpOp::Ge,
            Some(Token::Le) => CmpOp::Le,
            Some(Token::Ne) => CmpOp::Ne,
            Some(Token::Gt) => CmpOp::Gt,
            Some(Token::Lt) => CmpOp::Lt,
            Some(Token::Eq) => CmpOp::Eq,
            _ => return Some(left),
        };
        self.pos += 1;
        let right = self.parse_primary()?;
        Some(Expr::Cmp(Box::new(left), op, Box::new(right)))
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        match self.advance()?.clone() {
            Token::Dollar => {
                if self.eat_ident("value") {
                    Some(Expr::Value)
                } else {
                    None
                }
            }
            Token::At => match self.advance()?.clone() {
                Token::Ident(name) => Some(Expr::Attribute(name)),
                _ => None,
            },
            Token::Number(n) => Some(Expr::Number(n)),
            Token::Str(s) => Some(Expr::StringLit(s)),
            Token::LParen => {
                let inner = self.parse_or()?;
                if !matches!(self.advance(), Some(Token::RParen)) {
                    return None;
                }
                Some(inner)
            }
            Token::Ident(name) => {
                if matches!(self.peek(), Some(Token::LParen)) {
                    self.parse_call(&name)
                } else {
                    self.parse_path(name)
                }
            }
            _ => None,
        }
    }

    fn parse_path(&mut self, first: String) -> Option<Expr> {
        let mut segments = vec![first];
        while matches!(self.peek(), Some(Token::Slash)) {
            self.pos += 1;
            match self.advance()?.clone() {
                Token::Ident(name) => segments.push(name),
                _ => return None,
            }
        }
        Some(Expr::Path(segments))
    }

    fn parse_call(&mut self, name: &str) -> Option<Expr> {
        let func = match name {
            "count" => Func::Count,
            "string-length" => Func::StringLength,
            "contains" => Func::Contains,
            "starts-with" => Func::StartsWith,
            "true" => Func::True,
            "false" => Func::False,
            _ => return None, // unsupported function name: translation miss
        };
        self.pos += 1; // consume '('
        let mut args = Vec::new();
        if !matches!(self.peek(), Some(Token::RParen)) {
            args.push(self.parse_or()?);
            while matches!(self.peek(), Some(Token::Comma)) {
                self.pos += 1;
                args.push(self.parse_or()?);
            }
        }
        if !matches!(self.advance(), Some(Token::RParen)) {
            return None;
        }
        let expected_arity = match func {
            Func::Count | Func::StringLength => 1,
            Func::Contains | Func::StartsWith => 2,
            Func::True | Func::False => 0,
        };
        if args.len() != expected_arity {
            return None;
        }
        Some(Expr::Call(func, args))
    }
}
