//! Recursive-descent parser for type signatures.
//!
//! Grammar:
//!
//! ```text
//! type    := app ("->" app)*
//! app     := atom atom*            -- only constructor heads take arguments
//! atom    := ident
//!          | "(" ")" | "(" type ("," type)* ")"
//!          | "{" [ident "|"] [field ("," field)*] "}"
//! field   := ident ":" type
//! ```

use super::{QualifiedName, Type};
use crate::error::ParseError;

/// Deepest bracket nesting accepted before parsing gives up.
const MAX_NESTING: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Arrow,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Pipe,
}

impl Token<'_> {
    fn text(&self) -> &str {
        match self {
            Token::Ident(s) => s,
            Token::Arrow => "->",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::Comma => ",",
            Token::Colon => ":",
            Token::Pipe => "|",
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\'' || c == '.'
}

fn tokenize(input: &str) -> Result<Vec<(Token<'_>, usize)>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        let token = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '-' => {
                chars.next();
                match chars.next() {
                    Some((_, '>')) => Token::Arrow,
                    _ => return Err(ParseError::UnexpectedChar { ch: c, position: start }),
                }
            }
            '(' | ')' | '{' | '}' | ',' | ':' | '|' => {
                chars.next();
                match c {
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    '{' => Token::LBrace,
                    '}' => Token::RBrace,
                    ',' => Token::Comma,
                    ':' => Token::Colon,
                    _ => Token::Pipe,
                }
            }
            c if is_ident_char(c) && c != '.' => {
                let mut end = start;
                while let Some(&(i, c)) = chars.peek() {
                    if !is_ident_char(c) {
                        break;
                    }
                    end = i + c.len_utf8();
                    chars.next();
                }
                Token::Ident(&input[start..end])
            }
            _ => return Err(ParseError::UnexpectedChar { ch: c, position: start }),
        };
        tokens.push((token, start));
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: Vec<(Token<'a>, usize)>,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn advance(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).map(|(token, _)| token.clone());
        self.pos += 1;
        token
    }

    fn unexpected(&self) -> ParseError {
        match self.tokens.get(self.pos) {
            Some((token, position)) => ParseError::UnexpectedToken {
                found: token.text().to_string(),
                position: *position,
            },
            None => ParseError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, expected: &Token<'_>) -> Result<(), ParseError> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn tipe(&mut self) -> Result<Type, ParseError> {
        let mut segments = vec![self.app()?];
        while self.peek() == Some(&Token::Arrow) {
            self.pos += 1;
            segments.push(self.app()?);
        }

        let result = match segments.pop().ok_or(ParseError::UnexpectedEnd)? {
            // `a -> (b -> c)` is the same function as `a -> b -> c`
            Type::Function { params, result } if !segments.is_empty() => {
                segments.extend(params);
                *result
            }
            result => result,
        };
        if segments.is_empty() {
            Ok(result)
        } else {
            Ok(Type::function(segments, result))
        }
    }

    fn app(&mut self) -> Result<Type, ParseError> {
        match self.atom()? {
            // `()` is a complete type and never takes arguments
            Type::Apply { name, mut args } if name.name != "()" => {
                while self.starts_atom() {
                    args.push(self.atom()?);
                }
                Ok(Type::Apply { name, args })
            }
            other => Ok(other),
        }
    }

    fn starts_atom(&self) -> bool {
        matches!(
            self.peek(),
            Some(Token::Ident(_) | Token::LParen | Token::LBrace)
        )
    }

    fn atom(&mut self) -> Result<Type, ParseError> {
        match self.advance() {
            Some(Token::Ident(ident)) => Ok(identifier(ident)),
            Some(Token::LParen) => self.nested(Self::parenthesized),
            Some(Token::LBrace) => self.nested(Self::record),
            _ => {
                self.pos -= 1;
                Err(self.unexpected())
            }
        }
    }

    fn nested(
        &mut self,
        inner: fn(&mut Self) -> Result<Type, ParseError>,
    ) -> Result<Type, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::TooDeep { limit: MAX_NESTING });
        }
        self.depth += 1;
        let result = inner(self);
        self.depth -= 1;
        result
    }

    fn parenthesized(&mut self) -> Result<Type, ParseError> {
        if self.peek() == Some(&Token::RParen) {
            self.pos += 1;
            return Ok(Type::Apply {
                name: QualifiedName::unit(),
                args: Vec::new(),
            });
        }

        let mut elements = vec![self.tipe()?];
        while self.peek() == Some(&Token::Comma) {
            self.pos += 1;
            elements.push(self.tipe()?);
        }
        self.expect(&Token::RParen)?;

        if elements.len() == 1 {
            Ok(elements.remove(0))
        } else {
            Ok(Type::Tuple { elements })
        }
    }

    fn record(&mut self) -> Result<Type, ParseError> {
        let mut extension = None;
        let mut fields = Vec::new();

        if self.peek() == Some(&Token::RBrace) {
            self.pos += 1;
            return Ok(Type::Record { fields, extension });
        }

        if let (Some(Token::Ident(name)), Some((Token::Pipe, _))) =
            (self.peek(), self.tokens.get(self.pos + 1))
        {
            extension = Some((*name).to_string());
            self.pos += 2;
        }

        loop {
            let label = match self.advance() {
                Some(Token::Ident(label)) => label.to_string(),
                _ => {
                    self.pos -= 1;
                    return Err(self.unexpected());
                }
            };
            self.expect(&Token::Colon)?;
            fields.push((label, self.tipe()?));

            match self.advance() {
                Some(Token::Comma) => {}
                Some(Token::RBrace) => break,
                _ => {
                    self.pos -= 1;
                    return Err(self.unexpected());
                }
            }
        }

        Ok(Type::Record { fields, extension })
    }
}

/// Lowercase identifiers are variables; capitalized or dotted ones are constructors.
fn identifier(ident: &str) -> Type {
    let capitalized = ident.chars().next().is_some_and(char::is_uppercase);
    if capitalized || ident.contains('.') {
        Type::Apply {
            name: QualifiedName::parse(ident),
            args: Vec::new(),
        }
    } else {
        Type::var(ident)
    }
}

/// Parse a signature, reporting why it failed.
pub fn try_parse(signature: &str) -> Result<Type, ParseError> {
    let tokens = tokenize(signature)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let tipe = parser.tipe()?;
    if parser.pos < parser.tokens.len() {
        return Err(parser.unexpected());
    }
    Ok(tipe)
}

/// Parse a signature. Never fails: unparseable text becomes a variable holding the
/// raw input.
pub fn parse(signature: &str) -> Type {
    try_parse(signature).unwrap_or_else(|error| {
        tracing::debug!("Falling back to raw variable for {:?}: {}", signature, error);
        Type::var(signature)
    })
}
