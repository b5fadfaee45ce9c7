//! Tokenizer for directive expressions

use crate::error::ParseError;

/// Token kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Numeric literal
    Number(f64),
    /// String literal (escapes already resolved)
    String(String),
    /// Identifier or keyword; `$` is an identifier character
    Ident(String),
    /// Operator or delimiter
    Punct(&'static str),
    /// End of input
    Eof,
}

/// A token with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What was lexed
    pub kind: TokenKind,
    /// Byte offset into the source
    pub offset: usize,
}

// Longest spellings first so `===` wins over `==` and `=`.
const PUNCTS: &[&str] = &[
    "===", "!==", "==", "!=", "<=", ">=", "&&", "||", "{", "}", "[", "]", "(", ")", ",", ":", ".",
    "?", "!", "+", "-", "*", "/", "%", "<", ">",
];

/// Split `source` into tokens, ending with `Eof`.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer { source, pos: 0 };
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }

        let offset = self.pos;
        let Some(c) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                offset,
            });
        };

        let kind = if c == '\'' || c == '"' {
            self.string(c)?
        } else if c.is_ascii_digit()
            || (c == '.' && self.rest()[1..].starts_with(|d: char| d.is_ascii_digit()))
        {
            self.number()?
        } else if is_ident_start(c) {
            let start = self.pos;
            while self.peek().is_some_and(is_ident_continue) {
                self.bump();
            }
            TokenKind::Ident(self.source[start..self.pos].to_string())
        } else if let Some(p) = PUNCTS.iter().find(|p| self.rest().starts_with(**p)) {
            self.pos += p.len();
            TokenKind::Punct(p)
        } else {
            return Err(ParseError::new(format!("unexpected character `{}`", c), offset));
        };

        Ok(Token { kind, offset })
    }

    fn number(&mut self) -> Result<TokenKind, ParseError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        if self.peek() == Some('.') {
            self.bump();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
        }
        let text = &self.source[start..self.pos];
        text.parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| ParseError::new(format!("invalid number `{}`", text), start))
    }

    fn string(&mut self, quote: char) -> Result<TokenKind, ParseError> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(ParseError::new("unterminated string", start));
            };
            if c == quote {
                return Ok(TokenKind::String(out));
            }
            if c != '\\' {
                out.push(c);
                continue;
            }
            let escape_at = self.pos - 1;
            match self.bump() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('0') => out.push('\0'),
                Some('u') => {
                    let hex = self.rest().get(..4).unwrap_or("");
                    let ch = u32::from_str_radix(hex, 16)
                        .ok()
                        .filter(|_| hex.len() == 4)
                        .and_then(char::from_u32)
                        .ok_or_else(|| ParseError::new("invalid unicode escape", escape_at))?;
                    self.pos += 4;
                    out.push(ch);
                }
                // \\ \' \" and any other escaped character stand for themselves
                Some(other) => out.push(other),
                None => return Err(ParseError::new("unterminated string", start)),
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
