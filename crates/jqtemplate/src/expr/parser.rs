//! Precedence-climbing parser for directive expressions

use super::ast::{BinaryOp, Expr, Literal, UnaryOp};
use super::lexer::{tokenize, Token, TokenKind};
use crate::error::ParseError;
use crate::value::Value;

/// Deepest expression tree the parser accepts.
///
/// Parsing and evaluation both recurse once per level, so the bound keeps
/// a hostile attribute from exhausting the stack.
pub const MAX_EXPRESSION_DEPTH: usize = 128;

/// Parse a complete expression; trailing tokens are an error.
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expression()?;
    match parser.peek() {
        TokenKind::Eof => Ok(expr),
        other => Err(ParseError::new(
            format!("unexpected {} after expression", describe(other)),
            parser.offset(),
        )),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    // Nesting of the tree under construction
    depth: usize,
}

/// Binding power of an infix operator; higher binds tighter.
fn infix(kind: &TokenKind) -> Option<(BinaryOp, u8)> {
    let TokenKind::Punct(p) = kind else {
        return None;
    };
    let entry = match *p {
        "||" => (BinaryOp::Or, 1),
        "&&" => (BinaryOp::And, 2),
        "==" | "===" => (BinaryOp::Eq, 3),
        "!=" | "!==" => (BinaryOp::Ne, 3),
        "<" => (BinaryOp::Lt, 4),
        "<=" => (BinaryOp::Le, 4),
        ">" => (BinaryOp::Gt, 4),
        ">=" => (BinaryOp::Ge, 4),
        "+" => (BinaryOp::Add, 5),
        "-" => (BinaryOp::Sub, 5),
        "*" => (BinaryOp::Mul, 6),
        "/" => (BinaryOp::Div, 6),
        "%" => (BinaryOp::Rem, 6),
        _ => return None,
    };
    Some(entry)
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Number(n) => format!("number `{}`", n),
        TokenKind::String(s) => format!("string {:?}", s),
        TokenKind::Ident(name) => format!("identifier `{}`", name),
        TokenKind::Punct(p) => format!("`{}`", p),
        TokenKind::Eof => "end of expression".to_string(),
    }
}

impl Parser {
    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn offset(&self) -> usize {
        self.tokens[self.pos].offset
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.tokens[self.pos].kind.clone();
        if kind != TokenKind::Eof {
            self.pos += 1;
        }
        kind
    }

    fn eat(&mut self, punct: &str) -> bool {
        if matches!(self.peek(), TokenKind::Punct(p) if *p == punct) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_EXPRESSION_DEPTH {
            return Err(ParseError::new("expression nested too deeply", self.offset()));
        }
        Ok(())
    }

    fn expect(&mut self, punct: &str) -> Result<(), ParseError> {
        if self.eat(punct) {
            Ok(())
        } else {
            Err(ParseError::new(
                format!("expected `{}`, found {}", punct, describe(self.peek())),
                self.offset(),
            ))
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Precedence Levels
    // ═══════════════════════════════════════════════════════════════════

    fn expression(&mut self) -> Result<Expr, ParseError> {
        self.descend()?;
        let test = self.binary(1)?;
        let expr = if self.eat("?") {
            let consequent = self.expression()?;
            self.expect(":")?;
            let alternate = self.expression()?;
            Expr::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            }
        } else {
            test
        };
        self.depth -= 1;
        Ok(expr)
    }

    fn binary(&mut self, min_power: u8) -> Result<Expr, ParseError> {
        let depth = self.depth;
        let mut left = self.unary()?;
        while let Some((op, power)) = infix(self.peek()) {
            if power < min_power {
                break;
            }
            // Every operator wraps `left` one level deeper
            self.descend()?;
            self.advance();
            // Left-associative: the right side only takes tighter operators
            let right = self.binary(power + 1)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        self.depth = depth;
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        let op = if self.eat("!") {
            UnaryOp::Not
        } else if self.eat("-") {
            UnaryOp::Neg
        } else if self.eat("+") {
            UnaryOp::Plus
        } else {
            return self.postfix();
        };
        self.descend()?;
        let operand = self.unary()?;
        self.depth -= 1;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn postfix(&mut self) -> Result<Expr, ParseError> {
        let depth = self.depth;
        let mut expr = self.primary()?;
        loop {
            if matches!(self.peek(), TokenKind::Punct("." | "[" | "(")) {
                self.descend()?;
            }
            if self.eat(".") {
                let offset = self.offset();
                match self.advance() {
                    TokenKind::Ident(property) => {
                        expr = Expr::Member {
                            object: Box::new(expr),
                            property,
                        }
                    }
                    other => {
                        return Err(ParseError::new(
                            format!("expected property name, found {}", describe(&other)),
                            offset,
                        ))
                    }
                }
            } else if self.eat("[") {
                let index = self.expression()?;
                self.expect("]")?;
                expr = Expr::Index {
                    object: Box::new(expr),
                    index: Box::new(index),
                };
            } else if self.eat("(") {
                let args = self.list(")")?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                };
            } else {
                self.depth = depth;
                return Ok(expr);
            }
        }
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let offset = self.offset();
        match self.advance() {
            TokenKind::Number(n) => Ok(Expr::Literal(Literal::Number(n))),
            TokenKind::String(s) => Ok(Expr::Literal(Literal::String(s))),
            TokenKind::Ident(name) => Ok(match name.as_str() {
                "$this" => Expr::This,
                "true" => Expr::Literal(Literal::Bool(true)),
                "false" => Expr::Literal(Literal::Bool(false)),
                "null" => Expr::Literal(Literal::Null),
                "undefined" => Expr::Literal(Literal::Undefined),
                _ => Expr::Ident(name),
            }),
            TokenKind::Punct("(") => {
                let inner = self.expression()?;
                self.expect(")")?;
                Ok(inner)
            }
            TokenKind::Punct("[") => {
                self.descend()?;
                let items = self.list("]")?;
                self.depth -= 1;
                Ok(Expr::Array(items))
            }
            TokenKind::Punct("{") => {
                self.descend()?;
                let object = self.object()?;
                self.depth -= 1;
                Ok(object)
            }
            other => Err(ParseError::new(
                format!("unexpected {}", describe(&other)),
                offset,
            )),
        }
    }

    /// Comma-separated expressions up to `close`; a trailing comma is allowed.
    fn list(&mut self, close: &str) -> Result<Vec<Expr>, ParseError> {
        let mut items = Vec::new();
        while !self.eat(close) {
            items.push(self.expression()?);
            if !self.eat(",") {
                self.expect(close)?;
                break;
            }
        }
        Ok(items)
    }

    fn object(&mut self) -> Result<Expr, ParseError> {
        let mut fields = Vec::new();
        while !self.eat("}") {
            let offset = self.offset();
            let key = match self.advance() {
                TokenKind::Ident(name) => name,
                TokenKind::String(s) => s,
                // Numeric keys use their display spelling: `1`, not `1.0`
                TokenKind::Number(n) => Value::Number(n).to_string(),
                other => {
                    return Err(ParseError::new(
                        format!("expected property key, found {}", describe(&other)),
                        offset,
                    ))
                }
            };
            self.expect(":")?;
            fields.push((key, self.expression()?));
            if !self.eat(",") {
                self.expect("}")?;
                break;
            }
        }
        Ok(Expr::Object(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_literal() {
        let expr = parse("{array: $this.items, object: 'it'}").unwrap();
        assert_eq!(
            expr,
            Expr::Object(vec![
                (
                    "array".into(),
                    Expr::Member {
                        object: Box::new(Expr::This),
                        property: "items".into()
                    }
                ),
                ("object".into(), Expr::Literal(Literal::String("it".into()))),
            ])
        );
    }

    #[test]
    fn test_precedence() {
        // 1 + 2 * 3 == 7 parses as (1 + (2 * 3)) == 7
        let expr = parse("1 + 2 * 3 == 7").unwrap();
        let Expr::Binary { op, left, .. } = expr else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Eq);
        assert!(matches!(*left, Expr::Binary { op: BinaryOp::Add, .. }));
    }

    #[test]
    fn test_left_associative() {
        let expr = parse("8 - 4 - 2").unwrap();
        let Expr::Binary { left, right, .. } = expr else {
            panic!("expected binary");
        };
        assert!(matches!(*left, Expr::Binary { op: BinaryOp::Sub, .. }));
        assert_eq!(*right, Expr::Literal(Literal::Number(2.0)));
    }

    #[test]
    fn test_trailing_commas() {
        assert!(parse("[1, 2,]").is_ok());
        assert!(parse("{a: 1, 'b c': 2,}").is_ok());
        assert!(parse("f(1,)").is_ok());
    }

    #[test]
    fn test_syntax_errors() {
        assert!(parse("{array: }").is_err());
        assert!(parse("$this.").is_err());
        assert!(parse("(1 + 2").is_err());
        assert!(parse("1 2").is_err());
        assert!(parse("").is_err());
        let err = parse("a ? b").unwrap_err();
        assert_eq!(err.offset, 5);
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(5_000), ")".repeat(5_000));
        let err = parse(&deep).unwrap_err();
        assert_eq!(err.message, "expression nested too deeply");
        assert_eq!(err.offset, MAX_EXPRESSION_DEPTH);

        for source in [
            "!".repeat(1_000) + "1",
            "[".repeat(1_000),
            vec!["1"; 1_000].join(" + "),
            format!("$this{}", ".a".repeat(1_000)),
        ] {
            let err = parse(&source).unwrap_err();
            assert_eq!(err.message, "expression nested too deeply", "{}", &source[..8]);
        }
    }

    #[test]
    fn test_moderate_nesting_is_accepted() {
        let parens = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(parse(&parens).unwrap(), Expr::Literal(Literal::Number(1.0)));
        assert!(parse(&vec!["1"; 100].join(" + ")).is_ok());
        assert!(parse(&format!("{}1", "!".repeat(100))).is_ok());
    }
}
