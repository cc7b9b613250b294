//! Recursive-descent parser producing an expression tree.
//!
//! Precedence, lowest first:
//! `or`, `and`, `not`, comparisons, `+ -`, `* / // %`, unary `+ -`, `**`,
//! then calls, subscripts and attribute access.

use crate::expr::error::{EvalError, EvalResult};
use crate::expr::lexer::{Lexer, Spanned, Token};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Str(String),
    Bool(bool),
    None,
    List(Vec<Expr>),
    Name(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Possibly chained comparison: `a < b <= c`
    Compare {
        first: Box<Expr>,
        rest: Vec<(CompareOp, Expr)>,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Call {
        function: Box<Expr>,
        args: Vec<Expr>,
    },
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    Attribute {
        target: Box<Expr>,
        name: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Deepest expression tree the parser will build
pub const MAX_DEPTH: usize = 200;

/// Parse a complete expression
pub fn parse(input: &str) -> EvalResult<Expr> {
    let tokens = Lexer::new(input).tokenize()?;
    let mut parser = Parser {
        tokens,
        position: 0,
        end: input.chars().count(),
        depth: 0,
    };
    let expr = parser.parse_or()?;
    if let Some(extra) = parser.tokens.get(parser.position) {
        return Err(EvalError::syntax(
            extra.position,
            format!("unexpected token {:?}", extra.token),
        ));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Spanned>,
    position: usize,
    end: usize,
    /// Nesting levels and chained operators on the current path
    depth: usize,
}

impl Parser {
    fn enter(&mut self) -> EvalResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvalError::syntax(
                self.current_position(),
                "expression nested too deeply",
            ));
        }
        Ok(())
    }

    fn leave(&mut self, levels: usize) {
        self.depth -= levels;
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(|s| &s.token)
    }

    fn current_position(&self) -> usize {
        self.tokens
            .get(self.position)
            .map(|s| s.position)
            .unwrap_or(self.end)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).map(|s| s.token.clone());
        self.position += 1;
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token) -> EvalResult<()> {
        if self.eat(&expected) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("expected {:?}", expected)))
        }
    }

    fn unexpected(&self, message: &str) -> EvalError {
        match self.peek() {
            Some(token) => EvalError::syntax(
                self.current_position(),
                format!("{}, found {:?}", message, token),
            ),
            None => EvalError::syntax(
                self.end,
                format!("{}, found end of expression", message),
            ),
        }
    }

    fn parse_or(&mut self) -> EvalResult<Expr> {
        let mut left = self.parse_and()?;
        let mut chained = 0;
        while self.eat(&Token::Or) {
            self.enter()?;
            chained += 1;
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        self.leave(chained);
        Ok(left)
    }

    fn parse_and(&mut self) -> EvalResult<Expr> {
        let mut left = self.parse_not()?;
        let mut chained = 0;
        while self.eat(&Token::And) {
            self.enter()?;
            chained += 1;
            let right = self.parse_not()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        self.leave(chained);
        Ok(left)
    }

    fn parse_not(&mut self) -> EvalResult<Expr> {
        if self.eat(&Token::Not) {
            self.enter()?;
            let operand = self.parse_not()?;
            self.leave(1);
            return Ok(Expr::Not(Box::new(operand)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> EvalResult<Expr> {
        let first = self.parse_additive()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek() {
                Some(Token::Equal) => CompareOp::Eq,
                Some(Token::NotEqual) => CompareOp::Ne,
                Some(Token::Less) => CompareOp::Lt,
                Some(Token::LessEqual) => CompareOp::Le,
                Some(Token::Greater) => CompareOp::Gt,
                Some(Token::GreaterEqual) => CompareOp::Ge,
                _ => break,
            };
            self.advance();
            rest.push((op, self.parse_additive()?));
        }

        if rest.is_empty() {
            Ok(first)
        } else {
            Ok(Expr::Compare {
                first: Box::new(first),
                rest,
            })
        }
    }

    fn parse_additive(&mut self) -> EvalResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        let mut chained = 0;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            self.enter()?;
            chained += 1;
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
        self.leave(chained);
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> EvalResult<Expr> {
        let mut left = self.parse_unary()?;
        let mut chained = 0;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::SlashSlash) => BinaryOp::FloorDiv,
                Some(Token::Percent) => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            self.enter()?;
            chained += 1;
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }
        self.leave(chained);
        Ok(left)
    }

    fn parse_unary(&mut self) -> EvalResult<Expr> {
        let op = match self.peek() {
            Some(Token::Minus) => UnaryOp::Neg,
            Some(Token::Plus) => UnaryOp::Pos,
            _ => return self.parse_power(),
        };
        self.advance();
        self.enter()?;
        let operand = self.parse_unary()?;
        self.leave(1);
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_power(&mut self) -> EvalResult<Expr> {
        let base = self.parse_postfix()?;
        if self.eat(&Token::StarStar) {
            // right-associative, and `2 ** -1` is legal
            self.enter()?;
            let exponent = self.parse_unary()?;
            self.leave(1);
            return Ok(binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn parse_postfix(&mut self) -> EvalResult<Expr> {
        let mut expr = self.parse_primary()?;
        let mut chained = 0;
        loop {
            if matches!(
                self.peek(),
                Some(Token::LeftParen | Token::LeftBracket | Token::Dot)
            ) {
                self.enter()?;
                chained += 1;
            }
            if self.eat(&Token::LeftParen) {
                let args = self.parse_sequence(Token::RightParen)?;
                expr = Expr::Call {
                    function: Box::new(expr),
                    args,
                };
            } else if self.eat(&Token::LeftBracket) {
                let index = self.parse_or()?;
                self.expect(Token::RightBracket)?;
                expr = Expr::Index {
                    target: Box::new(expr),
                    index: Box::new(index),
                };
            } else if self.eat(&Token::Dot) {
                match self.advance() {
                    Some(Token::Identifier(name)) => {
                        expr = Expr::Attribute {
                            target: Box::new(expr),
                            name,
                        };
                    }
                    _ => {
                        self.position -= 1;
                        return Err(self.unexpected("expected attribute name"));
                    }
                }
            } else {
                self.leave(chained);
                return Ok(expr);
            }
        }
    }

    fn parse_primary(&mut self) -> EvalResult<Expr> {
        let position = self.current_position();
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Str(s)) => Ok(Expr::Str(s)),
            Some(Token::True) => Ok(Expr::Bool(true)),
            Some(Token::False) => Ok(Expr::Bool(false)),
            Some(Token::None) => Ok(Expr::None),
            Some(Token::Identifier(name)) => Ok(Expr::Name(name)),
            Some(Token::LeftParen) => {
                self.enter()?;
                let inner = self.parse_or()?;
                self.expect(Token::RightParen)?;
                self.leave(1);
                Ok(inner)
            }
            Some(Token::LeftBracket) => {
                self.enter()?;
                let items = self.parse_sequence(Token::RightBracket)?;
                self.leave(1);
                Ok(Expr::List(items))
            }
            Some(token) => Err(EvalError::syntax(
                position,
                format!("unexpected token {:?}", token),
            )),
            None => Err(EvalError::syntax(position, "unexpected end of expression")),
        }
    }

    /// Comma-separated expressions up to `close`; a trailing comma is allowed
    fn parse_sequence(&mut self, close: Token) -> EvalResult<Vec<Expr>> {
        let mut items = Vec::new();
        loop {
            if self.eat(&close) {
                return Ok(items);
            }
            items.push(self.parse_or()?);
            if !self.eat(&Token::Comma) {
                self.expect(close)?;
                return Ok(items);
            }
        }
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}
