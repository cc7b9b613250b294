//! Tokenizer for formula expressions.

use crate::expr::error::{EvalError, EvalResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Number(f64),
    Str(String),
    Identifier(String),

    // Keywords
    And,
    Or,
    Not,
    None,
    True,
    False,

    // Operators
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    SlashSlash,
    Percent,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    // Punctuation
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Comma,
    Dot,
}

/// A token with the character offset where it starts
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub position: usize,
}

pub struct Lexer {
    chars: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            chars: input.chars().collect(),
            position: 0,
        }
    }

    /// Tokenize the whole input
    pub fn tokenize(mut self) -> EvalResult<Vec<Spanned>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Get the next token, or None at end of input
    pub fn next_token(&mut self) -> EvalResult<Option<Spanned>> {
        self.skip_whitespace();

        let start = self.position;
        let Some(c) = self.current() else {
            return Ok(None);
        };

        let token = match c {
            '+' => self.single(Token::Plus),
            '-' => self.single(Token::Minus),
            '%' => self.single(Token::Percent),
            '(' => self.single(Token::LeftParen),
            ')' => self.single(Token::RightParen),
            '[' => self.single(Token::LeftBracket),
            ']' => self.single(Token::RightBracket),
            ',' => self.single(Token::Comma),
            '*' => self.either('*', Token::StarStar, Token::Star),
            '/' => self.either('/', Token::SlashSlash, Token::Slash),
            '<' => self.either('=', Token::LessEqual, Token::Less),
            '>' => self.either('=', Token::GreaterEqual, Token::Greater),
            '=' => {
                self.advance();
                if self.current() != Some('=') {
                    return Err(EvalError::syntax(
                        start,
                        "assignment is not allowed in an expression",
                    ));
                }
                self.advance();
                Token::Equal
            }
            '!' => {
                self.advance();
                if self.current() != Some('=') {
                    return Err(EvalError::syntax(start, "unexpected character '!'"));
                }
                self.advance();
                Token::NotEqual
            }
            '.' if self.peek().is_some_and(|p| p.is_ascii_digit()) => self.read_number(start)?,
            '.' => self.single(Token::Dot),
            '\'' | '"' => self.read_string(c, start)?,
            c if c.is_ascii_digit() => self.read_number(start)?,
            c if c.is_alphabetic() || c == '_' => self.read_identifier(),
            other => {
                return Err(EvalError::syntax(
                    start,
                    format!("unexpected character '{}'", other),
                ))
            }
        };

        Ok(Some(Spanned {
            token,
            position: start,
        }))
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    /// Two-character token if the next char is `next`, else the one-char token
    fn either(&mut self, next: char, double: Token, single: Token) -> Token {
        self.advance();
        if self.current() == Some(next) {
            self.advance();
            double
        } else {
            single
        }
    }

    fn skip_whitespace(&mut self) {
        while self.current().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn read_number(&mut self, start: usize) -> EvalResult<Token> {
        let mut text = String::new();
        while let Some(c) = self.current() {
            if c.is_ascii_digit() || c == '.' || c == '_' {
                if c != '_' {
                    text.push(c);
                }
                self.advance();
            } else if (c == 'e' || c == 'E') && !text.contains(['e', 'E']) {
                text.push(c);
                self.advance();
                if let Some(sign @ ('+' | '-')) = self.current() {
                    text.push(sign);
                    self.advance();
                }
            } else {
                break;
            }
        }

        text.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| EvalError::syntax(start, format!("invalid number '{}'", text)))
    }

    fn read_identifier(&mut self) -> Token {
        let mut ident = String::new();
        while let Some(c) = self.current() {
            if c.is_alphanumeric() || c == '_' {
                ident.push(c);
                self.advance();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            "None" => Token::None,
            "True" => Token::True,
            "False" => Token::False,
            _ => Token::Identifier(ident),
        }
    }

    fn read_string(&mut self, quote: char, start: usize) -> EvalResult<Token> {
        self.advance();
        let mut text = String::new();
        loop {
            match self.current() {
                None => return Err(EvalError::syntax(start, "unterminated string literal")),
                Some(c) if c == quote => {
                    self.advance();
                    return Ok(Token::Str(text));
                }
                Some('\\') => {
                    self.advance();
                    match self.current() {
                        Some(escaped) => {
                            text.push(escaped);
                            self.advance();
                        }
                        None => {
                            return Err(EvalError::syntax(start, "unterminated string literal"))
                        }
                    }
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            tokens("a ** 2 // b != c"),
            vec![
                Token::Identifier("a".to_string()),
                Token::StarStar,
                Token::Number(2.0),
                Token::SlashSlash,
                Token::Identifier("b".to_string()),
                Token::NotEqual,
                Token::Identifier("c".to_string()),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokens("1 2.5 .5 1e3 2.5E-2 1_000"),
            vec![
                Token::Number(1.0),
                Token::Number(2.5),
                Token::Number(0.5),
                Token::Number(1000.0),
                Token::Number(0.025),
                Token::Number(1000.0),
            ]
        );
    }

    #[test]
    fn test_attribute_access_is_not_a_number() {
        assert_eq!(
            tokens("np.pi"),
            vec![
                Token::Identifier("np".to_string()),
                Token::Dot,
                Token::Identifier("pi".to_string()),
            ]
        );
    }

    #[test]
    fn test_keywords_and_strings() {
        assert_eq!(
            tokens("not None and __aliases['A']"),
            vec![
                Token::Not,
                Token::None,
                Token::And,
                Token::Identifier("__aliases".to_string()),
                Token::LeftBracket,
                Token::Str("A".to_string()),
                Token::RightBracket,
            ]
        );
    }

    #[test]
    fn test_single_equals_rejected() {
        let err = Lexer::new("a = 1").tokenize().unwrap_err();
        assert!(matches!(err, EvalError::Syntax { position: 2, .. }));
    }

    #[test]
    fn test_unterminated_string() {
        assert!(Lexer::new("'abc").tokenize().is_err());
    }
}
