// Lark Lexer — tokenizes source text

use tracing::trace;

use crate::error::SyntaxError;
use crate::token::{Span, Token, TokenWithSpan};

pub struct Lexer {
    source: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn peek2(&self) -> Option<char> {
        self.source.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.source.get(self.pos).copied();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        ch
    }

    fn current_span(&self) -> Span {
        Span { line: self.line, col: self.col }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_string(&mut self, start: Span) -> Result<Token, SyntaxError> {
        let mut result = String::new();
        loop {
            match self.advance() {
                None => return Err(SyntaxError::new("unterminated string literal", start)),
                Some('"') => break,
                Some('\\') => {
                    match self.advance() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('"') => result.push('"'),
                        Some('\\') => result.push('\\'),
                        Some(c) => { result.push('\\'); result.push(c); }
                        None => return Err(SyntaxError::new("unterminated escape", start)),
                    }
                }
                Some(c) => result.push(c),
            }
        }
        Ok(Token::StringLit(result))
    }

    fn read_number(&mut self, first: char, start: Span) -> Result<Token, SyntaxError> {
        let mut s = String::new();
        s.push(first);
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        s.parse::<i64>()
            .map(Token::Int)
            .map_err(|_| SyntaxError::new(format!("integer literal '{}' out of range", s), start))
    }

    fn read_ident(&mut self, first: char) -> Token {
        let mut s = String::new();
        s.push(first);
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        Token::keyword(&s).unwrap_or(Token::Ident(s))
    }

    pub fn tokenize(&mut self) -> Result<Vec<TokenWithSpan>, SyntaxError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            let span = self.current_span();

            let ch = match self.peek() {
                None => {
                    tokens.push(TokenWithSpan { token: Token::Eof, span });
                    break;
                }
                Some(c) => c,
            };

            // Comments
            if ch == '/' && self.peek2() == Some('/') {
                while let Some(c) = self.peek() {
                    if c == '\n' { break; }
                    self.advance();
                }
                continue;
            }

            self.advance();

            let token = match ch {
                '"' => self.read_string(span)?,
                c if c.is_ascii_digit() => self.read_number(c, span)?,
                c if c.is_ascii_alphabetic() || c == '_' => self.read_ident(c),
                '+' => Token::Plus,
                '-' => Token::Minus,
                '*' => Token::Star,
                '/' => Token::Slash,
                '=' => {
                    if self.peek() == Some('=') { self.advance(); Token::EqEq }
                    else { Token::Assign }
                }
                '!' => {
                    if self.peek() == Some('=') { self.advance(); Token::NotEq }
                    else { Token::Bang }
                }
                '<' => Token::Lt,
                '>' => Token::Gt,
                '(' => Token::LParen,
                ')' => Token::RParen,
                '{' => Token::LBrace,
                '}' => Token::RBrace,
                '[' => Token::LBracket,
                ']' => Token::RBracket,
                ',' => Token::Comma,
                ':' => Token::Colon,
                ';' => Token::Semicolon,
                _ => return Err(SyntaxError::new(format!("unexpected character '{}'", ch), span)),
            };

            tokens.push(TokenWithSpan { token, span });
        }

        trace!(count = tokens.len(), "tokenized");
        Ok(tokens)
    }
}
