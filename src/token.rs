// Lark tokens

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Int(i64),
    StringLit(String),
    Ident(String),

    // Keywords
    Fn,
    Let,
    True,
    False,
    If,
    Else,
    Return,

    // Operators
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Bang,
    EqEq,
    NotEq,
    Lt,
    Gt,

    // Delimiters
    Comma,
    Semicolon,
    Colon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    Eof,
}

impl Token {
    pub fn keyword(ident: &str) -> Option<Token> {
        match ident {
            "fn"     => Some(Token::Fn),
            "let"    => Some(Token::Let),
            "true"   => Some(Token::True),
            "false"  => Some(Token::False),
            "if"     => Some(Token::If),
            "else"   => Some(Token::Else),
            "return" => Some(Token::Return),
            _        => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Int(n)       => write!(f, "{}", n),
            Token::StringLit(s) => write!(f, "\"{}\"", s),
            Token::Ident(s)     => write!(f, "{}", s),
            Token::Fn           => write!(f, "fn"),
            Token::Let          => write!(f, "let"),
            Token::True         => write!(f, "true"),
            Token::False        => write!(f, "false"),
            Token::If           => write!(f, "if"),
            Token::Else         => write!(f, "else"),
            Token::Return       => write!(f, "return"),
            Token::Assign       => write!(f, "="),
            Token::Plus         => write!(f, "+"),
            Token::Minus        => write!(f, "-"),
            Token::Star         => write!(f, "*"),
            Token::Slash        => write!(f, "/"),
            Token::Bang         => write!(f, "!"),
            Token::EqEq         => write!(f, "=="),
            Token::NotEq        => write!(f, "!="),
            Token::Lt           => write!(f, "<"),
            Token::Gt           => write!(f, ">"),
            Token::Comma        => write!(f, ","),
            Token::Semicolon    => write!(f, ";"),
            Token::Colon        => write!(f, ":"),
            Token::LParen       => write!(f, "("),
            Token::RParen       => write!(f, ")"),
            Token::LBrace       => write!(f, "{{"),
            Token::RBrace       => write!(f, "}}"),
            Token::LBracket     => write!(f, "["),
            Token::RBracket     => write!(f, "]"),
            Token::Eof          => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, col {}", self.line, self.col)
    }
}

#[derive(Debug, Clone)]
pub struct TokenWithSpan {
    pub token: Token,
    pub span: Span,
}
