// ═══════════════════════════════════════════════════════════
// Lark Parser — turns tokens into AST
// ═══════════════════════════════════════════════════════════

use tracing::trace;

use crate::ast::*;
use crate::error::SyntaxError;
use crate::token::{Span, Token, TokenWithSpan};

pub struct Parser {
    tokens: Vec<TokenWithSpan>,
    pos: usize,
}

type ParseResult<T> = Result<T, SyntaxError>;

impl Parser {
    /// `tokens` must end with `Token::Eof`, as produced by the lexer.
    pub fn new(tokens: Vec<TokenWithSpan>) -> Self {
        Parser { tokens, pos: 0 }
    }

    // ── Token navigation ──────────────────────────────────────────────────────

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).map(|t| &t.token).unwrap_or(&Token::Eof)
    }

    fn span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| t.span)
            .unwrap_or(Span { line: 1, col: 1 })
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() { self.pos += 1; }
    }

    fn check(&self, t: &Token) -> bool { self.peek() == t }

    fn eat(&mut self, t: &Token) -> bool {
        if self.check(t) { self.advance(); true } else { false }
    }

    fn expect(&mut self, expected: &Token) -> ParseResult<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}', got '{}'", expected, self.peek())))
        }
    }

    fn expect_ident(&mut self) -> ParseResult<Identifier> {
        match self.peek().clone() {
            Token::Ident(name) => { self.advance(); Ok(Identifier(name)) }
            other => Err(self.error(format!("expected identifier, got '{}'", other))),
        }
    }

    fn error(&self, message: String) -> SyntaxError {
        SyntaxError::new(message, self.span())
    }

    // ── Top-level parsing ─────────────────────────────────────────────────────

    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let mut statements = Vec::new();
        while !self.check(&Token::Eof) {
            statements.push(self.parse_stmt()?);
        }
        trace!(statements = statements.len(), "parsed program");
        Ok(Program { statements })
    }

    // ── Statements ────────────────────────────────────────────────────────────

    fn parse_stmt(&mut self) -> ParseResult<Statement> {
        let stmt = match self.peek().clone() {
            Token::Let => self.parse_let()?,
            Token::Return => {
                self.advance();
                Statement::Return(self.parse_expr()?)
            }
            _ => Statement::Expression(self.parse_expr()?),
        };
        self.eat(&Token::Semicolon);
        Ok(stmt)
    }

    fn parse_let(&mut self) -> ParseResult<Statement> {
        self.expect(&Token::Let)?;
        let name = self.expect_ident()?;
        self.expect(&Token::Assign)?;
        let value = self.parse_expr()?;
        Ok(Statement::Let(name, value))
    }

    fn parse_block(&mut self) -> ParseResult<BlockStatement> {
        self.expect(&Token::LBrace)?;
        let mut statements = Vec::new();
        while !self.check(&Token::RBrace) && !self.check(&Token::Eof) {
            statements.push(self.parse_stmt()?);
        }
        self.expect(&Token::RBrace)?;
        Ok(BlockStatement { statements })
    }

    // ── Expressions (lowest to highest precedence) ────────────────────────────

    pub fn parse_expr(&mut self) -> ParseResult<Expression> {
        self.parse_equality()
    }

    fn parse_equality(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match self.peek() {
                Token::EqEq  => InfixOp::Eq,
                Token::NotEq => InfixOp::NotEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison()?;
            left = Expression::Infix(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_addition()?;
        loop {
            let op = match self.peek() {
                Token::Lt => InfixOp::Lt,
                Token::Gt => InfixOp::Gt,
                _ => break,
            };
            self.advance();
            let right = self.parse_addition()?;
            left = Expression::Infix(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    fn parse_addition(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_multiplication()?;
        loop {
            let op = match self.peek() {
                Token::Plus  => InfixOp::Add,
                Token::Minus => InfixOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplication()?;
            left = Expression::Infix(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    fn parse_multiplication(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Token::Star  => InfixOp::Mul,
                Token::Slash => InfixOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expression::Infix(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expression> {
        match self.peek().clone() {
            Token::Minus => { self.advance(); Ok(Expression::Prefix(PrefixOp::Neg, Box::new(self.parse_unary()?))) }
            Token::Bang  => { self.advance(); Ok(Expression::Prefix(PrefixOp::Bang, Box::new(self.parse_unary()?))) }
            _            => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek().clone() {
                Token::LParen => {
                    self.advance();
                    let args = self.parse_list(&Token::RParen)?;
                    expr = Expression::Call(Box::new(expr), args);
                }
                Token::LBracket => {
                    self.advance();
                    let idx = self.parse_expr()?;
                    self.expect(&Token::RBracket)?;
                    expr = Expression::Index(Box::new(expr), Box::new(idx));
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// Comma-separated expressions up to and including `close`.
    fn parse_list(&mut self, close: &Token) -> ParseResult<Vec<Expression>> {
        let mut items = Vec::new();
        while !self.check(close) && !self.check(&Token::Eof) {
            items.push(self.parse_expr()?);
            if !self.eat(&Token::Comma) { break; }
        }
        self.expect(close)?;
        Ok(items)
    }

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        match self.peek().clone() {
            Token::Int(n)       => { self.advance(); Ok(Expression::Integer(n)) }
            Token::StringLit(s) => { self.advance(); Ok(Expression::StringLit(s)) }
            Token::True         => { self.advance(); Ok(Expression::Boolean(true)) }
            Token::False        => { self.advance(); Ok(Expression::Boolean(false)) }
            Token::Ident(name)  => { self.advance(); Ok(Expression::Identifier(Identifier(name))) }

            Token::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }

            Token::LBracket => {
                self.advance();
                Ok(Expression::Array(self.parse_list(&Token::RBracket)?))
            }

            Token::LBrace => self.parse_hash(),
            Token::If     => self.parse_if(),
            Token::Fn     => self.parse_function(),

            other => Err(self.error(format!("unexpected '{}' in expression", other))),
        }
    }

    fn parse_hash(&mut self) -> ParseResult<Expression> {
        self.expect(&Token::LBrace)?;
        let mut pairs = Vec::new();
        while !self.check(&Token::RBrace) && !self.check(&Token::Eof) {
            let key = self.parse_expr()?;
            self.expect(&Token::Colon)?;
            let value = self.parse_expr()?;
            pairs.push((key, value));
            if !self.eat(&Token::Comma) { break; }
        }
        self.expect(&Token::RBrace)?;
        Ok(Expression::Hash(pairs))
    }

    fn parse_if(&mut self) -> ParseResult<Expression> {
        self.expect(&Token::If)?;
        self.expect(&Token::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(&Token::RParen)?;
        let consequence = self.parse_block()?;
        let alternative = if self.eat(&Token::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Expression::If { condition: Box::new(condition), consequence, alternative })
    }

    fn parse_function(&mut self) -> ParseResult<Expression> {
        self.expect(&Token::Fn)?;
        self.expect(&Token::LParen)?;
        let mut parameters = Vec::new();
        while !self.check(&Token::RParen) {
            parameters.push(self.expect_ident()?);
            if !self.eat(&Token::Comma) { break; }
        }
        self.expect(&Token::RParen)?;
        let body = self.parse_block()?;
        Ok(Expression::Function { parameters, body })
    }
}
