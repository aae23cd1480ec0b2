// Lark error types

use std::io;

use thiserror::Error;

use crate::ast::InfixOp;
use crate::object::ObjectType;
use crate::token::Span;

/// A failure produced while evaluating a program.
///
/// Every variant is an ordinary, recoverable language error. The display
/// text is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("type mismatch: {left} {op} {right}")]
    TypeMismatch { left: ObjectType, op: InfixOp, right: ObjectType },

    #[error("unknown operator: {left} {op} {right}")]
    UnknownInfixOperator { left: ObjectType, op: InfixOp, right: ObjectType },

    #[error("unknown operator: -{0}")]
    UnknownNegation(ObjectType),

    #[error("undefined behavior with ! operator and {0}")]
    UnsupportedBang(ObjectType),

    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),

    #[error("Argument mismatch, function FUNCTION expected {expected} parameter(s), but got {got}")]
    ArityMismatch { expected: usize, got: usize },

    #[error("not a function: {0}")]
    NotAFunction(ObjectType),

    #[error("unusable as hash key: {0}")]
    UnusableHashKey(ObjectType),

    #[error("index operator not supported: {0}")]
    IndexNotSupported(ObjectType),

    #[error("division by zero")]
    DivisionByZero,

    #[error("wrong number of arguments to `{name}`: got={got}, want={want}")]
    BuiltinArity { name: &'static str, got: usize, want: usize },

    #[error("argument to `{name}` not supported, got {got}")]
    BuiltinArgument { name: &'static str, got: ObjectType },

    #[error("cannot write output: {0}")]
    Output(String),
}

/// A lexing or parsing failure, positioned at the offending token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {span}")]
pub struct SyntaxError {
    pub message: String,
    pub span: Span,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        SyntaxError { message: message.into(), span }
    }
}

/// Everything the front end can fail with.
#[derive(Debug, Error)]
pub enum LarkError {
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("{0}")]
    Runtime(#[from] RuntimeError),

    #[error("cannot read '{path}': {source}")]
    Read { path: String, source: io::Error },

    #[error("cannot write output: {0}")]
    Write(#[source] io::Error),

    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
}
