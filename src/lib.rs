//! Lark: a small dynamically-typed scripting language with a tree-walking
//! evaluator.
//!
//! ```
//! let interp = lark::Interpreter::new();
//! let value = interp.eval("let add = fn(a, b) { a + b }; add(2, 3)").unwrap();
//! assert_eq!(value.map(|v| v.inspect()), Some("5".to_string()));
//! ```

pub mod ast;
pub mod builtins;
pub mod config;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod repl;
pub mod token;

pub use environment::Env;
pub use error::{LarkError, RuntimeError, SyntaxError};
pub use object::Object;

use ast::Program;
use lexer::Lexer;

/// Lexes and parses `source` into a program.
pub fn parse(source: &str) -> Result<Program, SyntaxError> {
    let tokens = Lexer::new(source).tokenize()?;
    parser::Parser::new(tokens).parse_program()
}

/// A top-level scope that successive inputs are evaluated in.
pub struct Interpreter {
    global: Env,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter { global: Env::new() }
    }

    pub fn env(&self) -> &Env {
        &self.global
    }

    /// Parses and evaluates `source`. Bindings made by earlier calls stay
    /// visible. `Ok(None)` means the input produced no value.
    pub fn eval(&self, source: &str) -> Result<Option<Object>, LarkError> {
        let program = parse(source)?;
        Ok(evaluator::eval_program(&program, &self.global)?)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
