// ═══════════════════════════════════════════════════════════
// Lark Evaluator — tree-walking evaluator
// ═══════════════════════════════════════════════════════════

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ast::*;
use crate::builtins;
use crate::environment::Env;
use crate::error::RuntimeError;
use crate::object::{Function, HashPair, Object, ObjectType, NULL};

// ── Control flow signals ──────────────────────────────────────────────────────

/// Why evaluation of a statement sequence stopped early.
#[derive(Debug, Clone)]
pub enum Signal {
    Return(Object),
    Error(RuntimeError),
}

impl Signal {
    pub fn type_name(&self) -> ObjectType {
        match self {
            Signal::Return(_) => ObjectType::ReturnValue,
            Signal::Error(_)  => ObjectType::Error,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Return(v) => write!(f, "{}", v),
            Signal::Error(e)  => write!(f, "ERROR: {}", e),
        }
    }
}

impl From<RuntimeError> for Signal {
    fn from(e: RuntimeError) -> Self { Signal::Error(e) }
}

pub type EvalResult = std::result::Result<Object, Signal>;

// ── Statements ────────────────────────────────────────────────────────────────

/// Evaluates a whole program in `env`.
///
/// A top-level `return` ends the program with its value. `Ok(None)` means the
/// last statement produced no value (a `let`, or an empty program).
pub fn eval_program(program: &Program, env: &Env) -> Result<Option<Object>, RuntimeError> {
    debug!(statements = program.statements.len(), "evaluating program");
    let mut last = None;
    for stmt in &program.statements {
        match eval_statement(stmt, env) {
            Ok(v) => last = v,
            Err(Signal::Return(v)) => return Ok(Some(v)),
            Err(Signal::Error(e)) => {
                debug!(error = %e, "program failed");
                return Err(e);
            }
        }
    }
    Ok(last)
}

fn eval_statement(stmt: &Statement, env: &Env) -> Result<Option<Object>, Signal> {
    match stmt {
        Statement::Let(name, value) => {
            let val = eval_expression(value, env)?;
            env.set(&name.0, val);
            Ok(None)
        }

        Statement::Return(value) => {
            let val = eval_expression(value, env)?;
            Err(Signal::Return(val))
        }

        Statement::Expression(expr) => eval_expression(expr, env).map(Some),
    }
}

/// Runs `block` in the scope of its enclosing construct. Returns and errors
/// pass through untouched; they are unwrapped at call boundaries.
fn eval_block(block: &BlockStatement, env: &Env) -> EvalResult {
    let mut last = None;
    for stmt in &block.statements {
        last = eval_statement(stmt, env)?;
    }
    Ok(last.unwrap_or(NULL))
}

// ── Expressions ───────────────────────────────────────────────────────────────

pub fn eval_expression(expr: &Expression, env: &Env) -> EvalResult {
    match expr {
        Expression::Integer(n)   => Ok(Object::Integer(*n)),
        Expression::StringLit(s) => Ok(Object::string(s.as_str())),
        Expression::Boolean(b)   => Ok(Object::native_bool(*b)),

        Expression::Identifier(id) => eval_identifier(id, env),

        Expression::Prefix(op, right) => {
            let right = eval_expression(right, env)?;
            Ok(eval_prefix(*op, right)?)
        }

        Expression::Infix(left, op, right) => {
            let l = eval_expression(left, env)?;
            let r = eval_expression(right, env)?;
            Ok(eval_infix(*op, l, r)?)
        }

        Expression::If { condition, consequence, alternative } => {
            let cond = eval_expression(condition, env)?;
            if is_truthy(&cond) {
                eval_block(consequence, env)
            } else if let Some(alt) = alternative {
                eval_block(alt, env)
            } else {
                Ok(NULL)
            }
        }

        Expression::Function { parameters, body } => {
            Ok(Object::Function(Rc::new(Function {
                parameters: parameters.clone(),
                body: body.clone(),
                env: env.clone(),
            })))
        }

        Expression::Call(callee, args) => {
            let callee = eval_expression(callee, env)?;
            let args = eval_expressions(args, env)?;
            apply_function(callee, args)
        }

        Expression::Array(elems) => Ok(Object::array(eval_expressions(elems, env)?)),

        Expression::Index(left, index) => {
            let left = eval_expression(left, env)?;
            let index = eval_expression(index, env)?;
            Ok(eval_index(left, index)?)
        }

        Expression::Hash(pairs) => eval_hash_literal(pairs, env),
    }
}

/// Left to right, stopping at the first failure.
fn eval_expressions(exprs: &[Expression], env: &Env) -> std::result::Result<Vec<Object>, Signal> {
    exprs.iter().map(|e| eval_expression(e, env)).collect()
}

fn eval_identifier(id: &Identifier, env: &Env) -> EvalResult {
    if let Some(val) = env.get(&id.0) {
        return Ok(val);
    }
    if let Some(builtin) = builtins::lookup(&id.0) {
        return Ok(Object::Builtin(builtin));
    }
    Err(RuntimeError::IdentifierNotFound(id.0.clone()).into())
}

fn eval_hash_literal(pairs: &[(Expression, Expression)], env: &Env) -> EvalResult {
    let mut map = FxHashMap::default();
    for (key_expr, value_expr) in pairs {
        let key = eval_expression(key_expr, env)?;
        let hash_key = key
            .hash_key()
            .ok_or_else(|| RuntimeError::UnusableHashKey(key.type_name()))?;
        let value = eval_expression(value_expr, env)?;
        map.insert(hash_key, HashPair { key, value });
    }
    Ok(Object::hash(map))
}

// ── Calls ─────────────────────────────────────────────────────────────────────

pub fn apply_function(callee: Object, args: Vec<Object>) -> EvalResult {
    match callee {
        Object::Function(func) => {
            if func.parameters.len() != args.len() {
                return Err(RuntimeError::ArityMismatch {
                    expected: func.parameters.len(),
                    got: args.len(),
                }.into());
            }
            trace!(arity = args.len(), "calling function");
            let call_env = extend_function_env(&func, args);
            match eval_block(&func.body, &call_env) {
                Ok(v) => Ok(v),
                Err(Signal::Return(v)) => Ok(v),
                Err(e) => Err(e),
            }
        }
        Object::Builtin(builtin) => {
            trace!(name = builtin.name, "calling builtin");
            Ok((builtin.func)(&args)?)
        }
        other => Err(RuntimeError::NotAFunction(other.type_name()).into()),
    }
}

fn extend_function_env(func: &Function, args: Vec<Object>) -> Env {
    let env = Env::enclosed(&func.env);
    for (param, arg) in func.parameters.iter().zip(args) {
        env.set(&param.0, arg);
    }
    env
}

// ── Operators ─────────────────────────────────────────────────────────────────

fn eval_prefix(op: PrefixOp, right: Object) -> Result<Object, RuntimeError> {
    match op {
        PrefixOp::Bang => match right {
            Object::Boolean(b) => Ok(Object::native_bool(!b)),
            Object::Integer(n) => Ok(Object::native_bool(n == 0)),
            other => Err(RuntimeError::UnsupportedBang(other.type_name())),
        },
        PrefixOp::Neg => match right {
            Object::Integer(n) => Ok(Object::Integer(n.wrapping_neg())),
            other => Err(RuntimeError::UnknownNegation(other.type_name())),
        },
    }
}

fn eval_infix(op: InfixOp, left: Object, right: Object) -> Result<Object, RuntimeError> {
    match (&left, &right) {
        (Object::Integer(a), Object::Integer(b)) => eval_integer_infix(op, *a, *b),
        (Object::String(a), Object::String(b))   => eval_string_infix(op, a, b),
        _ => match op {
            InfixOp::Eq    => Ok(Object::native_bool(left == right)),
            InfixOp::NotEq => Ok(Object::native_bool(left != right)),
            _ if left.type_name() != right.type_name() => Err(RuntimeError::TypeMismatch {
                left: left.type_name(),
                op,
                right: right.type_name(),
            }),
            _ => Err(RuntimeError::UnknownInfixOperator {
                left: left.type_name(),
                op,
                right: right.type_name(),
            }),
        },
    }
}

fn eval_integer_infix(op: InfixOp, a: i64, b: i64) -> Result<Object, RuntimeError> {
    Ok(match op {
        InfixOp::Add   => Object::Integer(a.wrapping_add(b)),
        InfixOp::Sub   => Object::Integer(a.wrapping_sub(b)),
        InfixOp::Mul   => Object::Integer(a.wrapping_mul(b)),
        InfixOp::Div   => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Object::Integer(a.wrapping_div(b))
        }
        InfixOp::Eq    => Object::native_bool(a == b),
        InfixOp::NotEq => Object::native_bool(a != b),
        InfixOp::Lt    => Object::native_bool(a < b),
        InfixOp::Gt    => Object::native_bool(a > b),
    })
}

fn eval_string_infix(op: InfixOp, a: &str, b: &str) -> Result<Object, RuntimeError> {
    match op {
        InfixOp::Add   => Ok(Object::string(format!("{}{}", a, b))),
        InfixOp::Eq    => Ok(Object::native_bool(a == b)),
        InfixOp::NotEq => Ok(Object::native_bool(a != b)),
        _ => Err(RuntimeError::UnknownInfixOperator {
            left: ObjectType::String,
            op,
            right: ObjectType::String,
        }),
    }
}

fn eval_index(left: Object, index: Object) -> Result<Object, RuntimeError> {
    match (&left, &index) {
        (Object::Array(elems), Object::Integer(i)) => {
            let found = usize::try_from(*i)
                .ok()
                .and_then(|i| elems.borrow().get(i).cloned());
            Ok(found.unwrap_or(NULL))
        }
        (Object::Hash(pairs), _) => {
            let key = index
                .hash_key()
                .ok_or_else(|| RuntimeError::UnusableHashKey(index.type_name()))?;
            let found = pairs.borrow().get(&key).map(|p| p.value.clone());
            Ok(found.unwrap_or(NULL))
        }
        _ => Err(RuntimeError::IndexNotSupported(left.type_name())),
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Branch truthiness: only `false` and `null` are false. Note that `!` uses
/// numeric truthiness for integers instead.
pub fn is_truthy(val: &Object) -> bool {
    !matches!(val, Object::Null | Object::Boolean(false))
}

#[cfg(test)]
mod tests;
