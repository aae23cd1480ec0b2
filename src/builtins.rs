// ═══════════════════════════════════════════════════════════
// Lark Built-ins — native functions
// ═══════════════════════════════════════════════════════════

use std::io::{self, Write};

use crate::error::RuntimeError;
use crate::object::{Builtin, Object, NULL};

static BUILTINS: [Builtin; 6] = [
    Builtin { name: "len",   func: len },
    Builtin { name: "first", func: first },
    Builtin { name: "last",  func: last },
    Builtin { name: "rest",  func: rest },
    Builtin { name: "push",  func: push },
    Builtin { name: "puts",  func: puts },
];

/// Finds the built-in bound to `name`. Each name has exactly one entry, so
/// repeated lookups return the same instance.
pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|b| b.name == name)
}

pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|b| b.name)
}

fn check_arity(name: &'static str, args: &[Object], want: usize) -> Result<(), RuntimeError> {
    if args.len() != want {
        return Err(RuntimeError::BuiltinArity { name, got: args.len(), want });
    }
    Ok(())
}

fn array_arg(name: &'static str, arg: &Object) -> Result<Vec<Object>, RuntimeError> {
    match arg {
        Object::Array(v) => Ok(v.borrow().clone()),
        other => Err(RuntimeError::BuiltinArgument { name, got: other.type_name() }),
    }
}

fn len(args: &[Object]) -> Result<Object, RuntimeError> {
    check_arity("len", args, 1)?;
    let n = match &args[0] {
        Object::String(s) => s.chars().count(),
        Object::Array(v)  => v.borrow().len(),
        Object::Hash(m)   => m.borrow().len(),
        other => return Err(RuntimeError::BuiltinArgument { name: "len", got: other.type_name() }),
    };
    Ok(Object::Integer(n as i64))
}

fn first(args: &[Object]) -> Result<Object, RuntimeError> {
    check_arity("first", args, 1)?;
    let elems = array_arg("first", &args[0])?;
    Ok(elems.first().cloned().unwrap_or(NULL))
}

fn last(args: &[Object]) -> Result<Object, RuntimeError> {
    check_arity("last", args, 1)?;
    let elems = array_arg("last", &args[0])?;
    Ok(elems.last().cloned().unwrap_or(NULL))
}

fn rest(args: &[Object]) -> Result<Object, RuntimeError> {
    check_arity("rest", args, 1)?;
    let elems = array_arg("rest", &args[0])?;
    match elems.split_first() {
        Some((_, tail)) => Ok(Object::array(tail.to_vec())),
        None => Ok(NULL),
    }
}

fn push(args: &[Object]) -> Result<Object, RuntimeError> {
    check_arity("push", args, 2)?;
    let mut elems = array_arg("push", &args[0])?;
    elems.push(args[1].clone());
    Ok(Object::array(elems))
}

fn puts(args: &[Object]) -> Result<Object, RuntimeError> {
    write_lines(&mut io::stdout().lock(), args)
}

fn write_lines(out: &mut impl Write, args: &[Object]) -> Result<Object, RuntimeError> {
    for arg in args {
        writeln!(out, "{}", arg).map_err(|e| RuntimeError::Output(e.to_string()))?;
    }
    Ok(NULL)
}
