// ═══════════════════════════════════════════════════════════
// Lark Objects — runtime values
// ═══════════════════════════════════════════════════════════

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::ast::{BlockStatement, Identifier};
use crate::environment::Env;
use crate::error::RuntimeError;

// ── Type tags ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Integer,
    Boolean,
    String,
    Null,
    Array,
    Hash,
    Function,
    Builtin,
    ReturnValue,
    Error,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ObjectType::Integer     => "INTEGER",
            ObjectType::Boolean     => "BOOLEAN",
            ObjectType::String      => "STRING",
            ObjectType::Null        => "NULL",
            ObjectType::Array       => "ARRAY",
            ObjectType::Hash        => "HASH",
            ObjectType::Function    => "FUNCTION",
            ObjectType::Builtin     => "BUILTIN",
            ObjectType::ReturnValue => "RETURN_VALUE",
            ObjectType::Error       => "ERROR",
        };
        write!(f, "{}", s)
    }
}

// ── Values ────────────────────────────────────────────────────────────────────

/// A Lark runtime value.
///
/// Scalars are stored inline; containers and closures live behind an `Rc`
/// so that cloning an `Object` shares the instance. Language equality is
/// by content for integers and strings and by identity for everything else.
#[derive(Clone, Debug)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(Rc<str>),
    Null,
    Array(Rc<RefCell<Vec<Object>>>),
    Hash(Rc<RefCell<FxHashMap<HashKey, HashPair>>>),
    Function(Rc<Function>),
    Builtin(&'static Builtin),
}

pub const TRUE: Object = Object::Boolean(true);
pub const FALSE: Object = Object::Boolean(false);
pub const NULL: Object = Object::Null;

impl Object {
    pub fn native_bool(b: bool) -> Object {
        if b { TRUE } else { FALSE }
    }

    pub fn string(s: impl Into<Rc<str>>) -> Object {
        Object::String(s.into())
    }

    pub fn array(elements: Vec<Object>) -> Object {
        Object::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn hash(pairs: FxHashMap<HashKey, HashPair>) -> Object {
        Object::Hash(Rc::new(RefCell::new(pairs)))
    }

    pub fn type_name(&self) -> ObjectType {
        match self {
            Object::Integer(_)  => ObjectType::Integer,
            Object::Boolean(_)  => ObjectType::Boolean,
            Object::String(_)   => ObjectType::String,
            Object::Null        => ObjectType::Null,
            Object::Array(_)    => ObjectType::Array,
            Object::Hash(_)     => ObjectType::Hash,
            Object::Function(_) => ObjectType::Function,
            Object::Builtin(_)  => ObjectType::Builtin,
        }
    }

    /// Human-readable rendering, as printed by the REPL.
    pub fn inspect(&self) -> String {
        self.to_string()
    }

    /// The key under which this value is stored in a hash, if it can be one.
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Object::Integer(n) => Some(HashKey::Integer(*n)),
            Object::Boolean(b) => Some(HashKey::Boolean(*b)),
            Object::String(s)  => Some(HashKey::String(Rc::clone(s))),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Integer(a), Object::Integer(b))   => a == b,
            (Object::String(a), Object::String(b))     => a == b,
            // TRUE, FALSE and NULL are the only instances of their kind.
            (Object::Boolean(a), Object::Boolean(b))   => a == b,
            (Object::Null, Object::Null)               => true,
            (Object::Array(a), Object::Array(b))       => Rc::ptr_eq(a, b),
            (Object::Hash(a), Object::Hash(b))         => Rc::ptr_eq(a, b),
            (Object::Function(a), Object::Function(b)) => Rc::ptr_eq(a, b),
            (Object::Builtin(a), Object::Builtin(b))   => std::ptr::eq(*a, *b),
            _ => false,
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Integer(n) => write!(f, "{}", n),
            Object::Boolean(b) => write!(f, "{}", b),
            Object::String(s)  => write!(f, "{}", s),
            Object::Null       => write!(f, "null"),
            Object::Array(v)   => {
                write!(f, "[")?;
                for (i, x) in v.borrow().iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", x)?;
                }
                write!(f, "]")
            }
            Object::Hash(m) => {
                write!(f, "{{")?;
                for (i, pair) in m.borrow().values().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}: {}", pair.key, pair.value)?;
                }
                write!(f, "}}")
            }
            Object::Function(func) => write!(f, "{}", func),
            Object::Builtin(b)     => write!(f, "builtin function {}", b.name),
        }
    }
}

// ── Hash keys ─────────────────────────────────────────────────────────────────

/// Content-derived key: equal content gives an equal key regardless of
/// which instance produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    String(Rc<str>),
}

#[derive(Debug, Clone)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

// ── Callables ─────────────────────────────────────────────────────────────────

/// A closure: parameters and body plus the scope it was defined in.
pub struct Function {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: Env,
}

// The captured scope usually contains the function itself, so it is left out.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn(")?;
        for (i, p) in self.parameters.iter().enumerate() {
            if i > 0 { write!(f, ", ")?; }
            write!(f, "{}", p)?;
        }
        write!(f, ") {{ {} }}", self.body)
    }
}

pub type BuiltinFn = fn(&[Object]) -> Result<Object, RuntimeError>;

pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Builtin").field(&self.name).finish()
    }
}
