// Lark Abstract Syntax Tree

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    // let name = value
    Let(Identifier, Expression),

    // return value
    Return(Expression),

    // Expression statement
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    // Literals
    Identifier(Identifier),
    Integer(i64),
    StringLit(String),
    Boolean(bool),

    // Operators
    Prefix(PrefixOp, Box<Expression>),
    Infix(Box<Expression>, InfixOp, Box<Expression>),

    // if (condition) { consequence } else { alternative }
    If {
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },

    // fn(params) { body }
    Function {
        parameters: Vec<Identifier>,
        body: BlockStatement,
    },

    // callee(args)
    Call(Box<Expression>, Vec<Expression>),

    // Collections
    Array(Vec<Expression>),
    Hash(Vec<(Expression, Expression)>),

    // left[index]
    Index(Box<Expression>, Box<Expression>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    Bang,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
    Add, Sub, Mul, Div,
    Eq, NotEq, Lt, Gt,
}

// ── Source rendering ──────────────────────────────────────────────────────────

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixOp::Bang => write!(f, "!"),
            PrefixOp::Neg  => write!(f, "-"),
        }
    }
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InfixOp::Add   => "+",
            InfixOp::Sub   => "-",
            InfixOp::Mul   => "*",
            InfixOp::Div   => "/",
            InfixOp::Eq    => "==",
            InfixOp::NotEq => "!=",
            InfixOp::Lt    => "<",
            InfixOp::Gt    => ">",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, x) in items.iter().enumerate() {
        if i > 0 { write!(f, ", ")?; }
        write!(f, "{}", x)?;
    }
    Ok(())
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.statements {
            write!(f, "{}", s)?;
        }
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let(name, value) => write!(f, "let {} = {};", name, value),
            Statement::Return(value)    => write!(f, "return {};", value),
            Statement::Expression(e)    => write!(f, "{}", e),
        }
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.statements {
            write!(f, "{}", s)?;
        }
        Ok(())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(id) => write!(f, "{}", id),
            Expression::Integer(n)     => write!(f, "{}", n),
            Expression::StringLit(s)   => write!(f, "\"{}\"", s),
            Expression::Boolean(b)     => write!(f, "{}", b),
            Expression::Prefix(op, right) => write!(f, "({}{})", op, right),
            Expression::Infix(left, op, right) => write!(f, "({} {} {})", left, op, right),
            Expression::If { condition, consequence, alternative } => {
                write!(f, "if {} {{ {} }}", condition, consequence)?;
                if let Some(alt) = alternative {
                    write!(f, " else {{ {} }}", alt)?;
                }
                Ok(())
            }
            Expression::Function { parameters, body } => {
                write!(f, "fn(")?;
                write_list(f, parameters)?;
                write!(f, ") {{ {} }}", body)
            }
            Expression::Call(callee, args) => {
                write!(f, "{}(", callee)?;
                write_list(f, args)?;
                write!(f, ")")
            }
            Expression::Array(elems) => {
                write!(f, "[")?;
                write_list(f, elems)?;
                write!(f, "]")
            }
            Expression::Hash(pairs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Expression::Index(left, index) => write!(f, "({}[{}])", left, index),
        }
    }
}
