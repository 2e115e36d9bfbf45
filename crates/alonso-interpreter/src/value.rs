//! Runtime value types for the Alonso interpreter.

use std::fmt;
use std::rc::Rc;

use alonso_syntax::ast::Block;
use alonso_syntax::error::Result;

use crate::env::EnvRef;

/// A user-defined function: parameter names, body, and the environment that
/// was current when the declaration executed.
pub struct Function {
    pub params: Vec<String>,
    pub body: Block,
    pub env: EnvRef,
}

/// A built-in function registered at interpreter construction.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: fn(Vec<Value>) -> Result<Value>,
}

/// Runtime values.
///
/// Arrays and functions are reference-counted so that `==` on them compares
/// identity of the underlying value; numbers, strings, booleans and null
/// compare structurally.
#[derive(Clone)]
pub enum Value {
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
    Array(Rc<Vec<Value>>),
    Function(Rc<Function>),
    Builtin(Builtin),
}

impl Value {
    /// Uppercase type tag used in runtime error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "NUMBER",
            Value::Str(_) => "STRING",
            Value::Bool(_) => "BOOLEAN",
            Value::Null => "NULL",
            Value::Array(_) => "ARRAY",
            Value::Function(_) => "FUNCTION",
            Value::Builtin(_) => "BUILTIN",
        }
    }

    /// Null and false are falsy; every other value, including `0` and `""`,
    /// is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            _ => true,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a.func == b.func,
            _ => false,
        }
    }
}

/// The inspection form: what `telemetry` prints. Strings render verbatim,
/// without quotes.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Value::Null => write!(f, "null"),
            Value::Array(elems) => {
                write!(f, "[")?;
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", e)?;
                }
                write!(f, "]")
            }
            Value::Function(function) => {
                write!(f, "pace({}) {}", function.params.join(", "), function.body)
            }
            Value::Builtin(_) => write!(f, "builtin function"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
