//! Built-in functions, registered into the root environment at interpreter
//! construction.

use std::rc::Rc;

use alonso_syntax::err;
use alonso_syntax::error::Result;

use crate::env::EnvRef;
use crate::value::{Builtin, Value};

pub(crate) fn install(env: &EnvRef) {
    let builtins = [
        Builtin {
            name: "telemetry",
            func: telemetry,
        },
        Builtin {
            name: "length",
            func: length,
        },
        Builtin {
            name: "push",
            func: push,
        },
    ];
    let mut env = env.borrow_mut();
    for builtin in builtins {
        env.set(builtin.name, Value::Builtin(builtin));
    }
}

/// Prints each argument's inspection form separated by a single space,
/// followed by a newline.
fn telemetry(args: Vec<Value>) -> Result<Value> {
    let line = args
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    println!("{}", line);
    Ok(Value::Null)
}

/// Element count of an array or byte count of a string.
fn length(args: Vec<Value>) -> Result<Value> {
    if args.len() != 1 {
        return err!("wrong number of arguments. got={}, want=1", args.len());
    }
    match &args[0] {
        Value::Array(elems) => Ok(Value::Number(elems.len() as f64)),
        Value::Str(s) => Ok(Value::Number(s.len() as f64)),
        other => err!("argument to `length` not supported, got {}", other.type_name()),
    }
}

/// Returns a new array with the element appended; the input array is not
/// mutated.
fn push(args: Vec<Value>) -> Result<Value> {
    if args.len() != 2 {
        return err!("wrong number of arguments. got={}, want=2", args.len());
    }
    match &args[0] {
        Value::Array(elems) => {
            let mut out = elems.as_ref().clone();
            out.push(args[1].clone());
            Ok(Value::Array(Rc::new(out)))
        }
        other => err!("argument to `push` must be ARRAY, got {}", other.type_name()),
    }
}
