//! Signals that statements hand back to their enclosing construct.

use crate::value::Value;

/// Outcome of executing one statement. Ordinary evaluation yields
/// `Normal`; the other three unwind until something owns them: a function
/// call absorbs `Return`, the innermost loop absorbs `Break` and
/// `Continue`. Runtime failures take the `Err` side of `Result` and are
/// never represented here.
#[derive(Debug)]
pub(crate) enum Flow {
    Normal(Value),
    Return(Value),
    Break,
    Continue,
}
