//! Diagnostics shared by every stage of the Alonso pipeline.
//!
//! Two kinds of failure exist in the toolchain and one type covers both.
//! Lexical and parse diagnostics point at the token that triggered them, so
//! they carry a [`Span`]; runtime failures are position-free because the
//! evaluator reports them by message alone (`identifier not found: lap`,
//! `division by zero`, …). Drivers prepend their own `Parser error:` /
//! `Runtime error:` prefixes, so [`Error::message`] stays prefix-free and
//! position-free.
//!
//! The [`err!`] macro builds a ready-made `Err` for the common case of a
//! formatted runtime failure:
//!
//! ```rust
//! use alonso_syntax::err;
//! use alonso_syntax::error::Result;
//!
//! fn checked_div(a: f64, b: f64) -> Result<f64> {
//!     if b == 0.0 {
//!         return err!("division by zero");
//!     }
//!     Ok(a / b)
//! }
//! ```

use std::fmt;

/// 1-based position of a diagnostic in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// A failure from any stage of the pipeline.
///
/// ```rust
/// use alonso_syntax::error::{Error, Span};
///
/// let lost = Error::runtime("identifier not found: lap");
/// assert_eq!(lost.to_string(), "identifier not found: lap");
/// assert!(lost.span().is_none());
///
/// let bad = Error::parse("invalid assignment target", Span { line: 7, col: 2 });
/// assert_eq!(bad.to_string(), "invalid assignment target at 7:2");
/// ```
#[derive(Debug, Clone)]
pub struct Error {
    msg: String,
    span: Option<Span>,
}

impl Error {
    /// A position-free failure, the way the evaluator reports them.
    pub fn runtime(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            span: None,
        }
    }

    /// A diagnostic anchored to the token that triggered it.
    pub fn parse(msg: impl Into<String>, span: Span) -> Self {
        Self {
            msg: msg.into(),
            span: Some(span),
        }
    }

    /// The message text, without any position suffix.
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Where the diagnostic points, when it points anywhere.
    pub fn span(&self) -> Option<Span> {
        self.span
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            Some(span) => write!(f, "{} at {}", self.msg, span),
            None => f.write_str(&self.msg),
        }
    }
}

impl std::error::Error for Error {}

/// Pipeline-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Expands to `Err(Error::runtime(format!(…)))`, usable anywhere a
/// `Result` expression is expected, including match arms and early
/// returns.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        Err($crate::error::Error::runtime(format!($($arg)*)))
    };
}
