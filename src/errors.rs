use std::error::Error as StdError;
use std::fmt;

use crate::value::ValueKind;

/// The kind of an error (non-exhaustive)
#[non_exhaustive]
#[derive(Debug)]
pub enum ErrorKind {
    /// Generic error
    Msg(String),
    /// The template is malformed: a token or block is never closed or a
    /// statement header can't be read.
    Syntax {
        /// What went wrong
        message: String,
        /// The input from the offending token onwards
        tail: String,
    },
    /// The right hand side of a condition could not be converted to the kind of
    /// the left hand side. Only raised when strict conditions are enabled.
    Condition {
        /// The literal as written in the template
        literal: String,
        /// The kind it had to be converted to
        kind: ValueKind,
    },
    /// An error happened while serializing a value into the context
    Json(serde_json::Error),
}

/// The Error type
#[derive(Debug)]
pub struct Error {
    /// Kind of error
    pub kind: ErrorKind,
    source: Option<Box<dyn StdError + Sync + Send>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::Msg(ref message) => write!(f, "{}", message),
            ErrorKind::Syntax { ref message, ref tail } => {
                write!(f, "Syntax error, {}: `{}`", message, tail)
            }
            ErrorKind::Condition { ref literal, ref kind } => {
                write!(f, "Condition literal `{}` can't be converted to {}", literal, kind)
            }
            ErrorKind::Json(ref e) => write!(f, "{}", e),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_ref().map(|c| &**c as &(dyn StdError + 'static))
    }
}

impl Error {
    /// Creates generic error
    pub fn msg(value: impl ToString) -> Self {
        Self { kind: ErrorKind::Msg(value.to_string()), source: None }
    }

    /// Creates generic error with a source
    pub fn chain(value: impl ToString, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self { kind: ErrorKind::Msg(value.to_string()), source: Some(source.into()) }
    }

    /// Creates a syntax error. `tail` is the unmatched part of the input.
    pub fn syntax(message: impl ToString, tail: impl ToString) -> Self {
        Self {
            kind: ErrorKind::Syntax { message: message.to_string(), tail: tail.to_string() },
            source: None,
        }
    }

    /// Creates a condition conversion error
    pub fn condition(literal: impl ToString, kind: ValueKind) -> Self {
        Self { kind: ErrorKind::Condition { literal: literal.to_string(), kind }, source: None }
    }

    /// Creates JSON error
    pub fn json(value: serde_json::Error) -> Self {
        Self { kind: ErrorKind::Json(value), source: None }
    }

    /// The unmatched input carried by a syntax error
    pub fn tail(&self) -> Option<&str> {
        match self.kind {
            ErrorKind::Syntax { ref tail, .. } => Some(tail),
            _ => None,
        }
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Self::msg(e)
    }
}
impl From<String> for Error {
    fn from(e: String) -> Self {
        Self::msg(e)
    }
}
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::json(e)
    }
}

/// Convenient wrapper around std::Result.
pub type Result<T> = ::std::result::Result<T, Error>;
