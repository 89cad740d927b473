use crate::tokens::ParseError;
use crate::types::{BadArgCount, Term, TypeMismatch};
use derive_more::From;
use std::fmt;

pub type Result<T = Term> = std::result::Result<T, Error>;

#[derive(Debug, From)]
pub enum Error {
    Parse(ParseError),
    BadArgCount(BadArgCount),
    TypeMismatch(TypeMismatch),
    /// Holds the name of the procedure that saw the zero divisor.
    #[from(ignore)]
    DivideByZero(&'static str),
    #[from(ignore)]
    UnknownProcedure(String),
    /// `eval` outlived the evaluator it was bound to.
    #[from(ignore)]
    EvaluatorGone,
    /// A failure reported by an external evaluator.
    #[from(ignore)]
    Evaluation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "{}", e),
            Error::BadArgCount(e) => write!(f, "{}", e),
            Error::TypeMismatch(e) => write!(f, "type mismatch: {}", e),
            Error::DivideByZero(name) => write!(f, "{}: division by zero", name),
            Error::UnknownProcedure(name) => write!(f, "'{}' is not a builtin procedure", name),
            Error::EvaluatorGone => write!(f, "eval: the evaluator has been dropped"),
            Error::Evaluation(message) => write!(f, "eval: {}", message),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::BadArgCount(e) => Some(e),
            Error::TypeMismatch(e) => Some(e),
            _ => None,
        }
    }
}
