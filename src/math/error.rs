use super::parser::ParseError;
use thiserror::Error;

/// Failure to evaluate an assembled roll expression.
///
/// Every variant renders the same way to the user; the variants only differ in
/// what went wrong, for callers that care.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Error: non-math `{expr}`")]
    NonMath { expr: String, found: char },
    #[error("Error: non-math `{expr}`")]
    Parse {
        expr: String,
        #[source]
        source: ParseError,
    },
    #[error("Error: non-math `{expr}`")]
    Eval {
        expr: String,
        #[source]
        source: EvalError,
    },
}

#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum EvalError {
    #[error("cannot divide by zero")]
    ZeroDivision,
    #[error("arithmetic overflow")]
    Overflow,
}
