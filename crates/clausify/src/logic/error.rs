//! Construction errors for terms

use thiserror::Error;

/// A violated construction contract.
///
/// These indicate a caller bug; the panicking constructors on
/// [`Term`](super::Term) surface them immediately.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TermError {
    #[error("operator {op} expects {expected} argument(s), got {found}")]
    ArityMismatch {
        op: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    #[error("quantifier {0} needs at least one bound variable")]
    EmptyBinders(&'static str),

    #[error("bound position {0} of quantifier is not a variable")]
    NotAVariable(usize),

    #[error("invalid {kind} literal: {text}")]
    InvalidNumber { kind: &'static str, text: String },

    #[error("{0} is not a finite number")]
    NotFinite(f64),
}

pub type Result<T> = std::result::Result<T, TermError>;
