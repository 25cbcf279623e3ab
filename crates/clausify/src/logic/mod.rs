//! First-order logic data structures
//!
//! This module provides the fundamental types for representing formulas:
//! symbols, terms, environments, clauses, evaluation, unification and
//! isomorphism checking.

pub mod clause;
pub mod environment;
pub mod error;
pub mod evaluate;
pub mod isomorphism;
pub mod symbols;
pub mod term;
pub mod unification;

// Re-export commonly used types
pub use clause::{CNFDisplay, CNFFormula, Clause, ClauseDisplay};
pub use environment::{Environment, Substitution};
pub use error::TermError;
pub use evaluate::{evaluate, geq, gt, leq, lt};
pub use isomorphism::{isomorphic, isomorphic_clauses, Renaming, Symbol};
pub use symbols::{FunctionId, FunctionKind, SymbolTable, VariableId};
pub use term::{Function, Op, Quantifier, Term, TermDisplay, Variable};
pub use unification::{unify, unify_with, UnificationError, UnificationResult};
