//! Clausify: conjunctive normal form for first-order logic
//!
//! This library converts first-order formulas into clauses for a resolution
//! or tableau prover, and provides the symbolic operations such a prover
//! needs alongside them: structural equality, constant folding, syntactic
//! unification with occurs check, and isomorphism checking.
//!
//! ```
//! use clausify::{convert, SymbolTable, Term};
//!
//! let mut symbols = SymbolTable::new();
//! let p = symbols.new_function(Some("p"));
//! let x = symbols.new_variable(Some("X"));
//! let y = symbols.new_variable(Some("Y"));
//!
//! // ![X]: ?[Y]: p(X, Y)
//! let formula = Term::forall(
//!     vec![x],
//!     Term::exists(vec![y], Term::call(p, vec![Term::Variable(x), Term::Variable(y)])),
//! );
//!
//! let cnf = convert(&formula, &mut symbols);
//! assert_eq!(cnf.display(&symbols).to_string(), "p(X,sk0(X))");
//! ```

pub mod config;
pub mod logic;
pub mod normal_form;

pub use config::ConverterConfig;

// Re-export commonly used types from logic
pub use logic::{
    evaluate, geq, gt, isomorphic, isomorphic_clauses, leq, lt, unify, unify_with, CNFDisplay,
    CNFFormula, Clause, ClauseDisplay, Environment, Function, FunctionId, FunctionKind, Op,
    Quantifier, Renaming, Substitution, Symbol, SymbolTable, Term, TermDisplay, TermError,
    UnificationError, UnificationResult, Variable, VariableId,
};

pub use normal_form::{convert, convert_with_config, lower_not, Converter};
