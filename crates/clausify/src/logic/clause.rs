//! Clauses and CNF formulas

use std::fmt;

use super::symbols::SymbolTable;
use super::term::{Op, Term};

/// A clause (disjunction of literals).
///
/// Each literal is an atom or a negated atom. An empty clause is false.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    pub literals: Vec<Term>,
}

/// A CNF formula (conjunction of clauses)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CNFFormula {
    pub clauses: Vec<Clause>,
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<Term>) -> Self {
        Clause { literals }
    }

    /// Check if this clause is empty (contradiction)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Check for a true literal or a complementary pair
    pub fn is_tautology(&self) -> bool {
        for (i, lit) in self.literals.iter().enumerate() {
            if literal_value(lit) == Some(true) {
                return true;
            }
            let complement = complement(lit);
            if self.literals[i + 1..].contains(&complement) {
                return true;
            }
        }
        false
    }

    /// The clause as a disjunction term `|(l1, ..., ln)`
    pub fn to_term(&self) -> Term {
        Term::or(self.literals.clone())
    }

    /// Format this clause with a symbol table for name resolution
    pub fn display<'a>(&'a self, symbols: &'a SymbolTable) -> ClauseDisplay<'a> {
        ClauseDisplay {
            clause: self,
            symbols: Some(symbols),
        }
    }
}

/// `true`, `~false` and friends
pub(crate) fn literal_value(lit: &Term) -> Option<bool> {
    match lit {
        Term::Bool(b) => Some(*b),
        Term::Compound(Op::Not, args) => literal_value(&args[0]).map(|b| !b),
        _ => None,
    }
}

fn complement(lit: &Term) -> Term {
    match lit {
        Term::Compound(Op::Not, args) => args[0].clone(),
        _ => Term::negate(lit.clone()),
    }
}

impl CNFFormula {
    pub fn new(clauses: Vec<Clause>) -> Self {
        CNFFormula { clauses }
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Clause> {
        self.clauses.iter()
    }

    /// The formula as a conjunction of disjunctions `&(|(..), ..)`
    pub fn to_term(&self) -> Term {
        Term::and(self.clauses.iter().map(Clause::to_term).collect())
    }

    /// Format this formula with a symbol table for name resolution
    pub fn display<'a>(&'a self, symbols: &'a SymbolTable) -> CNFDisplay<'a> {
        CNFDisplay {
            formula: self,
            symbols: Some(symbols),
        }
    }
}

impl<'a> IntoIterator for &'a CNFFormula {
    type Item = &'a Clause;
    type IntoIter = std::slice::Iter<'a, Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.iter()
    }
}

/// Display wrapper for Clause that includes a symbol table for name resolution
pub struct ClauseDisplay<'a> {
    clause: &'a Clause,
    symbols: Option<&'a SymbolTable>,
}

impl<'a> fmt::Display for ClauseDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clause.is_empty() {
            return write!(f, "$false");
        }
        for (i, lit) in self.clause.literals.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            match self.symbols {
                Some(symbols) => write!(f, "{}", lit.display(symbols))?,
                None => write!(f, "{}", lit)?,
            }
        }
        Ok(())
    }
}

/// One clause per line
pub struct CNFDisplay<'a> {
    formula: &'a CNFFormula,
    symbols: Option<&'a SymbolTable>,
}

impl<'a> fmt::Display for CNFDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.formula.clauses.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let display = ClauseDisplay {
                clause,
                symbols: self.symbols,
            };
            write!(f, "{}", display)?;
        }
        Ok(())
    }
}

// Display implementation that shows IDs (for debugging without symbols)
impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display = ClauseDisplay {
            clause: self,
            symbols: None,
        };
        write!(f, "{}", display)
    }
}

impl fmt::Display for CNFFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display = CNFDisplay {
            formula: self,
            symbols: None,
        };
        write!(f, "{}", display)
    }
}
