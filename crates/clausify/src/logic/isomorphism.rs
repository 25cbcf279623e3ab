//! Equality up to consistent renaming
//!
//! Two terms are isomorphic when one can be turned into the other by a
//! bijective renaming of variables and function symbols. The bijection is
//! discovered during the walk and kept in a side map ([`Renaming`]); terms are
//! never touched.
//!
//! Bare variables and bare function symbols may be renamed freely. The head of
//! a call may only be renamed when at least one side is a symbol introduced by
//! the converter (Skolem or definition); otherwise the heads must be the same
//! symbol. This lets converted clause sets be compared without knowing which
//! fresh symbols were minted, while `p(X)` and `q(X)` stay distinct.

use super::clause::Clause;
use super::environment::Environment;
use super::symbols::{FunctionId, VariableId};
use super::term::{Function, Term};

/// A renameable identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Var(VariableId),
    Fun(FunctionId),
}

/// A partial bijection between the symbols of two terms
#[derive(Debug, Clone, Default)]
pub struct Renaming {
    forward: Environment<Symbol, Symbol>,
    backward: Environment<Symbol, Symbol>,
}

impl Renaming {
    pub fn new() -> Self {
        Renaming::default()
    }

    /// Number of symbol pairs discovered so far
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// The symbol `symbol` on the left is mapped to, if any
    pub fn image(&self, symbol: Symbol) -> Option<Symbol> {
        self.forward.get(&symbol).copied()
    }

    /// Extend the renaming so that `a` and `b` correspond, if consistent
    pub fn check(&self, a: &Term, b: &Term) -> Option<Renaming> {
        match (a, b) {
            (Term::Variable(x), Term::Variable(y)) => {
                self.bind(Symbol::Var(x.id), Symbol::Var(y.id))
            }
            (Term::Fun(f), Term::Fun(g)) => self.bind(Symbol::Fun(f.id), Symbol::Fun(g.id)),
            (Term::Call(f, args1), Term::Call(g, args2)) => {
                if args1.len() != args2.len() || !heads_compatible(*f, *g) {
                    return None;
                }
                let renaming = self.bind(Symbol::Fun(f.id), Symbol::Fun(g.id))?;
                renaming.check_all(args1, args2)
            }
            (Term::Compound(op1, args1), Term::Compound(op2, args2)) => {
                if op1 != op2 || args1.len() != args2.len() {
                    return None;
                }
                self.check_all(args1, args2)
            }
            (Term::Quantified(q1, vars1, body1), Term::Quantified(q2, vars2, body2)) => {
                if q1 != q2 || vars1.len() != vars2.len() {
                    return None;
                }
                let renaming = vars1
                    .iter()
                    .zip(vars2.iter())
                    .try_fold(self.clone(), |r, (x, y)| {
                        r.bind(Symbol::Var(x.id), Symbol::Var(y.id))
                    })?;
                renaming.check(body1, body2)
            }
            // Booleans, distinct objects and numbers are never renamed
            _ => (a == b).then(|| self.clone()),
        }
    }

    /// Pairwise check of two equally long sequences
    pub fn check_all(&self, a: &[Term], b: &[Term]) -> Option<Renaming> {
        if a.len() != b.len() {
            return None;
        }
        a.iter()
            .zip(b)
            .try_fold(self.clone(), |r, (x, y)| r.check(x, y))
    }

    /// Literal-by-literal check of two clauses
    pub fn check_clause(&self, a: &Clause, b: &Clause) -> Option<Renaming> {
        self.check_all(&a.literals, &b.literals)
    }

    fn bind(&self, left: Symbol, right: Symbol) -> Option<Renaming> {
        match (self.forward.get(&left), self.backward.get(&right)) {
            (None, None) => Some(Renaming {
                forward: self.forward.add(left, right),
                backward: self.backward.add(right, left),
            }),
            (Some(image), Some(preimage)) if *image == right && *preimage == left => {
                Some(self.clone())
            }
            _ => None,
        }
    }
}

fn heads_compatible(f: Function, g: Function) -> bool {
    f.id == g.id || f.kind.is_generated() || g.kind.is_generated()
}

/// Check whether two terms are equal up to a consistent renaming
pub fn isomorphic(a: &Term, b: &Term) -> bool {
    Renaming::new().check(a, b).is_some()
}

/// Check two clause lists clause by clause, sharing one renaming throughout
pub fn isomorphic_clauses(a: &[Clause], b: &[Clause]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b)
        .try_fold(Renaming::new(), |r, (x, y)| r.check_clause(x, y))
        .is_some()
}
