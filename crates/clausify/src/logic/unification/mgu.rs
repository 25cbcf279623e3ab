//! Most General Unifier (MGU) computation

use thiserror::Error;

use crate::logic::environment::Substitution;
use crate::logic::symbols::FunctionId;
use crate::logic::term::{Op, Term, Variable};

/// Result of a unification attempt
pub type UnificationResult = Result<Substitution, UnificationError>;

/// Reasons two terms do not unify
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnificationError {
    /// Occurs check failed - variable occurs in term
    #[error("variable {} occurs in {1}", .0.id)]
    OccursCheck(Variable, Term),

    /// Function symbols don't match
    #[error("function symbol {0} does not match {1}")]
    FunctionClash(FunctionId, FunctionId),

    /// Connectives or predicates don't match
    #[error("operator {0} does not match {1}")]
    OperatorClash(Op, Op),

    /// Arities don't match
    #[error("arity {0} does not match {1}")]
    ArityMismatch(usize, usize),

    /// Any other pair of distinct terms
    #[error("{0} does not unify with {1}")]
    Clash(Term, Term),
}

/// Unify two terms, returning a most general unifier (MGU) if one exists
pub fn unify(term1: &Term, term2: &Term) -> UnificationResult {
    unify_with(term1, term2, &Substitution::new())
}

/// Unify two terms under an existing substitution.
///
/// On success the result extends `subst`; `subst` itself is never modified,
/// so the caller can keep it to backtrack to.
pub fn unify_with(term1: &Term, term2: &Term, subst: &Substitution) -> UnificationResult {
    unify_terms(term1, term2, subst.clone())
}

fn unify_terms(term1: &Term, term2: &Term, subst: Substitution) -> UnificationResult {
    let t1 = resolve(term1, &subst).clone();
    let t2 = resolve(term2, &subst).clone();

    match (&t1, &t2) {
        // Same term - nothing to do
        _ if t1 == t2 => Ok(subst),

        (Term::Variable(v), t) | (t, Term::Variable(v)) => {
            if occurs(*v, t, &subst) {
                Err(UnificationError::OccursCheck(*v, t.clone()))
            } else {
                let (key, value) = (Term::Variable(*v), t.clone());
                Ok(subst.add(key, value))
            }
        }

        (Term::Call(f1, args1), Term::Call(f2, args2)) => {
            if f1.id != f2.id {
                return Err(UnificationError::FunctionClash(f1.id, f2.id));
            }
            unify_args(args1, args2, subst)
        }

        (Term::Compound(op1, args1), Term::Compound(op2, args2)) => {
            if op1 != op2 {
                return Err(UnificationError::OperatorClash(*op1, *op2));
            }
            unify_args(args1, args2, subst)
        }

        (Term::Quantified(q1, vars1, body1), Term::Quantified(q2, vars2, body2))
            if q1 == q2 && vars1 == vars2 =>
        {
            unify_terms(body1, body2, subst)
        }

        // Leaves that are not structurally equal
        _ => Err(UnificationError::Clash(t1.clone(), t2.clone())),
    }
}

/// Unify argument lists pairwise, left to right
fn unify_args(args1: &[Term], args2: &[Term], subst: Substitution) -> UnificationResult {
    if args1.len() != args2.len() {
        return Err(UnificationError::ArityMismatch(args1.len(), args2.len()));
    }
    args1
        .iter()
        .zip(args2)
        .try_fold(subst, |subst, (a1, a2)| unify_terms(a1, a2, subst))
}

/// Follow variable bindings until reaching an unbound variable or a non-variable
fn resolve<'a>(mut term: &'a Term, subst: &'a Substitution) -> &'a Term {
    while term.is_variable() {
        match subst.get(term) {
            Some(bound) => term = bound,
            None => break,
        }
    }
    term
}

/// Check if variable occurs in term, looking through bindings (occurs check)
fn occurs(var: Variable, term: &Term, subst: &Substitution) -> bool {
    match term {
        Term::Variable(v) => {
            *v == var
                || subst
                    .get(term)
                    .is_some_and(|bound| occurs(var, bound, subst))
        }
        _ => term.args().iter().any(|arg| occurs(var, arg, subst)),
    }
}

impl Term {
    /// Replace every bound variable by its binding, transitively
    pub fn apply_substitution(&self, subst: &Substitution) -> Term {
        match self {
            Term::Variable(_) => match subst.get(self) {
                Some(bound) => bound.apply_substitution(subst),
                None => self.clone(),
            },
            Term::Call(..) | Term::Compound(..) | Term::Quantified(..) => self.with_args(
                self.args()
                    .iter()
                    .map(|arg| arg.apply_substitution(subst))
                    .collect(),
            ),
            _ => self.clone(),
        }
    }
}
