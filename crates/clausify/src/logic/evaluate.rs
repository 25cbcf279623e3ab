//! Constant folding over terms
//!
//! [`evaluate`] is a local simplifier: it substitutes, evaluates children and
//! then folds the current node only. It never reasons about quantifiers.

use std::cmp::Ordering;

use super::environment::Substitution;
use super::term::{Op, Term};

/// Compare two numeric literals of the same kind
fn compare_numeric(a: &Term, b: &Term) -> Option<Ordering> {
    match (a, b) {
        (Term::Integer(x), Term::Integer(y)) => Some(x.cmp(y)),
        (Term::Rational(x), Term::Rational(y)) | (Term::Real(x), Term::Real(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// `a < b` for numeric literals of the same kind
pub fn lt(a: &Term, b: &Term) -> Option<bool> {
    compare_numeric(a, b).map(Ordering::is_lt)
}

/// `a <= b` for numeric literals of the same kind
pub fn leq(a: &Term, b: &Term) -> Option<bool> {
    compare_numeric(a, b).map(Ordering::is_le)
}

/// `a > b` for numeric literals of the same kind
pub fn gt(a: &Term, b: &Term) -> Option<bool> {
    compare_numeric(a, b).map(Ordering::is_gt)
}

/// `a >= b` for numeric literals of the same kind
pub fn geq(a: &Term, b: &Term) -> Option<bool> {
    compare_numeric(a, b).map(Ordering::is_ge)
}

/// Simplify `term` under `subst`.
///
/// A term bound in `subst` is replaced by its binding as is. Otherwise the
/// children are evaluated first and the node is folded:
/// - `&`/`|` drop their identity element, collapse on their absorbing element,
///   and reduce to `true`/`false` or the single remaining child
/// - `~` folds booleans and removes double negation
/// - `=`/`!=` decide structurally equal operands, and distinct constants
/// - `<`, `<=`, `>`, `>=` decide equal operands and same-kind numbers
pub fn evaluate(term: &Term, subst: &Substitution) -> Term {
    if let Some(bound) = subst.get(term) {
        return bound.clone();
    }

    match term {
        Term::Compound(op, args) => {
            let args: Vec<Term> = args.iter().map(|a| evaluate(a, subst)).collect();
            fold(*op, args)
        }
        Term::Call(_, args) => term.with_args(args.iter().map(|a| evaluate(a, subst)).collect()),
        Term::Quantified(_, vars, body) => {
            // Bound variables are not substituted inside their scope
            let inner = vars
                .iter()
                .fold(subst.clone(), |s, v| s.remove(&Term::Variable(*v)));
            term.with_args(vec![evaluate(body, &inner)])
        }
        _ => term.clone(),
    }
}

fn fold(op: Op, mut args: Vec<Term>) -> Term {
    debug_assert!(op.arity().map_or(true, |n| n == args.len()));
    match op {
        Op::And | Op::Or => {
            // & has identity true and absorbing false; | is the dual
            let identity = op == Op::And;
            if args.iter().any(|a| *a == Term::Bool(!identity)) {
                return Term::Bool(!identity);
            }
            args.retain(|a| *a != Term::Bool(identity));
            match args.len() {
                0 => Term::Bool(identity),
                1 => args.swap_remove(0),
                _ => Term::Compound(op, args.into()),
            }
        }
        Op::Not => match &args[0] {
            Term::Bool(b) => Term::Bool(!b),
            Term::Compound(Op::Not, inner) => inner[0].clone(),
            _ => Term::Compound(op, args.into()),
        },
        Op::Equals | Op::NotEquals => {
            let positive = op == Op::Equals;
            if args[0] == args[1] {
                Term::Bool(positive)
            } else if args[0].is_constant() && args[1].is_constant() {
                Term::Bool(!positive)
            } else {
                Term::Compound(op, args.into())
            }
        }
        Op::Less | Op::LessEq | Op::Greater | Op::GreaterEq => {
            if args[0] == args[1] {
                return Term::Bool(matches!(op, Op::LessEq | Op::GreaterEq));
            }
            let decided = match op {
                Op::Less => lt(&args[0], &args[1]),
                Op::LessEq => leq(&args[0], &args[1]),
                Op::Greater => gt(&args[0], &args[1]),
                _ => geq(&args[0], &args[1]),
            };
            match decided {
                Some(b) => Term::Bool(b),
                None => Term::Compound(op, args.into()),
            }
        }
        _ => Term::Compound(op, args.into()),
    }
}
