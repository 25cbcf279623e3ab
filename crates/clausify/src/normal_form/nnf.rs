//! Negation normal form
//!
//! Pushes negation down to the literals. Biconditionals survive the pass:
//! a negated `<=>` keeps its right side positive and carries the negation on
//! its left side, since `~(a <=> b)` is `~a <=> b`.

use std::sync::Arc;

use crate::logic::{Op, Quantifier, Term, Variable};

/// Rewrite `term` into negation normal form under polarity `sign`.
///
/// `sign == false` computes the normal form of `~term`. After the pass the
/// only remaining connectives are `&`, `|`, `<=>` and `~` directly above an
/// atom, with `=>`, `<~>`, `~&`, `~|` and `!=` rewritten away.
pub fn lower_not(term: &Term, sign: bool) -> Term {
    // Stack-based: results holds lowered children waiting for their parent
    enum WorkItem {
        Process(Term, bool),
        Combine(Op, usize),
        Quantify(Quantifier, Arc<[Variable]>),
    }

    let mut stack = vec![WorkItem::Process(term.clone(), sign)];
    let mut results: Vec<Term> = Vec::new();

    while let Some(item) = stack.pop() {
        match item {
            WorkItem::Process(term, sign) => match &term {
                Term::Compound(op, args) => {
                    debug_assert!(
                        op.arity().map_or(true, |n| n == args.len()),
                        "{} built with {} argument(s)",
                        op,
                        args.len()
                    );
                    match op {
                        Op::Not => stack.push(WorkItem::Process(args[0].clone(), !sign)),

                        // Negated forms reduce to their positive counterpart
                        Op::NotEquals => stack.push(WorkItem::Process(
                            Term::Compound(Op::Equals, args.clone()),
                            !sign,
                        )),
                        Op::Nand => stack.push(WorkItem::Process(
                            Term::Compound(Op::And, args.clone()),
                            !sign,
                        )),
                        Op::Nor => stack.push(WorkItem::Process(
                            Term::Compound(Op::Or, args.clone()),
                            !sign,
                        )),
                        Op::Xor => stack.push(WorkItem::Process(
                            Term::Compound(Op::Iff, args.clone()),
                            !sign,
                        )),

                        // a => b is ~a | b
                        Op::Implies => stack.push(WorkItem::Process(
                            Term::or(vec![Term::negate(args[0].clone()), args[1].clone()]),
                            sign,
                        )),

                        // De Morgan
                        Op::And | Op::Or => {
                            let out = match (op, sign) {
                                (Op::And, true) | (Op::Or, false) => Op::And,
                                _ => Op::Or,
                            };
                            stack.push(WorkItem::Combine(out, args.len()));
                            for arg in args.iter().rev() {
                                stack.push(WorkItem::Process(arg.clone(), sign));
                            }
                        }

                        Op::Iff => {
                            stack.push(WorkItem::Combine(Op::Iff, 2));
                            stack.push(WorkItem::Process(args[1].clone(), true));
                            stack.push(WorkItem::Process(args[0].clone(), sign));
                        }

                        // Predicates are atoms
                        _ => results.push(literal(term.clone(), sign)),
                    }
                }

                Term::Quantified(q, vars, body) => {
                    let q = if sign { *q } else { q.dual() };
                    stack.push(WorkItem::Quantify(q, vars.clone()));
                    stack.push(WorkItem::Process((**body).clone(), sign));
                }

                _ => results.push(literal(term.clone(), sign)),
            },

            WorkItem::Combine(op, arity) => {
                let args = results.split_off(results.len() - arity);
                results.push(Term::Compound(op, args.into()));
            }

            WorkItem::Quantify(q, vars) => {
                if let Some(body) = results.pop() {
                    results.push(Term::Quantified(q, vars, Arc::new(body)));
                }
            }
        }
    }

    debug_assert_eq!(results.len(), 1);
    match results.pop() {
        Some(result) => result,
        None => unreachable!("negation normal form produced no term"),
    }
}

fn literal(atom: Term, sign: bool) -> Term {
    if sign {
        atom
    } else {
        Term::negate(atom)
    }
}
