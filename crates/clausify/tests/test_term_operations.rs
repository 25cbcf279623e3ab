//! Integration tests for equality, evaluation, unification and isomorphism

use clausify::{
    evaluate, isomorphic, lt, unify, unify_with, Op, Substitution, SymbolTable, Term, TermError,
    UnificationError,
};

#[test]
fn test_structural_equality() {
    let mut symbols = SymbolTable::new();
    let f = symbols.new_function(Some("f"));
    let x = symbols.new_variable(Some("X"));

    let build = || {
        Term::forall(
            vec![x],
            Term::and(vec![
                Term::call(f, vec![Term::Variable(x), Term::integer(1)]),
                Term::distinct_object("obj"),
            ]),
        )
    };
    let (a, b) = (build(), build());
    assert_eq!(a, a);
    assert_eq!(a, b);
    assert_eq!(b, a);

    // Equal names, distinct identities
    let g = symbols.new_function(Some("f"));
    assert_ne!(Term::Fun(f), Term::Fun(g));
}

#[test]
fn test_construction_contracts() {
    let mut symbols = SymbolTable::new();
    let a = Term::Fun(symbols.new_function(Some("a")));

    assert!(matches!(
        Term::try_operator("~", vec![a.clone(), a.clone()]),
        Err(TermError::ArityMismatch { .. })
    ));
    assert!(matches!(
        Term::try_operator("?", vec![a.clone()]),
        Err(TermError::UnknownOperator(_))
    ));
    assert!(matches!(
        Term::try_quantified(clausify::Quantifier::Forall, vec![], a.clone()),
        Err(TermError::EmptyBinders(_))
    ));
    assert!(Term::try_operator("&", vec![]).is_ok());
    assert!(Term::try_operator("|", vec![a.clone(), a.clone(), a]).is_ok());
}

#[test]
fn test_evaluator_identities() {
    let mut symbols = SymbolTable::new();
    let a = Term::Fun(symbols.new_function(Some("a")));
    let empty = Substitution::new();
    let t = Term::bool(true);
    let f = Term::bool(false);

    assert_eq!(evaluate(&Term::and(vec![]), &empty), t);
    assert_eq!(evaluate(&Term::or(vec![]), &empty), f);
    assert_eq!(evaluate(&Term::and(vec![a.clone(), t.clone()]), &empty), a);
    assert_eq!(evaluate(&Term::and(vec![a.clone(), f.clone()]), &empty), f);
    assert_eq!(evaluate(&Term::or(vec![a.clone(), f.clone()]), &empty), a);
    assert_eq!(evaluate(&Term::or(vec![a.clone(), t.clone()]), &empty), t);
    assert_eq!(
        evaluate(&Term::negate(Term::negate(a.clone())), &empty),
        a
    );
}

#[test]
fn test_evaluator_numbers() {
    let empty = Substitution::new();
    let half = Term::parse_rational("1/2").unwrap();
    let third = Term::parse_rational("1/3").unwrap();

    assert_eq!(
        evaluate(&Term::binary(Op::Less, third.clone(), half.clone()), &empty),
        Term::bool(true)
    );
    assert_eq!(
        evaluate(&Term::binary(Op::GreaterEq, third.clone(), half.clone()), &empty),
        Term::bool(false)
    );
    assert_eq!(
        evaluate(&Term::equals(half.clone(), third.clone()), &empty),
        Term::bool(false)
    );
    assert_eq!(lt(&Term::parse_real("0.25").unwrap(), &Term::parse_real("0.5").unwrap()), Some(true));
    // Mixed kinds stay symbolic
    let mixed = Term::binary(Op::Less, Term::integer(1), half);
    assert_eq!(evaluate(&mixed, &empty), mixed);
}

#[test]
fn test_evaluator_uses_substitution() {
    let mut symbols = SymbolTable::new();
    let x = Term::Variable(symbols.new_variable(Some("X")));
    let subst = Substitution::new().add(x.clone(), Term::bool(false));

    assert_eq!(
        evaluate(&Term::or(vec![x.clone(), Term::negate(x)]), &subst),
        Term::bool(true)
    );
}

#[test]
fn test_unification() {
    let mut symbols = SymbolTable::new();
    let f = symbols.new_function(Some("f"));
    let a = Term::Fun(symbols.new_function(Some("a")));
    let b = Term::Fun(symbols.new_function(Some("b")));
    let x = Term::Variable(symbols.new_variable(Some("X")));

    // Occurs check
    assert!(matches!(
        unify(&x, &Term::call(f, vec![x.clone()])),
        Err(UnificationError::OccursCheck(_, _))
    ));

    // Identical terms need no bindings
    let f1 = Term::call(f, vec![Term::integer(1)]);
    let start = Substitution::new().add(x.clone(), a.clone());
    let result = unify_with(&f1, &f1.clone(), &start).unwrap();
    assert_eq!(result.len(), start.len());

    // Distinct constants
    assert!(unify(&a, &b).is_err());

    // f(X, b) = f(a, X) fails once X is bound to a
    let left = Term::call(f, vec![x.clone(), b.clone()]);
    let right = Term::call(f, vec![a.clone(), x.clone()]);
    assert!(unify(&left, &right).is_err());

    let right = Term::call(f, vec![a.clone(), b]);
    let sigma = unify(&left, &right).unwrap();
    assert_eq!(sigma.get(&x), Some(&a));
}

#[test]
fn test_isomorphism() {
    let mut symbols = SymbolTable::new();
    let a = Term::Fun(symbols.new_function(Some("a")));
    let b = Term::Fun(symbols.new_function(Some("b")));
    let p = symbols.new_function(Some("p"));
    let q = symbols.new_function(Some("q"));
    let x = Term::Variable(symbols.new_variable(Some("x")));

    assert!(isomorphic(&a, &b));
    assert!(!isomorphic(
        &Term::call(p, vec![x.clone()]),
        &Term::call(q, vec![x.clone()])
    ));
    assert!(!isomorphic(&Term::negate(a.clone()), &a));
    assert!(!isomorphic(
        &Term::and(vec![a.clone(), b.clone()]),
        &Term::and(vec![a.clone(), a])
    ));
}
