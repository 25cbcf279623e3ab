//! Conversion from first-order formulas to CNF
//!
//! Each formula goes through:
//! 1. Universal closure over its free variables
//! 2. Negation normal form
//! 3. Quantifier elimination: fresh variables for `!`, Skolem terms for `?`
//! 4. Biconditional elimination, naming complex sides
//! 5. Distribution of `|` over `&`, naming conjunctions when more than one
//!    would have to be multiplied out
//! 6. Clause extraction
//!
//! Steps 4 and 5 introduce definitions whose defining formulas are sent
//! through steps 2 to 6 again. Their clauses land in the same accumulator as
//! the clauses of the formula that introduced them.

use super::nnf::lower_not;
use crate::config::ConverterConfig;
use crate::logic::clause::literal_value;
use crate::logic::{
    evaluate, CNFFormula, Clause, Environment, FunctionKind, Op, Quantifier, Substitution,
    SymbolTable, Term, Variable,
};

/// Convert a formula to CNF with the default configuration
pub fn convert(formula: &Term, symbols: &mut SymbolTable) -> CNFFormula {
    convert_with_config(formula, ConverterConfig::default(), symbols)
}

/// Convert a formula to CNF with an explicit configuration
pub fn convert_with_config(
    formula: &Term,
    config: ConverterConfig,
    symbols: &mut SymbolTable,
) -> CNFFormula {
    let mut converter = Converter::new(config, symbols);
    converter.add(formula);
    converter.finish()
}

/// Clause accumulator for one or more formulas.
///
/// Skolem and definition counters run across every formula added, so the
/// fresh symbols of one converter never share a display name.
pub struct Converter<'a> {
    config: ConverterConfig,
    skolem_counter: usize,
    def_counter: usize,
    clauses: Vec<Clause>,
    symbols: &'a mut SymbolTable,
}

impl<'a> Converter<'a> {
    pub fn new(config: ConverterConfig, symbols: &'a mut SymbolTable) -> Self {
        Converter {
            config,
            skolem_counter: 0,
            def_counter: 0,
            clauses: Vec::new(),
            symbols,
        }
    }

    /// Convert `formula` and append its clauses
    pub fn add(&mut self, formula: &Term) {
        let before = self.clauses.len();

        let formula = if self.config.simplify {
            evaluate(formula, &Substitution::new())
        } else {
            formula.clone()
        };
        let closed = universal_closure(formula);
        log::debug!("Converting {}", closed.display(self.symbols));

        self.pipeline(&closed);

        log::debug!(
            "Produced {} clause(s), {} in total",
            self.clauses.len() - before,
            self.clauses.len()
        );
    }

    /// Clauses produced so far
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn finish(self) -> CNFFormula {
        CNFFormula::new(self.clauses)
    }

    /// Steps 2 to 6; re-entered for every definition introduced
    fn pipeline(&mut self, formula: &Term) {
        let nnf = lower_not(formula, true);
        log::trace!("NNF: {}", nnf.display(self.symbols));

        let matrix = self.eliminate_quantifiers(&nnf, &Environment::new());
        let matrix = self.eliminate_eqv(&matrix);
        let cnf = self.raise_and(&matrix);
        log::trace!("CNF: {}", cnf.display(self.symbols));

        self.extract_clauses(&cnf);
    }

    // === Quantifier elimination ===

    /// Drop quantifiers, renaming bound variables through `env`.
    ///
    /// A universally bound variable becomes a fresh variable. An existentially
    /// bound one becomes a Skolem term over the variables `env` currently maps
    /// to, in binding order.
    fn eliminate_quantifiers(&mut self, term: &Term, env: &Environment<Variable, Term>) -> Term {
        match term {
            Term::Variable(v) => env.get(v).cloned().unwrap_or_else(|| term.clone()),

            Term::Quantified(Quantifier::Forall, vars, body) => {
                let mut env = env.clone();
                for v in vars.iter() {
                    let fresh = self.symbols.fresh_variable_like(*v);
                    env = env.add(*v, Term::Variable(fresh));
                }
                self.eliminate_quantifiers(body, &env)
            }

            Term::Quantified(Quantifier::Exists, vars, body) => {
                let args: Vec<Term> = env.values().filter(|t| t.is_variable()).cloned().collect();
                let mut env = env.clone();
                for v in vars.iter() {
                    let skolem = self.skolem_term(&args);
                    env = env.add(*v, skolem);
                }
                self.eliminate_quantifiers(body, &env)
            }

            _ if term.args().is_empty() => term.clone(),

            _ => {
                let args = term
                    .args()
                    .iter()
                    .map(|arg| self.eliminate_quantifiers(arg, env))
                    .collect();
                term.with_args(args)
            }
        }
    }

    fn skolem_term(&mut self, args: &[Term]) -> Term {
        let name = format!("{}{}", self.config.skolem_prefix, self.skolem_counter);
        self.skolem_counter += 1;

        let function = self
            .symbols
            .new_function_of_kind(Some(&name), FunctionKind::Skolem);
        if args.is_empty() {
            Term::Fun(function)
        } else {
            Term::call(function, args.to_vec())
        }
    }

    // === Definitions ===

    /// A fresh definitional atom over the free variables of `formula`
    fn define(&mut self, formula: &Term) -> Term {
        let name = format!("{}{}", self.config.definition_prefix, self.def_counter);
        self.def_counter += 1;

        let function = self
            .symbols
            .new_function_of_kind(Some(&name), FunctionKind::Definition);
        let vars: Vec<Term> = formula
            .free_variables()
            .into_iter()
            .map(Term::Variable)
            .collect();
        let atom = if vars.is_empty() {
            Term::Fun(function)
        } else {
            Term::call(function, vars)
        };

        log::trace!(
            "Defining {} as {}",
            atom.display(self.symbols),
            formula.display(self.symbols)
        );
        atom
    }

    // === Biconditional elimination ===

    /// Rewrite every `a <=> b` bottom-up into `(a => b) & (b => a)` in NNF,
    /// first replacing each side that is a connective by a definition
    fn eliminate_eqv(&mut self, term: &Term) -> Term {
        let Term::Compound(op, args) = term else {
            return term.clone();
        };
        let args: Vec<Term> = args.iter().map(|arg| self.eliminate_eqv(arg)).collect();
        if *op != Op::Iff {
            return Term::Compound(*op, args.into());
        }

        let left = self.name_if_complex(args[0].clone());
        let right = self.name_if_complex(args[1].clone());
        let expanded = Term::and(vec![
            Term::implies(left.clone(), right.clone()),
            Term::implies(right, left),
        ]);
        lower_not(&expanded, true)
    }

    fn name_if_complex(&mut self, side: Term) -> Term {
        let complex = side.strip_negations().op().is_some_and(Op::is_connective);
        if !complex {
            return side;
        }

        let def = self.define(&side);
        let definition = Term::and(vec![
            Term::implies(side.clone(), def.clone()),
            Term::implies(def.clone(), side),
        ]);
        self.pipeline(&definition);
        def
    }

    // === Distribution ===

    /// Push `&` above `|`.
    ///
    /// A disjunction with exactly one conjunction among its children is
    /// distributed over it. With two or more, each conjunction is replaced by
    /// a definition instead, so the output stays linear in the input.
    fn raise_and(&mut self, term: &Term) -> Term {
        match term {
            Term::Compound(Op::And, args) => {
                Term::and(args.iter().map(|arg| self.raise_and(arg)).collect())
            }

            Term::Compound(Op::Or, args) => {
                let mut args: Vec<Term> = args.iter().map(|arg| self.raise_and(arg)).collect();
                let conjunctions: Vec<usize> = args
                    .iter()
                    .enumerate()
                    .filter(|(_, arg)| arg.is_op(Op::And))
                    .map(|(i, _)| i)
                    .collect();

                match conjunctions.as_slice() {
                    [] => Term::or(args),
                    [i] => distribute(&args, *i),
                    _ => {
                        for &i in &conjunctions {
                            let def = self.define(&args[i]);
                            self.pipeline(&Term::implies(def.clone(), args[i].clone()));
                            args[i] = def;
                        }
                        Term::or(args)
                    }
                }
            }

            _ => term.clone(),
        }
    }

    // === Clause extraction ===

    fn extract_clauses(&mut self, cnf: &Term) {
        for conjunct in flatten(cnf, Op::And) {
            let mut clause = Clause::new(flatten(&conjunct, Op::Or));
            if self.config.simplify {
                if clause.is_tautology() {
                    continue;
                }
                clause
                    .literals
                    .retain(|lit| literal_value(lit) != Some(false));
            }
            self.clauses.push(clause);
        }
    }
}

/// Wrap `formula` in `!` over its free variables, in order of first occurrence
fn universal_closure(formula: Term) -> Term {
    let free: Vec<Variable> = formula.free_variables().into_iter().collect();
    if free.is_empty() {
        formula
    } else {
        Term::forall(free, formula)
    }
}

/// `|(.., &(c1, .., cn), ..)` to `&(|(.., c1, ..), .., |(.., cn, ..))`
fn distribute(args: &[Term], position: usize) -> Term {
    let alternatives = flatten(&args[position], Op::And)
        .into_iter()
        .map(|conjunct| {
            let mut disjuncts = args.to_vec();
            disjuncts[position] = conjunct;
            Term::or(disjuncts)
        })
        .collect();
    Term::and(alternatives)
}

/// Children of nested `op` nodes, left to right
fn flatten(term: &Term, op: Op) -> Vec<Term> {
    let mut stack = vec![term];
    let mut out = Vec::new();
    while let Some(t) = stack.pop() {
        match t {
            Term::Compound(o, args) if *o == op => stack.extend(args.iter().rev()),
            _ => out.push(t.clone()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{isomorphic_clauses, Function};

    /// Test context for building formulas with allocated symbols
    struct TestContext {
        symbols: SymbolTable,
    }

    impl TestContext {
        fn new() -> Self {
            TestContext {
                symbols: SymbolTable::new(),
            }
        }

        fn var(&mut self, name: &str) -> Variable {
            self.symbols.new_variable(Some(name))
        }

        fn pred(&mut self, name: &str) -> Function {
            self.symbols.new_function(Some(name))
        }

        fn atom(&mut self, name: &str) -> Term {
            Term::Fun(self.pred(name))
        }

        fn convert(&mut self, formula: &Term) -> CNFFormula {
            convert(formula, &mut self.symbols)
        }

        fn show(&self, cnf: &CNFFormula) -> Vec<String> {
            cnf.iter()
                .map(|c| c.display(&self.symbols).to_string())
                .collect()
        }
    }

    fn clause(literals: Vec<Term>) -> Clause {
        Clause::new(literals)
    }

    fn not(t: Term) -> Term {
        Term::negate(t)
    }

    #[test]
    fn test_simple_cnf_conversion() {
        let mut ctx = TestContext::new();

        // Test: P & Q -> two unit clauses
        let p = ctx.atom("P");
        let q = ctx.atom("Q");

        let cnf = ctx.convert(&Term::and(vec![p.clone(), q.clone()]));
        assert_eq!(cnf.clauses, vec![clause(vec![p]), clause(vec![q])]);
    }

    #[test]
    fn test_trivial_formulas() {
        let mut ctx = TestContext::new();

        assert!(ctx.convert(&Term::and(vec![])).is_empty());
        assert_eq!(ctx.convert(&Term::or(vec![])).clauses, vec![clause(vec![])]);
        assert_eq!(
            ctx.convert(&Term::bool(true)).clauses,
            vec![clause(vec![Term::bool(true)])]
        );
    }

    #[test]
    fn test_skolemization() {
        let mut ctx = TestContext::new();

        // Test: ?[X]: p(X) -> p(sk0)
        let p = ctx.pred("p");
        let x = ctx.var("X");
        let formula = Term::exists(vec![x], Term::call(p, vec![Term::Variable(x)]));

        let cnf = ctx.convert(&formula);
        assert_eq!(cnf.len(), 1);
        match &cnf.clauses[0].literals[0] {
            Term::Call(f, args) if *f == p => match &args[0] {
                Term::Fun(sk) => {
                    assert_eq!(sk.kind, FunctionKind::Skolem);
                    assert_eq!(ctx.symbols.function_name(sk.id), Some("sk0"));
                }
                other => panic!("Expected Skolem constant, got {}", other),
            },
            other => panic!("Expected p(..), got {}", other),
        }
    }

    #[test]
    fn test_skolem_arguments_are_enclosing_universals() {
        let mut ctx = TestContext::new();

        // ![X]: ?[Y]: p(X, Y) -> p(X', sk0(X'))
        let p = ctx.pred("p");
        let x = ctx.var("X");
        let y = ctx.var("Y");
        let formula = Term::forall(
            vec![x],
            Term::exists(
                vec![y],
                Term::call(p, vec![Term::Variable(x), Term::Variable(y)]),
            ),
        );

        let cnf = ctx.convert(&formula);
        assert_eq!(ctx.show(&cnf), vec!["p(X,sk0(X))"]);

        let Term::Call(_, args) = &cnf.clauses[0].literals[0] else {
            panic!("Expected a call");
        };
        let fresh = args[0].as_variable().unwrap();
        assert_ne!(fresh, x, "universal variables are renamed apart");
        assert_eq!(args[1].args(), &[Term::Variable(fresh)]);
    }

    #[test]
    fn test_free_variables_are_universally_closed() {
        let mut ctx = TestContext::new();

        // p(X) & ?[Y]: q(X, Y) with X free
        let p = ctx.pred("p");
        let q = ctx.pred("q");
        let x = ctx.var("X");
        let y = ctx.var("Y");
        let formula = Term::and(vec![
            Term::call(p, vec![Term::Variable(x)]),
            Term::exists(
                vec![y],
                Term::call(q, vec![Term::Variable(x), Term::Variable(y)]),
            ),
        ]);

        let cnf = ctx.convert(&formula);
        assert_eq!(ctx.show(&cnf), vec!["p(X)", "q(X,sk0(X))"]);
    }

    #[test]
    fn test_distribute_single_conjunction() {
        let mut ctx = TestContext::new();
        let a = ctx.atom("a");
        let b = ctx.atom("b");
        let c = ctx.atom("c");

        // a | (b & c) -> (a | b) & (a | c)
        let cnf = ctx.convert(&Term::or(vec![a.clone(), Term::and(vec![b.clone(), c.clone()])]));
        assert_eq!(
            cnf.clauses,
            vec![clause(vec![a.clone(), b]), clause(vec![a, c])]
        );
    }

    #[test]
    fn test_rename_multiple_conjunctions() {
        let mut ctx = TestContext::new();
        let a = ctx.atom("a");
        let b = ctx.atom("b");
        let c = ctx.atom("c");
        let d = ctx.atom("d");

        // (a & b) | (c & d) names both conjunctions instead of multiplying out
        let cnf = ctx.convert(&Term::or(vec![
            Term::and(vec![a, b]),
            Term::and(vec![c, d]),
        ]));
        assert_eq!(
            ctx.show(&cnf),
            vec!["~def0 | a", "~def0 | b", "~def1 | c", "~def1 | d", "def0 | def1"]
        );
    }

    #[test]
    fn test_definitions_take_free_variables() {
        let mut ctx = TestContext::new();
        let p = ctx.pred("p");
        let q = ctx.pred("q");
        let x = ctx.var("X");
        let px = Term::call(p, vec![Term::Variable(x)]);
        let qx = Term::call(q, vec![Term::Variable(x)]);

        // ![X]: ((p(X) & q(X)) | (q(X) & p(X)))
        let formula = Term::forall(
            vec![x],
            Term::or(vec![
                Term::and(vec![px.clone(), qx.clone()]),
                Term::and(vec![qx, px]),
            ]),
        );

        let cnf = ctx.convert(&formula);
        assert_eq!(
            ctx.show(&cnf),
            vec![
                "~def0(X) | p(X)",
                "~def0(X) | q(X)",
                "~def1(X) | q(X)",
                "~def1(X) | p(X)",
                "def0(X) | def1(X)",
            ]
        );
    }

    #[test]
    fn test_biconditional_of_atoms() {
        let mut ctx = TestContext::new();
        let a = ctx.atom("a");
        let b = ctx.atom("b");

        let cnf = ctx.convert(&Term::iff(a.clone(), b.clone()));
        assert_eq!(
            cnf.clauses,
            vec![
                clause(vec![not(a.clone()), b.clone()]),
                clause(vec![not(b), a]),
            ]
        );
    }

    #[test]
    fn test_negated_biconditional() {
        let mut ctx = TestContext::new();
        let a = ctx.atom("a");
        let b = ctx.atom("b");

        // ~(a <=> b) is ~a <=> b
        let cnf = ctx.convert(&not(Term::iff(a.clone(), b.clone())));
        assert_eq!(
            cnf.clauses,
            vec![
                clause(vec![a.clone(), b.clone()]),
                clause(vec![not(b), not(a)]),
            ]
        );
    }

    #[test]
    fn test_biconditional_names_complex_side() {
        let mut ctx = TestContext::new();
        let a = ctx.atom("a");
        let b = ctx.atom("b");
        let c = ctx.atom("c");

        let cnf = ctx.convert(&Term::iff(Term::and(vec![a, b]), c));
        assert_eq!(
            ctx.show(&cnf),
            vec![
                "~a | ~b | def0",
                "~def0 | a",
                "~def0 | b",
                "~def0 | c",
                "~c | def0",
            ]
        );
    }

    #[test]
    fn test_nested_biconditionals_terminate() {
        let mut ctx = TestContext::new();
        let atoms: Vec<Term> = (0..12).map(|i| ctx.atom(&format!("a{}", i))).collect();

        // Left- and right-nested chains
        let left = atoms[1..]
            .iter()
            .fold(atoms[0].clone(), |acc, a| Term::iff(acc, a.clone()));
        let right = atoms[..atoms.len() - 1]
            .iter()
            .rev()
            .fold(atoms[atoms.len() - 1].clone(), |acc, a| Term::iff(a.clone(), acc));

        for formula in [left, right] {
            let cnf = ctx.convert(&formula);
            assert!(!cnf.is_empty());
            for c in cnf.iter() {
                for lit in &c.literals {
                    assert!(lit.strip_negations().op().is_none(), "not a literal: {}", lit);
                }
            }
        }
    }

    #[test]
    fn test_implication_matches_disjunction() {
        let mut ctx = TestContext::new();
        let a = ctx.atom("a");
        let b = ctx.atom("b");

        let implication = ctx.convert(&Term::implies(a.clone(), b.clone()));
        let disjunction = ctx.convert(&Term::or(vec![not(a), b]));
        assert!(isomorphic_clauses(&implication.clauses, &disjunction.clauses));
    }

    #[test]
    fn test_simplify_truth_constants() {
        let mut ctx = TestContext::new();
        let a = ctx.atom("a");
        let formula = Term::iff(Term::bool(true), a.clone());

        let plain = ctx.convert(&formula);
        assert_eq!(plain.len(), 2);

        let config = ConverterConfig {
            simplify: true,
            ..ConverterConfig::default()
        };
        let simplified = convert_with_config(&formula, config, &mut ctx.symbols);
        assert_eq!(simplified.clauses, vec![clause(vec![a])]);
    }

    #[test]
    fn test_simplify_drops_tautologies() {
        let mut ctx = TestContext::new();
        let a = ctx.atom("a");
        let b = ctx.atom("b");

        // (a | ~a) & b
        let formula = Term::and(vec![Term::or(vec![a.clone(), not(a)]), b.clone()]);
        assert_eq!(ctx.convert(&formula).len(), 2);

        let config = ConverterConfig {
            simplify: true,
            ..ConverterConfig::default()
        };
        let simplified = convert_with_config(&formula, config, &mut ctx.symbols);
        assert_eq!(simplified.clauses, vec![clause(vec![b])]);
    }

    #[test]
    fn test_converter_accumulates() {
        let mut ctx = TestContext::new();
        let p = ctx.pred("p");
        let x = ctx.var("X");
        let y = ctx.var("Y");
        let first = Term::exists(vec![x], Term::call(p, vec![Term::Variable(x)]));
        let second = Term::exists(vec![y], Term::call(p, vec![Term::Variable(y)]));

        let config = ConverterConfig {
            skolem_prefix: "c".to_string(),
            ..ConverterConfig::default()
        };
        let mut converter = Converter::new(config, &mut ctx.symbols);
        converter.add(&first);
        converter.add(&second);
        assert_eq!(converter.clauses().len(), 2);
        let cnf = converter.finish();

        assert_eq!(ctx.show(&cnf), vec!["p(c0)", "p(c1)"]);
    }
}
