//! Terms and formulas of first-order logic
//!
//! A single [`Term`] type covers both terms and formulas: leaves (booleans,
//! distinct objects, numbers, function symbols, variables), function calls,
//! connective/predicate nodes and quantifiers.
//!
//! Terms are immutable. Children sit behind `Arc`, so cloning a term is cheap
//! and every pass builds new parents over shared, previously built children.

use indexmap::IndexSet;
use num_bigint::BigInt;
use num_rational::BigRational;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::error::{Result, TermError};
use super::symbols::{FunctionId, FunctionKind, SymbolTable, VariableId};

/// A variable, equal only to itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    pub id: VariableId,
}

impl Variable {
    /// Create a new variable from an ID
    pub fn new(id: VariableId) -> Self {
        Variable { id }
    }

    /// Get the display name of this variable, if it has one
    pub fn name<'a>(&self, symbols: &'a SymbolTable) -> Option<&'a str> {
        symbols.variable_name(self.id)
    }
}

/// A function symbol, equal only to itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Function {
    pub id: FunctionId,
    pub kind: FunctionKind,
}

impl Function {
    /// Create a new function symbol from an ID and origin
    pub fn new(id: FunctionId, kind: FunctionKind) -> Self {
        Function { id, kind }
    }

    /// Get the display name of this function symbol, if it has one
    pub fn name<'a>(&self, symbols: &'a SymbolTable) -> Option<&'a str> {
        symbols.function_name(self.id)
    }
}

/// Connectives and built-in predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `!=`
    NotEquals,
    /// `&`
    And,
    /// `<`
    Less,
    /// `<=`
    LessEq,
    /// `<=>`
    Iff,
    /// `<~>`
    Xor,
    /// `=`
    Equals,
    /// `=>`
    Implies,
    /// `>`
    Greater,
    /// `>=`
    GreaterEq,
    /// `|`
    Or,
    /// `~`
    Not,
    /// `~&`
    Nand,
    /// `~|`
    Nor,
}

impl Op {
    pub const ALL: [Op; 14] = [
        Op::NotEquals,
        Op::And,
        Op::Less,
        Op::LessEq,
        Op::Iff,
        Op::Xor,
        Op::Equals,
        Op::Implies,
        Op::Greater,
        Op::GreaterEq,
        Op::Or,
        Op::Not,
        Op::Nand,
        Op::Nor,
    ];

    /// The operator's surface symbol
    pub fn symbol(self) -> &'static str {
        match self {
            Op::NotEquals => "!=",
            Op::And => "&",
            Op::Less => "<",
            Op::LessEq => "<=",
            Op::Iff => "<=>",
            Op::Xor => "<~>",
            Op::Equals => "=",
            Op::Implies => "=>",
            Op::Greater => ">",
            Op::GreaterEq => ">=",
            Op::Or => "|",
            Op::Not => "~",
            Op::Nand => "~&",
            Op::Nor => "~|",
        }
    }

    /// Fixed argument count, or `None` for the variadic `&` and `|`
    pub fn arity(self) -> Option<usize> {
        match self {
            Op::And | Op::Or => None,
            Op::Not => Some(1),
            _ => Some(2),
        }
    }

    /// Ordering predicates delegated to the numeric type
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Op::Less | Op::LessEq | Op::Greater | Op::GreaterEq
        )
    }

    /// Connectives that make a biconditional side worth naming
    pub fn is_connective(self) -> bool {
        matches!(
            self,
            Op::And | Op::Iff | Op::Xor | Op::Implies | Op::Or | Op::Nand | Op::Nor
        )
    }
}

impl FromStr for Op {
    type Err = TermError;

    fn from_str(s: &str) -> Result<Op> {
        Op::ALL
            .into_iter()
            .find(|op| op.symbol() == s)
            .ok_or_else(|| TermError::UnknownOperator(s.to_string()))
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Quantifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    /// `!`
    Forall,
    /// `?`
    Exists,
}

impl Quantifier {
    pub fn symbol(self) -> &'static str {
        match self {
            Quantifier::Forall => "!",
            Quantifier::Exists => "?",
        }
    }

    /// `!` <-> `?`
    pub fn dual(self) -> Quantifier {
        match self {
            Quantifier::Forall => Quantifier::Exists,
            Quantifier::Exists => Quantifier::Forall,
        }
    }
}

/// A term or formula
///
/// Building `Compound` or `Quantified` directly skips the arity and binder
/// checks of [`Term::try_compound`] and [`Term::try_quantified`]. Every pass
/// assumes those checks hold: `~` has one argument, the binary operators two,
/// and a quantifier at least one bound variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Bool(bool),
    /// Distinct objects are equal iff their names are equal
    DistinctObject(Arc<str>),
    Integer(Arc<BigInt>),
    Rational(Arc<BigRational>),
    Real(Arc<BigRational>),
    /// A bare function symbol (a constant)
    Fun(Function),
    Variable(Variable),
    /// A function symbol applied to arguments
    Call(Function, Arc<[Term]>),
    /// A connective or built-in predicate
    Compound(Op, Arc<[Term]>),
    /// A quantifier over one body
    Quantified(Quantifier, Arc<[Variable]>, Arc<Term>),
}

// === Leaves ===

impl Term {
    pub fn bool(value: bool) -> Term {
        Term::Bool(value)
    }

    pub fn distinct_object(name: &str) -> Term {
        Term::DistinctObject(Arc::from(name))
    }

    pub fn integer(value: impl Into<BigInt>) -> Term {
        Term::Integer(Arc::new(value.into()))
    }

    /// Parse an exact integer literal such as `"-123"`
    pub fn parse_integer(text: &str) -> Result<Term> {
        BigInt::from_str(text.trim())
            .map(Term::integer)
            .map_err(|_| TermError::InvalidNumber {
                kind: "integer",
                text: text.to_string(),
            })
    }

    pub fn rational(value: BigRational) -> Term {
        Term::Rational(Arc::new(value))
    }

    /// Parse an exact rational literal such as `"1/2"` or `"3"`
    pub fn parse_rational(text: &str) -> Result<Term> {
        BigRational::from_str(text.trim())
            .map(Term::rational)
            .map_err(|_| TermError::InvalidNumber {
                kind: "rational",
                text: text.to_string(),
            })
    }

    /// Build a rational from a float; the conversion is exact
    pub fn rational_from_f64(value: f64) -> Result<Term> {
        BigRational::from_float(value)
            .map(Term::rational)
            .ok_or(TermError::NotFinite(value))
    }

    pub fn real(value: BigRational) -> Term {
        Term::Real(Arc::new(value))
    }

    /// Parse an exact real literal: decimal (`"0.5"`, `"-1.25e3"`) or fraction
    pub fn parse_real(text: &str) -> Result<Term> {
        let trimmed = text.trim();
        parse_decimal(trimmed)
            .or_else(|| BigRational::from_str(trimmed).ok())
            .map(Term::real)
            .ok_or_else(|| TermError::InvalidNumber {
                kind: "real",
                text: text.to_string(),
            })
    }

    /// Build a real from a float; the conversion is exact
    pub fn real_from_f64(value: f64) -> Result<Term> {
        BigRational::from_float(value)
            .map(Term::real)
            .ok_or(TermError::NotFinite(value))
    }

    pub fn fun(function: Function) -> Term {
        Term::Fun(function)
    }

    pub fn variable(variable: Variable) -> Term {
        Term::Variable(variable)
    }
}

/// Largest power of ten a decimal literal may scale by
const MAX_DECIMAL_SCALE: u64 = 1 << 16;

/// Exact decimal parsing with optional sign, fraction and exponent
fn parse_decimal(text: &str) -> Option<BigRational> {
    let (mantissa, exponent) = match text.find(|c| c == 'e' || c == 'E') {
        Some(i) => (&text[..i], text[i + 1..].parse::<i64>().ok()?),
        None => (text, 0),
    };
    let (negative, digits) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa.strip_prefix('+').unwrap_or(mantissa)),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part
        .chars()
        .chain(frac_part.chars())
        .all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let mut numer = BigInt::from_str(&format!("{int_part}{frac_part}")).ok()?;
    if negative {
        numer = -numer;
    }
    let scale = exponent.checked_sub(i64::try_from(frac_part.len()).ok()?)?;
    if scale.unsigned_abs() > MAX_DECIMAL_SCALE {
        return None;
    }
    let ten = BigInt::from(10u32);
    let power = num_traits::pow(ten, usize::try_from(scale.unsigned_abs()).ok()?);
    if scale >= 0 {
        Some(BigRational::from_integer(numer * power))
    } else {
        Some(BigRational::new(numer, power))
    }
}

// === Compound terms ===

impl Term {
    /// Apply a function symbol to arguments; any arity is allowed
    pub fn call(function: Function, args: Vec<Term>) -> Term {
        Term::Call(function, args.into())
    }

    /// Build a connective/predicate node, checking the operator's arity
    pub fn try_compound(op: Op, args: Vec<Term>) -> Result<Term> {
        if let Some(expected) = op.arity() {
            if args.len() != expected {
                return Err(TermError::ArityMismatch {
                    op: op.symbol(),
                    expected,
                    found: args.len(),
                });
            }
        }
        Ok(Term::Compound(op, args.into()))
    }

    /// Build a connective/predicate node from its surface symbol
    pub fn try_operator(symbol: &str, args: Vec<Term>) -> Result<Term> {
        Term::try_compound(symbol.parse()?, args)
    }

    /// Like [`Term::try_compound`], panicking on a contract violation
    pub fn compound(op: Op, args: Vec<Term>) -> Term {
        match Term::try_compound(op, args) {
            Ok(term) => term,
            Err(e) => panic!("{e}"),
        }
    }

    /// Build a quantifier; every binder must be a variable term
    pub fn try_quantified(quantifier: Quantifier, binders: Vec<Term>, body: Term) -> Result<Term> {
        if binders.is_empty() {
            return Err(TermError::EmptyBinders(quantifier.symbol()));
        }
        let variables = binders
            .iter()
            .enumerate()
            .map(|(i, t)| t.as_variable().ok_or(TermError::NotAVariable(i)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Term::Quantified(quantifier, variables.into(), Arc::new(body)))
    }

    /// Build a quantifier, panicking on an empty binder list
    pub fn quantified(quantifier: Quantifier, variables: Vec<Variable>, body: Term) -> Term {
        assert!(
            !variables.is_empty(),
            "{}",
            TermError::EmptyBinders(quantifier.symbol())
        );
        Term::Quantified(quantifier, variables.into(), Arc::new(body))
    }

    pub fn forall(variables: Vec<Variable>, body: Term) -> Term {
        Term::quantified(Quantifier::Forall, variables, body)
    }

    pub fn exists(variables: Vec<Variable>, body: Term) -> Term {
        Term::quantified(Quantifier::Exists, variables, body)
    }

    pub fn negate(term: Term) -> Term {
        Term::Compound(Op::Not, Arc::from([term]))
    }

    pub fn and(args: Vec<Term>) -> Term {
        Term::Compound(Op::And, args.into())
    }

    pub fn or(args: Vec<Term>) -> Term {
        Term::Compound(Op::Or, args.into())
    }

    /// A two-argument node; panics if `op` is `~`
    pub fn binary(op: Op, left: Term, right: Term) -> Term {
        Term::compound(op, vec![left, right])
    }

    pub fn implies(left: Term, right: Term) -> Term {
        Term::binary(Op::Implies, left, right)
    }

    pub fn iff(left: Term, right: Term) -> Term {
        Term::binary(Op::Iff, left, right)
    }

    pub fn equals(left: Term, right: Term) -> Term {
        Term::binary(Op::Equals, left, right)
    }
}

// === Queries ===

impl Term {
    /// Ordered children: call/compound arguments, or the quantifier body
    pub fn args(&self) -> &[Term] {
        match self {
            Term::Call(_, args) | Term::Compound(_, args) => args,
            Term::Quantified(_, _, body) => std::slice::from_ref(&**body),
            _ => &[],
        }
    }

    /// Number of children
    pub fn arity(&self) -> usize {
        self.args().len()
    }

    /// The operator if this is a connective/predicate node
    pub fn op(&self) -> Option<Op> {
        match self {
            Term::Compound(op, _) => Some(*op),
            _ => None,
        }
    }

    pub fn is_op(&self, op: Op) -> bool {
        self.op() == Some(op)
    }

    pub fn as_variable(&self) -> Option<Variable> {
        match self {
            Term::Variable(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    /// Integer, rational or real literal
    pub fn is_numeric(&self) -> bool {
        matches!(self, Term::Integer(_) | Term::Rational(_) | Term::Real(_))
    }

    /// Boolean, distinct object or numeric literal
    pub fn is_constant(&self) -> bool {
        matches!(self, Term::Bool(_) | Term::DistinctObject(_)) || self.is_numeric()
    }

    /// Strip any chain of `~`
    pub fn strip_negations(&self) -> &Term {
        let mut term = self;
        while let Term::Compound(Op::Not, args) = term {
            term = &args[0];
        }
        term
    }

    /// Rebuild this node over new children, keeping operator, function and binders
    pub fn with_args(&self, args: Vec<Term>) -> Term {
        match self {
            Term::Call(f, _) => Term::Call(*f, args.into()),
            Term::Compound(op, _) => Term::Compound(*op, args.into()),
            Term::Quantified(q, vars, _) => {
                let body = args
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| panic!("quantifier {} needs a body", q.symbol()));
                Term::Quantified(*q, vars.clone(), Arc::new(body))
            }
            _ => {
                debug_assert!(args.is_empty(), "leaf terms have no arguments");
                self.clone()
            }
        }
    }

    /// Variables occurring free, in order of first occurrence
    pub fn free_variables(&self) -> IndexSet<Variable> {
        let mut bound = Vec::new();
        let mut free = IndexSet::new();
        self.collect_free_variables(&mut bound, &mut free);
        free
    }

    fn collect_free_variables(&self, bound: &mut Vec<Variable>, free: &mut IndexSet<Variable>) {
        match self {
            Term::Variable(v) => {
                if !bound.contains(v) {
                    free.insert(*v);
                }
            }
            Term::Quantified(_, vars, body) => {
                let depth = bound.len();
                bound.extend(vars.iter().copied());
                body.collect_free_variables(bound, free);
                bound.truncate(depth);
            }
            _ => {
                for arg in self.args() {
                    arg.collect_free_variables(bound, free);
                }
            }
        }
    }

    /// Format this term with a symbol table for name resolution
    pub fn display<'a>(&'a self, symbols: &'a SymbolTable) -> TermDisplay<'a> {
        TermDisplay {
            term: self,
            symbols: Some(symbols),
        }
    }
}

/// Display wrapper for Term that resolves names through a symbol table
pub struct TermDisplay<'a> {
    term: &'a Term,
    symbols: Option<&'a SymbolTable>,
}

impl<'a> TermDisplay<'a> {
    fn child(&self, term: &'a Term) -> TermDisplay<'a> {
        TermDisplay {
            term,
            symbols: self.symbols,
        }
    }

    fn write_variable(&self, f: &mut fmt::Formatter<'_>, v: Variable) -> fmt::Result {
        match self.symbols.and_then(|s| s.variable_name(v.id)) {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", v.id),
        }
    }

    fn write_function(&self, f: &mut fmt::Formatter<'_>, func: Function) -> fmt::Result {
        match self.symbols.and_then(|s| s.function_name(func.id)) {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", func.id),
        }
    }

    fn write_list(&self, f: &mut fmt::Formatter<'_>, args: &'a [Term], sep: &str) -> fmt::Result {
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            write!(f, "{}", self.child(arg))?;
        }
        Ok(())
    }
}

impl<'a> fmt::Display for TermDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.term {
            Term::Bool(true) => f.write_str("$true"),
            Term::Bool(false) => f.write_str("$false"),
            Term::DistinctObject(name) => write!(f, "\"{}\"", name),
            Term::Integer(n) => write!(f, "{}", n),
            Term::Rational(r) => write!(f, "{}", r),
            Term::Real(r) => match r.is_integer() {
                true => write!(f, "{}.0", r),
                false => write!(f, "{}", r),
            },
            Term::Fun(func) => self.write_function(f, *func),
            Term::Variable(v) => self.write_variable(f, *v),
            Term::Call(func, args) => {
                self.write_function(f, *func)?;
                f.write_str("(")?;
                self.write_list(f, args, ",")?;
                f.write_str(")")
            }
            Term::Compound(Op::Not, args) => write!(f, "~{}", self.child(&args[0])),
            Term::Compound(op, args) if args.is_empty() => write!(f, "{}()", op),
            Term::Compound(op, args) => {
                f.write_str("(")?;
                self.write_list(f, args, &format!(" {} ", op))?;
                f.write_str(")")
            }
            Term::Quantified(q, vars, body) => {
                write!(f, "{}[", q.symbol())?;
                for (i, v) in vars.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    self.write_variable(f, *v)?;
                }
                write!(f, "]: {}", self.child(body))
            }
        }
    }
}

// Display without a symbol table shows raw IDs (for debugging)
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            TermDisplay {
                term: self,
                symbols: None
            }
        )
    }
}

impl From<bool> for Term {
    fn from(value: bool) -> Term {
        Term::Bool(value)
    }
}

impl From<Variable> for Term {
    fn from(variable: Variable) -> Term {
        Term::Variable(variable)
    }
}

impl From<Function> for Term {
    fn from(function: Function) -> Term {
        Term::Fun(function)
    }
}
