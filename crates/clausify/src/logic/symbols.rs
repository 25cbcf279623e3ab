//! Symbol identities for variables and function symbols
//!
//! Variables and function symbols are compared by identity, never by name.
//! Every allocation in a [`SymbolTable`] yields a new ID, even when the same
//! display name is requested twice; names exist only for display.
//!
//! Each ID type is a `u32` newtype:
//! - `VariableId` for variables
//! - `FunctionId` for function symbols (declared, Skolem and definitional)
//!
//! The table is passed through the conversion context rather than living in
//! global state, so independent conversions never share generators.

use std::fmt;

use super::term::{Function, Variable};

/// ID of a variable
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(pub(crate) u32);

/// ID of a function symbol
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(pub(crate) u32);

impl VariableId {
    /// Get the raw ID value (for debugging)
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl FunctionId {
    /// Get the raw ID value (for debugging)
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Where a function symbol came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FunctionKind {
    /// Created by the caller
    #[default]
    Declared,
    /// Introduced while eliminating an existential quantifier
    Skolem,
    /// Introduced to name a sub-formula (biconditional or distribution renaming)
    Definition,
}

impl FunctionKind {
    /// Symbols minted by the converter rather than by the caller
    pub fn is_generated(self) -> bool {
        !matches!(self, FunctionKind::Declared)
    }
}

/// Optional display names, indexed by ID
#[derive(Debug, Clone, Default)]
struct NameArena {
    names: Vec<Option<String>>,
}

impl NameArena {
    /// Allocate a new slot; never reuses an existing one
    fn push(&mut self, name: Option<&str>) -> u32 {
        let id = self.names.len() as u32;
        self.names.push(name.map(str::to_string));
        id
    }

    fn resolve(&self, id: u32) -> Option<&str> {
        self.names.get(id as usize).and_then(|n| n.as_deref())
    }

    fn len(&self) -> usize {
        self.names.len()
    }
}

/// Allocator and name store for variables and function symbols
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    variables: NameArena,
    functions: NameArena,
}

impl SymbolTable {
    /// Create a new empty table
    pub fn new() -> Self {
        SymbolTable::default()
    }

    // === Variables ===

    /// Allocate a new variable with an optional display name
    pub fn new_variable(&mut self, name: Option<&str>) -> Variable {
        Variable::new(VariableId(self.variables.push(name)))
    }

    /// Allocate a fresh variable that displays like `original`
    pub fn fresh_variable_like(&mut self, original: Variable) -> Variable {
        let name = self.variable_name(original.id).map(str::to_string);
        self.new_variable(name.as_deref())
    }

    /// Resolve a variable ID to its display name, if it has one
    pub fn variable_name(&self, id: VariableId) -> Option<&str> {
        self.variables.resolve(id.0)
    }

    /// Number of allocated variables
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    // === Function symbols ===

    /// Allocate a new caller-declared function symbol
    pub fn new_function(&mut self, name: Option<&str>) -> Function {
        self.new_function_of_kind(name, FunctionKind::Declared)
    }

    /// Allocate a new function symbol with the given origin
    pub fn new_function_of_kind(&mut self, name: Option<&str>, kind: FunctionKind) -> Function {
        Function::new(FunctionId(self.functions.push(name)), kind)
    }

    /// Resolve a function ID to its display name, if it has one
    pub fn function_name(&self, id: FunctionId) -> Option<&str> {
        self.functions.resolve(id.0)
    }

    /// Number of allocated function symbols
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.0)
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}
