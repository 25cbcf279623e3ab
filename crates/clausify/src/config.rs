//! Converter configuration types.

/// Configuration for clause conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Display-name prefix for Skolem functions (`sk0`, `sk1`, ...)
    pub skolem_prefix: String,
    /// Display-name prefix for definitional symbols (`def0`, `def1`, ...)
    pub definition_prefix: String,
    /// Fold the input with the evaluator first, drop tautologies and remove
    /// false literals from the produced clauses
    pub simplify: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        ConverterConfig {
            skolem_prefix: "sk".to_string(),
            definition_prefix: "def".to_string(),
            simplify: false,
        }
    }
}
