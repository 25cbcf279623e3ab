//! Normal forms: negation normal form and clause conversion

pub mod cnf_conversion;
pub mod nnf;


pub use cnf_conversion::{convert, convert_with_config, Converter};
pub use nnf::lower_not;
