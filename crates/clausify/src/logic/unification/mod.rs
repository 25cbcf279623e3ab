//! Unification and substitution application for first-order terms

pub mod mgu;


pub use mgu::{unify, unify_with, UnificationError, UnificationResult};
