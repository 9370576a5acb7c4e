//! Unification of terms and formulas

pub(crate) mod mgu;


pub use mgu::{unify, unify_with, UnificationError, UnificationResult};
