//! fopl: terms, formulas and unification for first-order predicate logic
//!
//! This library provides the algebra a resolution-style reasoner is built on:
//! interned symbols, terms and formulas over them, substitutions, most general
//! unifiers and standardizing variables apart.

pub mod config;
pub mod error;
pub mod expression;
pub mod formula;
pub mod substitution;
pub mod symbol;
pub mod term;
pub mod unification;

pub use config::RegistryConfig;
pub use error::{FoplError, Result};
pub use expression::{Expression, RenameMap, Unifiable};
pub use formula::{Formula, Operator, OperatorKind, Predicate, TruthValue};
pub use substitution::Substitution;
pub use symbol::{Registry, Symbol};
pub use term::{Constant, Term, Variable};
pub use unification::{unify, unify_with, UnificationError, UnificationResult};
