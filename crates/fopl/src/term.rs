//! Terms in first-order logic

use crate::error::Result;
use crate::expression::{Expression, RenameMap, Unifiable};
use crate::substitution::Substitution;
use crate::symbol::{Registry, Symbol};
use crate::unification::{mgu, UnificationResult};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A placeholder term, assigned values through a substitution
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variable {
    pub symbol: Symbol,
}

/// A constant symbol, denoting a fixed individual
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Constant {
    pub symbol: Symbol,
}

/// A term in first-order logic
///
/// Equality includes the variant, so `Constant(a)` never equals the nullary
/// function term `Function(a, [])`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    Variable(Variable),
    Constant(Constant),
    Function(Symbol, Vec<Term>),
}

impl Variable {
    pub fn new(symbol: Symbol) -> Self {
        Variable { symbol }
    }

    /// Create a variable whose symbol is interned in `registry`
    pub fn named(registry: &Registry, name: &str) -> Result<Self> {
        Ok(Variable::new(registry.get(name)?))
    }

    pub fn name(&self) -> &str {
        self.symbol.name()
    }

    /// A variable with a never-used name derived from this one
    ///
    /// `X` becomes e.g. `X7`; a previously generated `X7` becomes `X12`, not
    /// `X712`.
    ///
    /// The name is only guaranteed unused in `registry`, so pass the registry
    /// the surrounding expression was built in.
    pub fn fresh(&self, registry: &Registry) -> Variable {
        let stem = self.name().trim_end_matches(|c: char| c.is_ascii_digit());
        let prefix = if stem.is_empty() { None } else { Some(stem) };
        Variable::new(registry.generate(prefix))
    }
}

impl Constant {
    pub fn new(symbol: Symbol) -> Self {
        Constant { symbol }
    }

    pub fn named(registry: &Registry, name: &str) -> Result<Self> {
        Ok(Constant::new(registry.get(name)?))
    }

    pub fn name(&self) -> &str {
        self.symbol.name()
    }
}

impl Term {
    /// Build a variable term
    pub fn var(registry: &Registry, name: &str) -> Result<Term> {
        Ok(Term::Variable(Variable::named(registry, name)?))
    }

    /// Build a constant term
    pub fn constant(registry: &Registry, name: &str) -> Result<Term> {
        Ok(Term::Constant(Constant::named(registry, name)?))
    }

    /// Build a function term `name(args...)`
    pub fn function(registry: &Registry, name: &str, args: Vec<Term>) -> Result<Term> {
        Ok(Term::Function(registry.get(name)?, args))
    }

    /// The symbol naming this term (the functor for function terms)
    pub fn symbol(&self) -> &Symbol {
        match self {
            Term::Variable(v) => &v.symbol,
            Term::Constant(c) => &c.symbol,
            Term::Function(f, _) => f,
        }
    }

    /// Number of arguments; zero for variables and constants
    pub fn arity(&self) -> usize {
        self.args().len()
    }

    pub fn args(&self) -> &[Term] {
        match self {
            Term::Function(_, args) => args,
            _ => &[],
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Term::Variable(v) => Some(v),
            _ => None,
        }
    }

    /// True if the term contains no variables
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Variable(_) => false,
            Term::Constant(_) => true,
            Term::Function(_, args) => args.iter().all(Term::is_ground),
        }
    }

    /// True if `var` occurs syntactically in this term
    pub fn contains_variable(&self, var: &Variable) -> bool {
        match self {
            Term::Variable(v) => v == var,
            Term::Constant(_) => false,
            Term::Function(_, args) => args.iter().any(|arg| arg.contains_variable(var)),
        }
    }

    /// Collect all variables in this term, in order of first occurrence
    pub fn collect_variables(&self, vars: &mut IndexSet<Variable>) {
        match self {
            Term::Variable(v) => {
                vars.insert(v.clone());
            }
            Term::Constant(_) => {}
            Term::Function(_, args) => {
                for arg in args {
                    arg.collect_variables(vars);
                }
            }
        }
    }

    /// Distinct variables of this term, in order of first occurrence
    pub fn variables(&self) -> Vec<Variable> {
        let mut vars = IndexSet::new();
        self.collect_variables(&mut vars);
        vars.into_iter().collect()
    }
}

impl From<Variable> for Term {
    fn from(v: Variable) -> Self {
        Term::Variable(v)
    }
}

impl From<Constant> for Term {
    fn from(c: Constant) -> Self {
        Term::Constant(c)
    }
}

impl Expression for Term {
    fn replace_variables(&self, substitution: &Substitution) -> Term {
        match self {
            // Bindings are acyclic, so following them terminates
            Term::Variable(v) => match substitution.get(v) {
                Some(bound) => bound.replace_variables(substitution),
                None => self.clone(),
            },
            Term::Constant(_) => self.clone(),
            Term::Function(f, args) => Term::Function(
                f.clone(),
                args.iter()
                    .map(|arg| arg.replace_variables(substitution))
                    .collect(),
            ),
        }
    }

    fn standardize_apart(&self, renames: &mut RenameMap, registry: &Registry) -> Term {
        match self {
            Term::Variable(v) => {
                let renamed = renames
                    .entry(v.clone())
                    .or_insert_with(|| v.fresh(registry));
                Term::Variable(renamed.clone())
            }
            Term::Constant(_) => self.clone(),
            Term::Function(f, args) => Term::Function(
                f.clone(),
                args.iter()
                    .map(|arg| arg.standardize_apart(renames, registry))
                    .collect(),
            ),
        }
    }
}

impl Unifiable for Term {
    fn unify(&self, other: &Term, substitution: &Substitution) -> UnificationResult {
        mgu::unify_terms(self, other, substitution)
    }
}

// Display implementations for pretty printing

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(v) => write!(f, "{}", v),
            Term::Constant(c) => write!(f, "{}", c),
            Term::Function(func, args) => {
                write!(f, "{}(", func)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}
