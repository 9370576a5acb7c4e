//! Variable substitutions

use crate::error::{FoplError, Result};
use crate::expression::Expression;
use crate::term::{Term, Variable};
use indexmap::IndexMap;
use std::fmt;
use tracing::trace;

/// An ordered set of variable -> term bindings
///
/// Bindings are add-only: a variable is bound at most once, and no binding may
/// lead a lookup back to its own variable. Unification extends a substitution
/// by copying it (`Clone`), so an abandoned attempt leaves the original intact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    bindings: IndexMap<Variable, Term>,
}

impl Substitution {
    /// Create a new empty substitution
    pub fn new() -> Self {
        Substitution {
            bindings: IndexMap::new(),
        }
    }

    /// Build a substitution from bindings, added in order
    pub fn from_bindings<I>(bindings: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Variable, Term)>,
    {
        let mut subst = Substitution::new();
        for (var, term) in bindings {
            subst.add(var, term)?;
        }
        Ok(subst)
    }

    pub fn is_bound(&self, var: &Variable) -> bool {
        self.bindings.contains_key(var)
    }

    /// Get the term for a variable, if bound
    pub fn get(&self, var: &Variable) -> Option<&Term> {
        self.bindings.get(var)
    }

    /// Get the term for a variable, failing with `UnboundVariable` if unbound
    pub fn binding(&self, var: &Variable) -> Result<&Term> {
        self.get(var)
            .ok_or_else(|| FoplError::UnboundVariable(var.clone()))
    }

    /// Bind `var` to `term`.
    ///
    /// Fails with `AlreadyBound` if `var` has a binding, and with
    /// `CyclicBinding` if `term` reaches `var` through existing bindings.
    pub fn add(&mut self, var: Variable, term: Term) -> Result<()> {
        if let Some(existing) = self.bindings.get(&var) {
            return Err(FoplError::AlreadyBound {
                variable: var,
                existing: existing.clone(),
            });
        }
        if self.reaches(&var, &term) {
            return Err(FoplError::CyclicBinding { variable: var, term });
        }
        self.bind(var, term);
        Ok(())
    }

    /// A copy of this substitution with one more binding
    pub fn extended(&self, var: Variable, term: Term) -> Result<Substitution> {
        let mut sigma = self.clone();
        sigma.add(var, term)?;
        Ok(sigma)
    }

    /// Insert without the bound/cycle checks; callers have established both
    pub(crate) fn bind(&mut self, var: Variable, term: Term) {
        trace!(variable = %var, term = %term, "bind");
        self.bindings.insert(var, term);
    }

    /// True if `term` mentions `var`, directly or through bindings
    pub fn reaches(&self, var: &Variable, term: &Term) -> bool {
        match term {
            Term::Variable(v) => {
                v == var
                    || self
                        .bindings
                        .get(v)
                        .is_some_and(|bound| self.reaches(var, bound))
            }
            Term::Constant(_) => false,
            Term::Function(_, args) => args.iter().any(|arg| self.reaches(var, arg)),
        }
    }

    /// Follow variable bindings until a non-variable or an unbound variable
    pub fn resolve<'a>(&'a self, term: &'a Term) -> &'a Term {
        let mut current = term;
        while let Term::Variable(v) = current {
            match self.bindings.get(v) {
                Some(bound) => current = bound,
                None => break,
            }
        }
        current
    }

    /// Compose two substitutions: applying the result equals applying `self`
    /// and then `other`.
    ///
    /// Identity bindings are dropped. The result is idempotent: no bound term
    /// mentions a variable the result binds. A composition that needs such a
    /// binding (e.g. `{X -> Y}` then `{Z -> X}`, where `Z` must end up as `X`
    /// while `X` becomes `Y`) fails with `UnrepresentableComposition`.
    pub fn compose(&self, other: &Substitution) -> Result<Substitution> {
        let mut composed: IndexMap<Variable, Term> = IndexMap::new();

        // Apply other to all terms in self, then take other's remaining bindings
        let domain = self
            .bindings
            .keys()
            .chain(other.bindings.keys().filter(|var| !self.is_bound(var)));
        for var in domain {
            let term = Term::Variable(var.clone())
                .replace_variables(self)
                .replace_variables(other);
            if term.as_variable() != Some(var) {
                composed.insert(var.clone(), term);
            }
        }

        for (var, term) in &composed {
            if composed.keys().any(|bound| term.contains_variable(bound)) {
                return Err(FoplError::UnrepresentableComposition {
                    variable: var.clone(),
                    term: term.clone(),
                });
            }
        }

        let mut result = Substitution::new();
        for (var, term) in composed {
            result.bind(var, term);
        }
        Ok(result)
    }

    /// Bound variables with their terms, in binding order
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Term)> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (var, term)) in self.bindings.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} -> {}", var, term)?;
        }
        write!(f, "}}")
    }
}
