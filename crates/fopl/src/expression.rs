//! Capabilities shared by terms and formulas

use crate::substitution::Substitution;
use crate::symbol::Registry;
use crate::term::Variable;
use crate::unification::UnificationResult;
use indexmap::IndexMap;

/// Old variable -> fresh replacement, accumulated over one standardization pass
/// so repeated occurrences of a variable get the same replacement.
pub type RenameMap = IndexMap<Variable, Variable>;

/// Anything whose variables can be substituted or renamed apart
pub trait Expression: Sized {
    /// Return a copy with every bound variable replaced by its binding
    fn replace_variables(&self, substitution: &Substitution) -> Self;

    /// Return a copy with every variable renamed to a fresh one.
    ///
    /// Variables already present in `renames` reuse their recorded replacement;
    /// new ones get a name from `registry` and are recorded.
    ///
    /// `registry` must be the one this expression's symbols were interned in
    /// (the global registry for deserialized values). Fresh names are only
    /// unused within that registry.
    fn standardize_apart(&self, renames: &mut RenameMap, registry: &Registry) -> Self;

    /// Standardize with a fresh, empty rename map
    fn standardized(&self, registry: &Registry) -> Self {
        self.standardize_apart(&mut RenameMap::new(), registry)
    }
}

/// Anything that can be unified against another value of its kind
pub trait Unifiable: Expression {
    /// Try to extend `substitution` so that `self` and `other` become equal.
    ///
    /// On success returns the extended substitution; `substitution` itself is
    /// never modified.
    fn unify(&self, other: &Self, substitution: &Substitution) -> UnificationResult;
}
