//! Most General Unifier (MGU) computation

use crate::expression::{Expression, Unifiable};
use crate::formula::{Formula, OperatorKind};
use crate::substitution::Substitution;
use crate::symbol::Symbol;
use crate::term::{Term, Variable};
use thiserror::Error;
use tracing::debug;

/// Result of a unification attempt
pub type UnificationResult = Result<Substitution, UnificationError>;

/// Errors that can occur during unification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnificationError {
    /// Constant, functor or predicate symbols don't match
    #[error("symbol clash: {0} vs {1}")]
    SymbolClash(Symbol, Symbol),
    /// Arities don't match
    #[error("arity mismatch: {0} vs {1}")]
    ArityMismatch(usize, usize),
    /// Different kinds of expression, e.g. a constant against a function term
    #[error("cannot unify {left} with {right}")]
    VariantMismatch { left: String, right: String },
    /// Different connectives
    #[error("operator clash: {0} vs {1}")]
    OperatorClash(OperatorKind, OperatorKind),
    /// Occurs check failed - variable occurs in term
    #[error("occurs check: {0} occurs in {1}")]
    OccursCheck(Variable, Term),
}

/// Unify two expressions, returning a most general unifier if one exists
pub fn unify<T: Unifiable>(left: &T, right: &T) -> UnificationResult {
    unify_with(left, right, &Substitution::new())
}

/// Unify two expressions, extending an existing substitution
///
/// `substitution` is left untouched whatever the outcome.
pub fn unify_with<T: Unifiable>(
    left: &T,
    right: &T,
    substitution: &Substitution,
) -> UnificationResult {
    left.unify(right, substitution)
}

fn fail(err: UnificationError) -> UnificationResult {
    debug!(error = %err, "unification failed");
    Err(err)
}

pub(crate) fn unify_terms(left: &Term, right: &Term, subst: &Substitution) -> UnificationResult {
    match (left, right) {
        // The variable always drives, whichever side it is on
        (Term::Variable(v), _) => unify_variable(v, right, subst),
        (_, Term::Variable(v)) => unify_variable(v, left, subst),

        (Term::Constant(c1), Term::Constant(c2)) => {
            if c1.symbol == c2.symbol {
                Ok(subst.clone())
            } else {
                fail(UnificationError::SymbolClash(
                    c1.symbol.clone(),
                    c2.symbol.clone(),
                ))
            }
        }

        (Term::Function(f1, args1), Term::Function(f2, args2)) => {
            if f1 != f2 {
                return fail(UnificationError::SymbolClash(f1.clone(), f2.clone()));
            }
            unify_args(args1, args2, subst)
        }

        // Function-constant clash
        _ => fail(UnificationError::VariantMismatch {
            left: left.to_string(),
            right: right.to_string(),
        }),
    }
}

fn unify_variable(var: &Variable, other: &Term, subst: &Substitution) -> UnificationResult {
    if other.as_variable() == Some(var) {
        return Ok(subst.clone());
    }

    // An existing binding takes precedence over the variable itself
    if let Some(bound) = subst.get(var) {
        return unify_terms(bound, other, subst);
    }

    // Never bind to a bound variable, so lookups stay acyclic
    if let Some(bound) = other.as_variable().and_then(|o| subst.get(o)) {
        return unify_variable(var, bound, subst);
    }

    if subst.reaches(var, other) {
        return fail(UnificationError::OccursCheck(
            var.clone(),
            other.replace_variables(subst),
        ));
    }

    let mut sigma = subst.clone();
    sigma.bind(var.clone(), other.clone());
    Ok(sigma)
}

/// Unify argument lists pairwise, left to right, threading the substitution
fn unify_args(args1: &[Term], args2: &[Term], subst: &Substitution) -> UnificationResult {
    if args1.len() != args2.len() {
        return fail(UnificationError::ArityMismatch(args1.len(), args2.len()));
    }
    args1
        .iter()
        .zip(args2)
        .try_fold(subst.clone(), |sigma, (arg1, arg2)| {
            unify_terms(arg1, arg2, &sigma)
        })
}

/// Formulas unify structurally; truth values play no part.
pub(crate) fn unify_formulas(
    left: &Formula,
    right: &Formula,
    subst: &Substitution,
) -> UnificationResult {
    match (left, right) {
        (Formula::Predicate(p1), Formula::Predicate(p2)) => {
            if p1.symbol != p2.symbol {
                return fail(UnificationError::SymbolClash(
                    p1.symbol.clone(),
                    p2.symbol.clone(),
                ));
            }
            unify_args(&p1.args, &p2.args, subst)
        }

        (Formula::Operator(op1), Formula::Operator(op2)) => {
            if op1.kind() != op2.kind() {
                return fail(UnificationError::OperatorClash(op1.kind(), op2.kind()));
            }
            let (operands1, operands2) = (op1.operands(), op2.operands());
            if operands1.len() != operands2.len() {
                return fail(UnificationError::ArityMismatch(
                    operands1.len(),
                    operands2.len(),
                ));
            }
            operands1
                .iter()
                .zip(operands2)
                .try_fold(subst.clone(), |sigma, (f1, f2)| {
                    unify_formulas(f1, f2, &sigma)
                })
        }

        _ => fail(UnificationError::VariantMismatch {
            left: left.to_string(),
            right: right.to_string(),
        }),
    }
}
