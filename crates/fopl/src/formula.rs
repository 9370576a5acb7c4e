//! Formulas: predicates and logical operators
//!
//! Every formula carries a [`TruthValue`]. Predicates get theirs from an
//! interpretation (`Predicate::with_value`); operators derive theirs eagerly
//! from their operands when constructed, using strong Kleene three-valued
//! logic so that an `Unknown` operand only decides the result when the known
//! operands cannot.

use crate::error::{FoplError, Result};
use crate::expression::{Expression, RenameMap, Unifiable};
use crate::substitution::Substitution;
use crate::symbol::{Registry, Symbol};
use crate::term::{Term, Variable};
use crate::unification::{mgu, UnificationResult};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-valued truth: `Unknown` is the unassigned state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TruthValue {
    True,
    False,
    #[default]
    Unknown,
}

impl TruthValue {
    pub fn is_known(self) -> bool {
        self != TruthValue::Unknown
    }

    pub fn to_bool(self) -> Option<bool> {
        match self {
            TruthValue::True => Some(true),
            TruthValue::False => Some(false),
            TruthValue::Unknown => None,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> TruthValue {
        match self {
            TruthValue::True => TruthValue::False,
            TruthValue::False => TruthValue::True,
            TruthValue::Unknown => TruthValue::Unknown,
        }
    }

    pub fn and(self, other: TruthValue) -> TruthValue {
        match (self, other) {
            (TruthValue::False, _) | (_, TruthValue::False) => TruthValue::False,
            (TruthValue::True, TruthValue::True) => TruthValue::True,
            _ => TruthValue::Unknown,
        }
    }

    pub fn or(self, other: TruthValue) -> TruthValue {
        match (self, other) {
            (TruthValue::True, _) | (_, TruthValue::True) => TruthValue::True,
            (TruthValue::False, TruthValue::False) => TruthValue::False,
            _ => TruthValue::Unknown,
        }
    }

    pub fn implies(self, other: TruthValue) -> TruthValue {
        self.not().or(other)
    }

    pub fn iff(self, other: TruthValue) -> TruthValue {
        match (self.to_bool(), other.to_bool()) {
            (Some(a), Some(b)) => TruthValue::from(a == b),
            _ => TruthValue::Unknown,
        }
    }
}

impl From<bool> for TruthValue {
    fn from(value: bool) -> Self {
        if value {
            TruthValue::True
        } else {
            TruthValue::False
        }
    }
}

impl From<Option<bool>> for TruthValue {
    fn from(value: Option<bool>) -> Self {
        value.map_or(TruthValue::Unknown, TruthValue::from)
    }
}

impl fmt::Display for TruthValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TruthValue::True => write!(f, "true"),
            TruthValue::False => write!(f, "false"),
            TruthValue::Unknown => write!(f, "unknown"),
        }
    }
}

/// The logical connectives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorKind {
    And,
    Or,
    Not,
    Implies,
    Iff,
}

impl OperatorKind {
    /// Name used when rendering
    pub fn name(self) -> &'static str {
        match self {
            OperatorKind::And => "and",
            OperatorKind::Or => "or",
            OperatorKind::Not => "not",
            OperatorKind::Implies => "implies",
            OperatorKind::Iff => "iff",
        }
    }

    /// True for the n-ary connectives
    pub fn is_variadic(self) -> bool {
        matches!(self, OperatorKind::And | OperatorKind::Or)
    }

    /// Required operand count, `None` for n-ary connectives
    pub fn arity(self) -> Option<usize> {
        match self {
            OperatorKind::And | OperatorKind::Or => None,
            OperatorKind::Not => Some(1),
            OperatorKind::Implies | OperatorKind::Iff => Some(2),
        }
    }

    fn evaluate(self, operands: &[Formula]) -> TruthValue {
        match self {
            OperatorKind::And => {
                let mut value = TruthValue::True;
                for operand in operands {
                    value = value.and(operand.value());
                    if value == TruthValue::False {
                        break;
                    }
                }
                value
            }
            OperatorKind::Or => {
                let mut value = TruthValue::False;
                for operand in operands {
                    value = value.or(operand.value());
                    if value == TruthValue::True {
                        break;
                    }
                }
                value
            }
            OperatorKind::Not => operands[0].value().not(),
            OperatorKind::Implies => operands[0].value().implies(operands[1].value()),
            OperatorKind::Iff => operands[0].value().iff(operands[1].value()),
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An atomic formula (predicate symbol applied to terms)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Predicate {
    pub symbol: Symbol,
    pub args: Vec<Term>,
    /// Assigned by an interpretation, never derived
    #[serde(default)]
    pub value: TruthValue,
}

impl Predicate {
    /// Create an unvalued predicate
    pub fn new(symbol: Symbol, args: Vec<Term>) -> Self {
        Predicate {
            symbol,
            args,
            value: TruthValue::Unknown,
        }
    }

    pub fn with_value(mut self, value: impl Into<TruthValue>) -> Self {
        self.value = value.into();
        self
    }

    pub fn name(&self) -> &str {
        self.symbol.name()
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

/// A connective over operand formulas
///
/// The value is computed once, at construction, from the operands' values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "OperatorRepr")]
pub struct Operator {
    kind: OperatorKind,
    operands: Vec<Formula>,
    value: TruthValue,
}

/// Serialized shape of an operator; the value is re-derived on load
#[derive(Deserialize)]
struct OperatorRepr {
    kind: OperatorKind,
    operands: Vec<Formula>,
}

impl TryFrom<OperatorRepr> for Operator {
    type Error = FoplError;

    fn try_from(repr: OperatorRepr) -> Result<Self> {
        Operator::new(repr.kind, repr.operands)
    }
}

impl Operator {
    /// Build an operator, checking the operand count for fixed-arity kinds
    pub fn new(kind: OperatorKind, operands: Vec<Formula>) -> Result<Self> {
        if let Some(arity) = kind.arity() {
            if operands.len() != arity {
                return Err(FoplError::invalid_argument(format!(
                    "`{}` takes {} operand(s), got {}",
                    kind,
                    arity,
                    operands.len()
                )));
            }
        }
        Ok(Operator::derive(kind, operands))
    }

    /// Operand count must already match `kind`
    fn derive(kind: OperatorKind, operands: Vec<Formula>) -> Self {
        let value = kind.evaluate(&operands);
        Operator {
            kind,
            operands,
            value,
        }
    }

    pub fn kind(&self) -> OperatorKind {
        self.kind
    }

    pub fn operands(&self) -> &[Formula] {
        &self.operands
    }

    pub fn value(&self) -> TruthValue {
        self.value
    }

    /// The same connective over all operands but the first.
    ///
    /// Only defined for `and`/`or`. A single-operand operator yields the empty
    /// operator of its kind; an empty one has no tail.
    pub fn operator_tail(&self) -> Result<Operator> {
        if !self.kind.is_variadic() {
            return Err(FoplError::unsupported(format!(
                "`{}` has no operator tail",
                self.kind
            )));
        }
        match self.operands.split_first() {
            Some((_, tail)) => Ok(Operator::derive(self.kind, tail.to_vec())),
            None => Err(FoplError::invalid_argument(format!(
                "empty `{}` has no operator tail",
                self.kind
            ))),
        }
    }

    fn map_operands(&self, f: impl FnMut(&Formula) -> Formula) -> Operator {
        Operator::derive(self.kind, self.operands.iter().map(f).collect())
    }
}

/// A formula in first-order logic
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Formula {
    Predicate(Predicate),
    Operator(Operator),
}

impl Formula {
    /// Build an unvalued predicate `name(args...)`
    pub fn predicate(registry: &Registry, name: &str, args: Vec<Term>) -> Result<Formula> {
        Ok(Formula::Predicate(Predicate::new(registry.get(name)?, args)))
    }

    pub fn and(operands: Vec<Formula>) -> Formula {
        Formula::Operator(Operator::derive(OperatorKind::And, operands))
    }

    pub fn or(operands: Vec<Formula>) -> Formula {
        Formula::Operator(Operator::derive(OperatorKind::Or, operands))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(operand: Formula) -> Formula {
        Formula::Operator(Operator::derive(OperatorKind::Not, vec![operand]))
    }

    pub fn implies(antecedent: Formula, consequent: Formula) -> Formula {
        Formula::Operator(Operator::derive(
            OperatorKind::Implies,
            vec![antecedent, consequent],
        ))
    }

    pub fn iff(left: Formula, right: Formula) -> Formula {
        Formula::Operator(Operator::derive(OperatorKind::Iff, vec![left, right]))
    }

    pub fn value(&self) -> TruthValue {
        match self {
            Formula::Predicate(p) => p.value,
            Formula::Operator(op) => op.value,
        }
    }

    /// Predicate symbol name or connective name
    pub fn name(&self) -> &str {
        match self {
            Formula::Predicate(p) => p.name(),
            Formula::Operator(op) => op.kind.name(),
        }
    }

    /// An atomic formula is a predicate
    pub fn is_atomic(&self) -> bool {
        matches!(self, Formula::Predicate(_))
    }

    /// A literal is an atomic formula or the negation of one
    pub fn is_literal(&self) -> bool {
        match self {
            Formula::Predicate(_) => true,
            Formula::Operator(op) => {
                op.kind == OperatorKind::Not && op.operands[0].is_atomic()
            }
        }
    }

    /// Operand formulas; empty for predicates
    pub fn operands(&self) -> &[Formula] {
        match self {
            Formula::Predicate(_) => &[],
            Formula::Operator(op) => &op.operands,
        }
    }

    /// See [`Operator::operator_tail`]; predicates have no tail
    pub fn operator_tail(&self) -> Result<Formula> {
        match self {
            Formula::Predicate(p) => Err(FoplError::unsupported(format!(
                "predicate `{}` has no operator tail",
                p.name()
            ))),
            Formula::Operator(op) => op.operator_tail().map(Formula::Operator),
        }
    }

    /// Collect all variables in this formula, in order of first occurrence
    pub fn collect_variables(&self, vars: &mut IndexSet<Variable>) {
        match self {
            Formula::Predicate(p) => {
                for arg in &p.args {
                    arg.collect_variables(vars);
                }
            }
            Formula::Operator(op) => {
                for operand in &op.operands {
                    operand.collect_variables(vars);
                }
            }
        }
    }

    pub fn variables(&self) -> Vec<Variable> {
        let mut vars = IndexSet::new();
        self.collect_variables(&mut vars);
        vars.into_iter().collect()
    }

    pub fn is_ground(&self) -> bool {
        match self {
            Formula::Predicate(p) => p.args.iter().all(Term::is_ground),
            Formula::Operator(op) => op.operands.iter().all(Formula::is_ground),
        }
    }
}

impl From<Predicate> for Formula {
    fn from(p: Predicate) -> Self {
        Formula::Predicate(p)
    }
}

impl From<Operator> for Formula {
    fn from(op: Operator) -> Self {
        Formula::Operator(op)
    }
}

impl Expression for Formula {
    fn replace_variables(&self, substitution: &Substitution) -> Formula {
        match self {
            Formula::Predicate(p) => Formula::Predicate(Predicate {
                symbol: p.symbol.clone(),
                args: p
                    .args
                    .iter()
                    .map(|arg| arg.replace_variables(substitution))
                    .collect(),
                value: p.value,
            }),
            Formula::Operator(op) => Formula::Operator(
                op.map_operands(|operand| operand.replace_variables(substitution)),
            ),
        }
    }

    fn standardize_apart(&self, renames: &mut RenameMap, registry: &Registry) -> Formula {
        match self {
            Formula::Predicate(p) => Formula::Predicate(Predicate {
                symbol: p.symbol.clone(),
                args: p
                    .args
                    .iter()
                    .map(|arg| arg.standardize_apart(renames, registry))
                    .collect(),
                value: p.value,
            }),
            Formula::Operator(op) => Formula::Operator(
                op.map_operands(|operand| operand.standardize_apart(renames, registry)),
            ),
        }
    }
}

impl Unifiable for Formula {
    fn unify(&self, other: &Formula, substitution: &Substitution) -> UnificationResult {
        mgu::unify_formulas(self, other, substitution)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)?;
        if self.args.is_empty() {
            return Ok(());
        }
        write!(f, "(")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.kind)?;
        for operand in &self.operands {
            write!(f, " {}", operand)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Predicate(p) => write!(f, "{}", p),
            Formula::Operator(op) => write!(f, "{}", op),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valued(registry: &Registry, name: &str, value: TruthValue) -> Formula {
        Formula::Predicate(Predicate::new(registry.get(name).unwrap(), vec![]).with_value(value))
    }

    #[test]
    fn test_and_short_circuits_on_false() {
        let registry = Registry::new();
        let t = valued(&registry, "t", TruthValue::True);
        let f = valued(&registry, "f", TruthValue::False);

        let mixed = Formula::and(vec![t.clone(), f, t.clone()]);
        assert_eq!(mixed.value(), TruthValue::False);

        let all_true = Formula::and(vec![t.clone(), t]);
        assert_eq!(all_true.value(), TruthValue::True);
    }

    #[test]
    fn test_unknown_propagation() {
        let registry = Registry::new();
        let t = valued(&registry, "t", TruthValue::True);
        let f = valued(&registry, "f", TruthValue::False);
        let u = valued(&registry, "u", TruthValue::Unknown);

        assert_eq!(Formula::and(vec![t.clone(), u.clone()]).value(), TruthValue::Unknown);
        assert_eq!(Formula::and(vec![u.clone(), f.clone()]).value(), TruthValue::False);
        assert_eq!(Formula::or(vec![u.clone(), t.clone()]).value(), TruthValue::True);
        assert_eq!(Formula::or(vec![f.clone(), u.clone()]).value(), TruthValue::Unknown);
        assert_eq!(Formula::not(u.clone()).value(), TruthValue::Unknown);
        assert_eq!(Formula::implies(f.clone(), u.clone()).value(), TruthValue::True);
        assert_eq!(Formula::implies(u.clone(), t.clone()).value(), TruthValue::True);
        assert_eq!(Formula::implies(t.clone(), u.clone()).value(), TruthValue::Unknown);
        assert_eq!(Formula::iff(u, t.clone()).value(), TruthValue::Unknown);
        assert_eq!(Formula::iff(f.clone(), f).value(), TruthValue::True);
        assert_eq!(Formula::not(t).value(), TruthValue::False);
    }

    #[test]
    fn test_empty_operators() {
        assert_eq!(Formula::and(vec![]).value(), TruthValue::True);
        assert_eq!(Formula::or(vec![]).value(), TruthValue::False);
    }

    #[test]
    fn test_operator_tail() {
        let registry = Registry::new();
        let a = valued(&registry, "a", TruthValue::False);
        let b = valued(&registry, "b", TruthValue::True);
        let c = valued(&registry, "c", TruthValue::True);

        let and = Formula::and(vec![a, b.clone(), c.clone()]);
        let tail = and.operator_tail().unwrap();

        assert_eq!(tail, Formula::and(vec![b.clone(), c]));
        assert_eq!(tail.value(), TruthValue::True);

        let single = Formula::or(vec![b]);
        assert_eq!(single.operator_tail().unwrap(), Formula::or(vec![]));
    }

    #[test]
    fn test_operator_tail_errors() {
        let registry = Registry::new();
        let p = valued(&registry, "p", TruthValue::True);

        assert!(matches!(
            Formula::and(vec![]).operator_tail(),
            Err(FoplError::InvalidArgument(_))
        ));
        assert!(matches!(
            Formula::not(p.clone()).operator_tail(),
            Err(FoplError::Unsupported(_))
        ));
        assert!(matches!(p.operator_tail(), Err(FoplError::Unsupported(_))));
    }

    #[test]
    fn test_operator_new_checks_arity() {
        let registry = Registry::new();
        let p = valued(&registry, "p", TruthValue::True);

        assert!(matches!(
            Operator::new(OperatorKind::Not, vec![p.clone(), p.clone()]),
            Err(FoplError::InvalidArgument(_))
        ));
        assert!(matches!(
            Operator::new(OperatorKind::Implies, vec![p.clone()]),
            Err(FoplError::InvalidArgument(_))
        ));
        let not = Operator::new(OperatorKind::Not, vec![p]).unwrap();
        assert_eq!(not.value(), TruthValue::False);
    }

    #[test]
    fn test_literals() {
        let registry = Registry::new();
        let p = Formula::predicate(&registry, "p", vec![]).unwrap();
        let q = Formula::predicate(&registry, "q", vec![]).unwrap();

        assert!(p.is_atomic());
        assert!(p.is_literal());
        assert!(Formula::not(p.clone()).is_literal());
        assert!(!Formula::not(p.clone()).is_atomic());
        assert!(!Formula::not(Formula::not(p.clone())).is_literal());
        assert!(!Formula::and(vec![p, q]).is_literal());
    }

    #[test]
    fn test_equality_includes_value_and_kind() {
        let registry = Registry::new();
        let p_true = valued(&registry, "p", TruthValue::True);
        let p_unknown = valued(&registry, "p", TruthValue::Unknown);

        assert_ne!(p_true, p_unknown);
        assert_eq!(p_unknown, Formula::predicate(&registry, "p", vec![]).unwrap());
        assert_ne!(
            Formula::and(vec![p_true.clone()]),
            Formula::or(vec![p_true])
        );
    }

    #[test]
    fn test_substitution_preserves_values() {
        let registry = Registry::new();
        let x = Variable::named(&registry, "X").unwrap();
        let p = Formula::Predicate(
            Predicate::new(registry.get("p").unwrap(), vec![Term::Variable(x.clone())])
                .with_value(true),
        );
        let q = Formula::Predicate(
            Predicate::new(registry.get("q").unwrap(), vec![Term::Variable(x.clone())])
                .with_value(false),
        );
        let formula = Formula::or(vec![p, Formula::not(q)]);

        let subst = Substitution::from_bindings([(x, Term::constant(&registry, "a").unwrap())])
            .unwrap();
        let replaced = formula.replace_variables(&subst);
        assert_eq!(replaced.value(), formula.value());
        assert!(replaced.is_ground());
        assert_eq!(replaced.to_string(), "(or p(a) (not q(a)))");

        let standardized = formula.standardized(&registry);
        assert_eq!(standardized.value(), formula.value());
        assert_eq!(standardized.variables().len(), 1);
        assert_ne!(standardized.variables(), formula.variables());
    }

    #[test]
    fn test_standardize_shares_renames_across_operands() {
        let registry = Registry::new();
        let x = Term::var(&registry, "X").unwrap();
        let formula = Formula::and(vec![
            Formula::predicate(&registry, "p", vec![x.clone()]).unwrap(),
            Formula::predicate(&registry, "q", vec![x]).unwrap(),
        ]);

        let mut renames = RenameMap::new();
        let standardized = formula.standardize_apart(&mut renames, &registry);
        assert_eq!(renames.len(), 1);
        assert_eq!(standardized.to_string(), "(and p(X0) q(X0))");
    }

    #[test]
    fn test_display() {
        let registry = Registry::new();
        let p = Formula::predicate(
            &registry,
            "p",
            vec![Term::var(&registry, "X").unwrap(), Term::constant(&registry, "a").unwrap()],
        )
        .unwrap();
        let q = Formula::predicate(&registry, "q", vec![]).unwrap();

        assert_eq!(p.to_string(), "p(X,a)");
        assert_eq!(
            Formula::implies(Formula::and(vec![p.clone(), q.clone()]), Formula::not(q)).to_string(),
            "(implies (and p(X,a) q) (not q))"
        );
    }
}
