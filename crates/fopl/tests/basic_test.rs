//! Integration tests for the public term/formula/unification API

use fopl::{
    unify, unify_with, Expression, FoplError, Formula, Predicate, Registry, RenameMap,
    Substitution, Symbol, Term, TruthValue, UnificationError, Unifiable, Variable,
};
use std::collections::HashSet;

fn truth(registry: &Registry, name: &str, value: bool) -> Formula {
    Formula::Predicate(Predicate::new(registry.get(name).unwrap(), vec![]).with_value(value))
}

#[test]
fn test_symbols_are_interned() {
    let registry = Registry::new();
    for name in ["p", "X", "foo_bar", "G0"] {
        let first = registry.get(name).unwrap();
        let second = registry.get(name).unwrap();
        assert!(Symbol::ptr_eq(&first, &second));
    }
    assert!(matches!(registry.get(""), Err(FoplError::InvalidArgument(_))));
}

#[test]
fn test_fresh_symbols_follow_prefix_and_counter() {
    let registry = Registry::new();
    let names: Vec<_> = (0..5)
        .map(|_| registry.generate(Some("V")).name().to_string())
        .collect();
    assert_eq!(names, vec!["V0", "V1", "V2", "V3", "V4"]);
}

#[test]
fn test_variable_binding() {
    let registry = Registry::new();
    let x = Variable::named(&registry, "X").unwrap();
    let t = Term::function(
        &registry,
        "f",
        vec![Term::constant(&registry, "a").unwrap()],
    )
    .unwrap();

    let sigma = Term::Variable(x.clone())
        .unify(&t, &Substitution::new())
        .unwrap();
    assert!(sigma.is_bound(&x));
    assert_eq!(sigma.binding(&x).unwrap(), &t);
}

#[test]
fn test_ground_mismatch_fails_both_ways() {
    let registry = Registry::new();
    let a = Term::constant(&registry, "a").unwrap();
    let b = Term::constant(&registry, "b").unwrap();
    let fa = Term::function(&registry, "f", vec![a.clone()]).unwrap();
    let faa = Term::function(&registry, "f", vec![a.clone(), a.clone()]).unwrap();

    for (left, right) in [(&a, &b), (&fa, &faa), (&a, &fa)] {
        assert!(unify(left, right).is_err());
        assert!(unify(right, left).is_err());
    }
    assert!(unify(&fa, &fa).unwrap().is_empty());
}

#[test]
fn test_unifier_composes_with_clause_substitution() {
    let registry = Registry::new();
    let x = Term::var(&registry, "X").unwrap();
    let a = Term::constant(&registry, "a").unwrap();

    let goal = Formula::predicate(&registry, "p", vec![x.clone(), x.clone()]).unwrap();
    let fact = Formula::predicate(&registry, "p", vec![a.clone(), x.clone()]).unwrap();

    // Standardize the fact apart first, as a resolution step would
    let mut renames = RenameMap::new();
    let fact = fact.standardize_apart(&mut renames, &registry);
    assert_eq!(fact.to_string(), "p(a,X0)");

    let sigma = unify(&goal, &fact).unwrap();
    let instance = goal.replace_variables(&sigma);
    assert!(instance.is_ground());
    assert_eq!(instance.to_string(), "p(a,a)");
    assert_eq!(fact.replace_variables(&sigma), instance);

    let z = Variable::named(&registry, "Z").unwrap();
    let clause_subst = Substitution::from_bindings([(z.clone(), x)]).unwrap();
    let composed = clause_subst.compose(&sigma).unwrap();
    assert_eq!(composed.binding(&z).unwrap(), &a);
    assert_eq!(composed.len(), 3);
}

#[test]
fn test_unify_with_threads_existing_bindings() {
    let registry = Registry::new();
    let x = Variable::named(&registry, "X").unwrap();
    let b = Term::constant(&registry, "b").unwrap();
    let subst = Substitution::from_bindings([(x.clone(), b.clone())]).unwrap();

    let left = Term::function(&registry, "f", vec![Term::Variable(x)]).unwrap();
    let right = Term::function(&registry, "f", vec![Term::var(&registry, "Y").unwrap()]).unwrap();

    let sigma = unify_with(&left, &right, &subst).unwrap();
    assert_eq!(
        sigma
            .binding(&Variable::named(&registry, "Y").unwrap())
            .unwrap(),
        &b
    );
    assert_eq!(subst.len(), 1);
}

#[test]
fn test_standardizing_twice_never_overlaps() {
    let registry = Registry::new();
    let x = Term::var(&registry, "X").unwrap();
    let y = Term::var(&registry, "Y").unwrap();
    let formula = Formula::implies(
        Formula::predicate(&registry, "parent", vec![x.clone(), y.clone()]).unwrap(),
        Formula::predicate(&registry, "ancestor", vec![x, y]).unwrap(),
    );

    let first = formula.standardize_apart(&mut RenameMap::new(), &registry);
    let second = formula.standardize_apart(&mut RenameMap::new(), &registry);

    let first_names: HashSet<_> = first.variables().into_iter().collect();
    let second_names: HashSet<_> = second.variables().into_iter().collect();
    assert_eq!(first_names.len(), 2);
    assert!(first_names.is_disjoint(&second_names));
    assert_eq!(first.value(), formula.value());
}

#[test]
fn test_and_operator_values_and_tail() {
    let registry = Registry::new();
    let t = truth(&registry, "t", true);
    let f = truth(&registry, "f", false);

    assert_eq!(
        Formula::and(vec![t.clone(), f.clone(), t.clone()]).value(),
        TruthValue::False
    );
    assert_eq!(Formula::and(vec![t.clone(), t.clone()]).value(), TruthValue::True);

    let a = truth(&registry, "a", true);
    let b = truth(&registry, "b", false);
    let c = truth(&registry, "c", true);
    let and = Formula::and(vec![a, b.clone(), c.clone()]);
    assert_eq!(and.operator_tail().unwrap(), Formula::and(vec![b, c]));
    assert_eq!(and.to_string(), "(and a b c)");
}

#[test]
fn test_occurs_check_is_reported() {
    let registry = Registry::new();
    let x = Term::var(&registry, "X").unwrap();
    let gx = Term::function(&registry, "g", vec![x.clone()]).unwrap();

    let err = unify(&x, &gx).unwrap_err();
    assert!(matches!(err, UnificationError::OccursCheck(_, _)));
    assert_eq!(err.to_string(), "occurs check: X occurs in g(X)");
}

#[test]
fn test_serde_round_trip_uses_global_registry() {
    let registry = Registry::global();
    let formula = Formula::and(vec![
        Formula::Predicate(
            Predicate::new(
                registry.get("likes").unwrap(),
                vec![
                    Term::var(registry, "Who").unwrap(),
                    Term::function(
                        registry,
                        "best_friend",
                        vec![Term::constant(registry, "alice").unwrap()],
                    )
                    .unwrap(),
                ],
            )
            .with_value(true),
        ),
        Formula::not(truth(registry, "bored", false)),
    ]);

    let json = serde_json::to_string(&formula).unwrap();
    let restored: Formula = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, formula);
    assert_eq!(restored.value(), TruthValue::True);
    assert!(Symbol::ptr_eq(
        &restored.variables()[0].symbol,
        &registry.get("Who").unwrap()
    ));
}

#[test]
fn test_deserialize_rejects_bad_operand_count() {
    let json = r#"{"Operator":{"kind":"not","operands":[]}}"#;
    assert!(serde_json::from_str::<Formula>(json).is_err());
}
