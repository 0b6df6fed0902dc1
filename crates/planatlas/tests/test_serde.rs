//! Serialization round-trips for the data model.

use planatlas::{
    Atom, CompareOp, Conditions, Expression, Interner, Number, NumericExpr, Parameter,
    PredicateSymbol, Term, VariableId,
};

fn sample_expression(interner: &mut Interner) -> Expression {
    let p = interner.intern_predicate("p");
    let q = interner.intern_predicate("q");
    let atom = |id, var: u32| {
        Atom::predicate(
            PredicateSymbol::new(id, 1),
            vec![Term::Variable(VariableId::new(var))],
        )
    };
    Expression::And(vec![
        Expression::Predicate(atom(p, 0)),
        Expression::Or(vec![
            Expression::Not(Box::new(Expression::Predicate(atom(q, 0)))),
            Expression::Compare(
                CompareOp::Ge,
                NumericExpr::Number(Number::new(2.5)),
                NumericExpr::Duration,
            ),
        ]),
    ])
}

#[test]
fn test_expression_round_trip() {
    let mut interner = Interner::new();
    let expression = sample_expression(&mut interner);
    let json = serde_json::to_string(&expression).unwrap();
    let back: Expression = serde_json::from_str(&json).unwrap();
    assert_eq!(expression, back);
}

#[test]
fn test_conditions_round_trip_drops_cache() {
    let mut interner = Interner::new();
    let ty = interner.intern_type("object");
    let conditions = Conditions::new(
        vec![Parameter::new(VariableId::new(0), ty)],
        sample_expression(&mut interner),
    );
    let json = serde_json::to_string(&conditions).unwrap();
    let back: Conditions = serde_json::from_str(&json).unwrap();
    assert_eq!(conditions, back);
}
