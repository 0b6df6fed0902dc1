//! Conversion to negation normal form
//!
//! The output contains no `Imply` or `Preference` node, and every `Not`
//! wraps a primitive leaf. Quantifiers are fully grounded here: each
//! `Exists`/`Forall` expands into a disjunction or conjunction over every
//! local substitution of its parameters. The expansion multiplies by
//! domain-size^arity per quantifier, which is the accepted price for a
//! quantifier-free literal model downstream.

use crate::ground::{local_substitutions, Universe};
use crate::logic::{Expression, Parameter, Substitution};
use log::trace;

/// Negation-normal-form transformer.
pub struct NnfTransformer<'a> {
    universe: &'a dyn Universe,
}

impl<'a> NnfTransformer<'a> {
    pub fn new(universe: &'a dyn Universe) -> Self {
        NnfTransformer { universe }
    }

    pub fn transform(&self, expression: &Expression) -> Expression {
        self.walk(expression, false)
    }

    fn walk(&self, expression: &Expression, negating: bool) -> Expression {
        match expression {
            Expression::Predicate(_) | Expression::Equals(_, _) | Expression::Compare(_, _, _) => {
                if negating {
                    Expression::Not(Box::new(expression.clone()))
                } else {
                    expression.clone()
                }
            }

            Expression::Not(child) => self.walk(child, !negating),

            Expression::And(children) => {
                let children: Vec<Expression> =
                    children.iter().map(|c| self.walk(c, negating)).collect();
                if negating {
                    // De Morgan: ~(A & B) = ~A | ~B
                    Expression::Or(children)
                } else {
                    Expression::And(children)
                }
            }

            Expression::Or(children) => {
                let children: Vec<Expression> =
                    children.iter().map(|c| self.walk(c, negating)).collect();
                if negating {
                    // De Morgan: ~(A | B) = ~A & ~B
                    Expression::And(children)
                } else {
                    Expression::Or(children)
                }
            }

            // A => B rewrites with only the antecedent's subtree negated;
            // under an outer negation, ~(A => B) = A & ~B.
            Expression::Imply(antecedent, consequent) => {
                if negating {
                    Expression::And(vec![
                        self.walk(antecedent, false),
                        self.walk(consequent, true),
                    ])
                } else {
                    Expression::Or(vec![
                        self.walk(antecedent, true),
                        self.walk(consequent, false),
                    ])
                }
            }

            Expression::Exists(params, body) => self.ground_quantifier(params, body, negating, true),
            Expression::Forall(params, body) => {
                self.ground_quantifier(params, body, negating, false)
            }

            // Preferences are soft constraints; the wrapper is stripped and
            // the body transformed in place.
            Expression::Preference(_, body) => self.walk(body, negating),
        }
    }

    fn ground_quantifier(
        &self,
        params: &[Parameter],
        body: &Expression,
        negating: bool,
        existential: bool,
    ) -> Expression {
        let mut children = Vec::new();
        for binding in local_substitutions(self.universe, params) {
            let mut subst = Substitution::new();
            subst.push_scope(binding);
            let grounded = body.substitute(&subst);
            children.push(self.walk(&grounded, negating));
        }
        trace!(
            "grounded quantifier over {} parameter(s) into {} instance(s)",
            params.len(),
            children.len()
        );

        // Exists and negated Forall combine disjunctively; Forall and
        // negated Exists conjunctively.
        if existential != negating {
            Expression::Or(children)
        } else {
            Expression::And(children)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ground::ObjectFunctionRange;
    use crate::logic::interner::{ObjectId, PredicateId, TypeId};
    use crate::logic::{Atom, PredicateSymbol, Term, VariableId};

    struct PairUniverse {
        objects: Vec<ObjectId>,
    }

    impl Universe for PairUniverse {
        fn objects_of_type(&self, _ty: TypeId) -> &[ObjectId] {
            &self.objects
        }

        fn grounded_predicates(&self) -> &[Atom] {
            &[]
        }

        fn grounded_object_functions(&self) -> &[ObjectFunctionRange] {
            &[]
        }
    }

    fn universe() -> PairUniverse {
        PairUniverse {
            objects: vec![ObjectId(0), ObjectId(1)],
        }
    }

    fn p(v: u32) -> Expression {
        Expression::Predicate(Atom::predicate(
            PredicateSymbol::new(PredicateId(0), 1),
            vec![Term::Variable(VariableId::new(v))],
        ))
    }

    fn q(v: u32) -> Expression {
        Expression::Predicate(Atom::predicate(
            PredicateSymbol::new(PredicateId(1), 1),
            vec![Term::Variable(VariableId::new(v))],
        ))
    }

    fn is_literal(expr: &Expression) -> bool {
        matches!(
            expr,
            Expression::Predicate(_) | Expression::Equals(_, _) | Expression::Compare(_, _, _)
        )
    }

    fn assert_nnf_shape(expr: &Expression) {
        match expr {
            Expression::Not(child) => assert!(
                is_literal(child),
                "Not wraps a non-primitive: {:?}",
                child
            ),
            Expression::And(children) | Expression::Or(children) => {
                children.iter().for_each(assert_nnf_shape)
            }
            Expression::Imply(_, _) | Expression::Preference(_, _) => {
                panic!("Imply/Preference survived NNF: {:?}", expr)
            }
            Expression::Exists(_, _) | Expression::Forall(_, _) => {
                panic!("quantifier survived NNF: {:?}", expr)
            }
            _ => {}
        }
    }

    #[test]
    fn test_negated_conjunction_becomes_disjunction() {
        let universe = universe();
        let nnf = NnfTransformer::new(&universe)
            .transform(&Expression::Not(Box::new(Expression::And(vec![
                p(0),
                q(0),
            ]))));
        match &nnf {
            Expression::Or(children) => {
                assert_eq!(children.len(), 2);
                assert!(matches!(children[0], Expression::Not(_)));
            }
            other => panic!("expected Or, got {:?}", other),
        }
        assert_nnf_shape(&nnf);
    }

    #[test]
    fn test_imply_rewrites_antecedent_only() {
        let universe = universe();
        let nnf = NnfTransformer::new(&universe).transform(&Expression::Imply(
            Box::new(p(0)),
            Box::new(q(0)),
        ));
        match &nnf {
            Expression::Or(children) => {
                assert!(matches!(children[0], Expression::Not(_)));
                assert!(is_literal(&children[1]));
            }
            other => panic!("expected Or, got {:?}", other),
        }
    }

    #[test]
    fn test_exists_grounds_to_disjunction() {
        let universe = universe();
        let expr = Expression::Exists(
            vec![crate::logic::Parameter::new(VariableId::new(0), TypeId(0))],
            Box::new(p(0)),
        );
        let nnf = NnfTransformer::new(&universe).transform(&expr);
        match &nnf {
            Expression::Or(children) => {
                assert_eq!(children.len(), 2);
                for child in children {
                    assert!(is_literal(child));
                    if let Expression::Predicate(atom) = child {
                        assert!(atom.is_ground());
                    }
                }
            }
            other => panic!("expected Or, got {:?}", other),
        }
    }

    #[test]
    fn test_negated_forall_grounds_to_disjunction_of_negations() {
        let universe = universe();
        let expr = Expression::Not(Box::new(Expression::Forall(
            vec![crate::logic::Parameter::new(VariableId::new(0), TypeId(0))],
            Box::new(p(0)),
        )));
        let nnf = NnfTransformer::new(&universe).transform(&expr);
        match &nnf {
            Expression::Or(children) => {
                assert_eq!(children.len(), 2);
                assert!(children
                    .iter()
                    .all(|c| matches!(c, Expression::Not(_))));
            }
            other => panic!("expected Or, got {:?}", other),
        }
        assert_nnf_shape(&nnf);
    }

    #[test]
    fn test_preference_wrapper_is_stripped() {
        let universe = universe();
        let expr = Expression::Preference("stay-clean".into(), Box::new(p(0)));
        let nnf = NnfTransformer::new(&universe).transform(&expr);
        assert!(is_literal(&nnf));
    }
}
