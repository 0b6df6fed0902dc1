//! Tree-walking evaluation of lifted expressions

use super::{eval_compare, eval_equals, eval_predicate};
use crate::ground::{local_substitutions, RigidFacts, Universe};
use crate::logic::{Conditions, Expression, Substitution};
use crate::state::State;

/// Evaluator for quantifier-bearing expression trees.
///
/// Quantifiers push one local substitution at a time and pop it after the
/// body is evaluated; `Exists` stops on the first success, `Forall` on the
/// first failure, so a caller pulling only a prefix of the groundings never
/// pays for the rest.
pub struct ExpressionEvaluator<'a> {
    universe: &'a dyn Universe,
    rigid: &'a RigidFacts,
}

impl<'a> ExpressionEvaluator<'a> {
    pub fn new(universe: &'a dyn Universe, rigid: &'a RigidFacts) -> Self {
        ExpressionEvaluator { universe, rigid }
    }

    /// Evaluate an expression under a substitution against a state.
    pub fn evaluate(
        &self,
        expression: &Expression,
        subst: &mut Substitution,
        state: &State,
    ) -> bool {
        match expression {
            Expression::Predicate(atom) => {
                eval_predicate(atom, false, subst, state, self.rigid)
            }
            Expression::Equals(left, right) => eval_equals(left, right, false, subst, state),
            Expression::Compare(op, left, right) => {
                eval_compare(*op, left, right, false, subst, state)
            }

            // An empty conjunction is true, an empty disjunction false.
            Expression::And(children) => children
                .iter()
                .all(|child| self.evaluate(child, subst, state)),
            Expression::Or(children) => children
                .iter()
                .any(|child| self.evaluate(child, subst, state)),

            Expression::Not(child) => !self.evaluate(child, subst, state),

            Expression::Imply(antecedent, consequent) => {
                !self.evaluate(antecedent, subst, state)
                    || self.evaluate(consequent, subst, state)
            }

            Expression::Exists(params, body) => {
                for binding in local_substitutions(self.universe, params) {
                    subst.push_scope(binding);
                    let holds = self.evaluate(body, subst, state);
                    subst.pop_scope();
                    if holds {
                        return true;
                    }
                }
                false
            }

            Expression::Forall(params, body) => {
                for binding in local_substitutions(self.universe, params) {
                    subst.push_scope(binding);
                    let holds = self.evaluate(body, subst, state);
                    subst.pop_scope();
                    if !holds {
                        return false;
                    }
                }
                true
            }

            // Soft constraint: only the body's hard content is evaluated.
            Expression::Preference(_, body) => self.evaluate(body, subst, state),
        }
    }

    /// Evaluate a conditions object under an explicit substitution.
    pub fn evaluate_conditions(
        &self,
        conditions: &Conditions,
        subst: &mut Substitution,
        state: &State,
    ) -> bool {
        self.evaluate(conditions.expression(), subst, state)
    }

    /// Evaluate a conditions object with no substitution supplied: free
    /// parameters are existentially closed over the full local
    /// cross-product.
    pub fn evaluate_closed(&self, conditions: &Conditions, state: &State) -> bool {
        if conditions.parameters().is_empty() {
            let mut subst = Substitution::new();
            return self.evaluate(conditions.expression(), &mut subst, state);
        }
        for binding in local_substitutions(self.universe, conditions.parameters()) {
            let mut subst = Substitution::new();
            subst.push_scope(binding);
            if self.evaluate(conditions.expression(), &mut subst, state) {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ground::ObjectFunctionRange;
    use crate::logic::interner::{ObjectId, PredicateId, TypeId};
    use crate::logic::{Atom, Parameter, PredicateSymbol, Term, VariableId};

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

    fn ground_atom(pred: u32, object: u32) -> Atom {
        Atom::predicate(
            PredicateSymbol::new(PredicateId(pred), 1),
            vec![Term::Object(ObjectId(object))],
        )
    }

    fn lifted(pred: u32, var: u32) -> Expression {
        Expression::Predicate(Atom::predicate(
            PredicateSymbol::new(PredicateId(pred), 1),
            vec![Term::Variable(VariableId::new(var))],
        ))
    }

    #[test]
    fn test_exists_short_circuits_on_success() {
        let universe = universe();
        let rigid = RigidFacts::new();
        let evaluator = ExpressionEvaluator::new(&universe, &rigid);

        let mut state = State::new();
        state.add_predicate(ground_atom(0, 1));

        let expr = Expression::Exists(
            vec![Parameter::new(VariableId::new(0), TypeId(0))],
            Box::new(lifted(0, 0)),
        );
        let mut subst = Substitution::new();
        assert!(evaluator.evaluate(&expr, &mut subst, &state));
        assert_eq!(subst.scope_depth(), 0);
    }

    #[test]
    fn test_forall_fails_on_missing_instance() {
        let universe = universe();
        let rigid = RigidFacts::new();
        let evaluator = ExpressionEvaluator::new(&universe, &rigid);

        let mut state = State::new();
        state.add_predicate(ground_atom(0, 0));

        let expr = Expression::Forall(
            vec![Parameter::new(VariableId::new(0), TypeId(0))],
            Box::new(lifted(0, 0)),
        );
        let mut subst = Substitution::new();
        assert!(!evaluator.evaluate(&expr, &mut subst, &state));
    }

    #[test]
    fn test_vacuous_truth_over_empty_extension() {
        let universe = PairUniverse { objects: vec![] };
        let rigid = RigidFacts::new();
        let evaluator = ExpressionEvaluator::new(&universe, &rigid);
        let state = State::new();

        let forall = Expression::Forall(
            vec![Parameter::new(VariableId::new(0), TypeId(0))],
            Box::new(lifted(0, 0)),
        );
        let exists = Expression::Exists(
            vec![Parameter::new(VariableId::new(0), TypeId(0))],
            Box::new(lifted(0, 0)),
        );
        let mut subst = Substitution::new();
        assert!(evaluator.evaluate(&forall, &mut subst, &state));
        assert!(!evaluator.evaluate(&exists, &mut subst, &state));
    }

    #[test]
    fn test_existential_closure_without_substitution() {
        let universe = universe();
        let rigid = RigidFacts::new();
        let evaluator = ExpressionEvaluator::new(&universe, &rigid);

        let mut state = State::new();
        state.add_predicate(ground_atom(0, 1));

        let conditions = Conditions::new(
            vec![Parameter::new(VariableId::new(0), TypeId(0))],
            lifted(0, 0),
        );
        assert!(evaluator.evaluate_closed(&conditions, &state));
        assert!(!evaluator.evaluate_closed(&conditions, &State::new()));
    }
}
