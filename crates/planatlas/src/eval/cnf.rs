//! Literal/clause evaluation of CNF conditions

use super::eval_literal;
use crate::ground::{local_substitutions, RigidFacts, Universe};
use crate::logic::{ConditionsCnf, Conjunct, Substitution};
use crate::state::State;

/// Evaluator for CNF conditions: every top-level conjunct must hold, a
/// clause holds when any literal does. Built for repeated evaluation of the
/// same condition against many candidate states.
pub struct CnfEvaluator<'a> {
    universe: &'a dyn Universe,
    rigid: &'a RigidFacts,
}

impl<'a> CnfEvaluator<'a> {
    pub fn new(universe: &'a dyn Universe, rigid: &'a RigidFacts) -> Self {
        CnfEvaluator { universe, rigid }
    }

    /// Evaluate under an explicit substitution.
    pub fn evaluate(
        &self,
        cnf: &ConditionsCnf,
        subst: &mut Substitution,
        state: &State,
    ) -> bool {
        cnf.conjuncts()
            .iter()
            .all(|conjunct| self.eval_conjunct(conjunct, subst, state))
    }

    /// Evaluate with no substitution supplied: any still-free parameters
    /// are existentially closed over the full local cross-product.
    pub fn evaluate_closed(&self, cnf: &ConditionsCnf, state: &State) -> bool {
        match cnf.parameters() {
            None => {
                let mut subst = Substitution::new();
                self.evaluate(cnf, &mut subst, state)
            }
            Some(parameters) => {
                for binding in local_substitutions(self.universe, parameters) {
                    let mut subst = Substitution::new();
                    subst.push_scope(binding);
                    if self.evaluate(cnf, &mut subst, state) {
                        return true;
                    }
                }
                false
            }
        }
    }

    fn eval_conjunct(
        &self,
        conjunct: &Conjunct,
        subst: &mut Substitution,
        state: &State,
    ) -> bool {
        match conjunct {
            Conjunct::Literal(literal) => eval_literal(literal, subst, state, self.rigid),
            Conjunct::Clause(clause) => clause
                .literals()
                .iter()
                .any(|literal| eval_literal(literal, subst, state, self.rigid)),
        }
    }
}
