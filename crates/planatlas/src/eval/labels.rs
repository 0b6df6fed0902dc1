//! Relaxed planning-graph label evaluation
//!
//! Evaluates operator conditions against the atom labels of a relaxed
//! planning-graph layer. Under delete relaxation a fact, once reached, is
//! never lost, so negated predicate literals are satisfiable by
//! construction and evaluate true. Positive literals test the label set
//! (rigid facts included); equality and numeric literals are evaluated
//! against the layer as-is.

use super::{eval_compare, eval_equals, eval_predicate};
use crate::ground::{local_substitutions, RigidFacts, Universe};
use crate::logic::{ConditionsCnf, Conjunct, Expression, Literal, Substitution};
use crate::state::State;

/// Evaluator for operator labels in a relaxed planning graph.
pub struct LabelEvaluator<'a> {
    universe: &'a dyn Universe,
    rigid: &'a RigidFacts,
}

impl<'a> LabelEvaluator<'a> {
    pub fn new(universe: &'a dyn Universe, rigid: &'a RigidFacts) -> Self {
        LabelEvaluator { universe, rigid }
    }

    /// Evaluate a CNF condition against a label layer.
    pub fn evaluate_cnf(
        &self,
        cnf: &ConditionsCnf,
        subst: &mut Substitution,
        labels: &State,
    ) -> bool {
        cnf.conjuncts().iter().all(|conjunct| match conjunct {
            Conjunct::Literal(literal) => self.eval_literal(literal, subst, labels),
            Conjunct::Clause(clause) => clause
                .literals()
                .iter()
                .any(|literal| self.eval_literal(literal, subst, labels)),
        })
    }

    /// Evaluate an expression tree against a label layer.
    pub fn evaluate_expression(
        &self,
        expression: &Expression,
        subst: &mut Substitution,
        labels: &State,
    ) -> bool {
        self.walk(expression, subst, labels, false)
    }

    fn walk(
        &self,
        expression: &Expression,
        subst: &mut Substitution,
        labels: &State,
        negating: bool,
    ) -> bool {
        match expression {
            Expression::Predicate(atom) => {
                if negating {
                    // Delete relaxation: a negated fact stays achievable.
                    true
                } else {
                    eval_predicate(atom, false, subst, labels, self.rigid)
                }
            }
            Expression::Equals(left, right) => eval_equals(left, right, negating, subst, labels),
            Expression::Compare(op, left, right) => {
                eval_compare(*op, left, right, negating, subst, labels)
            }

            Expression::Not(child) => self.walk(child, subst, labels, !negating),

            Expression::And(children) => {
                if negating {
                    children.iter().any(|c| self.walk(c, subst, labels, true))
                } else {
                    children.iter().all(|c| self.walk(c, subst, labels, false))
                }
            }
            Expression::Or(children) => {
                if negating {
                    children.iter().all(|c| self.walk(c, subst, labels, true))
                } else {
                    children.iter().any(|c| self.walk(c, subst, labels, false))
                }
            }

            Expression::Imply(antecedent, consequent) => {
                if negating {
                    self.walk(antecedent, subst, labels, false)
                        && self.walk(consequent, subst, labels, true)
                } else {
                    self.walk(antecedent, subst, labels, true)
                        || self.walk(consequent, subst, labels, false)
                }
            }

            Expression::Exists(params, body) => {
                let existential = !negating;
                let mut bindings = local_substitutions(self.universe, params);
                if existential {
                    bindings.any(|binding| {
                        subst.push_scope(binding);
                        let holds = self.walk(body, subst, labels, negating);
                        subst.pop_scope();
                        holds
                    })
                } else {
                    bindings.all(|binding| {
                        subst.push_scope(binding);
                        let holds = self.walk(body, subst, labels, negating);
                        subst.pop_scope();
                        holds
                    })
                }
            }
            Expression::Forall(params, body) => {
                let universal = !negating;
                let mut bindings = local_substitutions(self.universe, params);
                if universal {
                    bindings.all(|binding| {
                        subst.push_scope(binding);
                        let holds = self.walk(body, subst, labels, negating);
                        subst.pop_scope();
                        holds
                    })
                } else {
                    bindings.any(|binding| {
                        subst.push_scope(binding);
                        let holds = self.walk(body, subst, labels, negating);
                        subst.pop_scope();
                        holds
                    })
                }
            }

            Expression::Preference(_, body) => self.walk(body, subst, labels, negating),
        }
    }

    fn eval_literal(
        &self,
        literal: &Literal,
        subst: &Substitution,
        labels: &State,
    ) -> bool {
        match literal {
            Literal::Predicate { atom, negated } => {
                if *negated {
                    true
                } else {
                    eval_predicate(atom, false, subst, labels, self.rigid)
                }
            }
            Literal::Equals {
                left,
                right,
                negated,
            } => eval_equals(left, right, *negated, subst, labels),
            Literal::Compare {
                op,
                left,
                right,
                negated,
            } => eval_compare(*op, left, right, *negated, subst, labels),
        }
    }
}
