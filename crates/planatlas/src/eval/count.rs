//! Not-accomplished-constraint counting for heuristics
//!
//! Counts how many primitive constraints of a condition a state fulfills
//! and how many it leaves unfulfilled, combined bottom-up: conjunctions
//! sum, disjunctions take the elementwise minimum (the most optimistic
//! disjunct), quantifier groundings mirror the two. STRIPS-style heuristics
//! take the unfulfilled count as their distance estimate.

use super::{eval_literal, ExpressionEvaluator};
use crate::ground::{local_substitutions, RigidFacts, Universe};
use crate::logic::{ConditionsCnf, Conjunct, Expression, Substitution};
use crate::state::State;

/// Fulfilled/unfulfilled constraint counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConstraintCounts {
    pub fulfilled: u32,
    pub unfulfilled: u32,
}

impl ConstraintCounts {
    pub fn leaf(holds: bool) -> Self {
        if holds {
            ConstraintCounts {
                fulfilled: 1,
                unfulfilled: 0,
            }
        } else {
            ConstraintCounts {
                fulfilled: 0,
                unfulfilled: 1,
            }
        }
    }

    pub fn zero() -> Self {
        ConstraintCounts::default()
    }

    fn add(self, other: Self) -> Self {
        ConstraintCounts {
            fulfilled: self.fulfilled + other.fulfilled,
            unfulfilled: self.unfulfilled + other.unfulfilled,
        }
    }

    fn min(self, other: Self) -> Self {
        ConstraintCounts {
            fulfilled: self.fulfilled.min(other.fulfilled),
            unfulfilled: self.unfulfilled.min(other.unfulfilled),
        }
    }

    /// No constraint is left unfulfilled.
    pub fn is_satisfied(self) -> bool {
        self.unfulfilled == 0
    }
}

/// Bottom-up constraint counter over both condition representations.
pub struct ConstraintCounter<'a> {
    universe: &'a dyn Universe,
    rigid: &'a RigidFacts,
}

impl<'a> ConstraintCounter<'a> {
    pub fn new(universe: &'a dyn Universe, rigid: &'a RigidFacts) -> Self {
        ConstraintCounter { universe, rigid }
    }

    /// Count over an expression tree.
    pub fn count_expression(
        &self,
        expression: &Expression,
        subst: &mut Substitution,
        state: &State,
    ) -> ConstraintCounts {
        match expression {
            Expression::Predicate(_) | Expression::Equals(_, _) | Expression::Compare(_, _, _) => {
                let evaluator = ExpressionEvaluator::new(self.universe, self.rigid);
                ConstraintCounts::leaf(evaluator.evaluate(expression, subst, state))
            }

            // A negation counts as one constraint on its whole subtree.
            Expression::Not(child) => {
                let evaluator = ExpressionEvaluator::new(self.universe, self.rigid);
                ConstraintCounts::leaf(!evaluator.evaluate(child, subst, state))
            }

            Expression::And(children) => children
                .iter()
                .map(|c| self.count_expression(c, subst, state))
                .fold(ConstraintCounts::zero(), ConstraintCounts::add),

            Expression::Or(children) => {
                let mut best: Option<ConstraintCounts> = None;
                for child in children {
                    let counts = self.count_expression(child, subst, state);
                    best = Some(match best {
                        Some(current) => current.min(counts),
                        None => counts,
                    });
                }
                // An empty disjunction is false: one unfulfilled constraint.
                best.unwrap_or_else(|| ConstraintCounts::leaf(false))
            }

            Expression::Imply(antecedent, consequent) => {
                let a = self.count_expression(antecedent, subst, state);
                let b = self.count_expression(consequent, subst, state);
                ConstraintCounts {
                    fulfilled: a.unfulfilled.min(b.fulfilled),
                    unfulfilled: a.fulfilled.min(b.unfulfilled),
                }
            }

            // Exists mirrors Or over the groundings, Forall mirrors And.
            Expression::Exists(params, body) => {
                let mut best: Option<ConstraintCounts> = None;
                for binding in local_substitutions(self.universe, params) {
                    subst.push_scope(binding);
                    let counts = self.count_expression(body, subst, state);
                    subst.pop_scope();
                    best = Some(match best {
                        Some(current) => current.min(counts),
                        None => counts,
                    });
                }
                best.unwrap_or_else(|| ConstraintCounts::leaf(false))
            }
            Expression::Forall(params, body) => {
                let mut total = ConstraintCounts::zero();
                for binding in local_substitutions(self.universe, params) {
                    subst.push_scope(binding);
                    total = total.add(self.count_expression(body, subst, state));
                    subst.pop_scope();
                }
                total
            }

            Expression::Preference(_, body) => self.count_expression(body, subst, state),
        }
    }

    /// Count over a CNF conditions object: conjuncts sum, clause literals
    /// take the elementwise minimum.
    pub fn count_cnf(
        &self,
        cnf: &ConditionsCnf,
        subst: &mut Substitution,
        state: &State,
    ) -> ConstraintCounts {
        let mut total = ConstraintCounts::zero();
        for conjunct in cnf.conjuncts() {
            let counts = match conjunct {
                Conjunct::Literal(literal) => {
                    ConstraintCounts::leaf(eval_literal(literal, subst, state, self.rigid))
                }
                Conjunct::Clause(clause) => {
                    let mut best: Option<ConstraintCounts> = None;
                    for literal in clause.literals() {
                        let counts = ConstraintCounts::leaf(eval_literal(
                            literal, subst, state, self.rigid,
                        ));
                        best = Some(match best {
                            Some(current) => current.min(counts),
                            None => counts,
                        });
                    }
                    best.unwrap_or_else(|| ConstraintCounts::leaf(false))
                }
            };
            total = total.add(counts);
        }
        total
    }
}
