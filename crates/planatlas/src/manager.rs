//! The evaluation-manager facade
//!
//! One instance per planning problem, owning the object universe and the
//! rigid-fact set every evaluator consults. Search and heuristics depend
//! only on this facade, never on the individual evaluators. Construction is
//! explicit and eager; the evaluators themselves are stateless views over
//! the manager's data, so re-wiring after the rigid set is (re)computed is
//! a single field swap.

use crate::analysis::{rename_parameters, used_predicates, ParameterRenaming};
use crate::enumerate::{
    concrete_states, concrete_states_for_conditions, relative_states, ConcreteStates,
    ConditionsStates, RelativeStates,
};
use crate::eval::{
    CnfEvaluator, ConstraintCounter, ConstraintCounts, ExpressionEvaluator, LabelEvaluator,
    RigidComplianceEvaluator, SatisfyingAtomsEvaluator,
};
use crate::ground::{ObjectUniverse, RigidFacts};
use crate::logic::{Atom, Conditions, ConditionsCnf, Expression, Substitution};
use crate::problem::Problem;
use crate::state::{RelativeState, State};
use indexmap::IndexSet;

/// Facade over every evaluator, transformer, and counter of one problem.
pub struct EvaluationManager {
    universe: ObjectUniverse,
    rigid: RigidFacts,
}

impl EvaluationManager {
    pub fn new(universe: ObjectUniverse, rigid: RigidFacts) -> Self {
        EvaluationManager { universe, rigid }
    }

    /// Build a manager for a problem. The rigid set starts empty and is
    /// re-wired via [`set_rigid_facts`](Self::set_rigid_facts) once the
    /// rigid-relation analysis has run.
    pub fn for_problem(problem: &Problem) -> Self {
        EvaluationManager {
            universe: ObjectUniverse::from_problem(problem),
            rigid: RigidFacts::new(),
        }
    }

    /// Replace the rigid-fact set; every subsequent evaluation consults the
    /// new one.
    pub fn set_rigid_facts(&mut self, rigid: RigidFacts) {
        self.rigid = rigid;
    }

    pub fn universe(&self) -> &ObjectUniverse {
        &self.universe
    }

    pub fn rigid_facts(&self) -> &RigidFacts {
        &self.rigid
    }

    // -------------------------------------------------------------------------
    // Evaluation
    // -------------------------------------------------------------------------

    /// Evaluate an expression tree under a substitution against a state.
    pub fn evaluate_expression(
        &self,
        expression: &Expression,
        subst: &mut Substitution,
        state: &State,
    ) -> bool {
        ExpressionEvaluator::new(&self.universe, &self.rigid).evaluate(expression, subst, state)
    }

    /// Evaluate a conditions object under a substitution.
    pub fn evaluate_conditions(
        &self,
        conditions: &Conditions,
        subst: &mut Substitution,
        state: &State,
    ) -> bool {
        ExpressionEvaluator::new(&self.universe, &self.rigid)
            .evaluate_conditions(conditions, subst, state)
    }

    /// Evaluate a conditions object with free parameters existentially
    /// closed.
    pub fn evaluate_conditions_closed(&self, conditions: &Conditions, state: &State) -> bool {
        ExpressionEvaluator::new(&self.universe, &self.rigid).evaluate_closed(conditions, state)
    }

    /// Evaluate a CNF conditions object under a substitution.
    pub fn evaluate_cnf(
        &self,
        cnf: &ConditionsCnf,
        subst: &mut Substitution,
        state: &State,
    ) -> bool {
        CnfEvaluator::new(&self.universe, &self.rigid).evaluate(cnf, subst, state)
    }

    /// Evaluate a CNF conditions object with free parameters existentially
    /// closed.
    pub fn evaluate_cnf_closed(&self, cnf: &ConditionsCnf, state: &State) -> bool {
        CnfEvaluator::new(&self.universe, &self.rigid).evaluate_closed(cnf, state)
    }

    /// The (lazily computed, cached) CNF form of a conditions object.
    pub fn cnf_of<'c>(&self, conditions: &'c Conditions) -> &'c ConditionsCnf {
        conditions.cnf(&self.universe)
    }

    // -------------------------------------------------------------------------
    // Rigid compliance
    // -------------------------------------------------------------------------

    /// Check whether an expression's static part is consistent with the
    /// rigid facts.
    pub fn complies_with_rigid(&self, expression: &Expression, subst: &mut Substitution) -> bool {
        RigidComplianceEvaluator::new(&self.universe, &self.rigid)
            .complies_expression(expression, subst)
    }

    /// Check whether a CNF's static part is consistent with the rigid
    /// facts.
    pub fn cnf_complies_with_rigid(
        &self,
        cnf: &ConditionsCnf,
        subst: &mut Substitution,
    ) -> bool {
        RigidComplianceEvaluator::new(&self.universe, &self.rigid).complies_cnf(cnf, subst)
    }

    // -------------------------------------------------------------------------
    // Heuristic support
    // -------------------------------------------------------------------------

    /// Fulfilled/unfulfilled constraint counts over an expression tree.
    pub fn constraint_counts(
        &self,
        expression: &Expression,
        subst: &mut Substitution,
        state: &State,
    ) -> ConstraintCounts {
        ConstraintCounter::new(&self.universe, &self.rigid)
            .count_expression(expression, subst, state)
    }

    /// Fulfilled/unfulfilled constraint counts over a CNF conditions
    /// object.
    pub fn cnf_constraint_counts(
        &self,
        cnf: &ConditionsCnf,
        subst: &mut Substitution,
        state: &State,
    ) -> ConstraintCounts {
        ConstraintCounter::new(&self.universe, &self.rigid).count_cnf(cnf, subst, state)
    }

    /// The predecessor atoms a satisfied CNF relied on, or `None` when it
    /// is unsatisfied.
    pub fn satisfying_atoms(
        &self,
        cnf: &ConditionsCnf,
        subst: &mut Substitution,
        predecessor: &State,
    ) -> Option<IndexSet<Atom>> {
        SatisfyingAtomsEvaluator::new(&self.universe, &self.rigid)
            .collect(cnf, subst, predecessor)
    }

    /// Satisfying atoms with free parameters existentially closed.
    pub fn satisfying_atoms_closed(
        &self,
        cnf: &ConditionsCnf,
        predecessor: &State,
    ) -> Option<IndexSet<Atom>> {
        SatisfyingAtomsEvaluator::new(&self.universe, &self.rigid)
            .collect_closed(cnf, predecessor)
    }

    /// Evaluate an operator's CNF condition against a relaxed
    /// planning-graph label layer.
    pub fn evaluate_operator_label(
        &self,
        cnf: &ConditionsCnf,
        subst: &mut Substitution,
        labels: &State,
    ) -> bool {
        LabelEvaluator::new(&self.universe, &self.rigid).evaluate_cnf(cnf, subst, labels)
    }

    /// Evaluate an operator's expression condition against a relaxed
    /// planning-graph label layer.
    pub fn evaluate_operator_label_expression(
        &self,
        expression: &Expression,
        subst: &mut Substitution,
        labels: &State,
    ) -> bool {
        LabelEvaluator::new(&self.universe, &self.rigid)
            .evaluate_expression(expression, subst, labels)
    }

    // -------------------------------------------------------------------------
    // Analyses
    // -------------------------------------------------------------------------

    /// Rename a CNF's free parameters to sequential ids from `start`.
    pub fn rename_cnf_parameters(
        &self,
        cnf: &ConditionsCnf,
        start: u32,
    ) -> (ConditionsCnf, ParameterRenaming) {
        rename_parameters(cnf, start)
    }

    /// The distinct predicate atoms a conditions object uses, via its CNF.
    pub fn used_predicates(&self, conditions: &Conditions) -> IndexSet<Atom> {
        used_predicates(self.cnf_of(conditions))
    }

    // -------------------------------------------------------------------------
    // Enumeration
    // -------------------------------------------------------------------------

    /// Enumerate the relative states consistent with a CNF conditions
    /// object.
    pub fn relative_states(&self, cnf: &ConditionsCnf) -> RelativeStates<'_> {
        relative_states(cnf, &self.universe)
    }

    /// Enumerate the concrete states consistent with a relative state.
    pub fn concrete_states(&self, relative: &RelativeState) -> ConcreteStates {
        concrete_states(relative, &self.universe)
    }

    /// Enumerate the concrete states consistent with a CNF conditions
    /// object.
    pub fn concrete_states_for_conditions(&self, cnf: &ConditionsCnf) -> ConditionsStates<'_> {
        concrete_states_for_conditions(cnf, &self.universe)
    }
}
