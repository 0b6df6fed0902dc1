//! Satisfying-atom collection for regression search
//!
//! A CNF-evaluator variant that, while evaluating against a predecessor
//! state, records every grounded atom whose presence in that state made a
//! predicate literal true. Atoms satisfied via the static rigid set are
//! skipped: they need no predecessor support. Regression search uses the
//! collected set to know exactly which predecessor facts were relied upon.

use super::{eval_compare, eval_equals};
use crate::ground::{ground_atom_deep, local_substitutions, RigidFacts, Universe};
use crate::logic::{Atom, ConditionsCnf, Conjunct, Literal, Substitution};
use crate::state::State;
use indexmap::IndexSet;

/// CNF evaluation with support-atom collection.
pub struct SatisfyingAtomsEvaluator<'a> {
    universe: &'a dyn Universe,
    rigid: &'a RigidFacts,
}

impl<'a> SatisfyingAtomsEvaluator<'a> {
    pub fn new(universe: &'a dyn Universe, rigid: &'a RigidFacts) -> Self {
        SatisfyingAtomsEvaluator { universe, rigid }
    }

    /// Evaluate under a substitution. `Some(atoms)` with the supporting
    /// predecessor facts when the CNF is satisfied, `None` otherwise.
    pub fn collect(
        &self,
        cnf: &ConditionsCnf,
        subst: &mut Substitution,
        predecessor: &State,
    ) -> Option<IndexSet<Atom>> {
        let mut support = IndexSet::new();
        for conjunct in cnf.conjuncts() {
            if !self.collect_conjunct(conjunct, subst, predecessor, &mut support) {
                return None;
            }
        }
        Some(support)
    }

    /// Evaluate with free parameters existentially closed; the first
    /// satisfying substitution's support set is returned.
    pub fn collect_closed(
        &self,
        cnf: &ConditionsCnf,
        predecessor: &State,
    ) -> Option<IndexSet<Atom>> {
        match cnf.parameters() {
            None => {
                let mut subst = Substitution::new();
                self.collect(cnf, &mut subst, predecessor)
            }
            Some(parameters) => {
                for binding in local_substitutions(self.universe, parameters) {
                    let mut subst = Substitution::new();
                    subst.push_scope(binding);
                    if let Some(support) = self.collect(cnf, &mut subst, predecessor) {
                        return Some(support);
                    }
                }
                None
            }
        }
    }

    fn collect_conjunct(
        &self,
        conjunct: &Conjunct,
        subst: &mut Substitution,
        predecessor: &State,
        support: &mut IndexSet<Atom>,
    ) -> bool {
        // The first satisfying literal of a clause commits its support.
        for literal in conjunct.literals() {
            if self.literal_satisfied(literal, subst, predecessor, support) {
                return true;
            }
        }
        false
    }

    fn literal_satisfied(
        &self,
        literal: &Literal,
        subst: &Substitution,
        predecessor: &State,
        support: &mut IndexSet<Atom>,
    ) -> bool {
        match literal {
            Literal::Predicate { atom, negated } => {
                let grounded = ground_atom_deep(atom, subst, predecessor);
                if self.rigid.contains(&grounded) {
                    // Static facts hold in every state and need no support.
                    return !*negated;
                }
                let holds = predecessor.holds(&grounded);
                if holds && !*negated {
                    support.insert(grounded);
                }
                holds != *negated
            }
            Literal::Equals {
                left,
                right,
                negated,
            } => eval_equals(left, right, *negated, subst, predecessor),
            Literal::Compare {
                op,
                left,
                right,
                negated,
            } => eval_compare(*op, left, right, *negated, subst, predecessor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ground::ObjectFunctionRange;
    use crate::logic::interner::{ObjectId, PredicateId, TypeId};
    use crate::logic::{Clause, PredicateSymbol, Term};

    struct NoObjects;

    impl Universe for NoObjects {
        fn objects_of_type(&self, _ty: TypeId) -> &[ObjectId] {
            &[]
        }

        fn grounded_predicates(&self) -> &[Atom] {
            &[]
        }

        fn grounded_object_functions(&self) -> &[ObjectFunctionRange] {
            &[]
        }
    }

    fn atom(pred: u32, object: u32) -> Atom {
        Atom::predicate(
            PredicateSymbol::new(PredicateId(pred), 1),
            vec![Term::Object(ObjectId(object))],
        )
    }

    #[test]
    fn test_collects_state_support_only() {
        let universe = NoObjects;
        let rigid = RigidFacts::from_parts(vec![atom(9, 0)], vec![PredicateId(9)]);
        let evaluator = SatisfyingAtomsEvaluator::new(&universe, &rigid);

        let mut predecessor = State::new();
        predecessor.add_predicate(atom(0, 0));

        let cnf = ConditionsCnf::ground(vec![
            Conjunct::Literal(Literal::predicate(atom(0, 0), false)),
            // Satisfied via the rigid set: contributes no support atom.
            Conjunct::Literal(Literal::predicate(atom(9, 0), false)),
        ]);

        let mut subst = Substitution::new();
        let support = evaluator.collect(&cnf, &mut subst, &predecessor).unwrap();
        assert_eq!(support.len(), 1);
        assert!(support.contains(&atom(0, 0)));
    }

    #[test]
    fn test_unsatisfied_cnf_yields_none() {
        let universe = NoObjects;
        let rigid = RigidFacts::new();
        let evaluator = SatisfyingAtomsEvaluator::new(&universe, &rigid);

        let cnf = ConditionsCnf::ground(vec![Conjunct::Literal(Literal::predicate(
            atom(0, 0),
            false,
        ))]);

        let mut subst = Substitution::new();
        assert!(evaluator.collect(&cnf, &mut subst, &State::new()).is_none());
    }

    #[test]
    fn test_clause_commits_first_satisfying_literal() {
        let universe = NoObjects;
        let rigid = RigidFacts::new();
        let evaluator = SatisfyingAtomsEvaluator::new(&universe, &rigid);

        let mut predecessor = State::new();
        predecessor.add_predicate(atom(0, 0));
        predecessor.add_predicate(atom(1, 0));

        let cnf = ConditionsCnf::ground(vec![Conjunct::Clause(Clause::new(vec![
            Literal::predicate(atom(0, 0), false),
            Literal::predicate(atom(1, 0), false),
        ]))]);

        let mut subst = Substitution::new();
        let support = evaluator.collect(&cnf, &mut subst, &predecessor).unwrap();
        assert_eq!(support.len(), 1);
    }

    #[test]
    fn test_negative_literal_contributes_no_support() {
        let universe = NoObjects;
        let rigid = RigidFacts::new();
        let evaluator = SatisfyingAtomsEvaluator::new(&universe, &rigid);

        let cnf = ConditionsCnf::ground(vec![Conjunct::Literal(Literal::predicate(
            atom(0, 0),
            true,
        ))]);

        let mut subst = Substitution::new();
        let support = evaluator.collect(&cnf, &mut subst, &State::new()).unwrap();
        assert!(support.is_empty());
    }
}
