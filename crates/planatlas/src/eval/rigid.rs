//! Rigid-relation compliance checks
//!
//! Answers whether the static part of a formula is consistent with the
//! known rigid facts, without touching any per-state data. Every literal
//! that is not a statically-rigid, statically-groundable predicate is
//! ignored (treated as satisfiable). Used to prune instantiations whose
//! static part can never hold.

use crate::ground::{ground_atom_static, local_substitutions, RigidFacts, Universe};
use crate::logic::{Atom, ConditionsCnf, Conjunct, Expression, Literal, Substitution};

/// Compliance evaluator over rigid facts only.
pub struct RigidComplianceEvaluator<'a> {
    universe: &'a dyn Universe,
    rigid: &'a RigidFacts,
}

impl<'a> RigidComplianceEvaluator<'a> {
    pub fn new(universe: &'a dyn Universe, rigid: &'a RigidFacts) -> Self {
        RigidComplianceEvaluator { universe, rigid }
    }

    /// Check an expression tree under a substitution.
    pub fn complies_expression(
        &self,
        expression: &Expression,
        subst: &mut Substitution,
    ) -> bool {
        self.walk(expression, subst, false)
    }

    /// Check a CNF conditions object under a substitution.
    pub fn complies_cnf(&self, cnf: &ConditionsCnf, subst: &mut Substitution) -> bool {
        cnf.conjuncts().iter().all(|conjunct| match conjunct {
            Conjunct::Literal(literal) => self.literal_complies(literal, subst),
            Conjunct::Clause(clause) => clause
                .literals()
                .iter()
                .any(|literal| self.literal_complies(literal, subst)),
        })
    }

    fn walk(&self, expression: &Expression, subst: &mut Substitution, negating: bool) -> bool {
        match expression {
            Expression::Predicate(atom) => self.atom_complies(atom, negating, subst),

            // Non-predicate leaves carry no rigid information.
            Expression::Equals(_, _) | Expression::Compare(_, _, _) => true,

            Expression::Not(child) => self.walk(child, subst, !negating),

            Expression::And(children) => {
                if negating {
                    children.iter().any(|c| self.walk(c, subst, true))
                } else {
                    children.iter().all(|c| self.walk(c, subst, false))
                }
            }
            Expression::Or(children) => {
                if negating {
                    children.iter().all(|c| self.walk(c, subst, true))
                } else {
                    children.iter().any(|c| self.walk(c, subst, false))
                }
            }

            Expression::Imply(antecedent, consequent) => {
                if negating {
                    self.walk(antecedent, subst, false) && self.walk(consequent, subst, true)
                } else {
                    self.walk(antecedent, subst, true) || self.walk(consequent, subst, false)
                }
            }

            Expression::Exists(params, body) => {
                let mut bindings = local_substitutions(self.universe, params);
                if negating {
                    bindings.all(|binding| {
                        subst.push_scope(binding);
                        let ok = self.walk(body, subst, true);
                        subst.pop_scope();
                        ok
                    })
                } else {
                    bindings.any(|binding| {
                        subst.push_scope(binding);
                        let ok = self.walk(body, subst, false);
                        subst.pop_scope();
                        ok
                    })
                }
            }
            Expression::Forall(params, body) => {
                let mut bindings = local_substitutions(self.universe, params);
                if negating {
                    bindings.any(|binding| {
                        subst.push_scope(binding);
                        let ok = self.walk(body, subst, true);
                        subst.pop_scope();
                        ok
                    })
                } else {
                    bindings.all(|binding| {
                        subst.push_scope(binding);
                        let ok = self.walk(body, subst, false);
                        subst.pop_scope();
                        ok
                    })
                }
            }

            Expression::Preference(_, body) => self.walk(body, subst, negating),
        }
    }

    fn literal_complies(&self, literal: &Literal, subst: &Substitution) -> bool {
        match literal {
            Literal::Predicate { atom, negated } => self.atom_complies(atom, *negated, subst),
            Literal::Equals { .. } | Literal::Compare { .. } => true,
        }
    }

    fn atom_complies(&self, atom: &Atom, negated: bool, subst: &Substitution) -> bool {
        let symbol = match atom.predicate_symbol() {
            Some(symbol) => symbol,
            None => return true,
        };
        if !self.rigid.is_rigid_relation(symbol.id) {
            return true;
        }
        // Static grounding only: a term the substitution cannot resolve
        // leaves the literal undecided, hence satisfiable.
        match ground_atom_static(atom, subst) {
            Some(grounded) => self.rigid.contains(&grounded) != negated,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ground::ObjectFunctionRange;
    use crate::logic::interner::{ObjectId, PredicateId, TypeId};
    use crate::logic::{PredicateSymbol, Term, VariableId};

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

    fn road(from: u32, to: u32) -> Atom {
        Atom::predicate(
            PredicateSymbol::new(PredicateId(0), 2),
            vec![Term::Object(ObjectId(from)), Term::Object(ObjectId(to))],
        )
    }

    fn rigid_with_road() -> RigidFacts {
        RigidFacts::from_parts(vec![road(0, 1)], vec![PredicateId(0)])
    }

    #[test]
    fn test_present_rigid_fact_complies() {
        let universe = NoObjects;
        let rigid = rigid_with_road();
        let evaluator = RigidComplianceEvaluator::new(&universe, &rigid);
        let mut subst = Substitution::new();
        assert!(evaluator.complies_expression(&Expression::Predicate(road(0, 1)), &mut subst));
    }

    #[test]
    fn test_absent_rigid_fact_fails() {
        let universe = NoObjects;
        let rigid = rigid_with_road();
        let evaluator = RigidComplianceEvaluator::new(&universe, &rigid);
        let mut subst = Substitution::new();
        assert!(!evaluator.complies_expression(&Expression::Predicate(road(1, 0)), &mut subst));
    }

    #[test]
    fn test_non_rigid_predicate_is_ignored() {
        let universe = NoObjects;
        let rigid = rigid_with_road();
        let evaluator = RigidComplianceEvaluator::new(&universe, &rigid);
        let fluent = Atom::predicate(
            PredicateSymbol::new(PredicateId(1), 1),
            vec![Term::Object(ObjectId(0))],
        );
        let mut subst = Substitution::new();
        assert!(evaluator.complies_expression(&Expression::Predicate(fluent), &mut subst));
    }

    #[test]
    fn test_unbound_variable_is_undecided() {
        let universe = NoObjects;
        let rigid = rigid_with_road();
        let evaluator = RigidComplianceEvaluator::new(&universe, &rigid);
        let open = Atom::predicate(
            PredicateSymbol::new(PredicateId(0), 2),
            vec![
                Term::Variable(VariableId::new(0)),
                Term::Object(ObjectId(1)),
            ],
        );
        let mut subst = Substitution::new();
        assert!(evaluator.complies_expression(&Expression::Predicate(open.clone()), &mut subst));

        // Binding the variable makes the check decisive.
        subst.bind(VariableId::new(0), ObjectId(0));
        assert!(evaluator.complies_expression(&Expression::Predicate(open.clone()), &mut subst));
        subst.bind(VariableId::new(0), ObjectId(1));
        assert!(!evaluator.complies_expression(&Expression::Predicate(open), &mut subst));
    }

    #[test]
    fn test_negated_rigid_fact() {
        let universe = NoObjects;
        let rigid = rigid_with_road();
        let evaluator = RigidComplianceEvaluator::new(&universe, &rigid);
        let mut subst = Substitution::new();
        let negated = Expression::Not(Box::new(Expression::Predicate(road(0, 1))));
        assert!(!evaluator.complies_expression(&negated, &mut subst));
    }
}
