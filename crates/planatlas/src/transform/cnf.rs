//! Conversion from NNF to conjunctive normal form
//!
//! And-nodes flatten; Or-nodes merge primitive operands into one basis
//! clause and distribute over And operands (the push-∨-inside rewrite).
//! Distribution is worst-case exponential in the number of And operands
//! under an Or; set deduplication bounds but does not eliminate the
//! blow-up. Equality and numeric-comparison sub-expressions are opaque
//! literals throughout.

use crate::ground::Universe;
use crate::logic::{Clause, Conditions, ConditionsCnf, Conjunct, Expression, Literal};
use crate::transform::NnfTransformer;
use indexmap::IndexSet;

/// CNF transformer. Input must already be in negation normal form.
#[derive(Debug, Default)]
pub struct CnfTransformer;

impl CnfTransformer {
    pub fn new() -> Self {
        CnfTransformer
    }

    /// Transform an NNF expression into a deduplicated conjunct set.
    ///
    /// Panics on `Imply`, `Preference`, quantifiers, or a `Not` around a
    /// non-primitive: those cannot appear in NNF input.
    pub fn transform(&self, nnf: &Expression) -> IndexSet<Conjunct> {
        self.to_conjuncts(nnf)
    }

    fn to_conjuncts(&self, expression: &Expression) -> IndexSet<Conjunct> {
        match expression {
            Expression::And(children) => {
                // Flattening nested Ands falls out of the recursion; the
                // set union deduplicates repeated conjuncts.
                let mut conjuncts = IndexSet::new();
                for child in children {
                    conjuncts.extend(self.to_conjuncts(child));
                }
                conjuncts
            }

            Expression::Or(children) => self.transform_disjunction(children),

            Expression::Predicate(_) | Expression::Equals(_, _) | Expression::Compare(_, _, _) => {
                std::iter::once(Conjunct::Literal(self.leaf_literal(expression, false))).collect()
            }

            Expression::Not(child) => {
                std::iter::once(Conjunct::Literal(self.leaf_literal(child, true))).collect()
            }

            Expression::Imply(_, _)
            | Expression::Exists(_, _)
            | Expression::Forall(_, _)
            | Expression::Preference(_, _) => {
                panic!("CNF transformation requires NNF input, found {:?}", expression)
            }
        }
    }

    fn transform_disjunction(&self, children: &[Expression]) -> IndexSet<Conjunct> {
        // Primitive operands and pre-existing clauses merge into one basis
        // clause; every And operand participates in the distribution.
        let mut basis: Vec<Literal> = Vec::new();
        let mut and_operands: Vec<Vec<Vec<Literal>>> = Vec::new();

        for child in children {
            let sub = self.to_conjuncts(child);
            if sub.is_empty() {
                // An empty conjunction is true, so the disjunction is too.
                return IndexSet::new();
            }
            if sub.len() == 1 {
                let conjunct = sub.into_iter().next().unwrap();
                basis.extend(conjunct.literals().iter().cloned());
            } else {
                and_operands.push(
                    sub.into_iter()
                        .map(|conjunct| conjunct.literals().to_vec())
                        .collect(),
                );
            }
        }

        if and_operands.is_empty() {
            return std::iter::once(Conjunct::from_clause(Clause::new(basis))).collect();
        }

        // Distribute: one clause per combination choosing one operand from
        // each And, each unioned with the basis clause.
        let mut combinations: Vec<Vec<Literal>> = vec![basis];
        for operands in &and_operands {
            let mut extended = Vec::with_capacity(combinations.len() * operands.len());
            for prefix in &combinations {
                for choice in operands {
                    let mut union = prefix.clone();
                    union.extend(choice.iter().cloned());
                    extended.push(union);
                }
            }
            combinations = extended;
        }

        combinations
            .into_iter()
            .map(|literals| Conjunct::from_clause(Clause::new(literals)))
            .collect()
    }

    fn leaf_literal(&self, expression: &Expression, negated: bool) -> Literal {
        match expression {
            Expression::Predicate(atom) => Literal::predicate(atom.clone(), negated),
            Expression::Equals(left, right) => {
                Literal::equals(left.clone(), right.clone(), negated)
            }
            Expression::Compare(op, left, right) => {
                Literal::compare(*op, left.clone(), right.clone(), negated)
            }
            other => panic!("negation of a non-primitive in NNF input: {:?}", other),
        }
    }
}

/// Run the full pipeline on a lifted conditions object: ground quantifiers
/// into NNF, distribute into CNF, and wrap with the surviving parameters.
pub fn conditions_to_cnf(conditions: &Conditions, universe: &dyn Universe) -> ConditionsCnf {
    let nnf = NnfTransformer::new(universe).transform(conditions.expression());
    let conjuncts = CnfTransformer::new().transform(&nnf);
    ConditionsCnf::new(conjuncts, conditions.parameters().iter().copied())
}

impl Conditions {
    /// The CNF form of this conditions object, computed on first request
    /// and cached for the object's lifetime.
    pub fn cnf(&self, universe: &dyn Universe) -> &ConditionsCnf {
        self.cnf_cache()
            .get_or_init(|| conditions_to_cnf(self, universe))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ground::ObjectFunctionRange;
    use crate::logic::interner::{ObjectId, PredicateId, TypeId};
    use crate::logic::{Atom, PredicateSymbol, Term};

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

    fn p(object: u32) -> Expression {
        Expression::Predicate(Atom::predicate(
            PredicateSymbol::new(PredicateId(0), 1),
            vec![Term::Object(ObjectId(object))],
        ))
    }

    fn q(object: u32) -> Expression {
        Expression::Predicate(Atom::predicate(
            PredicateSymbol::new(PredicateId(1), 1),
            vec![Term::Object(ObjectId(object))],
        ))
    }

    fn r(object: u32) -> Expression {
        Expression::Predicate(Atom::predicate(
            PredicateSymbol::new(PredicateId(2), 1),
            vec![Term::Object(ObjectId(object))],
        ))
    }

    #[test]
    fn test_conjunction_of_literals() {
        let cnf = CnfTransformer::new().transform(&Expression::And(vec![p(0), q(0)]));
        assert_eq!(cnf.len(), 2);
        assert!(cnf.iter().all(|c| matches!(c, Conjunct::Literal(_))));
    }

    #[test]
    fn test_disjunction_merges_into_one_clause() {
        let cnf = CnfTransformer::new().transform(&Expression::Or(vec![p(0), q(0)]));
        assert_eq!(cnf.len(), 1);
        match cnf.iter().next().unwrap() {
            Conjunct::Clause(clause) => assert_eq!(clause.len(), 2),
            other => panic!("expected clause, got {:?}", other),
        }
    }

    #[test]
    fn test_distribution_over_and() {
        // P | (Q & R)  =>  (P | Q) & (P | R)
        let expr = Expression::Or(vec![p(0), Expression::And(vec![q(0), r(0)])]);
        let cnf = CnfTransformer::new().transform(&expr);
        assert_eq!(cnf.len(), 2);
        for conjunct in &cnf {
            match conjunct {
                Conjunct::Clause(clause) => assert_eq!(clause.len(), 2),
                other => panic!("expected clause, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_nested_and_flattens_with_dedup() {
        let expr = Expression::And(vec![
            p(0),
            Expression::And(vec![p(0), q(0)]),
        ]);
        let cnf = CnfTransformer::new().transform(&expr);
        assert_eq!(cnf.len(), 2);
    }

    #[test]
    fn test_empty_conjunction_is_true() {
        let cnf = CnfTransformer::new().transform(&Expression::And(vec![]));
        assert!(cnf.is_empty());
    }

    #[test]
    fn test_empty_disjunction_is_falsum_clause() {
        let cnf = CnfTransformer::new().transform(&Expression::Or(vec![]));
        assert_eq!(cnf.len(), 1);
        match cnf.iter().next().unwrap() {
            Conjunct::Clause(clause) => assert!(clause.is_empty()),
            other => panic!("expected empty clause, got {:?}", other),
        }
    }

    #[test]
    fn test_true_operand_absorbs_disjunction() {
        // P | (empty And) is true: no conjuncts at all.
        let expr = Expression::Or(vec![p(0), Expression::And(vec![])]);
        let cnf = CnfTransformer::new().transform(&expr);
        assert!(cnf.is_empty());
    }

    #[test]
    #[should_panic(expected = "requires NNF input")]
    fn test_imply_rejected() {
        CnfTransformer::new().transform(&Expression::Imply(Box::new(p(0)), Box::new(q(0))));
    }

    #[test]
    fn test_pipeline_caches_cnf() {
        let universe = NoObjects;
        let conditions = Conditions::closed(Expression::And(vec![p(0), q(0)]));
        let first = conditions.cnf(&universe) as *const ConditionsCnf;
        let second = conditions.cnf(&universe) as *const ConditionsCnf;
        assert_eq!(first, second);
    }
}
