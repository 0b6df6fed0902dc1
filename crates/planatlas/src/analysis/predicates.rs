//! Used-predicate collection
//!
//! Collects the distinct predicate atoms appearing in the predicate literals
//! of a CNF conditions object. Equality and numeric literals carry no
//! predicate and are skipped.

use crate::logic::{Atom, ConditionsCnf, Literal};
use indexmap::IndexSet;

/// The distinct predicate atoms of the CNF's predicate literals.
pub fn used_predicates(cnf: &ConditionsCnf) -> IndexSet<Atom> {
    let mut atoms = IndexSet::new();
    for conjunct in cnf.conjuncts() {
        for literal in conjunct.literals() {
            if let Literal::Predicate { atom, .. } = literal {
                atoms.insert(atom.clone());
            }
        }
    }
    atoms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::interner::{ObjectId, PredicateId};
    use crate::logic::{Clause, Conjunct, PredicateSymbol, Term};

    fn atom(pred: u32, object: u32) -> Atom {
        Atom::predicate(
            PredicateSymbol::new(PredicateId(pred), 1),
            vec![Term::Object(ObjectId(object))],
        )
    }

    #[test]
    fn test_collects_distinct_predicate_atoms() {
        let cnf = ConditionsCnf::ground(vec![
            Conjunct::Literal(Literal::predicate(atom(0, 0), false)),
            Conjunct::Clause(Clause::new(vec![
                Literal::predicate(atom(0, 0), true),
                Literal::predicate(atom(1, 1), false),
                Literal::equals(
                    Term::Object(ObjectId(0)),
                    Term::Object(ObjectId(1)),
                    false,
                ),
            ])),
        ]);

        let used = used_predicates(&cnf);
        assert_eq!(used.len(), 2);
        assert!(used.contains(&atom(0, 0)));
        assert!(used.contains(&atom(1, 1)));
    }
}
