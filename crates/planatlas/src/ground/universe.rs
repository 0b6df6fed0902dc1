//! Table-backed object universe
//!
//! The default `Universe` implementation: type extensions and the static
//! ground-atom universe, computed once from a problem's declarations.

use super::{ObjectFunctionRange, Universe};
use crate::logic::{Atom, ObjectId, Term, TypeId};
use crate::problem::{FunctionRange, Problem};
use indexmap::IndexMap;
use log::debug;

/// Precomputed object extensions and ground-atom tables for one problem.
#[derive(Debug, Clone)]
pub struct ObjectUniverse {
    extensions: IndexMap<TypeId, Vec<ObjectId>>,
    empty: Vec<ObjectId>,
    grounded_predicates: Vec<Atom>,
    grounded_object_functions: Vec<ObjectFunctionRange>,
}

impl ObjectUniverse {
    pub fn from_problem(problem: &Problem) -> Self {
        let mut extensions: IndexMap<TypeId, Vec<ObjectId>> = IndexMap::new();
        for ty in problem.types.types() {
            let extension: Vec<ObjectId> = problem
                .objects
                .iter()
                .filter(|o| problem.types.is_subtype(o.ty, ty))
                .map(|o| o.object)
                .collect();
            extensions.insert(ty, extension);
        }

        let empty = Vec::new();

        let mut grounded_predicates = Vec::new();
        for signature in &problem.predicates {
            let slots: Vec<&[ObjectId]> = signature
                .parameter_types
                .iter()
                .map(|ty| extensions.get(ty).map(Vec::as_slice).unwrap_or(&empty))
                .collect();
            for tuple in tuples(&slots) {
                grounded_predicates.push(Atom::predicate(
                    signature.symbol,
                    tuple.into_iter().map(Term::Object).collect(),
                ));
            }
        }

        let mut grounded_object_functions = Vec::new();
        for signature in &problem.functions {
            let range_type = match signature.range {
                FunctionRange::Object(ty) => ty,
                FunctionRange::Numeric => continue,
            };
            let values = extensions
                .get(&range_type)
                .cloned()
                .unwrap_or_default();
            let slots: Vec<&[ObjectId]> = signature
                .parameter_types
                .iter()
                .map(|ty| extensions.get(ty).map(Vec::as_slice).unwrap_or(&empty))
                .collect();
            for tuple in tuples(&slots) {
                grounded_object_functions.push(ObjectFunctionRange {
                    atom: Atom::function(
                        signature.symbol,
                        tuple.into_iter().map(Term::Object).collect(),
                    ),
                    values: values.clone(),
                });
            }
        }

        debug!(
            "ground universe for {}: {} predicate atoms, {} object-function atoms",
            problem.name,
            grounded_predicates.len(),
            grounded_object_functions.len()
        );

        ObjectUniverse {
            extensions,
            empty,
            grounded_predicates,
            grounded_object_functions,
        }
    }
}

impl Universe for ObjectUniverse {
    fn objects_of_type(&self, ty: TypeId) -> &[ObjectId] {
        self.extensions.get(&ty).map(Vec::as_slice).unwrap_or(&self.empty)
    }

    fn grounded_predicates(&self) -> &[Atom] {
        &self.grounded_predicates
    }

    fn grounded_object_functions(&self) -> &[ObjectFunctionRange] {
        &self.grounded_object_functions
    }
}

/// All tuples choosing one object from each slot. Zero slots yield the one
/// empty tuple; an empty slot yields nothing.
fn tuples(slots: &[&[ObjectId]]) -> Vec<Vec<ObjectId>> {
    if slots.iter().any(|slot| slot.is_empty()) {
        return Vec::new();
    }
    let mut result = vec![Vec::new()];
    for slot in slots {
        let mut extended = Vec::with_capacity(result.len() * slot.len());
        for prefix in &result {
            for &object in *slot {
                let mut tuple = prefix.clone();
                tuple.push(object);
                extended.push(tuple);
            }
        }
        result = extended;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::interner::PredicateId;
    use crate::logic::{Conditions, Expression, Interner, PredicateSymbol};
    use crate::problem::{PredicateSignature, TypeHierarchy, TypedObject};
    use crate::state::State;

    fn two_object_problem() -> Problem {
        let mut interner = Interner::new();
        let ty = interner.intern_type("object");
        let a = interner.intern_object("a");
        let b = interner.intern_object("b");
        interner.intern_predicate("p");
        interner.intern_predicate("q");

        let mut types = TypeHierarchy::new();
        types.add_type(ty, None);

        Problem::new(
            "two-objects",
            interner,
            types,
            vec![
                TypedObject { object: a, ty },
                TypedObject { object: b, ty },
            ],
            vec![
                PredicateSignature {
                    symbol: PredicateSymbol::new(PredicateId(0), 1),
                    parameter_types: vec![ty],
                },
                PredicateSignature {
                    symbol: PredicateSymbol::new(PredicateId(1), 2),
                    parameter_types: vec![ty, ty],
                },
            ],
            vec![],
            State::new(),
            Conditions::closed(Expression::And(vec![])),
        )
        .unwrap()
    }

    #[test]
    fn test_grounded_predicate_universe() {
        let problem = two_object_problem();
        let universe = ObjectUniverse::from_problem(&problem);
        // 2 unary + 4 binary ground atoms
        assert_eq!(universe.grounded_predicates().len(), 6);
    }

    #[test]
    fn test_type_extension() {
        let problem = two_object_problem();
        let universe = ObjectUniverse::from_problem(&problem);
        let ty = problem.interner.get_type("object").unwrap();
        assert_eq!(universe.objects_of_type(ty).len(), 2);
    }
}
