//! The grounding seam
//!
//! Everything that connects lifted formulas to the concrete object universe:
//! deep term/atom grounding against a substitution and a state, lazy
//! generation of local substitutions over quantifier parameters, and the
//! static ground-atom universe used by state enumeration.

pub mod rigid;
pub mod universe;

pub use rigid::RigidFacts;
pub use universe::ObjectUniverse;

use crate::logic::{Atom, ObjectId, Parameter, Substitution, Term, TypeId, VariableId};
use crate::state::State;
use indexmap::IndexSet;
use std::collections::HashMap;

/// The typed object universe of one planning problem.
///
/// Implementations answer which objects populate each type and what the
/// static ground-atom universe looks like. Computed once per problem and
/// immutable afterwards.
pub trait Universe {
    /// All objects belonging to a type, subtypes included.
    fn objects_of_type(&self, ty: TypeId) -> &[ObjectId];

    /// Every ground predicate atom constructible in this problem.
    fn grounded_predicates(&self) -> &[Atom];

    /// Every ground object-function atom, with its finite value range.
    fn grounded_object_functions(&self) -> &[ObjectFunctionRange];
}

/// A ground object-function atom together with the objects it may take as a
/// value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectFunctionRange {
    pub atom: Atom,
    pub values: Vec<ObjectId>,
}

/// Resolve a term to its deepest concrete form: variables through the
/// substitution, nested object-function terms through the state. A variable
/// the substitution does not bind, or a function the state leaves undefined,
/// stays symbolic.
pub fn ground_term_deep(term: &Term, subst: &Substitution, state: &State) -> Term {
    match term {
        Term::Object(_) => term.clone(),
        Term::Variable(v) => match subst.resolve(*v) {
            Some(object) => Term::Object(object),
            None => term.clone(),
        },
        Term::Function(atom) => {
            let grounded = ground_atom_deep(atom, subst, state);
            match state.object_value(&grounded) {
                Some(object) => Term::Object(object),
                None => Term::Function(Box::new(grounded)),
            }
        }
    }
}

/// Deep-ground every argument term of an atom.
pub fn ground_atom_deep(atom: &Atom, subst: &Substitution, state: &State) -> Atom {
    Atom {
        head: atom.head,
        args: atom
            .args
            .iter()
            .map(|arg| ground_term_deep(arg, subst, state))
            .collect(),
    }
}

/// Resolve a term using only the substitution, with no state: `None` if the
/// result would not be fully concrete (unbound variable or any nested
/// function term). Used by static rigid-compliance checks.
pub fn ground_term_static(term: &Term, subst: &Substitution) -> Option<Term> {
    match term {
        Term::Object(_) => Some(term.clone()),
        Term::Variable(v) => subst.resolve(*v).map(Term::Object),
        Term::Function(_) => None,
    }
}

/// Statically ground an atom; `None` unless every argument resolves to an
/// object without consulting a state.
pub fn ground_atom_static(atom: &Atom, subst: &Substitution) -> Option<Atom> {
    let mut args = Vec::with_capacity(atom.args.len());
    for arg in &atom.args {
        args.push(ground_term_static(arg, subst)?);
    }
    Some(Atom {
        head: atom.head,
        args,
    })
}

/// Lazily generate every local substitution over the given parameters: the
/// cartesian product of each parameter's type extension.
///
/// Panics on duplicate parameter ids; quantifier parameter lists are
/// validated upstream, so a duplicate here is a programmer error.
pub fn local_substitutions<'a>(
    universe: &'a dyn Universe,
    parameters: &[Parameter],
) -> LocalSubstitutions<'a> {
    let mut seen = IndexSet::new();
    for parameter in parameters {
        assert!(
            seen.insert(parameter.variable),
            "duplicate quantifier parameter {}",
            parameter.variable
        );
    }

    let slots: Vec<(VariableId, &'a [ObjectId])> = parameters
        .iter()
        .map(|p| (p.variable, universe.objects_of_type(p.ty)))
        .collect();

    // A parameter over an empty type extension has no instances at all.
    let exhausted = slots.iter().any(|(_, objects)| objects.is_empty());
    LocalSubstitutions {
        cursor: if exhausted {
            None
        } else {
            Some(vec![0; slots.len()])
        },
        slots,
    }
}

/// Iterator over the cartesian product of parameter type extensions.
///
/// Yields one binding map per combination; an empty parameter list yields
/// exactly one empty binding (the product of zero sets has one element).
#[derive(Debug)]
pub struct LocalSubstitutions<'a> {
    slots: Vec<(VariableId, &'a [ObjectId])>,
    cursor: Option<Vec<usize>>,
}

impl<'a> Iterator for LocalSubstitutions<'a> {
    type Item = HashMap<VariableId, ObjectId>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.as_mut()?;

        let binding: HashMap<VariableId, ObjectId> = self
            .slots
            .iter()
            .zip(cursor.iter())
            .map(|((variable, objects), &index)| (*variable, objects[index]))
            .collect();

        // Odometer advance, rightmost slot fastest.
        let mut exhausted = true;
        let mut position = self.slots.len();
        while position > 0 {
            position -= 1;
            cursor[position] += 1;
            if cursor[position] < self.slots[position].1.len() {
                exhausted = false;
                break;
            }
            cursor[position] = 0;
        }
        if exhausted {
            self.cursor = None;
        }

        Some(binding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::interner::{ObjectId, TypeId};
    use crate::logic::VariableId;

    struct TwoTypes {
        small: Vec<ObjectId>,
        large: Vec<ObjectId>,
        empty: Vec<ObjectId>,
    }

    impl Universe for TwoTypes {
        fn objects_of_type(&self, ty: TypeId) -> &[ObjectId] {
            match ty.as_u32() {
                0 => &self.small,
                1 => &self.large,
                _ => &self.empty,
            }
        }

        fn grounded_predicates(&self) -> &[Atom] {
            &[]
        }

        fn grounded_object_functions(&self) -> &[ObjectFunctionRange] {
            &[]
        }
    }

    fn universe() -> TwoTypes {
        TwoTypes {
            small: vec![ObjectId(0), ObjectId(1)],
            large: vec![ObjectId(0), ObjectId(1), ObjectId(2)],
            empty: vec![],
        }
    }

    #[test]
    fn test_cross_product_size() {
        let universe = universe();
        let params = vec![
            Parameter::new(VariableId::new(0), TypeId(0)),
            Parameter::new(VariableId::new(1), TypeId(1)),
        ];
        let all: Vec<_> = local_substitutions(&universe, &params).collect();
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn test_empty_parameter_list_yields_one_binding() {
        let universe = universe();
        let all: Vec<_> = local_substitutions(&universe, &[]).collect();
        assert_eq!(all.len(), 1);
        assert!(all[0].is_empty());
    }

    #[test]
    fn test_empty_extension_yields_nothing() {
        let universe = universe();
        let params = vec![Parameter::new(VariableId::new(0), TypeId(7))];
        assert_eq!(local_substitutions(&universe, &params).count(), 0);
    }

    #[test]
    #[should_panic(expected = "duplicate quantifier parameter")]
    fn test_duplicate_parameter_panics() {
        let universe = universe();
        let params = vec![
            Parameter::new(VariableId::new(0), TypeId(0)),
            Parameter::new(VariableId::new(0), TypeId(1)),
        ];
        let _ = local_substitutions(&universe, &params);
    }
}
