//! Relative states: partial states for regression search
//!
//! A relative state extends a ground state with a second set of explicitly
//! negated predicates. A predicate in neither set is unconstrained, i.e.
//! simultaneously possible-true and possible-false, which is how one
//! relative state stands for a whole equivalence class of concrete states.
//! The asserted and negated sets are disjoint by construction.

use super::State;
use crate::logic::{Atom, Number, ObjectId};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// A partial state: constraints a concrete state must satisfy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeState {
    state: State,
    negated: IndexSet<Atom>,
}

impl RelativeState {
    pub fn new() -> Self {
        RelativeState::default()
    }

    /// The positively constrained part (asserted predicates and fixed
    /// function values).
    pub fn positive(&self) -> &State {
        &self.state
    }

    /// The explicitly negated predicate atoms.
    pub fn negated(&self) -> &IndexSet<Atom> {
        &self.negated
    }

    /// Constrain a predicate to true. Removes any explicit negation of the
    /// same atom first, keeping the two sets disjoint.
    pub fn assert_predicate(&mut self, atom: Atom) {
        self.negated.swap_remove(&atom);
        self.state.add_predicate(atom);
    }

    /// Constrain a predicate to false. Removes any assertion of the same
    /// atom first, keeping the two sets disjoint.
    pub fn negate_predicate(&mut self, atom: Atom) {
        debug_assert!(atom.is_predicate(), "not a predicate atom: {}", atom);
        debug_assert!(atom.is_ground(), "lifted atom negated: {}", atom);
        self.state.remove_predicate(&atom);
        self.negated.insert(atom);
    }

    /// Drop any constraint on a predicate, returning it to the
    /// unconstrained (possible-true and possible-false) status.
    pub fn clear_predicate(&mut self, atom: &Atom) {
        self.state.remove_predicate(atom);
        self.negated.swap_remove(atom);
    }

    pub fn is_asserted(&self, atom: &Atom) -> bool {
        self.state.holds(atom)
    }

    pub fn is_negated(&self, atom: &Atom) -> bool {
        self.negated.contains(atom)
    }

    /// A predicate in neither set can branch both ways.
    pub fn is_unconstrained(&self, atom: &Atom) -> bool {
        !self.is_asserted(atom) && !self.is_negated(atom)
    }

    pub fn numeric_value(&self, atom: &Atom) -> Option<Number> {
        self.state.numeric_value(atom)
    }

    pub fn set_numeric(&mut self, atom: Atom, value: Number) {
        self.state.set_numeric(atom, value);
    }

    pub(crate) fn remove_numeric(&mut self, atom: &Atom) -> Option<Number> {
        self.state.remove_numeric(atom)
    }

    pub fn object_value(&self, atom: &Atom) -> Option<ObjectId> {
        self.state.object_value(atom)
    }

    pub fn set_object(&mut self, atom: Atom, value: ObjectId) {
        self.state.set_object(atom, value);
    }

    pub(crate) fn remove_object(&mut self, atom: &Atom) -> Option<ObjectId> {
        self.state.remove_object(atom)
    }

    /// Check whether a concrete state belongs to the equivalence class this
    /// relative state represents.
    pub fn holds_in(&self, concrete: &State) -> bool {
        self.state.predicates().all(|atom| concrete.holds(atom))
            && self.negated.iter().all(|atom| !concrete.holds(atom))
            && self
                .state
                .numeric_fluents()
                .all(|(atom, value)| concrete.numeric_value(atom) == Some(value))
            && self
                .state
                .object_fluents()
                .all(|(atom, value)| concrete.object_value(atom) == Some(value))
    }
}

impl Hash for RelativeState {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        self.state.hash(hasher);
        let mut digest: u64 = 0;
        for atom in &self.negated {
            let mut element = DefaultHasher::new();
            atom.hash(&mut element);
            digest ^= element.finish();
        }
        hasher.write_u64(digest);
    }
}
