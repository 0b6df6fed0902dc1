//! Ground planning states
//!
//! A state is a set of asserted ground predicates plus partial maps from
//! ground function atoms to numeric and object values. An absent predicate
//! is false; an absent function value is undefined. States are compared and
//! hashed structurally with order-independent semantics, so they can key a
//! search visited-set directly.

pub mod relative;

pub use relative::RelativeState;

use crate::logic::{Atom, Number, ObjectId};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// A concrete ground state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    predicates: IndexSet<Atom>,
    numeric: IndexMap<Atom, Number>,
    objects: IndexMap<Atom, ObjectId>,
}

impl State {
    pub fn new() -> Self {
        State::default()
    }

    /// Assert a ground predicate atom.
    pub fn add_predicate(&mut self, atom: Atom) {
        debug_assert!(atom.is_predicate(), "not a predicate atom: {}", atom);
        debug_assert!(atom.is_ground(), "lifted atom added to state: {}", atom);
        self.predicates.insert(atom);
    }

    /// Retract a predicate atom. Absence is not an error.
    pub fn remove_predicate(&mut self, atom: &Atom) {
        self.predicates.swap_remove(atom);
    }

    /// Check whether a ground predicate atom is asserted.
    pub fn holds(&self, atom: &Atom) -> bool {
        self.predicates.contains(atom)
    }

    pub fn predicates(&self) -> impl Iterator<Item = &Atom> {
        self.predicates.iter()
    }

    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }

    /// Look up a numeric fluent value; `None` means undefined.
    pub fn numeric_value(&self, atom: &Atom) -> Option<Number> {
        self.numeric.get(atom).copied()
    }

    pub fn set_numeric(&mut self, atom: Atom, value: Number) {
        debug_assert!(atom.is_ground(), "lifted fluent in state: {}", atom);
        self.numeric.insert(atom, value);
    }

    pub fn numeric_fluents(&self) -> impl Iterator<Item = (&Atom, Number)> {
        self.numeric.iter().map(|(atom, value)| (atom, *value))
    }

    /// Increase a defined numeric fluent.
    ///
    /// Panics if the fluent is undefined; effects on undefined fluents are
    /// rejected by the validation stage, so hitting one here is a
    /// programmer error.
    pub fn increase_numeric(&mut self, atom: &Atom, amount: Number) {
        let value = self.defined_numeric_mut(atom);
        *value = *value + amount;
    }

    /// Decrease a defined numeric fluent.
    pub fn decrease_numeric(&mut self, atom: &Atom, amount: Number) {
        let value = self.defined_numeric_mut(atom);
        *value = *value - amount;
    }

    /// Multiply a defined numeric fluent.
    pub fn scale_up_numeric(&mut self, atom: &Atom, factor: Number) {
        let value = self.defined_numeric_mut(atom);
        *value = *value * factor;
    }

    /// Divide a defined numeric fluent.
    pub fn scale_down_numeric(&mut self, atom: &Atom, divisor: Number) {
        let value = self.defined_numeric_mut(atom);
        *value = *value / divisor;
    }

    fn defined_numeric_mut(&mut self, atom: &Atom) -> &mut Number {
        self.numeric
            .get_mut(atom)
            .unwrap_or_else(|| panic!("numeric fluent {} is undefined", atom))
    }

    /// Undefine a numeric fluent (backtracking support for enumeration).
    pub(crate) fn remove_numeric(&mut self, atom: &Atom) -> Option<Number> {
        self.numeric.swap_remove(atom)
    }

    /// Look up an object fluent value; `None` means undefined.
    pub fn object_value(&self, atom: &Atom) -> Option<ObjectId> {
        self.objects.get(atom).copied()
    }

    pub fn set_object(&mut self, atom: Atom, value: ObjectId) {
        debug_assert!(atom.is_ground(), "lifted fluent in state: {}", atom);
        self.objects.insert(atom, value);
    }

    pub fn object_fluents(&self) -> impl Iterator<Item = (&Atom, ObjectId)> {
        self.objects.iter().map(|(atom, value)| (atom, *value))
    }

    /// Undefine an object fluent (backtracking support for enumeration).
    pub(crate) fn remove_object(&mut self, atom: &Atom) -> Option<ObjectId> {
        self.objects.swap_remove(atom)
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty() && self.numeric.is_empty() && self.objects.is_empty()
    }
}

fn element_hash<T: Hash>(tag: u8, element: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    tag.hash(&mut hasher);
    element.hash(&mut hasher);
    hasher.finish()
}

impl Hash for State {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        // XOR-combining per-element hashes keeps the digest independent of
        // insertion order, matching the set-based equality above.
        let mut digest: u64 = 0;
        for atom in &self.predicates {
            digest ^= element_hash(0, atom);
        }
        for (atom, value) in &self.numeric {
            digest ^= element_hash(1, &(atom, value));
        }
        for (atom, value) in &self.objects {
            digest ^= element_hash(2, &(atom, value));
        }
        hasher.write_u64(digest);
    }
}
