//! Rigid facts: predicates true in every reachable state
//!
//! The rigid-relation analysis itself runs outside this core; its result is
//! consumed here as a read-only set that evaluation consults alongside each
//! state, letting static facts short-circuit per-state lookups.

use crate::logic::{Atom, PredicateId};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// The set of facts proven true in every reachable state, plus the
/// predicates all of whose facts are static.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RigidFacts {
    facts: IndexSet<Atom>,
    rigid_predicates: IndexSet<PredicateId>,
}

impl RigidFacts {
    /// An empty rigid set: nothing is known static yet.
    pub fn new() -> Self {
        RigidFacts::default()
    }

    pub fn from_parts<F, P>(facts: F, rigid_predicates: P) -> Self
    where
        F: IntoIterator<Item = Atom>,
        P: IntoIterator<Item = PredicateId>,
    {
        let facts: IndexSet<Atom> = facts.into_iter().collect();
        for atom in &facts {
            debug_assert!(atom.is_ground(), "lifted rigid fact: {}", atom);
        }
        RigidFacts {
            facts,
            rigid_predicates: rigid_predicates.into_iter().collect(),
        }
    }

    /// Check whether a ground atom is a known rigid fact.
    pub fn contains(&self, atom: &Atom) -> bool {
        self.facts.contains(atom)
    }

    /// Check whether a predicate is a rigid relation, i.e. its facts never
    /// change across states.
    pub fn is_rigid_relation(&self, predicate: PredicateId) -> bool {
        self.rigid_predicates.contains(&predicate)
    }

    pub fn facts(&self) -> impl Iterator<Item = &Atom> {
        self.facts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty() && self.rigid_predicates.is_empty()
    }
}
