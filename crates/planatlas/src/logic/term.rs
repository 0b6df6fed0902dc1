//! Terms of the planning language

use super::atom::Atom;
use super::interner::{Interner, ObjectId, VariableId};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A term: a resolved object, a parameter variable, or a nested
/// object-function application whose value must be resolved against a state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    Object(ObjectId),
    Variable(VariableId),
    Function(Box<Atom>),
}

impl Term {
    /// Check whether the term contains no variables.
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Object(_) => true,
            Term::Variable(_) => false,
            Term::Function(atom) => atom.is_ground(),
        }
    }

    /// Collect all variable ids occurring in this term, including inside
    /// nested object-function arguments.
    pub fn collect_variables(&self, vars: &mut IndexSet<VariableId>) {
        match self {
            Term::Object(_) => {}
            Term::Variable(v) => {
                vars.insert(*v);
            }
            Term::Function(atom) => atom.collect_variables(vars),
        }
    }

    /// Format this term with an interner for name resolution
    pub fn display<'a>(&'a self, interner: &'a Interner) -> TermDisplay<'a> {
        TermDisplay {
            term: self,
            interner,
        }
    }
}

/// Display wrapper for Term that includes an interner for name resolution
pub struct TermDisplay<'a> {
    term: &'a Term,
    interner: &'a Interner,
}

impl<'a> fmt::Display for TermDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.term {
            Term::Object(id) => write!(f, "{}", self.interner.resolve_object(*id)),
            Term::Variable(v) => write!(f, "{}", v),
            Term::Function(atom) => write!(f, "{}", atom.display(self.interner)),
        }
    }
}

// Display implementation that shows IDs (for debugging without interner)

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Object(id) => write!(f, "o{}", id.as_u32()),
            Term::Variable(v) => write!(f, "{}", v),
            Term::Function(atom) => write!(f, "{}", atom),
        }
    }
}
