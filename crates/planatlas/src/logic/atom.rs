//! Atoms: predicate and function applications

use super::interner::{FunctionId, Interner, PredicateId, VariableId};
use super::term::Term;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A predicate symbol with arity
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PredicateSymbol {
    pub id: PredicateId,
    pub arity: u8,
}

impl PredicateSymbol {
    pub fn new(id: PredicateId, arity: u8) -> Self {
        PredicateSymbol { id, arity }
    }

    /// Get the name of this predicate symbol from the interner
    pub fn name<'a>(&self, interner: &'a Interner) -> &'a str {
        interner.resolve_predicate(self.id)
    }
}

/// A function symbol with arity (numeric or object valued)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FunctionSymbol {
    pub id: FunctionId,
    pub arity: u8,
}

impl FunctionSymbol {
    pub fn new(id: FunctionId, arity: u8) -> Self {
        FunctionSymbol { id, arity }
    }

    /// Get the name of this function symbol from the interner
    pub fn name<'a>(&self, interner: &'a Interner) -> &'a str {
        interner.resolve_function(self.id)
    }
}

/// The head symbol of an atom: either a predicate or a function.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum AtomHead {
    Predicate(PredicateSymbol),
    Function(FunctionSymbol),
}

/// An atom: a predicate or function symbol applied to an ordered term list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Atom {
    pub head: AtomHead,
    pub args: Vec<Term>,
}

impl Atom {
    pub fn predicate(symbol: PredicateSymbol, args: Vec<Term>) -> Self {
        debug_assert_eq!(symbol.arity as usize, args.len(), "predicate arity mismatch");
        Atom {
            head: AtomHead::Predicate(symbol),
            args,
        }
    }

    pub fn function(symbol: FunctionSymbol, args: Vec<Term>) -> Self {
        debug_assert_eq!(symbol.arity as usize, args.len(), "function arity mismatch");
        Atom {
            head: AtomHead::Function(symbol),
            args,
        }
    }

    pub fn is_predicate(&self) -> bool {
        matches!(self.head, AtomHead::Predicate(_))
    }

    /// The predicate symbol, if this atom is a predicate application.
    pub fn predicate_symbol(&self) -> Option<PredicateSymbol> {
        match self.head {
            AtomHead::Predicate(p) => Some(p),
            AtomHead::Function(_) => None,
        }
    }

    /// The function symbol, if this atom is a function application.
    pub fn function_symbol(&self) -> Option<FunctionSymbol> {
        match self.head {
            AtomHead::Predicate(_) => None,
            AtomHead::Function(f) => Some(f),
        }
    }

    /// Check whether all argument terms are ground.
    pub fn is_ground(&self) -> bool {
        self.args.iter().all(Term::is_ground)
    }

    /// Collect all variable ids occurring in the argument terms.
    pub fn collect_variables(&self, vars: &mut IndexSet<VariableId>) {
        for arg in &self.args {
            arg.collect_variables(vars);
        }
    }

    /// Format this atom with an interner for name resolution
    pub fn display<'a>(&'a self, interner: &'a Interner) -> AtomDisplay<'a> {
        AtomDisplay {
            atom: self,
            interner,
        }
    }
}

/// Display wrapper for Atom that includes an interner for name resolution
pub struct AtomDisplay<'a> {
    atom: &'a Atom,
    interner: &'a Interner,
}

impl<'a> fmt::Display for AtomDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.atom.head {
            AtomHead::Predicate(p) => self.interner.resolve_predicate(p.id),
            AtomHead::Function(func) => self.interner.resolve_function(func.id),
        };
        write!(f, "({}", name)?;
        for arg in &self.atom.args {
            write!(f, " {}", arg.display(self.interner))?;
        }
        write!(f, ")")
    }
}

// Display implementation that shows IDs (for debugging without interner)

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.head {
            AtomHead::Predicate(p) => write!(f, "P{}(", p.id.as_u32())?,
            AtomHead::Function(func) => write!(f, "F{}(", func.id.as_u32())?,
        }
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}
