//! The problem boundary
//!
//! A `Problem` bundles everything the validation/parsing stage hands over:
//! typed signatures, the type hierarchy, the typed object list, the initial
//! state, and the goal conditions. Construction re-checks the handful of
//! invariants this core relies on (arities, groundness, goal bindings) and
//! is the only fallible entry point of the crate.

use crate::analysis::free_variables;
use crate::error::ValidationError;
use crate::logic::{
    Atom, AtomHead, Conditions, FunctionSymbol, Interner, ObjectId, PredicateSymbol, TypeId,
};
use crate::state::State;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The type hierarchy: every type with an optional parent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeHierarchy {
    parents: HashMap<TypeId, Option<TypeId>>,
}

impl TypeHierarchy {
    pub fn new() -> Self {
        TypeHierarchy::default()
    }

    pub fn add_type(&mut self, ty: TypeId, parent: Option<TypeId>) {
        self.parents.insert(ty, parent);
    }

    pub fn contains(&self, ty: TypeId) -> bool {
        self.parents.contains_key(&ty)
    }

    /// Reflexive, transitive subtype check.
    pub fn is_subtype(&self, sub: TypeId, sup: TypeId) -> bool {
        let mut current = Some(sub);
        while let Some(ty) = current {
            if ty == sup {
                return true;
            }
            current = self.parents.get(&ty).copied().flatten();
        }
        false
    }

    pub fn types(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.parents.keys().copied()
    }
}

/// Whether a function ranges over numbers or over objects of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionRange {
    Numeric,
    Object(TypeId),
}

/// Declared signature of a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateSignature {
    pub symbol: PredicateSymbol,
    pub parameter_types: Vec<TypeId>,
}

/// Declared signature of a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub symbol: FunctionSymbol,
    pub parameter_types: Vec<TypeId>,
    pub range: FunctionRange,
}

/// An object together with its declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedObject {
    pub object: ObjectId,
    pub ty: TypeId,
}

/// A fully assembled planning problem, as consumed by the evaluation
/// manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub name: String,
    pub interner: Interner,
    pub types: TypeHierarchy,
    pub objects: Vec<TypedObject>,
    pub predicates: Vec<PredicateSignature>,
    pub functions: Vec<FunctionSignature>,
    pub init: State,
    pub goal: Conditions,
}

impl Problem {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        interner: Interner,
        types: TypeHierarchy,
        objects: Vec<TypedObject>,
        predicates: Vec<PredicateSignature>,
        functions: Vec<FunctionSignature>,
        init: State,
        goal: Conditions,
    ) -> Result<Self, ValidationError> {
        let problem = Problem {
            name: name.into(),
            interner,
            types,
            objects,
            predicates,
            functions,
            init,
            goal,
        };
        problem.validate()?;
        Ok(problem)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for signature in &self.predicates {
            if signature.symbol.arity as usize != signature.parameter_types.len() {
                return Err(ValidationError::new(
                    "predicates",
                    format!(
                        "predicate {} declares arity {} but {} parameter types",
                        signature.symbol.name(&self.interner),
                        signature.symbol.arity,
                        signature.parameter_types.len()
                    ),
                ));
            }
        }
        for signature in &self.functions {
            if signature.symbol.arity as usize != signature.parameter_types.len() {
                return Err(ValidationError::new(
                    "functions",
                    format!(
                        "function {} declares arity {} but {} parameter types",
                        signature.symbol.name(&self.interner),
                        signature.symbol.arity,
                        signature.parameter_types.len()
                    ),
                ));
            }
        }

        for object in &self.objects {
            if !self.types.contains(object.ty) {
                return Err(ValidationError::new(
                    "objects",
                    format!(
                        "object {} has undeclared type",
                        self.interner.resolve_object(object.object)
                    ),
                ));
            }
        }

        for atom in self.init.predicates() {
            self.check_declared(atom, "init")?;
            if !atom.is_ground() {
                return Err(ValidationError::new(
                    "init",
                    format!("initial-state atom {} is not ground", atom),
                ));
            }
        }

        let free = free_variables(self.goal.expression());
        for variable in &free {
            if !self
                .goal
                .parameters()
                .iter()
                .any(|p| p.variable == *variable)
            {
                return Err(ValidationError::new(
                    "goal",
                    format!("goal variable {} is not bound by a parameter", variable),
                ));
            }
        }

        Ok(())
    }

    fn check_declared(&self, atom: &Atom, location: &str) -> Result<(), ValidationError> {
        match atom.head {
            AtomHead::Predicate(symbol) => {
                if !self.predicates.iter().any(|s| s.symbol == symbol) {
                    return Err(ValidationError::new(
                        location,
                        format!("undeclared predicate in atom {}", atom),
                    ));
                }
            }
            AtomHead::Function(symbol) => {
                if !self.functions.iter().any(|s| s.symbol == symbol) {
                    return Err(ValidationError::new(
                        location,
                        format!("undeclared function in atom {}", atom),
                    ));
                }
            }
        }
        Ok(())
    }
}
