//! The lifted-logic data model
//!
//! This module provides the fundamental types for representing planning
//! conditions: interned symbols, terms, atoms, substitutions, expression
//! trees, and the clause/literal CNF model.

pub mod atom;
pub mod conditions;
pub mod expression;
pub mod interner;
pub mod number;
pub mod substitution;
pub mod term;

// Re-export commonly used types
pub use atom::{Atom, AtomDisplay, AtomHead, FunctionSymbol, PredicateSymbol};
pub use conditions::{Clause, Conditions, ConditionsCnf, Conjunct, Literal, LiteralDisplay};
pub use expression::{ArithOp, CompareOp, Expression, NumericExpr, Parameter};
pub use interner::{FunctionId, Interner, ObjectId, PredicateId, TypeId, VariableId};
pub use number::Number;
pub use substitution::Substitution;
pub use term::{Term, TermDisplay};
