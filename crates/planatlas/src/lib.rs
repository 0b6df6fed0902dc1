//! PlanAtlas: the logical-conditions core of a classical planner
//!
//! This library bridges lifted, typed, quantified planning conditions and
//! the cheap ground-fact tests a search or heuristic layer runs millions of
//! times per problem: substitution-based grounding, NNF/CNF normalization,
//! boolean evaluation with rigid-fact short-circuiting, constraint counting
//! for heuristics, and enumeration of the concrete or relative states
//! consistent with a condition.

pub mod analysis;
pub mod enumerate;
pub mod error;
pub mod eval;
pub mod ground;
pub mod logic;
pub mod manager;
pub mod problem;
pub mod state;
pub mod transform;

// Re-export commonly used types from logic
pub use logic::{
    ArithOp, Atom, AtomHead, Clause, CompareOp, Conditions, ConditionsCnf, Conjunct, Expression,
    FunctionId, FunctionSymbol, Interner, Literal, Number, NumericExpr, ObjectId, Parameter,
    PredicateId, PredicateSymbol, Substitution, Term, TypeId, VariableId,
};

// Re-export the grounding seam
pub use ground::{
    ground_atom_deep, ground_term_deep, local_substitutions, LocalSubstitutions,
    ObjectFunctionRange, ObjectUniverse, RigidFacts, Universe,
};

// Re-export transformation and evaluation entry points
pub use eval::{
    CnfEvaluator, ConstraintCounter, ConstraintCounts, ExpressionEvaluator, LabelEvaluator,
    RigidComplianceEvaluator, SatisfyingAtomsEvaluator,
};
pub use transform::{conditions_to_cnf, CnfTransformer, NnfTransformer};

// Re-export analyses
pub use analysis::{free_variables, rename_parameters, used_predicates, ParameterRenaming};

// Re-export the state model and enumeration
pub use enumerate::{
    concrete_states, concrete_states_for_conditions, relative_states, ConcreteStates,
    ConditionsStates, RelativeStates,
};
pub use state::{RelativeState, State};

// Re-export the problem boundary and facade
pub use error::ValidationError;
pub use manager::EvaluationManager;
pub use problem::{
    FunctionRange, FunctionSignature, PredicateSignature, Problem, TypeHierarchy, TypedObject,
};
