//! Auxiliary analyses over formulas and CNF conditions: free-parameter
//! collection, parameter renaming, and used-predicate collection.

pub mod free_params;
pub mod predicates;
pub mod rename;

pub use free_params::free_variables;
pub use predicates::used_predicates;
pub use rename::{rename_parameters, ParameterRenaming};
