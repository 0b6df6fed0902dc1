//! Normal-form conversion pipeline: NNF (quantifier grounding, negation
//! pushing) followed by CNF (distribution into clauses).

pub mod cnf;
pub mod nnf;

pub use cnf::{conditions_to_cnf, CnfTransformer};
pub use nnf::NnfTransformer;
