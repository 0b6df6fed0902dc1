//! Boolean evaluation of conditions against states
//!
//! Two evaluator flavors exist for the two condition representations: a
//! tree walker for quantifier-bearing expressions (cheap for one-shot
//! checks during forward expansion) and a literal/clause evaluator for CNF
//! (cheap for repeated checks of one condition against many states). Both
//! share the primitive-leaf semantics defined here. Evaluators are
//! stateless: the substitution and reference state are call arguments,
//! never fields.

pub mod cnf;
pub mod count;
pub mod expression;
pub mod labels;
pub mod rigid;
pub mod satisfying;

pub use cnf::CnfEvaluator;
pub use count::{ConstraintCounter, ConstraintCounts};
pub use expression::ExpressionEvaluator;
pub use labels::LabelEvaluator;
pub use rigid::RigidComplianceEvaluator;
pub use satisfying::SatisfyingAtomsEvaluator;

use crate::ground::{ground_atom_deep, ground_term_deep, RigidFacts};
use crate::logic::{Atom, CompareOp, Literal, NumericExpr, Substitution, Term};
use crate::state::State;

/// Evaluate a predicate atom: deep-ground it, then consult the rigid set
/// and the state's predicate set. The result is XORed with the negation
/// flag.
pub(crate) fn eval_predicate(
    atom: &Atom,
    negated: bool,
    subst: &Substitution,
    state: &State,
    rigid: &RigidFacts,
) -> bool {
    let grounded = ground_atom_deep(atom, subst, state);
    let holds = rigid.contains(&grounded) || state.holds(&grounded);
    holds != negated
}

/// Evaluate an equality between two deep-grounded terms.
pub(crate) fn eval_equals(
    left: &Term,
    right: &Term,
    negated: bool,
    subst: &Substitution,
    state: &State,
) -> bool {
    let left = ground_term_deep(left, subst, state);
    let right = ground_term_deep(right, subst, state);
    (left == right) != negated
}

/// Evaluate a numeric comparison. An undefined fluent makes the positive
/// comparison false (and its negation true).
pub(crate) fn eval_compare(
    op: CompareOp,
    left: &NumericExpr,
    right: &NumericExpr,
    negated: bool,
    subst: &Substitution,
    state: &State,
) -> bool {
    let holds = match (
        eval_numeric(left, subst, state),
        eval_numeric(right, subst, state),
    ) {
        (Some(left), Some(right)) => op.holds(left, right),
        _ => false,
    };
    holds != negated
}

/// Evaluate a numeric expression; `None` if any fluent involved is
/// undefined in the state.
pub(crate) fn eval_numeric(
    expr: &NumericExpr,
    subst: &Substitution,
    state: &State,
) -> Option<f64> {
    match expr {
        NumericExpr::Number(n) => Some(n.value()),
        NumericExpr::Duration => Some(0.0),
        NumericExpr::Function(atom) => {
            let grounded = ground_atom_deep(atom, subst, state);
            state.numeric_value(&grounded).map(|n| n.value())
        }
        NumericExpr::Binary(op, left, right) => {
            let left = eval_numeric(left, subst, state)?;
            let right = eval_numeric(right, subst, state)?;
            Some(match op {
                crate::logic::ArithOp::Add => left + right,
                crate::logic::ArithOp::Sub => left - right,
                crate::logic::ArithOp::Mul => left * right,
                crate::logic::ArithOp::Div => left / right,
            })
        }
    }
}

/// Evaluate one CNF literal.
pub(crate) fn eval_literal(
    literal: &Literal,
    subst: &Substitution,
    state: &State,
    rigid: &RigidFacts,
) -> bool {
    match literal {
        Literal::Predicate { atom, negated } => {
            eval_predicate(atom, *negated, subst, state, rigid)
        }
        Literal::Equals {
            left,
            right,
            negated,
        } => eval_equals(left, right, *negated, subst, state),
        Literal::Compare {
            op,
            left,
            right,
            negated,
        } => eval_compare(*op, left, right, *negated, subst, state),
    }
}
