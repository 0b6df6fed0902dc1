//! Lifted condition expressions
//!
//! The immutable formula trees handed in by the validation stage. An
//! expression is built once per problem and never mutated; transformation and
//! evaluation always produce new trees or plain results.

use super::atom::Atom;
use super::interner::{TypeId, VariableId};
use super::number::Number;
use super::substitution::Substitution;
use super::term::Term;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A typed parameter of an action, quantifier, or conditions object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub variable: VariableId,
    pub ty: TypeId,
}

impl Parameter {
    pub fn new(variable: VariableId, ty: TypeId) -> Self {
        Parameter { variable, ty }
    }
}

/// Relational operator of a numeric comparison.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum CompareOp {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
    Ne,
}

impl CompareOp {
    /// Apply the operator to two evaluated values.
    pub fn holds(self, left: f64, right: f64) -> bool {
        match self {
            CompareOp::Eq => left == right,
            CompareOp::Lt => left < right,
            CompareOp::Le => left <= right,
            CompareOp::Gt => left > right,
            CompareOp::Ge => left >= right,
            CompareOp::Ne => left != right,
        }
    }
}

/// Binary arithmetic operator inside numeric expressions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// A numeric expression: constants, fluent lookups, the duration placeholder,
/// and binary arithmetic over them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NumericExpr {
    Number(Number),
    Function(Atom),
    /// Placeholder for the `?duration` of a durative action; evaluates to 0
    /// in this core.
    Duration,
    Binary(ArithOp, Box<NumericExpr>, Box<NumericExpr>),
}

impl NumericExpr {
    /// Collect all variable ids occurring in fluent arguments.
    pub fn collect_variables(&self, vars: &mut IndexSet<VariableId>) {
        match self {
            NumericExpr::Number(_) | NumericExpr::Duration => {}
            NumericExpr::Function(atom) => atom.collect_variables(vars),
            NumericExpr::Binary(_, left, right) => {
                left.collect_variables(vars);
                right.collect_variables(vars);
            }
        }
    }

    pub(crate) fn substitute_masked(
        &self,
        subst: &Substitution,
        masked: &IndexSet<VariableId>,
    ) -> NumericExpr {
        match self {
            NumericExpr::Number(_) | NumericExpr::Duration => self.clone(),
            NumericExpr::Function(atom) => {
                NumericExpr::Function(atom.substitute_masked(subst, masked))
            }
            NumericExpr::Binary(op, left, right) => NumericExpr::Binary(
                *op,
                Box::new(left.substitute_masked(subst, masked)),
                Box::new(right.substitute_masked(subst, masked)),
            ),
        }
    }

    /// Apply a substitution to all fluent arguments.
    pub fn substitute(&self, subst: &Substitution) -> NumericExpr {
        self.substitute_masked(subst, &IndexSet::new())
    }
}

/// A lifted condition formula.
///
/// `And`/`Or` are n-ary; an empty conjunction is true and an empty
/// disjunction is false, everywhere in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expression {
    Predicate(Atom),
    Equals(Term, Term),
    And(Vec<Expression>),
    Or(Vec<Expression>),
    Not(Box<Expression>),
    Imply(Box<Expression>, Box<Expression>),
    Exists(Vec<Parameter>, Box<Expression>),
    Forall(Vec<Parameter>, Box<Expression>),
    Compare(CompareOp, NumericExpr, NumericExpr),
    /// A named soft-constraint wrapper; not a hard-satisfaction condition.
    Preference(String, Box<Expression>),
}

impl Expression {
    /// Apply a substitution, respecting quantifier shadowing: a variable
    /// bound by an enclosing `Exists`/`Forall` inside this tree is left
    /// untouched even if the substitution binds the same id.
    pub fn substitute(&self, subst: &Substitution) -> Expression {
        let mut masked = IndexSet::new();
        self.substitute_inner(subst, &mut masked)
    }

    fn substitute_inner(
        &self,
        subst: &Substitution,
        masked: &mut IndexSet<VariableId>,
    ) -> Expression {
        match self {
            Expression::Predicate(atom) => {
                Expression::Predicate(atom.substitute_masked(subst, masked))
            }
            Expression::Equals(left, right) => Expression::Equals(
                left.substitute_masked(subst, masked),
                right.substitute_masked(subst, masked),
            ),
            Expression::And(children) => Expression::And(
                children
                    .iter()
                    .map(|c| c.substitute_inner(subst, masked))
                    .collect(),
            ),
            Expression::Or(children) => Expression::Or(
                children
                    .iter()
                    .map(|c| c.substitute_inner(subst, masked))
                    .collect(),
            ),
            Expression::Not(child) => {
                Expression::Not(Box::new(child.substitute_inner(subst, masked)))
            }
            Expression::Imply(antecedent, consequent) => Expression::Imply(
                Box::new(antecedent.substitute_inner(subst, masked)),
                Box::new(consequent.substitute_inner(subst, masked)),
            ),
            Expression::Exists(params, body) => {
                let fresh: Vec<VariableId> = params
                    .iter()
                    .filter(|p| masked.insert(p.variable))
                    .map(|p| p.variable)
                    .collect();
                let result =
                    Expression::Exists(params.clone(), Box::new(body.substitute_inner(subst, masked)));
                for v in fresh {
                    masked.swap_remove(&v);
                }
                result
            }
            Expression::Forall(params, body) => {
                let fresh: Vec<VariableId> = params
                    .iter()
                    .filter(|p| masked.insert(p.variable))
                    .map(|p| p.variable)
                    .collect();
                let result =
                    Expression::Forall(params.clone(), Box::new(body.substitute_inner(subst, masked)));
                for v in fresh {
                    masked.swap_remove(&v);
                }
                result
            }
            Expression::Compare(op, left, right) => Expression::Compare(
                *op,
                left.substitute_masked(subst, masked),
                right.substitute_masked(subst, masked),
            ),
            Expression::Preference(name, body) => Expression::Preference(
                name.clone(),
                Box::new(body.substitute_inner(subst, masked)),
            ),
        }
    }
}
