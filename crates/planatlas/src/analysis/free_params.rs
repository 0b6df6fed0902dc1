//! Free-parameter collection
//!
//! Walks an expression tree accumulating the variable ids referenced by any
//! predicate, equality, or numeric-function leaf, minus the ids bound by an
//! enclosing quantifier: the formula's free variables.

use crate::logic::{Expression, VariableId};
use indexmap::IndexSet;

/// Collect the free variables of an expression.
pub fn free_variables(expression: &Expression) -> IndexSet<VariableId> {
    let mut free = IndexSet::new();
    let mut bound = IndexSet::new();
    walk(expression, &mut bound, &mut free);
    free
}

fn walk(
    expression: &Expression,
    bound: &mut IndexSet<VariableId>,
    free: &mut IndexSet<VariableId>,
) {
    match expression {
        Expression::Predicate(atom) => {
            let mut vars = IndexSet::new();
            atom.collect_variables(&mut vars);
            free.extend(vars.into_iter().filter(|v| !bound.contains(v)));
        }
        Expression::Equals(left, right) => {
            let mut vars = IndexSet::new();
            left.collect_variables(&mut vars);
            right.collect_variables(&mut vars);
            free.extend(vars.into_iter().filter(|v| !bound.contains(v)));
        }
        Expression::Compare(_, left, right) => {
            let mut vars = IndexSet::new();
            left.collect_variables(&mut vars);
            right.collect_variables(&mut vars);
            free.extend(vars.into_iter().filter(|v| !bound.contains(v)));
        }
        Expression::And(children) | Expression::Or(children) => {
            for child in children {
                walk(child, bound, free);
            }
        }
        Expression::Not(child) | Expression::Preference(_, child) => walk(child, bound, free),
        Expression::Imply(antecedent, consequent) => {
            walk(antecedent, bound, free);
            walk(consequent, bound, free);
        }
        Expression::Exists(params, body) | Expression::Forall(params, body) => {
            let fresh: Vec<VariableId> = params
                .iter()
                .filter(|p| bound.insert(p.variable))
                .map(|p| p.variable)
                .collect();
            walk(body, bound, free);
            for variable in fresh {
                bound.swap_remove(&variable);
            }
        }
    }
}
