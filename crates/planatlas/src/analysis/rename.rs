//! Parameter renaming for CNF conditions
//!
//! When two independently parametrized condition fragments are merged, their
//! variable ids may collide. Renaming assigns every still-free parameter a
//! fresh sequential id and rewrites all occurrences, including those buried
//! inside nested object-function terms.

use crate::logic::{
    Atom, Clause, ConditionsCnf, Conjunct, Literal, NumericExpr, Parameter, Term, VariableId,
};
use indexmap::IndexMap;

/// The old-to-new id map produced by a renaming.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterRenaming {
    pub mapping: IndexMap<VariableId, VariableId>,
}

impl ParameterRenaming {
    pub fn resolve(&self, variable: VariableId) -> VariableId {
        self.mapping.get(&variable).copied().unwrap_or(variable)
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}

/// Rename every free parameter of a CNF conditions object to sequential ids
/// starting at `start`, in declaration order. Returns the rewritten object
/// and the old-to-new map.
pub fn rename_parameters(cnf: &ConditionsCnf, start: u32) -> (ConditionsCnf, ParameterRenaming) {
    let parameters = match cnf.parameters() {
        Some(parameters) => parameters,
        None => return (cnf.clone(), ParameterRenaming::default()),
    };

    let mut renaming = ParameterRenaming::default();
    let mut renamed_params = Vec::with_capacity(parameters.len());
    for (offset, parameter) in parameters.iter().enumerate() {
        let fresh = VariableId::new(start + offset as u32);
        renaming.mapping.insert(parameter.variable, fresh);
        renamed_params.push(Parameter::new(fresh, parameter.ty));
    }

    let conjuncts: Vec<Conjunct> = cnf
        .conjuncts()
        .iter()
        .map(|conjunct| rename_conjunct(conjunct, &renaming))
        .collect();

    (ConditionsCnf::new(conjuncts, renamed_params), renaming)
}

fn rename_conjunct(conjunct: &Conjunct, renaming: &ParameterRenaming) -> Conjunct {
    match conjunct {
        Conjunct::Literal(literal) => Conjunct::Literal(rename_literal(literal, renaming)),
        Conjunct::Clause(clause) => Conjunct::Clause(Clause::new(
            clause
                .literals()
                .iter()
                .map(|literal| rename_literal(literal, renaming))
                .collect(),
        )),
    }
}

fn rename_literal(literal: &Literal, renaming: &ParameterRenaming) -> Literal {
    match literal {
        Literal::Predicate { atom, negated } => Literal::Predicate {
            atom: rename_atom(atom, renaming),
            negated: *negated,
        },
        Literal::Equals {
            left,
            right,
            negated,
        } => Literal::Equals {
            left: rename_term(left, renaming),
            right: rename_term(right, renaming),
            negated: *negated,
        },
        Literal::Compare {
            op,
            left,
            right,
            negated,
        } => Literal::Compare {
            op: *op,
            left: rename_numeric(left, renaming),
            right: rename_numeric(right, renaming),
            negated: *negated,
        },
    }
}

fn rename_term(term: &Term, renaming: &ParameterRenaming) -> Term {
    match term {
        Term::Object(_) => term.clone(),
        Term::Variable(v) => Term::Variable(renaming.resolve(*v)),
        Term::Function(atom) => Term::Function(Box::new(rename_atom(atom, renaming))),
    }
}

fn rename_atom(atom: &Atom, renaming: &ParameterRenaming) -> Atom {
    Atom {
        head: atom.head,
        args: atom
            .args
            .iter()
            .map(|arg| rename_term(arg, renaming))
            .collect(),
    }
}

fn rename_numeric(expr: &NumericExpr, renaming: &ParameterRenaming) -> NumericExpr {
    match expr {
        NumericExpr::Number(_) | NumericExpr::Duration => expr.clone(),
        NumericExpr::Function(atom) => NumericExpr::Function(rename_atom(atom, renaming)),
        NumericExpr::Binary(op, left, right) => NumericExpr::Binary(
            *op,
            Box::new(rename_numeric(left, renaming)),
            Box::new(rename_numeric(right, renaming)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::interner::{PredicateId, TypeId};
    use crate::logic::PredicateSymbol;

    fn open_literal(pred: u32, vars: &[u32]) -> Literal {
        Literal::predicate(
            Atom::predicate(
                PredicateSymbol::new(PredicateId(pred), vars.len() as u8),
                vars.iter()
                    .map(|&v| Term::Variable(VariableId::new(v)))
                    .collect(),
            ),
            false,
        )
    }

    #[test]
    fn test_sequential_ids_from_start() {
        let cnf = ConditionsCnf::new(
            vec![Conjunct::Literal(open_literal(0, &[0, 1]))],
            vec![
                Parameter::new(VariableId::new(0), TypeId(0)),
                Parameter::new(VariableId::new(1), TypeId(0)),
            ],
        );

        let (renamed, renaming) = rename_parameters(&cnf, 5);
        let params = renamed.parameters().unwrap();
        assert_eq!(params[0].variable, VariableId::new(5));
        assert_eq!(params[1].variable, VariableId::new(6));
        assert_eq!(renaming.resolve(VariableId::new(0)), VariableId::new(5));
        assert_eq!(renaming.resolve(VariableId::new(1)), VariableId::new(6));

        // Every literal occurrence follows the map.
        let expected = Conjunct::Literal(open_literal(0, &[5, 6]));
        assert!(renamed.conjuncts().contains(&expected));
    }

    #[test]
    fn test_ground_conditions_unchanged() {
        let cnf = ConditionsCnf::ground(vec![Conjunct::Literal(Literal::predicate(
            Atom::predicate(PredicateSymbol::new(PredicateId(0), 0), vec![]),
            false,
        ))]);
        let (renamed, renaming) = rename_parameters(&cnf, 10);
        assert_eq!(renamed, cnf);
        assert!(renaming.is_empty());
    }

    #[test]
    fn test_renames_inside_nested_function_terms() {
        use crate::logic::interner::FunctionId;
        use crate::logic::FunctionSymbol;

        let nested = Term::Function(Box::new(Atom::function(
            FunctionSymbol::new(FunctionId(0), 1),
            vec![Term::Variable(VariableId::new(2))],
        )));
        let literal = Literal::equals(nested, Term::Variable(VariableId::new(3)), false);
        let cnf = ConditionsCnf::new(
            vec![Conjunct::Literal(literal)],
            vec![
                Parameter::new(VariableId::new(2), TypeId(0)),
                Parameter::new(VariableId::new(3), TypeId(0)),
            ],
        );

        let (renamed, _) = rename_parameters(&cnf, 7);
        let expected = Literal::equals(
            Term::Function(Box::new(Atom::function(
                FunctionSymbol::new(FunctionId(0), 1),
                vec![Term::Variable(VariableId::new(7))],
            ))),
            Term::Variable(VariableId::new(8)),
            false,
        );
        assert!(renamed.conjuncts().contains(&Conjunct::Literal(expected)));
    }
}
