//! State enumeration
//!
//! Two lazy, restartable sequences: the concrete ground states consistent
//! with a relative state, and the relative states consistent with a CNF
//! conditions object (with their concrete states as the composition of the
//! two). Both are explicit-stack backtracking iterators over one shared
//! accumulator; a snapshot is cloned only when a leaf is reached, and every
//! branch's edits are undone before the next sibling branch is tried.
//!
//! Numeric-function values are never enumerated (their domain is infinite
//! in general); they are carried through unchanged. Literal shapes the
//! relative-state model cannot represent exactly, such as general numeric
//! inequalities or negated assignments, contribute no constraint. No
//! consistency check runs during enumeration; a contradictory branch
//! simply surfaces later as an unreachable state.

use crate::ground::{local_substitutions, LocalSubstitutions, Universe};
use crate::logic::{
    Atom, CompareOp, ConditionsCnf, Conjunct, Literal, Number, NumericExpr, ObjectId,
    Substitution, Term,
};
use crate::state::{RelativeState, State};
use log::debug;

/// Enumerate the concrete states consistent with a relative state, over the
/// universe's static ground-atom tables.
pub fn concrete_states(relative: &RelativeState, universe: &dyn Universe) -> ConcreteStates {
    ConcreteStates::new(relative, universe)
}

/// Enumerate the relative states consistent with a CNF conditions object.
/// Free parameters, if any, are bound by iterating their local
/// substitutions.
pub fn relative_states<'a>(
    cnf: &ConditionsCnf,
    universe: &'a dyn Universe,
) -> RelativeStates<'a> {
    RelativeStates::new(cnf, universe)
}

/// Enumerate the concrete states consistent with a CNF conditions object:
/// each relative state expands into its concrete states in turn.
pub fn concrete_states_for_conditions<'a>(
    cnf: &ConditionsCnf,
    universe: &'a dyn Universe,
) -> ConditionsStates<'a> {
    ConditionsStates {
        relatives: relative_states(cnf, universe),
        universe,
        current: None,
    }
}

// =============================================================================
// Relative state -> concrete states
// =============================================================================

/// One open decision while expanding a relative state.
#[derive(Debug, Clone)]
enum Choice {
    /// Unconstrained predicate: absent or present.
    Predicate(Atom),
    /// Unfixed object function: one branch per value in its range.
    Function(Atom, Vec<ObjectId>),
}

impl Choice {
    fn arity(&self) -> usize {
        match self {
            Choice::Predicate(_) => 2,
            Choice::Function(_, values) => values.len(),
        }
    }
}

/// Iterator over the concrete states of a relative state.
///
/// The forced part of the relative state forms an immutable base; the open
/// decisions advance odometer-style, and each step clones the base once and
/// applies the current decision vector.
#[derive(Debug)]
pub struct ConcreteStates {
    base: State,
    choices: Vec<Choice>,
    cursor: Option<Vec<usize>>,
}

impl ConcreteStates {
    pub fn new(relative: &RelativeState, universe: &dyn Universe) -> Self {
        let base = relative.positive().clone();

        let mut choices = Vec::new();
        for atom in universe.grounded_predicates() {
            if relative.is_unconstrained(atom) {
                choices.push(Choice::Predicate(atom.clone()));
            }
        }
        for range in universe.grounded_object_functions() {
            if relative.object_value(&range.atom).is_none() {
                choices.push(Choice::Function(range.atom.clone(), range.values.clone()));
            }
        }

        // A function with an empty value range admits no state at all.
        let exhausted = choices.iter().any(|choice| choice.arity() == 0);
        debug!(
            "expanding relative state: {} open decision(s)",
            choices.len()
        );

        ConcreteStates {
            base,
            cursor: if exhausted {
                None
            } else {
                Some(vec![0; choices.len()])
            },
            choices,
        }
    }
}

impl Iterator for ConcreteStates {
    type Item = State;

    fn next(&mut self) -> Option<State> {
        let cursor = self.cursor.as_mut()?;

        let mut state = self.base.clone();
        for (choice, &index) in self.choices.iter().zip(cursor.iter()) {
            match choice {
                Choice::Predicate(atom) => {
                    if index == 1 {
                        state.add_predicate(atom.clone());
                    }
                }
                Choice::Function(atom, values) => {
                    state.set_object(atom.clone(), values[index]);
                }
            }
        }

        // Odometer advance, rightmost decision fastest.
        let mut exhausted = true;
        let mut position = self.choices.len();
        while position > 0 {
            position -= 1;
            cursor[position] += 1;
            if cursor[position] < self.choices[position].arity() {
                exhausted = false;
                break;
            }
            cursor[position] = 0;
        }
        if exhausted {
            self.cursor = None;
        }

        Some(state)
    }
}

// =============================================================================
// CNF conditions -> relative states
// =============================================================================

/// Reversal information for one committed literal.
#[derive(Debug, Clone)]
enum Edit {
    /// The literal contributed no representable constraint.
    None,
    Predicate {
        atom: Atom,
        was_asserted: bool,
        was_negated: bool,
    },
    Object {
        atom: Atom,
        prior: Option<ObjectId>,
    },
    Numeric {
        atom: Atom,
        prior: Option<Number>,
    },
}

#[derive(Debug)]
struct Frame {
    choice: usize,
    edit: Edit,
}

/// Backtracking iterator over the relative states of a CNF conditions
/// object.
///
/// Per top-level conjunct, a clause branches once per literal (satisfying a
/// clause needs at least one true literal, so each branch commits to a
/// different choice) and a bare literal commits directly. Each commit's
/// constraint is applied to the shared accumulator and undone when the
/// branch retreats.
pub struct RelativeStates<'a> {
    bindings: LocalSubstitutions<'a>,
    conjuncts: Vec<Conjunct>,
    grounded: Vec<Vec<Literal>>,
    frames: Vec<Frame>,
    accumulator: RelativeState,
    descending: bool,
    active: bool,
}

impl<'a> RelativeStates<'a> {
    pub fn new(cnf: &ConditionsCnf, universe: &'a dyn Universe) -> Self {
        let parameters = cnf.parameters().unwrap_or(&[]);
        debug!(
            "enumerating relative states: {} conjunct(s), {} free parameter(s)",
            cnf.conjuncts().len(),
            parameters.len()
        );
        RelativeStates {
            bindings: local_substitutions(universe, parameters),
            conjuncts: cnf.conjuncts().iter().cloned().collect(),
            grounded: Vec::new(),
            frames: Vec::new(),
            accumulator: RelativeState::new(),
            descending: true,
            active: false,
        }
    }

    /// Resume the depth-first search; true when the accumulator stands at a
    /// fresh leaf.
    fn advance(&mut self) -> bool {
        loop {
            if self.descending {
                let depth = self.frames.len();
                if depth == self.grounded.len() {
                    // Leaf: the caller clones the accumulator; the next
                    // advance call retreats.
                    self.descending = false;
                    return true;
                }
                if self.grounded[depth].is_empty() {
                    // Empty clause: unsatisfiable conjunct, retreat.
                    self.descending = false;
                    continue;
                }
                self.push_choice(0);
            } else {
                match self.frames.pop() {
                    None => return false,
                    Some(frame) => {
                        undo(&mut self.accumulator, frame.edit);
                        let depth = self.frames.len();
                        let next = frame.choice + 1;
                        if next < self.grounded[depth].len() {
                            self.push_choice(next);
                            self.descending = true;
                        }
                    }
                }
            }
        }
    }

    fn push_choice(&mut self, choice: usize) {
        let depth = self.frames.len();
        let literal = &self.grounded[depth][choice];
        let edit = commit(&mut self.accumulator, literal);
        self.frames.push(Frame { choice, edit });
    }
}

impl<'a> Iterator for RelativeStates<'a> {
    type Item = RelativeState;

    fn next(&mut self) -> Option<RelativeState> {
        loop {
            if self.active {
                if self.advance() {
                    return Some(self.accumulator.clone());
                }
                self.active = false;
            }

            let binding = self.bindings.next()?;
            let mut subst = Substitution::new();
            subst.push_scope(binding);
            self.grounded = self
                .conjuncts
                .iter()
                .map(|conjunct| {
                    conjunct
                        .literals()
                        .iter()
                        .map(|literal| literal.substitute(&subst))
                        .collect()
                })
                .collect();
            self.frames.clear();
            self.accumulator = RelativeState::new();
            self.descending = true;
            self.active = true;
        }
    }
}

/// Apply a literal's implied constraint to the accumulator, returning the
/// edit needed to reverse it. Shapes the relative-state model cannot
/// represent contribute no constraint.
fn commit(accumulator: &mut RelativeState, literal: &Literal) -> Edit {
    match literal {
        Literal::Predicate { atom, negated } => {
            debug_assert!(atom.is_ground(), "lifted literal committed: {}", atom);
            let was_asserted = accumulator.is_asserted(atom);
            let was_negated = accumulator.is_negated(atom);
            if *negated {
                accumulator.negate_predicate(atom.clone());
            } else {
                accumulator.assert_predicate(atom.clone());
            }
            Edit::Predicate {
                atom: atom.clone(),
                was_asserted,
                was_negated,
            }
        }

        Literal::Equals {
            left,
            right,
            negated: false,
        } => match assignment_shape(left, right) {
            Some((atom, value)) => {
                let prior = accumulator.object_value(&atom);
                accumulator.set_object(atom.clone(), value);
                Edit::Object { atom, prior }
            }
            None => Edit::None,
        },

        Literal::Compare {
            op: CompareOp::Eq,
            left,
            right,
            negated: false,
        } => match numeric_assignment_shape(left, right) {
            Some((atom, value)) => {
                let prior = accumulator.numeric_value(&atom);
                accumulator.set_numeric(atom.clone(), value);
                Edit::Numeric { atom, prior }
            }
            None => Edit::None,
        },

        // Negated assignments and general inequalities have no slot in the
        // relative-state model.
        Literal::Equals { .. } | Literal::Compare { .. } => Edit::None,
    }
}

fn undo(accumulator: &mut RelativeState, edit: Edit) {
    match edit {
        Edit::None => {}
        Edit::Predicate {
            atom,
            was_asserted,
            was_negated,
        } => {
            if was_asserted {
                accumulator.assert_predicate(atom);
            } else if was_negated {
                accumulator.negate_predicate(atom);
            } else {
                accumulator.clear_predicate(&atom);
            }
        }
        Edit::Object { atom, prior } => match prior {
            Some(value) => accumulator.set_object(atom, value),
            None => {
                accumulator.remove_object(&atom);
            }
        },
        Edit::Numeric { atom, prior } => match prior {
            Some(value) => accumulator.set_numeric(atom, value),
            None => {
                accumulator.remove_numeric(&atom);
            }
        },
    }
}

/// An equality of resolvable shape: a ground object-function atom against
/// an object constant, in either order.
fn assignment_shape(left: &Term, right: &Term) -> Option<(Atom, ObjectId)> {
    match (left, right) {
        (Term::Function(atom), Term::Object(object))
        | (Term::Object(object), Term::Function(atom)) => {
            if atom.is_ground() {
                Some((atom.as_ref().clone(), *object))
            } else {
                None
            }
        }
        _ => None,
    }
}

/// A numeric equality of resolvable shape: a ground fluent against a
/// constant, in either order.
fn numeric_assignment_shape(left: &NumericExpr, right: &NumericExpr) -> Option<(Atom, Number)> {
    match (left, right) {
        (NumericExpr::Function(atom), NumericExpr::Number(value))
        | (NumericExpr::Number(value), NumericExpr::Function(atom)) => {
            if atom.is_ground() {
                Some((atom.clone(), *value))
            } else {
                None
            }
        }
        _ => None,
    }
}

// =============================================================================
// CNF conditions -> concrete states
// =============================================================================

/// Iterator over the concrete states of a CNF conditions object.
pub struct ConditionsStates<'a> {
    relatives: RelativeStates<'a>,
    universe: &'a dyn Universe,
    current: Option<ConcreteStates>,
}

impl<'a> Iterator for ConditionsStates<'a> {
    type Item = State;

    fn next(&mut self) -> Option<State> {
        loop {
            if let Some(inner) = self.current.as_mut() {
                if let Some(state) = inner.next() {
                    return Some(state);
                }
            }
            let relative = self.relatives.next()?;
            self.current = Some(ConcreteStates::new(&relative, self.universe));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ground::ObjectFunctionRange;
    use crate::logic::interner::{ObjectId, PredicateId, TypeId};
    use crate::logic::{PredicateSymbol, Term};

    struct FixedUniverse {
        objects: Vec<ObjectId>,
        predicates: Vec<Atom>,
        functions: Vec<ObjectFunctionRange>,
    }

    impl Universe for FixedUniverse {
        fn objects_of_type(&self, _ty: TypeId) -> &[ObjectId] {
            &self.objects
        }

        fn grounded_predicates(&self) -> &[Atom] {
            &self.predicates
        }

        fn grounded_object_functions(&self) -> &[ObjectFunctionRange] {
            &self.functions
        }
    }

    fn atom(pred: u32, object: u32) -> Atom {
        Atom::predicate(
            PredicateSymbol::new(PredicateId(pred), 1),
            vec![Term::Object(ObjectId(object))],
        )
    }

    fn three_predicate_universe() -> FixedUniverse {
        FixedUniverse {
            objects: vec![ObjectId(0)],
            predicates: vec![atom(0, 0), atom(1, 0), atom(2, 0)],
            functions: vec![],
        }
    }

    #[test]
    fn test_unconstrained_predicates_branch_both_ways() {
        let universe = three_predicate_universe();
        let mut relative = RelativeState::new();
        relative.assert_predicate(atom(0, 0));
        relative.negate_predicate(atom(1, 0));

        // One unconstrained predicate: exactly two states.
        let states: Vec<State> = concrete_states(&relative, &universe).collect();
        assert_eq!(states.len(), 2);
        for state in &states {
            assert!(state.holds(&atom(0, 0)));
            assert!(!state.holds(&atom(1, 0)));
            assert!(relative.holds_in(state));
        }
        assert_ne!(states[0], states[1]);
    }

    #[test]
    fn test_fully_unconstrained_yields_power_set() {
        let universe = three_predicate_universe();
        let relative = RelativeState::new();
        let states: Vec<State> = concrete_states(&relative, &universe).collect();
        assert_eq!(states.len(), 8);
        // All distinct.
        for i in 0..states.len() {
            for j in (i + 1)..states.len() {
                assert_ne!(states[i], states[j]);
            }
        }
    }

    #[test]
    fn test_object_function_branches_over_range() {
        let universe = FixedUniverse {
            objects: vec![ObjectId(0), ObjectId(1)],
            predicates: vec![],
            functions: vec![ObjectFunctionRange {
                atom: Atom::function(
                    crate::logic::FunctionSymbol::new(crate::logic::interner::FunctionId(0), 0),
                    vec![],
                ),
                values: vec![ObjectId(0), ObjectId(1)],
            }],
        };
        let relative = RelativeState::new();
        let states: Vec<State> = concrete_states(&relative, &universe).collect();
        assert_eq!(states.len(), 2);
    }

    #[test]
    fn test_clause_branches_once_per_literal() {
        let universe = FixedUniverse {
            objects: vec![],
            predicates: vec![],
            functions: vec![],
        };
        let cnf = ConditionsCnf::ground(vec![Conjunct::Clause(crate::logic::Clause::new(
            vec![
                Literal::predicate(atom(0, 0), false),
                Literal::predicate(atom(1, 0), false),
            ],
        ))]);

        let relatives: Vec<RelativeState> = relative_states(&cnf, &universe).collect();
        assert_eq!(relatives.len(), 2);
        // Each branch commits a different literal.
        assert!(relatives.iter().any(|r| r.is_asserted(&atom(0, 0))));
        assert!(relatives.iter().any(|r| r.is_asserted(&atom(1, 0))));
    }

    #[test]
    fn test_negated_literal_commits_negation() {
        let universe = FixedUniverse {
            objects: vec![],
            predicates: vec![],
            functions: vec![],
        };
        let cnf = ConditionsCnf::ground(vec![
            Conjunct::Literal(Literal::predicate(atom(0, 0), false)),
            Conjunct::Literal(Literal::predicate(atom(1, 0), true)),
        ]);

        let relatives: Vec<RelativeState> = relative_states(&cnf, &universe).collect();
        assert_eq!(relatives.len(), 1);
        assert!(relatives[0].is_asserted(&atom(0, 0)));
        assert!(relatives[0].is_negated(&atom(1, 0)));
    }

    #[test]
    fn test_backtracking_undoes_commits() {
        let universe = FixedUniverse {
            objects: vec![],
            predicates: vec![],
            functions: vec![],
        };
        // Two clauses: 2 x 2 = 4 branches; the accumulator must be clean
        // between branches for all four to come out right.
        let cnf = ConditionsCnf::ground(vec![
            Conjunct::Clause(crate::logic::Clause::new(vec![
                Literal::predicate(atom(0, 0), false),
                Literal::predicate(atom(1, 0), false),
            ])),
            Conjunct::Clause(crate::logic::Clause::new(vec![
                Literal::predicate(atom(2, 0), false),
                Literal::predicate(atom(3, 0), false),
            ])),
        ]);

        let relatives: Vec<RelativeState> = relative_states(&cnf, &universe).collect();
        assert_eq!(relatives.len(), 4);
        for relative in &relatives {
            let asserted_first = relative.is_asserted(&atom(0, 0)) || relative.is_asserted(&atom(1, 0));
            let asserted_second =
                relative.is_asserted(&atom(2, 0)) || relative.is_asserted(&atom(3, 0));
            assert!(asserted_first && asserted_second);
        }
    }

    #[test]
    fn test_empty_cnf_yields_unconstrained_relative_state() {
        let universe = FixedUniverse {
            objects: vec![],
            predicates: vec![],
            functions: vec![],
        };
        let cnf = ConditionsCnf::ground(vec![]);
        let relatives: Vec<RelativeState> = relative_states(&cnf, &universe).collect();
        assert_eq!(relatives.len(), 1);
        assert_eq!(relatives[0], RelativeState::new());
    }

    #[test]
    fn test_conditions_to_concrete_states() {
        let universe = FixedUniverse {
            objects: vec![ObjectId(0)],
            predicates: vec![atom(0, 0), atom(1, 0)],
            functions: vec![],
        };
        let cnf = ConditionsCnf::ground(vec![Conjunct::Literal(Literal::predicate(
            atom(0, 0),
            false,
        ))]);

        // P(0) forced true, P(1) unconstrained: two concrete states.
        let states: Vec<State> = concrete_states_for_conditions(&cnf, &universe).collect();
        assert_eq!(states.len(), 2);
        assert!(states.iter().all(|s| s.holds(&atom(0, 0))));
    }

    #[test]
    fn test_equality_literal_fixes_function_value() {
        let universe = FixedUniverse {
            objects: vec![],
            predicates: vec![],
            functions: vec![],
        };
        let fluent = Atom::function(
            crate::logic::FunctionSymbol::new(crate::logic::interner::FunctionId(0), 0),
            vec![],
        );
        let cnf = ConditionsCnf::ground(vec![Conjunct::Literal(Literal::equals(
            Term::Function(Box::new(fluent.clone())),
            Term::Object(ObjectId(1)),
            false,
        ))]);

        let relatives: Vec<RelativeState> = relative_states(&cnf, &universe).collect();
        assert_eq!(relatives.len(), 1);
        assert_eq!(relatives[0].object_value(&fluent), Some(ObjectId(1)));
    }
}
