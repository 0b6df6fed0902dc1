//! Variable substitutions with scoped quantifier bindings
//!
//! A substitution maps parameter variables to concrete objects. Action
//! parameters live in the global scope; each quantifier evaluation pushes one
//! local scope for its own parameters and pops it afterwards. Lookup walks
//! local scopes innermost-first before falling back to the global scope, so
//! quantifier parameters shadow same-id outer bindings.

use super::atom::Atom;
use super::interner::{ObjectId, VariableId};
use super::term::Term;
use indexmap::IndexSet;
use std::collections::HashMap;

/// A partial mapping from variable ids to object ids.
#[derive(Debug, Clone, Default)]
pub struct Substitution {
    global: HashMap<VariableId, ObjectId>,
    locals: Vec<HashMap<VariableId, ObjectId>>,
}

impl Substitution {
    /// Create a new empty substitution
    pub fn new() -> Self {
        Substitution::default()
    }

    /// Create a substitution with the given global bindings.
    pub fn from_global<I>(bindings: I) -> Self
    where
        I: IntoIterator<Item = (VariableId, ObjectId)>,
    {
        Substitution {
            global: bindings.into_iter().collect(),
            locals: Vec::new(),
        }
    }

    /// Bind a variable in the global (problem-level) scope.
    pub fn bind(&mut self, var: VariableId, object: ObjectId) {
        self.global.insert(var, object);
    }

    /// Push a local scope with the given bindings (quantifier entry).
    pub fn push_scope(&mut self, bindings: HashMap<VariableId, ObjectId>) {
        self.locals.push(bindings);
    }

    /// Pop the innermost local scope (quantifier exit).
    ///
    /// Panics if no local scope is active; push and pop calls must pair up.
    pub fn pop_scope(&mut self) {
        self.locals
            .pop()
            .expect("pop_scope without matching push_scope");
    }

    /// Resolve a variable, innermost local scope first, then global.
    pub fn resolve(&self, var: VariableId) -> Option<ObjectId> {
        for scope in self.locals.iter().rev() {
            if let Some(&object) = scope.get(&var) {
                return Some(object);
            }
        }
        self.global.get(&var).copied()
    }

    /// Check whether a variable is bound in any scope.
    pub fn contains(&self, var: VariableId) -> bool {
        self.resolve(var).is_some()
    }

    /// Number of active local scopes.
    pub fn scope_depth(&self) -> usize {
        self.locals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.locals.iter().all(HashMap::is_empty)
    }
}

impl Term {
    /// Apply a substitution to this term, replacing every bound variable
    /// with its object and recursing into nested function arguments.
    pub fn substitute(&self, subst: &Substitution) -> Term {
        self.substitute_masked(subst, &IndexSet::new())
    }

    pub(crate) fn substitute_masked(
        &self,
        subst: &Substitution,
        masked: &IndexSet<VariableId>,
    ) -> Term {
        match self {
            Term::Object(_) => self.clone(),
            Term::Variable(v) => {
                if masked.contains(v) {
                    self.clone()
                } else {
                    match subst.resolve(*v) {
                        Some(object) => Term::Object(object),
                        None => self.clone(),
                    }
                }
            }
            Term::Function(atom) => Term::Function(Box::new(atom.substitute_masked(subst, masked))),
        }
    }
}

impl Atom {
    /// Apply a substitution to all argument terms.
    pub fn substitute(&self, subst: &Substitution) -> Atom {
        self.substitute_masked(subst, &IndexSet::new())
    }

    pub(crate) fn substitute_masked(
        &self,
        subst: &Substitution,
        masked: &IndexSet<VariableId>,
    ) -> Atom {
        Atom {
            head: self.head,
            args: self
                .args
                .iter()
                .map(|arg| arg.substitute_masked(subst, masked))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(id: u32) -> VariableId {
        VariableId::new(id)
    }

    fn obj(id: u32) -> ObjectId {
        ObjectId(id)
    }

    #[test]
    fn test_global_binding() {
        let mut subst = Substitution::new();
        subst.bind(var(0), obj(3));
        assert_eq!(subst.resolve(var(0)), Some(obj(3)));
        assert_eq!(subst.resolve(var(1)), None);
    }

    #[test]
    fn test_local_scope_shadows_global() {
        let mut subst = Substitution::new();
        subst.bind(var(0), obj(1));

        let mut scope = HashMap::new();
        scope.insert(var(0), obj(2));
        subst.push_scope(scope);
        assert_eq!(subst.resolve(var(0)), Some(obj(2)));

        subst.pop_scope();
        assert_eq!(subst.resolve(var(0)), Some(obj(1)));
    }

    #[test]
    fn test_inner_scope_wins() {
        let mut subst = Substitution::new();

        let mut outer = HashMap::new();
        outer.insert(var(5), obj(0));
        subst.push_scope(outer);

        let mut inner = HashMap::new();
        inner.insert(var(5), obj(9));
        subst.push_scope(inner);

        assert_eq!(subst.resolve(var(5)), Some(obj(9)));
        subst.pop_scope();
        assert_eq!(subst.resolve(var(5)), Some(obj(0)));
        subst.pop_scope();
        assert_eq!(subst.resolve(var(5)), None);
    }

    #[test]
    #[should_panic(expected = "pop_scope without matching push_scope")]
    fn test_unbalanced_pop_panics() {
        let mut subst = Substitution::new();
        subst.pop_scope();
    }

    #[test]
    fn test_term_substitution_recurses_into_functions() {
        use crate::logic::atom::FunctionSymbol;
        use crate::logic::interner::FunctionId;

        let mut subst = Substitution::new();
        subst.bind(var(0), obj(7));

        // (loc ?0) with ?0 bound to o7
        let inner = Atom::function(
            FunctionSymbol::new(FunctionId(0), 1),
            vec![Term::Variable(var(0))],
        );
        let term = Term::Function(Box::new(inner));

        let expected = Term::Function(Box::new(Atom::function(
            FunctionSymbol::new(FunctionId(0), 1),
            vec![Term::Object(obj(7))],
        )));
        assert_eq!(term.substitute(&subst), expected);
    }
}
