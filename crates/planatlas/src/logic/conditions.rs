//! Literals, clauses, and the conjunctive-normal-form conditions model
//!
//! CNF has no standalone negation node: every literal carries its own
//! `negated` flag. Clauses are canonically ordered, deduplicated literal
//! sets, and a `ConditionsCnf` is a deduplicated set of conjuncts plus the
//! parameters still occurring free in its literals.

use super::atom::Atom;
use super::expression::{CompareOp, Expression, NumericExpr, Parameter};
use super::interner::{Interner, VariableId};
use super::substitution::Substitution;
use super::term::Term;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::fmt;

/// A CNF literal: a primitive condition with an explicit negation flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Literal {
    Predicate {
        atom: Atom,
        negated: bool,
    },
    Equals {
        left: Term,
        right: Term,
        negated: bool,
    },
    Compare {
        op: CompareOp,
        left: NumericExpr,
        right: NumericExpr,
        negated: bool,
    },
}

impl Literal {
    pub fn predicate(atom: Atom, negated: bool) -> Self {
        Literal::Predicate { atom, negated }
    }

    pub fn equals(left: Term, right: Term, negated: bool) -> Self {
        Literal::Equals {
            left,
            right,
            negated,
        }
    }

    pub fn compare(op: CompareOp, left: NumericExpr, right: NumericExpr, negated: bool) -> Self {
        Literal::Compare {
            op,
            left,
            right,
            negated,
        }
    }

    pub fn is_negated(&self) -> bool {
        match self {
            Literal::Predicate { negated, .. }
            | Literal::Equals { negated, .. }
            | Literal::Compare { negated, .. } => *negated,
        }
    }

    /// Collect all variable ids occurring in this literal, including inside
    /// nested object-function terms.
    pub fn collect_variables(&self, vars: &mut IndexSet<VariableId>) {
        match self {
            Literal::Predicate { atom, .. } => atom.collect_variables(vars),
            Literal::Equals { left, right, .. } => {
                left.collect_variables(vars);
                right.collect_variables(vars);
            }
            Literal::Compare { left, right, .. } => {
                left.collect_variables(vars);
                right.collect_variables(vars);
            }
        }
    }

    /// Apply a substitution to every term of this literal.
    pub fn substitute(&self, subst: &Substitution) -> Literal {
        match self {
            Literal::Predicate { atom, negated } => Literal::Predicate {
                atom: atom.substitute(subst),
                negated: *negated,
            },
            Literal::Equals {
                left,
                right,
                negated,
            } => Literal::Equals {
                left: left.substitute(subst),
                right: right.substitute(subst),
                negated: *negated,
            },
            Literal::Compare {
                op,
                left,
                right,
                negated,
            } => Literal::Compare {
                op: *op,
                left: left.substitute(subst),
                right: right.substitute(subst),
                negated: *negated,
            },
        }
    }

    /// Rebuild the expression form of this literal.
    pub fn to_expression(&self) -> Expression {
        let positive = match self {
            Literal::Predicate { atom, .. } => Expression::Predicate(atom.clone()),
            Literal::Equals { left, right, .. } => {
                Expression::Equals(left.clone(), right.clone())
            }
            Literal::Compare {
                op, left, right, ..
            } => Expression::Compare(*op, left.clone(), right.clone()),
        };
        if self.is_negated() {
            Expression::Not(Box::new(positive))
        } else {
            positive
        }
    }

    /// Format this literal with an interner for name resolution
    pub fn display<'a>(&'a self, interner: &'a Interner) -> LiteralDisplay<'a> {
        LiteralDisplay {
            literal: self,
            interner,
        }
    }
}

/// A clause: a disjunction of literals with set semantics.
///
/// The literal list is sorted and deduplicated at construction, so equality
/// and hashing are order-independent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    /// Create a clause, canonicalizing the literal set.
    pub fn new(mut literals: Vec<Literal>) -> Self {
        literals.sort_unstable();
        literals.dedup();
        Clause { literals }
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// An empty clause is an unsatisfiable disjunction.
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Collect all variable ids occurring in any literal.
    pub fn collect_variables(&self, vars: &mut IndexSet<VariableId>) {
        for literal in &self.literals {
            literal.collect_variables(vars);
        }
    }
}

/// One top-level conjunct of a CNF conditions object: a clause or a bare
/// literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Conjunct {
    Literal(Literal),
    Clause(Clause),
}

impl Conjunct {
    /// Normalize a clause conjunct: single-literal clauses collapse to bare
    /// literals.
    pub fn from_clause(clause: Clause) -> Self {
        if clause.len() == 1 {
            Conjunct::Literal(clause.literals[0].clone())
        } else {
            Conjunct::Clause(clause)
        }
    }

    pub fn collect_variables(&self, vars: &mut IndexSet<VariableId>) {
        match self {
            Conjunct::Literal(literal) => literal.collect_variables(vars),
            Conjunct::Clause(clause) => clause.collect_variables(vars),
        }
    }

    /// The literals of this conjunct, as a disjunction.
    pub fn literals(&self) -> &[Literal] {
        match self {
            Conjunct::Literal(literal) => std::slice::from_ref(literal),
            Conjunct::Clause(clause) => clause.literals(),
        }
    }
}

/// Conditions in conjunctive normal form: a deduplicated set of conjuncts
/// plus the parameters still occurring free in the literals.
///
/// `parameters` is `Some` exactly while the object remains partially lifted;
/// it is forced to `None` once the last free parameter is eliminated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionsCnf {
    conjuncts: IndexSet<Conjunct>,
    parameters: Option<Vec<Parameter>>,
}

impl ConditionsCnf {
    /// Build a CNF conditions object, enforcing the free-parameter invariant:
    /// the stored list holds exactly the declared parameters whose variable
    /// still occurs in some literal.
    ///
    /// Panics if a literal mentions a variable with no declared parameter;
    /// that indicates a desynchronized renaming or grounding upstream.
    pub fn new<C, P>(conjuncts: C, parameters: P) -> Self
    where
        C: IntoIterator<Item = Conjunct>,
        P: IntoIterator<Item = Parameter>,
    {
        let conjuncts: IndexSet<Conjunct> = conjuncts
            .into_iter()
            .map(|conjunct| match conjunct {
                Conjunct::Clause(clause) => Conjunct::from_clause(clause),
                literal => literal,
            })
            .collect();

        let mut free = IndexSet::new();
        for conjunct in &conjuncts {
            conjunct.collect_variables(&mut free);
        }

        let declared: Vec<Parameter> = parameters.into_iter().collect();
        let retained: Vec<Parameter> = declared
            .iter()
            .filter(|p| free.contains(&p.variable))
            .copied()
            .collect();

        for variable in &free {
            assert!(
                declared.iter().any(|p| p.variable == *variable),
                "free variable {} has no declared parameter",
                variable
            );
        }

        let parameters = if retained.is_empty() {
            None
        } else {
            Some(retained)
        };

        ConditionsCnf {
            conjuncts,
            parameters,
        }
    }

    /// Build a fully ground CNF (no free parameters allowed).
    pub fn ground<C>(conjuncts: C) -> Self
    where
        C: IntoIterator<Item = Conjunct>,
    {
        Self::new(conjuncts, std::iter::empty())
    }

    pub fn conjuncts(&self) -> &IndexSet<Conjunct> {
        &self.conjuncts
    }

    /// The still-free parameters, if any remain.
    pub fn parameters(&self) -> Option<&[Parameter]> {
        self.parameters.as_deref()
    }

    pub fn is_ground(&self) -> bool {
        self.parameters.is_none()
    }

    /// Rebuild an expression tree equivalent to this CNF.
    pub fn to_expression(&self) -> Expression {
        Expression::And(
            self.conjuncts
                .iter()
                .map(|conjunct| match conjunct {
                    Conjunct::Literal(literal) => literal.to_expression(),
                    Conjunct::Clause(clause) => Expression::Or(
                        clause
                            .literals()
                            .iter()
                            .map(Literal::to_expression)
                            .collect(),
                    ),
                })
                .collect(),
        )
    }
}

/// A lifted conditions object: typed parameters plus an expression tree,
/// with the CNF form computed lazily on first request and cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conditions {
    parameters: Vec<Parameter>,
    expression: Expression,
    #[serde(skip)]
    cnf: OnceCell<ConditionsCnf>,
}

impl Conditions {
    /// Create a conditions object.
    ///
    /// Panics on duplicate parameter ids; the validation stage guarantees
    /// well-formed parameter lists, so a duplicate here is a programmer
    /// error.
    pub fn new(parameters: Vec<Parameter>, expression: Expression) -> Self {
        let mut seen = IndexSet::new();
        for parameter in &parameters {
            assert!(
                seen.insert(parameter.variable),
                "duplicate parameter {} in conditions",
                parameter.variable
            );
        }
        Conditions {
            parameters,
            expression,
            cnf: OnceCell::new(),
        }
    }

    /// A ground conditions object with no parameters.
    pub fn closed(expression: Expression) -> Self {
        Conditions::new(Vec::new(), expression)
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub(crate) fn cnf_cache(&self) -> &OnceCell<ConditionsCnf> {
        &self.cnf
    }
}

impl PartialEq for Conditions {
    fn eq(&self, other: &Self) -> bool {
        // The CNF cache is derived data and does not participate in equality.
        self.parameters == other.parameters && self.expression == other.expression
    }
}

impl Eq for Conditions {}

/// Display wrapper for Literal that includes an interner for name resolution
pub struct LiteralDisplay<'a> {
    literal: &'a Literal,
    interner: &'a Interner,
}

impl<'a> fmt::Display for LiteralDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.literal.is_negated() {
            write!(f, "~")?;
        }
        match self.literal {
            Literal::Predicate { atom, .. } => write!(f, "{}", atom.display(self.interner)),
            Literal::Equals { left, right, .. } => write!(
                f,
                "(= {} {})",
                left.display(self.interner),
                right.display(self.interner)
            ),
            Literal::Compare { op, .. } => write!(f, "(compare {:?} ..)", op),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negated() {
            write!(f, "~")?;
        }
        match self {
            Literal::Predicate { atom, .. } => write!(f, "{}", atom),
            Literal::Equals { left, right, .. } => write!(f, "(= {} {})", left, right),
            Literal::Compare { op, .. } => write!(f, "(compare {:?} ..)", op),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, literal) in self.literals.iter().enumerate() {
            if i > 0 {
                write!(f, " ∨ ")?;
            }
            write!(f, "{}", literal)?;
        }
        Ok(())
    }
}
