//! Variable bindings with stack discipline

use super::atom::{Atom, AtomData};
use super::term::{Term, TermData, Var};
use std::ops::{Deref, DerefMut};

/// An ordered stack of variable bindings.
///
/// Lookups scan newest-first, so rebinding a variable shadows the older
/// binding until it is undone. Callers only undo bindings they introduced.
#[derive(Debug, Clone, Default)]
pub struct Substitution {
    bindings: Vec<(Var, Term)>,
}

impl Substitution {
    pub fn new() -> Self {
        Substitution::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn bind(&mut self, v: Var, t: Term) {
        self.bindings.push((v, t));
    }

    /// The newest binding for `v`, if any
    pub fn bound(&self, v: Var) -> Option<&Term> {
        self.bindings
            .iter()
            .rev()
            .find(|(w, _)| *w == v)
            .map(|(_, t)| t)
    }

    /// Remove the newest binding for `v`.
    ///
    /// Panics when no binding exists: undoing a binding that was never made
    /// is a bug in the caller.
    pub fn undo_binding(&mut self, v: Var) {
        let pos = self
            .bindings
            .iter()
            .rposition(|(w, _)| *w == v)
            .unwrap_or_else(|| panic!("undo of unbound variable {}", v));
        self.bindings.remove(pos);
    }

    /// A guard that undoes every binding made through it when dropped.
    ///
    /// Only valid when nothing outside the guard's lifetime needs bindings
    /// made inside it.
    pub fn scope(&mut self) -> Scope<'_> {
        let mark = self.bindings.len();
        Scope { subst: self, mark }
    }

    /// The bound variables, oldest binding first
    pub fn domain(&self) -> Vec<Var> {
        self.bindings.iter().map(|(v, _)| *v).collect()
    }

    /// The bound terms, oldest binding first
    pub fn range(&self) -> Vec<Term> {
        self.bindings.iter().map(|(_, t)| t.clone()).collect()
    }
}

/// Drop guard over a [`Substitution`]; see [`Substitution::scope`]
pub struct Scope<'a> {
    subst: &'a mut Substitution,
    mark: usize,
}

impl Deref for Scope<'_> {
    type Target = Substitution;

    fn deref(&self) -> &Substitution {
        self.subst
    }
}

impl DerefMut for Scope<'_> {
    fn deref_mut(&mut self) -> &mut Substitution {
        self.subst
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.subst.bindings.truncate(self.mark);
    }
}

impl Term {
    /// Apply the substitution, returning the original handle when nothing
    /// changed. Bound terms are inserted as-is, without re-substitution.
    pub fn apply(&self, subst: &Substitution) -> Term {
        match self.data() {
            TermData::Var(v) => match subst.bound(*v) {
                Some(t) => t.clone(),
                None => self.clone(),
            },
            TermData::Int(_) => self.clone(),
            TermData::Compound(f, args) => {
                let new_args: Vec<Term> = args.iter().map(|t| t.apply(subst)).collect();
                if new_args.iter().zip(args.iter()).all(|(a, b)| a.is_same(b)) {
                    self.clone()
                } else {
                    Term::compound(*f, new_args)
                }
            }
        }
    }
}

impl Atom {
    /// Apply the substitution, returning the original handle when nothing
    /// changed
    pub fn apply(&self, subst: &Substitution) -> Atom {
        match self.data() {
            AtomData::Equality(l, r) => {
                let nl = l.apply(subst);
                let nr = r.apply(subst);
                if nl.is_same(l) && nr.is_same(r) {
                    self.clone()
                } else {
                    Atom::equality(nl, nr)
                }
            }
            AtomData::Predicate(p, args) => {
                let new_args: Vec<Term> = args.iter().map(|t| t.apply(subst)).collect();
                if new_args.iter().zip(args.iter()).all(|(a, b)| a.is_same(b)) {
                    self.clone()
                } else {
                    Atom::predicate(*p, new_args)
                }
            }
        }
    }
}
