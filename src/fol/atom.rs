//! Atoms: equalities and applied predicates

use super::signature::{PredicateSymbol, Signature};
use super::term::{Term, Var};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// The payload of an atom node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AtomData {
    /// Equality between two terms. First-class, not an interned predicate.
    Equality(Term, Term),
    /// A predicate symbol applied to arguments
    Predicate(PredicateSymbol, Vec<Term>),
}

/// An atom handle with shared immutable structure.
///
/// Same identity discipline as [`Term`]: `==` is structural,
/// [`Atom::is_same`] is pointer identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Atom(Rc<AtomData>);

impl Atom {
    pub fn equality(lhs: Term, rhs: Term) -> Atom {
        Atom(Rc::new(AtomData::Equality(lhs, rhs)))
    }

    pub fn predicate(p: PredicateSymbol, args: Vec<Term>) -> Atom {
        debug_assert_eq!(p.arity as usize, args.len());
        Atom(Rc::new(AtomData::Predicate(p, args)))
    }

    pub fn data(&self) -> &AtomData {
        &self.0
    }

    pub fn is_same(&self, other: &Atom) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn is_equality(&self) -> bool {
        matches!(self.data(), AtomData::Equality(_, _))
    }

    pub fn predicate_symbol(&self) -> Option<PredicateSymbol> {
        match self.data() {
            AtomData::Predicate(p, _) => Some(*p),
            AtomData::Equality(_, _) => None,
        }
    }

    pub fn sides(&self) -> Option<(&Term, &Term)> {
        match self.data() {
            AtomData::Equality(l, r) => Some((l, r)),
            AtomData::Predicate(_, _) => None,
        }
    }

    pub fn for_each_term(&self, f: &mut impl FnMut(&Term)) {
        match self.data() {
            AtomData::Equality(l, r) => {
                f(l);
                f(r);
            }
            AtomData::Predicate(_, args) => {
                for t in args {
                    f(t);
                }
            }
        }
    }

    pub fn collect_vars(&self, out: &mut Vec<Var>) {
        self.for_each_term(&mut |t| t.collect_vars(out));
    }

    pub(crate) fn mark_vars(&self, occ: &mut [bool]) {
        self.for_each_term(&mut |t| t.mark_vars(occ));
    }

    pub fn contains_var(&self, v: Var) -> bool {
        match self.data() {
            AtomData::Equality(l, r) => l.contains_var(v) || r.contains_var(v),
            AtomData::Predicate(_, args) => args.iter().any(|t| t.contains_var(v)),
        }
    }

    /// All arguments are variables; the shape required of a predicate
    /// definition head.
    pub fn is_flat(&self) -> bool {
        match self.data() {
            AtomData::Equality(_, _) => false,
            AtomData::Predicate(_, args) => args.iter().all(Term::is_var),
        }
    }

    /// An equality of the form t = t
    pub fn is_reflexive(&self) -> bool {
        match self.data() {
            AtomData::Equality(l, r) => l == r,
            AtomData::Predicate(_, _) => false,
        }
    }

    /// The two atoms are equalities with swapped sides
    pub fn is_swap_of(&self, other: &Atom) -> bool {
        match (self.data(), other.data()) {
            (AtomData::Equality(l1, r1), AtomData::Equality(l2, r2)) => {
                l1 == r2 && r1 == l2
            }
            _ => false,
        }
    }

    /// The three atoms form a transitivity step: the premises chain through
    /// a middle term to the conclusion, each equality taken up to
    /// orientation.
    pub fn transitivity_of(first: &Atom, second: &Atom, conclusion: &Atom) -> bool {
        let (Some(p1), Some(p2), Some(c)) =
            (first.sides(), second.sides(), conclusion.sides())
        else {
            return false;
        };
        // a reflexive link degenerates the chain
        if first.is_reflexive() || second.is_reflexive() || conclusion.is_reflexive() {
            return false;
        }
        let orientations = |(l, r): (&Term, &Term)| [(l.clone(), r.clone()), (r.clone(), l.clone())];
        for (a, b) in orientations(p1) {
            for (c1, d) in orientations(p2) {
                for (e, f) in orientations(c) {
                    if a == e && b == c1 && d == f {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// `premise` is an equality between two distinct variables x and y, and
    /// `conclusion` is an equality between two distinct terms that are equal
    /// up to swapping x and y.
    pub fn function_congruence_of(premise: &Atom, conclusion: &Atom) -> bool {
        let Some((x, y)) = premise.variable_sides() else {
            return false;
        };
        match conclusion.data() {
            AtomData::Equality(l, r) => l != r && l.equal_up_to(r, x, y),
            AtomData::Predicate(_, _) => false,
        }
    }

    /// `premise` is an equality between distinct variables x and y, and
    /// `from`/`to` are two distinct applications of the same predicate equal
    /// up to swapping x and y.
    pub fn predicate_congruence_of(premise: &Atom, from: &Atom, to: &Atom) -> bool {
        let Some((x, y)) = premise.variable_sides() else {
            return false;
        };
        match (from.data(), to.data()) {
            (AtomData::Predicate(p, pargs), AtomData::Predicate(q, qargs)) => {
                p == q
                    && from != to
                    && pargs
                        .iter()
                        .zip(qargs.iter())
                        .all(|(s, t)| s.equal_up_to(t, x, y))
            }
            _ => false,
        }
    }

    /// An equality between two distinct variables
    fn variable_sides(&self) -> Option<(Var, Var)> {
        match self.data() {
            AtomData::Equality(l, r) => match (l.as_var(), r.as_var()) {
                (Some(x), Some(y)) if x != y => Some((x, y)),
                _ => None,
            },
            AtomData::Predicate(_, _) => None,
        }
    }

    /// If this atom is a function definition, return `(lhs, rhs)` with the
    /// defined side first, reordering if the input had it on the right.
    pub fn as_definition(&self) -> Option<(Term, Term)> {
        let (l, r) = self.sides()?;
        if l.is_var() || r.is_var() {
            return None;
        }
        if l.defines(r).is_some() {
            Some((l.clone(), r.clone()))
        } else if r.defines(l).is_some() {
            Some((r.clone(), l.clone()))
        } else {
            None
        }
    }

    pub fn display<'a>(&'a self, signature: &'a Signature) -> AtomDisplay<'a> {
        AtomDisplay {
            atom: self,
            signature,
        }
    }
}

/// Helper for displaying atoms with resolved names
pub struct AtomDisplay<'a> {
    atom: &'a Atom,
    signature: &'a Signature,
}

impl fmt::Display for AtomDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.atom.data() {
            AtomData::Equality(l, r) => write!(
                f,
                "{} = {}",
                l.display(self.signature),
                r.display(self.signature)
            ),
            AtomData::Predicate(p, args) => {
                write!(f, "{}", self.signature.predicate_name(p.id))?;
                if !args.is_empty() {
                    write!(f, "(")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ",")?;
                        }
                        write!(f, "{}", arg.display(self.signature))?;
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}
