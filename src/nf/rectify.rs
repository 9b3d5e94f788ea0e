//! Rectification: renaming apart of all bound variables
//!
//! After rectification no two quantifiers bind the same variable, no
//! variable is both free and bound, and all variables form a contiguous
//! range starting at [`Var::FIRST`]. Free variables are renamed on first
//! sight and the formula is closed with an outermost universal quantifier.

use crate::fol::{Atom, AtomData, Formula, FormulaData, Substitution, Term, TermData, Var};

/// Renamed free variables of a conjecture, kept for answer-literal
/// construction: `original[i]` was renamed to the term `renamed[i]`.
#[derive(Debug, Clone)]
pub struct AnswerBinding {
    pub original: Vec<Var>,
    pub renamed: Vec<Term>,
}

/// Rectify and close: free variables are universally quantified on top
pub fn rectify(f: &Formula) -> Formula {
    let mut r = Rectifier::new();
    let g = r.formula(f);
    r.close(g)
}

/// Rectify without closing; the renamed free variables are returned in
/// first-seen order
pub fn rectify_open(f: &Formula) -> (Formula, Vec<Var>) {
    let mut r = Rectifier::new();
    let g = r.formula(f);
    (g, r.free)
}

/// Rectify and close, also reporting the free-variable renaming
pub fn rectify_with_answer(f: &Formula) -> (Formula, AnswerBinding) {
    let mut r = Rectifier::new();
    let g = r.formula(f);
    let binding = AnswerBinding {
        original: r.subst.domain(),
        renamed: r.subst.range(),
    };
    (r.close(g), binding)
}

struct Rectifier {
    subst: Substitution,
    next: Var,
    /// renamed free variables, first-seen order
    free: Vec<Var>,
}

impl Rectifier {
    fn new() -> Self {
        Rectifier {
            subst: Substitution::new(),
            next: Var::FIRST,
            free: Vec::new(),
        }
    }

    fn fresh(&mut self) -> Var {
        let v = self.next;
        self.next = v.next();
        v
    }

    fn close(&self, f: Formula) -> Formula {
        if self.free.is_empty() {
            f
        } else {
            Formula::forall(self.free.clone(), f)
        }
    }

    fn formula(&mut self, f: &Formula) -> Formula {
        match f.data() {
            FormulaData::Atom(a) => {
                let na = self.atom(a);
                if na.is_same(a) {
                    f.clone()
                } else {
                    Formula::atom(na)
                }
            }
            FormulaData::And(args) | FormulaData::Or(args) => {
                let new_args: Vec<Formula> = args.iter().map(|g| self.formula(g)).collect();
                if new_args.iter().zip(args.iter()).all(|(a, b)| a.is_same(b)) {
                    f.clone()
                } else {
                    match f.data() {
                        FormulaData::And(_) => Formula::and(new_args),
                        _ => Formula::or(new_args),
                    }
                }
            }
            FormulaData::Imp(l, r) | FormulaData::Iff(l, r) | FormulaData::Xor(l, r) => {
                let nl = self.formula(l);
                let nr = self.formula(r);
                if nl.is_same(l) && nr.is_same(r) {
                    f.clone()
                } else {
                    match f.data() {
                        FormulaData::Imp(_, _) => Formula::imp(nl, nr),
                        FormulaData::Iff(_, _) => Formula::iff(nl, nr),
                        _ => Formula::xor(nl, nr),
                    }
                }
            }
            FormulaData::Not(g) => {
                let ng = self.formula(g);
                if ng.is_same(g) {
                    f.clone()
                } else {
                    Formula::not(ng)
                }
            }
            FormulaData::Forall(vs, body) | FormulaData::Exists(vs, body) => {
                let mut new_vars = Vec::with_capacity(vs.len());
                for &v in vs {
                    let w = self.fresh();
                    self.subst.bind(v, Term::var(w));
                    new_vars.push(w);
                }
                let new_body = self.formula(body);
                for &v in vs {
                    self.subst.undo_binding(v);
                }
                match f.data() {
                    FormulaData::Forall(_, _) => Formula::forall(new_vars, new_body),
                    _ => Formula::exists(new_vars, new_body),
                }
            }
        }
    }

    fn atom(&mut self, a: &Atom) -> Atom {
        match a.data() {
            AtomData::Equality(l, r) => {
                let nl = self.term(l);
                let nr = self.term(r);
                if nl.is_same(l) && nr.is_same(r) {
                    a.clone()
                } else {
                    Atom::equality(nl, nr)
                }
            }
            AtomData::Predicate(p, args) => {
                let new_args: Vec<Term> = args.iter().map(|t| self.term(t)).collect();
                if new_args.iter().zip(args.iter()).all(|(s, t)| s.is_same(t)) {
                    a.clone()
                } else {
                    Atom::predicate(*p, new_args)
                }
            }
        }
    }

    fn term(&mut self, t: &Term) -> Term {
        match t.data() {
            TermData::Var(v) => {
                if let Some(bound) = self.subst.bound(*v) {
                    return bound.clone();
                }
                // first sight of a free variable
                let w = self.fresh();
                let renamed = Term::var(w);
                self.subst.bind(*v, renamed.clone());
                self.free.push(w);
                renamed
            }
            TermData::Int(_) => t.clone(),
            TermData::Compound(f, args) => {
                let new_args: Vec<Term> = args.iter().map(|s| self.term(s)).collect();
                if new_args.iter().zip(args.iter()).all(|(a, b)| a.is_same(b)) {
                    t.clone()
                } else {
                    Term::compound(*f, new_args)
                }
            }
        }
    }
}
