//! Polarity-aware symbol occurrence counting

use crate::fol::{Atom, AtomData, Clause, Formula, FormulaData, FunctionSymbol,
    PredicateSymbol, Signature, Term, TermData};

/// Occurrence counts of one predicate symbol
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PredCounts {
    /// occurrences under positive polarity
    pub pos: i32,
    /// occurrences under negative polarity
    pub neg: i32,
    /// occurrences under both polarities at once (under an equivalence)
    pub dual: i32,
}

/// Occurrence counts of one function symbol
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FunCounts {
    pub occurrences: i32,
}

/// Signed occurrence counter over formulas and clauses.
///
/// Counting with `add = 1` registers a unit; `add = -1` retracts it, so the
/// counter can track a changing unit collection without a rebuild.
#[derive(Debug, Clone)]
pub struct SymCounter {
    preds: Vec<PredCounts>,
    funs: Vec<FunCounts>,
}

impl SymCounter {
    pub fn new(signature: &Signature) -> SymCounter {
        SymCounter {
            preds: vec![PredCounts::default(); signature.predicate_count()],
            funs: vec![FunCounts::default(); signature.function_count()],
        }
    }

    pub fn predicate(&self, p: PredicateSymbol) -> PredCounts {
        self.preds
            .get(p.id.0 as usize)
            .copied()
            .unwrap_or_default()
    }

    pub fn function(&self, f: FunctionSymbol) -> FunCounts {
        self.funs.get(f.id.0 as usize).copied().unwrap_or_default()
    }

    /// Count a formula under the given polarity: 1 positive, -1 negative,
    /// 0 underneath an equivalence
    pub fn count_formula(&mut self, f: &Formula, polarity: i32, add: i32) {
        match f.data() {
            FormulaData::Atom(a) => self.count_atom(a, polarity, add),
            FormulaData::And(args) | FormulaData::Or(args) => {
                for g in args {
                    self.count_formula(g, polarity, add);
                }
            }
            FormulaData::Imp(l, r) => {
                self.count_formula(l, -polarity, add);
                self.count_formula(r, polarity, add);
            }
            FormulaData::Iff(l, r) | FormulaData::Xor(l, r) => {
                self.count_formula(l, 0, add);
                self.count_formula(r, 0, add);
            }
            FormulaData::Not(g) => self.count_formula(g, -polarity, add),
            FormulaData::Forall(_, g) | FormulaData::Exists(_, g) => {
                self.count_formula(g, polarity, add);
            }
        }
    }

    pub fn count_clause(&mut self, c: &Clause, add: i32) {
        for lit in &c.literals {
            self.count_atom(&lit.atom, if lit.polarity { 1 } else { -1 }, add);
        }
    }

    fn count_atom(&mut self, a: &Atom, polarity: i32, add: i32) {
        match a.data() {
            AtomData::Equality(l, r) => {
                self.count_term(l, add);
                self.count_term(r, add);
            }
            AtomData::Predicate(p, args) => {
                let idx = p.id.0 as usize;
                if idx >= self.preds.len() {
                    self.preds.resize(idx + 1, PredCounts::default());
                }
                let counts = &mut self.preds[idx];
                match polarity.cmp(&0) {
                    std::cmp::Ordering::Greater => counts.pos += add,
                    std::cmp::Ordering::Less => counts.neg += add,
                    std::cmp::Ordering::Equal => counts.dual += add,
                }
                for t in args {
                    self.count_term(t, add);
                }
            }
        }
    }

    fn count_term(&mut self, t: &Term, add: i32) {
        match t.data() {
            TermData::Var(_) | TermData::Int(_) => {}
            TermData::Compound(f, args) => {
                let idx = f.id.0 as usize;
                if idx >= self.funs.len() {
                    self.funs.resize(idx + 1, FunCounts::default());
                }
                self.funs[idx].occurrences += add;
                for s in args {
                    self.count_term(s, add);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::{Literal, Term, Var};

    struct Ctx {
        sig: Signature,
    }

    impl Ctx {
        fn new() -> Self {
            Ctx {
                sig: Signature::new(),
            }
        }

        fn atom(&mut self, name: &str) -> Formula {
            Formula::atom(Atom::predicate(self.sig.intern_predicate(name, 0), vec![]))
        }
    }

    #[test]
    fn test_implication_flips_the_left_polarity() {
        let mut ctx = Ctx::new();
        let f = Formula::imp(ctx.atom("a"), ctx.atom("b"));
        let a = ctx.sig.intern_predicate("a", 0);
        let b = ctx.sig.intern_predicate("b", 0);

        let mut counter = SymCounter::new(&ctx.sig);
        counter.count_formula(&f, 1, 1);
        assert_eq!(counter.predicate(a), PredCounts { pos: 0, neg: 1, dual: 0 });
        assert_eq!(counter.predicate(b), PredCounts { pos: 1, neg: 0, dual: 0 });
    }

    #[test]
    fn test_equivalence_counts_both_sides_as_dual() {
        let mut ctx = Ctx::new();
        let f = Formula::iff(ctx.atom("a"), Formula::not(ctx.atom("b")));
        let a = ctx.sig.intern_predicate("a", 0);
        let b = ctx.sig.intern_predicate("b", 0);

        let mut counter = SymCounter::new(&ctx.sig);
        counter.count_formula(&f, 1, 1);
        assert_eq!(counter.predicate(a).dual, 1);
        assert_eq!(counter.predicate(b).dual, 1);
    }

    #[test]
    fn test_retraction_cancels_counting() {
        let mut ctx = Ctx::new();
        let f = Formula::not(ctx.atom("a"));
        let a = ctx.sig.intern_predicate("a", 0);

        let mut counter = SymCounter::new(&ctx.sig);
        counter.count_formula(&f, 1, 1);
        assert_eq!(counter.predicate(a).neg, 1);
        counter.count_formula(&f, 1, -1);
        assert_eq!(counter.predicate(a), PredCounts::default());
    }

    #[test]
    fn test_clause_literals_count_by_sign_and_functions_by_occurrence() {
        let mut ctx = Ctx::new();
        let p = ctx.sig.intern_predicate("p", 1);
        let f = ctx.sig.intern_function("f", 1);
        let x = Term::var(Var::new(0));
        let fx = Term::compound(f, vec![x.clone()]);
        let clause = Clause::new(vec![
            Literal::positive(Atom::predicate(p, vec![fx.clone()])),
            Literal::negative(Atom::predicate(p, vec![x])),
        ]);

        let mut counter = SymCounter::new(&ctx.sig);
        counter.count_clause(&clause, 1);
        assert_eq!(counter.predicate(p), PredCounts { pos: 1, neg: 1, dual: 0 });
        assert_eq!(counter.function(f).occurrences, 1);
    }
}
