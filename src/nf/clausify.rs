//! Clausification of Skolemized NNF
//!
//! The input is quantifier-free NNF; disjunction distributes over
//! conjunction until only literals remain. The branching is driven by an
//! explicit stack of pending alternatives rather than recursion, so deeply
//! nested conjunctions cannot exhaust the call stack.

use crate::fol::{Clause, Formula, FormulaData, Literal};

/// Convert to a set of clauses. `seed` literals are included in every
/// produced clause; conjecture units pass their answer literal here.
pub fn clausify(f: &Formula, seed: Vec<Literal>) -> Vec<Clause> {
    let mut clauses = Vec::new();
    // each frame is one partially built clause: formulas still to expand
    // (top of the Vec is processed next) plus the literals gathered so far
    let mut frames: Vec<(Vec<Formula>, Vec<Literal>)> = vec![(vec![f.clone()], seed)];

    while let Some((mut work, mut literals)) = frames.pop() {
        let Some(g) = work.pop() else {
            clauses.push(Clause::new(literals));
            continue;
        };
        match g.data() {
            FormulaData::Atom(a) => {
                literals.push(Literal::positive(a.clone()));
                frames.push((work, literals));
            }

            FormulaData::Not(h) => {
                let a = match h.data() {
                    FormulaData::Atom(a) => a,
                    _ => panic!("negation above a non-atom in NNF input"),
                };
                literals.push(Literal::negative(a.clone()));
                frames.push((work, literals));
            }

            FormulaData::Or(args) => {
                work.extend(args.iter().rev().cloned());
                frames.push((work, literals));
            }

            FormulaData::And(args) => {
                // one alternative clause-in-progress per conjunct
                for arg in args.iter().rev() {
                    let mut branch = work.clone();
                    branch.push(arg.clone());
                    frames.push((branch, literals.clone()));
                }
            }

            FormulaData::Imp(_, _)
            | FormulaData::Iff(_, _)
            | FormulaData::Xor(_, _)
            | FormulaData::Forall(_, _)
            | FormulaData::Exists(_, _) => {
                panic!("quantifier or implication in Skolemized NNF input")
            }
        }
    }
    clauses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::{Atom, Signature};

    struct Ctx {
        sig: Signature,
    }

    impl Ctx {
        fn new() -> Self {
            Ctx {
                sig: Signature::new(),
            }
        }

        fn atom(&mut self, name: &str) -> Atom {
            Atom::predicate(self.sig.intern_predicate(name, 0), vec![])
        }

        fn f(&mut self, name: &str) -> Formula {
            Formula::atom(self.atom(name))
        }
    }

    #[test]
    fn test_a_literal_is_a_unit_clause() {
        let mut ctx = Ctx::new();
        let a = ctx.atom("a");
        let clauses = clausify(&Formula::not(Formula::atom(a.clone())), vec![]);
        assert_eq!(clauses, vec![Clause::new(vec![Literal::negative(a)])]);
    }

    #[test]
    fn test_conjunction_of_literals_gives_unit_clauses() {
        let mut ctx = Ctx::new();
        let (a, b) = (ctx.atom("a"), ctx.atom("b"));
        let f = Formula::and(vec![Formula::atom(a.clone()), Formula::atom(b.clone())]);
        let clauses = clausify(&f, vec![]);
        assert_eq!(
            clauses,
            vec![
                Clause::new(vec![Literal::positive(a)]),
                Clause::new(vec![Literal::positive(b)]),
            ]
        );
    }

    #[test]
    fn test_disjunction_distributes_over_conjunction() {
        let mut ctx = Ctx::new();
        let (a, b, c) = (ctx.atom("a"), ctx.atom("b"), ctx.atom("c"));
        // a | (b & c) gives the clauses {a, b} and {a, c}
        let f = Formula::or(vec![
            Formula::atom(a.clone()),
            Formula::and(vec![Formula::atom(b.clone()), Formula::atom(c.clone())]),
        ]);
        let clauses = clausify(&f, vec![]);
        assert_eq!(
            clauses,
            vec![
                Clause::new(vec![
                    Literal::positive(a.clone()),
                    Literal::positive(b),
                ]),
                Clause::new(vec![Literal::positive(a), Literal::positive(c)]),
            ]
        );
    }

    #[test]
    fn test_cross_distribution_multiplies_branches() {
        let mut ctx = Ctx::new();
        let (a, b, c, d) = (ctx.f("a"), ctx.f("b"), ctx.f("c"), ctx.f("d"));
        // (a & b) | (c & d) gives four clauses
        let f = Formula::or(vec![
            Formula::and(vec![a, b]),
            Formula::and(vec![c, d]),
        ]);
        let clauses = clausify(&f, vec![]);
        assert_eq!(clauses.len(), 4);
        for clause in &clauses {
            assert_eq!(clause.len(), 2);
        }
    }

    #[test]
    fn test_seed_literals_reach_every_clause() {
        let mut ctx = Ctx::new();
        let ans = ctx.atom("answer");
        let (a, b) = (ctx.f("a"), ctx.f("b"));
        let f = Formula::and(vec![a, b]);
        let clauses = clausify(&f, vec![Literal::positive(ans.clone())]);
        assert_eq!(clauses.len(), 2);
        for clause in &clauses {
            assert!(clause.literals.contains(&Literal::positive(ans.clone())));
        }
    }

    #[test]
    fn test_deep_conjunction_nesting_does_not_recurse() {
        let mut ctx = Ctx::new();
        // a chain and(a, and(a, ...)) thousands deep
        let a = ctx.f("a");
        let mut f = a.clone();
        for _ in 0..5000 {
            f = Formula::and(vec![a.clone(), f]);
        }
        let clauses = clausify(&f, vec![]);
        assert_eq!(clauses.len(), 5001);
    }
}
