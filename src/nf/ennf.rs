//! Extended negation normal form
//!
//! ENNF has no implications and no negations except directly above atoms;
//! equivalence and exclusive-or survive with positively normalized sides.
//! The conversion is polarity-driven and flattens the junctions it creates.

use crate::fol::{Formula, FormulaData, Junction, Quantifier};

/// Convert to ENNF under the given polarity. Pass `true` at the top level;
/// `ennf(f, false)` normalizes the negation of `f`.
pub fn ennf(f: &Formula, polarity: bool) -> Formula {
    match f.data() {
        FormulaData::Atom(_) => {
            if polarity {
                f.clone()
            } else {
                Formula::not(f.clone())
            }
        }

        FormulaData::And(args) | FormulaData::Or(args) => {
            let original = match f.data() {
                FormulaData::And(_) => Junction::And,
                _ => Junction::Or,
            };
            let target = if polarity { original } else { original.dual() };
            let mut changed = target != original;
            let mut out: Vec<Formula> = Vec::with_capacity(args.len());
            for g in args {
                let ng = ennf(g, polarity);
                match ng.as_junction() {
                    Some((j, inner)) if j == target => {
                        out.extend_from_slice(inner);
                        changed = true;
                    }
                    _ => {
                        if !ng.is_same(g) {
                            changed = true;
                        }
                        out.push(ng);
                    }
                }
            }
            if changed {
                Formula::junction(target, out)
            } else {
                f.clone()
            }
        }

        FormulaData::Imp(l, r) => {
            // A => B becomes ~A | B; negatively, A & ~B
            let nl = ennf(l, !polarity);
            let nr = ennf(r, polarity);
            let target = if polarity { Junction::Or } else { Junction::And };
            let mut out = Vec::new();
            for g in [nl, nr] {
                match g.as_junction() {
                    Some((j, inner)) if j == target => out.extend_from_slice(inner),
                    _ => out.push(g),
                }
            }
            Formula::junction(target, out)
        }

        FormulaData::Iff(l, r) | FormulaData::Xor(l, r) => {
            let was_iff = matches!(f.data(), FormulaData::Iff(_, _));
            let nl = ennf(l, true);
            let nr = ennf(r, true);
            if polarity && nl.is_same(l) && nr.is_same(r) {
                return f.clone();
            }
            if polarity == was_iff {
                Formula::iff(nl, nr)
            } else {
                Formula::xor(nl, nr)
            }
        }

        FormulaData::Not(g) => {
            if polarity && g.is_atom() {
                f.clone()
            } else {
                ennf(g, !polarity)
            }
        }

        FormulaData::Forall(vs, body) | FormulaData::Exists(vs, body) => {
            let original = match f.data() {
                FormulaData::Forall(_, _) => Quantifier::Forall,
                _ => Quantifier::Exists,
            };
            let target = if polarity { original } else { original.dual() };
            let nb = ennf(body, polarity);
            if let Some((q, inner_vs, inner_body)) = nb.as_quantified() {
                if q == target {
                    let mut vars = vs.clone();
                    vars.extend_from_slice(inner_vs);
                    return Formula::quantified(target, vars, inner_body.clone());
                }
            }
            if nb.is_same(body) && target == original {
                f.clone()
            } else {
                Formula::quantified(target, vs.clone(), nb)
            }
        }
    }
}

/// Replace equivalence and exclusive-or by conjunctions of implications.
///
/// Input must be in ENNF. The output is not in ENNF (it contains the fresh
/// implications); callers re-run [`ennf`] afterwards.
pub fn remove_iff(f: &Formula) -> Formula {
    match f.data() {
        FormulaData::Atom(_) => f.clone(),

        FormulaData::And(args) | FormulaData::Or(args) => {
            let new_args: Vec<Formula> = args.iter().map(remove_iff).collect();
            if new_args.iter().zip(args.iter()).all(|(a, b)| a.is_same(b)) {
                f.clone()
            } else {
                match f.data() {
                    FormulaData::And(_) => Formula::and(new_args),
                    _ => Formula::or(new_args),
                }
            }
        }

        FormulaData::Iff(l, r) | FormulaData::Xor(l, r) => {
            let nl = remove_iff(l);
            let nr = remove_iff(r);
            if matches!(f.data(), FormulaData::Iff(_, _)) {
                Formula::and(vec![
                    Formula::imp(nl.clone(), nr.clone()),
                    Formula::imp(nr, nl),
                ])
            } else {
                Formula::and(vec![
                    Formula::imp(nl.clone(), Formula::not(nr.clone())),
                    Formula::imp(Formula::not(nl), nr),
                ])
            }
        }

        FormulaData::Not(g) => {
            if !g.is_atom() {
                panic!("negation above a non-atom in ENNF input");
            }
            f.clone()
        }

        FormulaData::Forall(vs, body) | FormulaData::Exists(vs, body) => {
            let nb = remove_iff(body);
            if nb.is_same(body) {
                f.clone()
            } else {
                match f.data() {
                    FormulaData::Forall(_, _) => Formula::forall(vs.clone(), nb),
                    _ => Formula::exists(vs.clone(), nb),
                }
            }
        }

        FormulaData::Imp(_, _) => panic!("implication in ENNF input"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::{Atom, Signature, Term, Var};

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
            let p = self.sig.intern_predicate(name, 0);
            Formula::atom(Atom::predicate(p, vec![]))
        }

        fn atom1(&mut self, name: &str, v: u32) -> Formula {
            let p = self.sig.intern_predicate(name, 1);
            Formula::atom(Atom::predicate(p, vec![Term::var(Var::new(v))]))
        }
    }

    fn is_ennf(f: &Formula) -> bool {
        match f.data() {
            FormulaData::Atom(_) => true,
            FormulaData::Not(g) => g.is_atom(),
            FormulaData::And(args) | FormulaData::Or(args) => args.iter().all(is_ennf),
            FormulaData::Imp(_, _) => false,
            FormulaData::Iff(l, r) | FormulaData::Xor(l, r) => is_ennf(l) && is_ennf(r),
            FormulaData::Forall(_, g) | FormulaData::Exists(_, g) => is_ennf(g),
        }
    }

    #[test]
    fn test_implication_becomes_disjunction() {
        let mut ctx = Ctx::new();
        let (a, b) = (ctx.atom("a"), ctx.atom("b"));
        let f = Formula::imp(a.clone(), b.clone());
        let g = ennf(&f, true);
        assert_eq!(g, Formula::or(vec![Formula::not(a), b]));
    }

    #[test]
    fn test_negated_implication_becomes_conjunction() {
        let mut ctx = Ctx::new();
        let (a, b) = (ctx.atom("a"), ctx.atom("b"));
        let f = Formula::imp(a.clone(), b.clone());
        let g = ennf(&f, false);
        assert_eq!(g, Formula::and(vec![a, Formula::not(b)]));
    }

    #[test]
    fn test_chained_implications_flatten() {
        let mut ctx = Ctx::new();
        let (a, b, c) = (ctx.atom("a"), ctx.atom("b"), ctx.atom("c"));
        // a => (b => c) turns into one three-way disjunction
        let f = Formula::imp(a.clone(), Formula::imp(b.clone(), c.clone()));
        let g = ennf(&f, true);
        assert_eq!(
            g,
            Formula::or(vec![Formula::not(a), Formula::not(b), c])
        );
    }

    #[test]
    fn test_negation_pushes_through_quantifiers() {
        let mut ctx = Ctx::new();
        let p = ctx.atom1("p", 0);
        let f = Formula::not(Formula::forall(vec![Var::new(0)], p.clone()));
        let g = ennf(&f, true);
        assert_eq!(
            g,
            Formula::exists(vec![Var::new(0)], Formula::not(p))
        );
    }

    #[test]
    fn test_double_negation_cancels() {
        let mut ctx = Ctx::new();
        let a = ctx.atom("a");
        let f = Formula::not(Formula::not(a.clone()));
        assert_eq!(ennf(&f, true), a);
    }

    #[test]
    fn test_negated_iff_becomes_xor_with_positive_sides() {
        let mut ctx = Ctx::new();
        let (a, b) = (ctx.atom("a"), ctx.atom("b"));
        let f = Formula::not(Formula::iff(
            Formula::not(a.clone()),
            b.clone(),
        ));
        let g = ennf(&f, true);
        // sides are normalized positively; the connective flips
        assert_eq!(g, Formula::xor(Formula::not(a), b));
    }

    #[test]
    fn test_quantifiers_of_the_same_kind_merge() {
        let mut ctx = Ctx::new();
        let p = ctx.atom1("p", 1);
        // ~?[X0]: ?[X1]: p(X1) gives a single merged forall
        let f = Formula::not(Formula::exists(
            vec![Var::new(0)],
            Formula::exists(vec![Var::new(1)], p.clone()),
        ));
        let g = ennf(&f, true);
        assert_eq!(
            g,
            Formula::forall(vec![Var::new(0), Var::new(1)], Formula::not(p))
        );
    }

    #[test]
    fn test_ennf_output_has_the_ennf_shape() {
        let mut ctx = Ctx::new();
        let (a, b, c) = (ctx.atom("a"), ctx.atom("b"), ctx.atom("c"));
        let f = Formula::not(Formula::imp(
            Formula::iff(a, b),
            Formula::not(c),
        ));
        let g = ennf(&f, true);
        assert!(is_ennf(&g));
    }

    #[test]
    fn test_unchanged_ennf_input_keeps_its_handle() {
        let mut ctx = Ctx::new();
        let (a, b) = (ctx.atom("a"), ctx.atom("b"));
        let f = Formula::or(vec![Formula::not(a), b]);
        assert!(ennf(&f, true).is_same(&f));
    }

    #[test]
    fn test_remove_iff_rewrites_both_directions() {
        let mut ctx = Ctx::new();
        let (a, b) = (ctx.atom("a"), ctx.atom("b"));
        let f = Formula::iff(a.clone(), b.clone());
        let g = remove_iff(&f);
        assert_eq!(
            g,
            Formula::and(vec![
                Formula::imp(a.clone(), b.clone()),
                Formula::imp(b, a),
            ])
        );
    }

    #[test]
    fn test_remove_iff_on_xor_negates_one_side_per_implication() {
        let mut ctx = Ctx::new();
        let (a, b) = (ctx.atom("a"), ctx.atom("b"));
        let f = Formula::xor(a.clone(), b.clone());
        let g = remove_iff(&f);
        assert_eq!(
            g,
            Formula::and(vec![
                Formula::imp(a.clone(), Formula::not(b.clone())),
                Formula::imp(Formula::not(a), b),
            ])
        );
    }

    #[test]
    fn test_remove_iff_then_ennf_yields_nnf() {
        let mut ctx = Ctx::new();
        let (a, b) = (ctx.atom("a"), ctx.atom("b"));
        let f = Formula::iff(a, b);
        let g = ennf(&remove_iff(&ennf(&f, true)), true);
        assert!(is_ennf(&g));
        fn no_iff(f: &Formula) -> bool {
            match f.data() {
                FormulaData::Iff(_, _) | FormulaData::Xor(_, _) => false,
                FormulaData::Atom(_) => true,
                FormulaData::Not(g) => no_iff(g),
                FormulaData::And(args) | FormulaData::Or(args) => args.iter().all(no_iff),
                FormulaData::Imp(l, r) => no_iff(l) && no_iff(r),
                FormulaData::Forall(_, g) | FormulaData::Exists(_, g) => no_iff(g),
            }
        }
        assert!(no_iff(&g));
    }
}
