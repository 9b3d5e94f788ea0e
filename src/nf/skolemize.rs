//! Skolemization of NNF formulas
//!
//! Existential variables are replaced by fresh Skolem functions applied to
//! the enclosing universal variables, outermost first. Universal
//! quantifiers are discarded; the result is an open NNF formula whose free
//! variables are implicitly universal.

use crate::fol::{Formula, FormulaData, Signature, Substitution, Term, Var};

pub fn skolemize(f: &Formula, signature: &mut Signature) -> Formula {
    let mut subst = Substitution::new();
    skolemize_nnf(f, signature, &mut subst, &[])
}

fn skolemize_nnf(
    f: &Formula,
    signature: &mut Signature,
    subst: &mut Substitution,
    universal: &[Var],
) -> Formula {
    match f.data() {
        FormulaData::Atom(a) => {
            let na = a.apply(subst);
            if na.is_same(a) {
                f.clone()
            } else {
                Formula::atom(na)
            }
        }

        FormulaData::Not(g) => {
            let a = match g.data() {
                FormulaData::Atom(a) => a,
                _ => panic!("negation above a non-atom in NNF input"),
            };
            let na = a.apply(subst);
            if na.is_same(a) {
                f.clone()
            } else {
                Formula::not(Formula::atom(na))
            }
        }

        FormulaData::And(args) | FormulaData::Or(args) => {
            let new_args: Vec<Formula> = args
                .iter()
                .map(|g| skolemize_nnf(g, signature, subst, universal))
                .collect();
            if new_args.iter().zip(args.iter()).all(|(a, b)| a.is_same(b)) {
                f.clone()
            } else {
                match f.data() {
                    FormulaData::And(_) => Formula::and(new_args),
                    _ => Formula::or(new_args),
                }
            }
        }

        FormulaData::Forall(vs, body) => {
            let mut scope_vars = universal.to_vec();
            scope_vars.extend_from_slice(vs);
            // the quantifier itself is discarded
            skolemize_nnf(body, signature, subst, &scope_vars)
        }

        FormulaData::Exists(vs, body) => {
            let skolem_args: Vec<Term> = universal.iter().map(|&v| Term::var(v)).collect();
            let mut scope = subst.scope();
            for &v in vs {
                let sk = signature.fresh_skolem_function(universal.len() as u32);
                scope.bind(v, Term::compound(sk, skolem_args.clone()));
            }
            skolemize_nnf(body, signature, &mut scope, universal)
        }

        FormulaData::Imp(_, _) | FormulaData::Iff(_, _) | FormulaData::Xor(_, _) => {
            panic!("implication or equivalence in NNF input")
        }
    }
}
