//! Associative flattening
//!
//! Splices same-connective junction children into their parent and merges
//! directly nested same-quantifier blocks, bottom-up. One level per node
//! suffices because children are flattened first.

use crate::fol::{Formula, FormulaData, Junction};

pub fn flatten(f: &Formula) -> Formula {
    match f.data() {
        FormulaData::Atom(_) => f.clone(),

        FormulaData::And(args) | FormulaData::Or(args) => {
            let junction = match f.data() {
                FormulaData::And(_) => Junction::And,
                _ => Junction::Or,
            };
            match flatten_args(junction, args) {
                None => f.clone(),
                Some(new_args) => Formula::junction(junction, new_args),
            }
        }

        FormulaData::Imp(l, r) | FormulaData::Iff(l, r) | FormulaData::Xor(l, r) => {
            let nl = flatten(l);
            let nr = flatten(r);
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
            let ng = flatten(g);
            if ng.is_same(g) {
                f.clone()
            } else {
                Formula::not(ng)
            }
        }

        FormulaData::Forall(vs, body) | FormulaData::Exists(vs, body) => {
            let is_forall = matches!(f.data(), FormulaData::Forall(_, _));
            let nb = flatten(body);
            // merge a directly nested quantifier of the same kind
            let merged = match (is_forall, nb.data()) {
                (true, FormulaData::Forall(inner_vs, inner_body))
                | (false, FormulaData::Exists(inner_vs, inner_body)) => {
                    let mut vars = vs.clone();
                    vars.extend_from_slice(inner_vs);
                    Some((vars, inner_body.clone()))
                }
                _ => None,
            };
            match merged {
                Some((vars, inner_body)) => {
                    if is_forall {
                        Formula::forall(vars, inner_body)
                    } else {
                        Formula::exists(vars, inner_body)
                    }
                }
                None => {
                    if nb.is_same(body) {
                        f.clone()
                    } else if is_forall {
                        Formula::forall(vs.clone(), nb)
                    } else {
                        Formula::exists(vs.clone(), nb)
                    }
                }
            }
        }
    }
}

/// Flatten each child and splice children carrying the parent's connective.
/// Returns `None` when nothing changed.
fn flatten_args(junction: Junction, args: &[Formula]) -> Option<Vec<Formula>> {
    let mut changed = false;
    let mut out: Vec<Formula> = Vec::with_capacity(args.len());
    for g in args {
        let ng = flatten(g);
        match ng.as_junction() {
            Some((j, inner)) if j == junction => {
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
        Some(out)
    } else {
        None
    }
}
