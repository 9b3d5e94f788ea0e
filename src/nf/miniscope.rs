//! Miniscoping: narrowing quantifier scopes
//!
//! Works on flattened NNF. A quantifier over its distributive junction is
//! distributed outright; over the dual junction an occurrence matrix drives
//! two moves to fixpoint: variables occurring in a single disjunct are
//! pushed onto it alone, then groups of disjuncts sharing a variable are
//! merged under a narrower quantifier. Heuristic: the result is equivalent
//! but not guaranteed scope-minimal.

use crate::fol::{Formula, FormulaData, Junction, Quantifier, Var};

pub fn miniscope(f: &Formula) -> Formula {
    match f.data() {
        FormulaData::Atom(_) => f.clone(),

        FormulaData::Not(g) => {
            if !g.is_atom() {
                panic!("negation above a non-atom in NNF input");
            }
            f.clone()
        }

        FormulaData::And(args) | FormulaData::Or(args) => {
            let junction = match f.data() {
                FormulaData::And(_) => Junction::And,
                _ => Junction::Or,
            };
            let mut changed = false;
            let mut out: Vec<Formula> = Vec::with_capacity(args.len());
            for g in args {
                let ng = miniscope(g);
                match ng.as_junction() {
                    // a pushed-in quantifier may expose the parent's junction
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
                Formula::junction(junction, out)
            } else {
                f.clone()
            }
        }

        FormulaData::Forall(vs, body) | FormulaData::Exists(vs, body) => {
            let quant = match f.data() {
                FormulaData::Forall(_, _) => Quantifier::Forall,
                _ => Quantifier::Exists,
            };
            let down = miniscope(body);
            let (occurring, removed) = down.occurring(vs);
            if occurring.is_empty() {
                // vacuous quantifier
                return down;
            }
            match top_miniscope(quant, &occurring, &down) {
                Some(res) => res,
                None => {
                    if removed.is_empty() && down.is_same(body) {
                        f.clone()
                    } else {
                        Formula::quantified(quant, occurring, down)
                    }
                }
            }
        }

        FormulaData::Imp(_, _) | FormulaData::Iff(_, _) | FormulaData::Xor(_, _) => {
            panic!("implication or equivalence in NNF input")
        }
    }
}

/// Push the quantifier `(q vars)` into the already miniscoped formula `f`.
///
/// `Some(res)` absorbs the quantifier completely; `None` means no push was
/// possible and the caller keeps the quantifier on top. Every variable in
/// `vars` must occur in `f`.
fn top_miniscope(q: Quantifier, vars: &[Var], f: &Formula) -> Option<Formula> {
    match f.data() {
        FormulaData::Atom(_) | FormulaData::Not(_) => None,

        FormulaData::And(args) | FormulaData::Or(args) => {
            let junction = match f.data() {
                FormulaData::And(_) => Junction::And,
                _ => Junction::Or,
            };
            if junction == q.distributive_junction() {
                // (Q vs)(F1 j ... j Fn) distributes onto every child
                let new_args: Vec<Formula> = args
                    .iter()
                    .map(|g| {
                        let (child_vars, _) = g.occurring(vars);
                        if child_vars.is_empty() {
                            g.clone()
                        } else {
                            requantify(q, child_vars, g)
                        }
                    })
                    .collect();
                Some(Formula::junction(junction, new_args))
            } else {
                let mut matrix = Matrix::new(q, junction, vars, args);
                if matrix.no_miniscoping() {
                    return None;
                }
                matrix.push_ones();
                while matrix.push_many() {}
                Some(matrix.result())
            }
        }

        FormulaData::Forall(inner_vars, body) | FormulaData::Exists(inner_vars, body) => {
            let inner_q = match f.data() {
                FormulaData::Forall(_, _) => Quantifier::Forall,
                _ => Quantifier::Exists,
            };
            if inner_q != q {
                return None;
            }
            // (Q vs)(Q ws)B: try pushing past the inner block first
            match top_miniscope(q, vars, body) {
                None => {
                    let mut all = vars.to_vec();
                    all.extend_from_slice(inner_vars);
                    Some(Formula::quantified(q, all, body.clone()))
                }
                Some(res) => match res.as_quantified() {
                    Some((rq, rvs, rbody)) if rq == q => {
                        let mut all = inner_vars.clone();
                        all.extend_from_slice(rvs);
                        Some(Formula::quantified(q, all, rbody.clone()))
                    }
                    _ => Some(Formula::quantified(q, inner_vars.clone(), res)),
                },
            }
        }

        FormulaData::Imp(_, _) | FormulaData::Iff(_, _) | FormulaData::Xor(_, _) => {
            panic!("implication or equivalence in NNF input")
        }
    }
}

/// `(q vars) f`, miniscoped further when possible
fn requantify(q: Quantifier, vars: Vec<Var>, f: &Formula) -> Formula {
    match top_miniscope(q, &vars, f) {
        Some(res) => res,
        None => Formula::quantified(q, vars, f.clone()),
    }
}

/// Occurrence bookkeeping for a quantifier over its dual junction.
///
/// `occ[i][j]` records whether variable `i` occurs in formula `j`; `n[i]`
/// counts the live formulas it occurs in. Deleted formulas are `None` slots;
/// dead variables have `n == 0`.
struct Matrix {
    quant: Quantifier,
    junction: Junction,
    vars: Vec<Var>,
    formulas: Vec<Option<Formula>>,
    occ: Vec<Vec<bool>>,
    n: Vec<usize>,
    real_nfs: usize,
}

impl Matrix {
    fn new(quant: Quantifier, junction: Junction, vars: &[Var], args: &[Formula]) -> Matrix {
        let nfs = args.len();
        let nvs = vars.len();
        let max = vars.iter().map(|v| v.index()).max().unwrap_or(0);
        let mut occ = vec![vec![false; nfs]; nvs];
        let mut scratch = vec![false; max as usize + 1];
        for (j, g) in args.iter().enumerate() {
            scratch.iter_mut().for_each(|b| *b = false);
            g.mark_vars(&mut scratch);
            for (i, v) in vars.iter().enumerate() {
                occ[i][j] = scratch[v.index() as usize];
            }
        }
        let n = occ
            .iter()
            .map(|row| row.iter().filter(|&&b| b).count())
            .collect();
        Matrix {
            quant,
            junction,
            vars: vars.to_vec(),
            formulas: args.iter().cloned().map(Some).collect(),
            occ,
            n,
            real_nfs: nfs,
        }
    }

    /// Every variable occurs in every formula
    fn no_miniscoping(&self) -> bool {
        self.n.iter().all(|&count| count == self.formulas.len())
    }

    /// Indices of live variables with the same occurrence row as `v`,
    /// including `v` itself, ascending
    fn same_occurrence_group(&self, v: usize) -> Vec<usize> {
        let mut group = vec![v];
        for w in v + 1..self.vars.len() {
            if self.n[w] != 0 && self.occ[w] == self.occ[v] {
                group.push(w);
            }
        }
        group
    }

    fn group_vars(&self, group: &[usize]) -> Vec<Var> {
        group.iter().map(|&i| self.vars[i]).collect()
    }

    /// Push every variable occurring in exactly one formula onto it
    fn push_ones(&mut self) {
        for v in 0..self.vars.len() {
            if self.n[v] != 1 {
                continue;
            }
            let k = (0..self.formulas.len())
                .rfind(|&j| self.occ[v][j])
                .unwrap_or_else(|| panic!("occurrence count out of sync"));
            let group = self.same_occurrence_group(v);
            let ws = self.group_vars(&group);
            for &w in &group {
                self.n[w] = 0;
            }
            let target = self.formulas[k]
                .take()
                .unwrap_or_else(|| panic!("occurrence recorded for a deleted formula"));
            self.formulas[k] = Some(requantify(self.quant, ws, &target));
        }
    }

    /// Merge the formulas sharing the variable with the fewest occurrences
    /// under a narrower quantifier. Returns false at fixpoint.
    fn push_many(&mut self) -> bool {
        if self.real_nfs < 3 {
            return false;
        }
        // the variable occurring in the fewest live formulas
        let mut v = 0;
        let mut m = self.real_nfs;
        for w in 0..self.vars.len() {
            if self.n[w] != 0 && self.n[w] < m {
                m = self.n[w];
                v = w;
            }
        }
        if m == self.real_nfs {
            return false;
        }

        let group = self.same_occurrence_group(v);
        let ws = self.group_vars(&group);

        // collect the formulas v occurs in, merging their occurrence
        // columns into the lowest index
        let mut gathered: Vec<Formula> = Vec::with_capacity(m);
        let mut last_deleted: Option<usize> = None;
        for i in (0..self.formulas.len()).rev() {
            if self.formulas[i].is_none() || !self.occ[v][i] {
                continue;
            }
            gathered.insert(0, self.formulas[i].clone().unwrap_or_else(|| unreachable!()));
            if let Some(last) = last_deleted {
                self.formulas[last] = None;
                self.real_nfs -= 1;
                for w in 0..self.vars.len() {
                    if self.n[w] != 0 && self.occ[w][last] {
                        if self.occ[w][i] {
                            self.n[w] -= 1;
                        } else {
                            self.occ[w][i] = true;
                        }
                    }
                }
            }
            last_deleted = Some(i);
        }

        for &w in &group {
            self.n[w] = 0;
        }

        let slot = last_deleted.unwrap_or_else(|| panic!("variable with no occurrences"));
        self.formulas[slot] = Some(Formula::quantified(
            self.quant,
            ws,
            Formula::junction(self.junction, gathered),
        ));
        true
    }

    /// Reassemble the junction, wrapping leftover variables back on top
    fn result(self) -> Formula {
        let remaining: Vec<Var> = (0..self.vars.len())
            .filter(|&i| self.n[i] != 0)
            .map(|i| self.vars[i])
            .collect();
        let live: Vec<Formula> = self.formulas.into_iter().flatten().collect();
        let res = Formula::junction(self.junction, live);
        if remaining.is_empty() {
            res
        } else {
            Formula::quantified(self.quant, remaining, res)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::{Atom, Signature, Term};

    struct Ctx {
        sig: Signature,
    }

    impl Ctx {
        fn new() -> Self {
            Ctx {
                sig: Signature::new(),
            }
        }

        fn atom(&mut self, name: &str, vars: &[u32]) -> Formula {
            let p = self.sig.intern_predicate(name, vars.len() as u32);
            Formula::atom(Atom::predicate(
                p,
                vars.iter().map(|&v| Term::var(Var::new(v))).collect(),
            ))
        }
    }

    #[test]
    fn test_forall_distributes_over_conjunction() {
        let mut ctx = Ctx::new();
        let p = ctx.atom("p", &[0]);
        let q = ctx.atom("q", &[0]);
        let f = Formula::forall(vec![Var::new(0)], Formula::and(vec![p.clone(), q.clone()]));
        let g = miniscope(&f);
        assert_eq!(
            g,
            Formula::and(vec![
                Formula::forall(vec![Var::new(0)], p),
                Formula::forall(vec![Var::new(0)], q),
            ])
        );
    }

    #[test]
    fn test_vacuous_quantifiers_are_dropped() {
        let mut ctx = Ctx::new();
        let p = ctx.atom("p", &[0]);
        let f = Formula::exists(vec![Var::new(1)], p.clone());
        assert_eq!(miniscope(&f), p);
    }

    #[test]
    fn test_single_occurrence_variable_is_pushed_onto_its_disjunct() {
        let mut ctx = Ctx::new();
        // ![X0]: (p(X0) | q(X1)) with X1 outside the matrix scope:
        // X0 occurs in one disjunct only
        let p = ctx.atom("p", &[0]);
        let q = ctx.atom("q", &[1]);
        let f = Formula::forall(vec![Var::new(0)], Formula::or(vec![p.clone(), q.clone()]));
        let g = miniscope(&f);
        assert_eq!(
            g,
            Formula::or(vec![Formula::forall(vec![Var::new(0)], p), q])
        );
    }

    #[test]
    fn test_no_miniscoping_when_every_variable_is_everywhere() {
        let mut ctx = Ctx::new();
        let p = ctx.atom("p", &[0]);
        let q = ctx.atom("q", &[0]);
        let f = Formula::forall(vec![Var::new(0)], Formula::or(vec![p, q]));
        let g = miniscope(&f);
        assert!(g.is_same(&f));
    }

    #[test]
    fn test_shared_variable_groups_merge_under_a_narrower_quantifier() {
        let mut ctx = Ctx::new();
        // ![X0]: (p(X0) | q(X0) | r(X1)): X0 occurs in two of three
        // disjuncts, so those two merge under the quantifier
        let p = ctx.atom("p", &[0]);
        let q = ctx.atom("q", &[0]);
        let r = ctx.atom("r", &[1]);
        let f = Formula::forall(
            vec![Var::new(0)],
            Formula::or(vec![p.clone(), q.clone(), r.clone()]),
        );
        let g = miniscope(&f);
        assert_eq!(
            g,
            Formula::or(vec![
                Formula::forall(vec![Var::new(0)], Formula::or(vec![p, q])),
                r,
            ])
        );
    }

    #[test]
    fn test_exists_distributes_over_disjunction() {
        let mut ctx = Ctx::new();
        let p = ctx.atom("p", &[0]);
        let q = ctx.atom("q", &[0]);
        let f = Formula::exists(vec![Var::new(0)], Formula::or(vec![p.clone(), q.clone()]));
        let g = miniscope(&f);
        assert_eq!(
            g,
            Formula::or(vec![
                Formula::exists(vec![Var::new(0)], p),
                Formula::exists(vec![Var::new(0)], q),
            ])
        );
    }

    #[test]
    fn test_distribution_drops_nonoccurring_variables_per_child() {
        let mut ctx = Ctx::new();
        // ![X0,X1]: (p(X0) & q(X1)) narrows each variable to its conjunct
        let p = ctx.atom("p", &[0]);
        let q = ctx.atom("q", &[1]);
        let f = Formula::forall(
            vec![Var::new(0), Var::new(1)],
            Formula::and(vec![p.clone(), q.clone()]),
        );
        let g = miniscope(&f);
        assert_eq!(
            g,
            Formula::and(vec![
                Formula::forall(vec![Var::new(0)], p),
                Formula::forall(vec![Var::new(1)], q),
            ])
        );
    }

    #[test]
    fn test_leftover_variables_stay_on_top_of_the_merged_matrix() {
        let mut ctx = Ctx::new();
        // X0 occurs everywhere, X1 in the first two disjuncts only
        let a = ctx.atom("a", &[0, 1]);
        let b = ctx.atom("b", &[1, 0]);
        let c = ctx.atom("c", &[0]);
        let f = Formula::forall(
            vec![Var::new(0), Var::new(1)],
            Formula::or(vec![a.clone(), b.clone(), c.clone()]),
        );
        let g = miniscope(&f);
        assert_eq!(
            g,
            Formula::forall(
                vec![Var::new(0)],
                Formula::or(vec![
                    Formula::forall(vec![Var::new(1)], Formula::or(vec![a, b])),
                    c,
                ])
            )
        );
    }

    #[test]
    fn test_same_quantifier_blocks_merge_when_nothing_pushes() {
        let mut ctx = Ctx::new();
        // ?[X0] over ?[X1] with both variables in one atom
        let p = ctx.atom("p", &[0, 1]);
        let inner = Formula::exists(vec![Var::new(1)], p.clone());
        let f = Formula::exists(vec![Var::new(0)], inner);
        let g = miniscope(&f);
        assert_eq!(g, Formula::exists(vec![Var::new(0), Var::new(1)], p));
    }

    #[test]
    fn test_miniscoped_output_has_no_vacuous_quantifier() {
        fn well_scoped(f: &Formula) -> bool {
            match f.data() {
                FormulaData::Atom(_) => true,
                FormulaData::Not(g) => well_scoped(g),
                FormulaData::And(args) | FormulaData::Or(args) => {
                    args.iter().all(well_scoped)
                }
                FormulaData::Imp(l, r)
                | FormulaData::Iff(l, r)
                | FormulaData::Xor(l, r) => well_scoped(l) && well_scoped(r),
                FormulaData::Forall(vs, g) | FormulaData::Exists(vs, g) => {
                    let (occurring, removed) = g.occurring(vs);
                    removed.is_empty() && !occurring.is_empty() && well_scoped(g)
                }
            }
        }

        let mut ctx = Ctx::new();
        let a = ctx.atom("a", &[0, 2]);
        let b = ctx.atom("b", &[1]);
        let c = ctx.atom("c", &[0]);
        let f = Formula::forall(
            vec![Var::new(0), Var::new(1), Var::new(2), Var::new(3)],
            Formula::or(vec![a, Formula::exists(vec![Var::new(4)], b), c]),
        );
        assert!(well_scoped(&miniscope(&f)));
    }
}
