//! First-order formulas with shared persistent structure

use super::atom::Atom;
use super::signature::{PredicateSymbol, Signature};
use super::term::Var;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// The two associative junction connectives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Junction {
    And,
    Or,
}

impl Junction {
    pub fn dual(self) -> Junction {
        match self {
            Junction::And => Junction::Or,
            Junction::Or => Junction::And,
        }
    }
}

/// The two quantifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantifier {
    Forall,
    Exists,
}

impl Quantifier {
    pub fn dual(self) -> Quantifier {
        match self {
            Quantifier::Forall => Quantifier::Exists,
            Quantifier::Exists => Quantifier::Forall,
        }
    }

    /// The junction this quantifier distributes over
    pub fn distributive_junction(self) -> Junction {
        match self {
            Quantifier::Forall => Junction::And,
            Quantifier::Exists => Junction::Or,
        }
    }
}

/// The payload of a formula node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormulaData {
    Atom(Atom),
    And(Vec<Formula>),
    Or(Vec<Formula>),
    Imp(Formula, Formula),
    Iff(Formula, Formula),
    Xor(Formula, Formula),
    Not(Formula),
    Forall(Vec<Var>, Formula),
    Exists(Vec<Var>, Formula),
}

/// A formula handle. Cloning is cheap; structure is shared and immutable.
///
/// Rewrites across the crate return the original handle when nothing
/// underneath changed; [`Formula::is_same`] detects that without a
/// structural walk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Formula(Rc<FormulaData>);

impl Formula {
    pub fn atom(a: Atom) -> Formula {
        Formula(Rc::new(FormulaData::Atom(a)))
    }

    pub fn and(args: Vec<Formula>) -> Formula {
        debug_assert!(args.len() > 1);
        Formula(Rc::new(FormulaData::And(args)))
    }

    pub fn or(args: Vec<Formula>) -> Formula {
        debug_assert!(args.len() > 1);
        Formula(Rc::new(FormulaData::Or(args)))
    }

    pub fn junction(j: Junction, args: Vec<Formula>) -> Formula {
        match j {
            Junction::And => Formula::and(args),
            Junction::Or => Formula::or(args),
        }
    }

    pub fn imp(lhs: Formula, rhs: Formula) -> Formula {
        Formula(Rc::new(FormulaData::Imp(lhs, rhs)))
    }

    pub fn iff(lhs: Formula, rhs: Formula) -> Formula {
        Formula(Rc::new(FormulaData::Iff(lhs, rhs)))
    }

    pub fn xor(lhs: Formula, rhs: Formula) -> Formula {
        Formula(Rc::new(FormulaData::Xor(lhs, rhs)))
    }

    pub fn not(arg: Formula) -> Formula {
        Formula(Rc::new(FormulaData::Not(arg)))
    }

    pub fn forall(vars: Vec<Var>, body: Formula) -> Formula {
        debug_assert!(!vars.is_empty());
        Formula(Rc::new(FormulaData::Forall(vars, body)))
    }

    pub fn exists(vars: Vec<Var>, body: Formula) -> Formula {
        debug_assert!(!vars.is_empty());
        Formula(Rc::new(FormulaData::Exists(vars, body)))
    }

    pub fn quantified(q: Quantifier, vars: Vec<Var>, body: Formula) -> Formula {
        match q {
            Quantifier::Forall => Formula::forall(vars, body),
            Quantifier::Exists => Formula::exists(vars, body),
        }
    }

    pub fn data(&self) -> &FormulaData {
        &self.0
    }

    pub fn is_same(&self, other: &Formula) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn is_atom(&self) -> bool {
        matches!(self.data(), FormulaData::Atom(_))
    }

    pub fn as_atom(&self) -> Option<&Atom> {
        match self.data() {
            FormulaData::Atom(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_junction(&self) -> Option<(Junction, &[Formula])> {
        match self.data() {
            FormulaData::And(args) => Some((Junction::And, args)),
            FormulaData::Or(args) => Some((Junction::Or, args)),
            _ => None,
        }
    }

    pub fn as_quantified(&self) -> Option<(Quantifier, &[Var], &Formula)> {
        match self.data() {
            FormulaData::Forall(vs, body) => Some((Quantifier::Forall, vs, body)),
            FormulaData::Exists(vs, body) => Some((Quantifier::Exists, vs, body)),
            _ => None,
        }
    }

    /// Strip the outermost universal prefix, collecting its variables
    pub fn strip_universal_prefix(&self) -> (Vec<Var>, Formula) {
        let mut vars = Vec::new();
        let mut f = self.clone();
        while let FormulaData::Forall(vs, body) = f.data() {
            vars.extend_from_slice(vs);
            let next = body.clone();
            f = next;
        }
        (vars, f)
    }

    /// Mark occurring variables in the array; indices past its length are
    /// ignored. Quantifiers are not tracked, so on rectified input a bound
    /// variable is never confused with an outer one.
    pub(crate) fn mark_vars(&self, occ: &mut [bool]) {
        match self.data() {
            FormulaData::Atom(a) => a.mark_vars(occ),
            FormulaData::And(args) | FormulaData::Or(args) => {
                for g in args {
                    g.mark_vars(occ);
                }
            }
            FormulaData::Imp(l, r)
            | FormulaData::Iff(l, r)
            | FormulaData::Xor(l, r) => {
                l.mark_vars(occ);
                r.mark_vars(occ);
            }
            FormulaData::Not(g) => g.mark_vars(occ),
            FormulaData::Forall(_, g) | FormulaData::Exists(_, g) => g.mark_vars(occ),
        }
    }

    /// Split `vars` into the sublist occurring in this formula and the rest,
    /// preserving order. Requires rectified input.
    pub fn occurring(&self, vars: &[Var]) -> (Vec<Var>, Vec<Var>) {
        let max = vars.iter().map(|v| v.index()).max().unwrap_or(0);
        let mut occ = vec![false; max as usize + 1];
        self.mark_vars(&mut occ);
        let mut present = Vec::new();
        let mut removed = Vec::new();
        for &v in vars {
            if occ[v.index() as usize] {
                present.push(v);
            } else {
                removed.push(v);
            }
        }
        (present, removed)
    }

    /// Free variables in first-occurrence order
    pub fn free_vars(&self) -> Vec<Var> {
        let mut bound = Vec::new();
        let mut free = Vec::new();
        self.free_vars_rec(&mut bound, &mut free);
        free
    }

    pub fn has_free_vars(&self) -> bool {
        !self.free_vars().is_empty()
    }

    fn free_vars_rec(&self, bound: &mut Vec<Var>, free: &mut Vec<Var>) {
        match self.data() {
            FormulaData::Atom(a) => {
                let mut vars = Vec::new();
                a.collect_vars(&mut vars);
                for v in vars {
                    if !bound.contains(&v) && !free.contains(&v) {
                        free.push(v);
                    }
                }
            }
            FormulaData::And(args) | FormulaData::Or(args) => {
                for g in args {
                    g.free_vars_rec(bound, free);
                }
            }
            FormulaData::Imp(l, r)
            | FormulaData::Iff(l, r)
            | FormulaData::Xor(l, r) => {
                l.free_vars_rec(bound, free);
                r.free_vars_rec(bound, free);
            }
            FormulaData::Not(g) => g.free_vars_rec(bound, free),
            FormulaData::Forall(vs, g) | FormulaData::Exists(vs, g) => {
                let depth = bound.len();
                bound.extend_from_slice(vs);
                g.free_vars_rec(bound, free);
                bound.truncate(depth);
            }
        }
    }

    /// True if the predicate occurs anywhere in the formula
    pub fn contains_predicate(&self, p: PredicateSymbol) -> bool {
        match self.data() {
            FormulaData::Atom(a) => a.predicate_symbol() == Some(p),
            FormulaData::And(args) | FormulaData::Or(args) => {
                args.iter().any(|g| g.contains_predicate(p))
            }
            FormulaData::Imp(l, r)
            | FormulaData::Iff(l, r)
            | FormulaData::Xor(l, r) => {
                l.contains_predicate(p) || r.contains_predicate(p)
            }
            FormulaData::Not(g) => g.contains_predicate(p),
            FormulaData::Forall(_, g) | FormulaData::Exists(_, g) => {
                g.contains_predicate(p)
            }
        }
    }

    pub fn display<'a>(&'a self, signature: &'a Signature) -> FormulaDisplay<'a> {
        FormulaDisplay {
            formula: self,
            signature,
        }
    }
}

/// Helper for displaying formulas with resolved names, TPTP style
pub struct FormulaDisplay<'a> {
    formula: &'a Formula,
    signature: &'a Signature,
}

impl FormulaDisplay<'_> {
    fn write_junction(
        &self,
        f: &mut fmt::Formatter<'_>,
        args: &[Formula],
        op: &str,
    ) -> fmt::Result {
        write!(f, "(")?;
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", op)?;
            }
            write!(f, "{}", arg.display(self.signature))?;
        }
        write!(f, ")")
    }

    fn write_quantified(
        &self,
        f: &mut fmt::Formatter<'_>,
        sym: &str,
        vars: &[Var],
        body: &Formula,
    ) -> fmt::Result {
        write!(f, "{}[", sym)?;
        for (i, v) in vars.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "]: {}", body.display(self.signature))
    }
}

impl fmt::Display for FormulaDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.formula.data() {
            FormulaData::Atom(a) => write!(f, "{}", a.display(self.signature)),
            FormulaData::And(args) => self.write_junction(f, args, "&"),
            FormulaData::Or(args) => self.write_junction(f, args, "|"),
            FormulaData::Imp(l, r) => write!(
                f,
                "({} => {})",
                l.display(self.signature),
                r.display(self.signature)
            ),
            FormulaData::Iff(l, r) => write!(
                f,
                "({} <=> {})",
                l.display(self.signature),
                r.display(self.signature)
            ),
            FormulaData::Xor(l, r) => write!(
                f,
                "({} <~> {})",
                l.display(self.signature),
                r.display(self.signature)
            ),
            FormulaData::Not(g) => write!(f, "~{}", g.display(self.signature)),
            FormulaData::Forall(vs, body) => self.write_quantified(f, "!", vs, body),
            FormulaData::Exists(vs, body) => self.write_quantified(f, "?", vs, body),
        }
    }
}
