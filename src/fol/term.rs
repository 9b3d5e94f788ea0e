//! First-order terms with shared persistent structure

use super::signature::{FunctionSymbol, Signature};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// A variable, identified by index
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Var(u32);

impl Var {
    /// The smallest variable handed out by rectification
    pub const FIRST: Var = Var(0);

    pub fn new(index: u32) -> Self {
        Var(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }

    /// The next variable in the fresh-variable sequence
    pub fn next(self) -> Var {
        Var(self.0 + 1)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X{}", self.0)
    }
}

/// The payload of a term node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TermData {
    /// A variable occurrence
    Var(Var),
    /// An integer constant
    Int(i64),
    /// A function symbol applied to arguments; zero arity means a constant
    Compound(FunctionSymbol, Vec<Term>),
}

/// A term handle. Cloning is cheap; structure is shared and immutable.
///
/// `==` compares structurally, [`Term::is_same`] compares identity. Rewrites
/// return the original handle whenever nothing underneath changed, so
/// identity comparison is the cheap way to detect "no change".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Term(Rc<TermData>);

impl Term {
    pub fn var(v: Var) -> Term {
        Term(Rc::new(TermData::Var(v)))
    }

    pub fn int(value: i64) -> Term {
        Term(Rc::new(TermData::Int(value)))
    }

    pub fn compound(f: FunctionSymbol, args: Vec<Term>) -> Term {
        debug_assert_eq!(f.arity as usize, args.len());
        Term(Rc::new(TermData::Compound(f, args)))
    }

    /// A zero-arity compound
    pub fn constant(f: FunctionSymbol) -> Term {
        Term::compound(f, Vec::new())
    }

    pub fn data(&self) -> &TermData {
        &self.0
    }

    /// True if both handles point at the same node
    pub fn is_same(&self, other: &Term) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn as_var(&self) -> Option<Var> {
        match self.data() {
            TermData::Var(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_var(&self) -> bool {
        matches!(self.data(), TermData::Var(_))
    }

    /// True if the variable occurs in this term
    pub fn contains_var(&self, v: Var) -> bool {
        match self.data() {
            TermData::Var(w) => *w == v,
            TermData::Int(_) => false,
            TermData::Compound(_, args) => args.iter().any(|t| t.contains_var(v)),
        }
    }

    /// True if the function symbol occurs anywhere in this term
    pub fn contains_function(&self, f: FunctionSymbol) -> bool {
        match self.data() {
            TermData::Var(_) | TermData::Int(_) => false,
            TermData::Compound(g, args) => {
                *g == f || args.iter().any(|t| t.contains_function(f))
            }
        }
    }

    /// Collect variables in first-occurrence order, skipping duplicates
    pub fn collect_vars(&self, out: &mut Vec<Var>) {
        match self.data() {
            TermData::Var(v) => {
                if !out.contains(v) {
                    out.push(*v);
                }
            }
            TermData::Int(_) => {}
            TermData::Compound(_, args) => {
                for t in args {
                    t.collect_vars(out);
                }
            }
        }
    }

    /// Mark occurring variables in the array; indices past its length are ignored
    pub(crate) fn mark_vars(&self, occ: &mut [bool]) {
        match self.data() {
            TermData::Var(v) => {
                if let Some(slot) = occ.get_mut(v.index() as usize) {
                    *slot = true;
                }
            }
            TermData::Int(_) => {}
            TermData::Compound(_, args) => {
                for t in args {
                    t.mark_vars(occ);
                }
            }
        }
    }

    /// Equal up to swapping the variables `x` and `y` at every occurrence.
    ///
    /// Used by the congruence-axiom recognizers: the two sides of a
    /// congruence conclusion differ in exactly one variable renamed to
    /// another.
    pub fn equal_up_to(&self, other: &Term, x: Var, y: Var) -> bool {
        match (self.data(), other.data()) {
            (TermData::Var(v), TermData::Var(w)) => {
                v == w || (*v == x && *w == y) || (*v == y && *w == x)
            }
            (TermData::Int(a), TermData::Int(b)) => a == b,
            (TermData::Compound(f, fargs), TermData::Compound(g, gargs)) => {
                f == g
                    && fargs
                        .iter()
                        .zip(gargs.iter())
                        .all(|(s, t)| s.equal_up_to(t, x, y))
            }
            _ => false,
        }
    }

    /// If this term is the left-hand side of a definition of `rhs`, return
    /// the defined function symbol.
    ///
    /// Requires: this term is compound, all its arguments are distinct
    /// variables, its head does not occur in `rhs`, and every variable of
    /// `rhs` occurs among the arguments.
    pub fn defines(&self, rhs: &Term) -> Option<FunctionSymbol> {
        let (f, args) = match self.data() {
            TermData::Compound(f, args) => (*f, args),
            _ => return None,
        };
        let mut seen: Vec<Var> = Vec::with_capacity(args.len());
        for arg in args {
            match arg.as_var() {
                Some(v) if !seen.contains(&v) => seen.push(v),
                _ => return None,
            }
        }
        if rhs.contains_function(f) {
            return None;
        }
        let mut rhs_vars = Vec::new();
        rhs.collect_vars(&mut rhs_vars);
        if rhs_vars.iter().all(|v| seen.contains(v)) {
            Some(f)
        } else {
            None
        }
    }

    /// Display with symbol names resolved through the signature
    pub fn display<'a>(&'a self, signature: &'a Signature) -> TermDisplay<'a> {
        TermDisplay {
            term: self,
            signature,
        }
    }
}

/// Helper for displaying terms with resolved names
pub struct TermDisplay<'a> {
    term: &'a Term,
    signature: &'a Signature,
}

impl fmt::Display for TermDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.term.data() {
            TermData::Var(v) => write!(f, "{}", v),
            TermData::Int(n) => write!(f, "{}", n),
            TermData::Compound(g, args) => {
                write!(f, "{}", self.signature.function_name(g.id))?;
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

#[cfg(test)]
mod tests {
    use super::*;

    struct Ctx {
        sig: Signature,
    }

    impl Ctx {
        fn new() -> Self {
            Ctx {
                sig: Signature::new(),
            }
        }

        fn fun(&mut self, name: &str, arity: u32) -> FunctionSymbol {
            self.sig.intern_function(name, arity)
        }
    }

    #[test]
    fn test_structural_vs_identity_equality() {
        let mut ctx = Ctx::new();
        let f = ctx.fun("f", 1);
        let t1 = Term::compound(f, vec![Term::var(Var::new(0))]);
        let t2 = Term::compound(f, vec![Term::var(Var::new(0))]);
        assert_eq!(t1, t2);
        assert!(!t1.is_same(&t2));
        assert!(t1.is_same(&t1.clone()));
    }

    #[test]
    fn test_contains_var_and_function() {
        let mut ctx = Ctx::new();
        let f = ctx.fun("f", 2);
        let a = ctx.fun("a", 0);
        let t = Term::compound(f, vec![Term::var(Var::new(3)), Term::constant(a)]);
        assert!(t.contains_var(Var::new(3)));
        assert!(!t.contains_var(Var::new(4)));
        assert!(t.contains_function(a));
        assert!(t.contains_function(f));
    }

    #[test]
    fn test_collect_vars_skips_duplicates() {
        let mut ctx = Ctx::new();
        let f = ctx.fun("f", 3);
        let x = Var::new(1);
        let y = Var::new(2);
        let t = Term::compound(f, vec![Term::var(x), Term::var(y), Term::var(x)]);
        let mut vars = Vec::new();
        t.collect_vars(&mut vars);
        assert_eq!(vars, vec![x, y]);
    }

    #[test]
    fn test_equal_up_to_swaps_one_variable() {
        let mut ctx = Ctx::new();
        let f = ctx.fun("f", 2);
        let x = Var::new(0);
        let y = Var::new(1);
        let z = Var::new(2);
        let s = Term::compound(f, vec![Term::var(x), Term::var(z)]);
        let t = Term::compound(f, vec![Term::var(y), Term::var(z)]);
        assert!(s.equal_up_to(&t, x, y));
        assert!(!s.equal_up_to(&t, x, z));
    }

    #[test]
    fn test_defines_requires_distinct_variable_args() {
        let mut ctx = Ctx::new();
        let f = ctx.fun("f", 2);
        let g = ctx.fun("g", 1);
        let x = Var::new(0);
        let y = Var::new(1);

        let lhs = Term::compound(f, vec![Term::var(x), Term::var(y)]);
        let rhs = Term::compound(g, vec![Term::var(x)]);
        assert_eq!(lhs.defines(&rhs), Some(f));

        // repeated argument variable
        let bad = Term::compound(f, vec![Term::var(x), Term::var(x)]);
        assert_eq!(bad.defines(&rhs), None);

        // recursive right-hand side
        let rec = Term::compound(f, vec![Term::var(x), Term::var(y)]);
        assert_eq!(lhs.defines(&rec), None);

        // extra variable on the right
        let z = Var::new(2);
        let extra = Term::compound(g, vec![Term::var(z)]);
        assert_eq!(lhs.defines(&extra), None);
    }

    #[test]
    fn test_display_resolves_names() {
        let mut ctx = Ctx::new();
        let f = ctx.fun("plus", 2);
        let t = Term::compound(f, vec![Term::var(Var::new(0)), Term::int(7)]);
        assert_eq!(format!("{}", t.display(&ctx.sig)), "plus(X0,7)");
    }
}
