//! Detection of predicate and function definitions

use crate::fol::{Atom, Clause, Formula, FormulaData, Term, Var};

/// A recognized predicate definition `p(X1..Xn) <=> body`
#[derive(Debug, Clone)]
pub struct PredicateDefinition {
    pub head: Atom,
    pub body: Formula,
    /// the head was on the right of the input equivalence
    pub head_on_right: bool,
}

/// Recognize `![X..]: (p(X..) <=> A)` where the head is a flat non-equality
/// atom over exactly the quantified variables, each occurring once, and `p`
/// does not occur in `A`. Either side may be the head.
pub fn as_predicate_definition(f: &Formula) -> Option<PredicateDefinition> {
    let (prefix, body) = f.strip_universal_prefix();
    let (l, r) = match body.data() {
        FormulaData::Iff(l, r) => (l, r),
        _ => return None,
    };
    if let Some(head) = definition_head(l, r, &prefix) {
        return Some(PredicateDefinition {
            head,
            body: r.clone(),
            head_on_right: false,
        });
    }
    if let Some(head) = definition_head(r, l, &prefix) {
        return Some(PredicateDefinition {
            head,
            body: l.clone(),
            head_on_right: true,
        });
    }
    None
}

fn definition_head(candidate: &Formula, other: &Formula, prefix: &[Var]) -> Option<Atom> {
    let atom = candidate.as_atom()?;
    let p = atom.predicate_symbol()?;
    if !atom.is_flat() {
        return None;
    }
    let mut arg_vars = Vec::new();
    atom.collect_vars(&mut arg_vars);
    // collect_vars deduplicates, so a repeated argument shows up as a
    // length mismatch
    if arg_vars.len() != p.arity as usize {
        return None;
    }
    let mut sorted_args = arg_vars;
    sorted_args.sort();
    let mut sorted_prefix = prefix.to_vec();
    sorted_prefix.sort();
    if sorted_args != sorted_prefix {
        return None;
    }
    if other.contains_predicate(p) {
        return None;
    }
    Some(atom.clone())
}

/// Recognize `![X..]: f(X..) = t`, returning the defined side first.
/// The head's arguments must be distinct variables, `f` must not occur in
/// `t`, and `t` must introduce no other variables.
pub fn as_function_definition(f: &Formula) -> Option<(Term, Term)> {
    let (_, body) = f.strip_universal_prefix();
    body.as_atom()?.as_definition()
}

/// The clause form of a function definition: a positive unit equality
pub fn clause_function_definition(c: &Clause) -> Option<(Term, Term)> {
    if c.len() != 1 || !c.literals[0].polarity {
        return None;
    }
    c.literals[0].atom.as_definition()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::{Literal, Signature};

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
    fn test_simple_predicate_definition() {
        let mut ctx = Ctx::new();
        // ![X0,X1]: (p(X0,X1) <=> (q(X0) & q(X1)))
        let head = ctx.atom("p", &[0, 1]);
        let body = Formula::and(vec![ctx.atom("q", &[0]), ctx.atom("q", &[1])]);
        let f = Formula::forall(
            vec![Var::new(0), Var::new(1)],
            Formula::iff(head, body),
        );
        let def = as_predicate_definition(&f).unwrap();
        assert!(!def.head_on_right);
        assert_eq!(
            def.head.predicate_symbol(),
            Some(ctx.sig.intern_predicate("p", 2))
        );
    }

    #[test]
    fn test_head_on_the_right_is_found() {
        let mut ctx = Ctx::new();
        // the left side is a conjunction, so only the right side can be
        // the head
        let body = Formula::and(vec![ctx.atom("q", &[0]), ctx.atom("r", &[0])]);
        let head = ctx.atom("p", &[0]);
        let f = Formula::forall(vec![Var::new(0)], Formula::iff(body, head));
        let def = as_predicate_definition(&f).unwrap();
        assert!(def.head_on_right);
        assert_eq!(
            def.head.predicate_symbol(),
            Some(ctx.sig.intern_predicate("p", 1))
        );
    }

    #[test]
    fn test_flat_sides_prefer_the_left_head() {
        let mut ctx = Ctx::new();
        // both sides qualify; the left one wins
        let left = ctx.atom("q", &[0]);
        let right = ctx.atom("p", &[0]);
        let f = Formula::forall(vec![Var::new(0)], Formula::iff(left, right));
        let def = as_predicate_definition(&f).unwrap();
        assert!(!def.head_on_right);
        assert_eq!(
            def.head.predicate_symbol(),
            Some(ctx.sig.intern_predicate("q", 1))
        );
    }

    #[test]
    fn test_recursive_equivalences_are_not_definitions() {
        let mut ctx = Ctx::new();
        // ![X0]: (p(X0) <=> (q(X0) & p(X0)))
        let head = ctx.atom("p", &[0]);
        let body = Formula::and(vec![ctx.atom("q", &[0]), ctx.atom("p", &[0])]);
        let f = Formula::forall(vec![Var::new(0)], Formula::iff(head, body));
        assert!(as_predicate_definition(&f).is_none());
    }

    #[test]
    fn test_head_variables_must_match_the_prefix_exactly() {
        let mut ctx = Ctx::new();
        // quantified over two variables but neither side uses both
        let head = ctx.atom("p", &[0]);
        let body = ctx.atom("q", &[0]);
        let f = Formula::forall(
            vec![Var::new(0), Var::new(1)],
            Formula::iff(head, body),
        );
        assert!(as_predicate_definition(&f).is_none());
    }

    #[test]
    fn test_nonflat_heads_are_rejected() {
        let mut ctx = Ctx::new();
        let c = ctx.sig.intern_function("c", 0);
        let p = ctx.sig.intern_predicate("p", 1);
        let q = ctx.sig.intern_predicate("q", 1);
        // neither p(c) nor q(c) has variable arguments
        let head = Formula::atom(Atom::predicate(p, vec![Term::constant(c)]));
        let body = Formula::atom(Atom::predicate(q, vec![Term::constant(c)]));
        let f = Formula::iff(head, body);
        assert!(as_predicate_definition(&f).is_none());
    }

    #[test]
    fn test_a_nullary_side_is_a_valid_head() {
        let mut ctx = Ctx::new();
        let c = ctx.sig.intern_function("c", 0);
        let p = ctx.sig.intern_predicate("p", 1);
        // p(c) <=> q defines the nullary q: empty arguments match the
        // empty prefix
        let left = Formula::atom(Atom::predicate(p, vec![Term::constant(c)]));
        let right = ctx.atom("q", &[]);
        let f = Formula::iff(left, right);
        let def = as_predicate_definition(&f).unwrap();
        assert!(def.head_on_right);
    }

    #[test]
    fn test_function_definition_and_its_clause_form() {
        let mut ctx = Ctx::new();
        let f = ctx.sig.intern_function("f", 1);
        let g = ctx.sig.intern_function("g", 1);
        let x = Term::var(Var::new(0));
        let lhs = Term::compound(f, vec![x.clone()]);
        let rhs = Term::compound(g, vec![x]);

        let formula = Formula::forall(
            vec![Var::new(0)],
            Formula::atom(Atom::equality(lhs.clone(), rhs.clone())),
        );
        let (defined, _) = as_function_definition(&formula).unwrap();
        assert_eq!(defined, lhs);

        let clause = Clause::new(vec![Literal::positive(Atom::equality(lhs.clone(), rhs))]);
        let (defined, _) = clause_function_definition(&clause).unwrap();
        assert_eq!(defined, lhs);
    }
}
