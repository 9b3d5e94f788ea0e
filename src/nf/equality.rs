//! Recognizers for the standard equality axioms
//!
//! When the calculus builds equality reasoning in, input axiomatizations of
//! equality are redundant. These recognizers identify the five standard
//! shapes, up to variable names, side swaps, and conjunct order, both on
//! formulas (before normalization, implications still present) and on
//! clauses.

use crate::fol::{Atom, Clause, Formula, FormulaData, Literal};

/// The recognized axiom shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqualityAxiom {
    /// t = t
    Reflexivity,
    /// s = t implies t = s
    Symmetry,
    /// s = t and t = u imply s = u
    Transitivity,
    /// x = y implies f(..x..) = f(..y..)
    FunctionCongruence,
    /// x = y and p(..x..) imply p(..y..)
    PredicateCongruence,
}

/// Recognize an equality axiom stated as a formula, under any universal
/// prefix
pub fn recognize_formula(f: &Formula) -> Option<EqualityAxiom> {
    let (_, body) = f.strip_universal_prefix();

    if let Some(a) = body.as_atom() {
        if a.is_reflexive() {
            return Some(EqualityAxiom::Reflexivity);
        }
        return None;
    }

    let (premise, conclusion) = match body.data() {
        FormulaData::Imp(l, r) => (l.clone(), r.clone()),
        _ => return None,
    };
    let conclusion = conclusion.as_atom()?;

    if let Some(p) = premise.as_atom() {
        if conclusion.is_swap_of(p) {
            return Some(EqualityAxiom::Symmetry);
        }
        if Atom::function_congruence_of(p, conclusion) {
            return Some(EqualityAxiom::FunctionCongruence);
        }
        return None;
    }

    // two-premise shapes: the premise is a binary conjunction
    let conjuncts = match premise.data() {
        FormulaData::And(args) if args.len() == 2 => args,
        _ => return None,
    };
    let first = conjuncts[0].as_atom()?;
    let second = conjuncts[1].as_atom()?;

    if Atom::transitivity_of(first, second, conclusion) {
        return Some(EqualityAxiom::Transitivity);
    }
    if Atom::predicate_congruence_of(first, second, conclusion)
        || Atom::predicate_congruence_of(second, first, conclusion)
    {
        return Some(EqualityAxiom::PredicateCongruence);
    }
    None
}

/// Recognize an equality axiom stated as a clause
pub fn recognize_clause(c: &Clause) -> Option<EqualityAxiom> {
    let (negatives, positives): (Vec<&Literal>, Vec<&Literal>) = {
        let mut neg = Vec::new();
        let mut pos = Vec::new();
        for lit in &c.literals {
            if lit.polarity {
                pos.push(lit);
            } else {
                neg.push(lit);
            }
        }
        (neg, pos)
    };
    if positives.len() != 1 {
        return None;
    }
    let conclusion = &positives[0].atom;

    match negatives.len() {
        0 => {
            if c.len() == 1 && conclusion.is_reflexive() {
                Some(EqualityAxiom::Reflexivity)
            } else {
                None
            }
        }
        1 => {
            let premise = &negatives[0].atom;
            if conclusion.is_swap_of(premise) {
                Some(EqualityAxiom::Symmetry)
            } else if Atom::function_congruence_of(premise, conclusion) {
                Some(EqualityAxiom::FunctionCongruence)
            } else {
                None
            }
        }
        2 => {
            let first = &negatives[0].atom;
            let second = &negatives[1].atom;
            if Atom::transitivity_of(first, second, conclusion) {
                Some(EqualityAxiom::Transitivity)
            } else if Atom::predicate_congruence_of(first, second, conclusion)
                || Atom::predicate_congruence_of(second, first, conclusion)
            {
                Some(EqualityAxiom::PredicateCongruence)
            } else {
                None
            }
        }
        _ => None,
    }
}
