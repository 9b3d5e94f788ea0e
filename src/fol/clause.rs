//! Clauses: disjunctions of literals

use super::literal::Literal;
use super::signature::Signature;
use super::term::Var;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A clause, implicitly universally quantified
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clause {
    pub literals: Vec<Literal>,
}

impl Clause {
    pub fn new(literals: Vec<Literal>) -> Clause {
        Clause { literals }
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// The clause with its literals in the canonical total order.
    ///
    /// Two clauses that differ only in literal order normalize to the same
    /// value, so normalized clauses can be compared for duplicates directly.
    pub fn normalized(&self) -> Clause {
        let mut literals = self.literals.clone();
        literals.sort();
        Clause { literals }
    }

    pub fn collect_vars(&self, out: &mut Vec<Var>) {
        for lit in &self.literals {
            lit.atom.collect_vars(out);
        }
    }

    pub fn display<'a>(&'a self, signature: &'a Signature) -> ClauseDisplay<'a> {
        ClauseDisplay {
            clause: self,
            signature,
        }
    }
}

/// Helper for displaying clauses with resolved names
pub struct ClauseDisplay<'a> {
    clause: &'a Clause,
    signature: &'a Signature,
}

impl fmt::Display for ClauseDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clause.is_empty() {
            return write!(f, "$false");
        }
        for (i, lit) in self.clause.literals.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}", lit.display(self.signature))?;
        }
        Ok(())
    }
}
