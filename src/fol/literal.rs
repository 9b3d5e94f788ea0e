//! Signed literals

use super::atom::Atom;
use super::signature::Signature;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A literal: an atom with a sign
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    /// true for a positive literal
    pub polarity: bool,
    pub atom: Atom,
}

impl Literal {
    pub fn positive(atom: Atom) -> Literal {
        Literal {
            polarity: true,
            atom,
        }
    }

    pub fn negative(atom: Atom) -> Literal {
        Literal {
            polarity: false,
            atom,
        }
    }

    pub fn new(polarity: bool, atom: Atom) -> Literal {
        Literal { polarity, atom }
    }

    pub fn display<'a>(&'a self, signature: &'a Signature) -> LiteralDisplay<'a> {
        LiteralDisplay {
            literal: self,
            signature,
        }
    }
}

/// Helper for displaying literals with resolved names
pub struct LiteralDisplay<'a> {
    literal: &'a Literal,
    signature: &'a Signature,
}

impl fmt::Display for LiteralDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.literal.polarity {
            write!(f, "~")?;
        }
        write!(f, "{}", self.literal.atom.display(self.signature))
    }
}
