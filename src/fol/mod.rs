//! First-order logic data model: terms, atoms, literals, clauses, formulas

pub mod atom;
pub mod clause;
pub mod formula;
pub mod literal;
pub mod signature;
pub mod substitution;
pub mod term;

pub use atom::{Atom, AtomData};
pub use clause::Clause;
pub use formula::{Formula, FormulaData, Junction, Quantifier};
pub use literal::Literal;
pub use signature::{
    FunId, FunctionSymbol, PredId, PredicateSymbol, Signature, SignatureError,
};
pub use substitution::Substitution;
pub use term::{Term, TermData, Var};
