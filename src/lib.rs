//! ClausAtlas: the clausal normal form front end of a first-order prover
//!
//! This library turns arbitrary first-order formulas into equisatisfiable
//! clause sets: rectification, NNF conversion, miniscoping, Skolemization
//! and clausification, plus the standard input simplifications (equality
//! axiom removal and definition elimination).

pub mod config;
pub mod fol;
pub mod nf;
pub mod problem;

// Re-export commonly used types from fol
pub use fol::{
    Atom, Clause, Formula, FunctionSymbol, Junction, Literal, PredicateSymbol, Quantifier,
    Signature, SignatureError, Substitution, Term, Var,
};

// Re-export the pipeline stages
pub use nf::{
    clausify, ennf, flatten, miniscope, rectify, rectify_open, remove_iff, skolemize,
    EqualityAxiom, SymCounter,
};

pub use config::PreprocessConfig;
pub use problem::{DefType, InputKind, PreprocessError, Problem, Unit, UnitContent};
