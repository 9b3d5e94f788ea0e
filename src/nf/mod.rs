//! The normalization pipeline: rectification through clausification

pub mod clausify;
pub mod definitions;
pub mod ennf;
pub mod equality;
pub mod flatten;
pub mod miniscope;
pub mod rectify;
pub mod skolemize;
pub mod sym_counter;


pub use clausify::clausify;
pub use definitions::{
    as_function_definition, as_predicate_definition, clause_function_definition,
    PredicateDefinition,
};
pub use ennf::{ennf, remove_iff};
pub use equality::{recognize_clause, recognize_formula, EqualityAxiom};
pub use flatten::flatten;
pub use miniscope::miniscope;
pub use rectify::{rectify, rectify_open, rectify_with_answer, AnswerBinding};
pub use skolemize::skolemize;
pub use sym_counter::SymCounter;
