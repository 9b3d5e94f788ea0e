//! Preprocessing configuration

use serde::{Deserialize, Serialize};

/// Switches for the preprocessing pipeline.
///
/// The defaults enable every check and simplification; turning a flag off
/// skips the corresponding stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Reject problems whose symbols are used with inconsistent arities
    pub arity_check: bool,
    /// Accept formula units with free variables. When false, a free
    /// variable outside a conjecture is an error.
    pub allow_free_vars: bool,
    /// Drop input axioms that restate the built-in equality axioms
    pub remove_equality_axioms: bool,
    /// Delete or weaken definitions whose symbol is unused elsewhere
    pub remove_unused_definitions: bool,
    /// Narrow quantifier scopes before Skolemization
    pub miniscope: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        PreprocessConfig {
            arity_check: true,
            allow_free_vars: true,
            remove_equality_axioms: true,
            remove_unused_definitions: true,
            miniscope: true,
        }
    }
}
