//! Symbol table for function and predicate symbols

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for an interned function symbol
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FunId(pub u32);

/// Identifier for an interned predicate symbol
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PredId(pub u32);

/// A function symbol with its arity
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FunctionSymbol {
    pub id: FunId,
    pub arity: u32,
}

/// A predicate symbol with its arity
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PredicateSymbol {
    pub id: PredId,
    pub arity: u32,
}

/// Errors detected while checking the symbol table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// The same name was used with two different arities
    ArityMismatch {
        name: String,
        first: u32,
        second: u32,
    },
    /// The same name was used both as a function and as a predicate
    MixedSymbol { name: String },
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureError::ArityMismatch {
                name,
                first,
                second,
            } => write!(
                f,
                "symbol '{}' used with arities {} and {}",
                name, first, second
            ),
            SignatureError::MixedSymbol { name } => write!(
                f,
                "symbol '{}' used both as a function and as a predicate",
                name
            ),
        }
    }
}

impl std::error::Error for SignatureError {}

/// One interning namespace: names, arities, and a name lookup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SymbolTable {
    names: Vec<String>,
    arities: Vec<u32>,
    lookup: IndexMap<String, u32>,
}

impl SymbolTable {
    /// Get or create an id. A re-use with a different arity keeps the first
    /// arity and reports the conflict.
    fn intern(&mut self, name: &str, arity: u32) -> (u32, Option<SignatureError>) {
        if let Some(&id) = self.lookup.get(name) {
            let known = self.arities[id as usize];
            let conflict = if known != arity {
                Some(SignatureError::ArityMismatch {
                    name: name.to_string(),
                    first: known,
                    second: arity,
                })
            } else {
                None
            };
            return (id, conflict);
        }
        let id = self.names.len() as u32;
        self.names.push(name.to_string());
        self.arities.push(arity);
        self.lookup.insert(name.to_string(), id);
        (id, None)
    }

    fn contains(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    fn name(&self, id: u32) -> &str {
        &self.names[id as usize]
    }

    fn len(&self) -> usize {
        self.names.len()
    }
}

/// The symbol table of a problem.
///
/// Owned by the caller and passed explicitly to every pipeline stage that
/// needs to create or resolve symbols. Equality is not interned; it is a
/// first-class atom case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Signature {
    functions: SymbolTable,
    predicates: SymbolTable,
    #[serde(skip)]
    conflicts: Vec<SignatureError>,
    next_skolem: u32,
}

/// Reserved predicate name for answer literals
pub const ANSWER_PREDICATE: &str = "$answer";

impl Signature {
    pub fn new() -> Self {
        Signature::default()
    }

    pub fn intern_function(&mut self, name: &str, arity: u32) -> FunctionSymbol {
        let (id, conflict) = self.functions.intern(name, arity);
        self.conflicts.extend(conflict);
        FunctionSymbol {
            id: FunId(id),
            arity: self.functions.arities[id as usize],
        }
    }

    pub fn intern_predicate(&mut self, name: &str, arity: u32) -> PredicateSymbol {
        let (id, conflict) = self.predicates.intern(name, arity);
        self.conflicts.extend(conflict);
        PredicateSymbol {
            id: PredId(id),
            arity: self.predicates.arities[id as usize],
        }
    }

    pub fn function_name(&self, id: FunId) -> &str {
        self.functions.name(id.0)
    }

    pub fn predicate_name(&self, id: PredId) -> &str {
        self.predicates.name(id.0)
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }

    /// Report the first symbol-table inconsistency: an arity conflict
    /// recorded during interning, or a name shared between the function and
    /// predicate namespaces.
    pub fn arity_check(&self) -> Result<(), SignatureError> {
        if let Some(err) = self.conflicts.first() {
            return Err(err.clone());
        }
        for name in &self.functions.names {
            if self.predicates.contains(name) {
                return Err(SignatureError::MixedSymbol { name: name.clone() });
            }
        }
        Ok(())
    }

    /// Create a fresh Skolem function, skipping names already taken
    pub fn fresh_skolem_function(&mut self, arity: u32) -> FunctionSymbol {
        loop {
            let name = format!("sk{}", self.next_skolem);
            self.next_skolem += 1;
            if !self.functions.contains(&name) && !self.predicates.contains(&name) {
                return self.intern_function(&name, arity);
            }
        }
    }

    /// The reserved answer predicate, interned on first use
    pub fn answer_predicate(&mut self, arity: u32) -> PredicateSymbol {
        self.intern_predicate(ANSWER_PREDICATE, arity)
    }
}
