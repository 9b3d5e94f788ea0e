//! Problems: input units and the preprocessing pipeline

use crate::config::PreprocessConfig;
use crate::fol::{
    Atom, Clause, Formula, FormulaData, FunctionSymbol, Literal, Signature,
    SignatureError, TermData,
};
use crate::nf::{
    as_function_definition, as_predicate_definition, clausify, clause_function_definition,
    ennf, flatten, miniscope, rectify, rectify_with_answer, recognize_clause,
    recognize_formula, remove_iff, skolemize, SymCounter,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The role of an input unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputKind {
    Axiom,
    Hypothesis,
    Conjecture,
}

/// Definition marker set by [`Problem::find_definitions`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefType {
    #[default]
    None,
    Predicate,
    Function,
}

/// The payload of a unit: a formula before clausification, or a clause
#[derive(Debug, Clone)]
pub enum UnitContent {
    Formula(Formula),
    Clause(Clause),
}

/// One named input statement
#[derive(Debug, Clone)]
pub struct Unit {
    pub name: String,
    pub kind: InputKind,
    pub def_type: DefType,
    pub content: UnitContent,
}

impl Unit {
    pub fn formula(name: impl Into<String>, kind: InputKind, f: Formula) -> Unit {
        Unit {
            name: name.into(),
            kind,
            def_type: DefType::None,
            content: UnitContent::Formula(f),
        }
    }

    pub fn clause(name: impl Into<String>, kind: InputKind, c: Clause) -> Unit {
        Unit {
            name: name.into(),
            kind,
            def_type: DefType::None,
            content: UnitContent::Clause(c),
        }
    }
}

/// Errors that abort preprocessing. No partial results are produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreprocessError {
    Signature(SignatureError),
    /// A formula unit has free variables and the configuration forbids them
    FreeVariables { unit: String },
}

impl fmt::Display for PreprocessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreprocessError::Signature(err) => write!(f, "{}", err),
            PreprocessError::FreeVariables { unit } => {
                write!(f, "formula unit '{}' has free variables", unit)
            }
        }
    }
}

impl std::error::Error for PreprocessError {}

impl From<SignatureError> for PreprocessError {
    fn from(err: SignatureError) -> Self {
        PreprocessError::Signature(err)
    }
}

/// An input problem and its preprocessing state.
///
/// After a successful [`Problem::preprocess`] every unit holds a clause.
#[derive(Debug, Clone)]
pub struct Problem {
    units: Vec<Unit>,
    answer_literal: Option<Literal>,
    has_formulas: bool,
}

impl Problem {
    /// Build a problem. Conjecture formulas are negated on ingestion: the
    /// prover refutes the negation.
    pub fn new(units: Vec<Unit>) -> Problem {
        let mut has_formulas = false;
        let units = units
            .into_iter()
            .map(|mut u| {
                if let UnitContent::Formula(f) = &u.content {
                    has_formulas = true;
                    if u.kind == InputKind::Conjecture {
                        u.content = UnitContent::Formula(Formula::not(f.clone()));
                    }
                }
                u
            })
            .collect();
        Problem {
            units,
            answer_literal: None,
            has_formulas,
        }
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// The answer literal built from the conjecture's free variables, if any
    pub fn answer_literal(&self) -> Option<&Literal> {
        self.answer_literal.as_ref()
    }

    /// All clauses; complete only after preprocessing
    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.units.iter().filter_map(|u| match &u.content {
            UnitContent::Clause(c) => Some(c),
            UnitContent::Formula(_) => None,
        })
    }

    /// Run the full pipeline. The stages run in a fixed order; a failed
    /// check aborts before any unit is rewritten.
    pub fn preprocess(
        &mut self,
        signature: &mut Signature,
        config: &PreprocessConfig,
    ) -> Result<(), PreprocessError> {
        if config.arity_check {
            signature.arity_check()?;
        }
        if !config.allow_free_vars {
            for u in &self.units {
                if let UnitContent::Formula(f) = &u.content {
                    if u.kind != InputKind::Conjecture && f.has_free_vars() {
                        return Err(PreprocessError::FreeVariables {
                            unit: u.name.clone(),
                        });
                    }
                }
            }
        }

        self.rectify(signature);
        self.flatten();
        if config.remove_equality_axioms {
            let removed = self.remove_equality_axioms();
            debug!("removed {} equality axioms", removed);
        }
        if self.has_formulas {
            let found = self.find_definitions();
            debug!("found {} definitions", found);
            if config.remove_unused_definitions {
                let removed = self.remove_unused_definitions(signature);
                debug!("removed {} unused definitions", removed);
            }
        }
        self.ennf();
        self.remove_iff();
        if config.miniscope {
            self.miniscope();
        }
        self.skolemize(signature);
        self.clausify();
        debug!(
            "preprocessing done, {} clauses",
            self.clauses().count()
        );
        Ok(())
    }

    fn rectify(&mut self, signature: &mut Signature) {
        let mut answer = None;
        for u in &mut self.units {
            let UnitContent::Formula(f) = &u.content else {
                continue;
            };
            let rectified = if u.kind == InputKind::Conjecture && answer.is_none() {
                let (g, binding) = rectify_with_answer(f);
                if !binding.original.is_empty() {
                    let p = signature.answer_predicate(binding.renamed.len() as u32);
                    answer = Some(Literal::positive(Atom::predicate(p, binding.renamed)));
                }
                g
            } else {
                rectify(f)
            };
            u.content = UnitContent::Formula(rectified);
        }
        self.answer_literal = answer;
    }

    fn flatten(&mut self) {
        for u in &mut self.units {
            if let UnitContent::Formula(f) = &u.content {
                let g = flatten(f);
                if !g.is_same(f) {
                    u.content = UnitContent::Formula(g);
                }
            }
        }
    }

    fn remove_equality_axioms(&mut self) -> usize {
        let before = self.units.len();
        self.units.retain(|u| match &u.content {
            UnitContent::Formula(f) => recognize_formula(f).is_none(),
            UnitContent::Clause(c) => recognize_clause(c).is_none(),
        });
        before - self.units.len()
    }

    /// Mark definition units, reordering sides so the defined symbol is on
    /// the left. Returns the number found.
    fn find_definitions(&mut self) -> usize {
        let mut found = 0;
        for u in &mut self.units {
            match &u.content {
                UnitContent::Clause(c) => {
                    let Some((lhs, rhs)) = clause_function_definition(c) else {
                        continue;
                    };
                    found += 1;
                    u.def_type = DefType::Function;
                    let stored = match c.literals[0].atom.sides() {
                        Some((l, _)) => l.clone(),
                        None => panic!("function definition without an equality"),
                    };
                    if stored != lhs {
                        let lit = Literal::positive(Atom::equality(lhs, rhs));
                        u.content = UnitContent::Clause(Clause::new(vec![lit]));
                    }
                }
                UnitContent::Formula(f) => {
                    if let Some(def) = as_predicate_definition(f) {
                        found += 1;
                        u.def_type = DefType::Predicate;
                        if def.head_on_right {
                            let (prefix, _) = f.strip_universal_prefix();
                            let iff = Formula::iff(Formula::atom(def.head), def.body);
                            let g = if prefix.is_empty() {
                                iff
                            } else {
                                Formula::forall(prefix, iff)
                            };
                            u.content = UnitContent::Formula(g);
                        }
                    } else if let Some((lhs, rhs)) = as_function_definition(f) {
                        found += 1;
                        u.def_type = DefType::Function;
                        let (prefix, body) = f.strip_universal_prefix();
                        let stored = match body.as_atom().and_then(Atom::sides) {
                            Some((l, _)) => l.clone(),
                            None => panic!("function definition without an equality"),
                        };
                        if stored != lhs {
                            let eq = Formula::atom(Atom::equality(lhs, rhs));
                            let g = if prefix.is_empty() {
                                eq
                            } else {
                                Formula::forall(prefix, eq)
                            };
                            u.content = UnitContent::Formula(g);
                        }
                    }
                }
            }
        }
        found
    }

    /// Delete definitions of symbols with no other occurrences and weaken
    /// one-polarity predicate definitions to implications, to fixpoint.
    fn remove_unused_definitions(&mut self, signature: &Signature) -> usize {
        let mut counter = SymCounter::new(signature);
        for u in &self.units {
            match &u.content {
                UnitContent::Formula(f) => counter.count_formula(f, 1, 1),
                UnitContent::Clause(c) => counter.count_clause(c, 1),
            }
        }

        let mut removed = 0;
        let mut changed = true;
        while changed {
            changed = false;
            let mut i = 0;
            while i < self.units.len() {
                match self.units[i].def_type {
                    DefType::None => i += 1,
                    DefType::Predicate => {
                        if self.process_predicate_definition(i, &mut counter) {
                            removed += 1;
                            changed = true;
                            // the unit at i was deleted or demoted; either
                            // way re-examining index i is correct
                        } else {
                            i += 1;
                        }
                    }
                    DefType::Function => {
                        if self.process_function_definition(i, &mut counter) {
                            removed += 1;
                            changed = true;
                        } else {
                            i += 1;
                        }
                    }
                }
            }
        }
        removed
    }

    /// Returns true when the unit at `i` was deleted or weakened
    fn process_predicate_definition(&mut self, i: usize, counter: &mut SymCounter) -> bool {
        let f = match &self.units[i].content {
            UnitContent::Formula(f) => f.clone(),
            UnitContent::Clause(_) => panic!("predicate definition stored as a clause"),
        };
        let (prefix, body) = f.strip_universal_prefix();
        let (head_formula, body_formula) = match body.data() {
            FormulaData::Iff(l, r) => (l.clone(), r.clone()),
            _ => panic!("predicate definition without an equivalence"),
        };
        let p = match head_formula.as_atom().and_then(Atom::predicate_symbol) {
            Some(p) => p,
            None => panic!("predicate definition with a non-atomic head"),
        };

        let counts = counter.predicate(p);
        if counts.dual > 1 {
            // the symbol sits under another equivalence
            return false;
        }
        if counts.pos > 0 && counts.neg > 0 {
            return false;
        }
        if counts.pos > 0 || counts.neg > 0 {
            // one polarity: keep only the needed direction
            let imp = if counts.pos > 0 {
                Formula::imp(head_formula, body_formula)
            } else {
                Formula::imp(body_formula, head_formula)
            };
            let g = if prefix.is_empty() {
                imp
            } else {
                Formula::forall(prefix, imp)
            };
            counter.count_formula(&f, 1, -1);
            counter.count_formula(&g, 1, 1);
            let unit = &mut self.units[i];
            unit.content = UnitContent::Formula(g);
            unit.def_type = DefType::None;
            return true;
        }
        // no occurrences outside the definition
        counter.count_formula(&f, 1, -1);
        self.units.remove(i);
        true
    }

    /// Returns true when the unit at `i` was deleted
    fn process_function_definition(&mut self, i: usize, counter: &mut SymCounter) -> bool {
        let fun = self.defined_function(i);
        if counter.function(fun).occurrences > 1 {
            return false;
        }
        match &self.units[i].content {
            UnitContent::Formula(f) => {
                let f = f.clone();
                counter.count_formula(&f, 1, -1);
            }
            UnitContent::Clause(c) => {
                let c = c.clone();
                counter.count_clause(&c, -1);
            }
        }
        self.units.remove(i);
        true
    }

    fn defined_function(&self, i: usize) -> FunctionSymbol {
        let lhs = match &self.units[i].content {
            UnitContent::Clause(c) => match c.literals[0].atom.sides() {
                Some((l, _)) => l.clone(),
                None => panic!("function definition without an equality"),
            },
            UnitContent::Formula(f) => {
                let (_, body) = f.strip_universal_prefix();
                match body.as_atom().and_then(Atom::sides) {
                    Some((l, _)) => l.clone(),
                    None => panic!("function definition without an equality"),
                }
            }
        };
        match lhs.data() {
            TermData::Compound(fun, _) => *fun,
            _ => panic!("function definition with a variable head"),
        }
    }

    fn ennf(&mut self) {
        if !self.has_formulas {
            return;
        }
        for u in &mut self.units {
            if let UnitContent::Formula(f) = &u.content {
                let g = ennf(f, true);
                if !g.is_same(f) {
                    u.content = UnitContent::Formula(g);
                }
            }
        }
    }

    fn remove_iff(&mut self) {
        if !self.has_formulas {
            return;
        }
        for u in &mut self.units {
            if let UnitContent::Formula(f) = &u.content {
                let g = remove_iff(f);
                if !g.is_same(f) {
                    // the fresh implications need renormalizing
                    u.content = UnitContent::Formula(ennf(&g, true));
                }
            }
        }
    }

    fn miniscope(&mut self) {
        if !self.has_formulas {
            return;
        }
        for u in &mut self.units {
            // answer variables must keep their names, so conjectures with
            // an answer literal are left alone
            if u.kind == InputKind::Conjecture && self.answer_literal.is_some() {
                continue;
            }
            if let UnitContent::Formula(f) = &u.content {
                let g = miniscope(f);
                if !g.is_same(f) {
                    u.content = UnitContent::Formula(rectify(&g));
                }
            }
        }
    }

    fn skolemize(&mut self, signature: &mut Signature) {
        if !self.has_formulas {
            return;
        }
        for u in &mut self.units {
            if let UnitContent::Formula(f) = &u.content {
                let g = skolemize(f, signature);
                if !g.is_same(f) {
                    u.content = UnitContent::Formula(g);
                }
            }
        }
    }

    fn clausify(&mut self) {
        if !self.has_formulas {
            return;
        }
        let mut result = Vec::with_capacity(self.units.len());
        for u in self.units.drain(..) {
            match u.content {
                UnitContent::Clause(_) => result.push(u),
                UnitContent::Formula(f) => {
                    let seed = match (&u.kind, &self.answer_literal) {
                        (InputKind::Conjecture, Some(lit)) => vec![lit.clone()],
                        _ => vec![],
                    };
                    let clauses = clausify(&f, seed);
                    let many = clauses.len() > 1;
                    for (k, c) in clauses.into_iter().enumerate() {
                        let name = if many {
                            format!("{}_{}", u.name, k + 1)
                        } else {
                            u.name.clone()
                        };
                        result.push(Unit::clause(name, u.kind, c));
                    }
                }
            }
        }
        self.units = result;
    }
}
