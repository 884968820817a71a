//! Immutable puzzle catalog: validated at load, read-only thereafter.
//!
//! Loading is fail-fast: every record is validated and a single bad one
//! fails the whole call, so a catalog either exists completely or not at
//! all. Lookups never mutate.

use std::collections::{HashMap, HashSet};

use tracing::{info, instrument};

use crate::domain::{Puzzle, PuzzleDef};
use crate::error::EngineError;

#[derive(Debug)]
pub struct Catalog {
  by_id: HashMap<String, Puzzle>,
  /// Insertion order of the source records; the default traversal order.
  order: Vec<String>,
}

impl Catalog {
  /// Validate raw records into a catalog.
  ///
  /// Rejected per record: duplicate id, fewer than two choices,
  /// duplicate choice labels, empty or out-of-range answer key, and a
  /// single-select key with more than one index.
  #[instrument(level = "info", skip(defs), fields(records = defs.len()))]
  pub fn load(defs: Vec<PuzzleDef>) -> Result<Self, EngineError> {
    let mut by_id = HashMap::with_capacity(defs.len());
    let mut order = Vec::with_capacity(defs.len());

    for def in defs {
      let puzzle = validate(def)?;
      if by_id.contains_key(&puzzle.id) {
        return Err(EngineError::Validation {
          id: puzzle.id,
          reason: "duplicate puzzle id".into(),
        });
      }
      order.push(puzzle.id.clone());
      by_id.insert(puzzle.id.clone(), puzzle);
    }

    info!(target: "quiz", puzzles = order.len(), "catalog loaded");
    Ok(Self { by_id, order })
  }

  pub fn lookup(&self, id: &str) -> Result<&Puzzle, EngineError> {
    self
      .by_id
      .get(id)
      .ok_or_else(|| EngineError::PuzzleNotFound(id.to_string()))
  }

  /// Ids in original record order, optionally narrowed to one category.
  pub fn list_ids(&self, category: Option<&str>) -> Vec<String> {
    self
      .order
      .iter()
      .filter(|id| match category {
        Some(cat) => self.by_id[id.as_str()].category == cat,
        None => true,
      })
      .cloned()
      .collect()
  }

  /// Puzzles in original record order.
  pub fn iter(&self) -> impl Iterator<Item = &Puzzle> {
    self.order.iter().map(|id| &self.by_id[id.as_str()])
  }

  pub fn len(&self) -> usize {
    self.order.len()
  }

  pub fn is_empty(&self) -> bool {
    self.order.is_empty()
  }
}

fn validate(def: PuzzleDef) -> Result<Puzzle, EngineError> {
  let fail = |id: &str, reason: &str| EngineError::Validation {
    id: id.to_string(),
    reason: reason.to_string(),
  };

  if def.choices.len() < 2 {
    return Err(fail(&def.id, "needs at least two choices"));
  }
  let mut labels = HashSet::new();
  for label in &def.choices {
    if !labels.insert(label.as_str()) {
      return Err(fail(&def.id, "duplicate choice label"));
    }
  }

  let correct: std::collections::BTreeSet<usize> = def.correct.iter().copied().collect();
  if correct.is_empty() {
    return Err(fail(&def.id, "empty answer key"));
  }
  if let Some(&out) = correct.iter().find(|&&i| i >= def.choices.len()) {
    return Err(fail(
      &def.id,
      &format!("answer key index {} out of range", out),
    ));
  }
  if !def.multi_select && correct.len() != 1 {
    return Err(fail(&def.id, "single-select puzzle with more than one correct index"));
  }

  Ok(Puzzle {
    id: def.id,
    category: def.category,
    prompt: def.prompt,
    choices: def.choices,
    correct_choices: correct,
    multi_select: def.multi_select,
    explanation: def.explanation,
  })
}
