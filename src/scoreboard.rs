//! Scoreboard: a pure read projection over a session's verdicts.
//!
//! Recomputed on every call so it can never diverge from the session;
//! nothing here is cached or persisted.

use std::collections::BTreeMap;

use crate::catalog::Catalog;
use crate::domain::{CategoryCount, Summary, Verdict};
use crate::session::Session;

/// Join recorded verdicts with each puzzle's category. Skipped and
/// Incorrect count toward `total_answered` but only Correct counts
/// toward `total_correct`.
pub fn summarize(session: &Session, catalog: &Catalog) -> Summary {
  let mut total_answered = 0;
  let mut total_correct = 0;
  let mut per_category: BTreeMap<String, CategoryCount> = BTreeMap::new();

  for id in &session.puzzle_order {
    let Some(verdict) = session.verdicts.get(id) else {
      continue;
    };
    // Session orders are validated against the catalog at creation.
    let Ok(puzzle) = catalog.lookup(id) else {
      continue;
    };
    let entry = per_category.entry(puzzle.category.clone()).or_default();
    total_answered += 1;
    entry.answered += 1;
    if *verdict == Verdict::Correct {
      total_correct += 1;
      entry.correct += 1;
    }
  }

  Summary {
    total_answered,
    total_correct,
    per_category,
  }
}
