//! Domain models used by the engine: puzzles, verdicts, session lifecycle, and summaries.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Grading outcome for one submitted answer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
  Correct,
  Incorrect,
  Skipped,
}

/// Session lifecycle. Transitions only move forward
/// (Active -> Completed | Expired); terminal states never reopen.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
  Active,
  Completed,
  Expired,
}

impl SessionState {
  pub fn is_terminal(self) -> bool {
    matches!(self, SessionState::Completed | SessionState::Expired)
  }
}

impl fmt::Display for SessionState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      SessionState::Active => "active",
      SessionState::Completed => "completed",
      SessionState::Expired => "expired",
    };
    f.write_str(s)
  }
}

/// Raw puzzle record as supplied by the TOML bank or the built-in seeds.
/// Turned into a validated `Puzzle` by the catalog loader.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PuzzleDef {
  pub id: String,
  pub category: String,
  pub prompt: String,
  pub choices: Vec<String>,
  /// Indices into `choices`. Duplicates collapse during validation.
  pub correct: Vec<usize>,
  #[serde(default)] pub multi_select: bool,
  #[serde(default)] pub explanation: String,
}

/// Validated puzzle held by the catalog. Immutable once loaded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Puzzle {
  pub id: String,
  pub category: String,
  /// Opaque text/code snippet shown to the user. Never executed or parsed.
  pub prompt: String,
  pub choices: Vec<String>,
  pub correct_choices: BTreeSet<usize>,
  pub multi_select: bool,
  /// Opaque explanation, revealed only after grading.
  pub explanation: String,
}

/// Derived score report. Recomputed from a session's verdicts on every
/// call; never an independent source of truth.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Summary {
  pub total_answered: usize,
  pub total_correct: usize,
  pub per_category: BTreeMap<String, CategoryCount>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
pub struct CategoryCount {
  pub answered: usize,
  pub correct: usize,
}
