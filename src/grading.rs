//! Pure grading: a submitted index set against the puzzle's answer key.
//!
//! No state, no I/O, safe to call from any number of callers at once.
//! Single- and multi-select puzzles grade through the same set-equality
//! check; `multi_select` only constrains the shape of the key at load
//! time.

use std::collections::BTreeSet;

use crate::domain::{Puzzle, Verdict};

/// Grade a submission. Order is irrelevant and duplicates have already
/// collapsed (the submission is a set). Indices are assumed range-checked
/// upstream; an out-of-range submission never reaches this function.
pub fn grade(puzzle: &Puzzle, submitted: &BTreeSet<usize>) -> Verdict {
  if *submitted == puzzle.correct_choices {
    Verdict::Correct
  } else {
    Verdict::Incorrect
  }
}
