//! Per-attempt session state machine.
//!
//! A session walks an ordered puzzle list with a cursor. Answers land
//! strictly in order; each mutating operation validates everything it
//! needs before touching any field, so a failed call leaves the session
//! exactly as it was.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Puzzle, SessionState, Verdict};
use crate::error::EngineError;
use crate::grading::grade;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
  pub id: String,
  /// Ordered puzzle ids for this attempt; a subset or permutation of the
  /// catalog, fixed at creation.
  pub puzzle_order: Vec<String>,
  /// Index of the next unanswered puzzle. Monotonically non-decreasing,
  /// never exceeds `puzzle_order.len()`.
  pub cursor: usize,
  pub answers: HashMap<String, BTreeSet<usize>>,
  pub verdicts: HashMap<String, Verdict>,
  pub created_at: DateTime<Utc>,
  pub last_activity_at: DateTime<Utc>,
  pub state: SessionState,
}

impl Session {
  /// A session over an empty order has nothing to answer and is born
  /// Completed.
  pub fn new(id: String, puzzle_order: Vec<String>, now: DateTime<Utc>) -> Self {
    let state = if puzzle_order.is_empty() {
      SessionState::Completed
    } else {
      SessionState::Active
    };
    Self {
      id,
      puzzle_order,
      cursor: 0,
      answers: HashMap::new(),
      verdicts: HashMap::new(),
      created_at: now,
      last_activity_at: now,
      state,
    }
  }

  /// Id of the next unanswered puzzle.
  pub fn current_puzzle_id(&self) -> Result<&str, EngineError> {
    if self.state != SessionState::Active || self.cursor == self.puzzle_order.len() {
      return Err(EngineError::SessionComplete);
    }
    Ok(&self.puzzle_order[self.cursor])
  }

  /// Grade and record an answer for the current puzzle, then advance.
  /// `puzzle` is the catalog entry for the id the caller submitted.
  pub fn submit(
    &mut self,
    puzzle: &Puzzle,
    submitted: BTreeSet<usize>,
    now: DateTime<Utc>,
  ) -> Result<Verdict, EngineError> {
    self.check_active()?;
    let current = &self.puzzle_order[self.cursor];
    if puzzle.id != *current {
      return Err(EngineError::OutOfOrder {
        submitted: puzzle.id.clone(),
        expected: current.clone(),
      });
    }
    if let Some(&index) = submitted.iter().find(|&&i| i >= puzzle.choices.len()) {
      return Err(EngineError::InvalidChoice {
        index,
        len: puzzle.choices.len(),
      });
    }

    let verdict = grade(puzzle, &submitted);
    self.answers.insert(puzzle.id.clone(), submitted);
    self.verdicts.insert(puzzle.id.clone(), verdict);
    self.advance(now);
    Ok(verdict)
  }

  /// Record a Skipped verdict for the current puzzle and advance. No
  /// choice is required and no answer is stored.
  pub fn skip(&mut self, now: DateTime<Utc>) -> Result<Verdict, EngineError> {
    self.check_active()?;
    let current = self.puzzle_order[self.cursor].clone();
    self.verdicts.insert(current, Verdict::Skipped);
    self.advance(now);
    Ok(Verdict::Skipped)
  }

  /// Force the session into Expired. Only valid from Active; a redundant
  /// call on a terminal session is an error so callers notice.
  pub fn expire(&mut self) -> Result<(), EngineError> {
    if self.state.is_terminal() {
      return Err(EngineError::AlreadyTerminal { state: self.state });
    }
    self.state = SessionState::Expired;
    Ok(())
  }

  fn check_active(&self) -> Result<(), EngineError> {
    if self.state != SessionState::Active {
      return Err(EngineError::State { state: self.state });
    }
    Ok(())
  }

  fn advance(&mut self, now: DateTime<Utc>) {
    self.cursor += 1;
    if self.cursor == self.puzzle_order.len() {
      self.state = SessionState::Completed;
    }
    self.last_activity_at = now;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn puzzle(id: &str, correct: &[usize]) -> Puzzle {
    Puzzle {
      id: id.into(),
      category: "basics".into(),
      prompt: "what prints?".into(),
      choices: vec!["A".into(), "B".into(), "C".into()],
      correct_choices: correct.iter().copied().collect(),
      multi_select: correct.len() > 1,
      explanation: "because".into(),
    }
  }

  fn set(indices: &[usize]) -> BTreeSet<usize> {
    indices.iter().copied().collect()
  }

  #[test]
  fn correct_submit_advances_and_completes() {
    let p = puzzle("p1", &[0]);
    let mut s = Session::new("s1".into(), vec!["p1".into()], Utc::now());
    let verdict = s.submit(&p, set(&[0]), Utc::now()).expect("submit");
    assert_eq!(verdict, Verdict::Correct);
    assert_eq!(s.cursor, 1);
    assert_eq!(s.state, SessionState::Completed);
  }

  #[test]
  fn incorrect_submit_still_advances() {
    let p = puzzle("p1", &[0]);
    let mut s = Session::new("s1".into(), vec!["p1".into(), "p2".into()], Utc::now());
    let verdict = s.submit(&p, set(&[1]), Utc::now()).expect("submit");
    assert_eq!(verdict, Verdict::Incorrect);
    assert_eq!(s.cursor, 1);
    assert_eq!(s.state, SessionState::Active);
    assert_eq!(s.current_puzzle_id().unwrap(), "p2");
  }

  #[test]
  fn out_of_order_submit_leaves_session_untouched() {
    let p2 = puzzle("p2", &[0]);
    let mut s = Session::new("s1".into(), vec!["p1".into(), "p2".into()], Utc::now());
    let before = s.last_activity_at;
    let err = s.submit(&p2, set(&[0]), Utc::now()).unwrap_err();
    assert!(matches!(err, EngineError::OutOfOrder { .. }));
    assert_eq!(s.cursor, 0);
    assert!(s.answers.is_empty());
    assert!(s.verdicts.is_empty());
    assert_eq!(s.last_activity_at, before);
  }

  #[test]
  fn out_of_range_choice_is_rejected_before_any_mutation() {
    let p = puzzle("p1", &[0]);
    let mut s = Session::new("s1".into(), vec!["p1".into()], Utc::now());
    let err = s.submit(&p, set(&[7]), Utc::now()).unwrap_err();
    assert_eq!(err, EngineError::InvalidChoice { index: 7, len: 3 });
    assert_eq!(s.cursor, 0);
    assert!(s.answers.is_empty());
  }

  #[test]
  fn completed_session_rejects_further_mutations() {
    let p = puzzle("p1", &[0]);
    let mut s = Session::new("s1".into(), vec!["p1".into()], Utc::now());
    s.submit(&p, set(&[1]), Utc::now()).expect("first submit");
    assert_eq!(s.state, SessionState::Completed);

    let err = s.submit(&p, set(&[0]), Utc::now()).unwrap_err();
    assert_eq!(err, EngineError::State { state: SessionState::Completed });
    let err = s.skip(Utc::now()).unwrap_err();
    assert_eq!(err, EngineError::State { state: SessionState::Completed });
  }

  #[test]
  fn skip_records_verdict_without_an_answer() {
    let mut s = Session::new("s1".into(), vec!["p1".into(), "p2".into()], Utc::now());
    assert_eq!(s.skip(Utc::now()).expect("skip"), Verdict::Skipped);
    assert_eq!(s.verdicts.get("p1"), Some(&Verdict::Skipped));
    assert!(s.answers.is_empty());
    assert_eq!(s.current_puzzle_id().unwrap(), "p2");
  }

  #[test]
  fn empty_order_is_completed_at_creation() {
    let s = Session::new("s1".into(), vec![], Utc::now());
    assert_eq!(s.state, SessionState::Completed);
    assert_eq!(s.current_puzzle_id().unwrap_err(), EngineError::SessionComplete);
  }

  #[test]
  fn expire_only_moves_forward() {
    let mut s = Session::new("s1".into(), vec!["p1".into()], Utc::now());
    s.expire().expect("expire");
    assert_eq!(s.state, SessionState::Expired);
    let err = s.expire().unwrap_err();
    assert_eq!(err, EngineError::AlreadyTerminal { state: SessionState::Expired });
  }

  #[test]
  fn expired_session_rejects_submits() {
    let p = puzzle("p1", &[0]);
    let mut s = Session::new("s1".into(), vec!["p1".into()], Utc::now());
    s.expire().expect("expire");
    let err = s.submit(&p, set(&[0]), Utc::now()).unwrap_err();
    assert_eq!(err, EngineError::State { state: SessionState::Expired });
  }
}
