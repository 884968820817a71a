//! Engine error taxonomy.
//!
//! Every precondition violation surfaces here at the point it is
//! detected; no component patches up invalid input (no clamping of
//! out-of-range indices, no partial catalog on a bad record). The route
//! layer maps these kinds to HTTP statuses; the core never formats
//! responses.

use thiserror::Error;

use crate::domain::SessionState;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
  /// Malformed catalog input. Fatal to that load call; the catalog is
  /// not partially constructed.
  #[error("invalid puzzle record `{id}`: {reason}")]
  Validation { id: String, reason: String },

  #[error("unknown puzzle id `{0}`")]
  PuzzleNotFound(String),

  #[error("unknown session id `{0}`")]
  SessionNotFound(String),

  /// Answers must follow the session's puzzle order; no skipping ahead,
  /// no resubmission of a past puzzle.
  #[error("puzzle `{submitted}` is not the current puzzle (expected `{expected}`)")]
  OutOfOrder { submitted: String, expected: String },

  /// Mutating operation on a terminal session.
  #[error("session is {state} and no longer accepts mutations")]
  State { state: SessionState },

  #[error("choice index {index} is out of range (puzzle has {len} choices)")]
  InvalidChoice { index: usize, len: usize },

  /// Redundant explicit `expire` on a session that is already terminal.
  #[error("session is already {state}")]
  AlreadyTerminal { state: SessionState },

  /// The session has no current puzzle (every puzzle answered, or the
  /// session is no longer active).
  #[error("session has no current puzzle")]
  SessionComplete,
}
