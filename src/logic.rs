//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! Each operation resolves a session handle, takes that session's lock
//! for the duration of one state-machine transition, and returns a
//! protocol DTO. Nothing here formats transport responses.

use std::collections::{BTreeSet, HashSet};

use chrono::Utc;
use tracing::{info, instrument};

use crate::domain::SessionState;
use crate::error::EngineError;
use crate::protocol::{
  to_out, AnswerOut, CatalogOut, ExpireOut, PuzzleOut, StartSessionOut, SummaryOut,
};
use crate::scoreboard::summarize;
use crate::state::AppState;

#[instrument(level = "debug", skip(state))]
pub fn list_catalog(state: &AppState, category: Option<&str>) -> CatalogOut {
  let ids = state.catalog.list_ids(category);
  let total = ids.len();
  CatalogOut { ids, total }
}

/// Start a session over an explicit id list, or over the whole catalog
/// (optionally narrowed by category) when no list is given.
#[instrument(level = "info", skip(state, puzzle_ids), fields(%shuffle))]
pub async fn start_session(
  state: &AppState,
  puzzle_ids: Option<Vec<String>>,
  category: Option<String>,
  shuffle: bool,
) -> Result<StartSessionOut, EngineError> {
  let order = match puzzle_ids {
    Some(ids) => {
      let mut seen = HashSet::new();
      for id in &ids {
        state.catalog.lookup(id)?;
        if !seen.insert(id.as_str()) {
          return Err(EngineError::Validation {
            id: id.clone(),
            reason: "puzzle id repeated in session order".into(),
          });
        }
      }
      ids
    }
    None => state.catalog.list_ids(category.as_deref()),
  };

  let session = state.sessions.create_session(order, shuffle, Utc::now()).await;
  let puzzle = match session.current_puzzle_id() {
    Ok(id) => Some(to_out(state.catalog.lookup(id)?)),
    Err(_) => None,
  };

  info!(
    target: "quiz",
    session_id = %session.id,
    total = session.puzzle_order.len(),
    state = %session.state,
    "session started"
  );
  Ok(StartSessionOut {
    session_id: session.id,
    total: session.puzzle_order.len(),
    puzzle,
  })
}

#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn current_puzzle(state: &AppState, session_id: &str) -> Result<PuzzleOut, EngineError> {
  let handle = state.sessions.get(session_id).await?;
  let session = handle.lock().await;
  let id = session.current_puzzle_id()?;
  Ok(to_out(state.catalog.lookup(id)?))
}

#[instrument(level = "info", skip(state, choices), fields(%session_id, %puzzle_id, choices = choices.len()))]
pub async fn submit_answer(
  state: &AppState,
  session_id: &str,
  puzzle_id: &str,
  choices: &[usize],
) -> Result<AnswerOut, EngineError> {
  let puzzle = state.catalog.lookup(puzzle_id)?;
  let submitted: BTreeSet<usize> = choices.iter().copied().collect();

  let handle = state.sessions.get(session_id).await?;
  let mut session = handle.lock().await;
  let verdict = session.submit(puzzle, submitted, Utc::now())?;

  info!(target: "quiz", %session_id, %puzzle_id, ?verdict, state = %session.state, "answer graded");
  Ok(AnswerOut {
    verdict,
    explanation: Some(puzzle.explanation.clone()),
    next_puzzle_id: session.current_puzzle_id().ok().map(|id| id.to_string()),
    completed: session.state == SessionState::Completed,
  })
}

#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn skip_current(state: &AppState, session_id: &str) -> Result<AnswerOut, EngineError> {
  let handle = state.sessions.get(session_id).await?;
  let mut session = handle.lock().await;
  let verdict = session.skip(Utc::now())?;

  info!(target: "quiz", %session_id, state = %session.state, "puzzle skipped");
  Ok(AnswerOut {
    verdict,
    explanation: None,
    next_puzzle_id: session.current_puzzle_id().ok().map(|id| id.to_string()),
    completed: session.state == SessionState::Completed,
  })
}

#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn session_summary(state: &AppState, session_id: &str) -> Result<SummaryOut, EngineError> {
  let handle = state.sessions.get(session_id).await?;
  let session = handle.lock().await;
  let summary = summarize(&session, &state.catalog);
  Ok(SummaryOut {
    session_id: session.id.clone(),
    state: session.state,
    total_answered: summary.total_answered,
    total_correct: summary.total_correct,
    per_category: summary.per_category,
  })
}

#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn expire_session(state: &AppState, session_id: &str) -> Result<ExpireOut, EngineError> {
  let handle = state.sessions.get(session_id).await?;
  let mut session = handle.lock().await;
  session.expire()?;
  info!(target: "quiz", %session_id, "session expired explicitly");
  Ok(ExpireOut { state: session.state })
}
