//! HTTP endpoint handlers. These are thin wrappers that forward to core
//! logic and map engine errors onto HTTP statuses.

use std::sync::Arc;

use axum::{
  extract::{Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::instrument;

use crate::error::EngineError;
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

impl IntoResponse for EngineError {
  fn into_response(self) -> Response {
    let status = match &self {
      EngineError::Validation { .. }
      | EngineError::InvalidChoice { .. }
      | EngineError::OutOfOrder { .. } => StatusCode::BAD_REQUEST,
      EngineError::PuzzleNotFound(_) | EngineError::SessionNotFound(_) => StatusCode::NOT_FOUND,
      EngineError::State { .. }
      | EngineError::AlreadyTerminal { .. }
      | EngineError::SessionComplete => StatusCode::CONFLICT,
    };
    (status, Json(ErrorOut { error: self.to_string() })).into_response()
  }
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_catalog(
  State(state): State<Arc<AppState>>,
  Query(q): Query<CatalogQuery>,
) -> impl IntoResponse {
  Json(list_catalog(&state, q.category.as_deref()))
}

#[instrument(level = "info", skip(state, body), fields(shuffle = body.shuffle))]
pub async fn http_start_session(
  State(state): State<Arc<AppState>>,
  Json(body): Json<StartSessionIn>,
) -> Result<Json<StartSessionOut>, EngineError> {
  let out = start_session(&state, body.puzzle_ids, body.category, body.shuffle).await?;
  Ok(Json(out))
}

#[instrument(level = "info", skip(state), fields(%q.session_id))]
pub async fn http_current_puzzle(
  State(state): State<Arc<AppState>>,
  Query(q): Query<SessionQuery>,
) -> Result<Json<PuzzleOut>, EngineError> {
  Ok(Json(current_puzzle(&state, &q.session_id).await?))
}

#[instrument(level = "info", skip(state, body), fields(%body.session_id, %body.puzzle_id))]
pub async fn http_submit_answer(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AnswerIn>,
) -> Result<Json<AnswerOut>, EngineError> {
  let out = submit_answer(&state, &body.session_id, &body.puzzle_id, &body.choices).await?;
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, body), fields(%body.session_id))]
pub async fn http_skip(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SkipIn>,
) -> Result<Json<AnswerOut>, EngineError> {
  Ok(Json(skip_current(&state, &body.session_id).await?))
}

#[instrument(level = "info", skip(state), fields(%q.session_id))]
pub async fn http_summary(
  State(state): State<Arc<AppState>>,
  Query(q): Query<SessionQuery>,
) -> Result<Json<SummaryOut>, EngineError> {
  Ok(Json(session_summary(&state, &q.session_id).await?))
}

#[instrument(level = "info", skip(state, body), fields(%body.session_id))]
pub async fn http_expire(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ExpireIn>,
) -> Result<Json<ExpireOut>, EngineError> {
  Ok(Json(expire_session(&state, &body.session_id).await?))
}
