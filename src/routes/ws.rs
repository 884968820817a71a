//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;

use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::error::EngineError;
use crate::logic::*;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;
use crate::util::trunc_for_log;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "quizzle_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "quizzle_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "quizzle_backend", raw = %trunc_for_log(&txt, 256), "WS received");
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "quizzle_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "quizzle_backend", "WebSocket disconnected");
}

#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::StartSession { puzzle_ids, category, shuffle } => {
      match start_session(state, puzzle_ids, category, shuffle).await {
        Ok(out) => ServerWsMessage::SessionStarted {
          session_id: out.session_id,
          total: out.total,
          puzzle: out.puzzle,
        },
        Err(e) => err_reply(e),
      }
    }

    ClientWsMessage::CurrentPuzzle { session_id } => {
      match current_puzzle(state, &session_id).await {
        Ok(puzzle) => ServerWsMessage::Puzzle { puzzle },
        Err(e) => err_reply(e),
      }
    }

    ClientWsMessage::SubmitAnswer { session_id, puzzle_id, choices } => {
      match submit_answer(state, &session_id, &puzzle_id, &choices).await {
        Ok(out) => ServerWsMessage::AnswerResult {
          verdict: out.verdict,
          explanation: out.explanation,
          next_puzzle_id: out.next_puzzle_id,
          completed: out.completed,
        },
        Err(e) => err_reply(e),
      }
    }

    ClientWsMessage::Skip { session_id } => {
      match skip_current(state, &session_id).await {
        Ok(out) => ServerWsMessage::AnswerResult {
          verdict: out.verdict,
          explanation: out.explanation,
          next_puzzle_id: out.next_puzzle_id,
          completed: out.completed,
        },
        Err(e) => err_reply(e),
      }
    }

    ClientWsMessage::Summary { session_id } => {
      match session_summary(state, &session_id).await {
        Ok(summary) => ServerWsMessage::Summary { summary },
        Err(e) => err_reply(e),
      }
    }

    ClientWsMessage::ExpireSession { session_id } => {
      match expire_session(state, &session_id).await {
        Ok(out) => ServerWsMessage::Expired { state: out.state },
        Err(e) => err_reply(e),
      }
    }
  }
}

fn err_reply(e: EngineError) -> ServerWsMessage {
  ServerWsMessage::Error { message: e.to_string() }
}
