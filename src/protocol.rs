//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.
//!
//! Puzzle payloads never carry the answer key or the explanation; the
//! explanation is revealed in answer results only, after grading.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{CategoryCount, Puzzle, SessionState, Verdict};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    StartSession {
        #[serde(rename = "puzzleIds")]
        puzzle_ids: Option<Vec<String>>,
        category: Option<String>,
        #[serde(default)]
        shuffle: bool,
    },
    CurrentPuzzle {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    SubmitAnswer {
        #[serde(rename = "sessionId")]
        session_id: String,
        #[serde(rename = "puzzleId")]
        puzzle_id: String,
        choices: Vec<usize>,
    },
    Skip {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    Summary {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    ExpireSession {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    SessionStarted {
        session_id: String,
        total: usize,
        puzzle: Option<PuzzleOut>,
    },
    Puzzle {
        puzzle: PuzzleOut,
    },
    AnswerResult {
        verdict: Verdict,
        explanation: Option<String>,
        next_puzzle_id: Option<String>,
        completed: bool,
    },
    Summary {
        summary: SummaryOut,
    },
    Expired {
        state: SessionState,
    },
    Error {
        message: String,
    },
}

/// DTO used by both WS and HTTP for puzzle delivery. Deliberately omits
/// `correct_choices` and `explanation`.
#[derive(Clone, Debug, Serialize)]
pub struct PuzzleOut {
    pub id: String,
    pub category: String,
    pub prompt: String,
    pub choices: Vec<String>,
    pub multi_select: bool,
}

/// Convert the full internal `Puzzle` to the public DTO.
pub fn to_out(p: &Puzzle) -> PuzzleOut {
    PuzzleOut {
        id: p.id.clone(),
        category: p.category.clone(),
        prompt: p.prompt.clone(),
        choices: p.choices.clone(),
        multi_select: p.multi_select,
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
}
#[derive(Serialize)]
pub struct CatalogOut {
    pub ids: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct StartSessionIn {
    #[serde(rename = "puzzleIds")]
    pub puzzle_ids: Option<Vec<String>>,
    pub category: Option<String>,
    #[serde(default)]
    pub shuffle: bool,
}
#[derive(Debug, Serialize)]
pub struct StartSessionOut {
    pub session_id: String,
    pub total: usize,
    /// First puzzle, absent when the session is born completed.
    pub puzzle: Option<PuzzleOut>,
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Deserialize)]
pub struct AnswerIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(rename = "puzzleId")]
    pub puzzle_id: String,
    pub choices: Vec<usize>,
}
#[derive(Debug, Serialize)]
pub struct AnswerOut {
    pub verdict: Verdict,
    /// Revealed after grading; never present on skips.
    pub explanation: Option<String>,
    pub next_puzzle_id: Option<String>,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct SkipIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryOut {
    pub session_id: String,
    pub state: SessionState,
    pub total_answered: usize,
    pub total_correct: usize,
    pub per_category: BTreeMap<String, CategoryCount>,
}

#[derive(Deserialize)]
pub struct ExpireIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}
#[derive(Debug, Serialize)]
pub struct ExpireOut {
    pub state: SessionState,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
