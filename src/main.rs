//! Quizzle · Quiz Engine Backend
//!
//! - Axum HTTP + WebSocket API
//! - In-memory puzzle catalog (TOML bank or built-in seeds)
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT          : u16 (default 3000)
//!   QUIZ_CONFIG_PATH  : path to TOML config (settings + optional puzzle bank)
//!   LOG_LEVEL    : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT      : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc, time::Duration};

use chrono::Utc;
use tokio::net::TcpListener;
use tracing::{debug, info, instrument};

use quizzle_backend::routes::build_router;
use quizzle_backend::state::AppState;
use quizzle_backend::telemetry;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (catalog, session registry, settings).
  let state = Arc::new(AppState::new()?);

  // Periodic inactivity sweep; each pass locks sessions one at a time.
  let sweep_state = state.clone();
  let sweep_interval = Duration::from_secs(state.settings.sweep_interval_secs);
  tokio::spawn(async move {
    let mut tick = tokio::time::interval(sweep_interval);
    loop {
      tick.tick().await;
      let swept = sweep_state.sessions.sweep_expired(Utc::now()).await;
      if swept > 0 {
        info!(target: "quiz", %swept, "inactivity sweep expired sessions");
      } else {
        debug!(target: "quiz", "inactivity sweep found nothing to expire");
      }
    }
  });

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "quizzle_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
