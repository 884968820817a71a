//! Loading engine configuration (settings + optional puzzle bank) from TOML.
//!
//! See `QuizConfig` and `Settings` for the expected schema.

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::PuzzleDef;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct QuizConfig {
  #[serde(default)]
  pub settings: Settings,
  /// Operator-supplied puzzle bank. When empty, the built-in seeds are
  /// used instead.
  #[serde(default)]
  pub puzzles: Vec<PuzzleDef>,
}

/// Engine tunables. Both have defaults so a bank-only config file works.
#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
  #[serde(default = "default_inactivity_timeout_secs")]
  pub inactivity_timeout_secs: u64,
  #[serde(default = "default_sweep_interval_secs")]
  pub sweep_interval_secs: u64,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      inactivity_timeout_secs: default_inactivity_timeout_secs(),
      sweep_interval_secs: default_sweep_interval_secs(),
    }
  }
}

fn default_inactivity_timeout_secs() -> u64 {
  1800
}

fn default_sweep_interval_secs() -> u64 {
  60
}

/// Attempt to load `QuizConfig` from QUIZ_CONFIG_PATH. On any parsing/IO
/// error, returns None and the engine runs on defaults + seeds.
pub fn load_quiz_config_from_env() -> Option<QuizConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<QuizConfig>(&s) {
      Ok(cfg) => {
        info!(target: "quizzle_backend", %path, bank = cfg.puzzles.len(), "Loaded quiz config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "quizzle_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "quizzle_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bank_only_config_gets_default_settings() {
    let cfg: QuizConfig = toml::from_str(
      r#"
        [[puzzles]]
        id = "p1"
        category = "basics"
        prompt = "what prints?"
        choices = ["A", "B"]
        correct = [0]
        explanation = "A prints"
      "#,
    )
    .expect("parse");
    assert_eq!(cfg.settings.inactivity_timeout_secs, 1800);
    assert_eq!(cfg.settings.sweep_interval_secs, 60);
    assert_eq!(cfg.puzzles.len(), 1);
    assert!(!cfg.puzzles[0].multi_select);
  }

  #[test]
  fn settings_only_config_has_empty_bank() {
    let cfg: QuizConfig = toml::from_str(
      r#"
        [settings]
        inactivity_timeout_secs = 300
        sweep_interval_secs = 10
      "#,
    )
    .expect("parse");
    assert_eq!(cfg.settings.inactivity_timeout_secs, 300);
    assert!(cfg.puzzles.is_empty());
  }
}
