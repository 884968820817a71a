//! Session registry: creation, lookup, and inactivity sweeping.
//!
//! Concurrency discipline lives here and only here. The registry map sits
//! behind a `RwLock`, but every session mutates under its own `Mutex`, so
//! operations on unrelated sessions never serialize against each other.
//! The sweeper takes the map read lock just long enough to clone the
//! handles, then locks sessions one at a time.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::EngineError;
use crate::session::Session;

pub struct SessionManager {
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
    /// Shuffle source, supplied at construction so tests can seed it.
    rng: Mutex<StdRng>,
    inactivity_timeout: Duration,
}

impl SessionManager {
    pub fn new(inactivity_timeout: Duration, rng: StdRng) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            rng: Mutex::new(rng),
            inactivity_timeout,
        }
    }

    /// Register a new session over `order`, optionally shuffled. Session
    /// ids are v4 uuids, unguessable by other callers. Returns a snapshot
    /// of the freshly created session.
    #[instrument(level = "info", skip(self, order), fields(puzzles = order.len(), %shuffle))]
    pub async fn create_session(
        &self,
        mut order: Vec<String>,
        shuffle: bool,
        now: DateTime<Utc>,
    ) -> Session {
        if shuffle {
            let mut rng = self.rng.lock().await;
            order.shuffle(&mut *rng);
        }
        let id = Uuid::new_v4().to_string();
        let session = Session::new(id.clone(), order, now);
        self.sessions
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(session.clone())));
        info!(target: "quiz", session_id = %id, state = %session.state, "session created");
        session
    }

    /// Handle to a registered session. Callers lock it for the duration
    /// of one operation.
    pub async fn get(&self, id: &str) -> Result<Arc<Mutex<Session>>, EngineError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::SessionNotFound(id.to_string()))
    }

    /// Expire every Active session idle longer than the inactivity
    /// timeout. Terminal sessions are skipped, so re-sweeping is a no-op;
    /// each session locks individually, so an in-flight submit on another
    /// session is never stalled for the whole sweep.
    #[instrument(level = "debug", skip(self))]
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let handles: Vec<(String, Arc<Mutex<Session>>)> = {
            let sessions = self.sessions.read().await;
            sessions
                .iter()
                .map(|(id, h)| (id.clone(), h.clone()))
                .collect()
        };

        let mut swept = 0;
        for (id, handle) in handles {
            let mut session = handle.lock().await;
            if session.state.is_terminal() {
                continue;
            }
            if now - session.last_activity_at > self.inactivity_timeout {
                // Cannot already be terminal here, so expire() must succeed.
                if session.expire().is_ok() {
                    swept += 1;
                    info!(target: "quiz", session_id = %id, "session expired by sweep");
                }
            }
        }
        swept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SessionState;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn manager(timeout_secs: i64) -> SessionManager {
        SessionManager::new(Duration::seconds(timeout_secs), StdRng::seed_from_u64(7))
    }

    fn order(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("p{i}")).collect()
    }

    #[tokio::test]
    async fn created_sessions_are_retrievable() {
        let mgr = manager(60);
        let session = mgr.create_session(order(2), false, Utc::now()).await;
        let handle = mgr.get(&session.id).await.expect("handle");
        assert_eq!(handle.lock().await.puzzle_order, order(2));
    }

    #[tokio::test]
    async fn unknown_session_id_is_not_found() {
        let mgr = manager(60);
        let err = mgr.get("nope").await.unwrap_err();
        assert!(matches!(err, EngineError::SessionNotFound(id) if id == "nope"));
    }

    #[tokio::test]
    async fn unshuffled_order_is_preserved() {
        let mgr = manager(60);
        let session = mgr.create_session(order(5), false, Utc::now()).await;
        assert_eq!(session.puzzle_order, order(5));
    }

    #[tokio::test]
    async fn shuffle_is_a_permutation_and_seed_deterministic() {
        let a = manager(60).create_session(order(6), true, Utc::now()).await;
        let b = manager(60).create_session(order(6), true, Utc::now()).await;

        let mut sorted = a.puzzle_order.clone();
        sorted.sort();
        assert_eq!(sorted, order(6));
        // Same seed, same permutation.
        assert_eq!(a.puzzle_order, b.puzzle_order);
    }

    #[tokio::test]
    async fn sweep_expires_only_idle_active_sessions() {
        let mgr = manager(60);
        let t0 = Utc::now();
        let idle = mgr.create_session(order(1), false, t0).await;
        let fresh_time = t0 + Duration::seconds(90);
        let fresh = mgr.create_session(order(1), false, fresh_time).await;

        let swept = mgr.sweep_expired(t0 + Duration::seconds(100)).await;
        assert_eq!(swept, 1);

        let idle = mgr.get(&idle.id).await.unwrap();
        assert_eq!(idle.lock().await.state, SessionState::Expired);
        let fresh = mgr.get(&fresh.id).await.unwrap();
        assert_eq!(fresh.lock().await.state, SessionState::Active);
    }

    #[tokio::test]
    async fn resweeping_is_idempotent() {
        let mgr = manager(60);
        let t0 = Utc::now();
        mgr.create_session(order(1), false, t0).await;

        let later = t0 + Duration::seconds(120);
        assert_eq!(mgr.sweep_expired(later).await, 1);
        assert_eq!(mgr.sweep_expired(later).await, 0);
    }

    #[tokio::test]
    async fn concurrent_submits_on_distinct_sessions_do_not_interfere() {
        let mgr = Arc::new(manager(60));
        let catalog = crate::catalog::Catalog::load(vec![crate::domain::PuzzleDef {
            id: "p1".into(),
            category: "basics".into(),
            prompt: "?".into(),
            choices: vec!["A".into(), "B".into()],
            correct: vec![0],
            multi_select: false,
            explanation: String::new(),
        }])
        .expect("catalog");
        let catalog = Arc::new(catalog);

        let a = mgr.create_session(vec!["p1".into()], false, Utc::now()).await;
        let b = mgr.create_session(vec!["p1".into()], false, Utc::now()).await;

        let task = |id: String, idx: usize| {
            let mgr = mgr.clone();
            let catalog = catalog.clone();
            tokio::spawn(async move {
                let handle = mgr.get(&id).await.expect("handle");
                let mut session = handle.lock().await;
                let puzzle = catalog.lookup("p1").expect("puzzle");
                session
                    .submit(puzzle, BTreeSet::from([idx]), Utc::now())
                    .expect("submit")
            })
        };

        let (va, vb) = tokio::join!(task(a.id.clone(), 0), task(b.id.clone(), 1));
        assert_eq!(va.expect("join a"), crate::domain::Verdict::Correct);
        assert_eq!(vb.expect("join b"), crate::domain::Verdict::Incorrect);

        // Each session's final state matches a sequential run of its own ops.
        let ha = mgr.get(&a.id).await.unwrap();
        let sa = ha.lock().await;
        assert_eq!(sa.verdicts.get("p1"), Some(&crate::domain::Verdict::Correct));
        assert_eq!(sa.state, SessionState::Completed);
        let hb = mgr.get(&b.id).await.unwrap();
        let sb = hb.lock().await;
        assert_eq!(sb.verdicts.get("p1"), Some(&crate::domain::Verdict::Incorrect));
    }
}
