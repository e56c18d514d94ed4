//! # Session State
//!
//! Holds the bill being split and moves it to and from session files.
//!
//! ## Thread Safety
//! The session is wrapped in `Arc<Mutex<T>>` so that every mutation runs
//! alone: claims are clamped against the *current* remaining quantity, and
//! two interleaved updates could otherwise both see the same remainder.
//!
//! ## Session File Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session State Operations                             │
//! │                                                                         │
//! │  Command                 SessionState              File                 │
//! │  ───────                 ────────────              ────                 │
//! │                                                                         │
//! │  splitbill claim ──────► load() ◄───────────────── session.json         │
//! │                             │                                           │
//! │                          with_session_mut(|s| s.set_person_item_...)    │
//! │                             │                                           │
//! │                          save() ──────────────────► session.json        │
//! │                                                                         │
//! │  splitbill report ─────► load() ─► with_session(|s| s.split_report())   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use splitbill_core::BillSession;
use tracing::{debug, info};

use crate::error::ApiResult;

/// Mutex-guarded bill session.
#[derive(Debug, Clone)]
pub struct SessionState {
    session: Arc<Mutex<BillSession>>,
}

impl SessionState {
    /// Wraps an existing session.
    pub fn new(session: BillSession) -> Self {
        SessionState {
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Reads a session file.
    pub fn load(path: &Path) -> ApiResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let session = BillSession::from_json(&json)?;
        debug!(
            ?path,
            items = session.items().len(),
            people = session.people().len(),
            "Session loaded"
        );
        Ok(Self::new(session))
    }

    /// Writes the session file, replacing any previous content.
    pub fn save(&self, path: &Path) -> ApiResult<()> {
        let json = self.with_session(|session| session.to_json())?;
        std::fs::write(path, json)?;
        info!(?path, "Session saved");
        Ok(())
    }

    /// Executes a function with read access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let report = state.with_session(|s| s.split_report());
    /// ```
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&BillSession) -> R,
    {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&session)
    }

    /// Executes a function with write access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// state.with_session_mut(|s| s.set_person_item_quantity(&id, 0, 2))?;
    /// ```
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut BillSession) -> R,
    {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(BillSession::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use splitbill_core::parse_receipt;
    use std::thread;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let state = SessionState::new(BillSession::from_receipt(&parse_receipt(
            "1 2x Sate Rp40.000",
        )));
        let id = state.with_session_mut(|s| s.add_person().id.clone());
        state
            .with_session_mut(|s| s.set_person_item_quantity(&id, 0, 1))
            .unwrap();
        state.save(&path).unwrap();

        let loaded = SessionState::load(&path).unwrap();
        assert_eq!(loaded.with_session(|s| s.remaining_quantity(0)), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SessionState::load(&dir.path().join("missing.json")).unwrap_err();
        assert_eq!(err.code, ErrorCode::IoError);
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "not json").unwrap();
        let err = SessionState::load(&path).unwrap_err();
        assert_eq!(err.code, ErrorCode::DocumentError);
    }

    #[test]
    fn test_concurrent_claims_never_over_allocate() {
        let state = SessionState::new(BillSession::from_receipt(&parse_receipt(
            "1 5x Es teh Rp25.000",
        )));
        let ids: Vec<String> = (0..4)
            .map(|_| state.with_session_mut(|s| s.add_person().id.clone()))
            .collect();

        let handles: Vec<_> = ids
            .into_iter()
            .map(|id| {
                let state = state.clone();
                thread::spawn(move || {
                    state
                        .with_session_mut(|s| s.set_person_item_quantity(&id, 0, 3))
                        .unwrap()
                })
            })
            .collect();

        let applied: i64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(applied, 5);
        assert_eq!(state.with_session(|s| s.remaining_quantity(0)), 0);
    }
}
