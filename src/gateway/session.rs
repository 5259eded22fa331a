//! Explicit session context: bearer token and tablet pairing.
//!
//! Read once at startup, overwritten by login/pairing, cleared by logout. The gateway reads it
//! before every call instead of looking the token up globally.

use crate::models::ScorerSession;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

/// Failures while loading or persisting the session file.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session file `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session file `{path}` is not valid JSON")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// What is persisted between runs.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub scorer: Option<ScorerSession>,
    /// Sent as `X-Scorer-Token` on tablet score submissions.
    #[serde(default)]
    pub scorer_token: Option<String>,
}

/// Shared session context handed to the [`Gateway`](crate::gateway::Gateway).
#[derive(Debug, Default)]
pub struct Session {
    data: RwLock<SessionData>,
    /// None keeps the session in memory only.
    path: Option<PathBuf>,
}

impl Session {
    /// Session that never touches disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Read the session file once. A missing file yields an empty session.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| SessionError::Format {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("No session file at {}, starting logged out", path.display());
                SessionData::default()
            }
            Err(source) => return Err(SessionError::Io { path, source }),
        };
        Ok(Self {
            data: RwLock::new(data),
            path: Some(path),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn scorer(&self) -> Option<ScorerSession> {
        self.read().scorer
    }

    pub fn scorer_token(&self) -> Option<String> {
        self.read().scorer_token.clone()
    }

    pub fn snapshot(&self) -> SessionData {
        self.read().clone()
    }

    /// Store a freshly issued bearer token.
    pub fn login(&self, token: impl Into<String>) -> Result<(), SessionError> {
        self.update(|data| data.token = Some(token.into()))?;
        log::info!("Session token stored");
        Ok(())
    }

    pub fn logout(&self) -> Result<(), SessionError> {
        self.update(|data| data.token = None)?;
        log::info!("Session token cleared");
        Ok(())
    }

    /// Bind this device to a board.
    pub fn pair(&self, scorer: ScorerSession) -> Result<(), SessionError> {
        self.update(|data| data.scorer = Some(scorer))?;
        log::info!(
            "Paired with board {} of tournament {}",
            scorer.board_number,
            scorer.tournament_id
        );
        Ok(())
    }

    pub fn set_scorer_token(&self, token: impl Into<String>) -> Result<(), SessionError> {
        self.update(|data| data.scorer_token = Some(token.into()))
    }

    pub fn unpair(&self) -> Result<(), SessionError> {
        self.update(|data| {
            data.scorer = None;
            data.scorer_token = None;
        })?;
        log::info!("Board pairing removed");
        Ok(())
    }

    /// Forget everything, including the file on disk.
    pub fn clear(&self) -> Result<(), SessionError> {
        *self.write() = SessionData::default();
        if let Some(path) = &self.path {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(SessionError::Io {
                        path: path.clone(),
                        source,
                    })
                }
            }
        }
        Ok(())
    }

    /// Drop the token without persisting errors to the caller (used when the server answers 401).
    pub(crate) fn expire_token(&self) {
        if let Err(e) = self.logout() {
            log::warn!("Failed to persist expired session: {}", e);
        }
    }

    fn update(&self, f: impl FnOnce(&mut SessionData)) -> Result<(), SessionError> {
        let data = {
            let mut guard = self.write();
            f(&mut guard);
            guard.clone()
        };
        self.persist(&data)
    }

    fn persist(&self, data: &SessionData) -> Result<(), SessionError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(data).map_err(|source| SessionError::Format {
            path: path.clone(),
            source,
        })?;
        fs::write(path, json).map_err(|source| SessionError::Io {
            path: path.clone(),
            source,
        })
    }

    // A poisoned lock only means another thread panicked mid-update; the data is still usable.
    fn read(&self) -> RwLockReadGuard<'_, SessionData> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionData> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
