use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::models::{AuthError, Session};

/// Where a session survives between runs.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>, AuthError>;
    fn save(&self, session: &Session) -> Result<(), AuthError>;
    fn clear(&self) -> Result<(), AuthError>;
}

/// Persists the session as JSON in a single file.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, AuthError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AuthError::Storage(e.to_string())),
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!("Discarding unreadable session file {}: {}", self.path.display(), e);
                self.clear()?;
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AuthError::Storage(e.to_string()))?;
        }

        let raw = serde_json::to_string_pretty(session)
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        fs::write(&self.path, raw).map_err(|e| AuthError::Storage(e.to_string()))?;

        debug!("Session written to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::Storage(e.to_string())),
        }
    }
}

/// Keeps the session for the lifetime of the process only.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, AuthError> {
        let guard = self.inner.lock().map_err(|_| AuthError::Storage("session lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, session: &Session) -> Result<(), AuthError> {
        let mut guard = self.inner.lock().map_err(|_| AuthError::Storage("session lock poisoned".to_string()))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        let mut guard = self.inner.lock().map_err(|_| AuthError::Storage("session lock poisoned".to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Owns the current session: restored on start, replaced on sign-in,
/// dropped on logout.
pub struct SessionManager {
    store: Box<dyn SessionStore>,
    current: Option<Session>,
}

impl SessionManager {
    /// Restores a persisted session, discarding it when expired.
    pub fn init(store: Box<dyn SessionStore>, now: DateTime<Utc>) -> Result<Self, AuthError> {
        let current = match store.load()? {
            Some(session) if session.is_expired(now) => {
                info!("Persisted session for {} expired, clearing it", session.user.username);
                store.clear()?;
                None
            }
            Some(session) => {
                debug!("Restored session for {}", session.user.username);
                Some(session)
            }
            None => None,
        };

        Ok(Self { store, current })
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Current session, or an auth error naming the action that needed it.
    pub fn require(&self, action: &str) -> Result<&Session, AuthError> {
        self.current
            .as_ref()
            .ok_or_else(|| AuthError::InvalidToken(format!("sign in before you {}", action)))
    }

    pub fn establish(&mut self, session: Session) -> Result<&Session, AuthError> {
        self.store.save(&session)?;
        info!("Signed in as {}", session.user.username);
        Ok(self.current.insert(session))
    }

    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.store.clear()?;
        if let Some(session) = self.current.take() {
            info!("Signed out {}", session.user.username);
        }
        Ok(())
    }
}
