//! Session context for the current actor.
//!
//! A [`Session`] is created once and handed to every component that needs to
//! know who is acting. Clones share the same state, so an `invalidate()` seen
//! by one holder is seen by all of them on their next read.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::types::{Actor, Role};

/// Opaque bearer token plus its role claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
    pub role: Role,
}

impl Credential {
    pub fn new(token: impl Into<String>, role: Role) -> Self {
        Self {
            token: token.into(),
            role,
        }
    }
}

/// Persistent client-side storage for the credential.
pub trait CredentialStorage: Send + Sync {
    fn load(&self) -> Result<Option<Credential>>;

    fn save(&self, credential: &Credential) -> Result<()>;

    fn clear(&self) -> Result<()>;
}

/// Storage that lives as long as the process.
#[derive(Default)]
pub struct MemoryCredentialStorage {
    slot: Mutex<Option<Credential>>,
}

impl MemoryCredentialStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStorage for MemoryCredentialStorage {
    fn load(&self) -> Result<Option<Credential>> {
        Ok(self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Storage backed by a JSON file, surviving restarts.
pub struct FileCredentialStorage {
    path: PathBuf,
}

impl FileCredentialStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStorage for FileCredentialStorage {
    fn load(&self) -> Result<Option<Credential>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&raw) {
            Ok(credential) => Ok(Some(credential)),
            Err(e) => {
                // A corrupt file is treated like no session at all.
                warn!(path = %self.path.display(), error = %e, "Discarding unreadable credential file");
                Ok(None)
            }
        }
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_vec(credential)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Shared session context.
#[derive(Clone)]
pub struct Session {
    current: Arc<RwLock<Option<Credential>>>,
    storage: Arc<dyn CredentialStorage>,
}

impl Session {
    /// An empty session over the given storage.
    pub fn new(storage: Arc<dyn CredentialStorage>) -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            storage,
        }
    }

    /// An empty session that is never persisted.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCredentialStorage::new()))
    }

    /// Reload whatever credential the storage holds.
    pub fn restore(storage: Arc<dyn CredentialStorage>) -> Result<Self> {
        let saved = storage.load()?;
        let session = Self::new(storage);
        *session.write() = saved;
        Ok(session)
    }

    /// Record a freshly issued credential.
    pub fn establish(&self, credential: Credential) -> Result<()> {
        self.storage.save(&credential)?;
        info!(role = %credential.role, "Session established");
        *self.write() = Some(credential);
        Ok(())
    }

    /// Drop the credential everywhere. Safe to call when already empty.
    pub fn invalidate(&self) {
        let previous = self.write().take();
        if let Err(e) = self.storage.clear() {
            warn!(error = %e, "Failed to clear stored credential");
        }
        if previous.is_some() {
            info!("Session invalidated");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    pub fn current_role(&self) -> Option<Role> {
        self.read().as_ref().map(|c| c.role)
    }

    pub fn current_actor(&self) -> Option<Actor> {
        self.current_role().map(Actor::new)
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.read().as_ref().map(|c| c.token.clone())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<Credential>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Credential>> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("role", &self.current_role())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_establish_and_invalidate() {
        let session = Session::in_memory();
        assert!(!session.is_authenticated());
        assert_eq!(session.current_actor(), None);

        session
            .establish(Credential::new("tok", Role::Administrator))
            .unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.current_role(), Some(Role::Administrator));
        assert_eq!(session.bearer_token().as_deref(), Some("tok"));

        session.invalidate();
        assert!(!session.is_authenticated());
        assert_eq!(session.bearer_token(), None);
    }

    #[test]
    fn test_clones_share_state() {
        let session = Session::in_memory();
        let other = session.clone();
        session.establish(Credential::new("tok", Role::Professor)).unwrap();
        assert_eq!(other.current_role(), Some(Role::Professor));

        other.invalidate();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_restore_from_storage() {
        let storage: Arc<dyn CredentialStorage> = Arc::new(MemoryCredentialStorage::new());
        storage.save(&Credential::new("saved", Role::Professor)).unwrap();

        let session = Session::restore(storage.clone()).unwrap();
        assert_eq!(session.bearer_token().as_deref(), Some("saved"));

        session.invalidate();
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn test_file_storage_round_trip() {
        let path = std::env::temp_dir().join(format!("atlas-session-{}.json", uuid::Uuid::new_v4()));
        let storage = FileCredentialStorage::new(&path);

        assert_eq!(storage.load().unwrap(), None);
        storage.save(&Credential::new("abc", Role::Administrator)).unwrap();
        assert_eq!(
            storage.load().unwrap(),
            Some(Credential::new("abc", Role::Administrator))
        );

        storage.clear().unwrap();
        assert!(!path.exists());
        storage.clear().unwrap();
    }

    #[test]
    fn test_file_storage_ignores_corrupt_file() {
        let path = std::env::temp_dir().join(format!("atlas-session-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, b"not json").unwrap();

        let storage = FileCredentialStorage::new(&path);
        assert_eq!(storage.load().unwrap(), None);
        storage.clear().unwrap();
    }
}
