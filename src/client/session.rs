//! Authenticated session and its persistence.
//!
//! The session lives under three fixed keys (`auth_token`, `url_busqueda`,
//! `user`) in a [`SessionStore`]. Stores are synchronous key/value maps; the
//! file-backed store rewrites one small JSON document per change.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const TOKEN_KEY: &str = "auth_token";
pub const URL_BUSQUEDA_KEY: &str = "url_busqueda";
pub const USER_KEY: &str = "user";

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub nombre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Published when the session changes state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Active,
    /// The backend rejected the token; the user must log in again.
    Expired,
    LoggedOut,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub url_busqueda: Option<String>,
    pub user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.user
            .as_ref()
            .and_then(|u| u.role.as_deref())
            .is_some_and(|r| r == role)
    }

    /// `(token, url_busqueda)` when both are present.
    pub fn auth_headers(&self) -> Option<(&str, &str)> {
        Some((self.token.as_deref()?, self.url_busqueda.as_deref()?))
    }

    /// Restore a session from a store. A corrupt user entry is dropped
    /// along with the rest of the session.
    pub fn load(store: &dyn SessionStore) -> Result<Self, AppError> {
        let token = store.get(TOKEN_KEY)?;
        let url_busqueda = store.get(URL_BUSQUEDA_KEY)?;
        let user = match store.get(USER_KEY)? {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!("Discarding unreadable saved user: {}", e);
                    Session::default().save(store)?;
                    return Ok(Session::default());
                }
            },
            None => None,
        };

        Ok(Self {
            token,
            url_busqueda,
            user,
        })
    }

    /// Write every key, removing the ones that are unset.
    pub fn save(&self, store: &dyn SessionStore) -> Result<(), AppError> {
        put(store, TOKEN_KEY, self.token.as_deref())?;
        put(store, URL_BUSQUEDA_KEY, self.url_busqueda.as_deref())?;
        match &self.user {
            Some(user) => store.set(USER_KEY, &serde_json::to_string(user)?),
            None => store.remove(USER_KEY),
        }
    }
}

fn put(store: &dyn SessionStore, key: &str, value: Option<&str>) -> Result<(), AppError> {
    match value {
        Some(value) => store.set(key, value),
        None => store.remove(key),
    }
}

/// Key/value persistence for the session.
pub trait SessionStore: Send + Sync + fmt::Debug {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    fn remove(&self, key: &str) -> Result<(), AppError>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// Session store backed by a JSON object on disk.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<HashMap<String, String>, AppError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write(&self, entries: &HashMap<String, String>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(entries)?)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let _guard = lock(&self.guard);
        Ok(self.read()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let _guard = lock(&self.guard);
        let mut entries = self.read()?;
        entries.insert(key.to_string(), value.to_string());
        self.write(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        let _guard = lock(&self.guard);
        let mut entries = self.read()?;
        if entries.remove(key).is_some() {
            self.write(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn session() -> Session {
        Session {
            token: Some("tok".into()),
            url_busqueda: Some("admin-1".into()),
            user: Some(User {
                id: "1".into(),
                nombre: "Admin".into(),
                email: None,
                role: Some("admin".into()),
            }),
        }
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemorySessionStore::new();
        session().save(&store).unwrap();

        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("tok"));
        let loaded = Session::load(&store).unwrap();
        assert_eq!(loaded, session());
        assert!(loaded.has_role("admin"));
        assert_eq!(loaded.auth_headers(), Some(("tok", "admin-1")));
    }

    #[test]
    fn test_save_removes_unset_keys() {
        let store = MemorySessionStore::new();
        session().save(&store).unwrap();

        let cleared = Session {
            user: None,
            token: None,
            ..session()
        };
        cleared.save(&store).unwrap();

        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(store.get(USER_KEY).unwrap(), None);
        assert_eq!(store.get(URL_BUSQUEDA_KEY).unwrap().as_deref(), Some("admin-1"));
        assert!(!Session::load(&store).unwrap().is_authenticated());
    }

    #[test]
    fn test_corrupt_user_discards_session() {
        let store = MemorySessionStore::new();
        store.set(TOKEN_KEY, "tok").unwrap();
        store.set(USER_KEY, "{not json").unwrap();

        let loaded = Session::load(&store).unwrap();
        assert_eq!(loaded, Session::default());
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state").join("session.json");

        session().save(&FileSessionStore::new(&path)).unwrap();
        assert!(path.exists());

        let reopened = FileSessionStore::new(&path);
        assert_eq!(Session::load(&reopened).unwrap(), session());

        reopened.remove(TOKEN_KEY).unwrap();
        assert_eq!(FileSessionStore::new(&path).get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_auth_headers_need_both_values() {
        let partial = Session {
            url_busqueda: None,
            ..session()
        };
        assert_eq!(partial.auth_headers(), None);
    }
}
