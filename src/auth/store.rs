use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::models::User;

/// Session file name inside the storage directory
const SESSION_FILE: &str = "session.json";

/// Durable storage for the serialized session record.
///
/// Holds a single JSON record under a fixed file name. This is a mirror of
/// the in-memory session, not the authoritative value; the `SessionManager`
/// owns that.
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Load the persisted session record, if any.
    pub fn load(&self) -> Result<Option<User>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .context("Failed to read session file")?;
        let user: User = serde_json::from_str(&contents)
            .context("Failed to parse session file")?;
        Ok(Some(user))
    }

    /// Save the session record to disk
    pub fn save(&self, user: &User) -> Result<()> {
        let path = self.session_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(user)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Remove the persisted record. Missing file is fine.
    pub fn clear(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn sample_user() -> User {
        User {
            email: "user@example.com".to_string(),
            id: "u-1".to_string(),
            token: "tok-abc".to_string(),
            roles: vec!["ROLE_USER".to_string(), "ROLE_ADD_PRODUCT".to_string()],
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    #[test]
    fn load_without_record_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());

        let user = sample_user();
        store.save(&user).unwrap();

        let loaded = store.load().unwrap().expect("record present");
        assert_eq!(loaded.email, user.email);
        assert_eq!(loaded.id, user.id);
        assert_eq!(loaded.token, user.token);
        assert_eq!(loaded.roles, user.roles);
    }

    #[test]
    fn clear_removes_record_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());

        store.save(&sample_user()).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());

        // Clearing again is a no-op
        store.clear().unwrap();
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = SessionStore::new(nested);
        store.save(&sample_user()).unwrap();
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn corrupt_record_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SESSION_FILE), "{not json").unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());
        assert!(store.load().is_err());
    }
}
