//! Persistent storage for the session token.
//!
//! All reads and writes of the durable token go through the `TokenStore`
//! trait so the mechanism (file, keychain, in-memory) can be swapped per
//! platform without touching the session logic.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session file name inside the store directory
const SESSION_FILE: &str = "session.json";

/// On-disk form of the session token.
/// `saved_at` is informational only; tokens carry no client-side expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Durable storage for at most one token. Absence means unauthenticated.
pub trait TokenStore: Send + Sync {
    /// Read the stored token, if any.
    fn load(&self) -> Result<Option<String>>;

    /// Persist the token, replacing any previous one.
    fn save(&self, token: &str) -> Result<()>;

    /// Remove the stored token. Succeeds if none was stored.
    fn clear(&self) -> Result<()>;
}

/// File-backed store: a single `session.json` under the given directory.
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path).context("Failed to read session file")?;
        let session: StoredSession =
            serde_json::from_str(&contents).context("Failed to parse session file")?;
        Ok(Some(session.token))
    }

    fn save(&self, token: &str) -> Result<()> {
        let path = self.session_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create session directory")?;
        }
        let session = StoredSession {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        let contents = serde_json::to_string_pretty(&session)?;
        std::fs::write(&path, contents).context("Failed to write session file")?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(&path).context("Failed to remove session file")?;
        }
        Ok(())
    }
}
