//! Persistent "current user" record, kept across runs

use anyhow::Result;
use shared::Session;
use std::path::{Path, PathBuf};

use crate::config::project_dirs;

const SESSION_FILE: &str = "current_user.json";

/// Holds at most one serialized session. No expiry, refresh or encryption.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store under the platform data directory
    pub fn open_default() -> Result<Self> {
        let proj_dirs = project_dirs()?;
        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;
        Ok(Self::in_dir(data_dir))
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set(&self, session: &Session) -> Result<()> {
        let content = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, content)?;
        tracing::debug!("Saved session for user {} to {:?}", session.id, self.path);
        Ok(())
    }

    /// The stored session, or `None` when absent or unreadable. Only a
    /// missing file is silent.
    pub fn get(&self) -> Option<Session> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Cannot read session file {:?}: {}", self.path, e);
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("Ignoring corrupt session file {:?}: {}", self.path, e);
                None
            }
        }
    }

    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
