use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const STATE_FILE: &str = "gitsafe_last_repo.json";

/// Remembers the repository selected in the previous session
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LastRepo {
    pub last_repo: Option<PathBuf>,
}

impl LastRepo {
    /// `<temp dir>/gitsafe_last_repo.json`
    pub fn default_path() -> PathBuf {
        std::env::temp_dir().join(STATE_FILE)
    }

    /// Load state; a missing or unreadable file yields the empty state
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        fs::read_to_string(path.as_ref())
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    pub fn load() -> Self {
        Self::load_from_file(Self::default_path())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string(self).context("Failed to serialize last repository")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write state file: {}", path.display()))?;
        Ok(())
    }

    /// Record `repo` as the last used repository at the default path
    pub fn remember(repo: &Path) -> Result<()> {
        Self {
            last_repo: Some(repo.to_path_buf()),
        }
        .save_to_file(Self::default_path())
    }

    /// The stored path, if it still exists on disk
    pub fn existing(&self) -> Option<&Path> {
        self.last_repo.as_deref().filter(|p| p.is_dir())
    }
}
