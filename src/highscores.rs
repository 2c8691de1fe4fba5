//! Best score persistence
//!
//! Persisted as a small JSON file. A missing or unreadable file counts as
//! a best score of 0.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::driver::HighScoreStore;
use crate::error::StoreError;

/// Best score on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScores {
    /// Highest score reached
    #[serde(default)]
    pub best: u64,
    /// Unix timestamp (ms) when `best` was set
    #[serde(default)]
    pub achieved_at: Option<u64>,
    #[serde(skip)]
    path: PathBuf,
}

impl HighScores {
    /// Load from `path`, starting fresh when it is absent or corrupt
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<HighScores>(&json) {
                Ok(mut scores) => {
                    log::info!("Loaded high score {} from {}", scores.best, path.display());
                    scores.path = path;
                    return scores;
                }
                Err(e) => log::warn!("Ignoring corrupt high score file {}: {}", path.display(), e),
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No high score found, starting fresh");
            }
            Err(e) => log::warn!("Cannot read high score file {}: {}", path.display(), e),
        }

        Self {
            path,
            ..Self::default()
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        log::info!("High score {} saved", self.best);
        Ok(())
    }
}

impl HighScoreStore for HighScores {
    fn high_score(&self) -> u64 {
        self.best
    }

    fn set_high_score(&mut self, score: u64) -> Result<(), StoreError> {
        // Only take the new value once it is on disk
        let updated = HighScores {
            best: score,
            achieved_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .ok()
                .map(|d| d.as_millis() as u64),
            path: self.path.clone(),
        };
        updated.save()?;
        *self = updated;
        Ok(())
    }
}

/// In-memory store, for tests and embedders without a filesystem
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub best: u64,
    /// Number of times the best score was written
    pub writes: usize,
}

impl HighScoreStore for MemoryStore {
    fn high_score(&self) -> u64 {
        self.best
    }

    fn set_high_score(&mut self, score: u64) -> Result<(), StoreError> {
        self.best = score;
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("grid-snake-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_missing_file_defaults_to_zero() {
        let path = scratch_path("missing-scores.json");
        let _ = fs::remove_file(&path);
        let scores = HighScores::load(&path);
        assert_eq!(scores.high_score(), 0);
        assert_eq!(scores.path(), path.as_path());
    }

    #[test]
    fn test_corrupt_file_defaults_to_zero() {
        let path = scratch_path("corrupt-scores.json");
        fs::write(&path, "{ best: ").unwrap();
        assert_eq!(HighScores::load(&path).high_score(), 0);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_set_high_score_persists() {
        let path = scratch_path("persisted-scores.json");
        let _ = fs::remove_file(&path);

        let mut scores = HighScores::load(&path);
        scores.set_high_score(17).unwrap();
        assert!(scores.achieved_at.is_some());

        let reloaded = HighScores::load(&path);
        assert_eq!(reloaded.high_score(), 17);
        assert_eq!(reloaded.achieved_at, scores.achieved_at);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let path = scratch_path("no-such-dir").join("scores.json");
        let mut scores = HighScores::load(&path);
        assert!(matches!(scores.set_high_score(3), Err(StoreError::Io { .. })));
    }

    #[test]
    fn test_failed_save_keeps_previous_best() {
        let path = scratch_path("no-such-dir-either").join("scores.json");
        let mut scores = HighScores::load(&path);
        assert!(scores.set_high_score(3).is_err());
        assert_eq!(scores.high_score(), 0);
        assert!(scores.achieved_at.is_none());
    }
}
