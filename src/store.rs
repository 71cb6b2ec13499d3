//! Local profile persistence under one fixed storage key.
//!
//! The profile lives as serialized JSON in `<dir>/learnyourway_profile.json`.
//! Absence or an unreadable file means the session starts from defaults;
//! that path is logged, never fatal.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::domain::LearnerProfile;
use crate::error::{ClientError, Result};

/// Fixed storage key the profile is persisted under.
pub const PROFILE_STORE_KEY: &str = "learnyourway_profile";

#[derive(Clone, Debug)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { path: dir.as_ref().join(format!("{}.json", PROFILE_STORE_KEY)) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restore the saved profile, if any. Parse failures are treated the same
    /// as absence so a corrupt file never blocks session start.
    pub fn load(&self) -> Option<LearnerProfile> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<LearnerProfile>(&raw) {
            Ok(profile) => {
                info!(target: "learnyourway", path = %self.path.display(), user_id = %profile.user_id, "Restored saved profile");
                Some(profile)
            }
            Err(e) => {
                error!(target: "learnyourway", path = %self.path.display(), error = %e, "Saved profile unreadable; starting from defaults");
                None
            }
        }
    }

    pub fn save(&self, profile: &LearnerProfile) -> Result<()> {
        let raw = serde_json::to_string_pretty(profile)
            .map_err(|e| ClientError::Store(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| ClientError::Store(e.to_string()))?;
        info!(target: "learnyourway", path = %self.path.display(), "Profile persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("learnway-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn round_trips_a_profile() {
        let dir = scratch_dir();
        let store = ProfileStore::new(&dir);
        let profile = LearnerProfile {
            user_id: "demo_user".into(),
            grade: 5,
            interests: vec!["soccer".into()],
        };

        store.save(&profile).unwrap();
        assert_eq!(store.load(), Some(profile));
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn absence_and_corruption_yield_none() {
        let dir = scratch_dir();
        let store = ProfileStore::new(&dir);
        assert_eq!(store.load(), None);

        std::fs::write(store.path(), "{not json").unwrap();
        assert_eq!(store.load(), None);
        std::fs::remove_dir_all(dir).unwrap();
    }
}
