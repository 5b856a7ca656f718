use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::session::report::SessionReport;
use crate::store::schema::{ProfileData, SessionHistoryData};

const PROFILE_FILE: &str = "profile.json";
const HISTORY_FILE: &str = "session_history.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mathdash");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if !path.exists() {
            return T::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(file = name, error = %e, "unreadable data file, starting fresh");
                T::default()
            }),
            Err(e) => {
                warn!(file = name, error = %e, "could not read data file");
                T::default()
            }
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Load the profile, falling back to defaults for a missing, corrupt or
    /// outdated file.
    pub fn load_profile(&self) -> ProfileData {
        let profile: ProfileData = self.load(PROFILE_FILE);
        if profile.needs_reset() {
            warn!(
                found = profile.schema_version,
                "profile schema changed, resetting"
            );
            return ProfileData::default();
        }
        profile
    }

    pub fn save_profile(&self, data: &ProfileData) -> Result<()> {
        self.save(PROFILE_FILE, data)
    }

    pub fn load_history(&self) -> SessionHistoryData {
        let history: SessionHistoryData = self.load(HISTORY_FILE);
        if history.needs_reset() {
            return SessionHistoryData::default();
        }
        history
    }

    pub fn save_history(&self, data: &SessionHistoryData) -> Result<()> {
        self.save(HISTORY_FILE, data)
    }

    /// Persist a finished session: fold it into the profile and append it to
    /// the history file.
    pub fn record_session(&self, profile: &mut ProfileData, report: &SessionReport) -> Result<()> {
        profile.apply_report(report);
        self.save_profile(profile)?;

        let mut history = self.load_history();
        history.sessions.push(report.clone());
        self.save_history(&history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::{PowerUp, SessionState};
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_files_load_defaults() {
        let (_dir, store) = make_test_store();
        assert_eq!(store.load_profile(), ProfileData::default());
        assert!(store.load_history().sessions.is_empty());
    }

    #[test]
    fn test_profile_round_trip() {
        let (_dir, store) = make_test_store();
        let mut profile = ProfileData {
            coins: 300,
            ..ProfileData::default()
        };
        profile.purchase(PowerUp::NumberReveal).unwrap();
        store.save_profile(&profile).unwrap();

        let loaded = store.load_profile();
        assert_eq!(loaded.coins, 100);
        assert_eq!(loaded.inventory.count(PowerUp::NumberReveal), 1);
    }

    #[test]
    fn test_save_leaves_no_tmp_files() {
        let (dir, store) = make_test_store();
        store.save_profile(&ProfileData::default()).unwrap();
        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty(), "no residual .tmp files");
    }

    #[test]
    fn test_corrupt_profile_falls_back_to_default() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(PROFILE_FILE), "{ not json").unwrap();
        assert_eq!(store.load_profile(), ProfileData::default());
    }

    #[test]
    fn test_outdated_schema_resets() {
        let (_dir, store) = make_test_store();
        let old = ProfileData {
            schema_version: 0,
            coins: 999,
            ..ProfileData::default()
        };
        store.save_profile(&old).unwrap();
        assert_eq!(store.load_profile().coins, 0);
    }

    #[test]
    fn test_record_session_updates_profile_and_history() {
        let (_dir, store) = make_test_store();
        let mut profile = store.load_profile();
        let state = SessionState {
            score: 80,
            coins: 8,
            difficulty: 6,
            total_questions: 10,
            ..SessionState::default()
        };
        let report = SessionReport::from_state(&state);

        store.record_session(&mut profile, &report).unwrap();
        store.record_session(&mut profile, &report).unwrap();

        let loaded = store.load_profile();
        assert_eq!(loaded.total_score, 160);
        assert_eq!(loaded.coins, 16);
        assert_eq!(loaded.difficulty, 6);
        assert_eq!(loaded.sessions_played, 2);

        let history = store.load_history();
        assert_eq!(history.sessions.len(), 2);
        assert_eq!(history.sessions[0].skipped, 10);
    }
}
