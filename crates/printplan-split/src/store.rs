//! File-based job store — one JSON file per job under the data directory.
//! Written when an edit session saves, read when a job is reopened.

use chrono::{DateTime, Utc};
use printplan_core::error::{PrintPlanError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::state::SplitStateStore;
use crate::types::{QuantityInput, SplitRecord, SplitSeed};

/// A job's split as saved to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredJob {
    pub job_id: String,
    pub quantity: u64,
    pub start_date: Option<i64>,
    pub due_date: Option<i64>,
    #[serde(flatten)]
    pub split: SplitRecord,
    pub updated_at: DateTime<Utc>,
}

impl StoredJob {
    /// Snapshot an edit session for saving.
    pub fn from_state(job_id: &str, state: &SplitStateStore) -> Self {
        Self {
            job_id: job_id.to_string(),
            quantity: state.total_quantity(),
            start_date: state.start_date(),
            due_date: state.due_date(),
            split: state.record(),
            updated_at: Utc::now(),
        }
    }

    /// Seed for reopening this job in a new edit session.
    pub fn to_seed(&self) -> SplitSeed {
        SplitSeed {
            quantity: Some(QuantityInput::from(self.quantity)),
            start_date: self.start_date,
            due_date: self.due_date,
            weekly_split: Some(self.split.weekly_split.clone()),
            locked_weeks: Some(self.split.locked_weeks.clone()),
        }
    }
}

/// File-based job store.
pub struct JobStore {
    path: PathBuf,
}

impl JobStore {
    /// Create a new job store at the given directory.
    pub fn new(dir: &Path) -> Self {
        std::fs::create_dir_all(dir).ok();
        Self {
            path: dir.to_path_buf(),
        }
    }

    /// Percent-encoded so distinct ids never share a file.
    fn file_for(&self, job_id: &str) -> PathBuf {
        self.path.join(format!("{}.json", urlencoding::encode(job_id)))
    }

    /// Save one job, replacing any previous file.
    pub fn save(&self, job: &StoredJob) -> Result<()> {
        let file = self.file_for(&job.job_id);
        let json = serde_json::to_string_pretty(job)?;
        std::fs::write(&file, json)?;
        tracing::debug!("💾 Saved job '{}' to {}", job.job_id, file.display());
        Ok(())
    }

    /// Load one job.
    pub fn load(&self, job_id: &str) -> Result<StoredJob> {
        let file = self.file_for(job_id);
        if !file.exists() {
            return Err(PrintPlanError::JobNotFound(job_id.to_string()));
        }
        let json = std::fs::read_to_string(&file)?;
        let job: StoredJob = serde_json::from_str(&json)?;
        if job.job_id != job_id {
            tracing::warn!(
                "⚠️ {} holds job '{}', not '{job_id}'",
                file.display(),
                job.job_id
            );
            return Err(PrintPlanError::JobNotFound(job_id.to_string()));
        }
        Ok(job)
    }

    /// Whether a job has been saved.
    pub fn exists(&self, job_id: &str) -> bool {
        self.file_for(job_id).exists()
    }

    /// All readable jobs, sorted by id. Unreadable files are skipped.
    pub fn list(&self) -> Vec<StoredJob> {
        let entries = match std::fs::read_dir(&self.path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("⚠️ Failed to read {}: {e}", self.path.display());
                return Vec::new();
            }
        };

        let mut jobs: Vec<StoredJob> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| {
                let parsed = std::fs::read_to_string(&path)
                    .map_err(|e| e.to_string())
                    .and_then(|json| {
                        serde_json::from_str::<StoredJob>(&json).map_err(|e| e.to_string())
                    });
                match parsed {
                    Ok(job) => Some(job),
                    Err(e) => {
                        tracing::warn!("⚠️ Skipping {}: {e}", path.display());
                        None
                    }
                }
            })
            .collect();
        jobs.sort_by(|a, b| a.job_id.cmp(&b.job_id));
        jobs
    }

    /// Remove a job. Returns false if it was not stored.
    pub fn remove(&self, job_id: &str) -> Result<bool> {
        let file = self.file_for(job_id);
        if !file.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&file)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SplitStateStore {
        let mut state = SplitStateStore::from_seed(
            &SplitSeed {
                quantity: Some(QuantityInput::Number(400)),
                weekly_split: Some(vec![100, 100, 100, 100]),
                ..Default::default()
            },
            ",",
        );
        state.edit_week(0, "160").unwrap();
        state
    }

    #[test]
    fn test_save_load_reopen() {
        let dir = std::env::temp_dir().join("printplan-test-store");
        let store = JobStore::new(&dir);
        let job = StoredJob::from_state("JOB-1042", &session());
        store.save(&job).unwrap();

        let loaded = store.load("JOB-1042").unwrap();
        assert_eq!(loaded, job);
        assert_eq!(loaded.split.weekly_split, vec![160, 80, 80, 80]);
        assert_eq!(loaded.split.locked_weeks, vec![true, false, false, false]);

        let reopened = SplitStateStore::from_seed(&loaded.to_seed(), ",");
        assert_eq!(reopened.record(), loaded.split);
        assert_eq!(reopened.total_quantity(), 400);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_file_holds_parallel_arrays() {
        let dir = std::env::temp_dir().join("printplan-test-store-json");
        let store = JobStore::new(&dir);
        store.save(&StoredJob::from_state("J7", &session())).unwrap();

        let raw = std::fs::read_to_string(dir.join("J7.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["weekly_split"], serde_json::json!([160, 80, 80, 80]));
        assert_eq!(value["locked_weeks"][0], serde_json::json!(true));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_job_and_remove() {
        let dir = std::env::temp_dir().join("printplan-test-store-missing");
        let store = JobStore::new(&dir);
        assert!(matches!(
            store.load("nope"),
            Err(PrintPlanError::JobNotFound(_))
        ));
        assert!(!store.remove("nope").unwrap());

        store.save(&StoredJob::from_state("gone", &session())).unwrap();
        assert!(store.exists("gone"));
        assert!(store.remove("gone").unwrap());
        assert!(!store.exists("gone"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_similar_ids_keep_separate_files() {
        let dir = std::env::temp_dir().join("printplan-test-store-ids");
        let store = JobStore::new(&dir);
        let mut other = session();
        other.edit_week(1, "20").unwrap();
        store.save(&StoredJob::from_state("a_b", &session())).unwrap();
        store.save(&StoredJob::from_state("a/b", &other)).unwrap();

        let plain = store.load("a_b").unwrap();
        let slashed = store.load("a/b").unwrap();
        assert_eq!(plain.job_id, "a_b");
        assert_eq!(plain.split.weekly_split, vec![160, 80, 80, 80]);
        assert_eq!(slashed.job_id, "a/b");
        assert_eq!(slashed.split.weekly_split, vec![160, 20, 110, 110]);

        let ids: Vec<String> = store.list().into_iter().map(|j| j.job_id).collect();
        assert_eq!(ids, vec!["a/b".to_string(), "a_b".to_string()]);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_rejects_file_holding_another_job() {
        let dir = std::env::temp_dir().join("printplan-test-store-mismatch");
        let store = JobStore::new(&dir);
        store.save(&StoredJob::from_state("real", &session())).unwrap();
        std::fs::copy(dir.join("real.json"), dir.join("alias.json")).unwrap();

        assert!(matches!(
            store.load("alias"),
            Err(PrintPlanError::JobNotFound(id)) if id == "alias"
        ));
        assert_eq!(store.load("real").unwrap().job_id, "real");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_list_skips_unreadable_files() {
        let dir = std::env::temp_dir().join("printplan-test-store-list");
        let store = JobStore::new(&dir);
        store.save(&StoredJob::from_state("b", &session())).unwrap();
        store.save(&StoredJob::from_state("a", &session())).unwrap();
        std::fs::write(dir.join("broken.json"), "{not json").unwrap();

        let ids: Vec<String> = store.list().into_iter().map(|j| j.job_id).collect();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
        std::fs::remove_dir_all(&dir).ok();
    }
}
