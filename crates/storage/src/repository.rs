use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{ModuleId, ModuleProgress, PositioningStatus};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted positioning outcome for a course.
#[derive(Debug, Clone, PartialEq)]
pub struct PositioningRecord {
    pub course: String,
    pub status: PositioningStatus,
    pub score: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

/// Repository contract for per-course learner progress.
///
/// The quiz session only ever reads from it; the progress-tracking grader
/// writes after a successful submission.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the positioning status recorded for a course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read or the stored row is corrupt.
    async fn get_positioning_status(
        &self,
        course: &str,
    ) -> Result<Option<PositioningStatus>, StorageError>;

    /// Record the outcome of a graded positioning test, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn record_positioning_result(
        &self,
        course: &str,
        score: f64,
        at: DateTime<Utc>,
    ) -> Result<PositioningRecord, StorageError>;

    /// Fetch progress for one module of a course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read or the stored row is corrupt.
    async fn get_module_progress(
        &self,
        course: &str,
        module: &ModuleId,
    ) -> Result<Option<ModuleProgress>, StorageError>;

    /// Fold a graded module attempt into the stored progress.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the progress cannot be read or stored.
    async fn record_module_result(
        &self,
        course: &str,
        module: &ModuleId,
        score: f64,
        at: DateTime<Utc>,
    ) -> Result<ModuleProgress, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    positioning: Arc<Mutex<HashMap<String, PositioningRecord>>>,
    modules: Arc<Mutex<HashMap<(String, ModuleId), ModuleProgress>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw positioning status, bypassing score-based recording.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn set_positioning_status(
        &self,
        course: &str,
        status: PositioningStatus,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .positioning
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(
            course.to_string(),
            PositioningRecord {
                course: course.to_string(),
                status,
                score: None,
                updated_at: at,
            },
        );
        Ok(())
    }

    /// Fetch the full positioning record for inspection.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn positioning_record(&self, course: &str) -> Result<Option<PositioningRecord>, StorageError> {
        let guard = self
            .positioning
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(course).cloned())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_positioning_status(
        &self,
        course: &str,
    ) -> Result<Option<PositioningStatus>, StorageError> {
        Ok(self.positioning_record(course)?.map(|record| record.status))
    }

    async fn record_positioning_result(
        &self,
        course: &str,
        score: f64,
        at: DateTime<Utc>,
    ) -> Result<PositioningRecord, StorageError> {
        let record = PositioningRecord {
            course: course.to_string(),
            status: PositioningStatus::from_score(score),
            score: Some(score),
            updated_at: at,
        };
        let mut guard = self
            .positioning
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(course.to_string(), record.clone());
        Ok(record)
    }

    async fn get_module_progress(
        &self,
        course: &str,
        module: &ModuleId,
    ) -> Result<Option<ModuleProgress>, StorageError> {
        let guard = self
            .modules
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&(course.to_string(), module.clone())).cloned())
    }

    async fn record_module_result(
        &self,
        course: &str,
        module: &ModuleId,
        score: f64,
        at: DateTime<Utc>,
    ) -> Result<ModuleProgress, StorageError> {
        let mut guard = self
            .modules
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let progress = guard
            .entry((course.to_string(), module.clone()))
            .or_insert_with(|| ModuleProgress::untouched(course, module.clone()));
        progress.record_attempt(score, at);
        Ok(progress.clone())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(InMemoryRepository::new());
        Self { progress }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::ModuleStatus;
    use quiz_core::time::fixed_now;

    #[tokio::test]
    async fn unknown_course_has_no_status() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.get_positioning_status("Finance").await.unwrap(), None);
    }

    #[tokio::test]
    async fn positioning_result_is_recorded_against_threshold() {
        let repo = InMemoryRepository::new();
        let record = repo
            .record_positioning_result("Finance", 62.0, fixed_now())
            .await
            .unwrap();
        assert_eq!(record.status, PositioningStatus::Passed);
        assert_eq!(
            repo.get_positioning_status("Finance").await.unwrap(),
            Some(PositioningStatus::Passed)
        );

        repo.record_positioning_result("Finance", 20.0, fixed_now())
            .await
            .unwrap();
        assert_eq!(
            repo.get_positioning_status("Finance").await.unwrap(),
            Some(PositioningStatus::Failed)
        );
    }

    #[tokio::test]
    async fn module_results_accumulate() {
        let repo = InMemoryRepository::new();
        let module = ModuleId::new("Module_1");
        repo.record_module_result("Finance", &module, 30.0, fixed_now())
            .await
            .unwrap();
        let progress = repo
            .record_module_result("Finance", &module, 80.0, fixed_now())
            .await
            .unwrap();
        assert_eq!(progress.attempts(), 2);
        assert_eq!(progress.status(), ModuleStatus::Completed);

        let fetched = repo
            .get_module_progress("Finance", &module)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched, progress);
        assert!(
            repo.get_module_progress("Other", &module)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn storage_in_memory_is_usable_through_trait_object() {
        let storage = Storage::in_memory();
        storage
            .progress
            .record_positioning_result("Finance", 10.0, fixed_now())
            .await
            .unwrap();
        assert_eq!(
            storage.progress.get_positioning_status("Finance").await.unwrap(),
            Some(PositioningStatus::Failed)
        );
    }
}
