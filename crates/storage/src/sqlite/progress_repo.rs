use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{ModuleId, ModuleProgress, PositioningStatus};

use super::SqliteRepository;
use super::mapping::{conn, map_module_row, map_positioning_row};
use crate::repository::{PositioningRecord, ProgressRepository, StorageError};

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn get_positioning_status(
        &self,
        course: &str,
    ) -> Result<Option<PositioningStatus>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT course, status, score, updated_at
                FROM positioning_results
                WHERE course = ?1
            ",
        )
        .bind(course)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref()
            .map(map_positioning_row)
            .transpose()
            .map(|record| record.map(|r| r.status))
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

        sqlx::query(
            r"
                INSERT INTO positioning_results (course, status, score, updated_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(course) DO UPDATE SET
                    status = excluded.status,
                    score = excluded.score,
                    updated_at = excluded.updated_at
            ",
        )
        .bind(&record.course)
        .bind(record.status.as_str())
        .bind(record.score)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(record)
    }

    async fn get_module_progress(
        &self,
        course: &str,
        module: &ModuleId,
    ) -> Result<Option<ModuleProgress>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT course, module, status, attempts, best_score, last_activity
                FROM module_progress
                WHERE course = ?1 AND module = ?2
            ",
        )
        .bind(course)
        .bind(module.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_module_row).transpose()
    }

    async fn record_module_result(
        &self,
        course: &str,
        module: &ModuleId,
        score: f64,
        at: DateTime<Utc>,
    ) -> Result<ModuleProgress, StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let row = sqlx::query(
            r"
                SELECT course, module, status, attempts, best_score, last_activity
                FROM module_progress
                WHERE course = ?1 AND module = ?2
            ",
        )
        .bind(course)
        .bind(module.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(conn)?;

        let mut progress = match row.as_ref() {
            Some(row) => map_module_row(row)?,
            None => ModuleProgress::untouched(course, module.clone()),
        };
        progress.record_attempt(score, at);

        sqlx::query(
            r"
                INSERT INTO module_progress (
                    course, module, status, attempts, best_score, last_activity
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT(course, module) DO UPDATE SET
                    status = excluded.status,
                    attempts = excluded.attempts,
                    best_score = excluded.best_score,
                    last_activity = excluded.last_activity
            ",
        )
        .bind(course)
        .bind(module.as_str())
        .bind(progress.status().as_str())
        .bind(i64::from(progress.attempts()))
        .bind(progress.best_score())
        .bind(progress.last_activity())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        tx.commit().await.map_err(conn)?;
        Ok(progress)
    }
}
