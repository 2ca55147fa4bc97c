use quiz_core::model::{ModuleId, ModuleProgress, ModuleStatus, PositioningStatus};
use sqlx::Row;

use crate::repository::{PositioningRecord, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

/// Statuses written by other tools (e.g. `completed`) still mean the test was taken.
/// Only a blank value is unreadable.
pub(crate) fn parse_positioning_status(s: &str) -> Result<PositioningStatus, StorageError> {
    if s.trim().is_empty() {
        return Err(StorageError::Serialization(
            "blank positioning status".to_string(),
        ));
    }
    Ok(s.parse::<PositioningStatus>().unwrap_or_else(|err| {
        tracing::debug!(%err, "treating unrecognised positioning status as attempted");
        PositioningStatus::Attempted
    }))
}

pub(crate) fn parse_module_status(s: &str) -> Result<ModuleStatus, StorageError> {
    ModuleStatus::parse(s)
        .ok_or_else(|| StorageError::Serialization(format!("invalid module status: {s}")))
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn map_positioning_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<PositioningRecord, StorageError> {
    let status: String = row.try_get("status").map_err(ser)?;
    Ok(PositioningRecord {
        course: row.try_get("course").map_err(ser)?,
        status: parse_positioning_status(&status)?,
        score: row.try_get("score").map_err(ser)?,
        updated_at: row.try_get("updated_at").map_err(ser)?,
    })
}

pub(crate) fn map_module_row(row: &sqlx::sqlite::SqliteRow) -> Result<ModuleProgress, StorageError> {
    let course: String = row.try_get("course").map_err(ser)?;
    let module: String = row.try_get("module").map_err(ser)?;
    let status: String = row.try_get("status").map_err(ser)?;
    let attempts = u32_from_i64("attempts", row.try_get::<i64, _>("attempts").map_err(ser)?)?;

    ModuleProgress::from_persisted(
        course,
        ModuleId::new(module),
        parse_module_status(&status)?,
        attempts,
        row.try_get("best_score").map_err(ser)?,
        row.try_get("last_activity").map_err(ser)?,
    )
    .map_err(ser)
}
